//! Where tessera looks for its configuration file and keeps its databases.

use std::path::{Path, PathBuf};

use directories_next::ProjectDirs;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "tessera.toml";

/// System-wide configuration directory, only searched on unix
const SYSTEM_CONFIG_DIR: &str = "/etc/tessera";

/// Data directory used when the platform does not provide one
const FALLBACK_DATA_DIR: &str = ".tessera";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "tessera", "tessera")
}

/// Directories searched for `tessera.toml`, from highest to lowest priority: the working
/// directory, the per-user config directory (`$XDG_CONFIG_HOME/tessera` on GNU/Linux,
/// `~/Library/Application Support/io.tessera.tessera` on MacOS, `%APPDATA%\tessera\tessera\config`
/// on Windows) and `/etc/tessera`.
pub fn config_search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(project) = project_dirs() {
        dirs.push(project.config_dir().to_path_buf());
    }
    if cfg!(unix) {
        dirs.push(PathBuf::from(SYSTEM_CONFIG_DIR));
    }

    dirs
}

/// First `tessera.toml` found in `dirs`
pub fn find_config_in<I, P>(dirs: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    dirs.into_iter()
        .map(|dir| dir.as_ref().join(CONFIG_FILE))
        .find(|path| path.is_file())
}

/// Configuration file to use when none is given on the command line
pub fn find_config() -> Option<PathBuf> {
    find_config_in(config_search_dirs())
}

/// Directory holding the databases of every environment
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|project| project.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "tessera-dirs-{}-{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();

        dir
    }

    #[test]
    fn test_find_config_in_respects_priority() {
        let empty = scratch_dir("empty");
        let user = scratch_dir("user");
        let system = scratch_dir("system");
        fs::write(user.join(CONFIG_FILE), "").unwrap();
        fs::write(system.join(CONFIG_FILE), "").unwrap();

        let found = find_config_in([&empty, &user, &system]);

        assert_eq!(found, Some(user.join(CONFIG_FILE)));
        for dir in [empty, user, system] {
            fs::remove_dir_all(dir).unwrap();
        }
    }

    #[test]
    fn test_find_config_in_ignores_directories() {
        let dir = scratch_dir("nested");
        fs::create_dir_all(dir.join(CONFIG_FILE)).unwrap();

        assert_eq!(find_config_in([&dir]), None);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_search_dirs_start_with_working_directory() {
        let dirs = config_search_dirs();

        assert_eq!(dirs.first(), std::env::current_dir().ok().as_ref());
        if cfg!(unix) {
            assert_eq!(dirs.last(), Some(&PathBuf::from(SYSTEM_CONFIG_DIR)));
        }
    }
}
