use std::path::PathBuf;

use structopt::StructOpt;

use tessera_config as config;

mod wallet;

pub fn from_args() -> Cli {
    Cli::from_args()
}

pub fn exec(command: Cli) -> anyhow::Result<()> {
    let Cli {
        config,
        debug,
        trace,
        cmd,
    } = command;
    let config = get_config(config.or_else(config::dirs::find_config))?;

    let level = if trace {
        log::LevelFilter::Trace
    } else if debug {
        log::LevelFilter::Debug
    } else {
        config.log.level
    };
    init_logger(level);

    wallet::exec_cmd(cmd, config)
}

/// Log our own crates at `level` and everything else at `warn`. `RUST_LOG` takes precedence.
fn init_logger(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("tessera", level)
        .parse_env(env_logger::Env::default())
        .init();
}

fn get_config(path: Option<PathBuf>) -> anyhow::Result<config::config::Config> {
    match path {
        Some(p) => {
            let partial = config::loaders::toml::from_file(&p)?;
            let config = config::config::Config::from_partial(&partial);
            log::debug!("Loaded config from {}", p.display());

            Ok(config)
        }
        None => Ok(config::config::Config::default()),
    }
}

/// Maintain and query the account UTXO index of a wallet
#[derive(Debug, StructOpt)]
pub struct Cli {
    /// Load configuration from this file. If not specified, tessera.toml is looked up in the
    /// current directory, the platform config directory and /etc/tessera.
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    config: Option<PathBuf>,
    /// Turn on DEBUG logging.
    #[structopt(long = "debug")]
    debug: bool,
    /// Turn on TRACE logging.
    #[structopt(long = "trace")]
    trace: bool,
    #[structopt(subcommand)]
    cmd: wallet::Command,
}
