use std::{
    fs,
    path::{Path, PathBuf},
};

use structopt::StructOpt;

use tessera_config::config::Config;
use tessera_data_structures::chain::Block;
use tessera_storage::{
    backends::rocksdb,
    storage::{Storage, WriteBatch},
};
use tessera_wallet::{
    account::{self, Account, CtrlProgram},
    Wallet,
};

pub fn exec_cmd(command: Command, config: Config) -> anyhow::Result<()> {
    if let Command::ShowConfig = command {
        print!("{}", toml::to_string_pretty(&config)?);

        return Ok(());
    }

    let db = rocksdb::open(&config.storage.db_path, config.storage.create_if_missing)?;
    let wallet = Wallet::from_storage(&db);

    match command {
        Command::Utxos { account } => {
            for utxo in wallet.utxos(account.as_deref())? {
                println!("{}", serde_json::to_string(&utxo)?);
            }
        }
        Command::Balance { account } => {
            for balance in wallet.balances(&account)? {
                println!("{} {}", balance.asset_id, balance.amount);
            }
        }
        Command::Status => match wallet.status()? {
            Some(status) => println!("{} {}", status.height, status.hash),
            None => println!("No block has been indexed yet"),
        },
        Command::AttachBlock { block } => {
            let block = read_block(&block)?;
            wallet.attach_block(&block)?;
        }
        Command::DetachBlock { block } => {
            let block = read_block(&block)?;
            wallet.detach_block(&block)?;
        }
        Command::Annotate { block } => {
            let block = read_block(&block)?;
            for tx in wallet.annotated_block(&block)? {
                println!("{}", serde_json::to_string(&tx)?);
            }
        }
        Command::Register {
            account,
            alias,
            program,
            key_index,
            change,
        } => {
            let control_program = hex::decode(program)?;
            let mut batch = WriteBatch::default();
            account::insert_account(
                &mut batch,
                &Account {
                    id: account.clone(),
                    alias,
                },
            )?;
            account::insert_control_program(
                &mut batch,
                &CtrlProgram {
                    account_id: account,
                    address: None,
                    key_index,
                    control_program,
                    change,
                },
            )?;
            Storage::write(&db, batch)?;
        }
        Command::DeleteAccount { account } => {
            let mut batch = WriteBatch::default();
            account::delete_account(&mut batch, &account);
            Storage::write(&db, batch)?;
        }
        Command::ShowConfig => {}
    }

    Ok(())
}

fn read_block(path: &Path) -> anyhow::Result<Block> {
    let contents = fs::read_to_string(path)?;

    Ok(serde_json::from_str(&contents)?)
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(name = "utxos", about = "List the unspent outputs of tracked accounts")]
    Utxos {
        /// Only list the outputs of this account
        #[structopt(long = "account")]
        account: Option<String>,
    },
    #[structopt(name = "balance", about = "Show the balance of an account, per asset")]
    Balance {
        #[structopt(long = "account")]
        account: String,
    },
    #[structopt(name = "status", about = "Show the last block applied to the index")]
    Status,
    #[structopt(name = "attach-block", about = "Apply a confirmed block read from a JSON file")]
    AttachBlock {
        #[structopt(parse(from_os_str))]
        block: PathBuf,
    },
    #[structopt(name = "detach-block", about = "Revert the last applied block, read from a JSON file")]
    DetachBlock {
        #[structopt(parse(from_os_str))]
        block: PathBuf,
    },
    #[structopt(name = "annotate", about = "Print the annotated transactions of a block read from a JSON file")]
    Annotate {
        #[structopt(parse(from_os_str))]
        block: PathBuf,
    },
    #[structopt(name = "register", about = "Track a control program as owned by an account")]
    Register {
        #[structopt(long = "account")]
        account: String,
        #[structopt(long = "alias")]
        alias: Option<String>,
        /// Control program, hex encoded
        #[structopt(long = "program")]
        program: String,
        #[structopt(long = "key-index", default_value = "0")]
        key_index: u64,
        /// The program receives change
        #[structopt(long = "change")]
        change: bool,
    },
    #[structopt(name = "delete-account", about = "Stop tracking an account")]
    DeleteAccount {
        #[structopt(long = "account")]
        account: String,
    },
    #[structopt(name = "show-config", about = "Print the loaded configuration")]
    ShowConfig,
}
