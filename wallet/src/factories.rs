use std::sync::Arc;

use tessera_data_structures::{
    chain::{AssetId, Block, Hash, Hashable, OP_TRUE},
    transaction::{IssuanceInput, SpendInput, Transaction, TxData, TxInput, TxOutput},
};
use tessera_storage::{
    backends::btreemap,
    storage::{Storage, WriteBatch},
};

use crate::{
    account::{self, Account, CtrlProgram, StorageRegistry},
    indexer::Indexer,
    keys,
    model::AccountUtxo,
};

pub type Db = Arc<btreemap::Backend>;

pub fn db() -> Db {
    Arc::new(btreemap::Backend::default())
}

pub fn indexer(db: &Db) -> Indexer<StorageRegistry<Db>> {
    Indexer::new(StorageRegistry::new(db.clone()))
}

pub fn commit(db: &Db, batch: WriteBatch) {
    Storage::write(db, batch).unwrap();
}

/// A spendable control program, distinct for every `n`
pub fn program(n: u8) -> Vec<u8> {
    vec![0x00, 0x14, n]
}

pub fn asset() -> AssetId {
    issuance_input(b"asset", 0).asset_id()
}

fn issuance_input(nonce: &[u8], amount: u64) -> IssuanceInput {
    IssuanceInput {
        nonce: nonce.to_vec(),
        amount,
        asset_definition: br#"{"name":"X"}"#.to_vec(),
        vm_version: 1,
        issuance_program: vec![OP_TRUE],
        arguments: vec![],
        reference_data: vec![],
    }
}

/// Register `program` as the `key_index`-th program of `account_id`, creating the account
pub fn register(db: &Db, account_id: &str, program: &[u8], key_index: u64) {
    let mut batch = WriteBatch::default();
    account::insert_account(
        &mut batch,
        &Account {
            id: account_id.to_string(),
            alias: None,
        },
    )
    .unwrap();
    account::insert_control_program(
        &mut batch,
        &CtrlProgram {
            account_id: account_id.to_string(),
            address: None,
            key_index,
            control_program: program.to_vec(),
            change: false,
        },
    )
    .unwrap();
    commit(db, batch);
}

/// A transaction issuing the total amount of `outputs`
pub fn issue(nonce: &[u8], outputs: Vec<TxOutput>) -> Transaction {
    let amount = outputs.iter().map(|o| o.asset_amount.amount).sum();
    let mut input = issuance_input(b"asset", amount);
    input.nonce = nonce.to_vec();

    Transaction::new(TxData {
        version: 1,
        inputs: vec![TxInput::Issuance(input)],
        outputs,
        reference_data: vec![],
    })
}

/// A transaction spending the outputs at `indexes` of `prev`
pub fn spend(prev: &[(&Transaction, usize)], outputs: Vec<TxOutput>) -> Transaction {
    let inputs = prev
        .iter()
        .map(|(tx, index)| {
            TxInput::Spend(SpendInput {
                spend_commitment: tx.spend_commitment(*index).unwrap(),
                arguments: vec![],
                reference_data: vec![],
            })
        })
        .collect();

    Transaction::new(TxData {
        version: 1,
        inputs,
        outputs,
        reference_data: vec![],
    })
}

pub fn output(amount: u64, program: Vec<u8>) -> TxOutput {
    TxOutput::new(asset(), amount, program)
}

pub fn block(height: u64, prev: Option<&Block>, transactions: Vec<Transaction>) -> Block {
    let prev_hash = prev.map(|b| b.hash()).unwrap_or_default();

    Block::new(height, prev_hash, 1_600_000_000 + height * 10, transactions)
}

/// Every record of the account UTXO index
pub fn utxos(db: &Db) -> Vec<AccountUtxo> {
    db.prefix_iterator(keys::ACCOUNT_UTXO_PREFIX)
        .unwrap()
        .map(|(_k, v)| serde_json::from_slice(&v).unwrap())
        .collect()
}

pub fn utxo_ids(db: &Db) -> Vec<Hash> {
    let mut ids: Vec<Hash> = utxos(db).into_iter().map(|u| u.output_id).collect();
    ids.sort();

    ids
}
