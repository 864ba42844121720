//! Human-oriented view of confirmed transactions, as returned to API consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use tessera_data_structures::{
    chain::{is_unspendable, AssetId, Block, Hash, Hashable},
    serialization_helpers::hex_bytes,
    transaction::{Transaction, TxInput},
};

use crate::{
    account::{self, ControlProgramRegistry},
    Result,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Spend,
    Issue,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    /// Spendable output
    Control,
    /// Output that destroys its value
    Retire,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedTx {
    pub tx_id: Hash,
    pub timestamp: DateTime<Utc>,
    pub block_id: Hash,
    pub block_height: u64,
    /// Position of the transaction in its block
    pub position: usize,
    pub block_transactions_count: usize,
    pub reference_data: Value,
    pub inputs: Vec<AnnotatedInput>,
    pub outputs: Vec<AnnotatedOutput>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedInput {
    #[serde(rename = "type")]
    pub input_type: InputType,
    pub asset_id: AssetId,
    pub asset_definition: Value,
    pub asset_tags: Value,
    pub amount: u64,
    #[serde(default, with = "hex_bytes", skip_serializing_if = "Vec::is_empty")]
    pub issuance_program: Vec<u8>,
    #[serde(skip)]
    pub control_program: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent_output_id: Option<Hash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub reference_data: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedOutput {
    #[serde(rename = "type")]
    pub output_type: OutputType,
    #[serde(rename = "id")]
    pub output_id: Hash,
    pub transaction_id: Hash,
    pub position: usize,
    pub asset_id: AssetId,
    pub asset_definition: Value,
    pub asset_tags: Value,
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(with = "hex_bytes")]
    pub control_program: Vec<u8>,
    pub reference_data: Value,
}

/// Whether `bytes` is a well-formed JSON document
pub fn is_valid_json(bytes: &[u8]) -> bool {
    serde_json::from_slice::<Value>(bytes).is_ok()
}

fn empty_json_object() -> Value {
    Value::Object(Map::new())
}

/// Reference data as JSON, or an empty object if it is not valid JSON
fn reference_data(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| empty_json_object())
}

fn block_time(block: &Block) -> DateTime<Utc> {
    i64::try_from(block.time())
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_default()
}

/// Annotated view of `tx`, the transaction at `position` in `block`
pub fn build_annotated_transaction(
    tx: &Transaction,
    block: &Block,
    position: usize,
) -> AnnotatedTx {
    let inputs = tx
        .data
        .inputs
        .iter()
        .zip(&tx.input_ids)
        .map(|(input, input_id)| build_annotated_input(tx, input, input_id))
        .collect();
    let outputs = tx
        .data
        .outputs
        .iter()
        .zip(&tx.result_ids)
        .enumerate()
        .map(|(index, (output, output_id))| AnnotatedOutput {
            output_type: if is_unspendable(&output.control_program) {
                OutputType::Retire
            } else {
                OutputType::Control
            },
            output_id: *output_id,
            transaction_id: tx.hash(),
            position: index,
            asset_id: output.asset_amount.asset_id,
            asset_definition: empty_json_object(),
            asset_tags: empty_json_object(),
            amount: output.asset_amount.amount,
            account_id: None,
            control_program: output.control_program.clone(),
            reference_data: reference_data(&output.reference_data),
        })
        .collect();

    AnnotatedTx {
        tx_id: tx.hash(),
        timestamp: block_time(block),
        block_id: block.hash(),
        block_height: block.height(),
        position,
        block_transactions_count: block.transactions.len(),
        reference_data: reference_data(&tx.data.reference_data),
        inputs,
        outputs,
    }
}

fn build_annotated_input(tx: &Transaction, input: &TxInput, input_id: &Hash) -> AnnotatedInput {
    let (input_type, spent_output_id) = match input {
        TxInput::Spend(_) => (
            InputType::Spend,
            tx.spend(input_id).ok().map(|spend| spend.spent_output_id),
        ),
        TxInput::Issuance(_) => (InputType::Issue, None),
    };

    AnnotatedInput {
        input_type,
        asset_id: input.asset_id(),
        asset_definition: empty_json_object(),
        asset_tags: empty_json_object(),
        amount: input.amount(),
        issuance_program: input.issuance_program().to_vec(),
        control_program: input.control_program().to_vec(),
        spent_output_id,
        account_id: None,
        reference_data: reference_data(input.reference_data()),
    }
}

/// Fill in the owning account of every spent and created output controlled by a tracked account
pub fn annotate_accounts<R: ControlProgramRegistry + ?Sized>(
    registry: &R,
    txs: &mut [AnnotatedTx],
) -> Result<()> {
    for tx in txs {
        for input in &mut tx.inputs {
            if input.input_type == InputType::Spend {
                input.account_id =
                    account::resolve(registry, &input.control_program)?.map(|c| c.account_id);
            }
        }
        for output in &mut tx.outputs {
            if output.output_type == OutputType::Control {
                output.account_id =
                    account::resolve(registry, &output.control_program)?.map(|c| c.account_id);
            }
        }
    }

    Ok(())
}

/// Annotated view of every transaction of `block`, with account ownership filled in
pub fn annotate_block<R: ControlProgramRegistry + ?Sized>(
    registry: &R,
    block: &Block,
) -> Result<Vec<AnnotatedTx>> {
    let mut txs: Vec<AnnotatedTx> = block
        .transactions
        .iter()
        .enumerate()
        .map(|(position, tx)| build_annotated_transaction(tx, block, position))
        .collect();
    annotate_accounts(registry, &mut txs)?;

    Ok(txs)
}
