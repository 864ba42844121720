use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tessera_crypto::hash::{calculate_sha256, Sha256Writer};

use crate::{
    chain::{is_unspendable, AssetAmount, AssetId, Hash, Hashable, OP_TRUE},
    entry::{Entry, Issuance, Mux, Output, Program, Retirement, Spend, ValueSource},
    error::EntryError,
    serialization_helpers::hex_bytes,
};

/// Everything needed to rebuild the output entry consumed by a spend
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpendCommitment {
    pub asset_amount: AssetAmount,
    pub source_id: Hash,
    pub source_position: u64,
    pub vm_version: u64,
    #[serde(with = "hex_bytes")]
    pub control_program: Vec<u8>,
    /// Hash of the reference data of the spent output
    pub ref_data_hash: Hash,
}

impl SpendCommitment {
    fn prevout(&self) -> Output {
        Output {
            source: ValueSource {
                reference: self.source_id,
                value: self.asset_amount,
                position: self.source_position,
            },
            control_program: Program::new(self.vm_version, self.control_program.clone()),
            data: self.ref_data_hash,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpendInput {
    pub spend_commitment: SpendCommitment,
    pub arguments: Vec<Vec<u8>>,
    #[serde(with = "hex_bytes")]
    pub reference_data: Vec<u8>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct IssuanceInput {
    #[serde(with = "hex_bytes")]
    pub nonce: Vec<u8>,
    pub amount: u64,
    #[serde(with = "hex_bytes")]
    pub asset_definition: Vec<u8>,
    pub vm_version: u64,
    #[serde(with = "hex_bytes")]
    pub issuance_program: Vec<u8>,
    pub arguments: Vec<Vec<u8>>,
    #[serde(with = "hex_bytes")]
    pub reference_data: Vec<u8>,
}

impl IssuanceInput {
    pub fn asset_id(&self) -> AssetId {
        AssetId::compute(
            self.vm_version,
            &self.issuance_program,
            &self.asset_definition,
        )
    }
}

/// Transaction input in its wire form
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TxInput {
    Spend(SpendInput),
    Issuance(IssuanceInput),
}

impl TxInput {
    pub fn asset_id(&self) -> AssetId {
        match self {
            TxInput::Spend(spend) => spend.spend_commitment.asset_amount.asset_id,
            TxInput::Issuance(issuance) => issuance.asset_id(),
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            TxInput::Spend(spend) => spend.spend_commitment.asset_amount.amount,
            TxInput::Issuance(issuance) => issuance.amount,
        }
    }

    /// Control program of the output being spent, empty for issuances
    pub fn control_program(&self) -> &[u8] {
        match self {
            TxInput::Spend(spend) => &spend.spend_commitment.control_program,
            TxInput::Issuance(_) => &[],
        }
    }

    /// Issuance program, empty for spends
    pub fn issuance_program(&self) -> &[u8] {
        match self {
            TxInput::Spend(_) => &[],
            TxInput::Issuance(issuance) => &issuance.issuance_program,
        }
    }

    pub fn reference_data(&self) -> &[u8] {
        match self {
            TxInput::Spend(spend) => &spend.reference_data,
            TxInput::Issuance(issuance) => &issuance.reference_data,
        }
    }
}

/// Transaction output in its wire form
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TxOutput {
    pub asset_amount: AssetAmount,
    pub vm_version: u64,
    #[serde(with = "hex_bytes")]
    pub control_program: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub reference_data: Vec<u8>,
}

impl TxOutput {
    pub fn new(asset_id: AssetId, amount: u64, control_program: Vec<u8>) -> Self {
        Self {
            asset_amount: AssetAmount::new(asset_id, amount),
            vm_version: 1,
            control_program,
            reference_data: vec![],
        }
    }
}

/// Transaction in its wire form
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TxData {
    pub version: u64,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    #[serde(with = "hex_bytes")]
    pub reference_data: Vec<u8>,
}

/// A transaction together with its entry graph.
///
/// `input_ids[i]` is the id of the spend or issuance entry built from `inputs[i]`, and
/// `result_ids[j]` the id of the output or retirement entry built from `outputs[j]`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "TxData", into = "TxData")]
pub struct Transaction {
    pub data: TxData,
    pub id: Hash,
    pub entries: HashMap<Hash, Entry>,
    pub input_ids: Vec<Hash>,
    pub result_ids: Vec<Hash>,
}

impl Default for Transaction {
    fn default() -> Self {
        Transaction::new(TxData::default())
    }
}

impl From<TxData> for Transaction {
    fn from(data: TxData) -> Self {
        Transaction::new(data)
    }
}

impl From<Transaction> for TxData {
    fn from(tx: Transaction) -> Self {
        tx.data
    }
}

impl Hashable for Transaction {
    fn hash(&self) -> Hash {
        self.id
    }
}

impl Transaction {
    /// Build the entry graph of a transaction
    pub fn new(data: TxData) -> Self {
        let mut entries = HashMap::new();
        let mut input_ids = Vec::with_capacity(data.inputs.len());
        let mut mux_sources = Vec::with_capacity(data.inputs.len());

        for input in &data.inputs {
            let (entry, value) = match input {
                TxInput::Spend(spend) => {
                    let prevout = Entry::Output(spend.spend_commitment.prevout());
                    let spent_output_id = prevout.id();
                    entries.insert(spent_output_id, prevout);

                    let entry = Entry::Spend(Spend {
                        spent_output_id,
                        data: calculate_sha256(&spend.reference_data).into(),
                    });

                    (entry, spend.spend_commitment.asset_amount)
                }
                TxInput::Issuance(issuance) => {
                    let value = AssetAmount::new(issuance.asset_id(), issuance.amount);
                    let entry = Entry::Issuance(Issuance {
                        nonce_hash: calculate_sha256(&issuance.nonce).into(),
                        value,
                        data: calculate_sha256(&issuance.reference_data).into(),
                    });

                    (entry, value)
                }
            };

            let id = entry.id();
            entries.insert(id, entry);
            input_ids.push(id);
            mux_sources.push(ValueSource {
                reference: id,
                value,
                position: 0,
            });
        }

        let mux = Entry::Mux(Mux {
            sources: mux_sources,
            program: Program::new(1, vec![OP_TRUE]),
        });
        let mux_id = mux.id();
        entries.insert(mux_id, mux);

        let mut result_ids = Vec::with_capacity(data.outputs.len());
        for (position, output) in data.outputs.iter().enumerate() {
            let source = ValueSource {
                reference: mux_id,
                value: output.asset_amount,
                position: position as u64,
            };
            let ref_data_hash: Hash = calculate_sha256(&output.reference_data).into();
            let entry = if is_unspendable(&output.control_program) {
                Entry::Retirement(Retirement {
                    source,
                    data: ref_data_hash,
                })
            } else {
                Entry::Output(Output {
                    source,
                    control_program: Program::new(
                        output.vm_version,
                        output.control_program.clone(),
                    ),
                    data: ref_data_hash,
                })
            };

            let id = entry.id();
            entries.insert(id, entry);
            result_ids.push(id);
        }

        let mut header = Sha256Writer::default();
        header
            .write_var_bytes(b"txheader")
            .write(&data.version.to_le_bytes())
            .write(&(result_ids.len() as u64).to_le_bytes());
        for result_id in &result_ids {
            header.write(result_id.as_ref());
        }
        header.write(calculate_sha256(&data.reference_data).as_ref());
        let id = header.finish().into();

        Self {
            data,
            id,
            entries,
            input_ids,
            result_ids,
        }
    }

    pub fn entry(&self, id: &Hash) -> Result<&Entry, EntryError> {
        self.entries.get(id).ok_or(EntryError::MissingEntry(*id))
    }

    /// Resolve `id` as a spend entry
    pub fn spend(&self, id: &Hash) -> Result<&Spend, EntryError> {
        match self.entry(id)? {
            Entry::Spend(spend) => Ok(spend),
            other => Err(EntryError::WrongType {
                id: *id,
                expected: "spend1",
                actual: other.type_name(),
            }),
        }
    }

    /// Resolve `id` as an issuance entry
    pub fn issuance(&self, id: &Hash) -> Result<&Issuance, EntryError> {
        match self.entry(id)? {
            Entry::Issuance(issuance) => Ok(issuance),
            other => Err(EntryError::WrongType {
                id: *id,
                expected: "issuance1",
                actual: other.type_name(),
            }),
        }
    }

    /// Resolve `id` as an output entry. Retirements are not outputs.
    pub fn output(&self, id: &Hash) -> Result<&Output, EntryError> {
        match self.entry(id)? {
            Entry::Output(output) => Ok(output),
            other => Err(EntryError::WrongType {
                id: *id,
                expected: "output1",
                actual: other.type_name(),
            }),
        }
    }

    /// Id of the entry created by the output at `index`
    pub fn output_id(&self, index: usize) -> Option<&Hash> {
        self.result_ids.get(index)
    }

    /// Build the commitment needed to spend the output at `index`. Returns `None` if there is no
    /// such output or if it is a retirement.
    pub fn spend_commitment(&self, index: usize) -> Option<SpendCommitment> {
        let id = self.output_id(index)?;
        let output = self.output(id).ok()?;

        Some(SpendCommitment {
            asset_amount: output.source.value,
            source_id: output.source.reference,
            source_position: output.source.position,
            vm_version: output.control_program.vm_version,
            control_program: output.control_program.code.clone(),
            ref_data_hash: output.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::OP_FAIL;

    fn issuance(nonce: &[u8], amount: u64) -> TxInput {
        TxInput::Issuance(IssuanceInput {
            nonce: nonce.to_vec(),
            amount,
            asset_definition: b"{}".to_vec(),
            vm_version: 1,
            issuance_program: vec![OP_TRUE],
            arguments: vec![],
            reference_data: vec![],
        })
    }

    fn issue_tx(nonce: &[u8], outputs: Vec<TxOutput>) -> Transaction {
        Transaction::new(TxData {
            version: 1,
            inputs: vec![issuance(nonce, 100)],
            outputs,
            reference_data: vec![],
        })
    }

    #[test]
    fn test_issuance_input_is_not_a_spend() {
        let asset = issuance(b"n", 100).asset_id();
        let tx = issue_tx(b"n", vec![TxOutput::new(asset, 100, vec![0x00])]);
        let input_id = tx.input_ids[0];

        assert!(tx.issuance(&input_id).is_ok());
        assert_eq!(
            tx.spend(&input_id),
            Err(EntryError::WrongType {
                id: input_id,
                expected: "spend1",
                actual: "issuance1",
            })
        );
    }

    #[test]
    fn test_retirement_is_not_an_output() {
        let asset = issuance(b"n", 100).asset_id();
        let tx = issue_tx(
            b"n",
            vec![
                TxOutput::new(asset, 60, vec![0x00]),
                TxOutput::new(asset, 40, vec![OP_FAIL]),
            ],
        );

        assert!(tx.output(&tx.result_ids[0]).is_ok());
        assert!(tx.output(&tx.result_ids[1]).is_err());
        assert!(tx.spend_commitment(1).is_none());
    }

    #[test]
    fn test_spend_references_spent_output_id() {
        let asset = issuance(b"n", 100).asset_id();
        let tx1 = issue_tx(b"n", vec![TxOutput::new(asset, 100, vec![0x00, 0x01])]);
        let commitment = tx1.spend_commitment(0).unwrap();
        let tx2 = Transaction::new(TxData {
            version: 1,
            inputs: vec![TxInput::Spend(SpendInput {
                spend_commitment: commitment,
                arguments: vec![],
                reference_data: vec![],
            })],
            outputs: vec![TxOutput::new(asset, 100, vec![0x00, 0x02])],
            reference_data: vec![],
        });

        let spend = tx2.spend(&tx2.input_ids[0]).unwrap();
        assert_eq!(&spend.spent_output_id, tx1.output_id(0).unwrap());
        // The spent output is part of the spending transaction's graph
        let prevout = tx2.output(&spend.spent_output_id).unwrap();
        assert_eq!(prevout.control_program.code, vec![0x00, 0x01]);
    }

    #[test]
    fn test_different_nonces_give_different_output_ids() {
        let asset = issuance(b"a", 100).asset_id();
        let out = TxOutput::new(asset, 100, vec![0x00]);
        let tx1 = issue_tx(b"a", vec![out.clone()]);
        let tx2 = issue_tx(b"b", vec![out]);

        assert_ne!(tx1.id, tx2.id);
        assert_ne!(tx1.output_id(0), tx2.output_id(0));
    }

    #[test]
    fn test_missing_entry() {
        let tx = Transaction::default();
        let id = Hash::SHA256([9; 32]);

        assert_eq!(tx.entry(&id), Err(EntryError::MissingEntry(id)));
    }
}
