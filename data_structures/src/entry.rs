//! Transactions are expanded into a graph of entries. Every entry is identified by the hash of
//! its contents, so identical entries share an id and different entries never do.
//!
//! * `Spend` consumes a previously created `Output`, referenced by `spent_output_id`.
//! * `Issuance` creates new units of an asset out of nothing.
//! * `Mux` gathers the values of all the spends and issuances of a transaction.
//! * `Output` locks part of the muxed value under a control program.
//! * `Retirement` destroys part of the muxed value.

use serde::{Deserialize, Serialize};
use tessera_crypto::hash::Sha256Writer;

use crate::{
    chain::{AssetAmount, Hash},
    serialization_helpers::hex_bytes,
};

/// Where the value of an entry comes from: the `position`-th value of entry `reference`
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ValueSource {
    pub reference: Hash,
    pub value: AssetAmount,
    pub position: u64,
}

impl ValueSource {
    fn write_for_hash(&self, w: &mut Sha256Writer) {
        w.write(self.reference.as_ref())
            .write(self.value.asset_id.0.as_ref())
            .write(&self.value.amount.to_le_bytes())
            .write(&self.position.to_le_bytes());
    }
}

/// A program together with the version of the virtual machine that runs it
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub vm_version: u64,
    #[serde(with = "hex_bytes")]
    pub code: Vec<u8>,
}

impl Program {
    pub fn new(vm_version: u64, code: Vec<u8>) -> Self {
        Self { vm_version, code }
    }

    fn write_for_hash(&self, w: &mut Sha256Writer) {
        w.write(&self.vm_version.to_le_bytes())
            .write_var_bytes(&self.code);
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Mux {
    pub sources: Vec<ValueSource>,
    pub program: Program,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Spend {
    pub spent_output_id: Hash,
    /// Hash of the reference data attached to the input
    pub data: Hash,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Issuance {
    pub nonce_hash: Hash,
    pub value: AssetAmount,
    /// Hash of the reference data attached to the input
    pub data: Hash,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub source: ValueSource,
    pub control_program: Program,
    /// Hash of the reference data attached to the output
    pub data: Hash,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Retirement {
    pub source: ValueSource,
    /// Hash of the reference data attached to the output
    pub data: Hash,
}

/// Any node of the transaction graph
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Entry {
    Mux(Mux),
    Spend(Spend),
    Issuance(Issuance),
    Output(Output),
    Retirement(Retirement),
}

impl Entry {
    /// Name of the variant, used as domain separator when hashing and in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Entry::Mux(_) => "mux1",
            Entry::Spend(_) => "spend1",
            Entry::Issuance(_) => "issuance1",
            Entry::Output(_) => "output1",
            Entry::Retirement(_) => "retirement1",
        }
    }

    /// Content-addressed id of the entry
    pub fn id(&self) -> Hash {
        let mut w = Sha256Writer::default();
        w.write_var_bytes(b"entryid")
            .write_var_bytes(self.type_name().as_bytes());

        match self {
            Entry::Mux(mux) => {
                w.write(&(mux.sources.len() as u64).to_le_bytes());
                for source in &mux.sources {
                    source.write_for_hash(&mut w);
                }
                mux.program.write_for_hash(&mut w);
            }
            Entry::Spend(spend) => {
                w.write(spend.spent_output_id.as_ref())
                    .write(spend.data.as_ref());
            }
            Entry::Issuance(issuance) => {
                w.write(issuance.nonce_hash.as_ref())
                    .write(issuance.value.asset_id.0.as_ref())
                    .write(&issuance.value.amount.to_le_bytes())
                    .write(issuance.data.as_ref());
            }
            Entry::Output(output) => {
                output.source.write_for_hash(&mut w);
                output.control_program.write_for_hash(&mut w);
                w.write(output.data.as_ref());
            }
            Entry::Retirement(retirement) => {
                retirement.source.write_for_hash(&mut w);
                w.write(retirement.data.as_ref());
            }
        }

        w.finish().into()
    }
}
