//! Maintenance of the account UTXO index.
//!
//! Every confirmed block is applied in two steps, both queued into the same `WriteBatch`:
//!
//! 1. the outputs created by the block are added to the index, but only those whose control
//!    program belongs to a tracked account;
//! 2. the outputs spent by the block are deleted from the index, whoever owned them.
//!
//! Reverting a block undoes it the other way around: the outputs it spent are restored (again
//! only those owned by a tracked account) and every output it created is deleted.
//!
//! The batch is never written here, the caller commits it together with the rest of the block
//! update.

use std::collections::BTreeMap;

use tessera_data_structures::chain::{Block, Hash, Hashable};
use tessera_storage::storage::WriteBatch;

use crate::{
    account::{self, ControlProgramRegistry},
    keys,
    model::{AccountOutput, AccountUtxo, RawOutput},
    Error, Result,
};


/// Ids of every output spent by the transactions of `block`, owned by a tracked account or not
pub fn spent_output_ids(block: &Block) -> Vec<Hash> {
    let mut ids = vec![];
    for tx in &block.transactions {
        for input_id in &tx.input_ids {
            // Issuances do not spend anything
            if let Ok(spend) = tx.spend(input_id) {
                ids.push(spend.spent_output_id);
            }
        }
    }

    ids
}

/// Outputs spent by the transactions of `block`
pub fn spent_outputs(block: &Block) -> Vec<RawOutput> {
    let mut outputs = vec![];
    for tx in &block.transactions {
        for input_id in &tx.input_ids {
            let spend = match tx.spend(input_id) {
                Ok(spend) => spend,
                Err(_) => continue,
            };
            let output = match tx.output(&spend.spent_output_id) {
                Ok(output) => output,
                Err(_) => continue,
            };

            outputs.push(RawOutput {
                output_id: spend.spent_output_id,
                asset_amount: output.source.value,
                control_program: output.control_program.code.clone(),
                tx_hash: tx.hash(),
                output_index: 0,
                source_id: output.source.reference,
                source_pos: output.source.position,
                ref_data: output.data,
            });
        }
    }

    outputs
}

/// Outputs created by the transactions of `block`. Retirements are not outputs.
pub fn created_outputs(block: &Block) -> Vec<RawOutput> {
    let mut outputs = vec![];
    for tx in &block.transactions {
        for (index, (tx_output, result_id)) in
            tx.data.outputs.iter().zip(&tx.result_ids).enumerate()
        {
            let output = match tx.output(result_id) {
                Ok(output) => output,
                Err(_) => continue,
            };

            outputs.push(RawOutput {
                output_id: *result_id,
                asset_amount: tx_output.asset_amount,
                control_program: tx_output.control_program.clone(),
                tx_hash: tx.hash(),
                output_index: index,
                source_id: output.source.reference,
                source_pos: output.source.position,
                ref_data: output.data,
            });
        }
    }

    outputs
}

/// Queue an upsert of the index record of every output in `outputs`
pub fn upsert_confirmed_account_outputs(
    batch: &mut WriteBatch,
    outputs: &[AccountOutput],
) -> Result<()> {
    for output in outputs {
        let utxo = AccountUtxo::from(output);
        let value = serde_json::to_vec(&utxo).map_err(|source| Error::EncodeUtxo {
            output_id: utxo.output_id,
            source,
        })?;

        batch.put(keys::account_utxo(&utxo.output_id), value);
    }

    Ok(())
}

/// Applies and reverts blocks on the account UTXO index, resolving ownership through `R`
#[derive(Clone, Debug)]
pub struct Indexer<R> {
    registry: R,
}

impl<R: ControlProgramRegistry> Indexer<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Attach ownership metadata to the outputs controlled by a tracked account, dropping the
    /// rest.
    ///
    /// Outputs are grouped by control program so that the registry is queried once per distinct
    /// program. A program with malformed registry metadata is treated as unknown.
    pub fn load_account_info(&self, outputs: Vec<RawOutput>) -> Result<Vec<AccountOutput>> {
        let mut by_program: BTreeMap<Vec<u8>, Vec<RawOutput>> = BTreeMap::new();
        for output in outputs {
            by_program
                .entry(output.control_program.clone())
                .or_default()
                .push(output);
        }

        let mut result = vec![];
        for (program, outputs) in by_program {
            let ctrl = match account::resolve(&self.registry, &program)? {
                Some(ctrl) => ctrl,
                None => continue,
            };

            result.extend(outputs.into_iter().map(|raw| AccountOutput {
                raw,
                account_id: ctrl.account_id.clone(),
                key_index: ctrl.key_index,
                change: ctrl.change,
            }));
        }

        Ok(result)
    }

    /// Queue the index updates of confirming `block`
    pub fn build_account_utxos(&self, batch: &mut WriteBatch, block: &Block) -> Result<()> {
        let owned = self.load_account_info(created_outputs(block))?;
        upsert_confirmed_account_outputs(batch, &owned).map_err(|e| {
            log::error!(
                "Failed to index block {} at height {}: {}",
                block.hash(),
                block.height(),
                e
            );
            e
        })?;

        // After the upserts, so that an output created and spent in this block is not kept
        let spent_ids = spent_output_ids(block);
        for output_id in &spent_ids {
            batch.delete(keys::account_utxo(output_id));
        }

        log::debug!(
            "Confirmed block {} at height {}: {} spent outputs removed, {} account outputs indexed",
            block.hash(),
            block.height(),
            spent_ids.len(),
            owned.len()
        );

        Ok(())
    }

    /// Queue the index updates of reverting `block`, which must be the last confirmed block
    pub fn reverse_account_utxos(&self, batch: &mut WriteBatch, block: &Block) -> Result<()> {
        let restored = self.load_account_info(spent_outputs(block))?;
        upsert_confirmed_account_outputs(batch, &restored).map_err(|e| {
            log::error!(
                "Failed to revert block {} at height {}: {}",
                block.hash(),
                block.height(),
                e
            );
            e
        })?;

        let created = created_outputs(block);
        for output in &created {
            batch.delete(keys::account_utxo(&output.output_id));
        }

        log::debug!(
            "Reverted block {} at height {}: {} account outputs restored, {} created outputs removed",
            block.hash(),
            block.height(),
            restored.len(),
            created.len()
        );

        Ok(())
    }
}
