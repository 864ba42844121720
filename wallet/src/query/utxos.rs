use std::collections::BTreeMap;

use tessera_data_structures::chain::AssetId;
use tessera_storage::storage::Storage;

use crate::{
    keys,
    model::{AccountUtxo, Balance},
    Error, Result,
};

/// Committed records of the account UTXO index, in key order. If `account_id` is given, only
/// the records of that account are returned.
pub fn list_account_utxos<S: Storage + ?Sized>(
    storage: &S,
    account_id: Option<&str>,
) -> Result<Vec<AccountUtxo>> {
    let mut utxos = vec![];
    for (key, value) in storage.prefix_iterator(keys::ACCOUNT_UTXO_PREFIX)? {
        let utxo: AccountUtxo =
            serde_json::from_slice(&value).map_err(|source| Error::Decode {
                what: "account utxo",
                key: hex::encode(&key),
                source,
            })?;

        if account_id.map_or(true, |id| id == utxo.account_id) {
            utxos.push(utxo);
        }
    }

    Ok(utxos)
}

/// Unspent amount of every asset held by `account_id`
pub fn account_balances<S: Storage + ?Sized>(
    storage: &S,
    account_id: &str,
) -> Result<Vec<Balance>> {
    let mut totals: BTreeMap<AssetId, u64> = BTreeMap::new();
    for utxo in list_account_utxos(storage, Some(account_id))? {
        let total = totals.entry(utxo.asset_id).or_default();
        *total = total
            .checked_add(utxo.amount)
            .ok_or_else(|| Error::BalanceOverflow(utxo.asset_id.to_string()))?;
    }

    Ok(totals
        .into_iter()
        .map(|(asset_id, amount)| Balance {
            account_id: account_id.to_string(),
            asset_id,
            amount,
        })
        .collect())
}
