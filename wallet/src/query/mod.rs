//! Read side of the wallet: the account UTXO index as seen by downstream consumers, and the
//! annotated projection of confirmed transactions.

pub mod annotated;
mod utxos;

pub use annotated::{
    annotate_accounts, annotate_block, build_annotated_transaction, AnnotatedInput, AnnotatedOutput,
    AnnotatedTx,
};
pub use utxos::{account_balances, list_account_utxos};
