use tessera_data_structures::chain::{Block, Hashable};
use tessera_storage::storage::{Storage, WriteBatch};

use crate::{
    account::{ControlProgramRegistry, StorageRegistry},
    indexer::Indexer,
    keys,
    model::{AccountUtxo, Balance, WalletStatus},
    query::{self, AnnotatedTx},
    Error, Result,
};

/// A wallet following the best chain.
///
/// Blocks are attached and detached one at a time, in chain order. Every block update is
/// committed as a single batch that also moves the wallet status, so readers never observe half
/// of a block.
pub struct Wallet<S, R> {
    db: S,
    indexer: Indexer<R>,
}

impl<S: Storage + Clone> Wallet<S, StorageRegistry<S>> {
    /// Wallet whose control program registry lives in the same storage as the index
    pub fn from_storage(db: S) -> Self {
        let registry = StorageRegistry::new(db.clone());

        Self::new(db, registry)
    }
}

impl<S: Storage, R: ControlProgramRegistry> Wallet<S, R> {
    pub fn new(db: S, registry: R) -> Self {
        Self {
            db,
            indexer: Indexer::new(registry),
        }
    }

    /// Last block applied to the wallet, `None` if no block has been applied yet
    pub fn status(&self) -> Result<Option<WalletStatus>> {
        let key = keys::wallet_status();
        match self.db.get(key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| Error::Decode {
                    what: "wallet status",
                    key: hex::encode(key),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Apply a newly confirmed block. It must be the child of the current wallet tip.
    pub fn attach_block(&self, block: &Block) -> Result<()> {
        if let Some(tip) = self.status()? {
            let extends_tip = block.header.previous_block_hash == tip.hash
                && tip.height.checked_add(1) == Some(block.height());
            if !extends_tip {
                return Err(Error::NotChild {
                    hash: block.hash(),
                    height: block.height(),
                    tip_hash: tip.hash,
                    tip_height: tip.height,
                });
            }
        }

        let mut batch = WriteBatch::default();
        self.indexer.build_account_utxos(&mut batch, block)?;
        self.put_status(
            &mut batch,
            WalletStatus {
                height: block.height(),
                hash: block.hash(),
            },
        )?;
        self.db.write(batch)?;

        log::info!(
            "Wallet attached block {} at height {}",
            block.hash(),
            block.height()
        );

        Ok(())
    }

    /// Revert a block that is leaving the best chain. It must be the current wallet tip.
    pub fn detach_block(&self, block: &Block) -> Result<()> {
        let hash = block.hash();
        let tip = self.status()?.ok_or(Error::EmptyWallet(hash))?;
        if tip.hash != hash {
            return Err(Error::NotTip {
                hash,
                tip_hash: tip.hash,
            });
        }

        let mut batch = WriteBatch::default();
        self.indexer.reverse_account_utxos(&mut batch, block)?;
        self.put_status(
            &mut batch,
            WalletStatus {
                height: block.height().saturating_sub(1),
                hash: block.header.previous_block_hash,
            },
        )?;
        self.db.write(batch)?;

        log::info!(
            "Wallet detached block {} at height {}",
            hash,
            block.height()
        );

        Ok(())
    }

    fn put_status(&self, batch: &mut WriteBatch, status: WalletStatus) -> Result<()> {
        let value = serde_json::to_vec(&status).map_err(|source| Error::Encode {
            what: "wallet status",
            source,
        })?;
        batch.put(keys::wallet_status().to_vec(), value);

        Ok(())
    }

    /// Unspent outputs of tracked accounts, optionally restricted to one account
    pub fn utxos(&self, account_id: Option<&str>) -> Result<Vec<AccountUtxo>> {
        query::list_account_utxos(&self.db, account_id)
    }

    pub fn balances(&self, account_id: &str) -> Result<Vec<Balance>> {
        query::account_balances(&self.db, account_id)
    }

    /// Annotated view of the transactions of `block`, from the point of view of this wallet
    pub fn annotated_block(&self, block: &Block) -> Result<Vec<AnnotatedTx>> {
        query::annotate_block(self.indexer.registry(), block)
    }
}

#[cfg(test)]
mod tests {
    use tessera_data_structures::chain::Hash;

    use super::*;
    use crate::{
        account::{CtrlProgram, RegistryError},
        factories::{self, Db},
    };

    fn wallet(db: &Db) -> Wallet<Db, StorageRegistry<Db>> {
        Wallet::from_storage(db.clone())
    }

    #[test]
    fn test_attach_and_detach_move_status() {
        let db = factories::db();
        factories::register(&db, "acc1", &factories::program(1), 0);
        let wallet = wallet(&db);
        let tx = factories::issue(b"t1", vec![factories::output(10, factories::program(1))]);
        let b1 = factories::block(1, None, vec![tx]);

        assert_eq!(wallet.status().unwrap(), None);

        wallet.attach_block(&b1).unwrap();
        assert_eq!(
            wallet.status().unwrap(),
            Some(WalletStatus {
                height: 1,
                hash: b1.hash()
            })
        );
        assert_eq!(wallet.utxos(Some("acc1")).unwrap().len(), 1);

        wallet.detach_block(&b1).unwrap();
        assert_eq!(
            wallet.status().unwrap(),
            Some(WalletStatus {
                height: 0,
                hash: Hash::default()
            })
        );
        assert!(wallet.utxos(None).unwrap().is_empty());
    }

    #[test]
    fn test_attach_rejects_block_not_extending_tip() {
        let db = factories::db();
        let wallet = wallet(&db);
        let b1 = factories::block(1, None, vec![]);
        let b2 = factories::block(2, Some(&b1), vec![]);
        let orphan = factories::block(2, None, vec![]);

        wallet.attach_block(&b1).unwrap();

        assert!(matches!(
            wallet.attach_block(&orphan),
            Err(Error::NotChild { .. })
        ));
        // Same parent, wrong height
        let skipped = factories::block(3, Some(&b1), vec![]);
        assert!(matches!(
            wallet.attach_block(&skipped),
            Err(Error::NotChild { .. })
        ));
        wallet.attach_block(&b2).unwrap();
        assert_eq!(wallet.status().unwrap().unwrap().height, 2);
    }

    #[test]
    fn test_detach_requires_tip() {
        let db = factories::db();
        let wallet = wallet(&db);
        let b1 = factories::block(1, None, vec![]);
        let b2 = factories::block(2, Some(&b1), vec![]);

        assert!(matches!(
            wallet.detach_block(&b1),
            Err(Error::EmptyWallet(_))
        ));

        wallet.attach_block(&b1).unwrap();
        wallet.attach_block(&b2).unwrap();

        assert!(matches!(
            wallet.detach_block(&b1),
            Err(Error::NotTip { .. })
        ));
        wallet.detach_block(&b2).unwrap();
        wallet.detach_block(&b1).unwrap();
    }

    #[test]
    fn test_balances() {
        let db = factories::db();
        factories::register(&db, "acc1", &factories::program(1), 0);
        let wallet = wallet(&db);
        let tx = factories::issue(
            b"t1",
            vec![
                factories::output(10, factories::program(1)),
                factories::output(15, factories::program(1)),
                factories::output(99, factories::program(2)),
            ],
        );

        wallet
            .attach_block(&factories::block(1, None, vec![tx]))
            .unwrap();

        let balances = wallet.balances("acc1").unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].amount, 25);
        assert_eq!(balances[0].asset_id, factories::asset());
    }

    struct BrokenRegistry;

    impl ControlProgramRegistry for BrokenRegistry {
        fn lookup(
            &self,
            _program_hash: &Hash,
        ) -> std::result::Result<Option<CtrlProgram>, RegistryError> {
            Err(RegistryError::Storage(anyhow::anyhow!("registry unavailable")))
        }

        fn account_exists(&self, _account_id: &str) -> std::result::Result<bool, RegistryError> {
            Ok(false)
        }
    }

    #[test]
    fn test_failed_block_update_commits_nothing() {
        let db = factories::db();
        factories::register(&db, "acc1", &factories::program(1), 0);
        let tx1 = factories::issue(b"t1", vec![factories::output(10, factories::program(1))]);
        let b1 = factories::block(1, None, vec![tx1.clone()]);
        wallet(&db).attach_block(&b1).unwrap();

        let tx2 = factories::spend(&[(&tx1, 0)], vec![factories::output(10, factories::program(1))]);
        let b2 = factories::block(2, Some(&b1), vec![tx2]);
        let broken = Wallet::new(db.clone(), BrokenRegistry);

        assert!(matches!(broken.attach_block(&b2), Err(Error::Storage(_))));
        // The spent output was not removed and the tip did not move
        assert_eq!(factories::utxo_ids(&db), vec![tx1.result_ids[0]]);
        assert_eq!(broken.status().unwrap().unwrap().hash, b1.hash());
    }
}
