use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use shared_types::{Actor, ActorType, Address, Amount, Hash, ParamValue, Pool};
use tracing::{debug, info};

use crate::domain::{BlockRecord, PersistenceError, TxResult, WorldState};
use crate::ports::{
    PersistenceModule, PersistenceRWContext, PersistenceReadContext,
};

#[derive(Default)]
struct Store {
    states: BTreeMap<u64, Arc<WorldState>>,
    blocks: BTreeMap<u64, BlockRecord>,
    tx_index: HashMap<Hash, TxResult>,
    writer: Option<u64>,
}

impl Store {
    fn latest(&self) -> (u64, Arc<WorldState>) {
        match self.states.last_key_value() {
            Some((height, state)) => (*height, Arc::clone(state)),
            None => (0, Arc::new(WorldState::default())),
        }
    }
}

/// In-memory persistence keeping one full snapshot per committed height.
#[derive(Clone)]
pub struct InMemoryPersistence {
    store: Arc<RwLock<Store>>,
}

impl InMemoryPersistence {
    /// Store with `genesis` committed at height 0.
    pub fn new(genesis: WorldState) -> Self {
        let mut store = Store::default();
        store.states.insert(0, Arc::new(genesis));
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Committed state as of `height`.
    pub fn state_at(&self, height: u64) -> Result<Arc<WorldState>, PersistenceError> {
        let store = self.store.read().map_err(|_| PersistenceError::LockPoisoned)?;
        store
            .states
            .range(..=height)
            .next_back()
            .map(|(_, state)| Arc::clone(state))
            .ok_or(PersistenceError::HeightNotFound { height })
    }
}

impl Default for InMemoryPersistence {
    fn default() -> Self {
        Self::new(WorldState::default())
    }
}

impl PersistenceModule for InMemoryPersistence {
    fn new_read_context(
        &self,
        height: u64,
    ) -> Result<Box<dyn PersistenceReadContext>, PersistenceError> {
        let state = self.state_at(height)?;
        Ok(Box::new(MemoryReadContext {
            height,
            state: Some(state),
            store: Arc::clone(&self.store),
        }))
    }

    fn new_rw_context(
        &self,
        height: u64,
    ) -> Result<Box<dyn PersistenceRWContext>, PersistenceError> {
        let mut store = self
            .store
            .write()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        if let Some(open_height) = store.writer {
            return Err(PersistenceError::WriterBusy { open_height });
        }
        let (latest, state) = store.latest();
        if height <= latest {
            return Err(PersistenceError::HeightAlreadyCommitted { height, latest });
        }
        store.writer = Some(height);
        debug!(height, base_height = latest, "[qc-04] Opened read-write context");

        Ok(Box::new(MemoryRWContext {
            height,
            store: Arc::clone(&self.store),
            working: (*state).clone(),
            save_points: Vec::new(),
            pending_txs: Vec::new(),
            open: true,
        }))
    }

    fn latest_height(&self) -> Result<u64, PersistenceError> {
        let store = self.store.read().map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(store.latest().0)
    }

    fn transaction_exists(&self, tx_hash: &Hash) -> Result<bool, PersistenceError> {
        let store = self.store.read().map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(store.tx_index.contains_key(tx_hash))
    }

    fn get_block(&self, height: u64) -> Result<Option<BlockRecord>, PersistenceError> {
        let store = self.store.read().map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(store.blocks.get(&height).cloned())
    }
}

/// Read path shared by both context kinds. Each type provides
/// `view_height`, `view`, `indexed` and `close`.
macro_rules! impl_read_context {
    ($ty:ty) => {
        impl PersistenceReadContext for $ty {
            fn height(&self) -> u64 {
                self.view_height()
            }

            fn get_account_amount(&self, address: &Address) -> Result<Amount, PersistenceError> {
                Ok(self
                    .view()?
                    .accounts
                    .get(address)
                    .cloned()
                    .unwrap_or_default())
            }

            fn get_pool_amount(&self, pool: Pool) -> Result<Amount, PersistenceError> {
                Ok(self.view()?.pools.get(&pool).cloned().unwrap_or_default())
            }

            fn get_actor(
                &self,
                actor_type: ActorType,
                address: &Address,
            ) -> Result<Option<Actor>, PersistenceError> {
                Ok(self.view()?.actors.get(&(actor_type, *address)).cloned())
            }

            fn get_actors(&self, actor_type: ActorType) -> Result<Vec<Actor>, PersistenceError> {
                Ok(self
                    .view()?
                    .actors
                    .range((actor_type, [0u8; 20])..=(actor_type, [0xFF; 20]))
                    .map(|(_, actor)| actor.clone())
                    .collect())
            }

            fn get_parameter(&self, name: &str) -> Result<Option<ParamValue>, PersistenceError> {
                Ok(self.view()?.params.get(name).cloned())
            }

            fn compute_state_hash(&self) -> Result<Hash, PersistenceError> {
                self.view()?.state_hash()
            }

            fn transaction_exists(&self, tx_hash: &Hash) -> Result<bool, PersistenceError> {
                self.view()?;
                self.indexed(tx_hash)
            }

            fn release(&mut self) {
                self.close();
            }
        }
    };
}

impl_read_context!(MemoryReadContext);
impl_read_context!(MemoryRWContext);

/// Immutable view of one committed snapshot.
pub struct MemoryReadContext {
    height: u64,
    state: Option<Arc<WorldState>>,
    store: Arc<RwLock<Store>>,
}

impl MemoryReadContext {
    fn view_height(&self) -> u64 {
        self.height
    }

    fn indexed(&self, tx_hash: &Hash) -> Result<bool, PersistenceError> {
        let store = self.store.read().map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(store
            .tx_index
            .get(tx_hash)
            .is_some_and(|result| result.height <= self.height))
    }

    fn view(&self) -> Result<&WorldState, PersistenceError> {
        self.state.as_deref().ok_or(PersistenceError::ContextClosed)
    }

    fn close(&mut self) {
        self.state = None;
    }
}

struct SavePoint {
    name: String,
    state: WorldState,
    pending_txs: usize,
}

/// Working copy of the latest state plus a stack of save points.
pub struct MemoryRWContext {
    height: u64,
    store: Arc<RwLock<Store>>,
    working: WorldState,
    save_points: Vec<SavePoint>,
    pending_txs: Vec<TxResult>,
    open: bool,
}

impl MemoryRWContext {
    fn working_mut(&mut self) -> Result<&mut WorldState, PersistenceError> {
        if !self.open {
            return Err(PersistenceError::ContextClosed);
        }
        Ok(&mut self.working)
    }

    fn free_writer_slot(&self) {
        if let Ok(mut store) = self.store.write() {
            if store.writer == Some(self.height) {
                store.writer = None;
            }
        }
    }
}

impl MemoryRWContext {
    fn view_height(&self) -> u64 {
        self.height
    }

    fn indexed(&self, tx_hash: &Hash) -> Result<bool, PersistenceError> {
        if self.pending_txs.iter().any(|tx| &tx.tx_hash == tx_hash) {
            return Ok(true);
        }
        let store = self.store.read().map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(store.tx_index.contains_key(tx_hash))
    }

    fn view(&self) -> Result<&WorldState, PersistenceError> {
        if !self.open {
            return Err(PersistenceError::ContextClosed);
        }
        Ok(&self.working)
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.save_points.clear();
            self.pending_txs.clear();
            self.free_writer_slot();
            debug!(height = self.height, "[qc-04] Released read-write context");
        }
    }
}

impl PersistenceRWContext for MemoryRWContext {
    fn set_account_amount(
        &mut self,
        address: &Address,
        amount: Amount,
    ) -> Result<(), PersistenceError> {
        self.working_mut()?.accounts.insert(*address, amount);
        Ok(())
    }

    fn set_pool_amount(&mut self, pool: Pool, amount: Amount) -> Result<(), PersistenceError> {
        self.working_mut()?.pools.insert(pool, amount);
        Ok(())
    }

    fn insert_actor(&mut self, actor: Actor) -> Result<(), PersistenceError> {
        let key = (actor.actor_type, actor.address);
        let actors = &mut self.working_mut()?.actors;
        if actors.contains_key(&key) {
            return Err(PersistenceError::ActorExists {
                actor_type: key.0,
                address: key.1,
            });
        }
        actors.insert(key, actor);
        Ok(())
    }

    fn update_actor(&mut self, actor: Actor) -> Result<(), PersistenceError> {
        let key = (actor.actor_type, actor.address);
        let slot = self
            .working_mut()?
            .actors
            .get_mut(&key)
            .ok_or(PersistenceError::ActorNotFound {
                actor_type: key.0,
                address: key.1,
            })?;
        *slot = actor;
        Ok(())
    }

    fn delete_actor(
        &mut self,
        actor_type: ActorType,
        address: &Address,
    ) -> Result<(), PersistenceError> {
        self.working_mut()?
            .actors
            .remove(&(actor_type, *address))
            .map(|_| ())
            .ok_or(PersistenceError::ActorNotFound {
                actor_type,
                address: *address,
            })
    }

    fn set_parameter(&mut self, name: &str, value: ParamValue) -> Result<(), PersistenceError> {
        self.working_mut()?.params.insert(name.to_string(), value);
        Ok(())
    }

    fn index_transaction(&mut self, result: TxResult) -> Result<(), PersistenceError> {
        self.working_mut()?;
        self.pending_txs.push(result);
        Ok(())
    }

    fn new_save_point(&mut self, name: &str) -> Result<(), PersistenceError> {
        let state = self.view()?.clone();
        if self.save_points.iter().any(|sp| sp.name == name) {
            return Err(PersistenceError::SavePointExists(name.to_string()));
        }
        self.save_points.push(SavePoint {
            name: name.to_string(),
            state,
            pending_txs: self.pending_txs.len(),
        });
        Ok(())
    }

    fn rollback_to_save_point(&mut self, name: &str) -> Result<(), PersistenceError> {
        self.working_mut()?;
        let index = self
            .save_points
            .iter()
            .rposition(|sp| sp.name == name)
            .ok_or_else(|| PersistenceError::SavePointNotFound(name.to_string()))?;
        let mut discarded = self.save_points.split_off(index);
        let save_point = discarded.swap_remove(0);
        self.working = save_point.state;
        self.pending_txs.truncate(save_point.pending_txs);
        Ok(())
    }

    fn release_save_point(&mut self, name: &str) -> Result<(), PersistenceError> {
        self.working_mut()?;
        let index = self
            .save_points
            .iter()
            .rposition(|sp| sp.name == name)
            .ok_or_else(|| PersistenceError::SavePointNotFound(name.to_string()))?;
        self.save_points.truncate(index);
        Ok(())
    }

    fn save_point_depth(&self) -> usize {
        self.save_points.len()
    }

    fn commit(
        &mut self,
        proposer: Address,
        quorum_certificate: Vec<u8>,
    ) -> Result<(), PersistenceError> {
        let state_hash = self.view()?.state_hash()?;
        let mut store = self
            .store
            .write()
            .map_err(|_| PersistenceError::LockPoisoned)?;

        let state = std::mem::take(&mut self.working);
        let txs = std::mem::take(&mut self.pending_txs);
        let tx_hashes = txs.iter().map(|tx| tx.tx_hash).collect();
        for tx in txs {
            store.tx_index.insert(tx.tx_hash, tx);
        }
        store.states.insert(self.height, Arc::new(state));
        store.blocks.insert(
            self.height,
            BlockRecord {
                height: self.height,
                proposer,
                quorum_certificate,
                state_hash,
                tx_hashes,
            },
        );
        if store.writer == Some(self.height) {
            store.writer = None;
        }
        drop(store);

        self.open = false;
        self.save_points.clear();
        info!(
            height = self.height,
            state_hash = %hex::encode(state_hash),
            proposer = %hex::encode(proposer),
            "[qc-04] Committed state"
        );
        Ok(())
    }
}

impl Drop for MemoryRWContext {
    fn drop(&mut self) {
        self.close();
    }
}
