//! Concrete Utility Service Implementation
//!
//! Wires persistence, the mempool and metrics together and hands out one
//! unit of work per height.

use std::sync::Arc;

use qc_04_state_management::{PersistenceModule, PersistenceReadContext};
use qc_06_mempool::{MempoolError, TxFifoMempool, TxMempool};
use shared_types::{
    transaction_hash, Actor, ActorType, Address, Hash, ParamValue, StakeStatus, Transaction,
};
use tracing::{debug, info};

use crate::{
    config::UtilityConfig,
    domain::{
        can_serve, param_kind, select_actors, session_id, session_start, validate_relay_chains,
        Message, ParamKind, Session, BLOCKS_PER_SESSION, FISHERMEN_PER_SESSION,
        SERVICERS_PER_SESSION,
    },
    error::{PersistenceResultExt, Result, UtilityError},
    metrics::Metrics,
    ports::{UnitOfWorkRole, UtilityApi},
    unit_of_work::{LeaderUnitOfWork, ReplicaUnitOfWork, UnitOfWork},
};

/// Concrete implementation of [`UtilityApi`]
pub struct UtilityModule {
    config: UtilityConfig,
    persistence: Arc<dyn PersistenceModule>,
    mempool: Arc<TxFifoMempool>,
    metrics: Arc<Metrics>,
}

impl UtilityModule {
    /// Create the service with a fresh mempool sized by `config`.
    pub fn new(config: UtilityConfig, persistence: Arc<dyn PersistenceModule>) -> Result<Self> {
        config.validate()?;
        info!("[qc-17] Initializing Utility Service");
        info!(
            max_transactions = config.mempool.max_transactions,
            max_total_bytes = config.mempool.max_total_bytes,
            max_block_transaction_bytes = config.max_block_transaction_bytes,
            "[qc-17] Limits"
        );
        let mempool = Arc::new(TxFifoMempool::new(config.mempool.clone()));
        Ok(Self {
            config,
            persistence,
            mempool,
            metrics: Arc::new(Metrics::new()),
        })
    }

    pub fn config(&self) -> &UtilityConfig {
        &self.config
    }

    pub fn mempool(&self) -> &Arc<TxFifoMempool> {
        &self.mempool
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    fn open_unit_of_work(&self, height: u64) -> Result<UnitOfWork> {
        let read_context = self
            .persistence
            .new_read_context(height.saturating_sub(1))
            .during("new_read_context")?;
        let rw_context = self
            .persistence
            .new_rw_context(height)
            .during("new_rw_context")?;
        let mempool: Arc<dyn TxMempool> = self.mempool.clone();
        Ok(UnitOfWork::new(
            height,
            read_context,
            rw_context,
            mempool,
            Arc::clone(&self.metrics),
        ))
    }

    pub fn new_leader_unit_of_work(&self, height: u64) -> Result<LeaderUnitOfWork> {
        Ok(LeaderUnitOfWork::new(self.open_unit_of_work(height)?))
    }

    pub fn new_replica_unit_of_work(&self, height: u64) -> Result<ReplicaUnitOfWork> {
        Ok(ReplicaUnitOfWork::new(self.open_unit_of_work(height)?))
    }

    /// Hash of the block before `session_height`. Height 0 has no block
    /// record, so its state hash stands in; the first session uses zeros.
    fn seed_block_hash(&self, session_height: u64) -> Result<Hash> {
        let Some(previous) = session_height.checked_sub(1) else {
            return Ok([0; 32]);
        };
        if let Some(block) = self.persistence.get_block(previous).during("get_block")? {
            return Ok(block.state_hash);
        }
        let mut context = self
            .persistence
            .new_read_context(previous)
            .during("new_read_context")?;
        let hash = context.compute_state_hash().during("compute_state_hash");
        context.release();
        hash
    }
}

impl UtilityApi for UtilityModule {
    fn handle_transaction(&self, tx_bytes: &[u8]) -> Result<Hash> {
        let tx_hash = transaction_hash(tx_bytes);
        if self.mempool.contains(&tx_hash) {
            return Err(UtilityError::DuplicateTransaction(tx_hash));
        }
        if self
            .persistence
            .transaction_exists(&tx_hash)
            .during("transaction_exists")?
        {
            return Err(UtilityError::TransactionAlreadyCommitted(tx_hash));
        }

        let tx = Transaction::from_bytes(tx_bytes)?;
        tx.validate_basic()?;
        Message::from_any(&tx.msg)?.validate_basic()?;

        self.mempool
            .add_tx(tx_bytes.to_vec())
            .map_err(|err| match err {
                MempoolError::DuplicateTransaction(hash) => {
                    UtilityError::DuplicateTransaction(hash)
                }
                other => UtilityError::Mempool(other),
            })?;
        self.metrics.record_admitted();
        debug!(tx_hash = %hex::encode(tx_hash), "[qc-17] Admitted transaction");
        Ok(tx_hash)
    }

    fn new_unit_of_work(&self, height: u64, is_leader: bool) -> Result<UnitOfWorkRole> {
        if is_leader {
            Ok(UnitOfWorkRole::Leader(self.new_leader_unit_of_work(height)?))
        } else {
            Ok(UnitOfWorkRole::Replica(
                self.new_replica_unit_of_work(height)?,
            ))
        }
    }

    fn get_parameter(&self, name: &str, height: u64) -> Result<ParamValue> {
        if param_kind(name).is_none() {
            return Err(UtilityError::UnknownParam(name.to_string()));
        }
        let mut context = self
            .persistence
            .new_read_context(height)
            .during("new_read_context")?;
        let value = context.get_parameter(name).during("get_parameter");
        context.release();
        value?.ok_or_else(|| UtilityError::ParamNotSet(name.to_string()))
    }

    fn get_session(
        &self,
        application: &Address,
        height: u64,
        relay_chain: &str,
    ) -> Result<Session> {
        validate_relay_chains(&[relay_chain.to_string()])?;
        let latest = self
            .persistence
            .latest_height()
            .during("latest_height")?;
        if height > latest {
            return Err(UtilityError::FutureHeight { height, latest });
        }

        let mut context = self
            .persistence
            .new_read_context(height)
            .during("new_read_context")?;
        let blocks_per_session = read_count(&*context, BLOCKS_PER_SESSION);
        context.release();
        let (start, session_number) = session_start(height, blocks_per_session?);

        let prev_hash = self.seed_block_hash(start)?;
        let mut context = self
            .persistence
            .new_read_context(start)
            .during("new_read_context")?;
        let session = hydrate_session(
            &*context,
            application,
            start,
            session_number,
            relay_chain,
            &prev_hash,
        );
        context.release();
        let session = session?;

        debug!(
            height,
            session_height = start,
            session_number,
            application = %hex::encode(application),
            relay_chain,
            servicers = session.servicers.len(),
            fishermen = session.fishermen.len(),
            "[qc-17] Dispatched session"
        );
        Ok(session)
    }
}

// =============================================================================
// SESSION HYDRATION
// =============================================================================

/// Build the session from the state at its start height.
fn hydrate_session(
    context: &dyn PersistenceReadContext,
    application: &Address,
    height: u64,
    session_number: u64,
    relay_chain: &str,
    prev_hash: &Hash,
) -> Result<Session> {
    let app = context
        .get_actor(ActorType::Application, application)
        .during("get_actor")?
        .ok_or(UtilityError::ActorNotFound {
            actor_type: ActorType::Application,
            address: *application,
        })?;
    if app.status != StakeStatus::Staked {
        return Err(UtilityError::InvalidStatus {
            actor_type: ActorType::Application,
            address: *application,
            expected: StakeStatus::Staked,
            actual: app.status,
        });
    }
    if app.is_paused() {
        return Err(UtilityError::ActorPaused {
            actor_type: ActorType::Application,
            address: *application,
        });
    }
    if !app.chains.iter().any(|chain| chain == relay_chain) {
        return Err(UtilityError::ChainNotStaked {
            address: *application,
            chain: relay_chain.to_string(),
        });
    }

    let id = session_id(height, prev_hash, relay_chain, &app.public_key);
    let servicers = dispatch(
        context,
        ActorType::Servicer,
        SERVICERS_PER_SESSION,
        relay_chain,
        &id,
    )?;
    let fishermen = dispatch(
        context,
        ActorType::Fisherman,
        FISHERMEN_PER_SESSION,
        relay_chain,
        &id,
    )?;
    Ok(Session {
        id,
        height,
        session_number,
        relay_chain: relay_chain.to_string(),
        application: app,
        servicers,
        fishermen,
    })
}

fn dispatch(
    context: &dyn PersistenceReadContext,
    actor_type: ActorType,
    count_param: &str,
    relay_chain: &str,
    seed: &Hash,
) -> Result<Vec<Actor>> {
    let count = read_count(context, count_param)?;
    let candidates: Vec<Actor> = context
        .get_actors(actor_type)
        .during("get_actors")?
        .into_iter()
        .filter(|actor| can_serve(actor, relay_chain))
        .collect();
    Ok(select_actors(
        candidates,
        usize::try_from(count).unwrap_or(usize::MAX),
        seed,
    ))
}

/// Non-negative integer parameter from a read context.
fn read_count(context: &dyn PersistenceReadContext, name: &str) -> Result<u64> {
    match context.get_parameter(name).during("get_parameter")? {
        Some(ParamValue::Int(value)) => {
            u64::try_from(value).map_err(|_| UtilityError::InvalidParamValue {
                name: name.to_string(),
                reason: format!("{value} is negative"),
            })
        }
        Some(other) => Err(UtilityError::ParamTypeMismatch {
            name: name.to_string(),
            expected: ParamKind::Int,
            actual: other.type_name(),
        }),
        None => Err(UtilityError::ParamNotSet(name.to_string())),
    }
}
