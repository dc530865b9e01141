//! # Session Dispatch
//!
//! Sessions are derived from committed state only, so any node asked about
//! the same application, chain and height returns the same servicers and
//! fishermen until the next session boundary.

#[cfg(test)]
mod tests {
    use qc_17_utility::{UtilityApi, UtilityError, BLOCKS_PER_SESSION, SERVICERS_PER_SESSION};
    use shared_types::{Actor, ActorType, ParamValue};

    use crate::fixtures::*;

    const APP: u8 = 50;
    const IDLE_APP: u8 = 51;
    const PAUSED_APP: u8 = 52;
    const SERVICERS: std::ops::Range<u8> = 60..70;
    const OTHER_CHAIN_SERVICERS: std::ops::Range<u8> = 70..72;
    const PAUSED_SERVICER: u8 = 72;
    const FISHERMEN: std::ops::Range<u8> = 80..83;
    const SLOTS: usize = 4;

    fn staked(actor_type: ActorType, seed: u8, chain: &str) -> Actor {
        let mut actor = Actor::staked(
            actor_type,
            addr(seed),
            key(seed).public_key().as_bytes().to_vec(),
            addr(seed),
            amount(MIN_STAKE),
        );
        actor.chains = vec![chain.to_string()];
        if actor_type != ActorType::Application {
            actor.service_url = Some("https://node.example:443".to_string());
        }
        actor
    }

    fn session_genesis() -> qc_17_utility::GenesisState {
        let mut paused_app = staked(ActorType::Application, PAUSED_APP, "0001");
        paused_app.paused_height = Some(0);
        let mut paused_servicer = staked(ActorType::Servicer, PAUSED_SERVICER, "0001");
        paused_servicer.paused_height = Some(0);

        let mut genesis = genesis()
            .with_param(BLOCKS_PER_SESSION, ParamValue::Int(4))
            .with_param(SERVICERS_PER_SESSION, ParamValue::Int(SLOTS as i32))
            .with_actor(staked(ActorType::Application, APP, "0001"))
            .with_actor(staked(ActorType::Application, IDLE_APP, "0002"))
            .with_actor(paused_app)
            .with_actor(paused_servicer);
        for seed in SERVICERS {
            genesis = genesis.with_actor(staked(ActorType::Servicer, seed, "0001"));
        }
        for seed in OTHER_CHAIN_SERVICERS {
            genesis = genesis.with_actor(staked(ActorType::Servicer, seed, "0002"));
        }
        for seed in FISHERMEN {
            genesis = genesis.with_actor(staked(ActorType::Fisherman, seed, "0001"));
        }
        genesis
    }

    // =============================================================================
    // DISPATCH
    // =============================================================================

    #[test]
    fn test_session_is_stable_within_its_blocks() {
        let node = TestNode::new(session_genesis()).unwrap();
        node.advance_to(9).unwrap();

        let first = node.utility.get_session(&addr(APP), 4, "0001").unwrap();
        let last = node.utility.get_session(&addr(APP), 7, "0001").unwrap();
        let next = node.utility.get_session(&addr(APP), 8, "0001").unwrap();

        assert_eq!(first, last);
        assert_eq!(first.height, 4);
        assert_eq!(first.session_number, 1);
        assert_eq!(next.height, 8);
        assert_ne!(first.id, next.id);
    }

    #[test]
    fn test_session_picks_distinct_active_servicers_on_chain() {
        let node = TestNode::new(session_genesis()).unwrap();
        node.advance_to(4).unwrap();

        let session = node.utility.get_session(&addr(APP), 4, "0001").unwrap();

        assert_eq!(session.application.address, addr(APP));
        assert_eq!(session.servicers.len(), SLOTS);
        let mut picked: Vec<_> = session.servicers.iter().map(|s| s.address).collect();
        picked.sort();
        picked.dedup();
        assert_eq!(picked.len(), SLOTS);
        assert!(picked
            .iter()
            .all(|address| SERVICERS.map(addr).any(|a| a == *address)));
        assert_eq!(session.fishermen.len(), 1);
        assert!(FISHERMEN
            .map(addr)
            .any(|a| a == session.fishermen[0].address));
    }

    #[test]
    fn test_short_candidate_list_dispatches_everyone() {
        let node = TestNode::new(session_genesis()).unwrap();

        let session = node.utility.get_session(&addr(IDLE_APP), 0, "0002").unwrap();

        let picked: Vec<_> = session.servicers.iter().map(|s| s.address).collect();
        let expected: Vec<_> = OTHER_CHAIN_SERVICERS.map(addr).collect();
        assert_eq!(picked.len(), expected.len());
        assert!(expected.iter().all(|a| picked.contains(a)));
        assert!(session.fishermen.is_empty());
    }

    #[test]
    fn test_replica_dispatches_the_same_session() {
        let leader = TestNode::new(session_genesis()).unwrap();
        let replica = TestNode::new(session_genesis()).unwrap();
        for nonce in ["1", "2", "3", "4", "5"] {
            leader
                .submit(&signed_tx(ALICE, send(ALICE, BOB, 1), nonce).unwrap())
                .unwrap();
            let proposal = leader.produce_block(addr(PROPOSER), vec![]).unwrap();
            replica.validate_block(proposal).unwrap();
        }

        assert_eq!(
            leader.utility.get_session(&addr(APP), 5, "0001").unwrap(),
            replica.utility.get_session(&addr(APP), 5, "0001").unwrap()
        );
    }

    // =============================================================================
    // REJECTIONS
    // =============================================================================

    #[test]
    fn test_session_rejections() {
        let node = TestNode::new(session_genesis()).unwrap();
        node.advance_to(2).unwrap();
        let session = |app: u8, height: u64, chain: &str| {
            node.utility.get_session(&addr(app), height, chain)
        };

        assert!(matches!(
            session(APP, 3, "0001"),
            Err(UtilityError::FutureHeight { height: 3, latest: 2 })
        ));
        assert!(matches!(
            session(ALICE, 1, "0001"),
            Err(UtilityError::ActorNotFound { .. })
        ));
        assert!(matches!(
            session(APP, 1, "0002"),
            Err(UtilityError::ChainNotStaked { .. })
        ));
        assert!(matches!(
            session(APP, 1, "01"),
            Err(UtilityError::Validation(_))
        ));
        assert!(matches!(
            session(PAUSED_APP, 1, "0001"),
            Err(UtilityError::ActorPaused { .. })
        ));
    }
}
