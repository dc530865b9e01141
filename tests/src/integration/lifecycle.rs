//! # Actor Lifecycle Across Heights
//!
//! Stake, pause, unstake and unbond driven through signed transactions and
//! committed blocks, checked against the committed state at every height.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use qc_17_utility::{
        max_pause_blocks, minimum_stake, unstaking_blocks, Message, MessageEditStake,
        MessagePause, MessageStake, MessageUnpause, MessageUnstake, UtilityError,
    };
    use shared_types::{Actor, ActorType, ParamValue, Pool, StakeStatus};

    use crate::fixtures::*;

    const SERVICER: u8 = 40;
    const VALIDATOR: u8 = 41;

    fn servicer() -> Actor {
        Actor::staked(
            ActorType::Servicer,
            addr(SERVICER),
            key(SERVICER).public_key().as_bytes().to_vec(),
            addr(ALICE),
            amount(MIN_STAKE),
        )
    }

    fn validator_stake(stake: u64) -> MessageStake {
        MessageStake {
            actor_type: ActorType::Validator,
            public_key: key(VALIDATOR).public_key().as_bytes().to_vec(),
            chains: vec![],
            service_url: Some("https://validator.example:26656".to_string()),
            amount: amount(stake),
            output_address: addr(ALICE),
            signer: Some(addr(ALICE)),
        }
    }

    fn servicer_status(node: &TestNode, height: u64) -> Option<Actor> {
        node.state_at(height)
            .unwrap()
            .actors
            .get(&(ActorType::Servicer, addr(SERVICER)))
            .cloned()
    }

    // =============================================================================
    // STAKING
    // =============================================================================

    #[test]
    fn test_validator_stake_then_duplicate_stake() {
        let node = TestNode::new(genesis()).unwrap();
        let stake = Message::Stake(validator_stake(2_000_000));

        node.submit(&signed_tx(ALICE, stake.clone(), "1").unwrap())
            .unwrap();
        node.produce_block(addr(PROPOSER), vec![]).unwrap();

        let state = node.state().unwrap();
        assert_eq!(state.pools[&Pool::ValidatorStake], amount(2_000_000));
        assert_eq!(
            state.accounts[&addr(ALICE)],
            amount(FUNDS - 2_000_000 - FEE)
        );

        let mut uow = node.utility.new_leader_unit_of_work(2).unwrap();
        assert!(matches!(
            uow.stake(&validator_stake(2_000_000)),
            Err(UtilityError::ActorAlreadyExists { .. })
        ));
        uow.release().unwrap();

        node.submit(&signed_tx(ALICE, stake, "2").unwrap()).unwrap();
        let proposal = node.produce_block(addr(PROPOSER), vec![]).unwrap();
        assert!(proposal.transactions.is_empty());
        assert_eq!(
            node.state().unwrap().pools[&Pool::ValidatorStake],
            amount(2_000_000)
        );
    }

    #[test]
    fn test_burn_half_below_minimum_persists_after_commit() {
        let node = TestNode::new(
            genesis()
                .with_param(
                    minimum_stake(ActorType::Validator),
                    ParamValue::from(&amount(900_000)),
                )
                .with_actor(Actor::staked(
                    ActorType::Validator,
                    addr(VALIDATOR),
                    key(VALIDATOR).public_key().as_bytes().to_vec(),
                    addr(ALICE),
                    amount(1_000_000),
                )),
        )
        .unwrap();

        let mut leader = node.utility.new_leader_unit_of_work(1).unwrap();
        leader.burn_validator(&addr(VALIDATOR), 50).unwrap();
        leader
            .create_proposal_block(addr(PROPOSER), u64::MAX, vec![])
            .unwrap();
        leader.commit(QC.to_vec()).unwrap();

        let state = node.state_at(1).unwrap();
        let validator = &state.actors[&(ActorType::Validator, addr(VALIDATOR))];
        assert_eq!(validator.staked_amount, amount(500_000));
        assert_eq!(validator.status, StakeStatus::Unstaking);
        assert_eq!(validator.unstaking_height, Some(1 + 2016));
        assert_eq!(state.pools[&Pool::ValidatorStake], amount(500_000));
    }

    // =============================================================================
    // UNBONDING
    // =============================================================================

    #[test]
    fn test_unbonding_window_is_exact() {
        const UNBONDING: u64 = 3;
        let node = TestNode::new(
            genesis()
                .with_param(
                    unstaking_blocks(ActorType::Servicer),
                    ParamValue::Int(UNBONDING as i32),
                )
                .with_actor(servicer()),
        )
        .unwrap();
        node.advance_to(1).unwrap();

        let unstake = Message::Unstake(MessageUnstake {
            actor_type: ActorType::Servicer,
            address: addr(SERVICER),
            signer: None,
        });
        node.submit(&signed_tx(ALICE, unstake, "1").unwrap()).unwrap();
        let unstaked_at = 2;
        node.advance_to(unstaked_at + UNBONDING + 1).unwrap();

        for height in unstaked_at..unstaked_at + UNBONDING {
            let actor = servicer_status(&node, height)
                .unwrap_or_else(|| panic!("servicer missing at height {height}"));
            assert_eq!(actor.status, StakeStatus::Unstaking, "height {height}");
            assert_eq!(actor.unstaking_height, Some(unstaked_at + UNBONDING));
        }
        assert!(servicer_status(&node, unstaked_at + UNBONDING).is_none());

        let before = node.state_at(unstaked_at + UNBONDING - 1).unwrap();
        let after = node.state_at(unstaked_at + UNBONDING).unwrap();
        assert_eq!(
            &after.accounts[&addr(ALICE)] - &before.accounts[&addr(ALICE)],
            amount(MIN_STAKE)
        );
        assert_eq!(after.pools[&Pool::ServicerStake], amount(0));
    }

    // =============================================================================
    // PAUSING
    // =============================================================================

    #[test]
    fn test_unpause_waits_for_minimum_pause_blocks() {
        let node = TestNode::new(genesis().with_actor(servicer())).unwrap();
        let pause = Message::Pause(MessagePause {
            actor_type: ActorType::Servicer,
            address: addr(SERVICER),
            signer: None,
        });
        let unpause = Message::Unpause(MessageUnpause {
            actor_type: ActorType::Servicer,
            address: addr(SERVICER),
            signer: None,
        });

        node.submit(&signed_tx(ALICE, pause, "1").unwrap()).unwrap();
        node.produce_block(addr(PROPOSER), vec![]).unwrap();
        assert_eq!(servicer_status(&node, 1).unwrap().paused_height, Some(1));

        node.advance_to(3).unwrap();
        node.submit(&signed_tx(ALICE, unpause.clone(), "2").unwrap())
            .unwrap();
        let early = node.produce_block(addr(PROPOSER), vec![]).unwrap();
        assert!(early.transactions.is_empty());
        assert!(servicer_status(&node, 4).unwrap().is_paused());

        node.submit(&signed_tx(ALICE, unpause, "3").unwrap()).unwrap();
        let due = node.produce_block(addr(PROPOSER), vec![]).unwrap();
        assert_eq!(due.transactions.len(), 1);
        assert!(!servicer_status(&node, 5).unwrap().is_paused());
    }

    #[test]
    fn test_long_pause_forces_unstaking() {
        let mut paused = servicer();
        paused.paused_height = Some(1);
        let node = TestNode::new(
            genesis()
                .with_param(max_pause_blocks(ActorType::Servicer), ParamValue::Int(2))
                .with_actor(paused),
        )
        .unwrap();

        node.advance_to(4).unwrap();

        let still_paused = servicer_status(&node, 3).unwrap();
        assert_eq!(still_paused.status, StakeStatus::Staked);
        assert_eq!(still_paused.paused_height, Some(1));

        let forced = servicer_status(&node, 4).unwrap();
        assert_eq!(forced.status, StakeStatus::Unstaking);
        assert_eq!(forced.paused_height, None);
        assert_eq!(forced.unstaking_height, Some(4 + 2016));
    }

    // =============================================================================
    // STAKE MONOTONICITY
    // =============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_edit_stake_never_decreases(
            requests in prop::collection::vec(MIN_STAKE / 2..4 * MIN_STAKE, 1..12)
        ) {
            let node = TestNode::new(genesis().with_actor(servicer())).unwrap();
            let mut uow = node.utility.new_leader_unit_of_work(1).unwrap();
            let mut current = MIN_STAKE;

            for requested in requests {
                let result = uow.edit_stake(&MessageEditStake {
                    actor_type: ActorType::Servicer,
                    address: addr(SERVICER),
                    chains: vec!["0001".to_string()],
                    service_url: None,
                    amount: amount(requested),
                    signer: Some(addr(ALICE)),
                });
                if requested < current {
                    let is_decrease = matches!(result, Err(UtilityError::StakeDecrease { .. }));
                    prop_assert!(is_decrease);
                } else {
                    prop_assert!(result.is_ok());
                    current = requested;
                }
                let stored = uow.get_actor(ActorType::Servicer, &addr(SERVICER)).unwrap();
                prop_assert_eq!(stored.staked_amount, amount(current));
                prop_assert_eq!(
                    uow.get_pool_amount(Pool::ServicerStake).unwrap(),
                    amount(current)
                );
            }
        }
    }
}
