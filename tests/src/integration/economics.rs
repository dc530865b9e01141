//! # Supply Accounting
//!
//! Accepted transactions move value between accounts and pools without
//! changing the total. Only slashing burns; end-of-block fee distribution
//! only moves value out of the fee pool.

#[cfg(test)]
mod tests {
    use qc_17_utility::{
        Message, MessageDoubleSign, MessageStake, Vote, MISSED_BLOCKS_BURN_PERCENTAGE,
    };
    use shared_types::{Actor, ActorType, ParamValue, Pool, StakeStatus};

    use crate::fixtures::*;

    const VALIDATOR: u8 = 20;

    fn staked_validator(stake: u64) -> Actor {
        Actor::staked(
            ActorType::Validator,
            addr(VALIDATOR),
            key(VALIDATOR).public_key().as_bytes().to_vec(),
            addr(VALIDATOR),
            amount(stake),
        )
    }

    fn vote(block_byte: u8, height: u64) -> Vote {
        Vote {
            public_key: key(VALIDATOR).public_key().as_bytes().to_vec(),
            height,
            round: 0,
            vote_type: 1,
            block_hash: [block_byte; 32],
        }
    }

    // =============================================================================
    // CONSERVATION
    // =============================================================================

    #[test]
    fn test_transfers_and_stakes_conserve_supply() {
        let node = TestNode::new(genesis()).unwrap();
        let before = node.state().unwrap().total_supply();
        assert_eq!(before, amount(3 * FUNDS));

        node.submit(&signed_tx(ALICE, send(ALICE, BOB, 12_345), "1").unwrap())
            .unwrap();
        node.submit(&signed_tx(BOB, send(BOB, CAROL, 999), "2").unwrap())
            .unwrap();
        let stake = Message::Stake(MessageStake {
            actor_type: ActorType::Servicer,
            public_key: key(30).public_key().as_bytes().to_vec(),
            chains: vec!["0001".to_string()],
            service_url: Some("https://servicer.example:8443".to_string()),
            amount: amount(2 * MIN_STAKE),
            output_address: addr(ALICE),
            signer: Some(addr(ALICE)),
        });
        node.submit(&signed_tx(ALICE, stake, "3").unwrap()).unwrap();

        let proposal = node.produce_block(addr(PROPOSER), vec![]).unwrap();
        assert_eq!(proposal.transactions.len(), 3);

        let after = node.state().unwrap();
        assert_eq!(after.total_supply(), before);
        assert_eq!(after.pools[&Pool::ServicerStake], amount(2 * MIN_STAKE));
    }

    #[test]
    fn test_fees_split_between_proposer_and_dao() {
        let node = TestNode::new(genesis()).unwrap();
        for nonce in ["1", "2", "3", "4"] {
            node.submit(&signed_tx(ALICE, send(ALICE, BOB, 1), nonce).unwrap())
                .unwrap();
        }

        node.produce_block(addr(PROPOSER), vec![]).unwrap();

        let state = node.state().unwrap();
        let fees = 4 * FEE;
        assert_eq!(state.accounts[&addr(PROPOSER)], amount(fees / 10));
        assert_eq!(state.pools[&Pool::Dao], amount(fees - fees / 10));
        assert_eq!(state.pools[&Pool::FeeCollector], amount(0));
        assert_eq!(state.accounts[&addr(ALICE)], amount(FUNDS - 4 - fees));
        assert_eq!(state.total_supply(), amount(3 * FUNDS));
    }

    #[test]
    fn test_dropped_transaction_pays_no_fee() {
        let node = TestNode::new(genesis()).unwrap();
        node.submit(&signed_tx(ALICE, send(ALICE, BOB, FUNDS), "1").unwrap())
            .unwrap();

        let proposal = node.produce_block(addr(PROPOSER), vec![]).unwrap();

        assert!(proposal.transactions.is_empty());
        let state = node.state().unwrap();
        assert_eq!(state.accounts[&addr(ALICE)], amount(FUNDS));
        assert_eq!(state.pools[&Pool::Dao], amount(0));
    }

    // =============================================================================
    // BURNS
    // =============================================================================

    #[test]
    fn test_missed_block_burn_is_the_only_supply_change() {
        let mut lagging = staked_validator(2 * MIN_STAKE);
        lagging.missed_blocks = 5;
        let node = TestNode::new(
            genesis()
                .with_param(MISSED_BLOCKS_BURN_PERCENTAGE, ParamValue::Int(50))
                .with_actor(lagging),
        )
        .unwrap();
        let before = node.state().unwrap().total_supply();

        node.produce_block(addr(PROPOSER), vec![addr(VALIDATOR)])
            .unwrap();

        let state = node.state().unwrap();
        let validator = &state.actors[&(ActorType::Validator, addr(VALIDATOR))];
        assert_eq!(validator.staked_amount, amount(MIN_STAKE));
        assert_eq!(validator.paused_height, Some(1));
        assert_eq!(validator.missed_blocks, 0);
        assert_eq!(validator.status, StakeStatus::Staked);
        assert_eq!(state.total_supply(), before - amount(MIN_STAKE));
    }

    #[test]
    fn test_reported_double_sign_burns_validator() {
        let node = TestNode::new(genesis().with_actor(staked_validator(2 * MIN_STAKE))).unwrap();
        node.advance_to(3).unwrap();
        let before = node.state().unwrap().total_supply();

        let evidence = Message::DoubleSign(MessageDoubleSign {
            vote_a: vote(0xA1, 2),
            vote_b: vote(0xB2, 2),
            reporter_address: None,
        });
        node.submit(&signed_tx(BOB, evidence, "1").unwrap()).unwrap();
        let proposal = node.produce_block(addr(PROPOSER), vec![]).unwrap();
        assert_eq!(proposal.transactions.len(), 1);

        let state = node.state().unwrap();
        let validator = &state.actors[&(ActorType::Validator, addr(VALIDATOR))];
        // 5% of the stake survives the default double-sign burn
        assert_eq!(validator.staked_amount, amount(2 * MIN_STAKE / 20));
        assert_eq!(validator.status, StakeStatus::Unstaking);
        assert_eq!(
            state.total_supply(),
            before - amount(2 * MIN_STAKE - 2 * MIN_STAKE / 20)
        );
    }

    #[test]
    fn test_stale_double_sign_evidence_is_dropped() {
        let node = TestNode::new(genesis().with_actor(staked_validator(2 * MIN_STAKE))).unwrap();
        node.advance_to(10).unwrap();

        let evidence = Message::DoubleSign(MessageDoubleSign {
            vote_a: vote(0xA1, 2),
            vote_b: vote(0xB2, 2),
            reporter_address: None,
        });
        node.submit(&signed_tx(BOB, evidence, "1").unwrap()).unwrap();
        let proposal = node.produce_block(addr(PROPOSER), vec![]).unwrap();

        assert!(proposal.transactions.is_empty());
        let state = node.state().unwrap();
        assert_eq!(
            state.actors[&(ActorType::Validator, addr(VALIDATOR))].staked_amount,
            amount(2 * MIN_STAKE)
        );
    }
}
