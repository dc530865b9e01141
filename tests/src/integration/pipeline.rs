//! # Leader / Replica Pipeline
//!
//! A leader node builds and commits a block; a replica built from the same
//! genesis must reach the same state hash from the proposal alone.

#[cfg(test)]
mod tests {
    use qc_04_state_management::PersistenceModule;
    use qc_17_utility::{UtilityApi, UtilityError};

    use crate::fixtures::*;

    // =============================================================================
    // AGREEMENT
    // =============================================================================

    #[test]
    fn test_replica_reproduces_leader_state() {
        let leader = TestNode::new(genesis()).unwrap();
        let replica = TestNode::new(genesis()).unwrap();

        let good = signed_tx(ALICE, send(ALICE, BOB, 5_000), "1").unwrap();
        let overdraft = signed_tx(CAROL, send(CAROL, ALICE, 1), "2").unwrap();
        let later = signed_tx(BOB, send(BOB, CAROL, 7), "3").unwrap();
        for tx in [&good, &overdraft, &later] {
            leader.submit(tx).unwrap();
        }
        replica.submit(&good).unwrap();

        let proposal = leader.produce_block(addr(PROPOSER), vec![]).unwrap();
        assert_eq!(proposal.transactions, vec![good, later]);

        let replica_hash = replica.validate_block(proposal.clone()).unwrap();

        assert_eq!(Some(replica_hash), proposal.state_hash);
        assert_eq!(leader.block_hash(1).unwrap(), replica.block_hash(1).unwrap());
        assert_eq!(*leader.state().unwrap(), *replica.state().unwrap());
        assert!(replica.utility.mempool().is_empty());
    }

    #[test]
    fn test_nodes_stay_in_lockstep_over_several_heights() {
        let leader = TestNode::new(genesis()).unwrap();
        let replica = TestNode::new(genesis()).unwrap();

        for height in 1..=4u64 {
            let nonce = height.to_string();
            leader
                .submit(&signed_tx(ALICE, send(ALICE, BOB, height * 100), &nonce).unwrap())
                .unwrap();
            leader
                .submit(&signed_tx(BOB, send(BOB, CAROL, height), &nonce).unwrap())
                .unwrap();

            let proposal = leader.produce_block(addr(PROPOSER), vec![]).unwrap();
            replica.validate_block(proposal).unwrap();

            assert_eq!(
                leader.block_hash(height).unwrap(),
                replica.block_hash(height).unwrap(),
                "diverged at height {height}"
            );
        }
        assert_eq!(leader.latest_height().unwrap(), 4);
        assert_eq!(replica.latest_height().unwrap(), 4);
    }

    #[test]
    fn test_tampered_state_hash_is_rejected_then_genuine_proposal_applies() {
        let leader = TestNode::new(genesis()).unwrap();
        let replica = TestNode::new(genesis()).unwrap();
        leader
            .submit(&signed_tx(ALICE, send(ALICE, BOB, 1), "1").unwrap())
            .unwrap();
        let proposal = leader.produce_block(addr(PROPOSER), vec![]).unwrap();

        let mut forged = proposal.clone();
        forged.state_hash = Some([0xEE; 32]);
        let err = replica.validate_block(forged).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UtilityError>(),
            Some(UtilityError::StateHashMismatch { .. })
        ));
        assert_eq!(replica.latest_height().unwrap(), 0);

        replica.validate_block(proposal).unwrap();
        assert_eq!(replica.latest_height().unwrap(), 1);
    }

    #[test]
    fn test_replica_rejects_proposal_carrying_invalid_transaction() {
        let replica = TestNode::new(genesis()).unwrap();
        let mut proposal = TestNode::new(genesis())
            .unwrap()
            .produce_block(addr(PROPOSER), vec![])
            .unwrap();
        proposal
            .transactions
            .push(signed_tx(CAROL, send(CAROL, ALICE, 1), "1").unwrap());

        let err = replica.validate_block(proposal).unwrap_err();
        let err = err.downcast_ref::<UtilityError>().unwrap();
        assert!(err.is_invalid_proposal());
        assert!(!err.is_persistence_failure());
        assert_eq!(replica.latest_height().unwrap(), 0);
    }

    // =============================================================================
    // COMMITTED TRANSACTIONS
    // =============================================================================

    #[test]
    fn test_committed_transaction_cannot_be_resubmitted() {
        let leader = TestNode::new(genesis()).unwrap();
        let replica = TestNode::new(genesis()).unwrap();
        let tx = signed_tx(ALICE, send(ALICE, BOB, 1), "1").unwrap();
        let hash = leader.submit(&tx).unwrap();

        let proposal = leader.produce_block(addr(PROPOSER), vec![]).unwrap();
        replica.validate_block(proposal).unwrap();

        for node in [&leader, &replica] {
            assert!(matches!(
                node.utility.handle_transaction(&tx),
                Err(UtilityError::TransactionAlreadyCommitted(h)) if h == hash
            ));
        }
        assert_eq!(leader.db.get_block(1).unwrap().unwrap().tx_hashes, vec![hash]);
    }

    #[test]
    fn test_block_records_proposer_and_quorum_certificate() {
        let leader = TestNode::new(genesis()).unwrap();
        leader.produce_block(addr(PROPOSER), vec![]).unwrap();

        let block = leader.db.get_block(1).unwrap().unwrap();
        assert_eq!(block.height, 1);
        assert_eq!(block.proposer, addr(PROPOSER));
        assert_eq!(block.quorum_certificate, QC.to_vec());
        assert!(block.tx_hashes.is_empty());
        assert_eq!(leader.utility.metrics().get_blocks_committed(), 1);
    }
}
