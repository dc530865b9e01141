//! # ACL-Governed Parameters
//!
//! Parameter changes are owner-gated transactions. A change committed at
//! height H is visible to queries at H and governs execution from H + 1.

#[cfg(test)]
mod tests {
    use qc_17_utility::{
        owner_param_name, Message, MessageChangeParameter, UtilityApi, UtilityError,
        BLOCKS_PER_SESSION, MESSAGE_SEND_FEE, PROPOSER_PERCENTAGE_OF_FEES,
    };
    use shared_types::ParamValue;

    use crate::fixtures::*;

    const NEW_FEE: u64 = 50_000;

    fn change(owner: u8, key: &str, value: ParamValue) -> Message {
        Message::ChangeParameter(MessageChangeParameter {
            owner: addr(owner),
            parameter_key: key.to_string(),
            parameter_value: value,
            signer: None,
        })
    }

    #[test]
    fn test_fee_change_applies_from_next_height() {
        let node = TestNode::new(genesis()).unwrap();
        let raise = change(OWNER, MESSAGE_SEND_FEE, ParamValue::from(&amount(NEW_FEE)));

        node.submit(&signed_tx(OWNER, raise, "1").unwrap()).unwrap();
        node.submit(&signed_tx(ALICE, send(ALICE, BOB, 1), "2").unwrap())
            .unwrap();
        let first = node.produce_block(addr(PROPOSER), vec![]).unwrap();
        assert_eq!(first.transactions.len(), 2);

        // the send in the same block still paid the old fee
        let after_first = node.state_at(1).unwrap();
        assert_eq!(after_first.accounts[&addr(ALICE)], amount(FUNDS - 1 - FEE));

        node.submit(&signed_tx(ALICE, send(ALICE, BOB, 1), "3").unwrap())
            .unwrap();
        node.produce_block(addr(PROPOSER), vec![]).unwrap();
        let after_second = node.state_at(2).unwrap();
        assert_eq!(
            after_second.accounts[&addr(ALICE)],
            amount(FUNDS - 2 - FEE - NEW_FEE)
        );
    }

    #[test]
    fn test_historical_parameter_queries() {
        let node = TestNode::new(genesis()).unwrap();
        node.submit(
            &signed_tx(OWNER, change(OWNER, BLOCKS_PER_SESSION, ParamValue::Int(12)), "1")
                .unwrap(),
        )
        .unwrap();
        node.produce_block(addr(PROPOSER), vec![]).unwrap();
        node.advance_to(3).unwrap();

        let at = |height| node.utility.get_parameter(BLOCKS_PER_SESSION, height).unwrap();
        assert_eq!(at(0), ParamValue::Int(4));
        assert_eq!(at(1), ParamValue::Int(12));
        assert_eq!(at(3), ParamValue::Int(12));

        assert!(matches!(
            node.utility.get_parameter("not_a_param", 1),
            Err(UtilityError::UnknownParam(_))
        ));
    }

    #[test]
    fn test_unauthorized_and_mistyped_changes_are_dropped() {
        let node = TestNode::new(genesis()).unwrap();
        let stolen = change(ALICE, BLOCKS_PER_SESSION, ParamValue::Int(1));
        let spoofed = change(OWNER, BLOCKS_PER_SESSION, ParamValue::Int(2));
        let mistyped = change(
            OWNER,
            BLOCKS_PER_SESSION,
            ParamValue::String("3".to_string()),
        );

        node.submit(&signed_tx(ALICE, stolen, "1").unwrap()).unwrap();
        node.submit(&signed_tx(ALICE, spoofed, "2").unwrap()).unwrap();
        node.submit(&signed_tx(OWNER, mistyped, "3").unwrap()).unwrap();
        let proposal = node.produce_block(addr(PROPOSER), vec![]).unwrap();

        assert!(proposal.transactions.is_empty());
        assert_eq!(
            node.utility.get_parameter(BLOCKS_PER_SESSION, 1).unwrap(),
            ParamValue::Int(4)
        );
    }

    #[test]
    fn test_out_of_range_change_is_dropped_and_blocks_keep_building() {
        let node = TestNode::new(genesis()).unwrap();
        let set_cut = |value| change(OWNER, PROPOSER_PERCENTAGE_OF_FEES, ParamValue::Int(value));

        node.submit(&signed_tx(OWNER, set_cut(150), "1").unwrap())
            .unwrap();
        let rejected = node.produce_block(addr(PROPOSER), vec![]).unwrap();
        assert!(rejected.transactions.is_empty());
        assert_eq!(
            node.utility.get_parameter(PROPOSER_PERCENTAGE_OF_FEES, 1).unwrap(),
            ParamValue::Int(10)
        );

        node.submit(&signed_tx(OWNER, set_cut(100), "2").unwrap())
            .unwrap();
        let accepted = node.produce_block(addr(PROPOSER), vec![]).unwrap();
        assert_eq!(accepted.transactions.len(), 1);

        node.submit(&signed_tx(ALICE, send(ALICE, BOB, 1), "3").unwrap())
            .unwrap();
        node.produce_block(addr(PROPOSER), vec![]).unwrap();

        // 10% of the change fee at height 2, all of the send fee at height 3
        let state = node.state_at(3).unwrap();
        assert_eq!(state.accounts[&addr(PROPOSER)], amount(FEE / 10 + FEE));
    }

    #[test]
    fn test_ownership_transfer_hands_over_control() {
        let node = TestNode::new(genesis()).unwrap();
        let owner_key = owner_param_name(BLOCKS_PER_SESSION).unwrap();

        node.submit(
            &signed_tx(OWNER, change(OWNER, &owner_key, ParamValue::from(addr(ALICE))), "1")
                .unwrap(),
        )
        .unwrap();
        node.produce_block(addr(PROPOSER), vec![]).unwrap();

        node.submit(
            &signed_tx(OWNER, change(OWNER, BLOCKS_PER_SESSION, ParamValue::Int(6)), "2")
                .unwrap(),
        )
        .unwrap();
        node.submit(
            &signed_tx(ALICE, change(ALICE, BLOCKS_PER_SESSION, ParamValue::Int(7)), "3")
                .unwrap(),
        )
        .unwrap();
        let proposal = node.produce_block(addr(PROPOSER), vec![]).unwrap();

        assert_eq!(proposal.transactions.len(), 1);
        assert_eq!(
            node.utility.get_parameter(BLOCKS_PER_SESSION, 2).unwrap(),
            ParamValue::Int(7)
        );
    }
}
