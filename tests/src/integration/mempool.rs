//! # Mempool Admission
//!
//! Capacity scenarios on the bare pool, and admission through the utility
//! service from many concurrent callers.

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use qc_06_mempool::{MempoolConfig, TxFifoMempool};
    use qc_17_utility::{UtilityApi, UtilityConfig, UtilityError};
    use shared_types::transaction_hash;

    use crate::fixtures::*;

    const WRITERS: u8 = 8;
    const TXS_PER_WRITER: usize = 25;

    fn node_with_mempool(max_transactions: usize, max_total_bytes: u64) -> TestNode {
        let config = UtilityConfig {
            mempool: MempoolConfig::new(max_transactions, max_total_bytes),
            ..UtilityConfig::default()
        };
        TestNode::with_config(genesis(), config).unwrap()
    }

    /// Distinct signed sends, one batch per writer.
    fn batches() -> Vec<Vec<Vec<u8>>> {
        (0..WRITERS)
            .map(|writer| {
                (0..TXS_PER_WRITER)
                    .map(|i| {
                        signed_tx(ALICE, send(ALICE, BOB, 1), &format!("{writer}-{i}")).unwrap()
                    })
                    .collect()
            })
            .collect()
    }

    // =============================================================================
    // CAPACITY SCENARIOS
    // =============================================================================

    #[test]
    fn test_oversized_transaction_evicts_itself() {
        let pool = TxFifoMempool::new(MempoolConfig::new(10, 1));

        let hash = pool.add_tx(vec![7u8; 10]).unwrap();

        assert!(pool.is_empty());
        assert!(!pool.contains(&hash));
        assert_eq!(pool.total_bytes(), 0);
    }

    #[test]
    fn test_count_limit_evicts_oldest() {
        let pool = TxFifoMempool::new(MempoolConfig::new(2, 1 << 20));
        let (a, b, c) = (b"tx-a".to_vec(), b"tx-b".to_vec(), b"tx-c".to_vec());

        pool.add_tx(a.clone()).unwrap();
        pool.add_tx(b.clone()).unwrap();
        pool.add_tx(c.clone()).unwrap();

        assert_eq!(pool.snapshot(), vec![b, c]);
        assert!(!pool.contains(&transaction_hash(&a)));
    }

    #[test]
    fn test_evicted_transactions_never_reach_a_block() {
        let node = node_with_mempool(2, 1 << 20);
        let txs: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|nonce| signed_tx(ALICE, send(ALICE, BOB, 1), nonce).unwrap())
            .collect();
        for tx in &txs {
            node.submit(tx).unwrap();
        }

        let proposal = node.produce_block(addr(PROPOSER), vec![]).unwrap();

        assert_eq!(proposal.transactions, txs[1..].to_vec());
    }

    #[test]
    fn test_service_rejects_pooled_duplicate() {
        let node = node_with_mempool(10, 1 << 20);
        let tx = signed_tx(ALICE, send(ALICE, BOB, 1), "1").unwrap();

        node.submit(&tx).unwrap();

        assert!(matches!(
            node.utility.handle_transaction(&tx),
            Err(UtilityError::DuplicateTransaction(_))
        ));
        assert_eq!(node.utility.mempool().tx_count(), 1);
    }

    // =============================================================================
    // CONCURRENT ADMISSION
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_admit_every_distinct_transaction() {
        let node = Arc::new(node_with_mempool(10_000, 1 << 30));
        let shared = signed_tx(BOB, send(BOB, ALICE, 1), "shared").unwrap();

        let mut handles = Vec::new();
        for batch in batches() {
            let node = Arc::clone(&node);
            let shared = shared.clone();
            handles.push(tokio::spawn(async move {
                let mut admitted = 0usize;
                let mut shared_admitted = 0usize;
                for (i, tx) in batch.iter().enumerate() {
                    if i == TXS_PER_WRITER / 2 && node.submit(&shared).is_ok() {
                        shared_admitted += 1;
                    }
                    node.submit(tx).unwrap();
                    admitted += 1;
                    tokio::task::yield_now().await;
                }
                (admitted, shared_admitted)
            }));
        }

        let mut admitted = 0;
        let mut shared_admitted = 0;
        for handle in handles {
            let (a, s) = handle.await.unwrap();
            admitted += a;
            shared_admitted += s;
        }

        assert_eq!(admitted, WRITERS as usize * TXS_PER_WRITER);
        assert_eq!(shared_admitted, 1);
        let pool = node.utility.mempool();
        assert_eq!(pool.tx_count(), admitted + 1);
        assert!(pool.contains(&transaction_hash(&shared)));
        assert_eq!(
            node.utility.metrics().transactions_admitted.load(Ordering::Relaxed),
            (admitted + 1) as u64
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_capacity_holds_under_concurrent_writers() {
        const MAX_TXS: usize = 64;
        let node = Arc::new(node_with_mempool(MAX_TXS, 1 << 30));
        let max_bytes = node.utility.mempool().config().max_total_bytes;

        let handles: Vec<_> = batches()
            .into_iter()
            .map(|batch| {
                let node = Arc::clone(&node);
                tokio::spawn(async move {
                    for tx in batch {
                        node.submit(&tx).unwrap();
                        let status = node.utility.mempool().status();
                        assert!(status.tx_count <= MAX_TXS);
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let pool = node.utility.mempool();
        assert_eq!(pool.tx_count(), MAX_TXS);
        assert!(pool.total_bytes() <= max_bytes);
        let snapshot = pool.snapshot();
        assert_eq!(snapshot.len(), MAX_TXS);
        assert!(snapshot
            .iter()
            .all(|tx| pool.contains(&transaction_hash(tx))));
    }
}
