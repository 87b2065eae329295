use nm_core::{
    ChainEntry, MetricStore, NewMetric, NewService, OwnerContext, ReadingChain, TimestampMs,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use storage::{InMemoryMetricStore, MetricChain};

fn walk_back(chain: &dyn ReadingChain) -> Vec<ChainEntry> {
    let mut out = Vec::new();
    let mut cursor = chain.latest();
    while let Some(entry) = cursor {
        out.push(entry);
        cursor = chain.predecessor(&entry);
    }
    out
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_through_store() {
    let store = Arc::new(InMemoryMetricStore::default());
    let ctx = OwnerContext::default();
    let service = store
        .create_service(
            &ctx,
            NewService {
                name: "checkout".to_string(),
                description: Some("checkout api".to_string()),
            },
        )
        .await
        .unwrap();
    let metric = store
        .create_metric(
            &ctx,
            NewMetric {
                service_id: service.id,
                name: "latency_ms".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

    let tasks: Vec<_> = (0..16)
        .map(|t| {
            let store = Arc::clone(&store);
            let ctx = ctx.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    store
                        .append_reading(
                            &ctx,
                            &metric.id,
                            f64::from(t * 100 + i),
                            Some(TimestampMs::from_millis(i64::from(t * 100 + i))),
                        )
                        .await
                        .unwrap();
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let chain = store.chain(&ctx, &metric.id).await.unwrap();
    let walked = walk_back(chain.as_ref());
    assert_eq!(walked.len(), 16 * 50);
    assert_eq!(store.chain_len(&metric.id), Some(16 * 50));

    let ids: HashSet<_> = walked.iter().map(|e| e.reading.id).collect();
    assert_eq!(ids.len(), walked.len());

    let latest = store.latest_reading(&ctx, &metric.id).await.unwrap();
    assert_eq!(latest, Some(walked[0].reading));
}

#[tokio::test]
async fn test_other_owner_cannot_read_chain() {
    let store = InMemoryMetricStore::default();
    let alice = OwnerContext::new("alice".parse().unwrap());
    let bob = OwnerContext::new("bob".parse().unwrap());

    let service = store
        .create_service(
            &alice,
            NewService {
                name: "api".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    let metric = store
        .create_metric(
            &alice,
            NewMetric {
                service_id: service.id,
                name: "cpu".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

    assert!(store.chain(&bob, &metric.id).await.is_err());
    assert!(store.latest_reading(&bob, &metric.id).await.is_err());
    assert!(store.list_services(&bob).await.unwrap().is_empty());
}

proptest! {
    #[test]
    fn prop_walk_is_reverse_insertion(
        readings in prop::collection::vec((-1.0e6f64..1.0e6, -1_000_000i64..1_000_000), 0..64),
    ) {
        let chain = MetricChain::new(nm_core::MetricId::generate());
        for (value, ts) in &readings {
            chain.append(*value, TimestampMs::from_millis(*ts)).unwrap();
        }

        let walked: Vec<(f64, i64)> = walk_back(&chain)
            .iter()
            .map(|e| (e.reading.value, e.reading.timestamp.as_millis()))
            .collect();
        let mut expected = readings.clone();
        expected.reverse();
        prop_assert_eq!(walked, expected);
    }

    #[test]
    fn prop_forward_walk_matches_insertion(count in 1usize..48) {
        let chain = MetricChain::new(nm_core::MetricId::generate());
        for i in 0..count {
            chain.append(i as f64, TimestampMs::from_millis(i as i64)).unwrap();
        }

        let mut cursor = walk_back(&chain).last().copied();
        let mut seen = Vec::new();
        while let Some(entry) = cursor {
            seen.push(entry.reading.value);
            cursor = chain.successor(&entry);
        }
        let expected: Vec<f64> = (0..count).map(|i| i as f64).collect();
        prop_assert_eq!(seen, expected);
    }
}
