//! Stream events: per-step updates, merged values, terminal event.

use std::collections::HashSet;

use stepgraph::{Record, RunError, StreamEvent, StreamMode};
use tokio_stream::StreamExt;

use crate::common::{counter_loop, endless_loop};

/// **Scenario**: Updates mode yields one event per executed step, then Done.
#[tokio::test]
async fn updates_then_done() {
    let events: Vec<StreamEvent> = counter_loop(3)
        .stream(
            "increment",
            Record::new().with("counter", 0),
            10,
            HashSet::from([StreamMode::Updates]),
        )
        .collect()
        .await;

    let steps: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Updates { step, .. } => Some(step.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(steps, vec!["increment"; 3]);
    assert_eq!(
        events.last(),
        Some(&StreamEvent::Done(Record::new().with("counter", 3)))
    );
}

/// **Scenario**: Values mode shows the counter after every merge.
#[tokio::test]
async fn values_track_counter() {
    let counters: Vec<i64> = counter_loop(3)
        .stream(
            "increment",
            Record::new().with("counter", 0),
            10,
            HashSet::from([StreamMode::Values]),
        )
        .filter_map(|e| match e {
            StreamEvent::Values(r) => Some(r.get_i64_or("counter", -1)),
            _ => None,
        })
        .collect()
        .await;
    assert_eq!(counters, vec![1, 2, 3]);
}

/// **Scenario**: A run hitting the bound ends its stream with Failed, after N updates.
#[tokio::test]
async fn bound_failure_is_streamed() {
    let events: Vec<StreamEvent> = endless_loop()
        .stream("spin", Record::new(), 4, HashSet::from([StreamMode::Updates]))
        .collect()
        .await;
    assert_eq!(events.len(), 5);
    assert_eq!(
        events.last(),
        Some(&StreamEvent::Failed(RunError::IterationLimitExceeded {
            limit: 4,
            step: "spin".into()
        }))
    );
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}
