//! Run context for streaming-aware execution.
//!
//! Holds the optional stream sender plus the selected stream modes. Owned by a single
//! run; the compiled graph itself keeps no run state.

use std::collections::HashSet;

use tokio::sync::mpsc;

use crate::record::Record;
use crate::stream::{StreamEvent, StreamMode};

#[derive(Clone, Debug)]
pub struct RunContext {
    /// Optional sender for streaming events.
    pub stream_tx: Option<mpsc::Sender<StreamEvent>>,
    /// Enabled stream modes (Values, Updates).
    pub stream_mode: HashSet<StreamMode>,
}

impl RunContext {
    pub(crate) async fn emit_update(&self, step: &str, update: &Record) {
        if let Some(tx) = &self.stream_tx {
            if self.stream_mode.contains(&StreamMode::Updates) {
                let _ = tx
                    .send(StreamEvent::Updates {
                        step: step.to_string(),
                        update: update.clone(),
                    })
                    .await;
            }
        }
    }

    pub(crate) async fn emit_values(&self, record: &Record) {
        if let Some(tx) = &self.stream_tx {
            if self.stream_mode.contains(&StreamMode::Values) {
                let _ = tx.send(StreamEvent::Values(record.clone())).await;
            }
        }
    }
}
