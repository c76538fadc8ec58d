// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The composite stage produced by every build.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use pipekit_core::{
    HostContext, PipekitError, RecordReceiver, RecordSender, Runnable, Unit,
};
use tokio::sync::mpsc;
use tracing::warn;

/// A linear chain of stages headed by an inert pass-through.
///
/// Stages are joined by bounded channels and driven concurrently on the
/// task that runs the pipeline. A stage error never escapes `run`: it is
/// forwarded to the host's error channel as a stage fault.
pub struct Pipeline {
    stages: Vec<Unit>,
    host: Arc<dyn HostContext>,
    capacity: usize,
}

impl Pipeline {
    /// Compose `resolved` behind a pass-through stage.
    pub fn new(resolved: Vec<Unit>, host: Arc<dyn HostContext>, capacity: usize) -> Self {
        let mut stages = Vec::with_capacity(resolved.len() + 1);
        stages.push(Unit::pass_through());
        stages.extend(resolved);
        Self {
            stages,
            host,
            capacity: capacity.max(1),
        }
    }

    /// All stages, pass-through included.
    pub fn stages(&self) -> &[Unit] {
        &self.stages
    }
}

#[async_trait]
impl Runnable for Pipeline {
    fn name(&self) -> &str {
        "pipeline"
    }

    async fn run(&self, input: RecordReceiver, output: RecordSender) -> Result<(), PipekitError> {
        // Stage i reads receivers[i] and writes senders[i].
        let mut receivers = Vec::with_capacity(self.stages.len());
        let mut senders = Vec::with_capacity(self.stages.len());
        receivers.push(input);
        for _ in 1..self.stages.len() {
            let (tx, rx) = mpsc::channel(self.capacity);
            senders.push(tx);
            receivers.push(rx);
        }
        senders.push(output);

        let runs = self
            .stages
            .iter()
            .zip(receivers.into_iter().zip(senders))
            .map(|(stage, (rx, tx))| stage.run(rx, tx));
        let results = join_all(runs).await;

        for (stage, result) in self.stages.iter().zip(results) {
            if let Err(err) = result {
                let fault = err.into_stage_fault(stage.name());
                warn!(stage = stage.name(), error = %fault, "pipeline stage failed");
                self.host.emit_error(fault);
            }
        }
        Ok(())
    }
}
