// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The stage trait every transform unit implements.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::PipekitError;
use crate::types::Record;

/// Receiving half of the bounded channel feeding a stage.
pub type RecordReceiver = mpsc::Receiver<Record>;

/// Sending half of the bounded channel a stage writes to.
pub type RecordSender = mpsc::Sender<Record>;

/// A transform stage that can take part in a pipeline.
///
/// A stage pulls records from `input` until it closes, pushes zero or more
/// records to `output`, and returns once it has flushed. Sending awaits
/// channel capacity, which is how backpressure reaches upstream stages.
/// A failed send means downstream has gone away; stages should stop
/// quietly rather than report it as a fault.
///
/// `run` takes `&self` so a stage registered once can be wired into any
/// number of pipelines.
#[async_trait]
pub trait Runnable: Send + Sync + 'static {
    /// Human-readable stage name, used in logs and fault reports.
    fn name(&self) -> &str;

    /// Drive the stage until `input` is exhausted.
    async fn run(&self, input: RecordReceiver, output: RecordSender) -> Result<(), PipekitError>;
}
