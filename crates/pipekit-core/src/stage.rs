// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runnable unit handles and the stream combinators used to compose them.
//!
//! A [`Unit`] is a cheaply clonable handle to a [`Runnable`] stage. Units
//! compose with [`Unit::pipe`], which joins two stages with a bounded
//! channel so a slow downstream stage throttles its upstream.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::PipekitError;
use crate::traits::runnable::{RecordReceiver, RecordSender, Runnable};
use crate::types::Record;

/// Capacity of the channels created between stages unless configured otherwise.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Shared handle to a runnable stage.
#[derive(Clone)]
pub struct Unit(Arc<dyn Runnable>);

impl Unit {
    /// Wrap a stage in a new handle.
    pub fn new<R: Runnable>(stage: R) -> Self {
        Self(Arc::new(stage))
    }

    pub fn from_arc(stage: Arc<dyn Runnable>) -> Self {
        Self(stage)
    }

    /// A stage that forwards every record unchanged.
    pub fn pass_through() -> Self {
        Self::new(PassThrough)
    }

    /// A stage applying `f` to every record.
    pub fn map<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Record) -> Result<Record, PipekitError> + Send + Sync + 'static,
    {
        Self::new(MapStage::new(name, f))
    }

    /// Feed this unit's output into `next`.
    pub fn pipe(self, next: Unit) -> Unit {
        Unit::new(Chain::new(self, next))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// True when both handles point at the same stage.
    pub fn ptr_eq(&self, other: &Unit) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    /// Drive the stage between the given channels.
    pub async fn run(&self, input: RecordReceiver, output: RecordSender) -> Result<(), PipekitError> {
        self.0.run(input, output).await
    }

    /// Push `records` through the stage and collect everything it emits.
    pub async fn collect(&self, records: Vec<Record>) -> Result<Vec<Record>, PipekitError> {
        let (input_tx, input_rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let (output_tx, mut output_rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);

        let feed = async move {
            for record in records {
                if input_tx.send(record).await.is_err() {
                    break;
                }
            }
        };
        let drain = async move {
            let mut out = Vec::new();
            while let Some(record) = output_rx.recv().await {
                out.push(record);
            }
            out
        };

        let ((), result, out) = tokio::join!(feed, self.run(input_rx, output_tx), drain);
        result?;
        Ok(out)
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Unit").field(&self.name()).finish()
    }
}

/// Forwards records untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

#[async_trait]
impl Runnable for PassThrough {
    fn name(&self) -> &str {
        "pass-through"
    }

    async fn run(&self, mut input: RecordReceiver, output: RecordSender) -> Result<(), PipekitError> {
        while let Some(record) = input.recv().await {
            if output.send(record).await.is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// One-to-one record transform built from a closure.
pub struct MapStage<F> {
    name: String,
    f: F,
}

impl<F> MapStage<F>
where
    F: Fn(Record) -> Result<Record, PipekitError> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> Runnable for MapStage<F>
where
    F: Fn(Record) -> Result<Record, PipekitError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, mut input: RecordReceiver, output: RecordSender) -> Result<(), PipekitError> {
        while let Some(record) = input.recv().await {
            let record = (self.f)(record).map_err(|e| e.into_stage_fault(&self.name))?;
            if output.send(record).await.is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Two units joined by a bounded channel.
pub struct Chain {
    name: String,
    head: Unit,
    tail: Unit,
    capacity: usize,
}

impl Chain {
    pub fn new(head: Unit, tail: Unit) -> Self {
        Self::with_capacity(head, tail, DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(head: Unit, tail: Unit, capacity: usize) -> Self {
        Self {
            name: format!("{} | {}", head.name(), tail.name()),
            head,
            tail,
            capacity: capacity.max(1),
        }
    }
}

#[async_trait]
impl Runnable for Chain {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, input: RecordReceiver, output: RecordSender) -> Result<(), PipekitError> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let (head, tail) = tokio::join!(self.head.run(input, tx), self.tail.run(rx, output));
        head.map_err(|e| e.into_stage_fault(self.head.name()))?;
        tail.map_err(|e| e.into_stage_fault(self.tail.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(texts: &[&str]) -> Vec<Record> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Record::new(format!("r{i}"), *t))
            .collect()
    }

    fn append(name: &'static str) -> Unit {
        Unit::map(name, move |mut r| {
            r.push_str(name);
            Ok(r)
        })
    }

    #[tokio::test]
    async fn pass_through_preserves_order() {
        let out = Unit::pass_through()
            .collect(records(&["one", "two", "three"]))
            .await
            .unwrap();
        let texts: Vec<_> = out.iter().map(|r| r.text().into_owned()).collect();
        assert_eq!(texts, ["one", "two", "three"]);
    }

    #[tokio::test]
    async fn pipe_applies_stages_in_order() {
        let unit = append("a").pipe(append("b")).pipe(append("c"));
        let out = unit.collect(records(&["Name:"])).await.unwrap();
        assert_eq!(out[0].text(), "Name:abc");
    }

    #[tokio::test]
    async fn chain_name_lists_both_stages() {
        let unit = append("a").pipe(append("b"));
        assert_eq!(unit.name(), "a | b");
    }

    #[tokio::test]
    async fn map_error_becomes_stage_fault() {
        let failing = Unit::map("explode", |_| Err(PipekitError::Internal("bad".into())));
        let err = append("a")
            .pipe(failing)
            .collect(records(&["x", "y", "z"]))
            .await
            .unwrap_err();
        match err {
            PipekitError::StageFault { stage, .. } => assert_eq!(stage, "explode"),
            other => panic!("expected stage fault, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failing_downstream_does_not_stall_upstream() {
        // More records than the channel holds, so upstream would block forever
        // if it kept waiting on a dead consumer.
        let inputs: Vec<Record> = (0..DEFAULT_CHANNEL_CAPACITY * 4)
            .map(|i| Record::new(format!("r{i}"), "x"))
            .collect();
        let failing = Unit::map("explode", |_| Err(PipekitError::Internal("bad".into())));
        let result = Unit::pass_through().pipe(failing).collect(inputs).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn ptr_eq_tracks_identity() {
        let unit = Unit::pass_through();
        let clone = unit.clone();
        assert!(unit.ptr_eq(&clone));
        assert!(!unit.ptr_eq(&Unit::pass_through()));
    }

    #[tokio::test]
    async fn unit_can_run_more_than_once() {
        let unit = append("a");
        let first = unit.collect(records(&["1"])).await.unwrap();
        let second = unit.collect(records(&["2"])).await.unwrap();
        assert_eq!(first[0].text(), "1a");
        assert_eq!(second[0].text(), "2a");
    }
}
