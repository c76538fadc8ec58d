// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Pipekit composer.

use thiserror::Error;

/// The error type shared by the registry, the composer, and every stage.
#[derive(Debug, Error)]
pub enum PipekitError {
    /// A caller passed an argument the registry cannot accept (e.g. an empty plugin name).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The host context lacks a capability the composer needs at install time.
    #[error("missing dependency: the pipeline composer requires {capability} to be installed first")]
    MissingDependency { capability: String },

    /// A declarative plugin definition could not be applied.
    #[error("configuration error: {0}")]
    Config(String),

    /// A stage failed while records were flowing.
    #[error("stage `{stage}` failed: {message}")]
    StageFault {
        stage: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A chain of plugin aliases loops back on itself.
    #[error("plugin alias cycle: {}", chain.join(" -> "))]
    AliasCycle { chain: Vec<String> },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PipekitError {
    /// Build a [`PipekitError::StageFault`] without an underlying source.
    pub fn stage_fault(stage: impl Into<String>, message: impl Into<String>) -> Self {
        PipekitError::StageFault {
            stage: stage.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Attribute an error to the stage it escaped from.
    ///
    /// Stage faults pass through untouched so the innermost stage name is kept.
    pub fn into_stage_fault(self, stage: &str) -> Self {
        match self {
            fault @ PipekitError::StageFault { .. } => fault,
            other => PipekitError::StageFault {
                stage: stage.to_string(),
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }

    /// Returns true for errors that are raised synchronously to the caller.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PipekitError::InvalidArgument(_)
                | PipekitError::MissingDependency { .. }
                | PipekitError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dependency_names_capability() {
        let err = PipekitError::MissingDependency {
            capability: "an option store".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("an option store"));
        assert!(msg.contains("installed first"));
    }

    #[test]
    fn into_stage_fault_wraps_other_errors() {
        let err = PipekitError::Internal("boom".into()).into_stage_fault("lint");
        match err {
            PipekitError::StageFault { stage, message, source } => {
                assert_eq!(stage, "lint");
                assert!(message.contains("boom"));
                assert!(source.is_some());
            }
            other => panic!("expected stage fault, got {other:?}"),
        }
    }

    #[test]
    fn into_stage_fault_keeps_inner_stage() {
        let err = PipekitError::stage_fault("inner", "bad record").into_stage_fault("outer");
        assert_eq!(err.to_string(), "stage `inner` failed: bad record");
    }

    #[test]
    fn alias_cycle_renders_chain() {
        let err = PipekitError::AliasCycle {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "plugin alias cycle: a -> b -> a");
    }

    #[test]
    fn validation_classification() {
        assert!(PipekitError::InvalidArgument("x".into()).is_validation());
        assert!(PipekitError::Config("x".into()).is_validation());
        assert!(!PipekitError::stage_fault("s", "m").is_validation());
    }
}
