// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Pipekit integration tests.
//!
//! # Components
//!
//! - [`TestHost`] - In-memory host context with error capture and config publishing
//! - [`append_name`], [`failing`], [`set_field`], [`tag_via_input`] - Demo stages
//! - [`fixture`], [`run_text`] - Record fixtures and a one-shot runner

pub mod harness;
pub mod host;
pub mod stages;

pub use harness::{fixture, run_text};
pub use host::TestHost;
pub use stages::{append_name, failing, set_field, tag_via_input};
