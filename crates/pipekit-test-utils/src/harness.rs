// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record fixtures and a one-shot runner.

use pipekit_core::{Record, Unit};

/// The record every composition test starts from.
pub fn fixture() -> Record {
    Record::new("fixtures/foo.txt", "Name:")
}

/// Run [`fixture`] through `unit` and return the resulting contents.
///
/// # Panics
///
/// Panics when the unit fails or emits no record.
pub async fn run_text(unit: &Unit) -> String {
    let out = unit
        .collect(vec![fixture()])
        .await
        .expect("pipeline run failed");
    out.first()
        .map(|record| record.text().into_owned())
        .expect("pipeline emitted no record")
}
