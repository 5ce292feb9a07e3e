#![doc(test(attr(deny(warnings))))]

//! Carbon Quiz asks five lifestyle questions, sends the answers to a
//! calculation service and presents the yearly CO₂e footprint as text, a pie
//! chart and a printable report.

pub mod cli;
pub mod compute;
pub mod config;
pub mod errors;
pub mod quiz;
pub mod render;
pub mod report;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Carbon Quiz tracing initialized.");
    });
}
