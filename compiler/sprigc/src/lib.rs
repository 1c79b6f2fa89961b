//! sprig command-line driver.
//!
//! The binary in `main.rs` only dispatches on arguments; the commands live
//! here so they can be tested without spawning a process.

pub mod commands;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber when `RUST_LOG` is set.
///
/// ```text
/// RUST_LOG=sprig_parse=trace sprigc parse page.sp
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
