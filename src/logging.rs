// File: src/logging.rs
//
// Tracing setup. Nothing is installed unless RUST_LOG is set, so normal
// program output stays clean:
//
//     RUST_LOG=emo=debug emo run program.emo
//     RUST_LOG=emo::interpreter=trace emo run program.emo   # scope push/pop

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber once; later calls do nothing.
pub fn init() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .try_init();
        }
    });
}
