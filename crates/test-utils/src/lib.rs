//! Fixtures shared by the `cycledag` integration tests.
//!
//! - [`builders`]: `ConfigFileBuilder` and the `dtg` date helper.
//! - [`tree`]: path-based lookups on an assembled suite.

pub mod builders;
pub mod tree;

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Route assembler logs through the test harness capture.
///
/// Level comes from `RUST_LOG` (default `info`); output only shows for
/// failing tests or with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt().with_env_filter(filter).with_test_writer().init();
    });
}
