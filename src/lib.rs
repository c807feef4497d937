//! This file is the root of the `framejson` Rust crate.
//!
//! `framejson` projects labeled columnar tables, labeled series, N-dimensional
//! arrays and generic nested values into JSON text in one of five orientations
//! (`split`, `records`, `index`, `columns`, `values`).
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`traversal`, `kernels`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the public entry points and the opt-in logger setup.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod config;
pub mod error;
pub mod kernels;
pub mod sink;
pub mod traversal;
pub mod types;

mod traits;

//==================================================================================
// 2. Public API
//==================================================================================
pub use bridge::{
    encode_events, record_batch_to_frame, record_batch_to_json, to_json, to_json_value,
    to_json_with_handler,
};
pub use config::{EncoderConfig, Orientation, TimeUnit};
pub use error::{ErrorKind, FrameJsonError};
pub use sink::{Event, EventSink, JsonScalar, JsonWriter, ValueSink};
pub use traversal::{DefaultHandler, Encoder};
pub use types::{DataFrame, Index, NdArray, Series, Value};

//==================================================================================
// 3. Logging
//==================================================================================
use log::LevelFilter;
use std::fs::OpenOptions;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Routes the crate's `log` output (including `FRAMEJSON_METRIC` lines) to
/// stderr, or appends it to `log_file` when one is given.
///
/// Only the first call has any effect.
pub fn enable_verbose_logging(log_file: Option<&str>) -> Result<(), FrameJsonError> {
    let mut outcome = Ok(());
    INIT_LOGGER.call_once(|| {
        outcome = init_logger(log_file);
    });
    outcome
}

fn init_logger(log_file: Option<&str>) -> Result<(), FrameJsonError> {
    let mut builder = env_logger::Builder::new();

    builder.is_test(false);
    builder.filter_level(LevelFilter::Debug);

    // Custom formatter: just print the level and message
    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())?;
        buf.flush()?;
        Ok(())
    });

    if let Some(filename) = log_file {
        let file = OpenOptions::new().append(true).create(true).open(filename)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    // Another logger may already be installed by the host application.
    let _ = builder.try_init();
    Ok(())
}
