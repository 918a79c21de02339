//! Logging setup
//!
//! Info records are written verbatim so the device report keeps its exact
//! layout; everything else is tagged with level and target.

pub use log::{debug, error, info, trace, warn, LevelFilter};
use log::{Level, Record};
use std::io::Write;

/// Initialize the logging system
///
/// `level` is the default filter; `RUST_LOG` overrides it when set. Calling
/// this more than once keeps the first logger.
pub fn init(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", render(record)))
        .try_init();
}

fn render(record: &Record<'_>) -> String {
    if record.level() == Level::Info {
        record.args().to_string()
    } else {
        format!("[{} {}] {}", record.level(), record.target(), record.args())
    }
}
