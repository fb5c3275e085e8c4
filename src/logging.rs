//! Stderr logging for the CLI.
//!
//! Every line carries the time since the logger was installed, so long runs
//! over large inputs show where the time goes.

use std::io::Write;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Initialize `env_logger` with an elapsed-time prefix on stderr.
///
/// `verbose` raises the default level from Warn to Info; `RUST_LOG` still
/// overrides per module. Safe to call more than once (later calls are ignored).
pub fn init_logger(verbose: bool) {
    START_TIME.get_or_init(Instant::now);

    let level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let elapsed = START_TIME
                .get()
                .map(Instant::elapsed)
                .unwrap_or(Duration::ZERO);
            writeln!(
                buf,
                "[{}] {}: {}",
                format_elapsed(elapsed),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .try_init();
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
