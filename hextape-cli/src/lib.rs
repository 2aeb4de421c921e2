//! hextape CLI support: program loading and logging setup.

pub mod input;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging to stderr.
///
/// `RUST_LOG` overrides the default filter. Otherwise other crates log at
/// `warn` and the hextape crates at `info`, raised to `debug` by `-v` and
/// `trace` by `-vv`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,hextape={level},hextape_vm={level},hextape_cli={level}"
        ))
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
