use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes console logging on stderr.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `info`, or `debug`
/// with `verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("name_shortlist={}", level)));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
