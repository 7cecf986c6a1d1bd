use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over `verbosity`.
pub fn initialize_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    // Ignore AlreadyInit, tests may install their own subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
