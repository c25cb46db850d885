use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install a compact stderr subscriber for applications embedding the adapter.
///
/// `RUST_LOG` takes precedence over `verbose`. Calling this more than once, or
/// after another subscriber was installed, is a no-op.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("translate_adapter={}", level)));

    let _ = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
