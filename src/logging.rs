use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;

/// Installs a compact stderr subscriber. `RUST_LOG` overrides the default
/// `info` level, e.g. `RUST_LOG=tabular_dnn=debug` for per-batch detail.
pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

/// Subscriber scoped to the current thread, for tests that want log output.
pub fn init_logging_tests() -> tracing::subscriber::DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}
