use dotenv::dotenv;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing and environment. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing_and_env() {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(fmt::format::FmtSpan::CLOSE)
                .with_target(false),
        )
        .init();
}
