//! Logging initialization for the command line tool
//!
//! Logs always go to stderr so generated code streamed to stdout stays clean.
//! `RUST_LOG` overrides the level given on the command line.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber, human-readable or as JSON lines.
pub fn init_logging(level: &str, json: bool) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::registry().with(build_env_filter(level));

    if json {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr);
        subscriber.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stderr);
        subscriber.with(layer).try_init()?;
    }

    Ok(())
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scibind={level},scibind_codegen={level}")))
}
