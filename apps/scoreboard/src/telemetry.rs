use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the JSON subscriber for binaries embedding the session.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    init_tracing_with("info,scoreboard=info");
}

/// Same as [`init_tracing`] with a caller-chosen default filter. Output goes
/// to stderr so a binary's stdout stays free for its own report.
pub fn init_tracing_with(default_filter: &str) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .json();

    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(fmt_layer)
        .try_init()
        .ok();
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}
