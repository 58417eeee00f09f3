use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(debug: bool) -> EnvFilter {
    let directives = if debug {
        "backstage=debug,info"
    } else {
        "backstage=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

/// Compact human-readable output for interactive sessions.
pub fn init_cli_logger(debug: bool) {
    tracing_subscriber::registry()
        .with(default_filter(debug))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON lines, for running headless on the robot's companion computer.
pub fn init_json_logger(debug: bool) {
    tracing_subscriber::registry()
        .with(default_filter(debug))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
