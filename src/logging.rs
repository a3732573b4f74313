use tracing_subscriber::{fmt, EnvFilter};

/// Install the global `fmt` subscriber. `RUST_LOG` overrides the default
/// filter. Logs go to stderr so stdout carries only user-facing output.
pub fn init() {
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,csvtidy=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));
}
