//! Tracing subscriber setup.
//!
//! Level comes from `RUST_LOG` (default `info`). `log_format` picks
//! human-readable or JSON lines on stderr. With the `profile-console`
//! feature the tokio-console layer is installed instead.

use tracing_subscriber::EnvFilter;

use crate::settings::LogFormat;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(not(feature = "profile-console"))]
pub fn init(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(feature = "profile-console")]
pub fn init(_format: LogFormat) {
    console_subscriber::init();
}
