//! Subscriber setup for binaries and tests embedding the engine.
//!
//! The library itself only emits `tracing` spans and events; nothing is printed unless the host
//! installs a subscriber, for instance with [`init_tracing`].

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a global `tracing` subscriber writing to stderr.
///
/// `level` is either a bare level (`"debug"`, applied to this crate) or a full filter directive.
/// The `WGRAPHS_LOG` environment variable overrides it.
pub fn init_tracing(level: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = level.unwrap_or("warn");
    let filter = EnvFilter::try_from_env("WGRAPHS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if level.contains('=') {
            level.to_string()
        } else {
            format!("wgraphs={level}")
        })
    });

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_span_events(fmt::format::FmtSpan::CLOSE),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails() {
        // Only one global subscriber may exist per process; whichever test wins the race,
        // a repeated call has to report an error instead of panicking.
        let _ = init_tracing(Some("debug"), false);
        assert!(init_tracing(Some("debug"), true).is_err());
    }
}
