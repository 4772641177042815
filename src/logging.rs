use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &[
    "zrcal",
    "zrcal_calibrate",
    "zrcal_events",
    "zrcal_io",
];

/// Builds the default filter directive for a verbosity count.
///
/// 0 -> warn, 1 -> info, 2 -> debug, 3+ -> trace.
fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing based on CLI verbosity level.
///
/// `RUST_LOG` env var overrides the CLI flag if set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_is_warn() {
        assert!(default_directive(0).starts_with("zrcal=warn,"));
    }

    #[test]
    fn verbosity_saturates_at_trace() {
        let d = default_directive(7);
        assert_eq!(d.matches("=trace").count(), CRATE_TARGETS.len());
    }
}
