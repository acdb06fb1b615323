use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Targets rendered by [`layer`]: the backend binary and its workspace crates.
pub const TARGET_PREFIXES: &[&str] = &[
    "site_rag_backend",
    "ai_llm_service",
    "rag_index",
    "rag_answer",
    "api",
];

/// RFC3339 UTC timer without fractional seconds, e.g. `2025-09-12T10:20:30Z`.
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// Formatting layer that renders only events from [`TARGET_PREFIXES`].
///
/// Compact single-line output with `file:line`, span close timings and ANSI
/// colours when stdout is a terminal. Compose it with an [`EnvFilter`] in
/// the binary.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let only_workspace = filter::filter_fn(|meta| is_workspace_target(meta.target()));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_workspace)
}

fn is_workspace_target(target: &str) -> bool {
    TARGET_PREFIXES.iter().any(|p| {
        target == *p
            || target
                .strip_prefix(p)
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

/// `RUST_LOG` if set, otherwise `default`, with every workspace crate raised
/// to `level`.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    let level = LevelFilter::from_level(level);
    TARGET_PREFIXES
        .iter()
        .filter_map(|prefix| format!("{prefix}={level}").parse::<Directive>().ok())
        .fold(base, EnvFilter::add_directive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_crate_roots_and_modules_only() {
        assert!(is_workspace_target("rag_index"));
        assert!(is_workspace_target("rag_index::bootstrap"));
        assert!(is_workspace_target("api::routes::ask"));
        assert!(!is_workspace_target("apisix"));
        assert!(!is_workspace_target("hyper::proto"));
    }
}
