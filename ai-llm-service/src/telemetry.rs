use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefixes of the workspace crates whose events this layer renders.
pub const WORKSPACE_TARGETS: &[&str] = &[
    "pdf_query_backend",
    "api",
    "contextor",
    "rag_store",
    "ai_llm_service",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

fn is_workspace_target(target: &str) -> bool {
    WORKSPACE_TARGETS.iter().any(|prefix| {
        target == *prefix
            || target
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

/// Build a formatting layer that renders ONLY events emitted by the workspace crates.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line` and target
/// - Span close events (duration at the end of spans)
/// - ANSI colors only when stdout is a terminal
///
/// Dependency noise (hyper, reqwest internals) is dropped by the per-layer filter
/// without touching the global `EnvFilter`.
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

/// Create an `EnvFilter` from `RUST_LOG` or the given fallback, then raise every
/// workspace crate to `level`.
///
/// Example: `default = "warn"`, `level = Level::DEBUG` keeps dependencies at WARN
/// and shows DEBUG for the service crates.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let level = level.as_str().to_lowercase();

    WORKSPACE_TARGETS
        .iter()
        .filter_map(|target| format!("{target}={level}").parse().ok())
        .fold(base, |filter, directive| filter.add_directive(directive))
}
