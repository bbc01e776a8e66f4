//! Tracing hooks for query compilation.
//!
//! Optional support gated behind the `tracing` feature flag. When enabled,
//! every compiled tree emits a structured debug event carrying the root
//! table and the generated SQL.

/// Emits a trace event for a compiled query when the `tracing` feature is
/// enabled.
///
/// This macro is a no-op when the `tracing` feature is disabled.
macro_rules! trace_compile {
    ($table:expr, $sql:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(table = %$table, sql = %$sql, "jsonquery.compile");
    };
}

pub(crate) use trace_compile;
