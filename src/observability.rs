//! This module provides observability and diagnostics hooks for the traversal.
//!
//! The `log_metric!` macro emits a structured key-value line through the `log`
//! facade at debug level. The `#[cfg(debug_assertions)]` attribute compiles the
//! macro body out of release builds.

/// Logs a structured key-value metric string, only in debug builds.
///
/// # Example
/// ```
/// use framejson::log_metric;
/// let columns = 4;
/// log_metric!("event"="block_cursor", "columns"=&columns);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            log::debug!("FRAMEJSON_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
