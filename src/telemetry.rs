//! Telemetry helpers for applications embedding `scalestack`.
//!
//! Scale and stacking anomalies (rejected domains, dropped records, duplicate
//! keys) are reported through `tracing` events rather than return values, so a
//! subscriber must be installed to observe them. Setup stays explicit and
//! opt-in: call `init_default_tracing` or wire your own subscriber.

#[cfg(feature = "telemetry")]
const DEFAULT_FILTER: &str = "info";

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when no initialization is performed (feature disabled) or if a
/// global subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER)),
            )
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
