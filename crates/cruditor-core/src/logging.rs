//! Logging integration.
//!
//! Provides a [`tracing`]-based subscriber setup shared by applications built
//! on the cruditor view stack.

/// Sets up the global tracing subscriber.
///
/// The filter string follows the `tracing_subscriber::EnvFilter` syntax
/// (e.g. `"info"`, `"cruditor_views=debug"`). In debug mode a pretty,
/// human-readable format is used; otherwise a structured JSON format.
pub fn setup_logging(debug: bool, filter: &str) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    if debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for an HTTP request.
///
/// # Examples
///
/// ```
/// use cruditor_core::logging::request_span;
///
/// let span = request_span("GET", "/persons/");
/// let _guard = span.enter();
/// tracing::info!("handling request");
/// ```
pub fn request_span(method: &str, path: &str) -> tracing::Span {
    tracing::info_span!("request", %method, %path)
}
