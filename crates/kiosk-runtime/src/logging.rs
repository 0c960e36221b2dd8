#![forbid(unsafe_code)]

//! Subscriber installation for hosts.
//!
//! The engines only emit `tracing` events; a binary decides where they go.
//! With the `subscriber` feature, [`init_from_env`] installs a fmt
//! subscriber whose filter comes from `KIOSK_LOG`, then `RUST_LOG`, then
//! [`DEFAULT_FILTER`].

/// Env var checked first for the log filter.
pub const LOG_ENV: &str = "KIOSK_LOG";

/// Filter used when neither env var is set.
pub const DEFAULT_FILTER: &str = "info";

/// Picks the filter directive from the two candidate variables.
///
/// Empty values count as unset.
pub fn filter_directive(kiosk_log: Option<&str>, rust_log: Option<&str>) -> String {
    [kiosk_log, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// The filter directive for the current process environment.
pub fn filter_from_env() -> String {
    let kiosk = std::env::var(LOG_ENV).ok();
    let rust = std::env::var("RUST_LOG").ok();
    filter_directive(kiosk.as_deref(), rust.as_deref())
}

/// Builds the filter for `directive`.
///
/// Returns the filter and whether it fell back to [`DEFAULT_FILTER`]
/// because `directive` did not parse.
#[cfg(feature = "subscriber")]
pub fn build_filter(directive: &str) -> (tracing_subscriber::EnvFilter, bool) {
    use tracing_subscriber::EnvFilter;

    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, false),
        Err(_) => (EnvFilter::new(DEFAULT_FILTER), true),
    }
}

/// Installs a global fmt subscriber writing to stderr, filtered by
/// `directive`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed. An unparseable
/// directive falls back to [`DEFAULT_FILTER`].
#[cfg(feature = "subscriber")]
pub fn init_with_directive(directive: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let (filter, fell_back) = build_filter(directive);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    if fell_back {
        tracing::warn!(directive, fallback = DEFAULT_FILTER, "invalid log filter");
    }
    Ok(())
}

/// Installs a global fmt subscriber configured from the environment.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
#[cfg(feature = "subscriber")]
pub fn init_from_env() -> Result<(), tracing_subscriber::util::TryInitError> {
    init_with_directive(&filter_from_env())
}
