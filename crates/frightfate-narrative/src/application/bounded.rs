//! Time-bounded oracle calls.
//!
//! Every oracle call site goes through [`bounded`] or [`bounded_or_else`].
//! A call that overruns its budget is dropped, which cancels the in-flight
//! request; nothing it may have produced is kept.

use std::future::Future;
use std::time::Duration;

use frightfate_core::oracle::OracleError;
use tracing::warn;

/// Runs `call` with a deadline.
///
/// # Errors
///
/// `OracleError::Timeout` if the budget elapses first; otherwise whatever
/// `call` returned.
pub async fn bounded<T, F>(budget: Duration, call: F) -> Result<T, OracleError>
where
    F: Future<Output = Result<T, OracleError>>,
{
    tokio::time::timeout(budget, call)
        .await
        .unwrap_or(Err(OracleError::Timeout(budget)))
}

/// Runs `call` with a deadline, substituting `fallback()` on any failure.
///
/// Failures are logged at `warn` with `call_site` so degraded oracle
/// behaviour is visible without surfacing to players.
pub async fn bounded_or_else<T, F, G>(
    call_site: &'static str,
    budget: Duration,
    call: F,
    fallback: G,
) -> T
where
    F: Future<Output = Result<T, OracleError>>,
    G: FnOnce() -> T,
{
    match bounded(budget, call).await {
        Ok(value) => value,
        Err(error) => {
            warn!(call_site, %error, "oracle call failed, using fallback");
            fallback()
        }
    }
}
