//! Authentication service business logic.

mod auth_service;
mod customer_service;
mod token;

use std::future::Future;
use std::time::Duration;

use common::{AppError, AppResult};

pub use auth_service::{AuthService, AuthenticationResult, Authenticator};
pub use customer_service::{CustomerManager, CustomerService};
pub use token::{SessionClaims, SessionToken, TokenIssuer};

/// Lookup key for a login identifier.
pub(crate) fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

/// Run a store call with an upper bound on how long it may take.
///
/// An elapsed timeout is reported as `AppError::StoreUnavailable`.
pub(crate) async fn bounded<T, F>(limit: Duration, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Credential store call timed out");
            Err(AppError::store_unavailable("store call timed out"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let result = bounded(Duration::from_millis(50), async { Ok::<_, AppError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let result = bounded(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, AppError>(())
        })
        .await;

        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }
}
