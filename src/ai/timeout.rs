//! Timeout helpers for collaborator calls
//!
//! ```ignore
//! let text = with_timeout(
//!     Duration::from_secs(120),
//!     llm.generate_chat(system, user, 800, 0.2),
//!     "section draft",
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::types::{DraftError, Result};

/// Execute an async operation with a timeout
///
/// Returns [`DraftError::Timeout`] if the operation doesn't complete within
/// the specified duration.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(DraftError::timeout(operation_name, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Ok::<_, DraftError>(42) },
            "test operation",
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, DraftError>(42)
            },
            "slow operation",
        )
        .await;
        assert!(matches!(result.unwrap_err(), DraftError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_with_timeout_passes_inner_error() {
        let result: Result<()> = with_timeout(
            Duration::from_secs(1),
            async { Err(DraftError::Retrieval("index offline".to_string())) },
            "retrieval",
        )
        .await;
        assert!(matches!(result.unwrap_err(), DraftError::Retrieval(_)));
    }
}
