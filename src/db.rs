use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::AppError;

/// Upper bound on any single store call. An elapsed timer surfaces as 503
/// rather than a hung request.
const STORE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(STORE_TIMEOUT)
        .connect(database_url)
        .await
        .context("connect to database")?;
    Ok(pool)
}

/// Bounds a store call with [`STORE_TIMEOUT`] and lifts its error into the
/// request taxonomy.
pub async fn bound<T, F>(fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(STORE_TIMEOUT, fut).await {
        Ok(res) => res.map_err(AppError::from),
        Err(_) => Err(AppError::Unavailable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn bound_times_out_as_unavailable() {
        let never = std::future::pending::<Result<(), sqlx::Error>>();
        let err = bound(never).await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable));
    }

    #[tokio::test]
    async fn bound_passes_values_through() {
        let ok = async { Ok::<_, sqlx::Error>(7) };
        assert_eq!(bound(ok).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn bound_converts_store_errors() {
        let failing = async { Err::<(), _>(sqlx::Error::RowNotFound) };
        let err = bound(failing).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
