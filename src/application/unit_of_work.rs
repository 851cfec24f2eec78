//! Commit-or-rollback helper shared by the booking engine and the
//! reconciliation job

use tracing::warn;

use crate::domain::repositories::UnitOfWork;
use crate::shared::DomainResult;

/// Commit when `result` is `Ok`, roll back otherwise.
pub(crate) async fn finish<T>(uow: Box<dyn UnitOfWork>, result: DomainResult<T>) -> DomainResult<T> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}
