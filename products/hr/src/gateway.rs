//! Storage port for employee records.

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

use crate::model::{Employee, EmployeeId};

/// Failures raised by a gateway implementation. Never used for "not found".
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Database(#[from] DbErr),
}

#[async_trait]
pub trait EmployeeGateway: Send + Sync {
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StorageError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StorageError>;

    /// First record whose first and last name both match exactly.
    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Employee>, StorageError>;

    /// All records in insertion order.
    async fn find_all(&self) -> Result<Vec<Employee>, StorageError>;

    /// Insert when `employee.id` is `None`, otherwise overwrite every mutable
    /// column of the row with that id. Returns the persisted state.
    async fn save(&self, employee: Employee) -> Result<Employee, StorageError>;

    /// Removing an id that does not exist is not an error.
    async fn delete_by_id(&self, id: EmployeeId) -> Result<(), StorageError>;
}
