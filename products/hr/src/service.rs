//! Employee business rules.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{
    gateway::{EmployeeGateway, StorageError},
    model::{Employee, EmployeeId},
};

#[derive(Debug, Error)]
pub enum HrError {
    #[error("employee already exists with given email: {email}")]
    AlreadyExists { email: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type HrResult<T> = Result<T, HrError>;

#[derive(Clone)]
pub struct EmployeeService {
    gateway: Arc<dyn EmployeeGateway>,
}

impl EmployeeService {
    pub fn new(gateway: Arc<dyn EmployeeGateway>) -> Self {
        Self { gateway }
    }

    /// Persist a new employee. Fails with [`HrError::AlreadyExists`] when the
    /// email is taken; nothing is written in that case.
    ///
    /// The lookup and the insert are separate statements, so two concurrent
    /// creates with the same email can both succeed.
    #[instrument(name = "hr.save_employee", skip_all, fields(email = %candidate.email))]
    pub async fn save_employee(&self, candidate: Employee) -> HrResult<Employee> {
        if self.gateway.find_by_email(&candidate.email).await?.is_some() {
            warn!("employee email already in use");
            return Err(HrError::AlreadyExists {
                email: candidate.email,
            });
        }
        let saved = self.gateway.save(candidate).await?;
        debug!(id = ?saved.id, "employee created");
        Ok(saved)
    }

    #[instrument(name = "hr.get_all_employees", skip_all)]
    pub async fn get_all_employees(&self) -> HrResult<Vec<Employee>> {
        Ok(self.gateway.find_all().await?)
    }

    /// Point lookup by exact first and last name. Absence is `Ok(None)`.
    #[instrument(name = "hr.find_employee_by_name", skip(self))]
    pub async fn find_employee_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> HrResult<Option<Employee>> {
        Ok(self.gateway.find_by_name(first_name, last_name).await?)
    }

    #[instrument(name = "hr.get_employee_by_id", skip(self))]
    pub async fn get_employee_by_id(&self, id: EmployeeId) -> HrResult<Option<Employee>> {
        Ok(self.gateway.find_by_id(id).await?)
    }

    /// Overwrite all mutable fields of employee `id` with `changes`.
    ///
    /// Callers check that `id` exists first. Email uniqueness is not
    /// re-checked here.
    #[instrument(name = "hr.update_employee", skip(self, changes))]
    pub async fn update_employee(&self, id: EmployeeId, changes: Employee) -> HrResult<Employee> {
        let updated = self.gateway.save(changes.with_id(id)).await?;
        debug!("employee replaced");
        Ok(updated)
    }

    #[instrument(name = "hr.delete_employee", skip(self))]
    pub async fn delete_employee(&self, id: EmployeeId) -> HrResult<()> {
        self.gateway.delete_by_id(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// In-memory gateway that counts writes.
    #[derive(Default)]
    struct FakeGateway {
        rows: Mutex<Vec<Employee>>,
        writes: Mutex<usize>,
    }

    impl FakeGateway {
        fn writes(&self) -> usize {
            *self.writes.lock().unwrap()
        }

        fn rows(&self) -> Vec<Employee> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmployeeGateway for FakeGateway {
        async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StorageError> {
            Ok(self.rows().into_iter().find(|e| e.id == Some(id)))
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StorageError> {
            Ok(self.rows().into_iter().find(|e| e.email == email))
        }

        async fn find_by_name(
            &self,
            first_name: &str,
            last_name: &str,
        ) -> Result<Option<Employee>, StorageError> {
            Ok(self
                .rows()
                .into_iter()
                .find(|e| e.first_name == first_name && e.last_name == last_name))
        }

        async fn find_all(&self) -> Result<Vec<Employee>, StorageError> {
            Ok(self.rows())
        }

        async fn save(&self, employee: Employee) -> Result<Employee, StorageError> {
            *self.writes.lock().unwrap() += 1;
            let mut rows = self.rows.lock().unwrap();
            match employee.id {
                Some(id) => {
                    let slot = rows
                        .iter_mut()
                        .find(|e| e.id == Some(id))
                        .ok_or(sea_orm::DbErr::RecordNotUpdated)?;
                    *slot = employee.clone();
                    Ok(employee)
                }
                None => {
                    let next = rows.iter().filter_map(|e| e.id).max().unwrap_or(0) + 1;
                    let saved = employee.with_id(next);
                    rows.push(saved.clone());
                    Ok(saved)
                }
            }
        }

        async fn delete_by_id(&self, id: EmployeeId) -> Result<(), StorageError> {
            *self.writes.lock().unwrap() += 1;
            self.rows.lock().unwrap().retain(|e| e.id != Some(id));
            Ok(())
        }
    }

    fn service() -> (EmployeeService, Arc<FakeGateway>) {
        let gateway = Arc::new(FakeGateway::default());
        (EmployeeService::new(gateway.clone()), gateway)
    }

    fn john() -> Employee {
        Employee::new("John", "Doe", "john.doe@example.com")
    }

    #[tokio::test]
    async fn save_employee_assigns_id() {
        let (service, _) = service();
        let saved = service.save_employee(john()).await.unwrap();
        assert!(saved.id.unwrap() > 0);
        assert_eq!(saved.first_name, "John");
        assert_eq!(saved.last_name, "Doe");
        assert_eq!(saved.email, "john.doe@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_writing() {
        let (service, gateway) = service();
        service.save_employee(john()).await.unwrap();
        let writes_before = gateway.writes();

        let err = service
            .save_employee(Employee::new("Johnny", "Dee", "john.doe@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            HrError::AlreadyExists { ref email } if email == "john.doe@example.com"
        ));
        assert_eq!(gateway.writes(), writes_before);
        assert_eq!(gateway.rows().len(), 1);
    }

    #[tokio::test]
    async fn empty_storage_lists_nothing() {
        let (service, _) = service();
        assert!(service.get_all_employees().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_id_is_absent() {
        let (service, _) = service();
        assert_eq!(service.get_employee_by_id(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn finds_employee_by_name() {
        let (service, _) = service();
        let saved = service.save_employee(john()).await.unwrap();

        assert_eq!(
            service.find_employee_by_name("John", "Doe").await.unwrap(),
            Some(saved)
        );
        assert_eq!(service.find_employee_by_name("John", "Roe").await.unwrap(), None);
    }

    #[tokio::test]
    async fn saved_employee_round_trips() {
        let (service, _) = service();
        let saved = service.save_employee(john()).await.unwrap();
        let fetched = service.get_employee_by_id(saved.id.unwrap()).await.unwrap();
        assert_eq!(fetched, Some(saved));
    }

    #[tokio::test]
    async fn update_replaces_all_fields() {
        let (service, _) = service();
        let id = service.save_employee(john()).await.unwrap().id.unwrap();

        let updated = service
            .update_employee(id, Employee::new("Jane", "Smith", "jane.smith@example.com"))
            .await
            .unwrap();

        let expected = Employee::new("Jane", "Smith", "jane.smith@example.com").with_id(id);
        assert_eq!(updated, expected);
        assert_eq!(service.get_employee_by_id(id).await.unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn update_ignores_id_in_payload() {
        let (service, _) = service();
        let id = service.save_employee(john()).await.unwrap().id.unwrap();

        let updated = service
            .update_employee(id, john().with_id(id + 100))
            .await
            .unwrap();
        assert_eq!(updated.id, Some(id));
    }

    #[tokio::test]
    async fn update_does_not_recheck_email() {
        let (service, _) = service();
        service.save_employee(john()).await.unwrap();
        let jane = service
            .save_employee(Employee::new("Jane", "Smith", "jane.smith@example.com"))
            .await
            .unwrap();

        let updated = service
            .update_employee(
                jane.id.unwrap(),
                Employee::new("Jane", "Smith", "john.doe@example.com"),
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "john.doe@example.com");
    }

    #[tokio::test]
    async fn delete_then_get_is_absent_and_repeatable() {
        let (service, _) = service();
        let id = service.save_employee(john()).await.unwrap().id.unwrap();

        service.delete_employee(id).await.unwrap();
        assert_eq!(service.get_employee_by_id(id).await.unwrap(), None);
        service.delete_employee(id).await.unwrap();
    }

    #[tokio::test]
    async fn storage_errors_propagate() {
        let (service, _) = service();
        let err = service.update_employee(5, john()).await.unwrap_err();
        assert!(matches!(err, HrError::Storage(_)));
    }
}
