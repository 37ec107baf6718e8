//! Demo fixture data for local environments.

use tracing::info;

use crate::{
    model::Employee,
    service::{EmployeeService, HrError, HrResult},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

pub fn demo_employees() -> Vec<Employee> {
    vec![
        Employee::new("John", "Doe", "john.doe@example.com"),
        Employee::new("Jane", "Smith", "jane.smith@example.com"),
        Employee::new("Ada", "Lovelace", "ada.lovelace@example.com"),
        Employee::new("Grace", "Hopper", "grace.hopper@example.com"),
    ]
}

/// Create the demo employees through the service. Emails already present are
/// skipped, so re-running is safe.
pub async fn seed_demo(service: &EmployeeService) -> HrResult<SeedReport> {
    let mut report = SeedReport::default();
    for employee in demo_employees() {
        match service.save_employee(employee).await {
            Ok(_) => report.created += 1,
            Err(HrError::AlreadyExists { .. }) => report.skipped += 1,
            Err(err) => return Err(err),
        }
    }
    info!(created = report.created, skipped = report.skipped, "demo employees seeded");
    Ok(report)
}
