//! HR vertical slice: employee records behind a storage gateway.

pub mod gateway;
pub mod model;
pub mod seed;
pub mod service;
pub mod store;

pub use gateway::{EmployeeGateway, StorageError};
pub use model::{Employee, EmployeeId};
pub use service::{EmployeeService, HrError, HrResult};
pub use store::SeaOrmEmployeeGateway;
