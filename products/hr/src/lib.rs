//! HR module: the employee directory.
//!
//! [`EmployeeStore`] is the only way records are read or written. Every write
//! goes through the same validation path, so the invariants on `email`,
//! `status` and `employeeType` hold regardless of which surface calls it.

mod model;
mod store;
mod validate;

pub use model::{DEFAULT_PROFILE_PIC, Employee, EmployeeFields, EmployeeFilter, EmployeeStats};
pub use store::{EmployeeStore, StoreError, StoreResult};
pub use validate::FieldErrors;
