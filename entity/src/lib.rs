pub mod app_user;
pub mod email;
pub mod employee;
