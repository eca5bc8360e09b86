pub mod employee;
pub mod leave_record;
pub mod user;
