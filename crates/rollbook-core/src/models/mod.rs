//! Data models for records served by the node service.

pub mod student;

pub use student::Student;
