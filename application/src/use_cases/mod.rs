//! Use cases

pub mod dispatch;
pub mod execute_command;
pub mod operation_command;
