//! Port definitions (interfaces for external adapters)

pub mod business_operation;
pub mod command;
pub mod command_schema;
pub mod credential;
