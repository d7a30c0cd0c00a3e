//! Core domain types: error taxonomy and retry policy

pub mod error;
pub mod retry;
