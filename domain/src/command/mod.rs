//! Command domain module
//!
//! Pure command data: [`CommandMetadata`] describing a command, the
//! [`CommandPath`] used to address it, and the [`CommandOutput`] payload
//! type. The async `Command` trait itself lives in the application layer.

pub mod entities;

pub use entities::{CommandMetadata, CommandOutput, CommandPath, listing_output};
