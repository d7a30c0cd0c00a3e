//! Response envelope

pub mod envelope;

pub use envelope::{ResponseEnvelope, SUCCESS_MESSAGE, StatusCode};
