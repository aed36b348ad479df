//! Configuration module for loading simulation parameters.

mod parameters;

pub use parameters::{Parameters, SessionParameters, DEFAULT_SESSION_PATH};
