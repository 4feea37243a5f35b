pub mod calculations;
pub mod client;
pub mod models;
pub mod validation;

pub use client::backend::{BackendClient, ClientError};
pub use models::*;
pub use validation::{FormField, ValidationError};
