pub mod backend;
pub mod factory;

pub use backend::{BackendClient, ClientError};
pub use factory::{BackendFactory, BackendRegistry, ClientConfig};
