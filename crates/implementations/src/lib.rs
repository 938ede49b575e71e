//! Implementations under test.
//!
//! Vendors describe their VC-API endpoints in JSON manifests. This crate loads
//! those manifests into a [`Registry`], narrows it down to the endpoints
//! tagged for a given suite, and drives the endpoints through [`VcApiClient`].

mod client;
mod errors;
mod model;
mod registry;
mod retry;

pub use client::{VcApiClient, VerifyResponse};
pub use errors::{ClientError, RegistryError};
pub use model::{Endpoint, Implementation, LabelledEndpoint, Role};
pub use registry::Registry;
pub use retry::RetryOptions;
