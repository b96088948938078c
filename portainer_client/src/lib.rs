//! Portainer client for the Minecraft stack manager.
//!
//! This crate owns the two stateful pieces of the system:
//!
//! - [`SessionManager`]: caches the Portainer bearer token and renews it
//!   with a bounded retry when it expires.
//! - [`PortainerService`]: lifecycle operations over managed stacks (list,
//!   start, stop, create) plus compose descriptor generation, enforcing the
//!   single-active-stack invariant on the create path.
//!
//! All HTTP traffic goes through the [`ApiTransport`] trait so tests can
//! substitute an in-memory transport (`MockTransport`, behind the default
//! `mock-transport` feature) for the reqwest-backed default.

pub mod compose;
pub mod error;
pub mod service;
pub mod session;
pub mod transport;

#[cfg(feature = "mock-transport")]
pub mod mock;

pub use compose::{ComposeFile, SERVER_IMAGE};
pub use error::PortainerError;
pub use service::PortainerService;
pub use session::{SessionManager, MAX_AUTH_ATTEMPTS};
pub use transport::{ApiRequest, ApiResponse, ApiTransport, Method, ReqwestTransport, TransportError};

#[cfg(feature = "mock-transport")]
pub use mock::MockTransport;
