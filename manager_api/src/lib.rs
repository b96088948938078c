// Minecraft stack manager REST server library.
//
// Thin controller layer over `portainer_client`: the four routes forward to
// the service's public operations and relay results and errors as JSON.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::ApiState;
