//! Authentication module
//!
//! The API authenticates every request with a personal access token sent
//! as a bearer token. `Authenticator` applies it to outgoing requests.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::AuthConfig;
