//! Credential models: the in-memory token store, redacted secrets, and the persisted session.

pub mod secret;
pub mod session;
pub mod token_store;

pub use secret::*;
pub use session::*;
pub use token_store::*;
