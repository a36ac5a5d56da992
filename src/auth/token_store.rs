//! Process-local holder of the current access token.
//!
//! The dispatcher reads the token on every outgoing call, so it lives in memory next to the
//! persisted [`Session`](crate::auth::Session) instead of being deserialized per request.
//! A [`TokenStore`] is constructed explicitly and handed to the client; clones share the same
//! cell, while independently constructed stores never observe each other.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Shared, cloneable access-token cell.
#[derive(Clone, Default)]
pub struct TokenStore(Arc<RwLock<Option<TokenSecret>>>);
impl TokenStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the held token unconditionally.
	pub fn set_token(&self, token: impl Into<TokenSecret>) {
		*self.0.write() = Some(token.into());
	}

	/// Returns the held token, if any.
	pub fn token(&self) -> Option<TokenSecret> {
		self.0.read().clone()
	}

	/// Resets the store to empty.
	pub fn clear_token(&self) {
		*self.0.write() = None;
	}

	/// Returns `true` when a token is held.
	pub fn has_token(&self) -> bool {
		self.0.read().is_some()
	}
}
impl Debug for TokenStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenStore").field("token_set", &self.has_token()).finish()
	}
}
