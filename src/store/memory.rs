//! Thread-safe in-memory [`SessionStore`] for tests and demos.

// self
use crate::{
	_prelude::*,
	auth::Session,
	store::{SessionStore, StoreFuture},
};

/// Keeps the session in-process; clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Option<Session>>>);
impl MemoryStore {
	/// Creates a store pre-populated with `session`.
	pub fn with_session(session: Session) -> Self {
		Self(Arc::new(RwLock::new(Some(session))))
	}

	/// Returns a snapshot of the stored session without going through the async contract.
	pub fn snapshot(&self) -> Option<Session> {
		self.0.read().clone()
	}
}
impl SessionStore for MemoryStore {
	fn load(&self) -> StoreFuture<'_, Option<Session>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn save(&self, session: Session) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(session);

			Ok(())
		})
	}

	fn delete(&self) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			slot.write().take();

			Ok(())
		})
	}
}
