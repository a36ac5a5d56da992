//! File-backed [`SessionStore`] that survives process restarts.
//!
//! The file holds a JSON object mapping keys to serialized records, mirroring a browser's
//! key-value storage. Only [`SESSION_KEY`] is touched; other keys are preserved verbatim.

// std
use std::{
	fs::{self, File},
	io::{self, ErrorKind, Write},
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::Session,
	store::{SESSION_KEY, SessionStore, StoreError, StoreFuture},
};

type Entries = BTreeMap<String, String>;

/// Key-value file standing in for the browser storage a session normally lives in.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	entries: Arc<RwLock<Entries>>,
}
impl FileStore {
	/// Opens the store at `path`; a missing or empty file starts out with no entries.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();
		let entries = read_entries(&path)?;

		Ok(Self { path, entries: Arc::new(RwLock::new(entries)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn flush(&self, entries: &Entries) -> Result<(), StoreError> {
		let bytes = serde_json::to_vec_pretty(entries).map_err(|e| StoreError::Serialization {
			message: format!("Failed to encode {}: {e}", self.path.display()),
		})?;

		write_atomic(&self.path, &bytes).map_err(|e| backend("write", &self.path, e))
	}
}
impl SessionStore for FileStore {
	fn load(&self) -> StoreFuture<'_, Option<Session>> {
		Box::pin(async move {
			let entries = self.entries.read();
			let Some(raw) = entries.get(SESSION_KEY) else {
				return Ok(None);
			};

			serde_json::from_str(raw).map(Some).map_err(|e| StoreError::Serialization {
				message: format!("Stored session under `{SESSION_KEY}` is corrupt: {e}"),
			})
		})
	}

	fn save(&self, session: Session) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let raw = serde_json::to_string(&session).map_err(|e| StoreError::Serialization {
				message: format!("Failed to encode session: {e}"),
			})?;
			let mut entries = self.entries.write();

			entries.insert(SESSION_KEY.to_owned(), raw);
			self.flush(&entries)
		})
	}

	fn delete(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut entries = self.entries.write();

			match entries.remove(SESSION_KEY) {
				Some(_) => self.flush(&entries),
				None => Ok(()),
			}
		})
	}
}

fn read_entries(path: &Path) -> Result<Entries, StoreError> {
	let bytes = match fs::read(path) {
		Ok(bytes) => bytes,
		Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
		Err(e) => return Err(backend("read", path, e)),
	};

	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Ok(Entries::new());
	}

	serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
		message: format!("Failed to parse {}: {e}", path.display()),
	})
}

// Stages the bytes next to `path`, then renames over it.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
	if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
		fs::create_dir_all(dir)?;
	}

	let staging = path.with_extension("tmp");
	let mut file = File::create(&staging)?;

	file.write_all(bytes)?;
	file.sync_all()?;
	drop(file);

	fs::rename(&staging, path)
}

fn backend(action: &str, path: &Path, err: io::Error) -> StoreError {
	StoreError::Backend { message: format!("Failed to {action} {}: {err}", path.display()) }
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process, time::SystemTime};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	fn temp_path(label: &str) -> PathBuf {
		let nanos = SystemTime::now()
			.duration_since(SystemTime::UNIX_EPOCH)
			.map(|elapsed| elapsed.as_nanos())
			.unwrap_or_default();

		env::temp_dir().join(format!("phonebook_client_{label}_{}_{nanos}.json", process::id()))
	}

	fn runtime() -> Runtime {
		tokio::runtime::Builder::new_current_thread()
			.build()
			.expect("Failed to build Tokio runtime for file store test.")
	}

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_path("round_trip");
		let store = FileStore::open(&path).expect("Failed to open file store.");
		let session = Session::new("alice", "T1", "R1", 3600);
		let rt = runtime();

		rt.block_on(store.save(session.clone())).expect("Failed to save session to file store.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store.");
		let loaded = rt
			.block_on(reopened.load())
			.expect("Failed to load session from file store.")
			.expect("File store lost the session after reopen.");

		assert_eq!(loaded, session);

		rt.block_on(reopened.delete()).expect("Failed to delete session from file store.");

		let reopened = FileStore::open(&path).expect("Failed to reopen file store.");

		assert!(rt.block_on(reopened.load()).expect("Load after delete should succeed.").is_none());

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store {}: {e}", path.display())
		});
	}

	#[test]
	fn corrupt_session_surfaces_serialization_error() {
		let path = temp_path("corrupt");

		fs::write(&path, r#"{"userData":"{not json","theme":"dark"}"#)
			.expect("Failed to seed corrupt file store.");

		let store = FileStore::open(&path).expect("Store with a corrupt entry should still open.");
		let rt = runtime();
		let err = rt.block_on(store.load()).expect_err("Corrupt session should fail to load.");

		assert!(matches!(err, StoreError::Serialization { .. }));

		rt.block_on(store.delete()).expect("Deleting a corrupt session should succeed.");

		let raw = fs::read_to_string(&path).expect("Failed to read file store back.");

		assert!(raw.contains("theme"), "Unrelated keys must survive a session delete.");
		assert!(!raw.contains("userData"));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store {}: {e}", path.display())
		});
	}
}
