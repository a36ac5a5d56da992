#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::MockServer;
use parking_lot::Mutex;
// self
use phonebook_client::{
	auth::{Session, TokenStore},
	client::ApiClient,
	config::{ClientConfig, parse_base_url},
	http::ReqwestTransport,
	nav::{Navigator, SessionEvent},
	store::MemoryStore,
};

/// Navigator stub that records redirects and reports a fixed location.
#[derive(Debug)]
pub struct RecordingNavigator {
	location: Mutex<String>,
	visits: Mutex<Vec<String>>,
}
impl RecordingNavigator {
	pub fn at(location: &str) -> Arc<Self> {
		Arc::new(Self { location: Mutex::new(location.into()), visits: Mutex::new(Vec::new()) })
	}

	pub fn visits(&self) -> Vec<String> {
		self.visits.lock().clone()
	}
}
impl Navigator for RecordingNavigator {
	fn current_path(&self) -> String {
		self.location.lock().clone()
	}

	fn redirect(&self, path: &str) {
		self.visits.lock().push(path.to_owned());
		*self.location.lock() = path.to_owned();
	}
}

pub struct Harness {
	pub client: ApiClient<ReqwestTransport>,
	pub store: MemoryStore,
	pub tokens: TokenStore,
	pub navigator: Arc<RecordingNavigator>,
	pub events: Arc<Mutex<Vec<SessionEvent>>>,
}

pub fn config(server: &MockServer) -> ClientConfig {
	config_at(&server.url("/api"))
}

pub fn config_at(base_url: &str) -> ClientConfig {
	let base = parse_base_url(base_url).expect("Test base URL should parse.");

	ClientConfig::builder(base)
		.redirect_delay(time::Duration::milliseconds(10))
		.build()
		.expect("Test config should validate.")
}

pub fn harness(server: &MockServer, session: Option<Session>, location: &str) -> Harness {
	harness_with(config(server), session, location)
}

pub fn harness_with(config: ClientConfig, session: Option<Session>, location: &str) -> Harness {
	let store = session.map(MemoryStore::with_session).unwrap_or_default();
	let tokens = TokenStore::new();
	let navigator = RecordingNavigator::at(location);
	let events = Arc::new(Mutex::new(Vec::new()));
	let sink = events.clone();
	let client = ApiClient::with_transport(
		config,
		Arc::new(store.clone()),
		tokens.clone(),
		ReqwestTransport::default(),
	)
	.with_navigator(navigator.clone())
	.with_listener(move |event: &SessionEvent| sink.lock().push(event.clone()));

	Harness { client, store, tokens, navigator, events }
}

pub async fn settle() {
	tokio::time::sleep(std::time::Duration::from_millis(100)).await;
}
