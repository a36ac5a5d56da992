//! Client configuration: backend location, auth endpoint layout, and timing knobs.

// std
use std::env;
// self
use crate::{_prelude::*, http::ApiRequest};

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "PHONEBOOK_API_BASE_URL";
/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Errors raised while constructing or validating a [`ClientConfig`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ClientConfigError {
	/// Base URL could not be parsed.
	#[error("Base URL `{url}` is invalid: {reason}.")]
	InvalidBaseUrl {
		/// Raw value that failed to parse.
		url: String,
		/// Parser message.
		reason: String,
	},
	/// Base URL must be an http(s) URL that can carry a path.
	#[error("Base URL `{url}` must be an http or https URL.")]
	UnsupportedBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Paths and prefixes must be absolute.
	#[error("The {field} path must start with `/`: {value}.")]
	RelativePath {
		/// Which setting failed validation.
		field: &'static str,
		/// Offending value.
		value: String,
	},
	/// Durations must not be negative.
	#[error("The {field} duration must not be negative.")]
	NegativeDuration {
		/// Which setting failed validation.
		field: &'static str,
	},
}

/// Immutable client settings shared by the dispatcher and the session lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Backend base URL; request paths are appended to its path.
	pub base_url: Url,
	/// Path prefix identifying authentication endpoints (never sent a bearer token).
	pub auth_prefix: String,
	/// Login endpoint.
	pub login_path: String,
	/// Registration endpoint.
	pub register_path: String,
	/// Refresh endpoint.
	pub refresh_path: String,
	/// Navigation target once a session is terminated.
	pub login_page: String,
	/// Navigation locations that count as authentication pages (no redirect from them).
	pub auth_pages: Vec<String>,
	/// Delay between session termination and the redirect.
	pub redirect_delay: Duration,
	/// Calls slower than this are logged as warnings.
	pub slow_call_threshold: Duration,
	/// Headers attached to every call, keyed by lower-case name.
	pub default_headers: BTreeMap<String, String>,
}
impl ClientConfig {
	/// Returns a builder seeded with defaults and the provided base URL.
	pub fn builder(base_url: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Builds a configuration from [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`].
	pub fn from_env() -> Result<Self, ClientConfigError> {
		Self::from_base_url_override(env::var(BASE_URL_ENV).ok())
	}

	/// Builds a configuration from an optional base URL override, falling back to
	/// [`DEFAULT_BASE_URL`] when none is given.
	pub fn from_base_url_override(raw: Option<String>) -> Result<Self, ClientConfigError> {
		let raw = raw.as_deref().unwrap_or(DEFAULT_BASE_URL);

		Self::builder(parse_base_url(raw)?).build()
	}

	/// Returns `true` if `path` targets an authentication endpoint.
	pub fn is_auth_path(&self, path: &str) -> bool {
		path.starts_with(&self.auth_prefix)
	}

	/// Returns `true` if the navigation location is an authentication page.
	pub fn is_auth_page(&self, location: &str) -> bool {
		self.auth_pages.iter().any(|page| page == location)
	}

	/// Resolves a request against the base URL, encoding its query exactly once.
	pub fn resolve(&self, request: &ApiRequest) -> Url {
		let mut url = self.base_url.clone();
		let base_path = self.base_url.path().trim_end_matches('/');

		url.set_path(&format!("{base_path}{}", request.path));
		url.set_query(None);

		if !request.query.is_empty() {
			url.query_pairs_mut().extend_pairs(request.query.iter());
		}

		url
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	config: ClientConfig,
}
impl ClientConfigBuilder {
	const DEFAULT_REDIRECT_DELAY: Duration = Duration::milliseconds(100);
	const DEFAULT_SLOW_CALL_THRESHOLD: Duration = Duration::seconds(3);

	/// Creates a builder with default endpoint layout and timings.
	pub fn new(base_url: Url) -> Self {
		let mut default_headers = BTreeMap::new();

		default_headers.insert("content-type".to_owned(), "application/json".to_owned());

		Self {
			config: ClientConfig {
				base_url,
				auth_prefix: "/auth/".into(),
				login_path: "/auth/login".into(),
				register_path: "/auth/register".into(),
				refresh_path: "/auth/refresh".into(),
				login_page: "/login".into(),
				auth_pages: vec!["/login".into(), "/register".into()],
				redirect_delay: Self::DEFAULT_REDIRECT_DELAY,
				slow_call_threshold: Self::DEFAULT_SLOW_CALL_THRESHOLD,
				default_headers,
			},
		}
	}

	/// Overrides the authentication endpoint prefix.
	pub fn auth_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.config.auth_prefix = prefix.into();

		self
	}

	/// Overrides the login endpoint.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.config.login_path = path.into();

		self
	}

	/// Overrides the registration endpoint.
	pub fn register_path(mut self, path: impl Into<String>) -> Self {
		self.config.register_path = path.into();

		self
	}

	/// Overrides the refresh endpoint.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.config.refresh_path = path.into();

		self
	}

	/// Overrides the login page used as redirect target.
	pub fn login_page(mut self, page: impl Into<String>) -> Self {
		self.config.login_page = page.into();

		self
	}

	/// Replaces the list of authentication pages.
	pub fn auth_pages<I, S>(mut self, pages: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.config.auth_pages = pages.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the redirect delay.
	pub fn redirect_delay(mut self, delay: Duration) -> Self {
		self.config.redirect_delay = delay;

		self
	}

	/// Overrides the slow-call warning threshold.
	pub fn slow_call_threshold(mut self, threshold: Duration) -> Self {
		self.config.slow_call_threshold = threshold;

		self
	}

	/// Adds or replaces a default header.
	pub fn default_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
		self.config.default_headers.insert(name.as_ref().to_ascii_lowercase(), value.into());

		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let config = self.config;

		if !matches!(config.base_url.scheme(), "http" | "https")
			|| config.base_url.cannot_be_a_base()
		{
			return Err(ClientConfigError::UnsupportedBaseUrl {
				url: config.base_url.to_string(),
			});
		}

		for (field, value) in [
			("auth prefix", &config.auth_prefix),
			("login", &config.login_path),
			("register", &config.register_path),
			("refresh", &config.refresh_path),
			("login page", &config.login_page),
		] {
			if !value.starts_with('/') {
				return Err(ClientConfigError::RelativePath { field, value: value.clone() });
			}
		}

		if config.redirect_delay.is_negative() {
			return Err(ClientConfigError::NegativeDuration { field: "redirect delay" });
		}
		if config.slow_call_threshold.is_negative() {
			return Err(ClientConfigError::NegativeDuration { field: "slow call threshold" });
		}

		Ok(config)
	}
}

/// Parses a base URL, mapping failures into [`ClientConfigError`].
pub fn parse_base_url(raw: &str) -> Result<Url, ClientConfigError> {
	Url::parse(raw).map_err(|e| ClientConfigError::InvalidBaseUrl {
		url: raw.to_owned(),
		reason: e.to_string(),
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config(base: &str) -> ClientConfig {
		ClientConfig::builder(parse_base_url(base).expect("Test base URL should parse."))
			.build()
			.expect("Test config should validate.")
	}

	#[test]
	fn base_url_override_falls_back_to_default() {
		let fallback =
			ClientConfig::from_base_url_override(None).expect("Default config should validate.");

		assert_eq!(fallback.base_url.as_str(), DEFAULT_BASE_URL);

		let custom =
			ClientConfig::from_base_url_override(Some("https://phonebook.example.com/api".into()))
				.expect("Override should validate.");

		assert_eq!(custom.base_url.as_str(), "https://phonebook.example.com/api");
		assert!(matches!(
			ClientConfig::from_base_url_override(Some("not a url".into())),
			Err(ClientConfigError::InvalidBaseUrl { url, .. }) if url == "not a url"
		));
	}

	#[test]
	fn resolve_keeps_base_path_and_encodes_query_once() {
		let config = config("http://localhost:8080/api/");
		let request = ApiRequest::get("/contacts/search").query("query", "Jean Dupont&co");
		let url = config.resolve(&request);

		assert_eq!(url.path(), "/api/contacts/search");
		assert_eq!(url.query(), Some("query=Jean+Dupont%26co"));

		let pairs: Vec<_> = url.query_pairs().into_owned().collect();

		assert_eq!(pairs, vec![("query".to_owned(), "Jean Dupont&co".to_owned())]);
	}

	#[test]
	fn auth_paths_match_by_prefix() {
		let config = config("http://localhost:8080/api");

		assert!(config.is_auth_path("/auth/login"));
		assert!(config.is_auth_path("/auth/refresh"));
		assert!(!config.is_auth_path("/contacts"));
		assert!(!config.is_auth_path("/authors"));
		assert!(config.is_auth_page("/register"));
		assert!(!config.is_auth_page("/contacts"));
	}

	#[test]
	fn builder_rejects_invalid_settings() {
		let base = parse_base_url("http://localhost:8080/api").expect("Base URL should parse.");
		let err = ClientConfig::builder(base.clone())
			.refresh_path("auth/refresh")
			.build()
			.expect_err("Relative refresh path should be rejected.");

		assert!(matches!(err, ClientConfigError::RelativePath { field: "refresh", .. }));

		let err = ClientConfig::builder(base)
			.redirect_delay(Duration::milliseconds(-1))
			.build()
			.expect_err("Negative redirect delay should be rejected.");

		assert!(matches!(err, ClientConfigError::NegativeDuration { .. }));

		let err = ClientConfig::builder(
			parse_base_url("mailto:someone@example.com").expect("Mailto URL should parse."),
		)
		.build()
		.expect_err("Non-http base URL should be rejected.");

		assert!(matches!(err, ClientConfigError::UnsupportedBaseUrl { .. }));
	}

	#[test]
	fn defaults_match_backend_layout() {
		let config = config(DEFAULT_BASE_URL);

		assert_eq!(config.base_url.as_str(), "http://localhost:8080/api");
		assert_eq!(config.refresh_path, "/auth/refresh");
		assert_eq!(config.redirect_delay, Duration::milliseconds(100));
		assert_eq!(
			config.default_headers.get("content-type").map(String::as_str),
			Some("application/json")
		);
	}
}
