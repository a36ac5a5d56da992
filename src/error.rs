//! Client-level error types shared across the dispatcher, session lifecycle, and resources.

// self
use crate::{_prelude::*, config::ClientConfigError, nav::ExpiryReason};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Session storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// No response was received (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Backend answered with a non-success status.
	#[error(transparent)]
	Status(#[from] StatusError),
	/// Backend answered with a body that does not match the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Backend answered successfully but the payload is unusable.
	#[error("Backend returned an invalid response: {reason}.")]
	InvalidResponse {
		/// Why the payload was rejected.
		reason: String,
	},
	/// The session could not be kept alive and has been terminated.
	#[error("Session expired: {reason}.")]
	SessionExpired {
		/// What made the session unrecoverable.
		reason: ExpiryReason,
	},
}
impl Error {
	/// HTTP status attached to the error, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status(err) => Some(err.status),
			Self::Decode(err) => Some(err.status),
			_ => None,
		}
	}

	/// Classifies the error for login/registration messaging.
	pub fn auth_failure(&self) -> AuthFailure {
		match self {
			Self::Transport(_) => AuthFailure::Network,
			Self::Decode(_) | Self::InvalidResponse { .. } => AuthFailure::InvalidResponse,
			Self::Status(err) => match err.status {
				400 => AuthFailure::InvalidData { message: err.message.clone() },
				401 => AuthFailure::InvalidCredentials,
				403 => AuthFailure::AccessDenied,
				409 => AuthFailure::Conflict,
				429 => AuthFailure::TooManyAttempts,
				500.. => AuthFailure::Server,
				status => AuthFailure::Other {
					message: err.message.clone().unwrap_or_else(|| format!("HTTP {status}")),
				},
			},
			other => AuthFailure::Other { message: other.to_string() },
		}
	}
}

/// Coarse classification of authentication failures for display purposes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthFailure {
	/// The backend could not be reached.
	Network,
	/// Username or password was rejected.
	InvalidCredentials,
	/// The account is not allowed to perform the operation.
	AccessDenied,
	/// The username is already taken.
	Conflict,
	/// The submitted data was rejected, optionally with a backend message.
	InvalidData {
		/// Backend-supplied message, if any.
		message: Option<String>,
	},
	/// Rate limit reached.
	TooManyAttempts,
	/// Backend-side failure (5xx).
	Server,
	/// Backend answered with an unusable payload.
	InvalidResponse,
	/// Anything else.
	Other {
		/// Best-effort description.
		message: String,
	},
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Client configuration failed validation.
	#[error(transparent)]
	Client(#[from] ClientConfigError),
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized.")]
	RequestBody {
		/// Underlying serializer failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures where no HTTP response was received.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The call did not complete in time.
	#[error("Request to the backend timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Non-success HTTP status with the best-effort message extracted from the body.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Backend responded with HTTP {status}{}.", message_suffix(.message))]
pub struct StatusError {
	/// HTTP status code.
	pub status: u16,
	/// `message` or `error` field from the response body, if present.
	pub message: Option<String>,
}
impl StatusError {
	/// Returns `true` for HTTP 401.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}

	/// Returns `true` for HTTP 404.
	pub fn is_not_found(&self) -> bool {
		self.status == 404
	}
}

fn message_suffix(message: &Option<String>) -> String {
	message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Response body could not be decoded into the expected type.
#[derive(Debug, ThisError)]
#[error("Backend returned malformed JSON (HTTP {status}).")]
pub struct DecodeError {
	/// Structured parsing failure, including the offending JSON path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status of the response.
	pub status: u16,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_error_display_includes_message() {
		let err = StatusError { status: 404, message: Some("Aucun contact trouvé".into()) };

		assert_eq!(err.to_string(), "Backend responded with HTTP 404: Aucun contact trouvé.");

		let bare = StatusError { status: 500, message: None };

		assert_eq!(bare.to_string(), "Backend responded with HTTP 500.");
	}

	#[test]
	fn auth_failure_classifies_statuses() {
		let classify = |status, message: Option<&str>| {
			Error::from(StatusError { status, message: message.map(Into::into) }).auth_failure()
		};

		assert_eq!(classify(401, None), AuthFailure::InvalidCredentials);
		assert_eq!(classify(403, None), AuthFailure::AccessDenied);
		assert_eq!(classify(409, None), AuthFailure::Conflict);
		assert_eq!(classify(429, None), AuthFailure::TooManyAttempts);
		assert_eq!(classify(503, None), AuthFailure::Server);
		assert_eq!(
			classify(400, Some("Données invalides")),
			AuthFailure::InvalidData { message: Some("Données invalides".into()) }
		);
		assert_eq!(classify(418, None), AuthFailure::Other { message: "HTTP 418".into() });
	}

	#[test]
	fn transport_errors_classify_as_network() {
		let err = Error::from(TransportError::network(std::io::Error::other("connection refused")));

		assert_eq!(err.auth_failure(), AuthFailure::Network);
		assert_eq!(err.status(), None);
	}
}
