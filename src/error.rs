//! Broker-level error types shared by the OpenID, profile, and transport layers.

// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, SteamId},
	obs::Stage,
};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; raised before any network activity.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure or non-success status on an upstream call.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The assertion failed structural checks or Steam declined to confirm it.
	///
	/// The variant deliberately carries no detail so callers cannot tell a malformed
	/// assertion from one Steam refused.
	#[error("Authentication was not successful.")]
	AssertionRejected,
	/// The identity was verified but the profile lookup failed.
	#[error("Profile lookup failed for verified SteamID {steam_id}.")]
	ProfileResolution {
		/// SteamID confirmed by the re-verification round trip.
		steam_id: SteamId,
		/// Underlying lookup failure.
		#[source]
		source: ProfileError,
	},
}
impl Error {
	/// Returns true when the sign-in attempt did not authenticate a user.
	pub fn is_authentication_failure(&self) -> bool {
		matches!(self, Self::AssertionRejected | Self::Transport(_))
	}

	/// Returns true when an upstream call failed at the transport layer, including
	/// transport failures raised while resolving a profile.
	pub fn is_transport(&self) -> bool {
		matches!(
			self,
			Self::Transport(_)
				| Self::ProfileResolution { source: ProfileError::Transport(_), .. }
		)
	}

	/// SteamID that was verified before the failure, if any.
	pub fn verified_steam_id(&self) -> Option<&SteamId> {
		match self {
			Self::ProfileResolution { steam_id, .. } => Some(steam_id),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),

	/// API key is empty or whitespace.
	#[error("Steam Web API key must not be empty.")]
	EmptyApiKey,
	/// Callback base URL is missing.
	#[error("Callback base URL is required.")]
	MissingCallbackUrl,
	/// Callback base URL cannot be parsed as an absolute URL.
	#[error("Callback base URL is invalid.")]
	InvalidCallbackUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Callback base URL parsed but cannot anchor a realm.
	///
	/// Stricter than parsing alone: the scheme must be `http` or `https` and the URL must not
	/// carry a query or fragment, so `return_to` always extends a clean origin.
	#[error("Callback base URL `{url}` is unsupported: {reason}.")]
	UnsupportedCallbackUrl {
		/// Offending URL.
		url: String,
		/// Why the URL was refused.
		reason: &'static str,
	},
	/// Endpoint override is not an HTTP(S) URL.
	#[error("The {endpoint} endpoint must use HTTP or HTTPS: {url}.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Built-in endpoint constant failed to parse.
	#[error("Default {endpoint} endpoint is invalid.")]
	DefaultEndpoint {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider identifier failed validation.
	#[error("Provider identifier is invalid.")]
	InvalidProviderId(#[from] IdentifierError),
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

/// Transport-level failures (network, IO, upstream status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred during the {stage} stage.")]
	Network {
		/// Stage that issued the request.
		stage: Stage,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling Steam.")]
	Io(#[from] std::io::Error),
	/// Request timed out inside the caller-configured transport.
	#[error("Request timed out during the {stage} stage.")]
	Timeout {
		/// Stage that issued the request.
		stage: Stage,
	},
	/// Upstream answered with a non-success status.
	#[error("Steam returned HTTP {status} during the {stage} stage.")]
	Status {
		/// Stage that issued the request.
		stage: Stage,
		/// HTTP status code.
		status: u16,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Transport reported a failure it could not classify.
	#[error("HTTP client error occurred during the {stage} stage: {message}.")]
	Other {
		/// Stage that issued the request.
		stage: Stage,
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(stage: Stage, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { stage, source: Box::new(src) }
	}

	/// HTTP status attached to the failure, when available.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Failures raised while resolving a verified SteamID into a profile.
#[derive(Debug, ThisError)]
pub enum ProfileError {
	/// The lookup succeeded but returned no record for the SteamID.
	#[error("Profile not found.")]
	NotFound,
	/// The lookup returned a body that is not a player summary envelope.
	#[error("Player summary response is malformed.")]
	Malformed {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The lookup failed at the transport layer.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn rejection_display_leaks_nothing() {
		assert_eq!(Error::AssertionRejected.to_string(), "Authentication was not successful.");
	}

	#[test]
	fn profile_resolution_keeps_verified_identifier() {
		let steam_id =
			SteamId::new("76561197960287930").expect("SteamID fixture should be valid.");
		let err =
			Error::ProfileResolution { steam_id: steam_id.clone(), source: ProfileError::NotFound };

		assert_eq!(err.verified_steam_id(), Some(&steam_id));
		assert!(!err.is_authentication_failure());
		assert!(!err.is_transport());

		let err = Error::ProfileResolution {
			steam_id,
			source: ProfileError::Transport(TransportError::Status {
				stage: Stage::Profile,
				status: 503,
				retry_after: None,
			}),
		};

		assert!(err.is_transport());
	}

	#[test]
	fn transport_status_is_reported() {
		let err: Error =
			TransportError::Status { stage: Stage::Verification, status: 500, retry_after: None }
				.into();

		assert!(err.is_authentication_failure());
		assert!(err.is_transport());
		assert_eq!(err.to_string(), "Steam returned HTTP 500 during the verification stage.");
	}
}
