//! Secret wrappers that redact sensitive material.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
// self
use crate::{_prelude::*, error::ConfigError};

const CREDENTIAL_BYTES: usize = 32;

/// Steam Web API key used for player summary lookups.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ApiKey(String);
impl ApiKey {
	/// Wraps an API key, rejecting empty or whitespace-only values.
	pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
		let value = value.into();

		if value.trim().is_empty() {
			return Err(ConfigError::EmptyApiKey);
		}

		Ok(Self(value))
	}

	/// Returns the inner key. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl TryFrom<String> for ApiKey {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl Debug for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiKey").field(&"<redacted>").finish()
	}
}
impl Display for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Opaque bearer credential handed to the host after a verified sign-in.
///
/// Steam issues no access token over OpenID 2.0, so the broker mints a random one that
/// the host can key its session on.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerCredential(String);
impl BearerCredential {
	/// Mints a fresh URL-safe credential from 256 random bits.
	pub fn generate() -> Self {
		let mut bytes = [0_u8; CREDENTIAL_BYTES];

		rand::rng().fill(&mut bytes);

		Self(URL_SAFE_NO_PAD.encode(bytes))
	}

	/// Returns the inner credential. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for BearerCredential {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for BearerCredential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("BearerCredential").field(&"<redacted>").finish()
	}
}
impl Display for BearerCredential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
