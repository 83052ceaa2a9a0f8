//! Static provider registration data.

// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, ProviderId},
	config::ProviderConfig,
};

/// Identifier the provider registers under.
pub const PROVIDER_ID: &str = "steam";
/// Human-readable provider name.
pub const PROVIDER_NAME: &str = "Steam";

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Endpoint the end user is redirected to.
	pub authorization: Url,
	/// Endpoint profile data is fetched from.
	pub userinfo: Url,
}

/// Protocol traits the host must account for when driving the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderQuirks {
	/// Whether the token exchange yields an ID token to validate.
	pub issues_id_token: bool,
	/// Whether the host should round-trip a `state` parameter.
	pub uses_state: bool,
	/// Whether the host should attach PKCE parameters.
	pub uses_pkce: bool,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		// OpenID 2.0 has no ID token, state, or PKCE.
		Self { issues_id_token: false, uses_state: false, uses_pkce: false }
	}
}

/// Immutable provider descriptor handed to the host at registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Display name.
	pub name: String,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Protocol quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Describes the Steam provider for `config`.
	pub fn steam(config: &ProviderConfig) -> Result<Self, IdentifierError> {
		let endpoints = config.endpoints();

		Ok(Self {
			id: ProviderId::new(PROVIDER_ID)?,
			name: PROVIDER_NAME.into(),
			endpoints: ProviderEndpoints {
				authorization: endpoints.login.clone(),
				userinfo: endpoints.player_summaries.clone(),
			},
			quirks: ProviderQuirks::default(),
		})
	}
}
