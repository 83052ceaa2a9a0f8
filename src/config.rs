//! Provider configuration supplied once at startup.
//!
//! [`ProviderConfig`] is immutable after [`ProviderConfigBuilder::build`] and safe to
//! share across concurrent sign-ins. It validates the API key and callback base URL up
//! front and derives the OpenID `realm` and `return_to` values every later stage
//! compares against.

// self
use crate::{_prelude::*, auth::ApiKey, error::ConfigError};

/// Steam's OpenID 2.0 login (and `check_authentication`) endpoint.
pub const STEAM_LOGIN_ENDPOINT: &str = "https://steamcommunity.com/openid/login";
/// Steam Web API player summary endpoint.
pub const STEAM_PLAYER_SUMMARIES_ENDPOINT: &str =
	"https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/";
/// Path segment appended to the callback base URL to form `return_to`.
pub const RETURN_TO_SUFFIX: &str = "steam";

/// Policy applied when a verified sign-in cannot resolve a profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileFailurePolicy {
	/// Fail the sign-in with [`Error::ProfileResolution`].
	#[default]
	Reject,
	/// Complete the sign-in with a profile synthesized from the SteamID alone.
	MinimalSession,
}

/// Upstream endpoints used by the broker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteamEndpoints {
	/// OpenID login endpoint; also the expected `openid.op_endpoint`.
	pub login: Url,
	/// Player summary lookup endpoint.
	pub player_summaries: Url,
}

/// Immutable provider configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
	api_key: ApiKey,
	callback_url: Url,
	realm: String,
	return_to: String,
	endpoints: SteamEndpoints,
	profile_failure_policy: ProfileFailurePolicy,
}
impl ProviderConfig {
	/// Creates a new builder.
	pub fn builder() -> ProviderConfigBuilder {
		ProviderConfigBuilder::default()
	}

	/// Shorthand for a configuration that talks to Steam's public endpoints.
	pub fn new(
		api_key: impl Into<String>,
		callback_url: impl AsRef<str>,
	) -> Result<Self, ConfigError> {
		Self::builder().api_key(api_key).callback_url(callback_url).build()
	}

	/// Steam Web API key.
	pub fn api_key(&self) -> &ApiKey {
		&self.api_key
	}

	/// Callback base URL the host mounts the provider under.
	pub fn callback_url(&self) -> &Url {
		&self.callback_url
	}

	/// ASCII origin of the callback base URL.
	pub fn realm(&self) -> &str {
		&self.realm
	}

	/// Exact URL Steam must redirect back to.
	pub fn return_to(&self) -> &str {
		&self.return_to
	}

	/// Upstream endpoints.
	pub fn endpoints(&self) -> &SteamEndpoints {
		&self.endpoints
	}

	/// Policy applied when profile resolution fails after verification.
	pub fn profile_failure_policy(&self) -> ProfileFailurePolicy {
		self.profile_failure_policy
	}
}
impl TryFrom<ProviderSettings> for ProviderConfig {
	type Error = ConfigError;

	fn try_from(settings: ProviderSettings) -> Result<Self, Self::Error> {
		let mut builder = Self::builder()
			.api_key(settings.api_key)
			.callback_url(settings.callback_url)
			.profile_failure_policy(settings.profile_failure_policy);

		if let Some(url) = settings.login_endpoint {
			builder = builder.login_endpoint(url);
		}
		if let Some(url) = settings.player_summaries_endpoint {
			builder = builder.player_summaries_endpoint(url);
		}

		builder.build()
	}
}

/// Serde-facing configuration, loadable from any config source the host uses.
#[derive(Clone, Deserialize)]
pub struct ProviderSettings {
	/// Steam Web API key.
	pub api_key: String,
	/// Absolute callback base URL.
	pub callback_url: String,
	/// Optional login endpoint override.
	#[serde(default)]
	pub login_endpoint: Option<Url>,
	/// Optional player summary endpoint override.
	#[serde(default)]
	pub player_summaries_endpoint: Option<Url>,
	/// Profile failure policy (defaults to `reject`).
	#[serde(default)]
	pub profile_failure_policy: ProfileFailurePolicy,
}
impl Debug for ProviderSettings {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderSettings")
			.field("api_key_set", &!self.api_key.is_empty())
			.field("callback_url", &self.callback_url)
			.field("login_endpoint", &self.login_endpoint)
			.field("player_summaries_endpoint", &self.player_summaries_endpoint)
			.field("profile_failure_policy", &self.profile_failure_policy)
			.finish()
	}
}

/// Builder for [`ProviderConfig`] values.
#[derive(Default)]
pub struct ProviderConfigBuilder {
	api_key: Option<String>,
	callback_url: Option<String>,
	login_endpoint: Option<Url>,
	player_summaries_endpoint: Option<Url>,
	profile_failure_policy: ProfileFailurePolicy,
}
impl ProviderConfigBuilder {
	/// Sets the Steam Web API key.
	pub fn api_key(mut self, key: impl Into<String>) -> Self {
		self.api_key = Some(key.into());

		self
	}

	/// Sets the absolute callback base URL.
	pub fn callback_url(mut self, url: impl AsRef<str>) -> Self {
		self.callback_url = Some(url.as_ref().to_owned());

		self
	}

	/// Overrides the OpenID login endpoint.
	pub fn login_endpoint(mut self, url: Url) -> Self {
		self.login_endpoint = Some(url);

		self
	}

	/// Overrides the player summary endpoint.
	pub fn player_summaries_endpoint(mut self, url: Url) -> Self {
		self.player_summaries_endpoint = Some(url);

		self
	}

	/// Overrides the profile failure policy.
	pub fn profile_failure_policy(mut self, policy: ProfileFailurePolicy) -> Self {
		self.profile_failure_policy = policy;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ConfigError> {
		let api_key = ApiKey::new(self.api_key.unwrap_or_default())?;
		let raw_callback = self.callback_url.ok_or(ConfigError::MissingCallbackUrl)?;
		let callback_url = Url::parse(raw_callback.trim())
			.map_err(|source| ConfigError::InvalidCallbackUrl { source })?;
		let realm = derive_realm(&callback_url)?;
		let return_to = derive_return_to(&callback_url);
		let endpoints = SteamEndpoints {
			login: match self.login_endpoint {
				Some(url) => url,
				None => parse_default("login", STEAM_LOGIN_ENDPOINT)?,
			},
			player_summaries: match self.player_summaries_endpoint {
				Some(url) => url,
				None => parse_default("player_summaries", STEAM_PLAYER_SUMMARIES_ENDPOINT)?,
			},
		};

		validate_endpoint("login", &endpoints.login)?;
		validate_endpoint("player_summaries", &endpoints.player_summaries)?;

		Ok(ProviderConfig {
			api_key,
			callback_url,
			realm,
			return_to,
			endpoints,
			profile_failure_policy: self.profile_failure_policy,
		})
	}
}
impl Debug for ProviderConfigBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfigBuilder")
			.field("api_key_set", &self.api_key.is_some())
			.field("callback_url", &self.callback_url)
			.field("login_endpoint", &self.login_endpoint)
			.field("player_summaries_endpoint", &self.player_summaries_endpoint)
			.field("profile_failure_policy", &self.profile_failure_policy)
			.finish()
	}
}

fn derive_realm(callback_url: &Url) -> Result<String, ConfigError> {
	let unsupported =
		|reason| ConfigError::UnsupportedCallbackUrl { url: callback_url.to_string(), reason };

	if !matches!(callback_url.scheme(), "http" | "https") {
		return Err(unsupported("scheme must be http or https"));
	}
	if callback_url.query().is_some() || callback_url.fragment().is_some() {
		return Err(unsupported("query and fragment are not allowed"));
	}

	let origin = callback_url.origin();

	if !origin.is_tuple() {
		return Err(unsupported("origin is opaque"));
	}

	Ok(origin.ascii_serialization())
}

fn derive_return_to(callback_url: &Url) -> String {
	format!("{}/{RETURN_TO_SUFFIX}", callback_url.as_str().trim_end_matches('/'))
}

fn parse_default(endpoint: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::DefaultEndpoint { endpoint, source })
}

fn validate_endpoint(endpoint: &'static str, url: &Url) -> Result<(), ConfigError> {
	if matches!(url.scheme(), "http" | "https") && url.has_host() {
		Ok(())
	} else {
		Err(ConfigError::InvalidEndpoint { endpoint, url: url.to_string() })
	}
}
