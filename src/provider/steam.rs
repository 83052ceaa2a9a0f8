//! Steam provider wiring the OpenID verification and profile lookup together.

// self
use crate::{
	_prelude::*,
	auth::{BearerCredential, SteamId},
	config::{ProfileFailurePolicy, ProviderConfig},
	error::ConfigError,
	http::SteamHttpClient,
	obs,
	openid::{AssertionParameters, AuthorizationRequest},
	profile::{NormalizedProfile, RawProfile},
	provider::{IdentityProvider, ProviderDescriptor, ProviderFuture},
	transport::TransportErrorMapper,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, transport::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport stack.
pub type ReqwestSteamProvider = SteamProvider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Output of the token-exchange step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
	/// Opaque credential the host may key its session on.
	pub access_token: BearerCredential,
	/// SteamID confirmed by Steam.
	pub steam_id: SteamId,
	/// When the grant was issued.
	pub issued_at: OffsetDateTime,
}
impl TokenGrant {
	/// Issues a grant with a fresh credential for `steam_id`.
	pub fn issue(steam_id: SteamId) -> Self {
		Self {
			access_token: BearerCredential::generate(),
			steam_id,
			issued_at: OffsetDateTime::now_utc(),
		}
	}
}

/// Result of a complete sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authentication {
	/// Token-exchange output.
	pub grant: TokenGrant,
	/// Profile the host should build its session from.
	pub profile: NormalizedProfile,
	/// True when the profile was synthesized because the lookup failed under
	/// [`ProfileFailurePolicy::MinimalSession`].
	pub degraded: bool,
}

/// Steam sign-in provider.
///
/// Holds nothing beyond the configuration and the transport pair, so one instance can
/// serve every concurrent sign-in.
pub struct SteamProvider<C, M>
where
	C: ?Sized + SteamHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Validated provider configuration.
	pub config: Arc<ProviderConfig>,
	/// Registration data derived from `config`.
	pub descriptor: ProviderDescriptor,
}
impl<C, M> SteamProvider<C, M>
where
	C: ?Sized + SteamHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a provider that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: ProviderConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let descriptor = ProviderDescriptor::steam(&config).map_err(ConfigError::from)?;

		Ok(Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			config: Arc::new(config),
			descriptor,
		})
	}

	/// Builds the login redirect.
	pub fn authorization_request(&self) -> AuthorizationRequest {
		AuthorizationRequest::new(&self.config)
	}

	/// Verifies the callback assertion and issues a [`TokenGrant`].
	pub async fn exchange(&self, params: &AssertionParameters) -> Result<TokenGrant> {
		let steam_id = self.verify_assertion(params).await?;

		Ok(TokenGrant::issue(steam_id))
	}

	/// Runs the whole callback: verification, profile lookup, and normalization.
	///
	/// A failed lookup after successful verification is handled per the configured
	/// [`ProfileFailurePolicy`].
	pub async fn authenticate(&self, params: &AssertionParameters) -> Result<Authentication> {
		let grant = self.exchange(params).await?;

		match self.resolve_profile(&grant.steam_id).await {
			Ok(profile) => Ok(Authentication { grant, profile, degraded: false }),
			Err(Error::ProfileResolution { steam_id, source })
				if self.config.profile_failure_policy()
					== ProfileFailurePolicy::MinimalSession =>
			{
				obs::log_degraded_profile(&steam_id, &source);

				let profile = NormalizedProfile::minimal(&steam_id);

				Ok(Authentication { grant, profile, degraded: true })
			},
			Err(e) => Err(e),
		}
	}
}
#[cfg(feature = "reqwest")]
impl SteamProvider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a provider backed by a reqwest client that never follows redirects.
	///
	/// Requests carry no timeout; use [`SteamProvider::with_http_client`] with a configured
	/// [`ReqwestHttpClient`] to bound latency.
	pub fn new(config: ProviderConfig) -> Result<Self> {
		Self::with_http_client(
			config,
			ReqwestHttpClient::without_redirects()?,
			ReqwestTransportErrorMapper,
		)
	}
}
impl<C, M> Clone for SteamProvider<C, M>
where
	C: ?Sized + SteamHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			transport_mapper: Arc::clone(&self.transport_mapper),
			config: Arc::clone(&self.config),
			descriptor: self.descriptor.clone(),
		}
	}
}
impl<C, M> Debug for SteamProvider<C, M>
where
	C: ?Sized + SteamHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SteamProvider")
			.field("descriptor", &self.descriptor)
			.field("realm", &self.config.realm())
			.field("return_to", &self.config.return_to())
			.finish()
	}
}
impl<C, M> IdentityProvider for SteamProvider<C, M>
where
	C: ?Sized + SteamHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	fn authorization(&self) -> AuthorizationRequest {
		self.authorization_request()
	}

	fn exchange_token<'a>(
		&'a self,
		params: &'a AssertionParameters,
	) -> ProviderFuture<'a, TokenGrant> {
		Box::pin(async move { self.exchange(params).await })
	}

	fn userinfo<'a>(&'a self, grant: &'a TokenGrant) -> ProviderFuture<'a, RawProfile> {
		Box::pin(async move { self.fetch_profile(&grant.steam_id).await })
	}

	fn map_profile(&self, steam_id: &SteamId, raw: &RawProfile) -> NormalizedProfile {
		NormalizedProfile::from_raw(steam_id, raw)
	}
}
