//! Host-facing plugin contract.
//!
//! Identity frameworks drive a provider through four separately invoked callbacks. The
//! trait keeps that shape without tying it to any particular host's calling convention,
//! and boxes its futures so hosts can store providers as `Arc<dyn IdentityProvider>`.

// self
use crate::{
	_prelude::*,
	auth::SteamId,
	openid::{AssertionParameters, AuthorizationRequest},
	profile::{NormalizedProfile, RawProfile},
	provider::{ProviderDescriptor, TokenGrant},
};

/// Boxed future returned by asynchronous provider callbacks.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Plugin surface a hosting identity framework calls into.
pub trait IdentityProvider: Send + Sync {
	/// Static registration data.
	fn descriptor(&self) -> &ProviderDescriptor;

	/// Builds the redirect that starts a sign-in.
	fn authorization(&self) -> AuthorizationRequest;

	/// Verifies the callback assertion and issues an opaque credential bound to the
	/// verified identifier.
	fn exchange_token<'a>(
		&'a self,
		params: &'a AssertionParameters,
	) -> ProviderFuture<'a, TokenGrant>;

	/// Fetches the raw profile for the identifier carried by `grant`.
	fn userinfo<'a>(&'a self, grant: &'a TokenGrant) -> ProviderFuture<'a, RawProfile>;

	/// Maps a raw profile into the host's profile shape, keyed on `steam_id`.
	fn map_profile(&self, steam_id: &SteamId, raw: &RawProfile) -> NormalizedProfile;
}
