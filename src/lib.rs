//! Steam sign-in over OpenID 2.0 for hosts that speak OAuth-shaped identity providers.
//!
//! The crate builds the login redirect, validates and re-verifies the assertion Steam
//! sends back, resolves the player's public profile through the Steam Web API, and
//! packages the result behind [`provider::IdentityProvider`].
//!
//! ```no_run
//! # use steam_openid_broker::{error::Result, url::Url};
//! # async fn run(callback: &Url) -> Result<()> {
//! use steam_openid_broker::{
//! 	config::ProviderConfig, openid::AssertionParameters, provider::ReqwestSteamProvider,
//! };
//!
//! let config = ProviderConfig::new("STEAM_WEB_API_KEY", "https://app.example.com/auth")?;
//! let provider = ReqwestSteamProvider::new(config)?;
//! let redirect = provider.authorization_request().url();
//! let params = AssertionParameters::from_callback_url(callback);
//! let signed_in = provider.authenticate(&params).await?;
//! # let _ = (redirect, signed_in);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod openid;
pub mod profile;
pub mod provider;
pub mod transport;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::ProviderConfig, http::ReqwestHttpClient, provider::ReqwestSteamProvider,
		transport::ReqwestTransportErrorMapper,
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` and, like [`ReqwestHttpClient::without_redirects`], never follows redirects.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`ReqwestSteamProvider`] backed by [`test_reqwest_http_client`].
	pub fn build_reqwest_test_provider(config: ProviderConfig) -> ReqwestSteamProvider {
		ReqwestSteamProvider::with_http_client(
			config,
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
		.expect("Provider should build around the test client.")
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
