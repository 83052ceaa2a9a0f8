//! Walks through a Steam sign-in against the live endpoints.
//!
//! Run once without arguments to print the login redirect. After signing in, Steam sends the
//! browser to `<callback>/steam?openid...`; pass that full URL as the first argument to verify
//! it and resolve the profile.
//!
//! ```text
//! STEAM_API_KEY=... cargo run --example steam_login
//! STEAM_API_KEY=... cargo run --example steam_login -- 'https://app.example.com/auth/steam?openid.ns=...'
//! ```

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use steam_openid_broker::{
	config::{ProfileFailurePolicy, ProviderConfig},
	openid::AssertionParameters,
	provider::ReqwestSteamProvider,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let api_key = env::var("STEAM_API_KEY").map_err(|_| eyre!("Set STEAM_API_KEY first."))?;
	let callback =
		env::var("CALLBACK_URL").unwrap_or_else(|_| "https://app.example.com/auth".into());
	let config = ProviderConfig::builder()
		.api_key(api_key)
		.callback_url(callback)
		.profile_failure_policy(ProfileFailurePolicy::MinimalSession)
		.build()?;
	let provider = ReqwestSteamProvider::new(config)?;
	let Some(returned) = env::args().nth(1) else {
		println!("Send your user to {}.", provider.authorization_request().url());
		println!("Expecting Steam to return to {}.", provider.config.return_to());

		return Ok(());
	};
	let params = AssertionParameters::from_callback_url(&Url::parse(&returned)?);
	let signed_in = provider.authenticate(&params).await?;

	println!("Verified SteamID {}.", signed_in.grant.steam_id);
	println!("Session credential issued at {}.", signed_in.grant.issued_at);

	if signed_in.degraded {
		println!("Profile lookup failed; continuing with a minimal profile.");
	}

	println!("Profile: {:#?}", signed_in.profile);

	Ok(())
}
