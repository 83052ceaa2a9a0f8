//! Outbound login redirect construction.

// self
use crate::{
	_prelude::*,
	config::ProviderConfig,
	obs::{self, Stage, StageOutcome, StageSpan},
	openid::{IDENTIFIER_SELECT, MODE_CHECKID_SETUP, OPENID_NS, keys},
};

/// Login redirect that starts the OpenID `checkid_setup` flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Steam login endpoint, without query.
	pub endpoint: Url,
	/// Protocol parameters in the order they are appended.
	pub params: Vec<(&'static str, String)>,
}
impl AuthorizationRequest {
	/// Builds the redirect parameters for `config`.
	///
	/// No network call is made. The callback URL was validated when `config` was built, so
	/// construction cannot fail here.
	pub fn new(config: &ProviderConfig) -> Self {
		let _guard = StageSpan::new(Stage::Authorization, "build_request").entered();

		obs::record_stage_outcome(Stage::Authorization, StageOutcome::Attempt);

		let params = vec![
			(keys::NS, OPENID_NS.to_owned()),
			(keys::MODE, MODE_CHECKID_SETUP.to_owned()),
			(keys::RETURN_TO, config.return_to().to_owned()),
			(keys::REALM, config.realm().to_owned()),
			(keys::IDENTITY, IDENTIFIER_SELECT.to_owned()),
			(keys::CLAIMED_ID, IDENTIFIER_SELECT.to_owned()),
		];

		obs::record_stage_outcome(Stage::Authorization, StageOutcome::Success);

		Self { endpoint: config.endpoints().login.clone(), params }
	}

	/// Returns the value of a single protocol parameter.
	pub fn param(&self, key: &str) -> Option<&str> {
		self.params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
	}

	/// Fully-formed URL the end user should be redirected to.
	pub fn url(&self) -> Url {
		let mut url = self.endpoint.clone();
		let mut pairs = url.query_pairs_mut();

		for (key, value) in &self.params {
			pairs.append_pair(key, value);
		}

		drop(pairs);

		url
	}
}
