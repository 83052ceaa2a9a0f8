//! Out-of-band re-verification of an assertion with Steam.
//!
//! After the local checks pass, the broker copies the callback parameters, swaps
//! `openid.mode` for `check_authentication`, and POSTs them back to Steam's login
//! endpoint. Steam answers with `key:value` lines; only `is_valid` is consulted. The
//! SteamID is then re-extracted from the already validated `openid.claimed_id`, since
//! Steam does not echo an identifier in this response.

// crates.io
use oauth2::HttpRequest;
// self
use crate::{
	_prelude::*,
	auth::SteamId,
	http::SteamHttpClient,
	obs::{self, Stage, StageOutcome, StageSpan},
	openid::{
		AssertionParameters, MODE_CHECK_AUTHENTICATION, RejectReason, extract_steam_id, keys,
		validate_assertion,
	},
	provider::SteamProvider,
	transport::{self, TransportErrorMapper},
};

const IS_VALID_KEY: &str = "is_valid";

impl<C, M> SteamProvider<C, M>
where
	C: ?Sized + SteamHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Verifies a callback assertion and returns the SteamID it asserts.
	///
	/// Structurally invalid assertions are rejected without any network call. Otherwise a
	/// single `check_authentication` round trip is made; transport failures and non-success
	/// statuses surface as [`Error::Transport`] and are never retried.
	pub async fn verify_assertion(&self, params: &AssertionParameters) -> Result<SteamId> {
		const STAGE: Stage = Stage::Verification;

		let span = StageSpan::new(STAGE, "verify_assertion");

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span
			.instrument(async move {
				validate_assertion(params, &self.config).map_err(reject)?;

				let request =
					check_authentication_request(params, &self.config.endpoints().login)?;
				let response = transport::dispatch(
					self.http_client.as_ref(),
					self.transport_mapper.as_ref(),
					STAGE,
					request,
				)
				.await?;

				if !is_valid_response(&String::from_utf8_lossy(response.body())) {
					return Err(reject(RejectReason::ProviderDenied));
				}

				params
					.get(keys::CLAIMED_ID)
					.and_then(extract_steam_id)
					.ok_or_else(|| reject(RejectReason::UnrecognizedIdentifier))
			})
			.await;

		match &result {
			Ok(_) => obs::record_stage_outcome(STAGE, StageOutcome::Success),
			Err(_) => obs::record_stage_outcome(STAGE, StageOutcome::Failure),
		}

		result
	}
}

/// Builds the `check_authentication` POST for `params`.
///
/// Every parameter is forwarded unchanged except `openid.mode`.
pub fn check_authentication_request(
	params: &AssertionParameters,
	endpoint: &Url,
) -> Result<HttpRequest> {
	let check = params.with_mode(MODE_CHECK_AUTHENTICATION);

	transport::form_post_request(endpoint, check.iter())
}

/// Interprets a `check_authentication` response body.
///
/// The body is newline-separated `key:value` text. It is valid only when at least one
/// `is_valid` line is present and every such line says `true`; key and value compare
/// case-insensitively.
pub fn is_valid_response(body: &str) -> bool {
	let mut seen = false;

	for (key, value) in body.lines().filter_map(|line| line.split_once(':')) {
		if !key.trim().eq_ignore_ascii_case(IS_VALID_KEY) {
			continue;
		}
		if !value.trim().eq_ignore_ascii_case("true") {
			return false;
		}

		seen = true;
	}

	seen
}

fn reject(reason: RejectReason) -> Error {
	obs::log_rejection(reason.as_str());

	Error::AssertionRejected
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn is_valid_marker_is_required() {
		assert!(is_valid_response("ns:http://specs.openid.net/auth/2.0\nis_valid:true\n"));
		assert!(is_valid_response("ns:http://specs.openid.net/auth/2.0\r\nIS_VALID:True\r\n"));
		assert!(!is_valid_response("ns:http://specs.openid.net/auth/2.0\nis_valid:false"));
		assert!(!is_valid_response("ns:http://specs.openid.net/auth/2.0\n"));
		assert!(!is_valid_response(""));
		assert!(!is_valid_response("is_valid:truely"));
		assert!(!is_valid_response("not_is_valid:true"));
		assert!(!is_valid_response("<html>is_valid:true is here</html>"));
	}

	#[test]
	fn conflicting_markers_are_invalid() {
		assert!(!is_valid_response("is_valid:true\nis_valid:false"));
		assert!(!is_valid_response("is_valid:false\nis_valid:true"));
	}

	#[test]
	fn check_request_overrides_mode_and_forwards_the_rest() {
		let params = AssertionParameters::from_pairs([
			(keys::MODE, "id_res"),
			("openid.assoc_handle", "1234567890"),
			("openid.signed", "signed,op_endpoint,claimed_id"),
			("openid.sig", "W0u5DRbtHE1GG0ZKXjerUZDUGmc="),
		]);
		let endpoint =
			Url::parse("https://steamcommunity.com/openid/login").expect("Endpoint should parse.");
		let request = check_authentication_request(&params, &endpoint)
			.expect("Check request should build.");
		let body: Vec<(String, String)> =
			url::form_urlencoded::parse(request.body()).into_owned().collect();

		assert_eq!(body.len(), 4);
		assert!(body.contains(&(keys::MODE.into(), MODE_CHECK_AUTHENTICATION.into())));
		assert!(body.contains(&("openid.sig".into(), "W0u5DRbtHE1GG0ZKXjerUZDUGmc=".into())));
		assert_eq!(params.get(keys::MODE), Some("id_res"));
	}
}
