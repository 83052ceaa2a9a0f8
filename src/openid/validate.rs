//! Local structural checks run before any network round trip.

// self
use crate::{
	_prelude::*,
	config::ProviderConfig,
	openid::{AssertionParameters, IDENTITY_URL_PREFIX, OPENID_NS, keys},
};

/// Why an assertion was rejected. Only ever logged; callers see
/// [`Error::AssertionRejected`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
	/// A required `openid.*` field is absent.
	MissingField(&'static str),
	/// `openid.op_endpoint` names a different provider endpoint.
	EndpointMismatch,
	/// `openid.ns` is not the OpenID 2.0 namespace.
	NamespaceMismatch,
	/// `openid.claimed_id` is not a Steam identity URL.
	ClaimedIdMismatch,
	/// `openid.identity` is not a Steam identity URL.
	IdentityMismatch,
	/// `openid.return_to` differs from this deployment's return URL.
	ReturnToMismatch,
	/// Steam did not answer `is_valid:true`.
	ProviderDenied,
	/// Steam confirmed the assertion but the claimed identifier has no SteamID.
	UnrecognizedIdentifier,
}
impl RejectReason {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RejectReason::MissingField(_) => "missing_field",
			RejectReason::EndpointMismatch => "endpoint_mismatch",
			RejectReason::NamespaceMismatch => "namespace_mismatch",
			RejectReason::ClaimedIdMismatch => "claimed_id_mismatch",
			RejectReason::IdentityMismatch => "identity_mismatch",
			RejectReason::ReturnToMismatch => "return_to_mismatch",
			RejectReason::ProviderDenied => "provider_denied",
			RejectReason::UnrecognizedIdentifier => "unrecognized_identifier",
		}
	}
}
impl Display for RejectReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			RejectReason::MissingField(field) => write!(f, "missing_field({field})"),
			other => f.write_str(other.as_str()),
		}
	}
}

/// Checks the callback parameters against the values expected for `config`.
///
/// All of the following must hold:
/// - `openid.op_endpoint` equals the configured login endpoint,
/// - `openid.ns` equals the OpenID 2.0 namespace,
/// - `openid.claimed_id` and `openid.identity` start with the Steam identity URL prefix,
/// - `openid.return_to` equals the configured return URL exactly.
pub fn validate_assertion(
	params: &AssertionParameters,
	config: &ProviderConfig,
) -> Result<(), RejectReason> {
	let field = |key: &'static str| params.get(key).ok_or(RejectReason::MissingField(key));

	if field(keys::OP_ENDPOINT)? != config.endpoints().login.as_str() {
		return Err(RejectReason::EndpointMismatch);
	}
	if field(keys::NS)? != OPENID_NS {
		return Err(RejectReason::NamespaceMismatch);
	}
	if !field(keys::CLAIMED_ID)?.starts_with(IDENTITY_URL_PREFIX) {
		return Err(RejectReason::ClaimedIdMismatch);
	}
	if !field(keys::IDENTITY)?.starts_with(IDENTITY_URL_PREFIX) {
		return Err(RejectReason::IdentityMismatch);
	}
	if field(keys::RETURN_TO)? != config.return_to() {
		return Err(RejectReason::ReturnToMismatch);
	}

	Ok(())
}

/// Boolean form of [`validate_assertion`].
pub fn is_valid_assertion(params: &AssertionParameters, config: &ProviderConfig) -> bool {
	validate_assertion(params, config).is_ok()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const CLAIMED: &str = "https://steamcommunity.com/openid/id/76561197960287930";

	fn config() -> ProviderConfig {
		ProviderConfig::new("key", "https://app.example.com/api/auth/callback")
			.expect("Configuration fixture should be valid.")
	}

	fn params_with(overrides: &[(&'static str, Option<&'static str>)]) -> AssertionParameters {
		let base = [
			(keys::NS, OPENID_NS),
			(keys::MODE, "id_res"),
			(keys::OP_ENDPOINT, "https://steamcommunity.com/openid/login"),
			(keys::CLAIMED_ID, CLAIMED),
			(keys::IDENTITY, CLAIMED),
			(keys::RETURN_TO, "https://app.example.com/api/auth/callback/steam"),
			("openid.response_nonce", "2024-01-01T00:00:00Zabc"),
			("openid.sig", "sig"),
		];

		base.into_iter()
			.filter_map(|(key, value)| {
				match overrides.iter().find(|(k, _)| *k == key) {
					Some((_, replacement)) => replacement.map(|v| (key, v)),
					None => Some((key, value)),
				}
			})
			.collect()
	}

	#[test]
	fn well_formed_assertion_passes() {
		assert_eq!(validate_assertion(&params_with(&[]), &config()), Ok(()));
		assert!(is_valid_assertion(&params_with(&[]), &config()));
	}

	#[test]
	fn each_check_rejects_independently() {
		let config = config();
		let cases = [
			(
				keys::OP_ENDPOINT,
				"https://evil.example.com/openid/login",
				RejectReason::EndpointMismatch,
			),
			(keys::NS, "http://specs.openid.net/auth/1.1", RejectReason::NamespaceMismatch),
			(
				keys::CLAIMED_ID,
				"https://evil.example.com/openid/id/1",
				RejectReason::ClaimedIdMismatch,
			),
			(
				keys::IDENTITY,
				"https://evil.example.com/openid/id/1",
				RejectReason::IdentityMismatch,
			),
			(keys::RETURN_TO, "https://other.example.com/steam", RejectReason::ReturnToMismatch),
		];

		for (key, value, expected) in cases {
			assert_eq!(
				validate_assertion(&params_with(&[(key, Some(value))]), &config),
				Err(expected),
				"Overriding `{key}` should be rejected."
			);
		}
	}

	#[test]
	fn missing_fields_are_rejected() {
		let err = validate_assertion(&params_with(&[(keys::RETURN_TO, None)]), &config())
			.expect_err("Missing return_to must be rejected.");

		assert_eq!(err, RejectReason::MissingField(keys::RETURN_TO));
		assert_eq!(err.to_string(), "missing_field(openid.return_to)");
		assert!(!is_valid_assertion(&AssertionParameters::default(), &config()));
	}

	#[test]
	fn return_to_must_match_exactly() {
		let trailing_slash = "https://app.example.com/api/auth/callback/steam/";
		let params = params_with(&[(keys::RETURN_TO, Some(trailing_slash))]);
		let err = validate_assertion(&params, &config());

		assert_eq!(err, Err(RejectReason::ReturnToMismatch));
	}
}
