//! Callback parameter set and OpenID 2.0 protocol constants.

// self
use crate::_prelude::*;

/// OpenID 2.0 namespace URI.
pub const OPENID_NS: &str = "http://specs.openid.net/auth/2.0";
/// Sentinel letting the provider choose the identifier.
pub const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";
/// Prefix every Steam claimed identifier starts with.
pub const IDENTITY_URL_PREFIX: &str = "https://steamcommunity.com/openid/id/";
/// Mode requesting an interactive sign-in.
pub const MODE_CHECKID_SETUP: &str = "checkid_setup";
/// Mode asking the provider to confirm an assertion.
pub const MODE_CHECK_AUTHENTICATION: &str = "check_authentication";

/// Wire names of the `openid.*` parameters the broker reads or writes.
pub mod keys {
	/// `openid.ns`
	pub const NS: &str = "openid.ns";
	/// `openid.mode`
	pub const MODE: &str = "openid.mode";
	/// `openid.op_endpoint`
	pub const OP_ENDPOINT: &str = "openid.op_endpoint";
	/// `openid.claimed_id`
	pub const CLAIMED_ID: &str = "openid.claimed_id";
	/// `openid.identity`
	pub const IDENTITY: &str = "openid.identity";
	/// `openid.return_to`
	pub const RETURN_TO: &str = "openid.return_to";
	/// `openid.realm`
	pub const REALM: &str = "openid.realm";
}

/// Ordered, read-only view of the query parameters Steam appended to the callback.
///
/// Keys are unique: when a key repeats, the first occurrence wins and later ones are
/// dropped, so the values checked locally are exactly the values re-submitted to Steam.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssertionParameters(Vec<(String, String)>);
impl AssertionParameters {
	/// Collects parameters from key/value pairs.
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let mut entries: Vec<(String, String)> = Vec::new();

		for (key, value) in pairs {
			let key = key.into();

			if entries.iter().any(|(existing, _)| *existing == key) {
				continue;
			}

			entries.push((key, value.into()));
		}

		Self(entries)
	}

	/// Parses a raw `application/x-www-form-urlencoded` query string.
	pub fn from_query(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);

		Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
	}

	/// Reads the query string of the full callback URL.
	pub fn from_callback_url(url: &Url) -> Self {
		Self::from_pairs(url.query_pairs().into_owned())
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}

	/// Iterates over the parameters in their original order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when no parameters were supplied.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns a copy with `openid.mode` replaced by `mode`; `self` is left untouched.
	///
	/// The mode keeps its original position, or is appended when absent.
	pub fn with_mode(&self, mode: &str) -> Self {
		let mut entries = self.0.clone();

		match entries.iter_mut().find(|(k, _)| k == keys::MODE) {
			Some((_, value)) => *value = mode.to_owned(),
			None => entries.push((keys::MODE.to_owned(), mode.to_owned())),
		}

		Self(entries)
	}
}
impl<K, V> FromIterator<(K, V)> for AssertionParameters
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self::from_pairs(iter)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn query_parsing_decodes_and_keeps_order() {
		let params = AssertionParameters::from_query(
			"?openid.ns=http%3A%2F%2Fspecs.openid.net%2Fauth%2F2.0&openid.mode=id_res&openid.sig=a%2Bb",
		);

		assert_eq!(params.len(), 3);
		assert_eq!(params.get(keys::NS), Some(OPENID_NS));
		assert_eq!(params.get("openid.sig"), Some("a+b"));
		assert_eq!(
			params.iter().map(|(k, _)| k).collect::<Vec<_>>(),
			["openid.ns", "openid.mode", "openid.sig"]
		);
	}

	#[test]
	fn first_occurrence_wins_for_repeated_keys() {
		let params = AssertionParameters::from_pairs([
			(keys::RETURN_TO, "https://good.example.com/steam"),
			(keys::RETURN_TO, "https://evil.example.com/steam"),
		]);

		assert_eq!(params.len(), 1);
		assert_eq!(params.get(keys::RETURN_TO), Some("https://good.example.com/steam"));
	}

	#[test]
	fn with_mode_copies_instead_of_mutating() {
		let original: AssertionParameters =
			[(keys::MODE, "id_res"), ("openid.sig", "abc")].into_iter().collect();
		let check = original.with_mode(MODE_CHECK_AUTHENTICATION);

		assert_eq!(original.get(keys::MODE), Some("id_res"));
		assert_eq!(check.get(keys::MODE), Some(MODE_CHECK_AUTHENTICATION));
		assert_eq!(check.get("openid.sig"), Some("abc"));
		assert_eq!(check.len(), original.len());
		assert_eq!(check.iter().next(), Some((keys::MODE, MODE_CHECK_AUTHENTICATION)));
	}

	#[test]
	fn callback_url_query_is_read() {
		let url = Url::parse("https://app.example.com/auth/steam?openid.mode=cancel")
			.expect("Callback URL fixture should parse.");
		let params = AssertionParameters::from_callback_url(&url);

		assert_eq!(params.get(keys::MODE), Some("cancel"));
		assert!(AssertionParameters::from_query("").is_empty());
	}
}
