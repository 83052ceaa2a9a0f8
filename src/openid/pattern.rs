//! Claimed-identifier pattern matching.

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
// self
use crate::auth::SteamId;

// `[0-9]` rather than `\d`: the regex crate's `\d` matches every Unicode digit.
static CLAIMED_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^https?://steamcommunity\.com/openid/id/([0-9]+)$")
		.expect("Claimed identifier pattern must compile.")
});

/// Extracts the SteamID from a claimed identifier such as
/// `https://steamcommunity.com/openid/id/76561197960287930`.
///
/// Returns `None` for anything that is not exactly that shape; the identifier is never
/// accepted as free text.
pub fn extract_steam_id(claimed_id: &str) -> Option<SteamId> {
	let captures = CLAIMED_ID_PATTERN.captures(claimed_id)?;

	SteamId::new(captures.get(1)?.as_str()).ok()
}
