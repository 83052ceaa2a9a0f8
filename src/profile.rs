//! Player summary lookup and profile normalization.
//!
//! A verified [`SteamId`] is resolved through Steam's `GetPlayerSummaries` Web API into a
//! [`RawProfile`], which [`NormalizedProfile::from_raw`] maps into the record the host
//! builds its session from.

// crates.io
use oauth2::HttpRequest;
// self
use crate::{
	_prelude::*,
	auth::{ApiKey, SteamId},
	error::ProfileError,
	http::SteamHttpClient,
	obs::{self, Stage, StageOutcome, StageSpan},
	provider::SteamProvider,
	transport::{self, TransportErrorMapper},
};

/// Domain used for synthesized contact addresses; Steam exposes no e-mail.
pub const EMAIL_DOMAIN: &str = "steamcommunity.com";

/// Community profile visibility as reported by Steam.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum CommunityVisibilityState {
	/// Only the owner can see the profile.
	#[default]
	Private,
	/// Friends can see the profile.
	FriendsOnly,
	/// Everyone can see the profile.
	Public,
	/// Value this crate does not know about.
	Other(u8),
}
impl From<u8> for CommunityVisibilityState {
	fn from(value: u8) -> Self {
		match value {
			1 => Self::Private,
			2 => Self::FriendsOnly,
			3 => Self::Public,
			other => Self::Other(other),
		}
	}
}
impl From<CommunityVisibilityState> for u8 {
	fn from(value: CommunityVisibilityState) -> Self {
		match value {
			CommunityVisibilityState::Private => 1,
			CommunityVisibilityState::FriendsOnly => 2,
			CommunityVisibilityState::Public => 3,
			CommunityVisibilityState::Other(other) => other,
		}
	}
}

/// Online presence as reported by Steam.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum PersonaState {
	/// Offline, or the profile is private.
	#[default]
	Offline,
	/// Online.
	Online,
	/// Busy.
	Busy,
	/// Away.
	Away,
	/// Snoozing.
	Snooze,
	/// Looking to trade.
	LookingToTrade,
	/// Looking to play.
	LookingToPlay,
	/// Value this crate does not know about.
	Other(u8),
}
impl From<u8> for PersonaState {
	fn from(value: u8) -> Self {
		match value {
			0 => Self::Offline,
			1 => Self::Online,
			2 => Self::Busy,
			3 => Self::Away,
			4 => Self::Snooze,
			5 => Self::LookingToTrade,
			6 => Self::LookingToPlay,
			other => Self::Other(other),
		}
	}
}
impl From<PersonaState> for u8 {
	fn from(value: PersonaState) -> Self {
		match value {
			PersonaState::Offline => 0,
			PersonaState::Online => 1,
			PersonaState::Busy => 2,
			PersonaState::Away => 3,
			PersonaState::Snooze => 4,
			PersonaState::LookingToTrade => 5,
			PersonaState::LookingToPlay => 6,
			PersonaState::Other(other) => other,
		}
	}
}

/// One player summary record returned by `GetPlayerSummaries`.
///
/// Only `steamid` is required. Fields Steam adds later land in [`RawProfile::extra`]
/// instead of failing the parse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProfile {
	/// 64-bit SteamID as a decimal string.
	pub steamid: String,
	/// Display name.
	#[serde(default)]
	pub personaname: String,
	/// Community profile URL.
	#[serde(default)]
	pub profileurl: String,
	/// 32x32 avatar URL.
	#[serde(default)]
	pub avatar: String,
	/// 64x64 avatar URL.
	#[serde(default)]
	pub avatarmedium: String,
	/// 184x184 avatar URL.
	#[serde(default)]
	pub avatarfull: String,
	/// Avatar content hash.
	#[serde(default)]
	pub avatarhash: Option<String>,
	/// Profile visibility.
	#[serde(default)]
	pub communityvisibilitystate: CommunityVisibilityState,
	/// `1` once the user configured a community profile.
	#[serde(default)]
	pub profilestate: Option<u8>,
	/// Online presence.
	#[serde(default)]
	pub personastate: PersonaState,
	/// Presence flags bitmask.
	#[serde(default)]
	pub personastateflags: Option<u32>,
	/// `1` when anyone may comment on the profile.
	#[serde(default)]
	pub commentpermission: Option<u8>,
	/// Account creation time.
	#[serde(default, with = "time::serde::timestamp::option")]
	pub timecreated: Option<OffsetDateTime>,
	/// Last logoff time.
	#[serde(default, with = "time::serde::timestamp::option")]
	pub lastlogoff: Option<OffsetDateTime>,
	/// Primary group ID.
	#[serde(default)]
	pub primaryclanid: Option<String>,
	/// Real name, when public.
	#[serde(default)]
	pub realname: Option<String>,
	/// ISO country code, when public.
	#[serde(default)]
	pub loccountrycode: Option<String>,
	/// Unrecognized fields passed through untouched.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// Profile handed to the host after a successful sign-in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedProfile {
	/// Verified SteamID; never taken from any other field.
	pub id: SteamId,
	/// Display name.
	pub name: String,
	/// Full-size avatar URL.
	pub image: Option<String>,
	/// Synthesized `{steamid}@steamcommunity.com` address.
	pub email: String,
}
impl NormalizedProfile {
	/// Maps a raw player summary, keying the result on the verified `steam_id`.
	pub fn from_raw(steam_id: &SteamId, raw: &RawProfile) -> Self {
		let image = Some(raw.avatarfull.clone()).filter(|url| !url.is_empty());

		Self {
			id: steam_id.clone(),
			name: raw.personaname.clone(),
			image,
			email: synthesized_email(steam_id),
		}
	}

	/// Profile carrying nothing beyond the verified SteamID.
	pub fn minimal(steam_id: &SteamId) -> Self {
		Self {
			id: steam_id.clone(),
			name: steam_id.to_string(),
			image: None,
			email: synthesized_email(steam_id),
		}
	}
}

#[derive(Deserialize)]
struct PlayerSummariesEnvelope {
	response: PlayerSummaries,
}

#[derive(Deserialize)]
struct PlayerSummaries {
	#[serde(default)]
	players: Vec<RawProfile>,
}

impl<C, M> SteamProvider<C, M>
where
	C: ?Sized + SteamHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Fetches the player summary for a verified SteamID.
	///
	/// Transport failures, non-success statuses, malformed envelopes, and empty results
	/// all surface as [`Error::ProfileResolution`] carrying `steam_id`. No retry.
	pub async fn fetch_profile(&self, steam_id: &SteamId) -> Result<RawProfile> {
		const STAGE: Stage = Stage::Profile;

		let span = StageSpan::new(STAGE, "fetch_profile");

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = player_summaries_request(
					&self.config.endpoints().player_summaries,
					self.config.api_key(),
					steam_id,
				)?;
				let response = transport::dispatch(
					self.http_client.as_ref(),
					self.transport_mapper.as_ref(),
					STAGE,
					request,
				)
				.await
				.map_err(|e| match e {
					Error::Transport(source) => Error::ProfileResolution {
						steam_id: steam_id.clone(),
						source: source.into(),
					},
					other => other,
				})?;

				parse_player_summaries(response.body(), steam_id).map_err(|source| {
					Error::ProfileResolution { steam_id: steam_id.clone(), source }
				})
			})
			.await;

		match &result {
			Ok(_) => obs::record_stage_outcome(STAGE, StageOutcome::Success),
			Err(_) => obs::record_stage_outcome(STAGE, StageOutcome::Failure),
		}

		result
	}

	/// Fetches and normalizes the profile for a verified SteamID.
	pub async fn resolve_profile(&self, steam_id: &SteamId) -> Result<NormalizedProfile> {
		let raw = self.fetch_profile(steam_id).await?;

		Ok(NormalizedProfile::from_raw(steam_id, &raw))
	}
}

/// Builds the `GetPlayerSummaries` lookup for a single SteamID.
pub fn player_summaries_request(
	endpoint: &Url,
	api_key: &ApiKey,
	steam_id: &SteamId,
) -> Result<HttpRequest> {
	let mut url = endpoint.clone();

	url.query_pairs_mut()
		.append_pair("key", api_key.expose())
		.append_pair("steamids", steam_id);

	transport::json_get_request(&url)
}

/// Parses a `GetPlayerSummaries` body and picks the record for `steam_id`.
///
/// Only the record whose `steamid` equals the verified ID is used; any other records in the
/// list are ignored rather than treated as an error.
pub fn parse_player_summaries(
	body: &[u8],
	steam_id: &SteamId,
) -> Result<RawProfile, ProfileError> {
	let mut de = serde_json::Deserializer::from_slice(body);
	let envelope: PlayerSummariesEnvelope = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| ProfileError::Malformed { source })?;

	envelope
		.response
		.players
		.into_iter()
		.find(|player| player.steamid == steam_id.as_ref())
		.ok_or(ProfileError::NotFound)
}

/// Contact address synthesized for `steam_id`.
pub fn synthesized_email(steam_id: &SteamId) -> String {
	format!("{steam_id}@{EMAIL_DOMAIN}")
}
