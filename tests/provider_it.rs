// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use httpmock::prelude::*;
// self
use steam_openid_broker::{
	_preludet::build_reqwest_test_provider,
	config::{ProfileFailurePolicy, ProviderConfig},
	error::{Error, ProfileError},
	openid::{AssertionParameters, IDENTIFIER_SELECT, OPENID_NS, keys},
	provider::{IdentityProvider, ReqwestSteamProvider},
	url::Url,
};

const CALLBACK_URL: &str = "https://app.example.com/api/auth/callback";
const STEAM_ID: &str = "76561197960287930";
const CLAIMED_ID: &str = "https://steamcommunity.com/openid/id/76561197960287930";
const SUMMARIES_PATH: &str = "/ISteamUser/GetPlayerSummaries/v0002/";
const VALID_BODY: &str = "ns:http://specs.openid.net/auth/2.0\nis_valid:true\n";
const SUMMARY_BODY: &str = r#"{"response":{"players":[{
	"steamid": "76561197960287930",
	"personaname": "Rabscuttle",
	"avatarfull": "https://avatars.steamstatic.com/rabscuttle_full.jpg"
}]}}"#;

fn build_provider(server: &MockServer, policy: ProfileFailurePolicy) -> ReqwestSteamProvider {
	let config = ProviderConfig::builder()
		.api_key("provider-api-key")
		.callback_url(CALLBACK_URL)
		.login_endpoint(
			Url::parse(&server.url("/openid/login")).expect("Mock login endpoint should parse."),
		)
		.player_summaries_endpoint(
			Url::parse(&server.url(SUMMARIES_PATH)).expect("Mock summaries endpoint should parse."),
		)
		.profile_failure_policy(policy)
		.build()
		.expect("Provider configuration should build for provider tests.");

	build_reqwest_test_provider(config)
}

fn build_assertion(provider: &ReqwestSteamProvider) -> AssertionParameters {
	AssertionParameters::from_pairs([
		(keys::NS, OPENID_NS),
		(keys::MODE, "id_res"),
		(keys::OP_ENDPOINT, provider.config.endpoints().login.as_str()),
		(keys::CLAIMED_ID, CLAIMED_ID),
		(keys::IDENTITY, CLAIMED_ID),
		(keys::RETURN_TO, provider.config.return_to()),
		("openid.response_nonce", "2024-01-01T00:00:00Zq1w2e3"),
		("openid.sig", "W0u5DRbtHE1GG0ZKXjerUZDUGmc="),
	])
}

async fn mock_verification(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/openid/login");
			then.status(200).body(VALID_BODY);
		})
		.await
}

#[test]
fn authorization_redirect_carries_protocol_parameters() {
	let config = ProviderConfig::new("provider-api-key", CALLBACK_URL)
		.expect("Provider configuration should build.");
	let provider = ReqwestSteamProvider::new(config).expect("Provider should build.");
	let url = provider.authorization().url();
	let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

	assert!(url.as_str().starts_with("https://steamcommunity.com/openid/login?"));
	assert_eq!(pairs.len(), 6);
	assert_eq!(pairs.get("openid.ns"), Some(&OPENID_NS.to_owned()));
	assert_eq!(pairs.get("openid.mode"), Some(&"checkid_setup".to_owned()));
	assert_eq!(
		pairs.get("openid.return_to"),
		Some(&"https://app.example.com/api/auth/callback/steam".to_owned())
	);
	assert_eq!(pairs.get("openid.realm"), Some(&"https://app.example.com".to_owned()));
	assert_eq!(pairs.get("openid.identity"), Some(&IDENTIFIER_SELECT.to_owned()));
	assert_eq!(pairs.get("openid.claimed_id"), Some(&IDENTIFIER_SELECT.to_owned()));
}

#[tokio::test]
async fn authenticate_verifies_then_resolves_profile() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server, ProfileFailurePolicy::Reject);
	let verify = mock_verification(&server).await;
	let summaries = server
		.mock_async(|when, then| {
			when.method(GET).path(SUMMARIES_PATH).query_param("steamids", STEAM_ID);
			then.status(200).header("content-type", "application/json").body(SUMMARY_BODY);
		})
		.await;
	let signed_in = provider
		.authenticate(&build_assertion(&provider))
		.await
		.expect("Sign-in should succeed.");

	verify.assert_calls_async(1).await;
	summaries.assert_calls_async(1).await;

	assert!(!signed_in.degraded);
	assert_eq!(signed_in.grant.steam_id.as_ref(), STEAM_ID);
	assert_eq!(signed_in.grant.access_token.expose().len(), 43);
	assert_eq!(signed_in.profile.id, signed_in.grant.steam_id);
	assert_eq!(signed_in.profile.name, "Rabscuttle");
	assert_eq!(signed_in.profile.email, "76561197960287930@steamcommunity.com");
}

#[tokio::test]
async fn profile_failure_rejects_sign_in_by_default() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server, ProfileFailurePolicy::Reject);
	let _verify = mock_verification(&server).await;
	let _summaries = server
		.mock_async(|when, then| {
			when.method(GET).path(SUMMARIES_PATH);
			then.status(200).body(r#"{"response":{"players":[]}}"#);
		})
		.await;
	let err = provider
		.authenticate(&build_assertion(&provider))
		.await
		.expect_err("Profile failure must reject the sign-in.");

	assert_eq!(err.verified_steam_id().map(|id| id.as_ref()), Some(STEAM_ID));
	assert!(matches!(err, Error::ProfileResolution { source: ProfileError::NotFound, .. }));
}

#[tokio::test]
async fn profile_failure_degrades_to_minimal_session_when_configured() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server, ProfileFailurePolicy::MinimalSession);
	let _verify = mock_verification(&server).await;
	let _summaries = server
		.mock_async(|when, then| {
			when.method(GET).path(SUMMARIES_PATH);
			then.status(500);
		})
		.await;
	let signed_in = provider
		.authenticate(&build_assertion(&provider))
		.await
		.expect("Minimal session should be issued.");

	assert!(signed_in.degraded);
	assert_eq!(signed_in.profile.id.as_ref(), STEAM_ID);
	assert_eq!(signed_in.profile.name, STEAM_ID);
	assert_eq!(signed_in.profile.image, None);
	assert_eq!(signed_in.profile.email, "76561197960287930@steamcommunity.com");
}

#[tokio::test]
async fn minimal_session_never_masks_a_rejected_assertion() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server, ProfileFailurePolicy::MinimalSession);
	let _verify = server
		.mock_async(|when, then| {
			when.method(POST).path("/openid/login");
			then.status(200).body("is_valid:false");
		})
		.await;
	let summaries = server
		.mock_async(|when, then| {
			when.method(GET).path(SUMMARIES_PATH);
			then.status(200).body(SUMMARY_BODY);
		})
		.await;
	let err = provider
		.authenticate(&build_assertion(&provider))
		.await
		.expect_err("Rejected assertion must fail regardless of policy.");

	summaries.assert_calls_async(0).await;

	assert!(matches!(err, Error::AssertionRejected));
}

#[tokio::test]
async fn host_drives_the_callbacks_through_the_trait() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server, ProfileFailurePolicy::Reject);
	let params = build_assertion(&provider);
	let host: Arc<dyn IdentityProvider> = Arc::new(provider);
	let _verify = mock_verification(&server).await;
	let _summaries = server
		.mock_async(|when, then| {
			when.method(GET).path(SUMMARIES_PATH);
			then.status(200).header("content-type", "application/json").body(SUMMARY_BODY);
		})
		.await;
	let descriptor = host.descriptor();

	assert_eq!(descriptor.id.as_ref(), "steam");
	assert_eq!(descriptor.name, "Steam");
	assert_eq!(descriptor.endpoints.authorization.as_str(), server.url("/openid/login"));
	assert!(!descriptor.quirks.issues_id_token);

	let grant = host.exchange_token(&params).await.expect("Token exchange should succeed.");
	let raw = host.userinfo(&grant).await.expect("Userinfo should succeed.");
	let profile = host.map_profile(&grant.steam_id, &raw);

	assert_eq!(profile.id.as_ref(), STEAM_ID);
	assert_eq!(profile.name, "Rabscuttle");
	assert_eq!(
		profile.image.as_deref(),
		Some("https://avatars.steamstatic.com/rabscuttle_full.jpg")
	);
}
