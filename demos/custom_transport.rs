//! Demonstrates plugging a custom HTTP client and mapper into the provider.
//!
//! 1. Implement [`SteamHttpClient`] so the transport records [`ResponseMetadata`] via the
//!    provided [`ResponseMetadataSlot`].
//! 2. Provide a [`TransportErrorMapper`] that turns the transport's own errors into the
//!    broker's [`Error`] type.
//! 3. Hand both to [`SteamProvider::with_http_client`].
//!
//! The canned transport here answers Steam's two endpoints locally, so the demo runs offline.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
};
// crates.io
use color_eyre::Result;
// self
use steam_openid_broker::{
	config::ProviderConfig,
	error::{Error, TransportError},
	http::{ResponseMetadata, ResponseMetadataSlot, SteamHttpClient},
	oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, http::StatusCode},
	obs::Stage,
	openid::{AssertionParameters, OPENID_NS, keys},
	provider::SteamProvider,
	transport::TransportErrorMapper,
};

const CLAIMED_ID: &str = "https://steamcommunity.com/openid/id/76561197960287930";
const SUMMARY_BODY: &str =
	r#"{"response":{"players":[{"steamid":"76561197960287930","personaname":"Rabscuttle"}]}}"#;

#[derive(Debug)]
enum CannedTransportError {
	UnknownRoute(String),
}
impl Display for CannedTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::UnknownRoute(path) => write!(f, "No canned route for `{path}`."),
		}
	}
}
impl StdError for CannedTransportError {}

#[derive(Clone, Copy, Debug, Default)]
struct CannedHttpClient;
impl SteamHttpClient for CannedHttpClient {
	type Handle = CannedHandle;
	type TransportError = CannedTransportError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		CannedHandle { slot }
	}
}

struct CannedHandle {
	slot: ResponseMetadataSlot,
}
impl<'a> AsyncHttpClient<'a> for CannedHandle {
	type Error = HttpClientError<CannedTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			self.slot.take();

			let body = match request.uri().path() {
				"/openid/login" => "ns:http://specs.openid.net/auth/2.0\nis_valid:true\n",
				"/ISteamUser/GetPlayerSummaries/v0002/" => SUMMARY_BODY,
				other =>
					return Err(HttpClientError::Other(
						CannedTransportError::UnknownRoute(other.into()).to_string(),
					)),
			};

			self.slot.store(ResponseMetadata { status: Some(200), retry_after: None });

			let mut response = HttpResponse::new(body.as_bytes().to_vec());

			*response.status_mut() = StatusCode::OK;

			Ok(response)
		})
	}
}

#[derive(Debug, Default)]
struct CannedTransportErrorMapper;
impl TransportErrorMapper<CannedTransportError> for CannedTransportErrorMapper {
	fn map_transport_error(
		&self,
		stage: Stage,
		_metadata: Option<&ResponseMetadata>,
		error: HttpClientError<CannedTransportError>,
	) -> Error {
		TransportError::Other { stage, message: error.to_string() }.into()
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ProviderConfig::new("demo-api-key", "https://app.example.com/auth")?;
	let provider: SteamProvider<CannedHttpClient, CannedTransportErrorMapper> =
		SteamProvider::with_http_client(config, CannedHttpClient, CannedTransportErrorMapper)?;
	let return_to = provider.config.return_to().to_owned();
	let login = provider.config.endpoints().login.to_string();
	let params = AssertionParameters::from_pairs([
		(keys::NS, OPENID_NS),
		(keys::MODE, "id_res"),
		(keys::OP_ENDPOINT, login.as_str()),
		(keys::CLAIMED_ID, CLAIMED_ID),
		(keys::IDENTITY, CLAIMED_ID),
		(keys::RETURN_TO, return_to.as_str()),
	]);
	let signed_in = provider.authenticate(&params).await?;

	println!("Canned transport verified SteamID {}.", signed_in.grant.steam_id);
	println!("Resolved profile name: {}.", signed_in.profile.name);

	Ok(())
}
