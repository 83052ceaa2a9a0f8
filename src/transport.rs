//! Request construction, dispatch, and transport error mapping.
//!
//! Every upstream call goes through [`dispatch`]: exactly one attempt, metadata captured
//! through a fresh [`ResponseMetadataSlot`], and any non-success status turned into
//! [`TransportError::Status`].

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	http::{ResponseMetadata, ResponseMetadataSlot, SteamHttpClient},
	obs::Stage,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Maps HTTP transport failures into broker [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a broker error.
	fn map_transport_error(
		&self,
		stage: Stage,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		stage: Stage,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(stage, meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => TransportError::Other { stage, message }.into(),
			_ => TransportError::Other { stage, message: "unrecognized client failure".into() }
				.into(),
		}
	}
}

/// Executes a single request and returns the response when its status is a success.
pub async fn dispatch<C, M>(
	http_client: &C,
	mapper: &M,
	stage: Stage,
	request: HttpRequest,
) -> Result<HttpResponse>
where
	C: ?Sized + SteamHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let meta = ResponseMetadataSlot::default();
	let handle = http_client.with_metadata(meta.clone());
	let response = handle
		.call(request)
		.await
		.map_err(|err| mapper.map_transport_error(stage, meta.take().as_ref(), err))?;
	let status = response.status();

	if !status.is_success() {
		let retry_after = meta.take().and_then(|value| value.retry_after);

		return Err(TransportError::Status { stage, status: status.as_u16(), retry_after }.into());
	}

	Ok(response)
}

/// Builds a form-encoded `POST` carrying `pairs` as its body.
pub fn form_post_request<'p, I>(endpoint: &Url, pairs: I) -> Result<HttpRequest>
where
	I: IntoIterator<Item = (&'p str, &'p str)>,
{
	let mut body = Serializer::new(String::new());

	for (key, value) in pairs {
		body.append_pair(key, value);
	}

	oauth2::http::Request::builder()
		.method(Method::POST)
		.uri(endpoint.as_str())
		.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.body(body.finish().into_bytes())
		.map_err(|e| ConfigError::from(e).into())
}

/// Builds a `GET` expecting a JSON body.
pub fn json_get_request(url: &Url) -> Result<HttpRequest> {
	oauth2::http::Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.header(ACCEPT, "application/json")
		.body(Vec::new())
		.map_err(|e| ConfigError::from(e).into())
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(stage: Stage, meta: Option<&ResponseMetadata>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::Timeout { stage }.into();
	}
	if let Some(status) = meta.and_then(|value| value.status).or_else(|| reqwest_status(&err))
		&& !(200..300).contains(&status)
	{
		return TransportError::Status {
			stage,
			status,
			retry_after: meta.and_then(|value| value.retry_after),
		}
		.into();
	}

	TransportError::network(stage, err).into()
}

#[cfg(feature = "reqwest")]
fn reqwest_status(err: &ReqwestError) -> Option<u16> {
	err.status().map(|code| code.as_u16())
}
