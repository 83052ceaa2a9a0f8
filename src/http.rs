//! Transport primitives for Steam's OpenID and Web API calls.
//!
//! The module exposes [`SteamHttpClient`] alongside [`ResponseMetadata`] and
//! [`ResponseMetadataSlot`] so downstream crates can plug in custom HTTP clients
//! (or call-counting fakes in tests) without losing the broker's error mapping.
//! Implementations call [`ResponseMetadataSlot::take`] before dispatching a request and
//! [`ResponseMetadataSlot::store`] once an HTTP status or retry hint is known.
//!
//! The broker never retries and never imposes a timeout; configure both on the
//! client you hand in.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError};
#[cfg(feature = "reqwest")] use oauth2::{HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")] use reqwest::header::{HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::_prelude::*;

/// Abstraction over HTTP transports capable of executing Steam round trips while
/// publishing response metadata to the broker's error mapping.
///
/// The trait is the broker's only dependency on an HTTP stack. Implementations must
/// be `Send + Sync + 'static` so a single client can back every concurrent sign-in, and
/// the handles they return must own whatever state the request future needs so that
/// future stays `Send`.
pub trait SteamHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle tied to a [`ResponseMetadataSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle that records outcomes in `slot`.
	///
	/// # Metadata Contract
	///
	/// - Call [`ResponseMetadataSlot::take`] before submitting the HTTP request so stale
	///   information never leaks across attempts.
	/// - Once an HTTP response (successful or erroneous) provides status headers, save them with
	///   [`ResponseMetadataSlot::store`].
	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle;
}

/// Captures metadata from the most recent HTTP response for downstream error mapping.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code returned by Steam, if available.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Reqwest-backed [`SteamHttpClient`].
///
/// Steam answers `check_authentication` directly; a redirect there means something
/// upstream is misbehaving. [`ReqwestHttpClient::without_redirects`] builds a client
/// that surfaces the redirect status instead of following it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps a caller-configured reqwest [`ReqwestClient`] (timeouts, proxies, TLS roots).
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that never follows redirects.
	pub fn without_redirects() -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl SteamHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		ReqwestHandle { client: self.0.clone(), slot }
	}
}

/// Per-request handle returned by [`ReqwestHttpClient`]; reports status and `Retry-After`
/// into its slot.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(execute(self.client.clone(), self.slot.clone(), request))
	}
}

#[cfg(feature = "reqwest")]
async fn execute(
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
	request: HttpRequest,
) -> Result<HttpResponse, HttpClientError<ReqwestError>> {
	slot.take();

	let upstream = client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
	let status = upstream.status();
	let headers = upstream.headers().clone();

	slot.store(ResponseMetadata {
		status: Some(status.as_u16()),
		retry_after: parse_retry_after(&headers),
	});

	let body = upstream.bytes().await.map_err(Box::new)?;
	let mut response = HttpResponse::new(body.to_vec());

	*response.status_mut() = status;
	*response.headers_mut() = headers;

	Ok(response)
}

/// Reads `Retry-After` as either delta-seconds or an RFC 2822 date still in the future.
#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

	match raw.parse::<i64>() {
		Ok(secs) if secs >= 0 => Some(Duration::seconds(secs)),
		Ok(_) => None,
		Err(_) => OffsetDateTime::parse(raw, &Rfc2822)
			.ok()
			.map(|moment| moment - OffsetDateTime::now_utc())
			.filter(|delta| delta.is_positive()),
	}
}
