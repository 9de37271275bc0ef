//! The SABnzbd API client: construction, request dispatch and teardown.
//!
//! Every domain operation (`auth`, `queue`, `history`, ...) funnels through
//! [`Client::dispatch`], which works in three steps:
//!
//! 1. **build**: merge the call's parameters with `mode` and the client
//!    defaults (`output`, `apikey`) and render the final URL
//!    ([`Client::build_request`]);
//! 2. **send**: hand the request to the [`Transport`], bounded by a timeout;
//! 3. **decode**: turn the raw status and body into an [`ApiResponse`] or a
//!    [`SabError`] ([`response::decode`]).
//!
//! A client either owns its transport (built by default) or shares one
//! supplied by the caller. An owned transport is released by
//! [`Client::close`]; a shared one is left alone.

mod operations;

pub use operations::{AddOptions, HistoryQuery};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};
use url::Url;

use crate::config::{ClientConfig, DEFAULT_TIMEOUT_SECS};
use crate::error::SabError;
use crate::params::{APIKEY_KEY, OUTPUT_KEY, ParamValue, Params};
use crate::response::{self, ApiResponse};
use crate::transport::{HttpMethod, ReqwestTransport, Transport, TransportRequest};
use crate::types::OutputFormat;

/// Path appended to the base URL.
pub const API_PATH: &str = "/sabnzbd/api";

/// One call to the API, before it is merged with the client defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    mode: String,
    method: HttpMethod,
    timeout: Option<Duration>,
    params: Params,
}

impl Request {
    /// Creates a GET request for `mode` with no extra parameters.
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            method: HttpMethod::Get,
            timeout: None,
            params: Params::new(),
        }
    }

    /// Overrides the HTTP method.
    #[must_use]
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Overrides the client's default timeout for this call.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds one parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Adds one parameter when `value` is `Some`.
    #[must_use]
    pub fn param_opt<V: Into<ParamValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Adds every parameter in `params`, replacing existing keys.
    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        for (key, value) in params.iter() {
            self.params.insert(key, value.clone());
        }
        self
    }

    /// The API mode this request calls.
    #[must_use]
    pub fn mode(&self) -> &str {
        &self.mode
    }
}

enum TransportHandle {
    /// Built by (or handed over to) the client; released by [`Client::close`].
    Owned(Arc<dyn Transport>),
    /// Supplied by the caller, who remains responsible for it.
    Shared(Arc<dyn Transport>),
}

impl TransportHandle {
    fn get(&self) -> &dyn Transport {
        match self {
            Self::Owned(transport) | Self::Shared(transport) => transport.as_ref(),
        }
    }
}

/// Async client for one SABnzbd server.
///
/// # Example
///
/// ```no_run
/// use sabapi::Client;
///
/// # async fn example() -> Result<(), sabapi::SabError> {
/// let client = Client::new("http://localhost:8080", "0123456789abcdef")?;
/// let queue = client.queue(Default::default()).await?;
/// println!("{:?}", queue.get("queue"));
/// client.close().await;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    endpoint: Url,
    output: OutputFormat,
    timeout: Duration,
    defaults: Params,
    transport: TransportHandle,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint.as_str())
            .field("output", &self.output)
            .field("timeout", &self.timeout)
            .field("owns_transport", &self.owns_transport())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a JSON client with its own reqwest transport.
    ///
    /// No network activity happens here.
    ///
    /// # Errors
    ///
    /// Returns [`SabError::InvalidUrl`] for an empty or malformed URL and
    /// [`SabError::Transport`] when the HTTP client cannot be built.
    pub fn new(url: &str, api_key: &str) -> Result<Self, SabError> {
        Self::builder(url).api_key(api_key).build()
    }

    /// Starts configuring a client for `url`.
    pub fn builder(url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(url)
    }

    /// Creates a client from a validated [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`SabError::Config`] when validation fails, otherwise the same
    /// errors as [`ClientBuilder::build`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, SabError> {
        config.validate()?;
        let mut builder = Self::builder(&config.url)
            .api_key(&config.api_key)
            .output(config.output)
            .timeout(config.timeout());
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        builder.build()
    }

    /// The API endpoint (`<base>/sabnzbd/api`).
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The configured output format.
    #[must_use]
    pub fn output(&self) -> OutputFormat {
        self.output
    }

    /// The default per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` if [`close`](Self::close) will release the transport.
    #[must_use]
    pub fn owns_transport(&self) -> bool {
        matches!(self.transport, TransportHandle::Owned(_))
    }

    /// Builds the wire request for `request` without sending it.
    ///
    /// Caller parameters are merged first, then `mode`, then the client
    /// defaults, so `mode`, `output` and `apikey` cannot be overridden.
    /// Booleans are rendered as `1`/`0`.
    #[must_use]
    pub fn build_request(&self, request: Request) -> TransportRequest {
        let merged = request.params.merged(&request.mode, &self.defaults);
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(merged.to_query_pairs());
        TransportRequest {
            method: request.method,
            url,
            timeout: request.timeout.unwrap_or(self.timeout),
        }
    }

    /// Sends one request and decodes the answer.
    ///
    /// # Errors
    ///
    /// - [`SabError::Transport`] on timeout or connection failure.
    /// - [`SabError::HttpStatus`] on a non-2xx status whose JSON body is not an object.
    /// - [`SabError::Decode`] when a JSON body cannot be decoded.
    /// - [`SabError::Api`] when the server reports an `error`.
    #[instrument(level = "debug", skip(self, request), fields(mode = %request.mode()))]
    pub async fn dispatch(&self, request: Request) -> Result<ApiResponse, SabError> {
        let mode = request.mode.clone();
        let wire = self.build_request(request);
        let url = wire.redacted_url();

        let raw = self.transport.get().execute(wire).await?;
        debug!(status = raw.status, bytes = raw.body.len(), "response received");

        response::decode(&mode, self.output, url, raw)
    }

    /// Shorthand for dispatching `mode` with `params`.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn query(&self, mode: &str, params: Params) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new(mode).params(params)).await
    }

    /// Releases the transport if this client owns it.
    ///
    /// A shared transport is left untouched; it belongs to the caller.
    pub async fn close(self) {
        match self.transport {
            TransportHandle::Owned(transport) => {
                transport.close().await;
                debug!(endpoint = %self.endpoint, "client closed");
            }
            TransportHandle::Shared(_) => {
                debug!(endpoint = %self.endpoint, "client dropped; shared transport left open");
            }
        }
    }
}

/// Configures and builds a [`Client`].
pub struct ClientBuilder {
    url: String,
    api_key: String,
    output: OutputFormat,
    timeout: Duration,
    user_agent: Option<String>,
    transport: Option<TransportHandle>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("url", &self.url)
            .field("output", &self.output)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: String::new(),
            output: OutputFormat::Json,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            transport: None,
        }
    }

    /// Sets the API key sent with every request.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the output format (default JSON).
    #[must_use]
    pub fn output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Sets the default per-request timeout (default 10 seconds).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the User-Agent of the transport built by the client.
    ///
    /// Ignored when a transport is supplied.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Uses a caller-owned transport. The client never closes it.
    #[must_use]
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(TransportHandle::Shared(transport));
        self
    }

    /// Hands a transport over to the client, which closes it on [`Client::close`].
    #[must_use]
    pub fn owned_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(TransportHandle::Owned(transport));
        self
    }

    /// Validates the URL and builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`SabError::InvalidUrl`] for an empty or malformed URL and
    /// [`SabError::Transport`] when the default transport cannot be built.
    pub fn build(self) -> Result<Client, SabError> {
        let endpoint = endpoint_url(&self.url)?;

        let transport = match self.transport {
            Some(handle) => handle,
            None => {
                let transport = match self.user_agent {
                    Some(user_agent) => ReqwestTransport::with_user_agent(user_agent)?,
                    None => ReqwestTransport::new()?,
                };
                TransportHandle::Owned(Arc::new(transport))
            }
        };

        let defaults = Params::new()
            .with(OUTPUT_KEY, self.output.as_str())
            .with(APIKEY_KEY, self.api_key);

        Ok(Client {
            endpoint,
            output: self.output,
            timeout: self.timeout,
            defaults,
            transport,
        })
    }
}

/// Normalizes `base` and appends [`API_PATH`].
fn endpoint_url(base: &str) -> Result<Url, SabError> {
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(SabError::invalid_url(base, "URL must not be empty"));
    }

    let mut url = Url::parse(trimmed).map_err(|e| SabError::invalid_url(base, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SabError::invalid_url(
            base,
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(SabError::invalid_url(base, "URL must not carry a query or fragment"));
    }

    let path = format!("{}{API_PATH}", url.path().trim_end_matches('/'));
    url.set_path(&path);
    Ok(url)
}
