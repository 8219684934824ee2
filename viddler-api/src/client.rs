//! Viddler HTTP client implementation

use crate::error::ViddlerError;
use crate::params::FormParams;
use crate::response::{self, Document};
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

/// Production API root
pub const DEFAULT_BASE_URL: &str = "http://api.viddler.com";

/// Environment variable read by [`ViddlerClient::from_env`] for the API key
pub const API_KEY_ENV: &str = "VIDDLER_API_KEY";

/// Environment variable read by [`ViddlerClient::from_env`] for the base URL
pub const BASE_URL_ENV: &str = "VIDDLER_BASE_URL";

const API_PATH: [&str; 2] = ["api", "v2"];
const AUTH_METHOD: &str = "viddler.users.auth";
const USER_AGENT: &str = concat!("viddler-api/", env!("CARGO_PKG_VERSION"));

/// The main Viddler API client
///
/// Every request carries the API key as `key` and, when the client is
/// authenticated, the session id as `sessionid`. Requests only read the
/// session (`&self`) while [`authenticate`](Self::authenticate) and the
/// session setters need `&mut self`, so a session can never change under an
/// in-flight request. Share a client across threads behind a `Mutex` if those
/// threads also authenticate.
///
/// # Example
///
/// ```no_run
/// use viddler_api::ViddlerClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client = ViddlerClient::new("your_api_key")?;
///
/// if client.authenticate("username", "password") {
///     let profile = client.get("viddler.users.getProfile", [("user", "username")])?;
///     println!("{:?}", profile.str_at(&["user", "first_name"]));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ViddlerClient {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
    api_key: Zeroizing<String>,
    session_id: Option<Zeroizing<String>>,
}

impl ViddlerClient {
    /// Create a client for the production API
    ///
    /// # Errors
    ///
    /// Returns `ViddlerError::ClientInit` if the HTTP client cannot be initialized.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ViddlerError> {
        Self::builder(api_key).build()
    }

    /// Create a builder for configuring the client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use viddler_api::ViddlerClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = ViddlerClient::builder("your_api_key")
    ///     .base_url("http://localhost:1234")?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(api_key: impl Into<String>) -> ViddlerClientBuilder {
        ViddlerClientBuilder::new(api_key)
    }

    /// Create a client from `VIDDLER_API_KEY` and, if set, `VIDDLER_BASE_URL`
    ///
    /// # Errors
    ///
    /// Returns `ViddlerError::ClientInit` if the API key is not set or the
    /// base URL is invalid.
    pub fn from_env() -> Result<Self, ViddlerError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|e| ViddlerError::ClientInit(format!("{API_KEY_ENV}: {e}")))?;

        let mut builder = Self::builder(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            builder = builder.base_url(base_url.as_str())?;
        }
        builder.build()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &reqwest::Url {
        &self.base_url
    }

    /// The current session id, `None` when unauthenticated
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().map(String::as_str)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_id.is_some()
    }

    /// Use a session id obtained elsewhere; an empty id clears the session
    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        let session_id = Zeroizing::new(session_id.into());
        if session_id.is_empty() {
            self.clear_session();
        } else {
            debug!("session id set");
            self.session_id = Some(session_id);
        }
    }

    pub fn clear_session(&mut self) {
        if self.session_id.take().is_some() {
            debug!("session id cleared");
        }
    }

    /// Call an API method with a GET request
    ///
    /// `method` is the dotted method name, e.g. `viddler.api.echo`. Parameters
    /// are sent as the query string, after `key` and `sessionid`; a parameter
    /// named `key` or `sessionid` replaces the client's own value.
    ///
    /// # Errors
    ///
    /// * `ViddlerError::Transport` - Network error
    /// * `ViddlerError::Decode` - Response body is not JSON
    /// * `ViddlerError::Api` - Response contains an `error` object
    ///
    /// # Example
    ///
    /// ```no_run
    /// use viddler_api::ViddlerClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = ViddlerClient::new("your_api_key")?;
    /// let echo = client.get("viddler.api.echo", [("message", "hello there")])?;
    /// assert_eq!(echo.str_at(&["echo_response", "message"]), Some("hello there"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn get<I, K, V>(&self, method: &str, params: I) -> Result<Document, ViddlerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.endpoint(method)?;
        let form = self.sign(params);

        debug!(
            method,
            http_method = "GET",
            authenticated = self.is_authenticated(),
            "sending API request"
        );
        let response = self.client.get(url).query(form.as_pairs()).send()?;

        Self::handle_response(method, response)
    }

    /// Call an API method with a form-encoded POST request
    ///
    /// Parameters follow the same rules as [`get`](Self::get) but travel in an
    /// `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn post<I, K, V>(&self, method: &str, params: I) -> Result<Document, ViddlerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.endpoint(method)?;
        let form = self.sign(params);

        debug!(
            method,
            http_method = "POST",
            authenticated = self.is_authenticated(),
            "sending API request"
        );
        let response = self.client.post(url).form(form.as_pairs()).send()?;

        Self::handle_response(method, response)
    }

    /// Log in with a username and password and keep the returned session id
    ///
    /// The current session is dropped first, so a failed attempt always leaves
    /// the client unauthenticated. Returns whether a session id was obtained;
    /// call `get("viddler.users.auth", ...)` directly to see why it failed.
    pub fn authenticate(&mut self, username: &str, password: &str) -> bool {
        self.clear_session();

        let session_id = self
            .get(AUTH_METHOD, [("username", username), ("password", password)])
            .ok()
            .and_then(|document| {
                document
                    .str_at(&["auth", "sessionid"])
                    .map(|id| Zeroizing::new(id.to_owned()))
            });

        if let Some(session_id) = session_id {
            self.set_session_id(session_id.as_str());
        } else {
            debug!("authentication did not yield a session id");
        }

        self.is_authenticated()
    }

    /// Build `{base_url}/api/v2/{method}.json`
    fn endpoint(&self, method: &str) -> Result<reqwest::Url, ViddlerError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| ViddlerError::ClientInit("Cannot modify base URL path".to_string()))?
            .pop_if_empty()
            .extend(API_PATH)
            .push(&format!("{method}.json"));
        Ok(url)
    }

    fn sign<I, K, V>(&self, params: I) -> FormParams
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        FormParams::signed(&self.api_key, self.session_id(), params)
    }

    fn handle_response(
        method: &str,
        response: reqwest::blocking::Response,
    ) -> Result<Document, ViddlerError> {
        let status = response.status();
        let body = response.bytes()?;
        debug!(
            method,
            status = status.as_u16(),
            bytes = body.len(),
            "received API response"
        );
        response::decode_body(&body)
    }
}

impl fmt::Debug for ViddlerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViddlerClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// Builder for configuring a Viddler API client
///
/// # Example
///
/// ```no_run
/// use viddler_api::ViddlerClient;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Mock server with a pre-obtained session and a short timeout
/// let client = ViddlerClient::builder("your_api_key")
///     .base_url("http://localhost:1234")?
///     .session_id("a-session-id")
///     .client_builder(
///         reqwest::blocking::Client::builder()
///             .timeout(Duration::from_secs(10))
///     )
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ViddlerClientBuilder {
    api_key: Zeroizing<String>,
    base_url: Option<reqwest::Url>,
    session_id: Option<String>,
    client_builder: Option<reqwest::blocking::ClientBuilder>,
}

impl ViddlerClientBuilder {
    /// Create a new builder with default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Zeroizing::new(api_key.into()),
            base_url: None,
            session_id: None,
            client_builder: None,
        }
    }

    /// Set a custom base URL (scheme and host, optionally a path prefix)
    ///
    /// This is useful for testing with mock servers. The URL is parsed and
    /// validated at builder time.
    ///
    /// # Errors
    ///
    /// Returns `ViddlerError::ClientInit` if the URL cannot be parsed or cannot
    /// carry a path.
    pub fn base_url(mut self, url: impl reqwest::IntoUrl) -> Result<Self, ViddlerError> {
        let url = url
            .into_url()
            .map_err(|e| ViddlerError::ClientInit(format!("Invalid base URL: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(ViddlerError::ClientInit(format!(
                "Base URL cannot carry a path: {url}"
            )));
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Start out with a pre-obtained session id
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set a custom HTTP client builder (timeouts, proxies, etc.)
    pub fn client_builder(mut self, builder: reqwest::blocking::ClientBuilder) -> Self {
        self.client_builder = Some(builder);
        self
    }

    /// Build the client with the configured settings
    ///
    /// # Errors
    ///
    /// Returns `ViddlerError::ClientInit` if the HTTP client cannot be initialized.
    pub fn build(self) -> Result<ViddlerClient, ViddlerError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => reqwest::Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| ViddlerError::ClientInit(e.to_string()))?,
        };

        let builder = self.client_builder.unwrap_or_else(|| {
            reqwest::blocking::Client::builder()
                .use_rustls_tls()
                .user_agent(USER_AGENT)
        });
        let client = builder
            .build()
            .map_err(|e| ViddlerError::ClientInit(e.to_string()))?;

        let mut viddler = ViddlerClient {
            client,
            base_url,
            api_key: self.api_key,
            session_id: None,
        };
        if let Some(session_id) = self.session_id {
            viddler.set_session_id(session_id);
        }
        Ok(viddler)
    }
}

impl fmt::Debug for ViddlerClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViddlerClientBuilder")
            .field("base_url", &self.base_url.as_ref().map(reqwest::Url::as_str))
            .field("api_key", &"<redacted>")
            .field("session_id", &self.session_id.as_ref().map(|_| "<redacted>"))
            .field("client_builder", &self.client_builder)
            .finish()
    }
}
