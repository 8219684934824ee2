//! Viddler API Client Library
//!
//! This library provides a thin blocking client for the Viddler v2 HTTP/JSON API.
//! Every call is signed with the application's API key and, once authenticated,
//! with the user's session id.
//!
//! # Features
//!
//! - Generic `get`/`post` calls for any API method (`viddler.api.echo`, ...)
//! - Username/password authentication that caches the session id
//! - Dynamically shaped responses with field-path lookups and typed decoding
//! - API error payloads surfaced as typed errors that still carry the document
//! - Secure TLS using rustls (no OpenSSL dependencies)
//! - Well-typed errors using thiserror
//!
//! # Example
//!
//! ```no_run
//! use viddler_api::ViddlerClient;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = ViddlerClient::new("your_api_key")?;
//!
//! // Unauthenticated call
//! let echo = client.get("viddler.api.echo", [("message", "hello there")])?;
//! assert_eq!(echo.str_at(&["echo_response", "message"]), Some("hello there"));
//!
//! // Authenticate, then every later call carries the session id
//! if client.authenticate("username", "password") {
//!     let settings = client.post("viddler.users.setSettings", [("show_account", "1")])?;
//!     println!("{}", settings.as_value());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! API-level failures come back as [`ViddlerError::Api`], whose message is the
//! `error.description` reported by the server:
//!
//! ```no_run
//! use viddler_api::{ViddlerClient, ViddlerError};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ViddlerClient::new("your_api_key")?;
//! match client.get("viddler.api.echo", [("unexpected", "1")]) {
//!     Ok(document) => println!("{}", document.as_value()),
//!     Err(ViddlerError::Api(error)) => {
//!         println!("{} (code {}, details {})", error, error.code, error.details);
//!     }
//!     Err(other) => return Err(other.into()),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod params;
mod response;

pub use client::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, ViddlerClient, ViddlerClientBuilder,
};
pub use error::{ApiError, ViddlerError};
pub use response::Document;
