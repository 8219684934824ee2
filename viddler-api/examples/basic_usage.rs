//! Basic usage example for the Viddler API client
//!
//! This example demonstrates how to:
//! - Create a client from the environment
//! - Create a client with a custom base URL and HTTP configuration
//! - Call an API method and read fields out of the response
//! - Authenticate and make a call with the session id attached
//!
//! Requires `VIDDLER_API_KEY`; set `VIDDLER_USERNAME` and `VIDDLER_PASSWORD`
//! to try authentication. Run with `RUST_LOG=viddler_api=debug` to see the
//! request log.

use std::time::Duration;
use tracing_subscriber::EnvFilter;
use viddler_api::{ViddlerClient, ViddlerError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Example 1: Client configured from the environment
    println!("=== Example 1: Client From Environment ===");
    let mut client = ViddlerClient::from_env()?;
    println!("✓ Client created for {}", client.base_url());

    // Example 2: Custom base URL and timeout
    println!("\n=== Example 2: Custom Configuration ===");
    let _custom_client = ViddlerClient::builder(client.api_key())
        .base_url("http://api.viddler.com")? // Could be a mock server URL for testing
        .client_builder(reqwest::blocking::Client::builder().timeout(Duration::from_secs(30)))
        .build()?;
    println!("✓ Client created with custom timeout (30s)");

    // Example 3: Unauthenticated echo call
    println!("\n=== Example 3: Echo ===");
    match client.get("viddler.api.echo", [("message", "hello there")]) {
        Ok(document) => {
            let message = document.str_at(&["echo_response", "message"]);
            println!("✓ Echoed: {}", message.unwrap_or("<missing>"));
        }
        Err(ViddlerError::Api(error)) => {
            println!("✗ API error {}: {} ({})", error.code, error, error.details);
        }
        Err(e) => return Err(e.into()),
    }

    // Example 4: Authentication
    println!("\n=== Example 4: Authentication ===");
    let (Ok(username), Ok(password)) = (
        std::env::var("VIDDLER_USERNAME"),
        std::env::var("VIDDLER_PASSWORD"),
    ) else {
        println!("ℹ VIDDLER_USERNAME / VIDDLER_PASSWORD not set, skipping");
        return Ok(());
    };

    if !client.authenticate(&username, &password) {
        println!("✗ Authentication failed");
        return Ok(());
    }
    println!("✓ Authenticated");

    let profile = client.get("viddler.users.getProfile", [("user", username.as_str())])?;
    println!(
        "✓ Profile for {}",
        profile.str_at(&["user", "username"]).unwrap_or(username.as_str())
    );

    Ok(())
}
