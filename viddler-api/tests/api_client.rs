//! End-to-end behaviour of the public client API against a mock server

use mockito::Matcher;
use std::collections::HashMap;
use viddler_api::{ViddlerClient, ViddlerError};

const API_KEY: &str = "my-api-key";

fn setup() -> (mockito::ServerGuard, ViddlerClient) {
    let server = mockito::Server::new();
    let client = ViddlerClient::builder(API_KEY)
        .base_url(server.url())
        .unwrap()
        .build()
        .unwrap();
    (server, client)
}

fn endpoint_path(method: &str) -> Matcher {
    Matcher::Regex(format!(
        r"^/api/v2/{}\.json(\?|$)",
        method.replace('.', r"\.")
    ))
}

#[test]
fn get_echoes_message() {
    let (mut server, client) = setup();
    let mock = server
        .mock("GET", endpoint_path("viddler.api.echo"))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), API_KEY.into()),
            Matcher::UrlEncoded("message".into(), "hello there".into()),
        ]))
        .with_body(r#"{"echo_response":{"message":"hello there"}}"#)
        .expect(1)
        .create();

    let params = HashMap::from([("message", "hello there")]);
    let document = client.get("viddler.api.echo", params).unwrap();

    assert_eq!(
        document.str_at(&["echo_response", "message"]),
        Some("hello there")
    );
    mock.assert();
}

#[test]
fn get_includes_session_id_if_set() {
    let (mut server, mut client) = setup();
    let mock = server
        .mock("GET", endpoint_path("viddler.api.echo"))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("message".into(), "hello there".into()),
            Matcher::UrlEncoded("sessionid".into(), "a-session-id".into()),
        ]))
        .with_body(r#"{"echo_response":{"message":"hello there"}}"#)
        .expect(1)
        .create();

    client.set_session_id("a-session-id");
    let document = client
        .get("viddler.api.echo", [("message", "hello there")])
        .unwrap();

    assert_eq!(
        document.str_at(&["echo_response", "message"]),
        Some("hello there")
    );
    mock.assert();
}

#[test]
fn get_omits_session_id_when_unauthenticated() {
    let (mut server, client) = setup();
    let mock = server
        .mock("GET", endpoint_path("viddler.api.echo"))
        .match_query(Matcher::Exact("key=my-api-key&message=hi".into()))
        .with_body(r#"{"echo_response":{}}"#)
        .expect(1)
        .create();

    client.get("viddler.api.echo", [("message", "hi")]).unwrap();

    mock.assert();
}

#[test]
fn post_sends_form_with_session() {
    let (mut server, mut client) = setup();
    let mock = server
        .mock("POST", "/api/v2/viddler.users.setSettings.json")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), API_KEY.into()),
            Matcher::UrlEncoded("name".into(), "bob".into()),
            Matcher::UrlEncoded("sessionid".into(), "a-session-id".into()),
        ]))
        .with_body(r#"{"success":"true"}"#)
        .expect(1)
        .create();

    client.set_session_id("a-session-id");
    let document = client
        .post("viddler.users.setSettings", [("name", "bob")])
        .unwrap();

    assert_eq!(document.str_at(&["success"]), Some("true"));
    mock.assert();
}

#[test]
fn api_errors_surface_description() {
    let (mut server, client) = setup();
    let _mock = server
        .mock("GET", endpoint_path("viddler.api.echo"))
        .with_body(
            r#"{"error":{"code":"4","description":"missing required parameter","details":"message"}}"#,
        )
        .create();

    let err = client
        .get("viddler.api.echo", HashMap::<String, String>::new())
        .unwrap_err();

    assert_eq!(err.to_string(), "missing required parameter");
    let document = err.document().expect("document travels with the error");
    assert_eq!(document.str_at(&["error", "code"]), Some("4"));
    assert_eq!(document.str_at(&["error", "details"]), Some("message"));
}

#[test]
fn invalid_json_is_a_decode_error() {
    let (mut server, client) = setup();
    let _mock = server
        .mock("GET", endpoint_path("viddler.api.echo"))
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create();

    let err = client.get("viddler.api.echo", [("message", "hi")]).unwrap_err();
    assert!(matches!(err, ViddlerError::Decode { .. }), "got {err:?}");
    assert!(err.document().is_none());
}

#[test]
fn unreachable_host_is_a_transport_error() {
    let client = ViddlerClient::builder(API_KEY)
        .base_url("http://127.0.0.1:1")
        .unwrap()
        .build()
        .unwrap();

    let err = client.get("viddler.api.echo", [("message", "hi")]).unwrap_err();
    assert!(matches!(err, ViddlerError::Transport(_)), "got {err:?}");

    let err = client.post("viddler.api.echo", [("message", "hi")]).unwrap_err();
    assert!(matches!(err, ViddlerError::Transport(_)), "got {err:?}");
}

#[test]
fn authenticate_sets_session_id() {
    let (mut server, mut client) = setup();
    let mock = server
        .mock("GET", endpoint_path("viddler.users.auth"))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "auser".into()),
            Matcher::UrlEncoded("password".into(), "apassword".into()),
        ]))
        .with_body(r#"{"auth":{"sessionid":"thesessionid"}}"#)
        .expect(1)
        .create();

    assert!(client.authenticate("auser", "apassword"));
    assert_eq!(client.session_id(), Some("thesessionid"));
    mock.assert();
}

#[test]
fn session_is_sent_after_authentication() {
    let (mut server, mut client) = setup();
    let _auth = server
        .mock("GET", endpoint_path("viddler.users.auth"))
        .with_body(r#"{"auth":{"sessionid":"thesessionid"}}"#)
        .create();
    let profile = server
        .mock("GET", endpoint_path("viddler.users.getProfile"))
        .match_query(Matcher::UrlEncoded(
            "sessionid".into(),
            "thesessionid".into(),
        ))
        .with_body(r#"{"user":{"username":"auser"}}"#)
        .expect(1)
        .create();

    assert!(client.authenticate("auser", "apassword"));
    let document = client
        .get("viddler.users.getProfile", [("user", "auser")])
        .unwrap();

    assert_eq!(document.str_at(&["user", "username"]), Some("auser"));
    profile.assert();
}

#[test]
fn failed_authentication_clears_stale_session() {
    let (mut server, mut client) = setup();
    let _mock = server
        .mock("GET", endpoint_path("viddler.users.auth"))
        .with_body(r#"{"error":{"code":"101","description":"invalid login","details":""}}"#)
        .create();

    client.set_session_id("stale-session");
    assert!(!client.authenticate("auser", "wrong"));
    assert_eq!(client.session_id(), None);
    assert!(!client.is_authenticated());
}

#[test]
fn authentication_without_session_id_fails() {
    let (mut server, mut client) = setup();
    let _mock = server
        .mock("GET", endpoint_path("viddler.users.auth"))
        .with_body(r#"{"auth":{}}"#)
        .create();

    assert!(!client.authenticate("auser", "apassword"));
    assert_eq!(client.session_id(), None);
}

#[test]
fn authentication_transport_failure_returns_false() {
    let mut client = ViddlerClient::builder(API_KEY)
        .base_url("http://127.0.0.1:1")
        .unwrap()
        .session_id("stale-session")
        .build()
        .unwrap();

    assert!(!client.authenticate("auser", "apassword"));
    assert_eq!(client.session_id(), None);
}

#[test]
fn caller_key_overrides_api_key() {
    let (mut server, client) = setup();
    let mock = server
        .mock("GET", endpoint_path("viddler.api.getInfo"))
        .match_query(Matcher::Exact("key=other-key".into()))
        .with_body(r#"{"viddler_api":{"version":"2"}}"#)
        .expect(1)
        .create();

    let document = client
        .get("viddler.api.getInfo", [("key", "other-key")])
        .unwrap();

    assert_eq!(document.str_at(&["viddler_api", "version"]), Some("2"));
    mock.assert();
}

#[test]
fn repeated_calls_hit_the_server_each_time() {
    let (mut server, client) = setup();
    let mock = server
        .mock("GET", endpoint_path("viddler.api.echo"))
        .with_body(r#"{"echo_response":{"message":"again"}}"#)
        .expect(2)
        .create();

    let first = client.get("viddler.api.echo", [("message", "again")]).unwrap();
    let second = client.get("viddler.api.echo", [("message", "again")]).unwrap();

    assert_eq!(first, second);
    mock.assert();
}
