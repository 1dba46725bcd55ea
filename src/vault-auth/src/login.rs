// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Exchange identity tokens for Vault tokens using the [gcp auth method].
//!
//! [gcp auth method]: https://developer.hashicorp.com/vault/docs/auth/gcp

use crate::Result;
use crate::errors::Error;
use crate::http;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

pub(crate) const LOGIN_PATH: &str = "/v1/auth/gcp/login";

pub(crate) const NO_TOKEN_MESSAGE: &str = "unable to retrieve vault token";

#[derive(Serialize, Debug)]
struct LoginRequest<'a> {
    role: &'a str,
    jwt: &'a str,
}

/// The result of a login request.
///
/// Vault reports failures in `errors`. When that list is not empty the token
/// in `auth` must not be used, whatever its value.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Login {
    /// Error messages returned by Vault.
    #[serde_as(as = "DefaultOnNull")]
    pub errors: Vec<String>,
    /// The issued token and its properties.
    #[serde_as(as = "DefaultOnNull")]
    pub auth: Auth,
}

/// The `auth` block of a login response.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Auth {
    /// The Vault token. Send it in the `X-Vault-Token` header.
    #[serde_as(as = "DefaultOnNull")]
    pub client_token: String,
    /// The token accessor. It can look up or revoke the token without
    /// knowing its value.
    #[serde_as(as = "DefaultOnNull")]
    pub accessor: String,
    /// All the policies attached to the token.
    #[serde_as(as = "DefaultOnNull")]
    pub policies: Vec<String>,
    /// The policies attached through the token itself, excluding identity
    /// policies.
    #[serde_as(as = "DefaultOnNull")]
    pub token_policies: Vec<String>,
    /// Token lifetime, in seconds.
    #[serde_as(as = "DefaultOnNull")]
    pub lease_duration: u64,
    /// Whether the token lease can be renewed.
    #[serde_as(as = "DefaultOnNull")]
    pub renewable: bool,
}

/// Logs in to Vault at `vault_addr` with the identity token `jwt`.
///
/// The checks run in a fixed order: errors reported by Vault, then a missing
/// token, and only then the HTTP status code. A response with an unexpected
/// status but a usable token fails on the status check.
pub(crate) async fn login(
    client: &reqwest::Client,
    vault_addr: &str,
    jwt: &str,
    role: &str,
) -> Result<Login> {
    let request = client
        .post(format!("{vault_addr}{LOGIN_PATH}"))
        .json(&LoginRequest { role, jwt });

    let response = http::execute(request).await?;
    tracing::debug!(
        path = LOGIN_PATH,
        status = response.status.as_u16(),
        "vault login response"
    );

    // Non-whitespace bytes after the JSON document are a decode error.
    let login = serde_json::from_slice::<Login>(&response.body).map_err(Error::decode)?;
    if let Some(message) = login.errors.first() {
        return Err(Error::auth(message.as_str()));
    }
    if login.auth.client_token.is_empty() {
        return Err(Error::auth(NO_TOKEN_MESSAGE));
    }
    if !response.is_accepted() {
        return Err(response.to_http_error());
    }
    Ok(login)
}

/// Like [login], returning only the Vault token.
pub(crate) async fn access_token(
    client: &reqwest::Client,
    vault_addr: &str,
    jwt: &str,
    role: &str,
) -> Result<String> {
    let login = login(client, vault_addr, jwt, role).await?;
    Ok(login.auth.client_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use serde_json::json;
    use test_case::test_case;

    type TestResult = anyhow::Result<()>;

    fn vault_addr(server: &Server) -> String {
        format!("http://{}", server.addr())
    }

    fn expect_login(server: &Server, status: u16, body: &str) {
        server.expect(
            Expectation::matching(request::method_path("POST", LOGIN_PATH))
                .respond_with(status_code(status).body(body.to_string())),
        );
    }

    #[tokio::test]
    async fn access_token_success() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", LOGIN_PATH),
                request::headers(contains(("content-type", "application/json"))),
                request::body(json_decoded(eq(json!({
                    "role": "my-role",
                    "jwt": "test-id-token",
                })))),
            ])
            .respond_with(json_encoded(json!({
                "auth": {"client_token": "abc"}
            }))),
        );

        let client = reqwest::Client::new();
        let token =
            access_token(&client, &vault_addr(&server), "test-id-token", "my-role").await?;
        assert_eq!(token, "abc");
        Ok(())
    }

    #[tokio::test]
    async fn login_full_response() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", LOGIN_PATH)).respond_with(
                json_encoded(json!({
                    "request_id": "4f5c2d32",
                    "errors": null,
                    "auth": {
                        "client_token": "abc",
                        "accessor": "acc-123",
                        "policies": ["default", "reader"],
                        "token_policies": ["default", "reader"],
                        "metadata": {"role": "my-role"},
                        "lease_duration": 2764800,
                        "renewable": true
                    }
                })),
            ),
        );

        let client = reqwest::Client::new();
        let login = login(&client, &vault_addr(&server), "test-id-token", "my-role").await?;
        assert!(login.errors.is_empty(), "{login:?}");
        assert_eq!(login.auth.client_token, "abc");
        assert_eq!(login.auth.accessor, "acc-123");
        assert_eq!(login.auth.policies, vec!["default", "reader"]);
        assert_eq!(login.auth.token_policies, vec!["default", "reader"]);
        assert_eq!(login.auth.lease_duration, 2764800);
        assert!(login.auth.renewable);
        Ok(())
    }

    #[test_case(200; "ok")]
    #[test_case(400; "bad request")]
    #[test_case(403; "forbidden")]
    #[tokio::test]
    async fn errors_take_precedence(status: u16) {
        let server = Server::run();
        expect_login(
            &server,
            status,
            r#"{"errors":["permission denied", "second"],"auth":{"client_token":"abc"}}"#,
        );

        let client = reqwest::Client::new();
        let err = access_token(&client, &vault_addr(&server), "test-id-token", "my-role")
            .await
            .unwrap_err();
        assert!(err.is_auth(), "{err:?}");
        assert_eq!(err.to_string(), "permission denied");
    }

    #[test_case(r#"{"auth":{"client_token":""}}"#; "empty token")]
    #[test_case(r#"{"auth":null}"#; "null auth")]
    #[test_case(r#"{}"#; "empty object")]
    #[test_case(r#"{"errors":[],"auth":{"client_token":null}}"#; "null token")]
    #[tokio::test]
    async fn missing_token(body: &str) {
        let server = Server::run();
        expect_login(&server, 200, body);

        let client = reqwest::Client::new();
        let err = access_token(&client, &vault_addr(&server), "test-id-token", "my-role")
            .await
            .unwrap_err();
        assert!(err.is_auth(), "{err:?}");
        assert_eq!(err.to_string(), NO_TOKEN_MESSAGE);
    }

    #[tokio::test]
    async fn missing_token_before_status() {
        let server = Server::run();
        expect_login(&server, 500, r#"{"auth":{"client_token":""}}"#);

        let client = reqwest::Client::new();
        let err = access_token(&client, &vault_addr(&server), "test-id-token", "my-role")
            .await
            .unwrap_err();
        assert!(err.is_auth(), "{err:?}");
    }

    #[test_case(203)]
    #[test_case(301)]
    #[test_case(500)]
    #[tokio::test]
    async fn status_checked_last(status: u16) {
        let body = r#"{"auth":{"client_token":"abc"}}"#;
        let server = Server::run();
        expect_login(&server, status, body);

        let client = reqwest::Client::new();
        let err = access_token(&client, &vault_addr(&server), "test-id-token", "my-role")
            .await
            .unwrap_err();
        assert!(err.is_http(), "{err:?}");
        assert_eq!(err.http_status_code(), Some(status));
        assert_eq!(err.http_body(), Some(body));
        assert!(err.to_string().contains(&status.to_string()), "{err}");
        assert!(err.to_string().contains(body), "{err}");
    }

    #[test_case(201)]
    #[test_case(202)]
    #[tokio::test]
    async fn accepted_statuses(status: u16) -> TestResult {
        let server = Server::run();
        expect_login(&server, status, r#"{"auth":{"client_token":"abc"}}"#);

        let client = reqwest::Client::new();
        let token =
            access_token(&client, &vault_addr(&server), "test-id-token", "my-role").await?;
        assert_eq!(token, "abc");
        Ok(())
    }

    #[test_case(200, "not json")]
    #[test_case(502, "<html>Bad Gateway</html>")]
    #[test_case(204, "")]
    #[test_case(200, r#"{"auth":{"client_token":"abc"}} trailing"#)]
    #[tokio::test]
    async fn decode_error(status: u16, body: &str) {
        let server = Server::run();
        expect_login(&server, status, body);

        let client = reqwest::Client::new();
        let err = access_token(&client, &vault_addr(&server), "test-id-token", "my-role")
            .await
            .unwrap_err();
        assert!(err.is_decode(), "{err:?}");
    }

    #[tokio::test]
    async fn request_body_is_escaped() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", LOGIN_PATH),
                request::body(json_decoded(eq(json!({
                    "role": r#"my"role"#,
                    "jwt": r"a\b",
                })))),
            ])
            .respond_with(json_encoded(json!({
                "auth": {"client_token": "abc"}
            }))),
        );

        let client = reqwest::Client::new();
        let token = access_token(&client, &vault_addr(&server), r"a\b", r#"my"role"#).await?;
        assert_eq!(token, "abc");
        Ok(())
    }

    #[tokio::test]
    async fn transport_error() {
        let server = Server::run();
        let addr = vault_addr(&server);
        drop(server);

        let client = reqwest::Client::new();
        let err = access_token(&client, &addr, "test-id-token", "my-role")
            .await
            .unwrap_err();
        assert!(err.is_transport(), "{err:?}");
    }
}
