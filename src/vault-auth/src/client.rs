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

use crate::Result;
use crate::login::{self, Login};
use crate::{mds, secret};
use tracing::Instrument;

/// Logs in to Vault with the workload identity of the current environment.
///
/// Every call starts from scratch: it fetches a new identity token from the
/// metadata service and exchanges it for a new Vault token. Nothing is cached,
/// and the requests are issued one at a time.
///
/// The client is cheap to clone and safe to share between tasks.
///
/// # Example
/// ```no_run
/// # use google_cloud_vault_auth::Client;
/// # tokio_test::block_on(async {
/// let client = Client::builder("https://vault.example.com:8200").build();
/// let secret = client.secret("secret/data/my-app", "my-role").await?;
/// println!("{secret}");
/// # Ok::<(), anyhow::Error>(())
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    vault_addr: String,
    inner: reqwest::Client,
    metadata: mds::Client,
}

/// Configures a [Client].
#[derive(Debug)]
pub struct Builder {
    vault_addr: String,
    metadata_endpoint: Option<String>,
    audience_host: String,
    inner: Option<reqwest::Client>,
}

impl Builder {
    /// Creates a new builder for the Vault server at `vault_addr`, e.g.
    /// `https://vault.example.com:8200`.
    pub fn new<S: Into<String>>(vault_addr: S) -> Self {
        Self {
            vault_addr: vault_addr.into(),
            metadata_endpoint: None,
            audience_host: mds::DEFAULT_AUDIENCE_HOST.to_string(),
            inner: None,
        }
    }

    /// Sets the root URL of the metadata service.
    ///
    /// If not set, the client uses `http://metadata.google.internal`. The
    /// `GCE_METADATA_HOST` environment variable takes precedence over both.
    pub fn with_metadata_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.metadata_endpoint = Some(endpoint.into());
        self
    }

    /// Sets the host used in the identity token audience.
    ///
    /// The audience is `http://<host>/<role>`. The default host is `vault`,
    /// which is what Vault's `gcp` auth method expects unless configured
    /// otherwise.
    pub fn with_audience_host<S: Into<String>>(mut self, host: S) -> Self {
        self.audience_host = host.into();
        self
    }

    /// Uses a preconfigured HTTP client, for example one with timeouts or a
    /// custom root certificate.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.inner = Some(client);
        self
    }

    /// Returns a [Client] with the configured settings.
    pub fn build(self) -> Client {
        let inner = self.inner.unwrap_or_default();
        let metadata = mds::Client::new(inner.clone(), self.metadata_endpoint, self.audience_host);
        Client {
            vault_addr: self.vault_addr.trim_end_matches('/').to_string(),
            inner,
            metadata,
        }
    }
}

impl Client {
    /// Returns a builder for a client talking to the Vault server at
    /// `vault_addr`.
    pub fn builder<S: Into<String>>(vault_addr: S) -> Builder {
        Builder::new(vault_addr)
    }

    /// Fetches an identity token whose audience names the Vault login `role`.
    pub async fn identity_token(&self, role: &str) -> Result<String> {
        self.metadata.identity_token(role).await
    }

    /// Logs in as `role` and returns the full login result.
    pub async fn login(&self, role: &str) -> Result<Login> {
        let span = tracing::info_span!("vault_access_token", role);
        async {
            let jwt = self.identity_token(role).await?;
            login::login(&self.inner, &self.vault_addr, &jwt, role).await
        }
        .instrument(span)
        .await
        .inspect_err(|e| tracing::debug!(error.kind = e.kind_name(), "cannot get vault token"))
    }

    /// Logs in as `role` and returns the Vault token.
    pub async fn access_token(&self, role: &str) -> Result<String> {
        self.fetch_access_token(role)
            .await
            .inspect_err(|e| tracing::debug!(error.kind = e.kind_name(), "cannot get vault token"))
    }

    /// Reads the secret at `path` using an existing Vault token.
    ///
    /// Returns the key/value data of the secret, serialized as JSON.
    pub async fn read_secret(&self, access_token: &str, path: &str) -> Result<String> {
        secret::read_secret(&self.inner, &self.vault_addr, access_token, path).await
    }

    /// Logs in as `role` and reads the secret at `path`.
    ///
    /// Returns the key/value data of the secret, serialized as JSON.
    pub async fn secret(&self, path: &str, role: &str) -> Result<String> {
        let span = tracing::info_span!("vault_secret", role, path);
        async {
            let token = self.fetch_access_token(role).await?;
            self.read_secret(&token, path).await
        }
        .instrument(span)
        .await
        .inspect_err(|e| tracing::debug!(error.kind = e.kind_name(), "cannot read vault secret"))
    }

    // Failures are logged by the public caller, once.
    async fn fetch_access_token(&self, role: &str) -> Result<String> {
        let span = tracing::info_span!("vault_access_token", role);
        async {
            let jwt = self.identity_token(role).await?;
            login::access_token(&self.inner, &self.vault_addr, &jwt, role).await
        }
        .instrument(span)
        .await
    }
}
