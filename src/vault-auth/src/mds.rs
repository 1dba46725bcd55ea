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

//! Fetch workload identity tokens from the [Metadata Service].
//!
//! Google Cloud environments such as GCE, GKE or Cloud Run run a metadata
//! service local to the VM (or pod). Among other things, it issues OIDC ID
//! tokens for the default service account. Vault's `gcp` auth method accepts
//! these tokens when their audience is `http://vault/<role>`.
//!
//! [Metadata Service]: https://cloud.google.com/compute/docs/metadata/overview

use crate::Result;
use crate::http;

pub(crate) const MDS_DEFAULT_URI: &str = "/computeMetadata/v1/instance/service-accounts/default";
pub(crate) const METADATA_FLAVOR_VALUE: &str = "Google";
pub(crate) const METADATA_FLAVOR: &str = "metadata-flavor";
pub(crate) const METADATA_ROOT: &str = "http://metadata.google.internal";
pub(crate) const GCE_METADATA_HOST_ENV_VAR: &str = "GCE_METADATA_HOST";

/// The host name Vault expects in the audience of `gcp` login tokens.
pub(crate) const DEFAULT_AUDIENCE_HOST: &str = "vault";

/// Include project and instance details in the token payload.
const FORMAT_FULL: &str = "full";

/// A client for the identity endpoint of the metadata service.
#[derive(Clone, Debug)]
pub(crate) struct Client {
    endpoint: String,
    audience_host: String,
    inner: reqwest::Client,
}

impl Client {
    pub(crate) fn new(
        inner: reqwest::Client,
        endpoint_override: Option<String>,
        audience_host: String,
    ) -> Self {
        let endpoint = resolve_endpoint(endpoint_override)
            .trim_end_matches('/')
            .to_string();
        Self {
            endpoint,
            audience_host,
            inner,
        }
    }

    #[cfg(test)]
    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The audience requested for `role`.
    pub(crate) fn audience(&self, role: &str) -> String {
        format!("http://{}/{role}", self.audience_host)
    }

    /// Fetches an identity token for the default service account, scoped to
    /// the Vault login `role`.
    ///
    /// The body is returned as-is, the token is opaque to this crate.
    pub(crate) async fn identity_token(&self, role: &str) -> Result<String> {
        let path = format!("{MDS_DEFAULT_URI}/identity");
        let audience = self.audience(role);
        let request = self
            .inner
            .get(format!("{}{path}", self.endpoint))
            .header(METADATA_FLAVOR, METADATA_FLAVOR_VALUE)
            .query(&[("audience", audience.as_str()), ("format", FORMAT_FULL)]);

        let response = http::execute(request).await?;
        tracing::debug!(
            path = %path,
            status = response.status.as_u16(),
            "metadata identity response"
        );
        if response.status != reqwest::StatusCode::OK {
            return Err(response.to_http_error());
        }
        Ok(response.body_text())
    }
}

/// Determine the metadata root.
///
/// `GCE_METADATA_HOST` wins over an explicit override, which wins over the
/// default root.
fn resolve_endpoint(endpoint_override: Option<String>) -> String {
    if let Ok(host) = std::env::var(GCE_METADATA_HOST_ENV_VAR) {
        format!("http://{host}")
    } else if let Some(e) = endpoint_override {
        e
    } else {
        METADATA_ROOT.to_string()
    }
}
