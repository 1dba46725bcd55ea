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
use crate::errors::Error;
use crate::http;
use serde::Deserialize;
use serde_json::{Map, Value};

pub(crate) const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

/// A KV v2 read response. Only `data.data` is of interest, the version
/// metadata next to it is ignored.
#[derive(Deserialize, Debug, Default)]
struct SecretEnvelope {
    #[serde(default)]
    data: Option<SecretPayload>,
}

#[derive(Deserialize, Debug, Default)]
struct SecretPayload {
    #[serde(default)]
    data: Option<Map<String, Value>>,
}

impl SecretEnvelope {
    fn into_data(self) -> Option<Map<String, Value>> {
        self.data.and_then(|p| p.data)
    }
}

/// Reads the secret at `path` and returns its key/value data as JSON.
///
/// The body is decoded before the status code is checked. A missing `data`
/// block serializes as `null`.
pub(crate) async fn read_secret(
    client: &reqwest::Client,
    vault_addr: &str,
    access_token: &str,
    path: &str,
) -> Result<String> {
    let request = client
        .get(format!("{vault_addr}/v1/{path}"))
        .header(VAULT_TOKEN_HEADER, access_token);

    let response = http::execute(request).await?;
    tracing::debug!(
        path,
        status = response.status.as_u16(),
        "vault secret response"
    );

    // Non-whitespace bytes after the JSON document are a decode error.
    let envelope =
        serde_json::from_slice::<SecretEnvelope>(&response.body).map_err(Error::decode)?;
    let data = serde_json::to_string(&envelope.into_data()).map_err(Error::serialization)?;
    if !response.is_accepted() {
        return Err(response.to_http_error());
    }
    Ok(data)
}
