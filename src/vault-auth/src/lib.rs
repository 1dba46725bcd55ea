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

//! Log in to HashiCorp Vault with Google Cloud workload identity.
//!
//! Workloads running on Google Cloud (GCE, GKE, Cloud Run, ...) can obtain
//! an identity token for their service account from the [metadata service].
//! Vault's [gcp auth method] accepts such a token and returns a short-lived
//! Vault token, which in turn authorizes reads from the secret store.
//!
//! This crate chains the three requests involved:
//!
//! 1. fetch an identity token with audience `http://vault/<role>`;
//! 2. exchange it at `<vault>/v1/auth/gcp/login` for a Vault token;
//! 3. optionally, read a secret at `<vault>/v1/<path>`.
//!
//! Each call performs every step again. There is no caching and no retry,
//! applications that need either should build it on top of this crate.
//!
//! ## Example: read a secret
//!
//! ```no_run
//! # tokio_test::block_on(async {
//! let secret = google_cloud_vault_auth::get_secret(
//!     "https://vault.example.com:8200",
//!     "secret/data/my-app",
//!     "my-role",
//! )
//! .await?;
//! let secret: serde_json::Value = serde_json::from_str(&secret)?;
//! # Ok::<(), anyhow::Error>(())
//! # });
//! ```
//!
//! Use [Client] to change the metadata endpoint, the audience host, or the
//! HTTP client.
//!
//! [metadata service]: https://cloud.google.com/compute/docs/metadata/overview
//! [gcp auth method]: https://developer.hashicorp.com/vault/docs/auth/gcp

pub mod errors;

mod client;
pub use client::{Builder, Client};

pub(crate) mod http;

pub mod login;

pub(crate) mod mds;

pub(crate) mod secret;

/// A `Result` alias where the `Err` case is
/// `google_cloud_vault_auth::errors::Error`.
pub type Result<T> = std::result::Result<T, crate::errors::Error>;

/// Returns a Vault token for `role`, using the workload identity of the
/// current environment.
///
/// Failures from either request are returned unchanged.
pub async fn get_access_token(vault_addr: &str, role: &str) -> Result<String> {
    Client::builder(vault_addr).build().access_token(role).await
}

/// Logs in as `role` and returns the key/value data of the secret at `path`,
/// serialized as JSON.
///
/// If the login fails, the secret is not requested.
pub async fn get_secret(vault_addr: &str, path: &str, role: &str) -> Result<String> {
    Client::builder(vault_addr)
        .build()
        .secret(path, role)
        .await
}
