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
use bytes::Bytes;
use http::StatusCode;

/// A fully buffered HTTP response.
///
/// The body is read to the end before any decoding happens, which releases
/// the connection on every exit path.
#[derive(Debug)]
pub(crate) struct Response {
    pub(crate) status: StatusCode,
    pub(crate) body: Bytes,
}

impl Response {
    /// Vault answers successful requests with 200, 201 or 202.
    pub(crate) fn is_accepted(&self) -> bool {
        (200..=202).contains(&self.status.as_u16())
    }

    pub(crate) fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The error for a response rejected because of its status code.
    pub(crate) fn to_http_error(&self) -> Error {
        Error::http(self.status.as_u16(), self.body_text())
    }
}

/// Sends the request and reads the full response body.
///
/// Any status code is returned as-is, callers decide when to check it.
pub(crate) async fn execute(builder: reqwest::RequestBuilder) -> Result<Response> {
    let response = builder.send().await.map_err(Error::transport)?;
    let status = response.status();
    let body = response.bytes().await.map_err(Error::transport)?;
    Ok(Response { status, body })
}
