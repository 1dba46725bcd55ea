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

//! Errors returned while logging in to Vault or reading secrets.

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for this crate.
///
/// Every error is terminal for the invocation that produced it. Nothing is
/// cached between calls, so applications that want to retry must invoke the
/// whole pipeline again.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// The request could not be sent, or the response could not be read.
    pub fn is_transport(&self) -> bool {
        matches!(self.0, ErrorKind::Transport(_))
    }

    /// Vault rejected the credentials or did not return a token.
    pub fn is_auth(&self) -> bool {
        matches!(self.0, ErrorKind::Auth(_))
    }

    /// The service answered with an unexpected HTTP status code.
    pub fn is_http(&self) -> bool {
        matches!(self.0, ErrorKind::Http { .. })
    }

    /// The response body was not valid JSON for the expected shape.
    pub fn is_decode(&self) -> bool {
        matches!(self.0, ErrorKind::Decode(_))
    }

    /// The secret data could not be serialized back to JSON.
    pub fn is_serialization(&self) -> bool {
        matches!(self.0, ErrorKind::Serialization(_))
    }

    /// The HTTP status code, if the error was caused by an unexpected status.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.0 {
            ErrorKind::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw response body, if the error was caused by an unexpected status.
    pub fn http_body(&self) -> Option<&str> {
        match &self.0 {
            ErrorKind::Http { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    pub(crate) fn transport<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Transport(source.into()))
    }

    pub(crate) fn auth<T: Into<String>>(message: T) -> Error {
        Error(ErrorKind::Auth(message.into()))
    }

    pub(crate) fn http<T: Into<String>>(status: u16, body: T) -> Error {
        Error(ErrorKind::Http {
            status,
            body: body.into(),
        })
    }

    pub(crate) fn decode<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Decode(source.into()))
    }

    pub(crate) fn serialization<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Serialization(source.into()))
    }

    /// A short, stable name for the error kind. Used in log events.
    pub(crate) fn kind_name(&self) -> &'static str {
        match self.0 {
            ErrorKind::Transport(_) => "transport",
            ErrorKind::Auth(_) => "auth",
            ErrorKind::Http { .. } => "http",
            ErrorKind::Decode(_) => "decode",
            ErrorKind::Serialization(_) => "serialization",
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("cannot send request or read response: {0}")]
    Transport(#[source] BoxError),
    #[error("{0}")]
    Auth(String),
    #[error("request failed, expected status: 2xx got: {status}, error message {body}")]
    Http { status: u16, body: String },
    #[error("cannot decode response: {0}")]
    Decode(#[source] BoxError),
    #[error("cannot serialize secret data: {0}")]
    Serialization(#[source] BoxError),
}
