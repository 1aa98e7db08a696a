// This file is part of the terraform-provider-fortios project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Transports to the configuration APIs.
//!
//! Transports only move objects: every status they get back is handed over
//! in an [`ApiResponse`] and interpreted by the controller.

use std::fmt::Display;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value as Json;
use tracing::{debug, warn};

use crate::codec::WireObject;
use crate::error::Error;

pub mod jsonrpc;
#[cfg(test)]
pub mod mock;
pub mod rest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// Object collection of an API, optionally narrowed to one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    pub base: String,
    pub mkey: Option<String>,
}

impl ResourcePath {
    pub fn collection(base: &str) -> Self {
        Self {
            base: base.to_owned(),
            mkey: None,
        }
    }

    pub fn object(base: &str, mkey: &str) -> Self {
        Self {
            base: base.to_owned(),
            mkey: Some(mkey.to_owned()),
        }
    }
}

impl Display for ResourcePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.mkey {
            Some(mkey) => write!(f, "{}/{mkey}", self.base),
            None => f.write_str(&self.base),
        }
    }
}

/// Settings of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    /// Extra attempts after a connection failure.
    pub retries: u32,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self { retries: 1 }
    }
}

/// Decoded body of a response, in the FortiOS REST shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub body: Json,
    pub http_status: u16,
}

impl ApiResponse {
    pub fn new(body: Json, http_status: u16) -> Self {
        Self { body, http_status }
    }

    /// Status reported in the body, falling back to the HTTP one.
    pub fn status(&self) -> u16 {
        self.body
            .get("http_status")
            .and_then(Json::as_u64)
            .and_then(|status| u16::try_from(status).ok())
            .unwrap_or(self.http_status)
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status == 404 || self.status() == 404
    }

    pub fn api_error(&self) -> Option<Error> {
        let status = self.status();
        let failed = status >= 400
            || self.body.get("status").and_then(Json::as_str) == Some("error");
        if !failed {
            return None;
        }

        let message = match (
            self.body.get("cli_error").and_then(Json::as_str),
            self.body.get("error").and_then(Json::as_i64),
        ) {
            (Some(cli_error), _) if !cli_error.trim().is_empty() => cli_error.trim().to_owned(),
            (_, Some(code)) => match error_message(code) {
                Some(message) => format!("{message} (error code {code})"),
                None => format!("error code {code}"),
            },
            _ => String::from("request rejected"),
        };
        Some(Error::Api { status, message })
    }

    /// The returned object. List answers hold it as their first element.
    pub fn results(&self) -> Option<&WireObject> {
        match self.body.get("results")? {
            Json::Object(object) => Some(object),
            Json::Array(items) => items.first().and_then(Json::as_object),
            _ => None,
        }
    }

    /// Identity echoed by the appliance after a mutation.
    pub fn mkey(&self) -> Option<String> {
        match self.body.get("mkey")? {
            Json::String(mkey) if !mkey.is_empty() => Some(mkey.clone()),
            Json::Number(mkey) => Some(mkey.to_string()),
            _ => None,
        }
    }
}

/// Known FortiOS CMDB error codes.
fn error_message(code: i64) -> Option<&'static str> {
    Some(match code {
        -1 => "Invalid length of value",
        -2 => "Index out of range",
        -3 => "Entry not found",
        -4 => "Maximum number of entries has been reached",
        -5 => "A duplicate entry already exists",
        -6 => "Failed memory allocation",
        -7 => "Value conflicts with system settings",
        -8 => "Invalid IP Address",
        -9 => "Invalid IPv6 Address",
        -10 => "Invalid IP address range",
        -15 => "Invalid value",
        -23 => "Entry is used by other objects",
        -37 => "Permission denied",
        -651 => "Invalid input",
        _ => return None,
    })
}

#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send one request. Errors are reserved to requests that produced no
    /// response at all.
    async fn request(
        &self,
        method: Method,
        path: &ResourcePath,
        body: Option<&WireObject>,
        options: CallOptions,
    ) -> Result<ApiResponse>;
}

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Send a request built by `build`, attempting again after connection
/// failures, and decode the JSON body of the response.
pub(crate) async fn send_json(
    build: impl Fn() -> reqwest::RequestBuilder,
    what: &(dyn Display + Sync),
    options: CallOptions,
) -> Result<(u16, Json)> {
    let mut attempt = 0;
    let response = loop {
        debug!(%what, attempt, retries = options.retries, "sending request");
        match build().send().await {
            Ok(response) => break response,
            Err(err) if attempt < options.retries && (err.is_connect() || err.is_timeout()) => {
                attempt += 1;
                warn!(%what, attempt, "request failed, retrying: {err}");
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(err) => return Err(Error::Transport(format!("{what}: {err}")).into()),
        }
    };

    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|err| Error::Transport(format!("{what}: cannot get response body: {err}")))?;
    debug!(%what, status, "received response");

    if text.trim().is_empty() {
        return Ok((status, Json::Null));
    }
    match serde_json::from_str(&text) {
        Ok(body) => Ok((status, body)),
        // Error pages are not always JSON
        Err(_) if status >= 400 => Ok((status, Json::Null)),
        Err(err) => Err(Error::decode("response", err.to_string()).into()),
    }
}
