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

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value as Json};

use super::{send_json, ApiResponse, CallOptions, Method, ResourcePath, Transport};
use crate::codec::WireObject;

/// Status code of the FortiManager API for a missing object.
const OBJECT_NOT_FOUND: i64 = -3;

/// FortiManager JSON-RPC API.
#[derive(Clone)]
pub struct JsonRpcTransport {
    client: reqwest::Client,
    hostname: String,
    token: String,
}

impl std::fmt::Debug for JsonRpcTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcTransport")
            .field("hostname", &self.hostname)
            .finish_non_exhaustive()
    }
}

impl JsonRpcTransport {
    pub fn new(hostname: &str, token: &str, insecure: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()
            .context("cannot build the FortiManager HTTP client")?;
        Ok(Self {
            client,
            hostname: hostname.to_owned(),
            token: token.to_owned(),
        })
    }
}

/// JSON-RPC call equivalent to a REST request.
pub fn envelope(method: Method, path: &ResourcePath, body: Option<&WireObject>) -> Json {
    let verb = match method {
        Method::Get => "get",
        Method::Post => "add",
        Method::Put => "update",
        Method::Delete => "delete",
    };
    let mut params = json!({ "url": path.to_string() });
    if let (Some(body), Json::Object(params)) = (body, &mut params) {
        params.insert("data".to_owned(), Json::Object(body.clone()));
    }
    json!({
        "id": 1,
        "method": verb,
        "params": [params],
    })
}

/// Rewrite a JSON-RPC answer in the REST shape the controller understands.
pub fn normalize(answer: &Json, http_status: u16) -> ApiResponse {
    let result = match answer.get("result") {
        Some(Json::Array(results)) => results.first(),
        other => other,
    };
    let Some(result) = result else {
        return ApiResponse::new(
            json!({
                "status": "error",
                "http_status": http_status.max(500),
                "cli_error": "response carries no result",
            }),
            http_status,
        );
    };

    let status = result.get("status");
    let code = status
        .and_then(|status| status.get("code"))
        .and_then(Json::as_i64)
        .unwrap_or(0);
    let message = status
        .and_then(|status| status.get("message"))
        .and_then(Json::as_str)
        .unwrap_or_default();

    let body = match code {
        0 => json!({
            "status": "success",
            "http_status": 200,
            "results": result.get("data").cloned().unwrap_or(Json::Null),
        }),
        OBJECT_NOT_FOUND => json!({
            "status": "error",
            "http_status": 404,
            "cli_error": message,
        }),
        code => json!({
            "status": "error",
            "http_status": if http_status >= 400 { http_status } else { 500 },
            "cli_error": format!("{message} (status code {code})"),
        }),
    };
    ApiResponse::new(body, http_status)
}

#[async_trait]
impl Transport for JsonRpcTransport {
    async fn request(
        &self,
        method: Method,
        path: &ResourcePath,
        body: Option<&WireObject>,
        options: CallOptions,
    ) -> Result<ApiResponse> {
        let url = format!("https://{}/jsonrpc", self.hostname);
        let call = envelope(method, path, body);
        let what = format!("{method} {path} via {url}");

        let (status, answer) = send_json(
            || self.client.post(&url).bearer_auth(&self.token).json(&call),
            &what,
            options,
        )
        .await?;
        Ok(normalize(&answer, status))
    }
}
