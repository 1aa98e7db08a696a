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

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value as Json;

use super::{ApiResponse, CallOptions, Method, ResourcePath, Transport};
use crate::codec::WireObject;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Json>,
    pub retries: u32,
}

/// Transport replaying scripted responses and recording every request.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<ApiResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new(responses: impl IntoIterator<Item = ApiResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::default(),
        }
    }

    pub fn ok(body: Json) -> ApiResponse {
        ApiResponse::new(body, 200)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        path: &ResourcePath,
        body: Option<&WireObject>,
        options: CallOptions,
    ) -> Result<ApiResponse> {
        self.requests
            .lock()
            .map_err(|_| anyhow!("poisoned"))?
            .push(RecordedRequest {
                method,
                path: path.to_string(),
                body: body.cloned().map(Json::Object),
                retries: options.retries,
            });
        self.responses
            .lock()
            .map_err(|_| anyhow!("poisoned"))?
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted response left for {method} {path}"))
    }
}
