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

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Url;

use super::{send_json, ApiResponse, CallOptions, Method, ResourcePath, Transport};
use crate::codec::WireObject;

/// FortiOS CMDB REST API.
#[derive(Clone)]
pub struct RestTransport {
    client: reqwest::Client,
    hostname: String,
    token: String,
    vdom: Option<String>,
}

impl std::fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTransport")
            .field("hostname", &self.hostname)
            .field("vdom", &self.vdom)
            .finish_non_exhaustive()
    }
}

impl RestTransport {
    pub fn new(hostname: &str, token: &str, insecure: bool, vdom: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()
            .context("cannot build the FortiOS HTTP client")?;
        Ok(Self {
            client,
            hostname: hostname.to_owned(),
            token: token.to_owned(),
            vdom: vdom.filter(|vdom| !vdom.is_empty()).map(str::to_owned),
        })
    }

    pub fn url(&self, path: &ResourcePath) -> Result<Url> {
        let base = format!(
            "https://{}/api/v2/cmdb/{}",
            self.hostname,
            path.base.trim_matches('/')
        );
        let mut url = Url::parse(&base).with_context(|| format!("invalid API address {base}"))?;
        if let Some(mkey) = &path.mkey {
            url.path_segments_mut()
                .map_err(|()| anyhow!("invalid API address {base}"))?
                .push(mkey);
        }
        if let Some(vdom) = &self.vdom {
            url.query_pairs_mut().append_pair("vdom", vdom);
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for RestTransport {
    async fn request(
        &self,
        method: Method,
        path: &ResourcePath,
        body: Option<&WireObject>,
        options: CallOptions,
    ) -> Result<ApiResponse> {
        let url = self.url(path)?;
        let http_method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let what = format!("{method} {url}");

        let (status, body) = send_json(
            || {
                let request = self
                    .client
                    .request(http_method.clone(), url.clone())
                    .bearer_auth(&self.token);
                match body {
                    Some(body) => request.json(body),
                    None => request,
                }
            },
            &what,
            options,
        )
        .await?;
        Ok(ApiResponse::new(body, status))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::RestTransport;
    use crate::client::ResourcePath;

    #[test]
    fn urls_escape_the_mkey_and_carry_the_vdom() {
        let transport = RestTransport::new("192.168.1.99", "secret", true, Some("root"));
        let url = transport
            .and_then(|transport| transport.url(&ResourcePath::object("certificate/ca", "CA 1/x")))
            .map(|url| url.to_string())
            .ok();

        assert_eq!(
            url.as_deref(),
            Some("https://192.168.1.99/api/v2/cmdb/certificate/ca/CA%201%2Fx?vdom=root")
        );
    }

    #[test]
    fn collections_have_no_mkey_segment() {
        let url = RestTransport::new("fgt.local:8443", "secret", false, None)
            .and_then(|transport| transport.url(&ResourcePath::collection("/router/bfd")))
            .map(|url| url.to_string())
            .ok();

        assert_eq!(url.as_deref(), Some("https://fgt.local:8443/api/v2/cmdb/router/bfd"));
    }

    #[test]
    fn debug_output_hides_the_token() {
        let debug = RestTransport::new("fgt", "secret", false, None)
            .map(|transport| format!("{transport:?}"))
            .expect("transport should build");
        assert!(debug.contains("fgt"));
        assert!(!debug.contains("secret"));
    }
}
