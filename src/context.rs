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

//! Provider settings shared with every resource once `configure` ran.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::RwLock;

use crate::client::{CallOptions, Transport};
use crate::schema::Api;

#[derive(Debug)]
pub struct Configured {
    pub fortios: Option<Arc<dyn Transport>>,
    pub fortimanager: Option<Arc<dyn Transport>>,
    pub options: CallOptions,
    /// Read every table back, as on import.
    pub import_tables: bool,
}

impl Configured {
    pub fn transport(&self, api: Api) -> Result<&dyn Transport> {
        let transport = match api {
            Api::FortiOs => &self.fortios,
            Api::FortiManager => &self.fortimanager,
        };
        transport
            .as_deref()
            .ok_or_else(|| anyhow!("provider is not configured for {api}"))
    }
}

/// Handle given to resources before the provider is configured.
#[derive(Debug, Clone, Default)]
pub struct ProviderContext(Arc<RwLock<Option<Arc<Configured>>>>);

impl ProviderContext {
    pub async fn set(&self, configured: Configured) {
        *self.0.write().await = Some(Arc::new(configured));
    }

    pub async fn get(&self) -> Result<Arc<Configured>> {
        self.0
            .read()
            .await
            .clone()
            .ok_or_else(|| anyhow!("provider is not configured"))
    }
}
