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

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::{Value, ValueBool, ValueEmpty, ValueNumber, ValueString};
use tf_provider::{map, AttributePath, Diagnostics, DynamicDataSource, DynamicResource, Provider};
use tracing::info;

use crate::client::jsonrpc::JsonRpcTransport;
use crate::client::rest::RestTransport;
use crate::client::{CallOptions, Transport};
use crate::context::{Configured, ProviderContext};
use crate::utils::{WithNormalize, WithSchema, WithValidate};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    pub hostname: ValueString<'a>,
    pub token: ValueString<'a>,
    pub insecure: ValueBool,
    pub vdom: ValueString<'a>,
    pub fmg_hostname: ValueString<'a>,
    pub fmg_token: ValueString<'a>,
    pub retries: ValueNumber,
    pub import_tables: ValueBool,
}

fn attribute(attr_type: AttributeType, description: &str, sensitive: bool) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint: AttributeConstraint::Optional,
        sensitive,
        ..Default::default()
    }
}

impl WithSchema for ProviderConfig<'_> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                description: Description::plain("Manage FortiOS and FortiManager configuration objects"),
                attributes: map! {
                    "hostname" => attribute(AttributeType::String, "Address of the FortiGate (env FORTIOS_ACCESS_HOSTNAME)", false),
                    "token" => attribute(AttributeType::String, "REST API token of the FortiGate (env FORTIOS_ACCESS_TOKEN)", true),
                    "insecure" => attribute(AttributeType::Bool, "Skip the verification of TLS certificates (env FORTIOS_INSECURE)", false),
                    "vdom" => attribute(AttributeType::String, "Virtual domain of every FortiOS request (env FORTIOS_VDOM)", false),
                    "fmg_hostname" => attribute(AttributeType::String, "Address of the FortiManager (env FORTIOS_FMG_HOSTNAME)", false),
                    "fmg_token" => attribute(AttributeType::String, "API key of the FortiManager (env FORTIOS_FMG_TOKEN)", true),
                    "retries" => attribute(AttributeType::Number, "Attempts after a connection failure, per request (default 1)", false),
                    "import_tables" => attribute(AttributeType::Bool, "Read back every table, even the ones absent from the configuration (env FORTIOS_IMPORT_TABLE)", false),
                },
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl WithValidate for ProviderConfig<'_> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Value::Value(retries) = self.retries {
            if retries < 0 {
                diags.error(
                    "Invalid retry count",
                    format!("`retries` must be positive or zero, got {retries}"),
                    attr_path.clone().attribute("retries"),
                );
            }
        }
        for (name, hostname) in [("hostname", &self.hostname), ("fmg_hostname", &self.fmg_hostname)] {
            if hostname.as_deref_option().is_some_and(|h| h.contains("://")) {
                diags.error(
                    "Invalid host name",
                    format!("`{name}` must be a host name or address, without scheme"),
                    attr_path.clone().attribute(name),
                );
            }
        }
    }
}

fn string_from_env(value: &mut ValueString<'_>, var: &str) {
    if value.is_null() {
        if let Ok(env) = std::env::var(var) {
            if !env.is_empty() {
                *value = Value::Value(Cow::Owned(env));
            }
        }
    }
}

fn bool_from_env(value: &mut ValueBool, var: &'static str, diags: &mut Diagnostics) {
    if value.is_null() {
        if let Ok(env) = std::env::var(var) {
            match env.as_str() {
                "true" | "1" => *value = Value::Value(true),
                "false" | "0" | "" => *value = Value::Value(false),
                _ => diags.root_warning(
                    format!("Ignoring {var}"),
                    format!("{env:?} is not a boolean"),
                ),
            }
        }
    }
}

impl WithNormalize for ProviderConfig<'_> {
    fn normalize(&mut self, diags: &mut Diagnostics) {
        string_from_env(&mut self.hostname, "FORTIOS_ACCESS_HOSTNAME");
        string_from_env(&mut self.token, "FORTIOS_ACCESS_TOKEN");
        string_from_env(&mut self.vdom, "FORTIOS_VDOM");
        string_from_env(&mut self.fmg_hostname, "FORTIOS_FMG_HOSTNAME");
        string_from_env(&mut self.fmg_token, "FORTIOS_FMG_TOKEN");
        bool_from_env(&mut self.insecure, "FORTIOS_INSECURE", diags);
        bool_from_env(&mut self.import_tables, "FORTIOS_IMPORT_TABLE", diags);
        if self.retries.is_null() {
            self.retries = Value::Value(CallOptions::default().retries.into());
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct FortiosProvider {
    context: ProviderContext,
}

#[async_trait]
impl Provider for FortiosProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ProviderConfig::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        config.validate(diags, AttributePath::root()).await;

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let mut config = config;
        config.normalize(diags);

        let retries = match u32::try_from(config.retries.unwrap_or_default()) {
            Ok(retries) => retries,
            Err(_) => {
                diags.root_error_short("`retries` must be positive or zero");
                return None;
            }
        };
        let insecure = config.insecure.unwrap_or(false);

        let fortios = match config.hostname.as_deref_option() {
            Some(hostname) => match RestTransport::new(
                hostname,
                config.token.as_deref_option().unwrap_or_default(),
                insecure,
                config.vdom.as_deref_option(),
            ) {
                Ok(transport) => Some(Arc::new(transport) as Arc<dyn Transport>),
                Err(err) => {
                    diags.root_error("Cannot configure the FortiOS client", format!("{err:#}"));
                    return None;
                }
            },
            None => None,
        };
        let fortimanager = match config.fmg_hostname.as_deref_option() {
            Some(hostname) => match JsonRpcTransport::new(
                hostname,
                config.fmg_token.as_deref_option().unwrap_or_default(),
                insecure,
            ) {
                Ok(transport) => Some(Arc::new(transport) as Arc<dyn Transport>),
                Err(err) => {
                    diags.root_error("Cannot configure the FortiManager client", format!("{err:#}"));
                    return None;
                }
            },
            None => None,
        };
        if fortios.is_none() && fortimanager.is_none() {
            diags.root_warning(
                "No appliance configured",
                "Neither `hostname` nor `fmg_hostname` is set: every resource operation will fail.",
            );
        }

        info!(
            %terraform_version,
            fortios = fortios.is_some(),
            fortimanager = fortimanager.is_some(),
            retries,
            "provider configured"
        );
        self.context
            .set(Configured {
                fortios,
                fortimanager,
                options: CallOptions { retries },
                import_tables: config.import_tables.unwrap_or(false),
            })
            .await;
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        Some(crate::resources::registry(&self.context))
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        Some(map! {})
    }
}
