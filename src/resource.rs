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
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty, ValueNumber};
use tf_provider::{AttributePath, Diagnostics, Resource};
use tracing::debug;

use crate::codec::ReadMode;
use crate::context::{Configured, ProviderContext};
use crate::controller::ResourceController;
use crate::schema::FieldKind;
use crate::state::{InternalState, StateRecord, StateStore};

/// Terraform resource interpreting the schema of the record `K`.
///
/// The private state is unknown between an import and the first read, so
/// that read materializes every table.
pub struct GenericResource<K> {
    context: ProviderContext,
    kind: PhantomData<fn() -> K>,
}

impl<K> GenericResource<K> {
    pub fn new(context: ProviderContext) -> Self {
        Self {
            context,
            kind: PhantomData,
        }
    }
}

impl<K: StateRecord> GenericResource<K> {
    async fn configured(&self, diags: &mut Diagnostics) -> Option<Arc<Configured>> {
        match self.context.get().await {
            Ok(configured) => Some(configured),
            Err(err) => {
                diags.root_error_short(err.to_string());
                None
            }
        }
    }

    fn controller<'c>(
        configured: &'c Configured,
        diags: &mut Diagnostics,
    ) -> Option<ResourceController<'c>> {
        let schema = K::schema();
        match configured.transport(schema.api) {
            Ok(transport) => {
                let mode = if configured.import_tables {
                    ReadMode::Import
                } else {
                    ReadMode::Managed
                };
                Some(ResourceController::new(schema, transport, configured.options).read_mode(mode))
            }
            Err(err) => {
                diags.root_error_short(err.to_string());
                None
            }
        }
    }

    /// Write an applied state back into `record`.
    fn applied(state: &InternalState, record: &mut K, diags: &mut Diagnostics) -> Option<()> {
        if state.id().is_none() {
            diags.root_error(
                format!("Error applying {} resource", K::schema().name),
                "The object could not be read back from the appliance.",
            );
            return None;
        }
        state.apply_to(record);
        record.settle();
        Some(())
    }
}

fn report(diags: &mut Diagnostics, err: &anyhow::Error) {
    diags.root_error(err.to_string(), format!("{err:#}"));
}

#[async_trait]
impl<K: StateRecord> Resource for GenericResource<K> {
    type State<'a> = Value<K>;
    type PrivateState<'a> = ValueNumber;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(K::schema().to_tf_schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if let Value::Value(config) = &config {
            let state = InternalState::from_record(config, None);
            for (path, err) in K::schema().validate(&state) {
                diags.error("Invalid attribute value", err.to_string(), path);
            }
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut record = match state {
            Value::Value(record) => record,
            state => return Some((state, private_state)),
        };
        let configured = self.configured(diags).await?;
        let mut controller = Self::controller(&configured, diags)?;
        // Resource has been imported, but not yet read
        if private_state.is_unknown() {
            controller = controller.read_mode(ReadMode::Import);
        }

        let mut internal = InternalState::from_record(&record, None);
        if let Err(err) = controller.read(&mut internal).await {
            report(diags, &err);
            return None;
        }
        if internal.id().is_none() {
            return Some((Value::Null, Value::Null));
        }
        internal.apply_to(&mut record);
        Some((Value::Value(record), Value::Null))
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut record = match proposed_state {
            Value::Value(record) => record,
            proposed_state => return Some((proposed_state, Value::Null)),
        };
        record.mark_computed_unknown();
        *record.id_mut() = Value::Unknown;

        Some((Value::Value(record), Value::Null))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        let (prior, mut planned) = match (prior_state, proposed_state) {
            (Value::Value(prior), Value::Value(planned)) => (prior, planned),
            (_, proposed_state) => return Some((proposed_state, prior_private_state, Vec::new())),
        };
        *planned.id_mut() = prior.id().clone();

        let replace = K::schema()
            .fields()
            .iter()
            .filter(|field| field.force_new && planned.get(&field.name) != prior.get(&field.name))
            .map(|field| AttributePath::new(field.name.clone()))
            .collect();

        Some((Value::Value(planned), prior_private_state, replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        config_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Value::Value(mut record) = planned_state else {
            diags.root_error_short("Cannot create a null resource");
            return None;
        };
        let configured = self.configured(diags).await?;
        let controller = Self::controller(&configured, diags)?;

        let mut state = InternalState::from_record(&record, config_state.as_ref_option());
        if let Err(err) = controller.create(&mut state).await {
            report(diags, &err);
            return None;
        }
        Self::applied(&state, &mut record, diags)?;

        Some((Value::Value(record), Value::Null))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        config_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Value::Value(mut record) = planned_state else {
            diags.root_error_short("Cannot update a null resource");
            return None;
        };
        let configured = self.configured(diags).await?;
        let controller = Self::controller(&configured, diags)?;

        let mut state = InternalState::from_record(&record, config_state.as_ref_option());
        if let Err(err) = controller.update(&mut state).await {
            report(diags, &err);
            return None;
        }
        Self::applied(&state, &mut record, diags)?;

        Some((Value::Value(record), Value::Null))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let Value::Value(record) = prior_state else {
            return Some(());
        };
        let configured = self.configured(diags).await?;
        let controller = Self::controller(&configured, diags)?;

        let mut state = InternalState::from_record(&record, None);
        if let Err(err) = controller.delete(&mut state).await {
            report(diags, &err);
            return None;
        }
        Some(())
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        debug!(resource = K::schema().name, %id, "importing resource");
        let mut record = K::default();
        for field in K::schema().fields() {
            if let FieldKind::Table { .. } = field.kind {
                record.set(&field.name, Value::Null);
            }
        }
        *record.id_mut() = Value::Value(Cow::Owned(id));

        Some((Value::Value(record), Value::Unknown))
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tf_provider::value::{Value, ValueList, ValueNumber, ValueString};
    use tf_provider::{AttributePath, Diagnostics, Resource};

    use super::GenericResource;
    use crate::client::mock::MockTransport;
    use crate::client::{ApiResponse, CallOptions, Method};
    use crate::context::{Configured, ProviderContext};
    use crate::schema::ResourceSchema;
    use crate::state::{resource_state, table_row, RowRecord};

    table_row! {
        pub struct Server {
            address: ValueString<'static> = string().length(0, 15),
        }
    }

    resource_state! {
        pub struct Monitor {
            schema: ResourceSchema::collection("system_linkmonitor", "SystemLinkMonitor", "system/link-monitor"),
            fields: {
                name: ValueString<'static> = string().required().force_new(),
                interval: ValueNumber = number().range(20, 3600000),
                server: ValueList<Value<Server>> = table(Server::columns()),
            }
        }
    }

    fn text(s: &str) -> ValueString<'static> {
        Value::Value(Cow::Owned(s.to_owned()))
    }

    fn servers(addresses: &[&str]) -> ValueList<Value<Server>> {
        Value::Value(
            addresses
                .iter()
                .map(|address| Value::Value(Server { address: text(address) }))
                .collect(),
        )
    }

    async fn resource(
        responses: Vec<ApiResponse>,
    ) -> (GenericResource<Monitor>, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new(responses));
        let context = ProviderContext::default();
        context
            .set(Configured {
                fortios: Some(transport.clone()),
                fortimanager: None,
                options: CallOptions::default(),
                import_tables: false,
            })
            .await;
        (GenericResource::new(context), transport)
    }

    #[tokio::test]
    async fn validation_reports_each_violation_at_its_path() {
        let (resource, _) = resource(Vec::new()).await;
        let mut diags = Diagnostics::default();
        let config = Monitor {
            name: text("wan"),
            interval: Value::Value(5),
            server: servers(&["8.8.8.8", "2001:db8:ffff:ffff::1"]),
            ..Default::default()
        };

        let result = resource.validate(&mut diags, Value::Value(config)).await;

        assert!(result.is_none());
        let paths: Vec<_> = diags.errors.iter().map(|diag| diag.attribute.clone()).collect();
        assert_eq!(
            paths,
            [
                AttributePath::new("interval"),
                AttributePath::new("server").index(1).attribute("address"),
            ]
        );
    }

    #[tokio::test]
    async fn changing_a_force_new_field_replaces_the_resource() {
        let (resource, _) = resource(Vec::new()).await;
        let mut diags = Diagnostics::default();
        let prior = Monitor {
            id: text("wan"),
            name: text("wan"),
            interval: Value::Value(500),
            server: servers(&[]),
        };
        let proposed = Monitor {
            id: Value::Unknown,
            name: text("lan"),
            interval: Value::Value(600),
            ..prior.clone()
        };

        let planned = resource
            .plan_update(
                &mut diags,
                Value::Value(prior),
                Value::Value(proposed.clone()),
                Value::Value(proposed),
                Value::Null,
                Value::Null,
            )
            .await;

        let (state, _, replace) = planned.expect("update should be planned");
        assert_eq!(replace, [AttributePath::new("name")]);
        assert_eq!(state.as_ref_option().map(|m| m.id.clone()), Some(text("wan")));
    }

    #[tokio::test]
    async fn create_sends_the_configuration_and_reads_back() {
        let (resource, transport) = resource(vec![
            MockTransport::ok(json!({"status": "success", "mkey": "wan"})),
            MockTransport::ok(json!({"results": [{
                "name": "wan",
                "interval": 500,
                "server": [{"address": "8.8.8.8"}],
            }]})),
        ])
        .await;
        let mut diags = Diagnostics::default();
        let config = Monitor {
            name: text("wan"),
            server: servers(&["8.8.8.8"]),
            ..Default::default()
        };
        let (planned, private) = resource
            .plan_create(&mut diags, Value::Value(config.clone()), Value::Value(config.clone()), Value::Null)
            .await
            .expect("creation should be planned");

        let created = resource
            .create(&mut diags, planned, Value::Value(config), private, Value::Null)
            .await;

        assert!(diags.errors.is_empty(), "{diags:?}");
        assert_eq!(
            created.map(|(state, _)| state),
            Some(Value::Value(Monitor {
                id: text("wan"),
                name: text("wan"),
                interval: Value::Value(500),
                server: servers(&["8.8.8.8"]),
            }))
        );
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({"name": "wan", "server": [{"address": "8.8.8.8"}]}))
        );
    }

    #[tokio::test]
    async fn import_then_read_materializes_tables() {
        let (resource, transport) = resource(vec![MockTransport::ok(json!({"results": [{
            "name": "wan",
            "interval": 500,
            "server": [{"address": "1.1.1.1"}, {"address": "8.8.8.8"}],
        }]}))])
        .await;
        let mut diags = Diagnostics::default();

        let (state, private) = resource
            .import(&mut diags, "wan".to_owned())
            .await
            .expect("import should succeed");
        assert!(private.is_unknown());
        let read = resource.read(&mut diags, state, private, Value::Null).await;

        let (state, private) = read.expect("read should succeed");
        assert!(private.is_null());
        assert_eq!(
            state.as_ref_option().map(|m| m.server.clone()),
            Some(servers(&["1.1.1.1", "8.8.8.8"]))
        );
        assert_eq!(transport.requests()[0].path, "system/link-monitor/wan");
    }

    #[tokio::test]
    async fn vanished_objects_are_removed_from_state() {
        let (resource, _) = resource(vec![ApiResponse::new(json!({"http_status": 404}), 404)]).await;
        let mut diags = Diagnostics::default();
        let state = Monitor {
            id: text("wan"),
            name: text("wan"),
            ..Default::default()
        };

        let read: Option<(Value<Monitor>, ValueNumber)> = resource
            .read(&mut diags, Value::Value(state), Value::Null, Value::Null)
            .await;

        assert!(diags.errors.is_empty());
        assert_eq!(read, Some((Value::Null, Value::Null)));
    }

    #[tokio::test]
    async fn destroy_issues_a_delete() {
        let (resource, transport) =
            resource(vec![MockTransport::ok(json!({"status": "success"}))]).await;
        let mut diags = Diagnostics::default();
        let state = Monitor {
            id: text("wan"),
            name: text("wan"),
            ..Default::default()
        };

        let result = resource
            .destroy(&mut diags, Value::Value(state), Value::Null, Value::Null)
            .await;

        assert!(result.is_some(), "{diags:?}");
        assert_eq!(transport.requests()[0].method, Method::Delete);
        assert_eq!(transport.requests()[0].path, "system/link-monitor/wan");
    }

    #[tokio::test]
    async fn unconfigured_api_is_an_error() {
        let resource = GenericResource::<Monitor>::new(ProviderContext::default());
        let mut diags = Diagnostics::default();

        let result = resource
            .destroy(&mut diags, Value::Value(Monitor::default()), Value::Null, Value::Null)
            .await;

        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
