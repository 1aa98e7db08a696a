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


//! Resource kinds exposed by the provider.

use std::collections::HashMap;

use tf_provider::{map, DynamicResource};

use crate::context::ProviderContext;
use crate::resource::GenericResource;

mod certificate_ca;
mod firewallservice_group;
mod fmg_system_admin_user;
mod log_guidisplay;
mod router_bfd;
mod system_linkmonitor;
mod systemreplacemsg_webproxy;
mod vpn_pptp;

pub use certificate_ca::CertificateCa;
pub use firewallservice_group::FirewallServiceGroup;
pub use fmg_system_admin_user::FmgSystemAdminUser;
pub use log_guidisplay::LogGuiDisplay;
pub use router_bfd::RouterBfd;
pub use system_linkmonitor::SystemLinkMonitor;
pub use systemreplacemsg_webproxy::SystemReplacemsgWebproxy;
pub use vpn_pptp::VpnPptp;

/// Every resource kind, keyed by its name without the provider prefix.
pub fn registry(context: &ProviderContext) -> HashMap<String, Box<dyn DynamicResource>> {
    map! {
        "certificate_ca" => GenericResource::<CertificateCa>::new(context.clone()),
        "firewallservice_group" => GenericResource::<FirewallServiceGroup>::new(context.clone()),
        "fmg_system_admin_user" => GenericResource::<FmgSystemAdminUser>::new(context.clone()),
        "log_guidisplay" => GenericResource::<LogGuiDisplay>::new(context.clone()),
        "router_bfd" => GenericResource::<RouterBfd>::new(context.clone()),
        "system_linkmonitor" => GenericResource::<SystemLinkMonitor>::new(context.clone()),
        "systemreplacemsg_webproxy" => GenericResource::<SystemReplacemsgWebproxy>::new(context.clone()),
        "vpn_pptp" => GenericResource::<VpnPptp>::new(context.clone()),
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{Api, DeleteMode, FieldKind, Lifecycle, ResourceSchema};
    use crate::state::{InternalState, StateRecord};

    use super::*;

    fn schemas() -> Vec<&'static ResourceSchema> {
        vec![
            CertificateCa::schema(),
            FirewallServiceGroup::schema(),
            FmgSystemAdminUser::schema(),
            LogGuiDisplay::schema(),
            RouterBfd::schema(),
            SystemLinkMonitor::schema(),
            SystemReplacemsgWebproxy::schema(),
            VpnPptp::schema(),
        ]
    }

    #[test]
    fn every_kind_has_a_terraform_schema() {
        for schema in schemas() {
            let tf = schema.to_tf_schema();
            assert!(
                tf.block.attributes.contains_key("id"),
                "{} has no id attribute",
                schema.name
            );
            for field in schema.fields() {
                let declared = match field.kind {
                    FieldKind::Table { .. } => tf.block.blocks.contains_key(&field.name),
                    _ => tf.block.attributes.contains_key(&field.name),
                };
                assert!(declared, "{}.{} is not declared", schema.name, field.name);
            }
        }
    }

    #[test]
    fn unset_fields_are_not_validated() {
        for schema in schemas() {
            assert!(
                schema.validate(&InternalState::new()).is_empty(),
                "{}",
                schema.name
            );
        }
    }

    #[test]
    fn singletons_are_cleared_instead_of_deleted() {
        for schema in schemas() {
            if schema.lifecycle == Lifecycle::Singleton {
                assert_eq!(schema.delete_mode, DeleteMode::Clear, "{}", schema.name);
            }
        }
        assert_eq!(FmgSystemAdminUser::schema().api, Api::FortiManager);
        assert_eq!(RouterBfd::schema().lifecycle, Lifecycle::Singleton);
    }
}
