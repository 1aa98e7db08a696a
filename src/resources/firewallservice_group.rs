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


use tf_provider::value::{Value, ValueList, ValueString};

use crate::schema::ResourceSchema;
use crate::state::{resource_state, table_row, RowRecord};

table_row! {
    pub struct ServiceGroupMember {
        name: ValueString<'static> = reference("firewall.service.custom")
            .length(0, 64),
    }
}

resource_state! {
    /// Firewall service group.
    pub struct FirewallServiceGroup {
        schema: ResourceSchema::collection("firewallservice_group", "FirewallServiceGroup", "firewall.service/group")
            .describe("Configure service groups."),
        fields: {
            name: ValueString<'static> = string().required().force_new().strict().length(0, 79)
                .describe("Address group name."),
            member: ValueList<Value<ServiceGroupMember>> = table(ServiceGroupMember::columns()).dynamic_sort("name")
                .describe("Service objects contained within the group."),
            comment: ValueString<'static> = string().length(0, 255)
                .describe("Comment."),
            dynamic_sort_subtable: ValueString<'static> = string().optional().local()
                .describe("Sort sub-tables by their natural key, `true` or `false`."),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tf_provider::value::Value;

    use super::{FirewallServiceGroup, ServiceGroupMember};
    use crate::codec::{BuildMode, ObjectBuilder};
    use crate::state::{InternalState, StateRecord};

    fn member(name: &'static str) -> Value<ServiceGroupMember> {
        Value::Value(ServiceGroupMember {
            name: Value::Value(Cow::Borrowed(name)),
        })
    }

    #[test]
    fn members_keep_their_configured_order_on_the_wire() {
        let config = FirewallServiceGroup {
            name: Value::Value(Cow::Borrowed("web")),
            member: Value::Value(vec![member("HTTPS"), member("HTTP")]),
            ..Default::default()
        };
        let state = InternalState::from_record(&config, Some(&config));

        let object = ObjectBuilder::new(FirewallServiceGroup::schema())
            .build(&state, BuildMode::Update)
            .unwrap();

        assert_eq!(
            serde_json::Value::Object(object),
            json!({"member": [{"name": "HTTPS"}, {"name": "HTTP"}]})
        );
    }
}
