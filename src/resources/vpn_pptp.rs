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


use tf_provider::value::ValueString;

use crate::schema::ResourceSchema;
use crate::state::resource_state;

resource_state! {
    /// Global PPTP settings.
    pub struct VpnPptp {
        schema: ResourceSchema::singleton("vpn_pptp", "VpnPptp", "vpn/pptp")
            .describe("Configure PPTP."),
        fields: {
            status: ValueString<'static> = string().required()
                .describe("Enable/disable FortiGate as a PPTP gateway."),
            ip_mode: ValueString<'static> = string()
                .describe("IP assignment mode for PPTP client."),
            eip: ValueString<'static> = string()
                .describe("End IP."),
            sip: ValueString<'static> = string()
                .describe("Start IP."),
            local_ip: ValueString<'static> = string()
                .describe("Local IP to be used for peer's remote IP."),
            usrgrp: ValueString<'static> = string().length(0, 35)
                .describe("User group."),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use pretty_assertions::assert_eq;
    use serde_json::{json, Value as Json};
    use tf_provider::value::Value;

    use super::VpnPptp;
    use crate::codec::{BuildMode, ObjectBuilder};
    use crate::state::{InternalState, StateRecord};

    #[test]
    fn clearing_a_table_less_singleton_sends_nothing() {
        let config = VpnPptp {
            status: Value::Value(Cow::Borrowed("enable")),
            usrgrp: Value::Value(Cow::Borrowed("pptp-users")),
            ..Default::default()
        };
        let state = InternalState::from_record(&config, Some(&config));

        let object = ObjectBuilder::new(VpnPptp::schema())
            .build(&state, BuildMode::Clear)
            .map(Json::Object)
            .expect("state should build");

        assert_eq!(object, json!({}));
    }
}
