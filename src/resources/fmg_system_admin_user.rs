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

use crate::codec::FieldCodec;
use crate::schema::{Api, ResourceSchema};
use crate::state::resource_state;

const USER_TYPES: &[(i64, &str)] = &[
    (0, "local"),
    (1, "radius"),
    (2, "ldap"),
    (3, "tacacs-plus"),
    (4, "pki-auth"),
    (5, "group"),
];

const RPC_PERMITS: &[(i64, &str)] = &[(0, "read-write"), (1, "none"), (2, "read")];

resource_state! {
    /// Administrator account of a FortiManager.
    pub struct FmgSystemAdminUser {
        schema: ResourceSchema::collection("fmg_system_admin_user", "FmgSystemAdminUser", "/cli/global/system/admin/user")
            .api(Api::FortiManager)
            .key_field("userid")
            .describe("Administrator users of FortiManager."),
        fields: {
            userid: ValueString<'static> = string().required().force_new().strict()
                .describe("User name."),
            description: ValueString<'static> = string().optional()
                .describe("Description."),
            user_type: ValueString<'static> = string().optional().wire("user_type").codec(FieldCodec::Enumerated(USER_TYPES))
                .describe("User type."),
            profileid: ValueString<'static> = string().optional()
                .describe("Profile of the user."),
            rpc_permit: ValueString<'static> = string().optional().codec(FieldCodec::Enumerated(RPC_PERMITS))
                .describe("Permission of the JSON-RPC API."),
            trusthost1: ValueString<'static> = string().optional().codec(FieldCodec::JoinedPair(' '))
                .describe("Admin user trusted host IP, as `address netmask`."),
            trusthost2: ValueString<'static> = string().optional().codec(FieldCodec::JoinedPair(' '))
                .describe("Admin user trusted host IP, as `address netmask`."),
            trusthost3: ValueString<'static> = string().optional().codec(FieldCodec::JoinedPair(' '))
                .describe("Admin user trusted host IP, as `address netmask`."),
        }
    }
}
