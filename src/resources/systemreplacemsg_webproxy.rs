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
    /// Replacement message for web proxy pages, addressed by its message type.
    pub struct SystemReplacemsgWebproxy {
        schema: ResourceSchema::collection("systemreplacemsg_webproxy", "SystemReplacemsgWebproxy", "system.replacemsg/webproxy")
            .key_field("msg_type")
            .describe("Replacement messages."),
        fields: {
            msg_type: ValueString<'static> = string().required().force_new().length(0, 28)
                .describe("Message type."),
            buffer: ValueString<'static> = string().optional().length(0, 32768)
                .describe("Message string."),
            header: ValueString<'static> = string()
                .describe("Header flag."),
            format: ValueString<'static> = string()
                .describe("Format flag."),
        }
    }
}
