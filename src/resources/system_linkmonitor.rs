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


use tf_provider::value::{Value, ValueList, ValueNumber, ValueString};

use crate::schema::ResourceSchema;
use crate::state::{resource_state, table_row, RowRecord};

table_row! {
    pub struct LinkMonitorServer {
        address: ValueString<'static> = string().length(0, 64)
            .describe("Server address."),
    }
}

resource_state! {
    /// Link health monitor.
    pub struct SystemLinkMonitor {
        schema: ResourceSchema::collection("system_linkmonitor", "SystemLinkMonitor", "system/link-monitor")
            .describe("Configure Link Health Monitor."),
        fields: {
            name: ValueString<'static> = string().required().force_new().strict().length(0, 35)
                .describe("Link monitor name."),
            addr_mode: ValueString<'static> = string()
                .describe("Address mode (IPv4 or IPv6)."),
            srcintf: ValueString<'static> = reference("system.interface").length(0, 15),
            server: ValueList<Value<LinkMonitorServer>> = table(LinkMonitorServer::columns()).required()
                .describe("IP address of the server(s) to be monitored."),
            protocol: ValueString<'static> = string()
                .describe("Protocols used to monitor the server."),
            port: ValueNumber = number().range(1, 65535)
                .describe("Port number of the traffic to be used to monitor the server."),
            gateway_ip: ValueString<'static> = string()
                .describe("Gateway IP address used to probe the server."),
            gateway_ip6: ValueString<'static> = string()
                .describe("Gateway IPv6 address used to probe the server."),
            source_ip: ValueString<'static> = string()
                .describe("Source IP address used in packet to the server."),
            source_ip6: ValueString<'static> = string()
                .describe("Source IPv6 address used in packet to the server."),
            http_get: ValueString<'static> = string().required().length(0, 1024)
                .describe("If you are monitoring an HTML server you can send an HTTP-GET request with a custom string."),
            http_agent: ValueString<'static> = string().length(0, 1024)
                .describe("String in the http-agent field in the HTTP header."),
            http_match: ValueString<'static> = string().length(0, 1024)
                .describe("String that you expect to see in the HTTP-GET requests of the traffic to be monitored."),
            interval: ValueNumber = number().range(1, 3600)
                .describe("Detection interval (1 - 3600 sec)."),
            failtime: ValueNumber = number().range(1, 3600)
                .describe("Number of retry attempts before the server is considered down."),
            recoverytime: ValueNumber = number().range(1, 3600)
                .describe("Number of successful responses received before server is considered recovered."),
            security_mode: ValueString<'static> = string()
                .describe("Twamp controller security mode."),
            password: ValueString<'static> = string().optional().sensitive().write_only().length(0, 128)
                .describe("Twamp controller password in authentication mode."),
            packet_size: ValueNumber = number().range(64, 1024)
                .describe("Packet size of a twamp test session."),
            ha_priority: ValueNumber = number().range(1, 50)
                .describe("HA election priority (1 - 50)."),
            update_cascade_interface: ValueString<'static> = string()
                .describe("Enable/disable update cascade interface."),
            update_static_route: ValueString<'static> = string()
                .describe("Enable/disable updating the static route."),
            status: ValueString<'static> = string()
                .describe("Enable/disable this link monitor."),
        }
    }
}
