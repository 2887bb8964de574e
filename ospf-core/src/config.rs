//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use ospf_utils::task::{Timer, TimerError};
use serde::{Deserialize, Serialize};

use crate::ospfv2::packet::{AuthType, PacketHdr as PacketHdrV2};
use crate::ospfv3::packet::PacketHdr as PacketHdrV3;
use crate::packet::PacketType;
use crate::packet::error::ValidationResult;

// Per-interface OSPF configuration.
//
// Missing fields take the RFC 2328 architectural constants.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterfaceCfg {
    pub area_id: Ipv4Addr,
    pub hello_interval: u16,
    pub dead_interval: u32,
    pub retransmit_interval: u16,
    pub priority: u8,
    pub instance_id: u8,
    pub auth_type: AuthType,
    pub auth_key: Option<String>,
    pub mtu: u16,
}

// ===== impl InterfaceCfg =====

impl InterfaceCfg {
    // Builds an OSPFv2 packet header for this interface.
    pub fn v2_hdr(
        &self,
        pkt_type: PacketType,
        router_id: Ipv4Addr,
    ) -> ValidationResult<PacketHdrV2> {
        let auth = match (self.auth_type, &self.auth_key) {
            (AuthType::Null, _) | (_, None) => 0,
            (_, Some(key)) => AuthType::encode_key(key.as_bytes())?,
        };
        PacketHdrV2::new(
            pkt_type as u8,
            router_id,
            self.area_id,
            self.auth_type as u16,
            auth,
        )
    }

    // Builds an OSPFv3 packet header for this interface.
    pub fn v3_hdr(
        &self,
        pkt_type: PacketType,
        router_id: Ipv4Addr,
    ) -> ValidationResult<PacketHdrV3> {
        PacketHdrV3::new(
            pkt_type as u8,
            router_id,
            self.area_id,
            self.instance_id,
        )
    }

    pub fn hello_timer(&self) -> Result<Timer, TimerError> {
        Timer::new(self.hello_interval.into())
    }

    pub fn dead_timer(&self) -> Result<Timer, TimerError> {
        Timer::new(self.dead_interval.into())
    }

    pub fn retransmit_timer(&self) -> Result<Timer, TimerError> {
        Timer::new(self.retransmit_interval.into())
    }
}

impl Default for InterfaceCfg {
    fn default() -> InterfaceCfg {
        InterfaceCfg {
            area_id: Ipv4Addr::UNSPECIFIED,
            hello_interval: 10,
            dead_interval: 40,
            retransmit_interval: 5,
            priority: 1,
            instance_id: 0,
            auth_type: AuthType::Null,
            auth_key: None,
            mtu: 1500,
        }
    }
}
