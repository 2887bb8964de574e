//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::packet::PacketType;

// Type aliases.
pub type DecodeResult<T> = Result<T, DecodeError>;
pub type ValidationResult<T> = Result<T, ValidationError>;

// OSPF decode errors.
//
// The byte stream doesn't hold the structure declared or implied by its
// contents. The whole packet must be discarded.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum DecodeError {
    InvalidVersion(u8),
    UnknownPacketType(u8),
    InvalidLength(u16),
    InvalidChecksum,
    InvalidLsaLength,
    UnknownRouterLinkType(u8),
    InvalidIpPrefix,
}

// OSPF validation errors.
//
// A field holds a value the protocol doesn't allow. Raised before anything
// gets encoded.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum ValidationError {
    InvalidPacketType(u8),
    PacketTypeMismatch(PacketType, PacketType),
    PacketTooLarge(usize),
    LsaTooLarge(usize),
    InvalidRouterId(Ipv4Addr),
    InvalidAuthType(u16),
    InvalidAuthKey(usize),
    InvalidNetworkMask(Ipv4Addr),
    InvalidHelloInterval(u16),
    InvalidDeadInterval(u32),
    InvalidMetric(u32),
    InvalidLsaChecksum(Ipv4Addr, Ipv4Addr),
    InvalidDestinationId(Ipv4Addr),
    InvalidNexthopGateway(IpAddr),
    InvalidNexthopInterface,
}

// ===== impl DecodeError =====

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InvalidVersion(version) => {
                write!(f, "invalid packet version: {}", version)
            }
            DecodeError::UnknownPacketType(pkt_type) => {
                write!(f, "unknown packet type: {}", pkt_type)
            }
            DecodeError::InvalidLength(pkt_len) => {
                write!(f, "invalid packet length: {}", pkt_len)
            }
            DecodeError::InvalidChecksum => {
                write!(f, "invalid checksum")
            }
            DecodeError::InvalidLsaLength => {
                write!(f, "invalid LSA length")
            }
            DecodeError::UnknownRouterLinkType(link_type) => {
                write!(f, "unknown link type: {}", link_type)
            }
            DecodeError::InvalidIpPrefix => {
                write!(f, "invalid IP prefix")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

// ===== impl ValidationError =====

impl ValidationError {
    // Returns the name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidPacketType(..)
            | ValidationError::PacketTypeMismatch(..) => "packet-type",
            ValidationError::PacketTooLarge(..) => "packet-length",
            ValidationError::LsaTooLarge(..) => "lsa-length",
            ValidationError::InvalidRouterId(..) => "router-id",
            ValidationError::InvalidAuthType(..) => "auth-type",
            ValidationError::InvalidAuthKey(..) => "authentication",
            ValidationError::InvalidNetworkMask(..) => "network-mask",
            ValidationError::InvalidHelloInterval(..) => "hello-interval",
            ValidationError::InvalidDeadInterval(..) => "dead-interval",
            ValidationError::InvalidMetric(..) => "metric",
            ValidationError::InvalidLsaChecksum(..) => "lsa-checksum",
            ValidationError::InvalidDestinationId(..) => "destination-id",
            ValidationError::InvalidNexthopGateway(..) => "gateway",
            ValidationError::InvalidNexthopInterface => "interface",
        }
    }

    pub(crate) fn log(&self) {
        warn!(field = self.field(), "{}", self);
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidPacketType(pkt_type) => {
                write!(f, "invalid packet type: {}", pkt_type)
            }
            ValidationError::PacketTypeMismatch(hdr_type, body_type) => {
                write!(
                    f,
                    "packet type mismatch: header {:?}, body {:?}",
                    hdr_type, body_type
                )
            }
            ValidationError::PacketTooLarge(pkt_len) => {
                write!(f, "packet too large: {} bytes", pkt_len)
            }
            ValidationError::LsaTooLarge(lsa_len) => {
                write!(f, "LSA too large: {} bytes", lsa_len)
            }
            ValidationError::InvalidRouterId(router_id) => {
                write!(f, "invalid router-id: {}", router_id)
            }
            ValidationError::InvalidAuthType(au_type) => {
                write!(f, "invalid authentication type: {}", au_type)
            }
            ValidationError::InvalidAuthKey(key_len) => {
                write!(
                    f,
                    "authentication key doesn't fit in 64 bits: {} bytes",
                    key_len
                )
            }
            ValidationError::InvalidNetworkMask(mask) => {
                write!(f, "invalid network mask: {}", mask)
            }
            ValidationError::InvalidHelloInterval(interval) => {
                write!(f, "invalid hello interval: {}", interval)
            }
            ValidationError::InvalidDeadInterval(interval) => {
                write!(f, "invalid router dead interval: {}", interval)
            }
            ValidationError::InvalidMetric(metric) => {
                write!(f, "metric out of 24-bit range: {}", metric)
            }
            ValidationError::InvalidLsaChecksum(lsa_id, adv_rtr) => {
                write!(
                    f,
                    "invalid LSA checksum (lsa-id {} adv-rtr {})",
                    lsa_id, adv_rtr
                )
            }
            ValidationError::InvalidDestinationId(dest_id) => {
                write!(f, "invalid destination-id: {}", dest_id)
            }
            ValidationError::InvalidNexthopGateway(gateway) => {
                write!(f, "invalid nexthop gateway: {}", gateway)
            }
            ValidationError::InvalidNexthopInterface => {
                write!(f, "missing nexthop interface")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
