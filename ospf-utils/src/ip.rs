//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use ipnetwork::Ipv6Network;
use serde::{Deserialize, Serialize};

// Address Family identifier.
//
// IANA registry:
// http://www.iana.org/assignments/address-family-numbers
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum AddressFamily {
    Ipv4 = 1,
    Ipv6 = 2,
}

// Address conversion errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddrFormatError {
    InvalidIpv4(String),
    InvalidIpv6(String),
}

// Extension methods for IpAddr.
pub trait IpAddrExt {
    // Returns the address family of the IP address.
    fn address_family(&self) -> AddressFamily;
}

// Extension methods for Ipv4Addr.
pub trait Ipv4AddrExt {
    const LENGTH: usize;

    // Returns true if this is an usable address.
    fn is_usable(&self) -> bool;

    // Returns true if this address is a contiguous network mask.
    fn is_netmask(&self) -> bool;
}

// Extension methods for Ipv6Network.
pub trait Ipv6NetworkExt {
    const MAX_PREFIXLEN: u8;

    // Apply mask to prefix.
    #[must_use]
    fn apply_mask(&self) -> Ipv6Network;
}

// ===== impl AddressFamily =====

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "ipv4"),
            AddressFamily::Ipv6 => write!(f, "ipv6"),
        }
    }
}

// ===== impl IpAddr =====

impl IpAddrExt for IpAddr {
    fn address_family(&self) -> AddressFamily {
        match self {
            IpAddr::V4(_) => AddressFamily::Ipv4,
            IpAddr::V6(_) => AddressFamily::Ipv6,
        }
    }
}

// ===== impl Ipv4Addr =====

impl Ipv4AddrExt for Ipv4Addr {
    const LENGTH: usize = 4;

    fn is_usable(&self) -> bool {
        !(self.is_loopback()
            || self.is_broadcast()
            || self.is_multicast()
            || self.is_unspecified())
    }

    fn is_netmask(&self) -> bool {
        netmask_prefixlen(*self).is_some()
    }
}

// ===== impl Ipv6Network =====

impl Ipv6NetworkExt for Ipv6Network {
    const MAX_PREFIXLEN: u8 = 128;

    fn apply_mask(&self) -> Ipv6Network {
        Ipv6Network::new(self.network(), self.prefix()).unwrap_or(*self)
    }
}

// ===== impl AddrFormatError =====

impl std::fmt::Display for AddrFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddrFormatError::InvalidIpv4(input) => {
                write!(f, "invalid IPv4 address: {input:?}")
            }
            AddrFormatError::InvalidIpv6(input) => {
                write!(f, "invalid IPv6 address: {input:?}")
            }
        }
    }
}

impl std::error::Error for AddrFormatError {}

// ===== global functions =====

// Converts a dotted-decimal IPv4 address into its integer representation.
pub fn ipv4_to_decimal(addr: &str) -> Result<u32, AddrFormatError> {
    Ipv4Addr::from_str(addr)
        .map(u32::from)
        .map_err(|_| AddrFormatError::InvalidIpv4(addr.to_owned()))
}

pub fn decimal_to_ipv4(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value)
}

// Converts a textual IPv6 address into its integer representation.
pub fn ipv6_to_decimal(addr: &str) -> Result<u128, AddrFormatError> {
    Ipv6Addr::from_str(addr)
        .map(u128::from)
        .map_err(|_| AddrFormatError::InvalidIpv6(addr.to_owned()))
}

pub fn decimal_to_ipv6(value: u128) -> Ipv6Addr {
    Ipv6Addr::from(value)
}

// Returns the prefix length of the given IPv4 network mask, or `None` if the
// mask isn't contiguous.
pub fn netmask_prefixlen(mask: Ipv4Addr) -> Option<u8> {
    ipnetwork::ipv4_mask_to_prefix(mask).ok()
}

// ===== unit tests =====
