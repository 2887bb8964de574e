//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use ospf_utils::ip::AddressFamily;
use serde::{Deserialize, Serialize};

use crate::packet::PacketVersion;
use crate::packet::lsa::LsaVersion;

// OSPF version-specific code.
pub trait Version
where
    Self: 'static
        + Send
        + Sync
        + Clone
        + Copy
        + Default
        + Eq
        + PartialEq
        + std::fmt::Debug
        + Serialize
        + for<'de> Deserialize<'de>
        + PacketVersion<Self>
        + LsaVersion<Self>,
{
    // Value of the version field of the packet header.
    const VERSION: u8;

    // Address family of the routed traffic.
    const ADDRESS_FAMILY: AddressFamily;
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Ospfv2();

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Ospfv3();

// ===== impl Ospfv2 =====

impl Version for Ospfv2 {
    const VERSION: u8 = 2;
    const ADDRESS_FAMILY: AddressFamily = AddressFamily::Ipv4;
}

// ===== impl Ospfv3 =====

impl Version for Ospfv3 {
    const VERSION: u8 = 3;
    const ADDRESS_FAMILY: AddressFamily = AddressFamily::Ipv6;
}
