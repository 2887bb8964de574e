//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::Bytes;
use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::packet::Packet;
use crate::packet::creator::PacketCreator;
use crate::packet::error::DecodeError;
use crate::version::{Ospfv2, Ospfv3, Version};

// Packet of either OSPF version.
#[derive(Clone, Debug, EnumAsInner, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum AnyPacket {
    Ospfv2(Packet<Ospfv2>),
    Ospfv3(Packet<Ospfv3>),
}

// Parses raw bytes into fully validated OSPF packets.
#[derive(Debug)]
pub struct PacketReader;

// ===== impl AnyPacket =====

impl AnyPacket {
    pub fn version(&self) -> u8 {
        match self {
            AnyPacket::Ospfv2(_) => Ospfv2::VERSION,
            AnyPacket::Ospfv3(_) => Ospfv3::VERSION,
        }
    }
}

// ===== impl PacketReader =====

impl PacketReader {
    // Smallest header length across both versions.
    pub const MIN_LENGTH: usize = 16;

    // Decodes a packet and rebuilds it through the packet creator, so that
    // any field the protocol doesn't allow is rejected.
    pub fn convert_bytes_to_packet(data: &[u8]) -> Result<AnyPacket, Error> {
        if data.len() < Self::MIN_LENGTH {
            return Err(DecodeError::InvalidLength(data.len() as u16).into());
        }

        let packet = match data[0] {
            version if version == Ospfv2::VERSION => {
                AnyPacket::Ospfv2(Self::rebuild(data)?)
            }
            version if version == Ospfv3::VERSION => {
                AnyPacket::Ospfv3(Self::rebuild(data)?)
            }
            version => {
                return Err(DecodeError::InvalidVersion(version).into());
            }
        };

        Ok(packet)
    }

    fn rebuild<V>(data: &[u8]) -> Result<Packet<V>, Error>
    where
        V: Version,
    {
        let mut buf = Bytes::copy_from_slice(data);
        let packet = Packet::<V>::decode(&mut buf)?;

        let creator = PacketCreator::<V>::new(packet.hdr);
        let packet = creator.build(packet.body)?;

        Ok(packet)
    }
}
