//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod lsa;

use std::net::Ipv4Addr;

use bitflags::bitflags;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use derive_new::new;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use ospf_utils::bytes::{BytesExt, BytesMutExt};
use ospf_utils::checksum::verify_checksum_ipv4;
use ospf_utils::ip::Ipv4AddrExt;
use serde::{Deserialize, Serialize};

use crate::ospfv2::packet::lsa::LsaHdr;
use crate::packet::error::{
    DecodeError, DecodeResult, ValidationError, ValidationResult,
};
use crate::packet::lsa::LsaHdrVersion;
use crate::packet::{
    DbDescFlags, PacketBase, PacketHdrVersion, PacketType, PacketVersion,
};
use crate::version::{Ospfv2, Version};

// OSPFv2 Options field.
//
// IANA registry:
// https://www.iana.org/assignments/ospfv2-parameters/ospfv2-parameters.xhtml#ospfv2-parameters-1
bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct Options: u8 {
        const E = 0x02;
        const MC = 0x04;
        const NP = 0x08;
        const DC = 0x20;
        const O = 0x40;
    }
}

// OSPFv2 authentication type.
#[derive(Clone, Copy, Debug, Default, Eq, FromPrimitive, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthType {
    #[default]
    Null = 0x00,
    Simple = 0x01,
    Cryptographic = 0x02,
}

//
// OSPFv2 packet header.
//
// Encoding format:
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |   Version #   |     Type      |         Packet length         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                          Router ID                            |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                           Area ID                             |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |           Checksum            |             AuType            |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Authentication                          |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Authentication                          |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
// The checksum is computed with the AuType and Authentication fields zeroed.
//
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct PacketHdr {
    pub pkt_type: PacketType,
    pub length: u16,
    pub router_id: Ipv4Addr,
    pub area_id: Ipv4Addr,
    pub cksum: u16,
    pub au_type: u16,
    pub auth: u64,
}

//
// OSPFv2 Hello packet.
//
// Encoding format (packet body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                        Network Mask                           |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |         HelloInterval         |    Options    |    Rtr Pri    |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                     RouterDeadInterval                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                      Designated Router                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                   Backup Designated Router                    |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                          Neighbor                             |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                              ...                              |
//
#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Deserialize, Serialize)]
pub struct Hello {
    pub network_mask: Ipv4Addr,
    pub hello_interval: u16,
    pub options: Options,
    pub priority: u8,
    pub dead_interval: u32,
    pub dr: Option<Ipv4Addr>,
    pub bdr: Option<Ipv4Addr>,
    pub neighbors: Vec<Ipv4Addr>,
}

//
// OSPFv2 Database Description packet.
//
// Encoding format (packet body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |         Interface MTU         |    Options    |0|0|0|0|0|I|M|MS
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                     DD sequence number                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                                                               |
// +-                                                             -+
// |                                                               |
// +-                      An LSA Header                          -+
// |                                                               |
// +-                                                             -+
// |                                                               |
// +-                                                             -+
// |                                                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                              ...                              |
//
#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Deserialize, Serialize)]
pub struct DbDesc {
    pub mtu: u16,
    pub options: Options,
    pub dd_flags: DbDescFlags,
    pub dd_seq_no: u32,
    pub lsa_hdrs: Vec<LsaHdr>,
}

// ===== impl AuthType =====

impl AuthType {
    // Packs an authentication key into the 64-bit authentication field.
    //
    // Keys shorter than 8 bytes are padded with zeros.
    pub fn encode_key(key: &[u8]) -> ValidationResult<u64> {
        if key.len() > 8 {
            return Err(ValidationError::InvalidAuthKey(key.len()));
        }
        let mut octets = [0; 8];
        octets[..key.len()].copy_from_slice(key);
        Ok(u64::from_be_bytes(octets))
    }
}

// ===== impl PacketHdr =====

impl PacketHdr {
    // AuType and Authentication fields.
    pub const AUTH_RANGE: std::ops::Range<usize> = 14..24;

    pub fn new(
        pkt_type: u8,
        router_id: Ipv4Addr,
        area_id: Ipv4Addr,
        au_type: u16,
        auth: u64,
    ) -> ValidationResult<Self> {
        let pkt_type = PacketType::from_u8(pkt_type)
            .ok_or(ValidationError::InvalidPacketType(pkt_type))?;
        let hdr = PacketHdr {
            pkt_type,
            length: Self::LENGTH,
            router_id,
            area_id,
            cksum: 0,
            au_type,
            auth,
        };
        hdr.validate()?;
        Ok(hdr)
    }

    pub fn auth_type(&self) -> Option<AuthType> {
        AuthType::from_u16(self.au_type)
    }
}

impl PacketHdrVersion<Ospfv2> for PacketHdr {
    const LENGTH: u16 = 24;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::LENGTH as usize {
            return Err(DecodeError::InvalidLength(buf.len() as u16));
        }

        // Parse version.
        let version = buf.get_u8();
        if version != Ospfv2::VERSION {
            return Err(DecodeError::InvalidVersion(version));
        }

        // Parse packet type.
        let pkt_type = buf.get_u8();
        let pkt_type = match PacketType::from_u8(pkt_type) {
            Some(pkt_type) => pkt_type,
            None => return Err(DecodeError::UnknownPacketType(pkt_type)),
        };

        // Parse and validate message length.
        let length = buf.get_u16();
        if length < Self::LENGTH {
            return Err(DecodeError::InvalidLength(length));
        }

        let router_id = buf.get_ipv4();
        let area_id = buf.get_ipv4();
        let cksum = buf.get_u16();
        let au_type = buf.get_u16();
        let auth = buf.get_u64();

        Ok(PacketHdr {
            pkt_type,
            length,
            router_id,
            area_id,
            cksum,
            au_type,
            auth,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(Ospfv2::VERSION);
        buf.put_u8(self.pkt_type as u8);
        buf.put_u16(self.length);
        buf.put_ipv4(&self.router_id);
        buf.put_ipv4(&self.area_id);
        buf.put_u16(self.cksum);
        buf.put_u16(self.au_type);
        buf.put_u64(self.auth);
    }

    fn prepare_packet_checksum(data: &mut [u8]) {
        data[Self::CKSUM_RANGE].fill(0);
        data[Self::AUTH_RANGE].fill(0);
    }

    fn verify_cksum(data: &[u8]) -> DecodeResult<()> {
        let mut data = data.to_vec();
        data[Self::AUTH_RANGE].fill(0);
        if !verify_checksum_ipv4(&data) {
            return Err(DecodeError::InvalidChecksum);
        }

        Ok(())
    }

    fn validate(&self) -> ValidationResult<()> {
        if !self.router_id.is_usable() {
            return Err(ValidationError::InvalidRouterId(self.router_id));
        }
        if self.auth_type().is_none() {
            return Err(ValidationError::InvalidAuthType(self.au_type));
        }

        Ok(())
    }

    fn pkt_type(&self) -> PacketType {
        self.pkt_type
    }

    fn router_id(&self) -> Ipv4Addr {
        self.router_id
    }

    fn area_id(&self) -> Ipv4Addr {
        self.area_id
    }

    fn length(&self) -> u16 {
        self.length
    }

    fn set_length(&mut self, length: u16) {
        self.length = length;
    }

    fn cksum(&self) -> u16 {
        self.cksum
    }

    fn set_cksum(&mut self, cksum: u16) {
        self.cksum = cksum;
    }
}

// ===== impl Hello =====

impl Hello {
    pub const BASE_LENGTH: u16 = 20;
}

impl PacketBase<Ospfv2> for Hello {
    const PKT_TYPE: PacketType = PacketType::Hello;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::BASE_LENGTH as usize {
            return Err(DecodeError::InvalidLength(buf.len() as u16));
        }

        let network_mask = buf.get_ipv4();
        let hello_interval = buf.get_u16();
        // Ignore unknown options.
        let options = Options::from_bits_truncate(buf.get_u8());
        let priority = buf.get_u8();
        let dead_interval = buf.get_u32();
        let dr = buf.get_opt_ipv4();
        let bdr = buf.get_opt_ipv4();

        // The number of neighbors is implied by the packet length.
        let nbrs_cnt = buf.remaining() / 4;
        let neighbors = (0..nbrs_cnt).map(|_| buf.get_ipv4()).collect();

        Ok(Hello {
            network_mask,
            hello_interval,
            options,
            priority,
            dead_interval,
            dr,
            bdr,
            neighbors,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_ipv4(&self.network_mask);
        buf.put_u16(self.hello_interval);
        buf.put_u8(self.options.bits());
        buf.put_u8(self.priority);
        buf.put_u32(self.dead_interval);
        buf.put_opt_ipv4(&self.dr);
        buf.put_opt_ipv4(&self.bdr);
        for nbr in &self.neighbors {
            buf.put_ipv4(nbr);
        }
    }

    fn validate(&self) -> ValidationResult<()> {
        if !self.network_mask.is_netmask() {
            return Err(ValidationError::InvalidNetworkMask(
                self.network_mask,
            ));
        }
        if self.hello_interval == 0 {
            return Err(ValidationError::InvalidHelloInterval(
                self.hello_interval,
            ));
        }
        if self.dead_interval == 0 {
            return Err(ValidationError::InvalidDeadInterval(
                self.dead_interval,
            ));
        }

        Ok(())
    }
}

// ===== impl DbDesc =====

impl DbDesc {
    pub const BASE_LENGTH: u16 = 8;
}

impl PacketBase<Ospfv2> for DbDesc {
    const PKT_TYPE: PacketType = PacketType::DbDesc;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::BASE_LENGTH as usize {
            return Err(DecodeError::InvalidLength(buf.len() as u16));
        }

        let mtu = buf.get_u16();
        let options = Options::from_bits_truncate(buf.get_u8());
        let dd_flags = DbDescFlags::from_bits_truncate(buf.get_u8());
        let dd_seq_no = buf.get_u32();

        // Parse list of LSA headers.
        let mut lsa_hdrs = vec![];
        let lsa_hdrs_cnt = buf.remaining() / LsaHdr::LENGTH as usize;
        for _ in 0..lsa_hdrs_cnt {
            let lsa_hdr = LsaHdr::decode(buf)?;
            lsa_hdrs.push(lsa_hdr);
        }

        Ok(DbDesc {
            mtu,
            options,
            dd_flags,
            dd_seq_no,
            lsa_hdrs,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(self.mtu);
        buf.put_u8(self.options.bits());
        buf.put_u8(self.dd_flags.bits());
        buf.put_u32(self.dd_seq_no);
        for lsa_hdr in &self.lsa_hdrs {
            lsa_hdr.encode(buf);
        }
    }
}

// ===== impl Ospfv2 =====

impl PacketVersion<Self> for Ospfv2 {
    type PacketOptions = Options;
    type PacketHdr = PacketHdr;
    type PacketHello = Hello;
    type PacketDbDesc = DbDesc;
}
