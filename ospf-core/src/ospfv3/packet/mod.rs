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
use num_traits::FromPrimitive;
use ospf_utils::bytes::{BytesExt, BytesMutExt};
use ospf_utils::ip::Ipv4AddrExt;
use serde::{Deserialize, Serialize};

use crate::ospfv3::packet::lsa::LsaHdr;
use crate::packet::error::{
    DecodeError, DecodeResult, ValidationError, ValidationResult,
};
use crate::packet::lsa::LsaHdrVersion;
use crate::packet::{
    DbDescFlags, PacketBase, PacketHdrVersion, PacketType, PacketVersion,
};
use crate::version::{Ospfv3, Version};

// OSPFv3 Options field.
//
// IANA registry:
// https://www.iana.org/assignments/ospfv3-parameters/ospfv3-parameters.xhtml#ospfv3-parameters-1
bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct Options: u16 {
        const V6 = 0x0001;
        const E = 0x0002;
        const N = 0x0008;
        const R = 0x0010;
        const DC = 0x0020;
        const AF = 0x0100;
        const L = 0x0200;
        const AT = 0x0400;
    }
}

//
// OSPFv3 packet header.
//
// Encoding format:
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |   Version #   |     Type      |         Packet length         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                         Router ID                             |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                          Area ID                              |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |          Checksum             |  Instance ID  |      0        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct PacketHdr {
    pub pkt_type: PacketType,
    pub length: u16,
    pub router_id: Ipv4Addr,
    pub area_id: Ipv4Addr,
    pub cksum: u16,
    pub instance_id: u8,
}

//
// OSPFv3 Hello packet.
//
// Encoding format (packet body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                        Interface ID                           |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// | Rtr Priority  |             Options                           |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |        HelloInterval          |       RouterDeadInterval      |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                   Designated Router ID                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                Backup Designated Router ID                    |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                         Neighbor ID                           |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                        ...                                    |
//
#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Deserialize, Serialize)]
pub struct Hello {
    pub iface_id: u32,
    pub priority: u8,
    pub options: Options,
    pub hello_interval: u16,
    pub dead_interval: u16,
    pub dr: Option<Ipv4Addr>,
    pub bdr: Option<Ipv4Addr>,
    pub neighbors: Vec<Ipv4Addr>,
}

//
// OSPFv3 Database Description packet.
//
// Encoding format (packet body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |       0       |               Options                         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |        Interface MTU          |      0        |0|0|0|0|0|I|M|MS
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    DD sequence number                         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                                                               |
// +-                                                             -+
// |                                                               |
// +-                     An LSA Header                           -+
// |                                                               |
// +-                                                             -+
// |                                                               |
// +-                                                             -+
// |                                                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       ...                                     |
//
#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Deserialize, Serialize)]
pub struct DbDesc {
    pub options: Options,
    pub mtu: u16,
    pub dd_flags: DbDescFlags,
    pub dd_seq_no: u32,
    pub lsa_hdrs: Vec<LsaHdr>,
}

// ===== impl Options =====

impl Options {
    pub(crate) fn decode(buf: &mut Bytes) -> Self {
        // Ignore unknown options.
        let _ = buf.get_u8();
        Options::from_bits_truncate(buf.get_u16())
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(0);
        buf.put_u16(self.bits());
    }
}

// ===== impl PacketHdr =====

impl PacketHdr {
    pub fn new(
        pkt_type: u8,
        router_id: Ipv4Addr,
        area_id: Ipv4Addr,
        instance_id: u8,
    ) -> ValidationResult<Self> {
        let pkt_type = PacketType::from_u8(pkt_type)
            .ok_or(ValidationError::InvalidPacketType(pkt_type))?;
        let hdr = PacketHdr {
            pkt_type,
            length: Self::LENGTH,
            router_id,
            area_id,
            cksum: 0,
            instance_id,
        };
        hdr.validate()?;
        Ok(hdr)
    }
}

impl PacketHdrVersion<Ospfv3> for PacketHdr {
    const LENGTH: u16 = 16;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::LENGTH as usize {
            return Err(DecodeError::InvalidLength(buf.len() as u16));
        }

        // Parse version.
        let version = buf.get_u8();
        if version != Ospfv3::VERSION {
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
        let instance_id = buf.get_u8();
        let _ = buf.get_u8();

        Ok(PacketHdr {
            pkt_type,
            length,
            router_id,
            area_id,
            cksum,
            instance_id,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(Ospfv3::VERSION);
        buf.put_u8(self.pkt_type as u8);
        buf.put_u16(self.length);
        buf.put_ipv4(&self.router_id);
        buf.put_ipv4(&self.area_id);
        buf.put_u16(self.cksum);
        buf.put_u8(self.instance_id);
        buf.put_u8(0);
    }

    fn prepare_packet_checksum(data: &mut [u8]) {
        data[Self::CKSUM_RANGE].fill(0);
    }

    fn verify_cksum(_data: &[u8]) -> DecodeResult<()> {
        // The checksum covers an IPv6 pseudo-header that is only known to
        // the kernel, which already verified it.
        Ok(())
    }

    fn validate(&self) -> ValidationResult<()> {
        if !self.router_id.is_usable() {
            return Err(ValidationError::InvalidRouterId(self.router_id));
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

impl PacketBase<Ospfv3> for Hello {
    const PKT_TYPE: PacketType = PacketType::Hello;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::BASE_LENGTH as usize {
            return Err(DecodeError::InvalidLength(buf.len() as u16));
        }

        let iface_id = buf.get_u32();
        let priority = buf.get_u8();
        let options = Options::decode(buf);
        let hello_interval = buf.get_u16();
        let dead_interval = buf.get_u16();
        let dr = buf.get_opt_ipv4();
        let bdr = buf.get_opt_ipv4();

        // The number of neighbors is implied by the packet length.
        let nbrs_cnt = buf.remaining() / 4;
        let neighbors = (0..nbrs_cnt).map(|_| buf.get_ipv4()).collect();

        Ok(Hello {
            iface_id,
            priority,
            options,
            hello_interval,
            dead_interval,
            dr,
            bdr,
            neighbors,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.iface_id);
        buf.put_u8(self.priority);
        self.options.encode(buf);
        buf.put_u16(self.hello_interval);
        buf.put_u16(self.dead_interval);
        buf.put_opt_ipv4(&self.dr);
        buf.put_opt_ipv4(&self.bdr);
        for nbr in &self.neighbors {
            buf.put_ipv4(nbr);
        }
    }

    fn validate(&self) -> ValidationResult<()> {
        if self.hello_interval == 0 {
            return Err(ValidationError::InvalidHelloInterval(
                self.hello_interval,
            ));
        }
        if self.dead_interval == 0 {
            return Err(ValidationError::InvalidDeadInterval(
                self.dead_interval.into(),
            ));
        }

        Ok(())
    }
}

// ===== impl DbDesc =====

impl DbDesc {
    pub const BASE_LENGTH: u16 = 12;
}

impl PacketBase<Ospfv3> for DbDesc {
    const PKT_TYPE: PacketType = PacketType::DbDesc;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::BASE_LENGTH as usize {
            return Err(DecodeError::InvalidLength(buf.len() as u16));
        }

        let _ = buf.get_u8();
        let options = Options::decode(buf);
        let mtu = buf.get_u16();
        let _ = buf.get_u8();
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
            options,
            mtu,
            dd_flags,
            dd_seq_no,
            lsa_hdrs,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(0);
        self.options.encode(buf);
        buf.put_u16(self.mtu);
        buf.put_u8(0);
        buf.put_u8(self.dd_flags.bits());
        buf.put_u32(self.dd_seq_no);
        for lsa_hdr in &self.lsa_hdrs {
            lsa_hdr.encode(buf);
        }
    }
}

// ===== impl Ospfv3 =====

impl PacketVersion<Self> for Ospfv3 {
    type PacketOptions = Options;
    type PacketHdr = PacketHdr;
    type PacketHello = Hello;
    type PacketDbDesc = DbDesc;
}
