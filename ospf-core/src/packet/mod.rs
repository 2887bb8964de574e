//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod creator;
pub mod error;
pub mod lsa;
pub mod reader;

use std::net::Ipv4Addr;
use std::ops::Range;

use bitflags::bitflags;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use num_derive::FromPrimitive;
use ospf_utils::bytes::TLS_BUF;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::packet::error::{DecodeError, DecodeResult, ValidationResult};
use crate::packet::lsa::{Lsa, LsaHdrVersion, LsaKey, LsaTypeVersion};
use crate::version::Version;

// Database Description flags.
bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct DbDescFlags: u8 {
        const MS = 0x01;
        const M = 0x02;
        const I = 0x04;
    }
}

// OSPF Packet Type.
//
// IANA registry:
// https://www.iana.org/assignments/ospfv2-parameters/ospfv2-parameters.xhtml#ospfv2-parameters-3
#[derive(Clone, Copy, Debug, Eq, Hash, FromPrimitive, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum PacketType {
    Hello = 0x01,
    DbDesc = 0x02,
    LsRequest = 0x03,
    LsUpdate = 0x04,
    LsAck = 0x05,
}

// OSPF packet.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(bound = "V: Version")]
pub struct Packet<V: Version> {
    pub hdr: V::PacketHdr,
    pub body: PacketBody<V>,
}

// OSPF packet body.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(bound = "V: Version")]
pub enum PacketBody<V: Version> {
    Hello(V::PacketHello),
    DbDesc(V::PacketDbDesc),
    LsRequest(LsRequest<V>),
    LsUpdate(LsUpdate<V>),
    LsAck(LsAck<V>),
}

//
// OSPF Link State Request packet.
//
// Encoding format (packet body, OSPFv2):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                          LS type                              |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Link State ID                           |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                     Advertising Router                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                              ...                              |
//
// OSPFv3 splits the LS type word into 16 reserved bits and a 16-bit LS type.
//
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(bound = "V: Version")]
pub struct LsRequest<V: Version> {
    pub entries: Vec<LsaKey<V::LsaType>>,
}

//
// OSPF Link State Update packet.
//
// Encoding format (packet body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                            # LSAs                             |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                                                               |
// +-                                                            +-+
// |                             LSAs                              |
// +-                                                            +-+
// |                              ...                              |
//
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(bound = "V: Version")]
pub struct LsUpdate<V: Version> {
    pub lsas: Vec<Lsa<V>>,
}

//
// OSPF Link State Acknowledgment packet.
//
// Encoding format (packet body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                                                               |
// +-                                                             -+
// |                                                               |
// +-                         An LSA Header                       -+
// |                                                               |
// +-                                                             -+
// |                                                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                              ...                              |
//
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(bound = "V: Version")]
pub struct LsAck<V: Version> {
    pub lsa_hdrs: Vec<V::LsaHdr>,
}

// OSPF version-specific code.
pub trait PacketVersion<V: Version> {
    type PacketOptions: Send
        + Sync
        + Clone
        + Copy
        + Default
        + Eq
        + PartialEq
        + std::fmt::Debug
        + Serialize
        + DeserializeOwned;
    type PacketHdr: PacketHdrVersion<V>;
    type PacketHello: PacketBase<V>;
    type PacketDbDesc: PacketBase<V>;
}

// OSPF version-specific code.
pub trait PacketHdrVersion<V: Version>
where
    Self: Send
        + Sync
        + Clone
        + Eq
        + PartialEq
        + std::fmt::Debug
        + Serialize
        + DeserializeOwned,
{
    const LENGTH: u16;
    const CKSUM_RANGE: Range<usize> = 12..14;

    // Decode OSPF packet header from a bytes buffer.
    fn decode(buf: &mut Bytes) -> DecodeResult<Self>;

    // Encode OSPF packet header into a bytes buffer, using the current
    // length and checksum values.
    fn encode(&self, buf: &mut BytesMut);

    // Zero the fields of an encoded packet that are excluded from the
    // checksum computation.
    fn prepare_packet_checksum(data: &mut [u8]);

    // Verify if the header checksum is correct.
    fn verify_cksum(data: &[u8]) -> DecodeResult<()>;

    // Validate the header fields.
    fn validate(&self) -> ValidationResult<()>;

    // Return the packet type.
    fn pkt_type(&self) -> PacketType;

    // Return the packet Router ID.
    fn router_id(&self) -> Ipv4Addr;

    // Return the packet Area ID.
    fn area_id(&self) -> Ipv4Addr;

    fn length(&self) -> u16;

    fn set_length(&mut self, length: u16);

    fn cksum(&self) -> u16;

    fn set_cksum(&mut self, cksum: u16);
}

// OSPF version-specific code.
pub trait PacketBase<V: Version>
where
    Self: Send
        + Sync
        + Clone
        + Eq
        + PartialEq
        + std::fmt::Debug
        + Serialize
        + DeserializeOwned,
{
    const PKT_TYPE: PacketType;

    // Decode OSPF packet body from a bytes buffer.
    fn decode(buf: &mut Bytes) -> DecodeResult<Self>;

    // Encode OSPF packet body into a bytes buffer.
    fn encode(&self, buf: &mut BytesMut);

    // Validate the packet body fields.
    fn validate(&self) -> ValidationResult<()> {
        Ok(())
    }
}

// ===== impl PacketType =====

impl std::fmt::Display for PacketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PacketType::Hello => write!(f, "Hello"),
            PacketType::DbDesc => write!(f, "Database Description"),
            PacketType::LsRequest => write!(f, "Link State Request"),
            PacketType::LsUpdate => write!(f, "Link State Update"),
            PacketType::LsAck => write!(f, "Link State Ack"),
        }
    }
}

// ===== impl Packet =====

impl<V> Packet<V>
where
    V: Version,
{
    // Decodes OSPF packet from a bytes buffer.
    pub fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        // Create a zero-copy duplicate of the original packet buffer.
        let buf_orig = buf.clone();

        // Decode the packet header.
        let hdr = V::PacketHdr::decode(buf)?;
        let pkt_len = hdr.length();
        if pkt_len as usize > buf_orig.len() {
            return Err(DecodeError::InvalidLength(pkt_len));
        }

        // Verify if the packet checksum is correct.
        V::PacketHdr::verify_cksum(&buf_orig[..pkt_len as usize])?;

        // Decode the packet body.
        let mut buf =
            buf.slice(..pkt_len as usize - V::PacketHdr::LENGTH as usize);
        let body = match hdr.pkt_type() {
            PacketType::Hello => {
                PacketBody::Hello(V::PacketHello::decode(&mut buf)?)
            }
            PacketType::DbDesc => {
                PacketBody::DbDesc(V::PacketDbDesc::decode(&mut buf)?)
            }
            PacketType::LsRequest => {
                PacketBody::LsRequest(LsRequest::decode(&mut buf)?)
            }
            PacketType::LsUpdate => {
                PacketBody::LsUpdate(LsUpdate::decode(&mut buf)?)
            }
            PacketType::LsAck => PacketBody::LsAck(LsAck::decode(&mut buf)?),
        };

        Ok(Packet { hdr, body })
    }

    // Encodes OSPF packet into a bytes buffer, using the length and checksum
    // currently held by the header.
    pub fn encode(&self) -> Bytes {
        TLS_BUF.with(|buf| {
            let mut buf = buf.borrow_mut();
            buf.clear();
            self.hdr.encode(&mut buf);
            self.body.encode(&mut buf);
            buf.clone().freeze()
        })
    }
}

// ===== impl PacketBody =====

impl<V> PacketBody<V>
where
    V: Version,
{
    pub fn pkt_type(&self) -> PacketType {
        match self {
            PacketBody::Hello(..) => {
                <V::PacketHello as PacketBase<V>>::PKT_TYPE
            }
            PacketBody::DbDesc(..) => {
                <V::PacketDbDesc as PacketBase<V>>::PKT_TYPE
            }
            PacketBody::LsRequest(..) => {
                <LsRequest<V> as PacketBase<V>>::PKT_TYPE
            }
            PacketBody::LsUpdate(..) => {
                <LsUpdate<V> as PacketBase<V>>::PKT_TYPE
            }
            PacketBody::LsAck(..) => <LsAck<V> as PacketBase<V>>::PKT_TYPE,
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            PacketBody::Hello(body) => body.encode(buf),
            PacketBody::DbDesc(body) => body.encode(buf),
            PacketBody::LsRequest(body) => body.encode(buf),
            PacketBody::LsUpdate(body) => body.encode(buf),
            PacketBody::LsAck(body) => body.encode(buf),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        match self {
            PacketBody::Hello(body) => body.validate(),
            PacketBody::DbDesc(body) => body.validate(),
            PacketBody::LsRequest(body) => body.validate(),
            PacketBody::LsUpdate(body) => body.validate(),
            PacketBody::LsAck(body) => body.validate(),
        }
    }
}

// ===== impl LsRequest =====

impl<V> LsRequest<V>
where
    V: Version,
{
    pub const ENTRY_LENGTH: u16 = 12;

    // Appends an entry, normalizing its LS type first.
    pub fn add_entry(
        &mut self,
        lsa_type: V::LsaType,
        lsa_id: Ipv4Addr,
        adv_rtr: Ipv4Addr,
    ) {
        let lsa_type = lsa_type.request_type();
        self.entries.push(LsaKey::new(lsa_type, adv_rtr, lsa_id));
    }
}

impl<V> Default for LsRequest<V>
where
    V: Version,
{
    fn default() -> Self {
        LsRequest { entries: vec![] }
    }
}

impl<V> PacketBase<V> for LsRequest<V>
where
    V: Version,
{
    const PKT_TYPE: PacketType = PacketType::LsRequest;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let mut entries = vec![];
        let entries_cnt = buf.remaining() / Self::ENTRY_LENGTH as usize;
        for _ in 0..entries_cnt {
            let lsa_type = V::LsaType::decode_request(buf);
            let lsa_id = Ipv4Addr::from(buf.get_u32());
            let adv_rtr = Ipv4Addr::from(buf.get_u32());
            entries.push(LsaKey::new(lsa_type, adv_rtr, lsa_id));
        }

        Ok(LsRequest { entries })
    }

    fn encode(&self, buf: &mut BytesMut) {
        for entry in &self.entries {
            entry.lsa_type.encode_request(buf);
            buf.put_u32(entry.lsa_id.into());
            buf.put_u32(entry.adv_rtr.into());
        }
    }
}

// ===== impl LsUpdate =====

impl<V> LsUpdate<V>
where
    V: Version,
{
    pub const BASE_LENGTH: u16 = 4;
}

impl<V> Default for LsUpdate<V>
where
    V: Version,
{
    fn default() -> Self {
        LsUpdate { lsas: vec![] }
    }
}

impl<V> PacketBase<V> for LsUpdate<V>
where
    V: Version,
{
    const PKT_TYPE: PacketType = PacketType::LsUpdate;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::BASE_LENGTH as usize {
            return Err(DecodeError::InvalidLength(buf.len() as u16));
        }

        // Parse list of LSAs. Each LSA is located using the length declared
        // in its header.
        let mut lsas = vec![];
        let lsas_cnt = buf.get_u32();
        for _ in 0..lsas_cnt {
            let lsa = Lsa::decode(buf)?;
            lsas.push(lsa);
        }

        Ok(LsUpdate { lsas })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.lsas.len() as u32);
        for lsa in &self.lsas {
            lsa.encode(buf);
        }
    }

    fn validate(&self) -> ValidationResult<()> {
        self.lsas.iter().try_for_each(|lsa| lsa.validate())
    }
}

// ===== impl LsAck =====

impl<V> Default for LsAck<V>
where
    V: Version,
{
    fn default() -> Self {
        LsAck { lsa_hdrs: vec![] }
    }
}

impl<V> PacketBase<V> for LsAck<V>
where
    V: Version,
{
    const PKT_TYPE: PacketType = PacketType::LsAck;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        // Parse list of LSA headers.
        let mut lsa_hdrs = vec![];
        let lsa_hdrs_cnt = buf.remaining() / V::LsaHdr::LENGTH as usize;
        for _ in 0..lsa_hdrs_cnt {
            let lsa_hdr = V::LsaHdr::decode(buf)?;
            lsa_hdrs.push(lsa_hdr);
        }

        Ok(LsAck { lsa_hdrs })
    }

    fn encode(&self, buf: &mut BytesMut) {
        for lsa_hdr in &self.lsa_hdrs {
            lsa_hdr.encode(buf);
        }
    }
}
