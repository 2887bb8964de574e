//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use derive_new::new;
use ospf_utils::bytes::{BytesExt, BytesMutExt};
use ospf_utils::checksum;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::packet::error::{
    DecodeError, DecodeResult, ValidationError, ValidationResult,
};
use crate::version::Version;

// Largest value of the 24-bit metric fields.
pub const LSA_INFINITY: u32 = 0x00ff_ffff;

// OSPF LSA.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(bound = "V: Version")]
pub struct Lsa<V: Version> {
    // LSA raw bytes.
    #[serde(skip)]
    pub raw: Bytes,
    // LSA header.
    pub hdr: V::LsaHdr,
    // LSA body.
    pub body: V::LsaBody,
}

// OSPF LSA key. It serves both as a global LSA identifier and as the entry
// of Link State Request packets.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, new)]
#[derive(Deserialize, Serialize)]
pub struct LsaKey<T: LsaTypeVersion> {
    // LSA type.
    #[serde(bound = "T: LsaTypeVersion")]
    pub lsa_type: T,
    // LSA advertising router.
    pub adv_rtr: Ipv4Addr,
    // LSA ID.
    pub lsa_id: Ipv4Addr,
}

//
// Extension ABR-LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |       0       |                    metric                     |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                      Neighbor Router ID                       |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                              ...                              |
//
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaAbr {
    pub entries: Vec<LsaAbrEntry>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, new)]
#[derive(Deserialize, Serialize)]
pub struct LsaAbrEntry {
    pub metric: u32,
    pub nbr_router_id: Ipv4Addr,
}

// LSA of unknown type, kept opaque.
#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Deserialize, Serialize)]
pub struct LsaUnknown<T: LsaTypeVersion> {
    #[serde(bound = "T: LsaTypeVersion")]
    pub lsa_type: T,
    pub data: Bytes,
}

// OSPF version-specific code.
pub trait LsaVersion<V: Version> {
    type LsaType: LsaTypeVersion;
    type LsaHdr: LsaHdrVersion<V>;
    type LsaBody: LsaBodyVersion<V>;
}

// OSPF version-specific code.
pub trait LsaTypeVersion
where
    Self: Send
        + Sync
        + Clone
        + Copy
        + Eq
        + Ord
        + PartialEq
        + PartialOrd
        + std::fmt::Debug
        + std::fmt::Display
        + std::hash::Hash
        + Serialize
        + DeserializeOwned,
{
    // Decode the LS type field of a Link State Request entry.
    fn decode_request(buf: &mut Bytes) -> Self;

    // Encode the LS type field of a Link State Request entry.
    fn encode_request(&self, buf: &mut BytesMut);

    // Return the LS type to be used when requesting this LSA.
    fn request_type(self) -> Self {
        self
    }
}

// OSPF version-specific code.
pub trait LsaHdrVersion<V: Version>
where
    Self: Send
        + Sync
        + Clone
        + Copy
        + Eq
        + PartialEq
        + std::fmt::Debug
        + Serialize
        + DeserializeOwned,
{
    const LENGTH: u16;

    fn new(
        age: u16,
        options: Option<V::PacketOptions>,
        lsa_type: V::LsaType,
        lsa_id: Ipv4Addr,
        adv_rtr: Ipv4Addr,
        seq_no: u32,
    ) -> Self;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self>;

    fn encode(&self, buf: &mut BytesMut);

    fn lsa_type(&self) -> V::LsaType;

    fn lsa_id(&self) -> Ipv4Addr;

    fn adv_rtr(&self) -> Ipv4Addr;

    fn age(&self) -> u16;

    fn seq_no(&self) -> u32;

    fn cksum(&self) -> u16;

    fn set_cksum(&mut self, value: u16);

    fn length(&self) -> u16;

    fn set_length(&mut self, length: u16);

    fn key(&self) -> LsaKey<V::LsaType> {
        LsaKey {
            lsa_type: self.lsa_type(),
            adv_rtr: self.adv_rtr(),
            lsa_id: self.lsa_id(),
        }
    }
}

// OSPF version-specific code.
pub trait LsaBodyVersion<V: Version>
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
    fn decode(lsa_type: V::LsaType, buf: &mut Bytes) -> DecodeResult<Self>;

    fn encode(&self, buf: &mut BytesMut);

    fn lsa_type(&self) -> V::LsaType;

    fn validate(&self) -> ValidationResult<()>;
}

// ===== impl Lsa =====

impl<V> Lsa<V>
where
    V: Version,
{
    // Offset of the checksum field, once the Age field is skipped.
    const CKSUM_OFFSET: usize = 14;

    pub fn new(
        age: u16,
        options: Option<V::PacketOptions>,
        lsa_id: Ipv4Addr,
        adv_rtr: Ipv4Addr,
        seq_no: u32,
        body: V::LsaBody,
    ) -> ValidationResult<Self> {
        // Build LSA header (the length and checksum are computed later).
        let mut hdr = V::LsaHdr::new(
            age,
            options,
            body.lsa_type(),
            lsa_id,
            adv_rtr,
            seq_no,
        );

        // Encode LSA in network byte order.
        let mut buf = BytesMut::with_capacity(128);
        hdr.encode(&mut buf);
        body.encode(&mut buf);

        // Rewrite LSA length.
        let lsa_len = u16::try_from(buf.len())
            .map_err(|_| ValidationError::LsaTooLarge(buf.len()))?;
        buf[18..20].copy_from_slice(&lsa_len.to_be_bytes());
        hdr.set_length(lsa_len);

        // Compute LSA checksum, skipping the Age field.
        let cksum = checksum::fletcher_checksum(&buf[2..], Self::CKSUM_OFFSET);
        buf[16..18].copy_from_slice(&cksum);
        hdr.set_cksum(u16::from_be_bytes(cksum));

        Ok(Lsa {
            raw: buf.freeze(),
            hdr,
            body,
        })
    }

    // Decodes LSA from a bytes buffer.
    //
    // The buffer is advanced by the length declared in the LSA header.
    pub fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        // Decode LSA header.
        let buf_orig = buf.clone();
        if buf.remaining() < V::LsaHdr::LENGTH as usize {
            return Err(DecodeError::InvalidLength(buf.len() as u16));
        }
        let hdr = V::LsaHdr::decode(buf)?;
        let lsa_len = hdr.length();
        if lsa_len < V::LsaHdr::LENGTH {
            return Err(DecodeError::InvalidLsaLength);
        }
        let lsa_body_len = lsa_len - V::LsaHdr::LENGTH;

        // Decode LSA body.
        if buf.remaining() < lsa_body_len as usize {
            return Err(DecodeError::InvalidLsaLength);
        }
        let mut buf_lsa = buf.copy_to_bytes(lsa_body_len as usize);
        let body = V::LsaBody::decode(hdr.lsa_type(), &mut buf_lsa)?;

        Ok(Lsa {
            raw: buf_orig.slice(0..lsa_len as usize),
            hdr,
            body,
        })
    }

    // Encodes LSA into a bytes buffer.
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.raw);
    }

    // Checks whether the LSA checksum is valid.
    pub fn is_checksum_valid(&self) -> bool {
        self.raw.len() > 2 && checksum::verify_fletcher_checksum(&self.raw[2..])
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if !self.is_checksum_valid() {
            return Err(ValidationError::InvalidLsaChecksum(
                self.hdr.lsa_id(),
                self.hdr.adv_rtr(),
            ));
        }
        self.body.validate()
    }
}

// ===== impl LsaAbr =====

impl LsaAbr {
    pub const ENTRY_LENGTH: usize = 8;

    // Appends an entry, unless one for the same neighbor already exists.
    pub fn add_entry(
        &mut self,
        metric: u32,
        nbr_router_id: Ipv4Addr,
    ) -> ValidationResult<()> {
        if metric > LSA_INFINITY {
            return Err(ValidationError::InvalidMetric(metric));
        }
        if self.get_entry(nbr_router_id).is_none() {
            self.entries.push(LsaAbrEntry::new(metric, nbr_router_id));
        }
        Ok(())
    }

    pub fn get_entry(&self, nbr_router_id: Ipv4Addr) -> Option<&LsaAbrEntry> {
        self.entries
            .iter()
            .find(|entry| entry.nbr_router_id == nbr_router_id)
    }

    pub fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let mut lsa = LsaAbr::default();
        let entries_cnt = buf.remaining() / Self::ENTRY_LENGTH;
        for _ in 0..entries_cnt {
            let _ = buf.get_u8();
            let metric = buf.get_u24();
            let nbr_router_id = buf.get_ipv4();

            // Only the first record of each neighbor is kept.
            if lsa.get_entry(nbr_router_id).is_none() {
                lsa.entries.push(LsaAbrEntry::new(metric, nbr_router_id));
            }
        }

        Ok(lsa)
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        for entry in &self.entries {
            buf.put_u8(0);
            buf.put_u24(entry.metric);
            buf.put_ipv4(&entry.nbr_router_id);
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        match self.entries.iter().find(|entry| entry.metric > LSA_INFINITY) {
            Some(entry) => Err(ValidationError::InvalidMetric(entry.metric)),
            None => Ok(()),
        }
    }
}

// ===== impl LsaUnknown =====

impl<T> LsaUnknown<T>
where
    T: LsaTypeVersion,
{
    pub fn decode(lsa_type: T, buf: &mut Bytes) -> DecodeResult<Self> {
        let data = buf.copy_to_bytes(buf.remaining());
        Ok(LsaUnknown { lsa_type, data })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.data);
    }
}
