//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::{Ipv4Addr, Ipv6Addr};

use bitflags::bitflags;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use derive_new::new;
use enum_as_inner::EnumAsInner;
use ipnetwork::Ipv6Network;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use ospf_utils::bytes::{BytesExt, BytesMutExt};
use ospf_utils::ip::Ipv6NetworkExt;
use serde::{Deserialize, Serialize};

use crate::ospfv3::packet::Options;
use crate::packet::error::{
    DecodeError, DecodeResult, ValidationError, ValidationResult,
};
use crate::packet::lsa::{
    LSA_INFINITY, LsaAbr, LsaBodyVersion, LsaHdrVersion, LsaTypeVersion,
    LsaUnknown, LsaVersion,
};
use crate::version::Ospfv3;

// The PrefixOptions Field.
//
// IANA registry:
// https://www.iana.org/assignments/ospfv3-parameters/ospfv3-parameters.xhtml#ospfv3-parameters-4
bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct PrefixOptions: u8 {
        const NU = 0x01;
        const LA = 0x02;
        const P = 0x08;
        const DN = 0x10;
    }
}

// OSPFv3 LSA type.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct LsaType(pub u16);

// Area flooding scope bits of the LS type.
const AREA_SCOPE: u16 = 0x2000;

// OSPFv3 LSA type code (flooding scope included).
//
// IANA registry:
// https://www.iana.org/assignments/ospfv3-parameters/ospfv3-parameters.xhtml#ospfv3-parameters-3
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum LsaTypeCode {
    Router = 0x2001,
    Network = 0x2002,
    InterAreaPrefix = 0x2003,
    Link = 0x0008,
    IntraAreaPrefix = 0x2009,
    ExtensionAbr = 0x200C,
}

//
// OSPFv3 LSA header.
//
// Encoding format:
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |           LS Age              |           LS Type             |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Link State ID                           |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    Advertising Router                         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    LS Sequence Number                         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |        LS Checksum            |             Length            |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaHdr {
    pub age: u16,
    pub lsa_type: LsaType,
    pub lsa_id: Ipv4Addr,
    pub adv_rtr: Ipv4Addr,
    pub seq_no: u32,
    pub cksum: u16,
    pub length: u16,
}

// OSPFv3 LSA.
#[derive(Clone, Debug, Eq, PartialEq, EnumAsInner)]
#[derive(Deserialize, Serialize)]
pub enum LsaBody {
    Router(LsaRouter),
    Network(LsaNetwork),
    InterAreaPrefix(LsaInterAreaPrefix),
    Link(LsaLink),
    IntraAreaPrefix(LsaIntraAreaPrefix),
    ExtensionAbr(LsaAbr),
    Unknown(LsaUnknown<LsaType>),
}

//
// OSPFv3 Router-LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |  0  |Nt|x|V|E|B|            Options                            |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |     Type       |       0       |          Metric              |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                      Interface ID                              |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                   Neighbor Interface ID                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    Neighbor Router ID                          |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                             ...                                |
//
#[derive(Clone, Debug, Default, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaRouter {
    pub flags: LsaRouterFlags,
    pub options: Options,
    pub links: Vec<LsaRouterLink>,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct LsaRouterFlags: u8 {
        const B = 0x01;
        const E = 0x02;
        const V = 0x04;
    }
}

// OSPFv3 Router LSA Link Types.
//
// IANA registry:
// https://www.iana.org/assignments/ospfv3-parameters/ospfv3-parameters.xhtml#ospfv3-parameters-6
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum LsaRouterLinkType {
    PointToPoint = 0x01,
    TransitNetwork = 0x02,
    VirtualLink = 0x04,
}

#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Deserialize, Serialize)]
pub struct LsaRouterLink {
    pub link_type: LsaRouterLinkType,
    pub metric: u16,
    pub iface_id: u32,
    pub nbr_iface_id: u32,
    pub nbr_router_id: Ipv4Addr,
}

//
// OSPFv3 Network-LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |      0        |              Options                          |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Attached Router                         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                             ...                               |
//
#[derive(Clone, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaNetwork {
    pub options: Options,
    pub attached_rtrs: Vec<Ipv4Addr>,
}

//
// OSPFv3 Inter-Area-Prefix LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |      0        |                  Metric                       |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// | PrefixLength  | PrefixOptions |              0                |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                        Address Prefix                         |
// |                             ...                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaInterAreaPrefix {
    pub metric: u32,
    pub prefix_options: PrefixOptions,
    pub prefix: Ipv6Network,
}

//
// OSPFv3 Link LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// | Rtr Priority  |                Options                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                                                               |
// +-                                                             -+
// |                                                               |
// +-                Link-local Interface Address                 -+
// |                                                               |
// +-                                                             -+
// |                                                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                         # prefixes                            |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |  PrefixLength | PrefixOptions |             0                 |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                        Address Prefix                         |
// |                             ...                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                             ...                               |
//
#[derive(Clone, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaLink {
    pub priority: u8,
    pub options: Options,
    pub linklocal: Ipv6Addr,
    pub prefixes: Vec<LsaLinkPrefix>,
}

#[derive(Clone, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaLinkPrefix {
    pub options: PrefixOptions,
    pub value: Ipv6Network,
}

//
// OSPFv3 Intra-Area-Prefix LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |         # Prefixes            |     Referenced LS Type        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                  Referenced Link State ID                     |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |               Referenced Advertising Router                   |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |  PrefixLength | PrefixOptions |          Metric               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Address Prefix                          |
// |                             ...                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                             ...                               |
//
#[derive(Clone, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaIntraAreaPrefix {
    pub ref_lsa_type: LsaType,
    pub ref_lsa_id: Ipv4Addr,
    pub ref_adv_rtr: Ipv4Addr,
    pub prefixes: Vec<LsaIntraAreaPrefixEntry>,
}

#[derive(Clone, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaIntraAreaPrefixEntry {
    pub options: PrefixOptions,
    pub value: Ipv6Network,
    pub metric: u16,
}

// ===== impl LsaType =====

impl LsaType {
    pub fn type_code(&self) -> Option<LsaTypeCode> {
        LsaTypeCode::from_u16(self.0)
    }
}

impl LsaTypeVersion for LsaType {
    fn decode_request(buf: &mut Bytes) -> Self {
        let _ = buf.get_u16();
        LsaType(buf.get_u16())
    }

    fn encode_request(&self, buf: &mut BytesMut) {
        buf.put_u16(0);
        buf.put_u16(self.0);
    }

    // Types without flooding scope bits, other than Link-LSAs, are requested
    // with the area scope.
    fn request_type(self) -> Self {
        if self.0 < AREA_SCOPE && self.0 != LsaTypeCode::Link as u16 {
            LsaType(self.0 | AREA_SCOPE)
        } else {
            self
        }
    }
}

impl std::fmt::Display for LsaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl From<LsaTypeCode> for LsaType {
    fn from(code: LsaTypeCode) -> LsaType {
        LsaType(code as u16)
    }
}

// ===== impl LsaHdr =====

impl LsaHdrVersion<Ospfv3> for LsaHdr {
    const LENGTH: u16 = 20;

    fn new(
        age: u16,
        _options: Option<Options>,
        lsa_type: LsaType,
        lsa_id: Ipv4Addr,
        adv_rtr: Ipv4Addr,
        seq_no: u32,
    ) -> Self {
        LsaHdr {
            age,
            lsa_type,
            lsa_id,
            adv_rtr,
            seq_no,
            cksum: 0,
            length: 0,
        }
    }

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::LENGTH as usize {
            return Err(DecodeError::InvalidLsaLength);
        }

        let age = buf.get_u16();
        let lsa_type = LsaType(buf.get_u16());
        let lsa_id = buf.get_ipv4();
        let adv_rtr = buf.get_ipv4();
        let seq_no = buf.get_u32();
        let cksum = buf.get_u16();
        let length = buf.get_u16();

        Ok(LsaHdr {
            age,
            lsa_type,
            lsa_id,
            adv_rtr,
            seq_no,
            cksum,
            length,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(self.age);
        buf.put_u16(self.lsa_type.0);
        buf.put_ipv4(&self.lsa_id);
        buf.put_ipv4(&self.adv_rtr);
        buf.put_u32(self.seq_no);
        buf.put_u16(self.cksum);
        buf.put_u16(self.length);
    }

    fn lsa_type(&self) -> LsaType {
        self.lsa_type
    }

    fn lsa_id(&self) -> Ipv4Addr {
        self.lsa_id
    }

    fn adv_rtr(&self) -> Ipv4Addr {
        self.adv_rtr
    }

    fn age(&self) -> u16 {
        self.age
    }

    fn seq_no(&self) -> u32 {
        self.seq_no
    }

    fn cksum(&self) -> u16 {
        self.cksum
    }

    fn set_cksum(&mut self, value: u16) {
        self.cksum = value;
    }

    fn length(&self) -> u16 {
        self.length
    }

    fn set_length(&mut self, length: u16) {
        self.length = length;
    }
}

// ===== impl LsaBody =====

impl LsaBodyVersion<Ospfv3> for LsaBody {
    fn decode(lsa_type: LsaType, buf: &mut Bytes) -> DecodeResult<Self> {
        let lsa = match lsa_type.type_code() {
            Some(LsaTypeCode::Router) => {
                LsaBody::Router(LsaRouter::decode(buf)?)
            }
            Some(LsaTypeCode::Network) => {
                LsaBody::Network(LsaNetwork::decode(buf)?)
            }
            Some(LsaTypeCode::InterAreaPrefix) => {
                LsaBody::InterAreaPrefix(LsaInterAreaPrefix::decode(buf)?)
            }
            Some(LsaTypeCode::Link) => LsaBody::Link(LsaLink::decode(buf)?),
            Some(LsaTypeCode::IntraAreaPrefix) => {
                LsaBody::IntraAreaPrefix(LsaIntraAreaPrefix::decode(buf)?)
            }
            Some(LsaTypeCode::ExtensionAbr) => {
                LsaBody::ExtensionAbr(LsaAbr::decode(buf)?)
            }
            None => LsaBody::Unknown(LsaUnknown::decode(lsa_type, buf)?),
        };

        Ok(lsa)
    }

    fn encode(&self, buf: &mut BytesMut) {
        match self {
            LsaBody::Router(lsa) => lsa.encode(buf),
            LsaBody::Network(lsa) => lsa.encode(buf),
            LsaBody::InterAreaPrefix(lsa) => lsa.encode(buf),
            LsaBody::Link(lsa) => lsa.encode(buf),
            LsaBody::IntraAreaPrefix(lsa) => lsa.encode(buf),
            LsaBody::ExtensionAbr(lsa) => lsa.encode(buf),
            LsaBody::Unknown(lsa) => lsa.encode(buf),
        }
    }

    fn lsa_type(&self) -> LsaType {
        match self {
            LsaBody::Router(_) => LsaTypeCode::Router.into(),
            LsaBody::Network(_) => LsaTypeCode::Network.into(),
            LsaBody::InterAreaPrefix(_) => LsaTypeCode::InterAreaPrefix.into(),
            LsaBody::Link(_) => LsaTypeCode::Link.into(),
            LsaBody::IntraAreaPrefix(_) => LsaTypeCode::IntraAreaPrefix.into(),
            LsaBody::ExtensionAbr(_) => LsaTypeCode::ExtensionAbr.into(),
            LsaBody::Unknown(lsa) => lsa.lsa_type,
        }
    }

    fn validate(&self) -> ValidationResult<()> {
        match self {
            LsaBody::InterAreaPrefix(lsa) => lsa.validate(),
            LsaBody::ExtensionAbr(lsa) => lsa.validate(),
            _ => Ok(()),
        }
    }
}

// ===== impl LsaRouter =====

impl LsaRouter {
    pub const BASE_LENGTH: u16 = 4;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::BASE_LENGTH as usize {
            return Err(DecodeError::InvalidLsaLength);
        }
        let flags = LsaRouterFlags::from_bits_truncate(buf.get_u8());
        let options = Options::decode(buf);

        let mut links = vec![];
        let links_cnt = buf.remaining() / LsaRouterLink::LENGTH as usize;
        for _ in 0..links_cnt {
            let link = LsaRouterLink::decode(buf)?;
            links.push(link);
        }

        Ok(LsaRouter {
            flags,
            options,
            links,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.flags.bits());
        self.options.encode(buf);
        for link in &self.links {
            link.encode(buf);
        }
    }
}

// ===== impl LsaRouterLink =====

impl LsaRouterLink {
    pub const LENGTH: u16 = 16;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let link_type = buf.get_u8();
        let link_type = match LsaRouterLinkType::from_u8(link_type) {
            Some(link_type) => link_type,
            None => return Err(DecodeError::UnknownRouterLinkType(link_type)),
        };
        let _ = buf.get_u8();
        let metric = buf.get_u16();
        let iface_id = buf.get_u32();
        let nbr_iface_id = buf.get_u32();
        let nbr_router_id = buf.get_ipv4();

        Ok(LsaRouterLink {
            link_type,
            metric,
            iface_id,
            nbr_iface_id,
            nbr_router_id,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.link_type as u8);
        buf.put_u8(0);
        buf.put_u16(self.metric);
        buf.put_u32(self.iface_id);
        buf.put_u32(self.nbr_iface_id);
        buf.put_ipv4(&self.nbr_router_id);
    }
}

// ===== impl LsaNetwork =====

impl LsaNetwork {
    pub const BASE_LENGTH: u16 = 4;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::BASE_LENGTH as usize {
            return Err(DecodeError::InvalidLsaLength);
        }
        let _ = buf.get_u8();
        let options = Options::decode(buf);

        let rtrs_cnt = buf.remaining() / 4;
        let attached_rtrs = (0..rtrs_cnt).map(|_| buf.get_ipv4()).collect();

        Ok(LsaNetwork {
            options,
            attached_rtrs,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(0);
        self.options.encode(buf);
        for rtr in &self.attached_rtrs {
            buf.put_ipv4(rtr);
        }
    }
}

// ===== impl LsaInterAreaPrefix =====

impl LsaInterAreaPrefix {
    pub const BASE_LENGTH: u16 = 8;

    pub fn new(
        metric: u32,
        prefix_options: PrefixOptions,
        prefix: Ipv6Network,
    ) -> ValidationResult<Self> {
        let lsa = LsaInterAreaPrefix {
            metric,
            prefix_options,
            prefix: prefix.apply_mask(),
        };
        lsa.validate()?;
        Ok(lsa)
    }

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::BASE_LENGTH as usize {
            return Err(DecodeError::InvalidLsaLength);
        }
        let _ = buf.get_u8();
        let metric = buf.get_u24();
        let plen = buf.get_u8();
        let prefix_options = PrefixOptions::from_bits_truncate(buf.get_u8());
        let _ = buf.get_u16();
        let prefix = decode_prefix(plen, buf)?;

        Ok(LsaInterAreaPrefix {
            metric,
            prefix_options,
            prefix,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(0);
        buf.put_u24(self.metric);
        buf.put_u8(self.prefix.prefix());
        buf.put_u8(self.prefix_options.bits());
        buf.put_u16(0);
        encode_prefix(&self.prefix, buf);
    }

    fn validate(&self) -> ValidationResult<()> {
        if self.metric > LSA_INFINITY {
            return Err(ValidationError::InvalidMetric(self.metric));
        }

        Ok(())
    }
}

// ===== impl LsaLink =====

impl LsaLink {
    pub const BASE_LENGTH: u16 = 24;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::BASE_LENGTH as usize {
            return Err(DecodeError::InvalidLsaLength);
        }
        let priority = buf.get_u8();
        let options = Options::decode(buf);
        let linklocal = buf.get_ipv6();

        // Parse list of prefixes.
        let mut prefixes = vec![];
        let prefixes_cnt = buf.get_u32();
        for _ in 0..prefixes_cnt {
            if buf.remaining() < 4 {
                return Err(DecodeError::InvalidLsaLength);
            }
            let plen = buf.get_u8();
            let options = PrefixOptions::from_bits_truncate(buf.get_u8());
            let _ = buf.get_u16();
            let value = decode_prefix(plen, buf)?;
            prefixes.push(LsaLinkPrefix { options, value });
        }

        Ok(LsaLink {
            priority,
            options,
            linklocal,
            prefixes,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.priority);
        self.options.encode(buf);
        buf.put_ipv6(&self.linklocal);
        buf.put_u32(self.prefixes.len() as u32);
        for prefix in &self.prefixes {
            buf.put_u8(prefix.value.prefix());
            buf.put_u8(prefix.options.bits());
            buf.put_u16(0);
            encode_prefix(&prefix.value, buf);
        }
    }
}

// ===== impl LsaIntraAreaPrefix =====

impl LsaIntraAreaPrefix {
    pub const BASE_LENGTH: u16 = 12;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < Self::BASE_LENGTH as usize {
            return Err(DecodeError::InvalidLsaLength);
        }
        let prefixes_cnt = buf.get_u16();
        let ref_lsa_type = LsaType(buf.get_u16());
        let ref_lsa_id = buf.get_ipv4();
        let ref_adv_rtr = buf.get_ipv4();

        // Parse list of prefixes.
        let mut prefixes = vec![];
        for _ in 0..prefixes_cnt {
            if buf.remaining() < 4 {
                return Err(DecodeError::InvalidLsaLength);
            }
            let plen = buf.get_u8();
            let options = PrefixOptions::from_bits_truncate(buf.get_u8());
            let metric = buf.get_u16();
            let value = decode_prefix(plen, buf)?;
            prefixes.push(LsaIntraAreaPrefixEntry {
                options,
                value,
                metric,
            });
        }

        Ok(LsaIntraAreaPrefix {
            ref_lsa_type,
            ref_lsa_id,
            ref_adv_rtr,
            prefixes,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        // Saturates, since an LSA this large is rejected by `Lsa::new`.
        let prefixes_cnt =
            u16::try_from(self.prefixes.len()).unwrap_or(u16::MAX);
        buf.put_u16(prefixes_cnt);
        buf.put_u16(self.ref_lsa_type.0);
        buf.put_ipv4(&self.ref_lsa_id);
        buf.put_ipv4(&self.ref_adv_rtr);
        for prefix in &self.prefixes {
            buf.put_u8(prefix.value.prefix());
            buf.put_u8(prefix.options.bits());
            buf.put_u16(prefix.metric);
            encode_prefix(&prefix.value, buf);
        }
    }
}

// ===== impl Ospfv3 =====

impl LsaVersion<Self> for Ospfv3 {
    type LsaType = LsaType;
    type LsaHdr = LsaHdr;
    type LsaBody = LsaBody;
}

// ===== global functions =====

// Calculate the number of bytes required to encode a prefix.
//
// The prefix is sent in whole 32-bit words: 0 bytes for the default route,
// then 4, 8, 12 or 16 bytes.
pub fn prefix_wire_len(plen: u8) -> usize {
    match plen {
        0 => 0,
        1..=32 => 4,
        33..=64 => 8,
        65..=96 => 12,
        _ => 16,
    }
}

fn decode_prefix(plen: u8, buf: &mut Bytes) -> DecodeResult<Ipv6Network> {
    if plen > Ipv6Network::MAX_PREFIXLEN {
        return Err(DecodeError::InvalidIpPrefix);
    }
    let plen_wire = prefix_wire_len(plen);
    if buf.remaining() < plen_wire {
        return Err(DecodeError::InvalidLsaLength);
    }
    let prefix = buf.get_ipv6_truncated(plen_wire);
    Ipv6Network::new(prefix, plen).map_err(|_| DecodeError::InvalidIpPrefix)
}

fn encode_prefix(prefix: &Ipv6Network, buf: &mut BytesMut) {
    let plen_wire = prefix_wire_len(prefix.prefix());
    buf.put_ipv6_truncated(&prefix.ip(), plen_wire);
}
