//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::LazyLock as Lazy;

use bytes::{Bytes, BytesMut};
use ospf_core::error::Error;
use ospf_core::ospfv2::packet::lsa::*;
use ospf_core::ospfv2::packet::*;
use ospf_core::packet::creator::PacketCreator;
use ospf_core::packet::error::{DecodeError, ValidationError};
use ospf_core::packet::lsa::{
    Lsa, LsaAbr, LsaBodyVersion, LsaKey, LsaTypeVersion,
};
use ospf_core::packet::reader::PacketReader;
use ospf_core::packet::{
    DbDescFlags, LsAck, LsRequest, LsUpdate, Packet, PacketBody,
    PacketHdrVersion, PacketType,
};
use ospf_core::version::Ospfv2;

//
// Helper functions.
//

fn test_encode_packet(bytes_expected: &[u8], packet: &Packet<Ospfv2>) {
    let mut creator = PacketCreator::new(packet.hdr.clone());
    let bytes_actual = creator.create(packet.body.clone());
    assert_eq!(bytes_expected, bytes_actual.as_ref());
    assert_eq!(Some(packet), creator.packet());
}

fn test_decode_packet(bytes: &[u8], packet_expected: &Packet<Ospfv2>) {
    // Plain decoding.
    let mut buf = Bytes::copy_from_slice(bytes);
    let packet_actual = Packet::<Ospfv2>::decode(&mut buf).unwrap();
    assert_eq!(*packet_expected, packet_actual);

    // Decoding followed by validation.
    let packet_actual = PacketReader::convert_bytes_to_packet(bytes)
        .unwrap()
        .into_ospfv2()
        .unwrap();
    assert_eq!(*packet_expected, packet_actual);
}

fn test_encode_lsa(bytes_expected: &[u8], lsa: &Lsa<Ospfv2>) {
    assert_eq!(bytes_expected, lsa.raw.as_ref());
}

fn test_decode_lsa(bytes: &[u8], lsa_expected: &Lsa<Ospfv2>) {
    let mut bytes = Bytes::copy_from_slice(bytes);
    let lsa_actual = Lsa::<Ospfv2>::decode(&mut bytes).unwrap();
    assert_eq!(*lsa_expected, lsa_actual);
    assert!(lsa_actual.is_checksum_valid());
}

fn test_reject_packet(bytes: &[u8], error_expected: ValidationError) {
    match PacketReader::convert_bytes_to_packet(bytes) {
        Err(Error::PacketValidationError(error)) => {
            assert_eq!(error_expected, error)
        }
        result => panic!("unexpected result: {:?}", result),
    }
}

fn test_discard_packet(bytes: &[u8], error_expected: DecodeError) {
    match PacketReader::convert_bytes_to_packet(bytes) {
        Err(Error::PacketDecodeError(error)) => {
            assert_eq!(error_expected, error)
        }
        result => panic!("unexpected result: {:?}", result),
    }
}

fn ip(addr: &str) -> Ipv4Addr {
    Ipv4Addr::from_str(addr).unwrap()
}

//
// Test LSAs.
//

static LSA1: Lazy<(Vec<u8>, Lsa<Ospfv2>)> = Lazy::new(|| {
    (
        vec![
            0x00, 0x01, 0x02, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
            0x01, 0x80, 0x00, 0x00, 0x01, 0xa3, 0x5d, 0x00, 0x30, 0x01, 0x00,
            0x00, 0x02, 0x0a, 0x00, 0x01, 0x03, 0x0a, 0x00, 0x01, 0x01, 0x02,
            0x00, 0x00, 0x0a, 0x0a, 0x00, 0x02, 0x00, 0xff, 0xff, 0xff, 0x00,
            0x03, 0x00, 0x00, 0x0a,
        ],
        Lsa::new(
            1,
            Some(Options::E),
            ip("1.1.1.1"),
            ip("1.1.1.1"),
            0x80000001,
            LsaBody::Router(LsaRouter {
                flags: LsaRouterFlags::B,
                links: vec![
                    LsaRouterLink::new(
                        LsaRouterLinkType::TransitNetwork,
                        ip("10.0.1.3"),
                        ip("10.0.1.1"),
                        10,
                    ),
                    LsaRouterLink::new(
                        LsaRouterLinkType::StubNetwork,
                        ip("10.0.2.0"),
                        ip("255.255.255.0"),
                        10,
                    ),
                ],
            }),
        )
        .unwrap(),
    )
});

static LSA2: Lazy<(Vec<u8>, Lsa<Ospfv2>)> = Lazy::new(|| {
    (
        vec![
            0x00, 0x01, 0x02, 0x02, 0x0a, 0x00, 0x01, 0x03, 0x03, 0x03, 0x03,
            0x03, 0x80, 0x00, 0x00, 0x02, 0x12, 0x1d, 0x00, 0x20, 0xff, 0xff,
            0xff, 0x00, 0x03, 0x03, 0x03, 0x03, 0x01, 0x01, 0x01, 0x01,
        ],
        Lsa::new(
            1,
            Some(Options::E),
            ip("10.0.1.3"),
            ip("3.3.3.3"),
            0x80000002,
            LsaBody::Network(LsaNetwork::new(
                ip("255.255.255.0"),
                vec![ip("3.3.3.3"), ip("1.1.1.1")],
            )),
        )
        .unwrap(),
    )
});

static LSA3: Lazy<(Vec<u8>, Lsa<Ospfv2>)> = Lazy::new(|| {
    (
        vec![
            0x00, 0x01, 0x02, 0x03, 0x0a, 0x00, 0x03, 0x00, 0x02, 0x02, 0x02,
            0x02, 0x80, 0x00, 0x00, 0x01, 0x5c, 0xd3, 0x00, 0x20, 0xff, 0xff,
            0xff, 0x00, 0x00, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00,
        ],
        Lsa::new(
            1,
            Some(Options::E),
            ip("10.0.3.0"),
            ip("2.2.2.2"),
            0x80000001,
            LsaBody::SummaryNetwork(
                LsaSummary::new(ip("255.255.255.0"), 20).unwrap(),
            ),
        )
        .unwrap(),
    )
});

static LSA4: Lazy<(Vec<u8>, Lsa<Ospfv2>)> = Lazy::new(|| {
    (
        vec![
            0x00, 0x01, 0x02, 0x05, 0xac, 0x10, 0x01, 0x00, 0x02, 0x02, 0x02,
            0x02, 0x80, 0x00, 0x00, 0x01, 0x02, 0xa6, 0x00, 0x24, 0xff, 0xff,
            0xff, 0x00, 0x80, 0x00, 0x00, 0x64, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00,
        ],
        Lsa::new(
            1,
            Some(Options::E),
            ip("172.16.1.0"),
            ip("2.2.2.2"),
            0x80000001,
            LsaBody::AsExternal(LsaAsExternal::new(
                ip("255.255.255.0"),
                LsaAsExternalFlags::E,
                100,
                None,
                0,
            )),
        )
        .unwrap(),
    )
});

static LSA5: Lazy<(Vec<u8>, Lsa<Ospfv2>)> = Lazy::new(|| {
    let mut abr = LsaAbr::default();
    abr.add_entry(10, ip("1.1.1.1")).unwrap();
    abr.add_entry(15, ip("2.2.2.2")).unwrap();
    abr.add_entry(20, ip("3.3.3.3")).unwrap();
    abr.add_entry(0, ip("4.4.4.4")).unwrap();
    (
        vec![
            0x00, 0x01, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x00, 0x02, 0x02, 0x02,
            0x02, 0x80, 0x00, 0x00, 0x01, 0x9f, 0x41, 0x00, 0x34, 0x00, 0x00,
            0x00, 0x0a, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x0f, 0x02,
            0x02, 0x02, 0x02, 0x00, 0x00, 0x00, 0x14, 0x03, 0x03, 0x03, 0x03,
            0x00, 0x00, 0x00, 0x00, 0x04, 0x04, 0x04, 0x04,
        ],
        Lsa::new(
            1,
            None,
            ip("0.0.0.0"),
            ip("2.2.2.2"),
            0x80000001,
            LsaBody::ExtensionAbr(abr),
        )
        .unwrap(),
    )
});

//
// Test packets.
//

static HELLO1: Lazy<(Vec<u8>, Packet<Ospfv2>)> = Lazy::new(|| {
    (
        vec![
            0x02, 0x01, 0x00, 0x2c, 0x03, 0x03, 0x03, 0x03, 0x00, 0x00, 0x00,
            0x00, 0xf6, 0x98, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0xff, 0xff, 0xff, 0x00, 0x00, 0x0a, 0x02, 0x01, 0x00,
            0x00, 0x00, 0x28, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ],
        Packet {
            hdr: PacketHdr {
                pkt_type: PacketType::Hello,
                length: 44,
                router_id: ip("3.3.3.3"),
                area_id: ip("0.0.0.0"),
                cksum: 63128,
                au_type: 0,
                auth: 0,
            },
            body: PacketBody::Hello(Hello::new(
                ip("255.255.255.0"),
                10,
                Options::E,
                1,
                40,
                None,
                None,
                vec![],
            )),
        },
    )
});

static HELLO2: Lazy<(Vec<u8>, Packet<Ospfv2>)> = Lazy::new(|| {
    (
        vec![
            0x02, 0x01, 0x00, 0x34, 0x02, 0x02, 0x02, 0x02, 0x00, 0x00, 0x00,
            0x01, 0xda, 0x8f, 0x00, 0x01, 0x68, 0x6f, 0x6c, 0x6f, 0x00, 0x00,
            0x00, 0x00, 0xff, 0xff, 0xff, 0x00, 0x00, 0x03, 0x02, 0x01, 0x00,
            0x00, 0x00, 0x24, 0x0a, 0x00, 0x01, 0x03, 0x0a, 0x00, 0x01, 0x02,
            0x01, 0x01, 0x01, 0x01, 0x03, 0x03, 0x03, 0x03,
        ],
        Packet {
            hdr: PacketHdr {
                pkt_type: PacketType::Hello,
                length: 52,
                router_id: ip("2.2.2.2"),
                area_id: ip("0.0.0.1"),
                cksum: 55951,
                au_type: AuthType::Simple as u16,
                auth: 0x686f6c6f00000000,
            },
            body: PacketBody::Hello(Hello::new(
                ip("255.255.255.0"),
                3,
                Options::E,
                1,
                36,
                Some(ip("10.0.1.3")),
                Some(ip("10.0.1.2")),
                vec![ip("1.1.1.1"), ip("3.3.3.3")],
            )),
        },
    )
});

static DBDESC1: Lazy<(Vec<u8>, Packet<Ospfv2>)> = Lazy::new(|| {
    (
        vec![
            0x02, 0x02, 0x00, 0x48, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00,
            0x00, 0x20, 0x1e, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x05, 0xdc, 0x02, 0x07, 0x00, 0x00, 0x04, 0xd2, 0x00,
            0x01, 0x02, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
            0x80, 0x00, 0x00, 0x01, 0xa3, 0x5d, 0x00, 0x30, 0x00, 0x01, 0x02,
            0x02, 0x0a, 0x00, 0x01, 0x03, 0x03, 0x03, 0x03, 0x03, 0x80, 0x00,
            0x00, 0x02, 0x12, 0x1d, 0x00, 0x20,
        ],
        Packet {
            hdr: PacketHdr {
                pkt_type: PacketType::DbDesc,
                length: 72,
                router_id: ip("1.1.1.1"),
                area_id: ip("0.0.0.0"),
                cksum: 8222,
                au_type: 0,
                auth: 0,
            },
            body: PacketBody::DbDesc(DbDesc::new(
                1500,
                Options::E,
                DbDescFlags::I | DbDescFlags::M | DbDescFlags::MS,
                1234,
                vec![LSA1.1.hdr, LSA2.1.hdr],
            )),
        },
    )
});

static LSREQ1: Lazy<(Vec<u8>, Packet<Ospfv2>)> = Lazy::new(|| {
    (
        vec![
            0x02, 0x03, 0x00, 0x30, 0x02, 0x02, 0x02, 0x02, 0x00, 0x00, 0x00,
            0x00, 0xe4, 0xb8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
            0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x02, 0x0a, 0x00, 0x01, 0x03,
            0x03, 0x03, 0x03, 0x03,
        ],
        Packet {
            hdr: PacketHdr {
                pkt_type: PacketType::LsRequest,
                length: 48,
                router_id: ip("2.2.2.2"),
                area_id: ip("0.0.0.0"),
                cksum: 58552,
                au_type: 0,
                auth: 0,
            },
            body: PacketBody::LsRequest(LsRequest {
                entries: vec![
                    LsaKey::new(
                        LsaTypeCode::Router.into(),
                        ip("1.1.1.1"),
                        ip("1.1.1.1"),
                    ),
                    LsaKey::new(
                        LsaTypeCode::Network.into(),
                        ip("3.3.3.3"),
                        ip("10.0.1.3"),
                    ),
                ],
            }),
        },
    )
});

static LSUPD1: Lazy<(Vec<u8>, Packet<Ospfv2>)> = Lazy::new(|| {
    (
        vec![
            0x02, 0x04, 0x00, 0x6c, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00,
            0x00, 0xfe, 0x86, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x02, 0x01, 0x01,
            0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x80, 0x00, 0x00, 0x01,
            0xa3, 0x5d, 0x00, 0x30, 0x01, 0x00, 0x00, 0x02, 0x0a, 0x00, 0x01,
            0x03, 0x0a, 0x00, 0x01, 0x01, 0x02, 0x00, 0x00, 0x0a, 0x0a, 0x00,
            0x02, 0x00, 0xff, 0xff, 0xff, 0x00, 0x03, 0x00, 0x00, 0x0a, 0x00,
            0x01, 0x02, 0x02, 0x0a, 0x00, 0x01, 0x03, 0x03, 0x03, 0x03, 0x03,
            0x80, 0x00, 0x00, 0x02, 0x12, 0x1d, 0x00, 0x20, 0xff, 0xff, 0xff,
            0x00, 0x03, 0x03, 0x03, 0x03, 0x01, 0x01, 0x01, 0x01,
        ],
        Packet {
            hdr: PacketHdr {
                pkt_type: PacketType::LsUpdate,
                length: 108,
                router_id: ip("1.1.1.1"),
                area_id: ip("0.0.0.0"),
                cksum: 65158,
                au_type: 0,
                auth: 0,
            },
            body: PacketBody::LsUpdate(LsUpdate {
                lsas: vec![LSA1.1.clone(), LSA2.1.clone()],
            }),
        },
    )
});

static LSACK1: Lazy<(Vec<u8>, Packet<Ospfv2>)> = Lazy::new(|| {
    (
        vec![
            0x02, 0x05, 0x00, 0x40, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00,
            0x00, 0x2c, 0xd8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x01, 0x02, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
            0x01, 0x01, 0x01, 0x80, 0x00, 0x00, 0x01, 0xa3, 0x5d, 0x00, 0x30,
            0x00, 0x01, 0x02, 0x02, 0x0a, 0x00, 0x01, 0x03, 0x03, 0x03, 0x03,
            0x03, 0x80, 0x00, 0x00, 0x02, 0x12, 0x1d, 0x00, 0x20,
        ],
        Packet {
            hdr: PacketHdr {
                pkt_type: PacketType::LsAck,
                length: 64,
                router_id: ip("1.1.1.1"),
                area_id: ip("0.0.0.0"),
                cksum: 11480,
                au_type: 0,
                auth: 0,
            },
            body: PacketBody::LsAck(LsAck {
                lsa_hdrs: vec![LSA1.1.hdr, LSA2.1.hdr],
            }),
        },
    )
});

//
// Malformed packets.
//

static HELLO_BAD_MASK: &[u8] = &[
    0x02, 0x01, 0x00, 0x2c, 0x03, 0x03, 0x03, 0x03, 0x00, 0x00, 0x00, 0x00,
    0xf7, 0x97, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xff, 0x00, 0xff, 0x00, 0x00, 0x0a, 0x02, 0x01, 0x00, 0x00, 0x00, 0x28,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

static HELLO_BAD_ROUTER_ID: &[u8] = &[
    0x02, 0x01, 0x00, 0x2c, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xfc, 0x9e, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xff, 0xff, 0xff, 0x00, 0x00, 0x0a, 0x02, 0x01, 0x00, 0x00, 0x00, 0x28,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

// Network-LSA whose LS checksum was corrupted.
static LSUPD_BAD_LSA_CKSUM: &[u8] = &[
    0x02, 0x04, 0x00, 0x3c, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00,
    0x4e, 0xa3, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x02, 0x02, 0x0a, 0x00, 0x01, 0x03,
    0x03, 0x03, 0x03, 0x03, 0x80, 0x00, 0x00, 0x02, 0x12, 0xe2, 0x00, 0x20,
    0xff, 0xff, 0xff, 0x00, 0x03, 0x03, 0x03, 0x03, 0x01, 0x01, 0x01, 0x01,
];

// Network-LSA declaring more bytes than the packet holds.
static LSUPD_TRUNCATED: &[u8] = &[
    0x02, 0x04, 0x00, 0x3c, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00,
    0x4f, 0x48, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x02, 0x02, 0x0a, 0x00, 0x01, 0x03,
    0x03, 0x03, 0x03, 0x03, 0x80, 0x00, 0x00, 0x02, 0x12, 0x1d, 0x00, 0x40,
    0xff, 0xff, 0xff, 0x00, 0x03, 0x03, 0x03, 0x03, 0x01, 0x01, 0x01, 0x01,
];

//
// Tests.
//

#[test]
fn test_encode_hello1() {
    let (ref bytes, ref hello) = *HELLO1;
    test_encode_packet(bytes, hello);
}

#[test]
fn test_decode_hello1() {
    let (ref bytes, ref hello) = *HELLO1;
    test_decode_packet(bytes, hello);
}

#[test]
fn test_encode_hello2() {
    let (ref bytes, ref hello) = *HELLO2;
    test_encode_packet(bytes, hello);
}

#[test]
fn test_decode_hello2() {
    let (ref bytes, ref hello) = *HELLO2;
    test_decode_packet(bytes, hello);
}

#[test]
fn test_encode_dbdesc1() {
    let (ref bytes, ref dbdesc) = *DBDESC1;
    test_encode_packet(bytes, dbdesc);
}

#[test]
fn test_decode_dbdesc1() {
    let (ref bytes, ref dbdesc) = *DBDESC1;
    test_decode_packet(bytes, dbdesc);
}

#[test]
fn test_encode_lsrequest1() {
    let (ref bytes, ref request) = *LSREQ1;
    test_encode_packet(bytes, request);
}

#[test]
fn test_decode_lsrequest1() {
    let (ref bytes, ref request) = *LSREQ1;
    test_decode_packet(bytes, request);
}

#[test]
fn test_encode_lsupdate1() {
    let (ref bytes, ref lsupdate) = *LSUPD1;
    test_encode_packet(bytes, lsupdate);
}

#[test]
fn test_decode_lsupdate1() {
    let (ref bytes, ref lsupdate) = *LSUPD1;
    test_decode_packet(bytes, lsupdate);
}

#[test]
fn test_encode_lsack1() {
    let (ref bytes, ref lsack) = *LSACK1;
    test_encode_packet(bytes, lsack);
}

#[test]
fn test_decode_lsack1() {
    let (ref bytes, ref lsack) = *LSACK1;
    test_decode_packet(bytes, lsack);
}

#[test]
fn test_encode_lsa1() {
    let (ref bytes, ref lsa) = *LSA1;
    test_encode_lsa(bytes, lsa);
}

#[test]
fn test_decode_lsa1() {
    let (ref bytes, ref lsa) = *LSA1;
    test_decode_lsa(bytes, lsa);
}

#[test]
fn test_encode_lsa2() {
    let (ref bytes, ref lsa) = *LSA2;
    test_encode_lsa(bytes, lsa);
}

#[test]
fn test_decode_lsa2() {
    let (ref bytes, ref lsa) = *LSA2;
    test_decode_lsa(bytes, lsa);
}

#[test]
fn test_encode_lsa3() {
    let (ref bytes, ref lsa) = *LSA3;
    test_encode_lsa(bytes, lsa);
}

#[test]
fn test_decode_lsa3() {
    let (ref bytes, ref lsa) = *LSA3;
    test_decode_lsa(bytes, lsa);
}

#[test]
fn test_encode_lsa4() {
    let (ref bytes, ref lsa) = *LSA4;
    test_encode_lsa(bytes, lsa);
}

#[test]
fn test_decode_lsa4() {
    let (ref bytes, ref lsa) = *LSA4;
    test_decode_lsa(bytes, lsa);
}

#[test]
fn test_encode_lsa5() {
    let (ref bytes, ref lsa) = *LSA5;
    test_encode_lsa(bytes, lsa);
}

#[test]
fn test_decode_lsa5() {
    let (ref bytes, ref lsa) = *LSA5;
    test_decode_lsa(bytes, lsa);
}

#[test]
fn test_header_lengths() {
    let (_, ref hello) = *HELLO1;
    assert_eq!(hello.hdr.length, PacketHdr::LENGTH + Hello::BASE_LENGTH);
    let (_, ref lsa) = *LSA3;
    assert_eq!(lsa.hdr.length, LsaSummary::LENGTH + 20);
    assert_eq!(lsa.body.as_summary().map(|lsa| lsa.metric), Some(20));
}

#[test]
fn test_encode_network_lsa_body() {
    let body = LsaBody::Network(LsaNetwork::new(
        ip("255.255.255.0"),
        vec![ip("2.2.2.2"), ip("1.1.1.1")],
    ));
    let mut buf = BytesMut::new();
    body.encode(&mut buf);
    assert_eq!(
        buf.as_ref(),
        &[
            0xff, 0xff, 0xff, 0x00, 0x02, 0x02, 0x02, 0x02, 0x01, 0x01, 0x01,
            0x01
        ]
    );
    assert_eq!(body.lsa_type(), LsaType(2));
}

#[test]
fn test_lsa_abr_entries() {
    let mut abr = LsaAbr::default();
    abr.add_entry(10, ip("1.1.1.1")).unwrap();
    abr.add_entry(15, ip("2.2.2.2")).unwrap();

    // Entries for a known neighbor are ignored.
    abr.add_entry(30, ip("1.1.1.1")).unwrap();
    assert_eq!(abr.entries.len(), 2);
    assert_eq!(abr.get_entry(ip("1.1.1.1")).map(|e| e.metric), Some(10));

    assert_eq!(
        abr.add_entry(0x0100_0000, ip("3.3.3.3")),
        Err(ValidationError::InvalidMetric(0x0100_0000))
    );
    assert_eq!(abr.entries.len(), 2);

    let mut buf = BytesMut::new();
    abr.encode(&mut buf);
    let abr_decoded = LsaAbr::decode(&mut buf.freeze()).unwrap();
    assert_eq!(abr, abr_decoded);
}

#[test]
fn test_decode_lsa_abr_duplicate() {
    // The second record for 1.1.1.1 is dropped.
    let mut buf = Bytes::from_static(&[
        0x00, 0x00, 0x00, 0x0a, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00,
        0x1e, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x14, 0x02, 0x02,
        0x02, 0x02,
    ]);
    let abr = LsaAbr::decode(&mut buf).unwrap();
    assert_eq!(abr.entries.len(), 2);
    assert_eq!(abr.get_entry(ip("1.1.1.1")).map(|e| e.metric), Some(10));
    assert_eq!(abr.get_entry(ip("2.2.2.2")).map(|e| e.metric), Some(20));
}

#[test]
fn test_decode_request_reserved_bits() {
    let mut buf = Bytes::from_static(&[0xff, 0xff, 0xff, 0x05]);
    assert_eq!(LsaType::decode_request(&mut buf), LsaType(5));

    let mut buf = BytesMut::new();
    LsaType(5).encode_request(&mut buf);
    assert_eq!(buf.as_ref(), &[0x00, 0x00, 0x00, 0x05]);
}

#[test]
fn test_lsa_too_large() {
    let link = LsaRouterLink::new(
        LsaRouterLinkType::StubNetwork,
        ip("10.0.2.0"),
        ip("255.255.255.0"),
        10,
    );
    let body = LsaBody::Router(LsaRouter {
        flags: LsaRouterFlags::empty(),
        links: vec![link; 5500],
    });
    assert_eq!(
        Lsa::<Ospfv2>::new(1, None, ip("1.1.1.1"), ip("1.1.1.1"), 1, body),
        Err(ValidationError::LsaTooLarge(66_024))
    );
}

#[test]
fn test_summary_metric_range() {
    assert!(LsaSummary::new(ip("255.255.255.0"), 0x00ff_ffff).is_ok());
    assert_eq!(
        LsaSummary::new(ip("255.255.255.0"), 0x0100_0000),
        Err(ValidationError::InvalidMetric(0x0100_0000))
    );
    assert_eq!(
        LsaSummary::new(ip("255.0.255.0"), 10),
        Err(ValidationError::InvalidNetworkMask(ip("255.0.255.0")))
    );
}

#[test]
fn test_auth_key() {
    assert_eq!(AuthType::encode_key(b"holo"), Ok(0x686f6c6f00000000));
    assert_eq!(AuthType::encode_key(b""), Ok(0));
    assert_eq!(
        AuthType::encode_key(b"holo-ospf"),
        Err(ValidationError::InvalidAuthKey(9))
    );
}

#[test]
fn test_invalid_packet_hdr() {
    assert_eq!(
        PacketHdr::new(9, ip("1.1.1.1"), ip("0.0.0.0"), 0, 0),
        Err(ValidationError::InvalidPacketType(9))
    );
    assert_eq!(
        PacketHdr::new(1, ip("0.0.0.0"), ip("0.0.0.0"), 0, 0),
        Err(ValidationError::InvalidRouterId(ip("0.0.0.0")))
    );
    assert_eq!(
        PacketHdr::new(1, ip("1.1.1.1"), ip("0.0.0.0"), 3, 0),
        Err(ValidationError::InvalidAuthType(3))
    );
}

#[test]
fn test_create_invalid_hello() {
    let hdr =
        PacketHdr::new(1, ip("3.3.3.3"), ip("0.0.0.0"), 0, 0).unwrap();
    let mut creator = PacketCreator::<Ospfv2>::new(hdr);
    let hello = Hello::new(
        ip("255.0.255.0"),
        10,
        Options::E,
        1,
        40,
        None,
        None,
        vec![],
    );

    assert_eq!(
        creator.try_create(PacketBody::Hello(hello.clone())),
        Err(ValidationError::InvalidNetworkMask(ip("255.0.255.0")))
    );
    assert!(creator.hello(hello).is_empty());
    assert!(creator.packet().is_none());
}

#[test]
fn test_create_type_mismatch() {
    let hdr =
        PacketHdr::new(5, ip("1.1.1.1"), ip("0.0.0.0"), 0, 0).unwrap();
    let mut creator = PacketCreator::<Ospfv2>::new(hdr);
    let (_, ref hello) = *HELLO1;

    assert_eq!(
        creator.try_create(hello.body.clone()),
        Err(ValidationError::PacketTypeMismatch(
            PacketType::LsAck,
            PacketType::Hello
        ))
    );
}

#[test]
fn test_empty_bodies() {
    assert!(LsRequest::<Ospfv2>::default().entries.is_empty());
    assert!(LsUpdate::<Ospfv2>::default().lsas.is_empty());
    assert!(LsAck::<Ospfv2>::default().lsa_hdrs.is_empty());
}

#[test]
fn test_create_ls_request() {
    let hdr =
        PacketHdr::new(3, ip("2.2.2.2"), ip("0.0.0.0"), 0, 0).unwrap();
    let mut creator = PacketCreator::<Ospfv2>::new(hdr);
    let bytes = creator.ls_request([
        LsaKey::new(
            LsaType::from(LsaTypeCode::Router),
            ip("1.1.1.1"),
            ip("1.1.1.1"),
        ),
        LsaKey::new(
            LsaType::from(LsaTypeCode::Network),
            ip("3.3.3.3"),
            ip("10.0.1.3"),
        ),
    ]);

    let (ref bytes_expected, ref packet) = *LSREQ1;
    assert_eq!(bytes_expected.as_slice(), bytes.as_ref());
    assert_eq!(Some(packet.clone()), creator.into_packet());
}

#[test]
fn test_checksum_skips_auth() {
    // Rewriting the authentication data keeps the checksum valid.
    let (ref bytes, _) = *HELLO2;
    let mut bytes = bytes.clone();
    bytes[16..24].copy_from_slice(b"ospfospf");
    let packet = PacketReader::convert_bytes_to_packet(&bytes)
        .unwrap()
        .into_ospfv2()
        .unwrap();
    assert_eq!(packet.hdr.auth, u64::from_be_bytes(*b"ospfospf"));
}

#[test]
fn test_discard_short_packet() {
    let (ref bytes, _) = *HELLO1;
    test_discard_packet(&bytes[..10], DecodeError::InvalidLength(10));
}

#[test]
fn test_discard_truncated_packet() {
    let (ref bytes, _) = *HELLO1;
    test_discard_packet(&bytes[..30], DecodeError::InvalidLength(44));
}

#[test]
fn test_discard_invalid_version() {
    let (ref bytes, _) = *HELLO1;
    let mut bytes = bytes.clone();
    bytes[0] = 4;
    test_discard_packet(&bytes, DecodeError::InvalidVersion(4));
}

#[test]
fn test_discard_unknown_packet_type() {
    let (ref bytes, _) = *HELLO1;
    let mut bytes = bytes.clone();
    bytes[1] = 6;
    test_discard_packet(&bytes, DecodeError::UnknownPacketType(6));
}

#[test]
fn test_discard_invalid_checksum() {
    let (ref bytes, _) = *HELLO1;
    let mut bytes = bytes.clone();
    bytes[13] ^= 0x01;
    test_discard_packet(&bytes, DecodeError::InvalidChecksum);
}

#[test]
fn test_discard_truncated_lsa() {
    test_discard_packet(LSUPD_TRUNCATED, DecodeError::InvalidLsaLength);
}

#[test]
fn test_reject_invalid_mask() {
    test_reject_packet(
        HELLO_BAD_MASK,
        ValidationError::InvalidNetworkMask(ip("255.0.255.0")),
    );
}

#[test]
fn test_reject_invalid_router_id() {
    test_reject_packet(
        HELLO_BAD_ROUTER_ID,
        ValidationError::InvalidRouterId(ip("0.0.0.0")),
    );
}

#[test]
fn test_reject_invalid_lsa_checksum() {
    // The packet itself is well formed.
    let mut buf = Bytes::from_static(LSUPD_BAD_LSA_CKSUM);
    assert!(Packet::<Ospfv2>::decode(&mut buf).is_ok());

    test_reject_packet(
        LSUPD_BAD_LSA_CKSUM,
        ValidationError::InvalidLsaChecksum(ip("10.0.1.3"), ip("3.3.3.3")),
    );
}
