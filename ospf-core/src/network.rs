//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bytes::Bytes;
use ospf_utils::ip::AddressFamily;
use serde::{Deserialize, Serialize};

use crate::debug::{self, Debug};
use crate::error::{Error, IoError};
use crate::packet::reader::{AnyPacket, PacketReader};

// OSPF IP protocol number.
pub const OSPF_IP_PROTO: u8 = 89;

// OSPFv2 multicast addresses.
const ALL_SPF_RTRS_V4: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 5);
const ALL_DR_RTRS_V4: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 6);

// OSPFv3 multicast addresses.
const ALL_SPF_RTRS_V6: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 5);
const ALL_DR_RTRS_V6: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 6);

// OSPF multicast groups.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum MulticastAddr {
    AllSpfRtrs,
    AllDrRtrs,
}

// Raw IP transport used to exchange OSPF packets.
//
// Implementations own the sockets. Failures are reported as plain I/O
// errors and get wrapped by the callers.
pub trait Transport: Send + Sync {
    // Send a packet to the given destination through the given interface.
    fn send(
        &self,
        buf: &[u8],
        dst: IpAddr,
        ifname: &str,
    ) -> impl Future<Output = Result<usize, std::io::Error>> + Send;

    // Receive the next packet from the given interface, returning its
    // source address and contents.
    fn recv(
        &self,
        ifname: &str,
    ) -> impl Future<Output = Result<(IpAddr, Bytes), std::io::Error>> + Send;

    // Join a multicast group on the given interface.
    fn join_multicast(
        &self,
        addr: IpAddr,
        ifname: &str,
    ) -> Result<(), std::io::Error>;
}

// ===== impl MulticastAddr =====

impl MulticastAddr {
    // Returns the group address used by the given address family.
    pub fn addr(&self, af: AddressFamily) -> IpAddr {
        match (af, self) {
            (AddressFamily::Ipv4, MulticastAddr::AllSpfRtrs) => {
                ALL_SPF_RTRS_V4.into()
            }
            (AddressFamily::Ipv4, MulticastAddr::AllDrRtrs) => {
                ALL_DR_RTRS_V4.into()
            }
            (AddressFamily::Ipv6, MulticastAddr::AllSpfRtrs) => {
                ALL_SPF_RTRS_V6.into()
            }
            (AddressFamily::Ipv6, MulticastAddr::AllDrRtrs) => {
                ALL_DR_RTRS_V6.into()
            }
        }
    }
}

// ===== global functions =====

// Joins the OSPF multicast groups on the given interface. AllDRouters is
// only joined by the DR and BDR.
pub fn join_multicast_groups<T>(
    transport: &T,
    af: AddressFamily,
    ifname: &str,
    dr: bool,
) -> Result<(), IoError>
where
    T: Transport,
{
    let mut groups = vec![MulticastAddr::AllSpfRtrs];
    if dr {
        groups.push(MulticastAddr::AllDrRtrs);
    }

    for group in groups {
        transport
            .join_multicast(group.addr(af), ifname)
            .map_err(|error| IoError::MulticastJoinError(group, error))?;
    }

    Ok(())
}

// Sends an encoded packet. Empty buffers are the packet creator's way of
// signaling a validation failure and are never put on the wire.
pub async fn send_packet<T>(
    transport: &T,
    buf: &[u8],
    dst: IpAddr,
    ifname: &str,
) -> Result<usize, IoError>
where
    T: Transport,
{
    if buf.is_empty() {
        return Ok(0);
    }

    Debug::PacketTx(ifname, dst, &hex(buf)).log();

    transport
        .send(buf, dst, ifname)
        .await
        .map_err(IoError::SendError)
}

// Receives the next packet from the given interface and parses it.
pub async fn recv_packet<T>(
    transport: &T,
    ifname: &str,
) -> Result<(IpAddr, AnyPacket), Error>
where
    T: Transport,
{
    let (src, buf) = transport
        .recv(ifname)
        .await
        .map_err(IoError::RecvError)?;

    let packet = PacketReader::convert_bytes_to_packet(&buf)?;
    Debug::PacketRx(ifname, src, &debug::packet_data(&packet)).log();

    Ok((src, packet))
}

// ===== helper functions =====

fn hex(buf: &[u8]) -> String {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return String::new();
    }
    buf.iter().map(|byte| format!("{:02x}", byte)).collect()
}
