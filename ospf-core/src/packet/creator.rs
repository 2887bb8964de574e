//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::Bytes;
use ospf_utils::checksum::create_checksum_ipv4;

use crate::debug::{self, Debug};
use crate::packet::error::{ValidationError, ValidationResult};
use crate::packet::lsa::{Lsa, LsaKey};
use crate::packet::{
    LsAck, LsRequest, LsUpdate, Packet, PacketBody, PacketHdrVersion,
};
use crate::version::Version;

// Builds wire-ready OSPF packets on top of a fixed packet header.
//
// Every packet gets its length and checksum recomputed. The length is
// always set before the checksum is computed, since the checksum covers it.
#[derive(Debug)]
pub struct PacketCreator<V: Version> {
    hdr: V::PacketHdr,
    packet: Option<Packet<V>>,
}

// ===== impl PacketCreator =====

impl<V> PacketCreator<V>
where
    V: Version,
{
    pub fn new(hdr: V::PacketHdr) -> Self {
        PacketCreator { hdr, packet: None }
    }

    pub fn hello(&mut self, hello: V::PacketHello) -> Bytes {
        self.create(PacketBody::Hello(hello))
    }

    pub fn db_desc(&mut self, db_desc: V::PacketDbDesc) -> Bytes {
        self.create(PacketBody::DbDesc(db_desc))
    }

    pub fn ls_request(
        &mut self,
        entries: impl IntoIterator<Item = LsaKey<V::LsaType>>,
    ) -> Bytes {
        let mut ls_rqst = LsRequest::default();
        for entry in entries {
            ls_rqst.add_entry(entry.lsa_type, entry.lsa_id, entry.adv_rtr);
        }
        self.create(PacketBody::LsRequest(ls_rqst))
    }

    pub fn ls_update(&mut self, lsas: Vec<Lsa<V>>) -> Bytes {
        self.create(PacketBody::LsUpdate(LsUpdate { lsas }))
    }

    pub fn ls_ack(&mut self, lsa_hdrs: Vec<V::LsaHdr>) -> Bytes {
        self.create(PacketBody::LsAck(LsAck { lsa_hdrs }))
    }

    // Builds a packet, returning an empty buffer if any of its fields is
    // rejected. The failure is logged.
    pub fn create(&mut self, body: PacketBody<V>) -> Bytes {
        match self.try_create(body) {
            Ok(buf) => buf,
            Err(error) => {
                error.log();
                Bytes::new()
            }
        }
    }

    // Builds a packet, propagating any validation failure.
    pub fn try_create(
        &mut self,
        body: PacketBody<V>,
    ) -> ValidationResult<Bytes> {
        let packet = self.build(body)?;
        let buf = packet.encode();
        Debug::PacketCreate(
            V::VERSION,
            packet.hdr.pkt_type(),
            &debug::packet_data(&packet),
        )
        .log();
        self.packet = Some(packet);

        Ok(buf)
    }

    // Assembles a packet with its length and checksum filled in.
    pub fn build(&self, body: PacketBody<V>) -> ValidationResult<Packet<V>> {
        // Validate all fields before encoding anything.
        self.hdr.validate()?;
        body.validate()?;
        let pkt_type = self.hdr.pkt_type();
        if pkt_type != body.pkt_type() {
            return Err(ValidationError::PacketTypeMismatch(
                pkt_type,
                body.pkt_type(),
            ));
        }

        let mut packet = Packet {
            hdr: self.hdr.clone(),
            body,
        };
        packet.hdr.set_length(0);
        packet.hdr.set_cksum(0);

        // Compute packet length.
        let pkt_len = packet.encode().len();
        let pkt_len = u16::try_from(pkt_len)
            .map_err(|_| ValidationError::PacketTooLarge(pkt_len))?;
        packet.hdr.set_length(pkt_len);

        // Compute packet checksum.
        let mut data = packet.encode().to_vec();
        V::PacketHdr::prepare_packet_checksum(&mut data);
        packet.hdr.set_cksum(create_checksum_ipv4(&data));

        Ok(packet)
    }

    // Returns the last packet successfully built.
    pub fn packet(&self) -> Option<&Packet<V>> {
        self.packet.as_ref()
    }

    pub fn into_packet(self) -> Option<Packet<V>> {
        self.packet
    }
}
