//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::IpAddr;

use ipnetwork::IpNetwork;
use serde::Serialize;
use tracing::{Level, debug, debug_span};

use crate::packet::PacketType;
use crate::route::{RouteEntryKey, RoutePathKey};

// OSPF debug messages.
#[derive(Debug)]
pub enum Debug<'a> {
    // Packet facade
    PacketCreate(u8, PacketType, &'a str),
    // Network
    PacketRx(&'a str, IpAddr, &'a str),
    PacketTx(&'a str, IpAddr, &'a str),
    // Routing table
    RouteEntryAdd(&'a RouteEntryKey),
    RouteEntryDelete(&'a RouteEntryKey),
    RoutePathAdd(&'a RouteEntryKey, &'a RoutePathKey),
    RoutePathRemove(&'a RouteEntryKey, &'a RoutePathKey),
    // Southbound
    KernelRouteInstall(&'a IpNetwork, Option<IpAddr>, &'a str),
    KernelRouteUninstall(&'a IpNetwork, Option<IpAddr>, &'a str),
    KernelRouteSkipConnected(&'a IpNetwork),
}

// ===== impl Debug =====

impl Debug<'_> {
    // Log debug message using the tracing API.
    pub(crate) fn log(&self) {
        match self {
            Debug::PacketCreate(version, pkt_type, data) => {
                debug_span!("packet", %version).in_scope(|| {
                    debug!(%pkt_type, %data, "{}", self);
                })
            }
            Debug::PacketRx(ifname, src, data) => {
                debug_span!("network").in_scope(|| {
                    debug_span!("input").in_scope(|| {
                        debug!(interface = %ifname, %src, %data, "{}", self);
                    })
                })
            }
            Debug::PacketTx(ifname, dst, data) => {
                debug_span!("network").in_scope(|| {
                    debug_span!("output").in_scope(|| {
                        debug!(interface = %ifname, %dst, %data, "{}", self);
                    })
                })
            }
            Debug::RouteEntryAdd(key) | Debug::RouteEntryDelete(key) => {
                debug_span!("routing-table").in_scope(|| {
                    debug!(dest_type = ?key.dest_type, dest_id = %key.dest_id, area_id = %key.area_id, "{}", self);
                })
            }
            Debug::RoutePathAdd(key, path)
            | Debug::RoutePathRemove(key, path) => {
                debug_span!("routing-table").in_scope(|| {
                    debug!(dest_id = %key.dest_id, area_id = %key.area_id, gateway = %path.nexthop.gateway, interface = %path.nexthop.interface, adv_rtr = %path.adv_rtr, "{}", self);
                })
            }
            Debug::KernelRouteInstall(prefix, nexthop, ifname)
            | Debug::KernelRouteUninstall(prefix, nexthop, ifname) => {
                debug_span!("southbound").in_scope(|| {
                    debug!(%prefix, ?nexthop, interface = %ifname, "{}", self);
                })
            }
            Debug::KernelRouteSkipConnected(prefix) => {
                debug_span!("southbound").in_scope(|| {
                    debug!(%prefix, "{}", self);
                })
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::PacketCreate(..) => {
                write!(f, "packet created")
            }
            Debug::PacketRx(..) | Debug::PacketTx(..) => {
                write!(f, "packet")
            }
            Debug::RouteEntryAdd(..) => {
                write!(f, "route entry added")
            }
            Debug::RouteEntryDelete(..) => {
                write!(f, "route entry deleted")
            }
            Debug::RoutePathAdd(..) => {
                write!(f, "route path added")
            }
            Debug::RoutePathRemove(..) => {
                write!(f, "route path removed")
            }
            Debug::KernelRouteInstall(..) => {
                write!(f, "installing route")
            }
            Debug::KernelRouteUninstall(..) => {
                write!(f, "uninstalling route")
            }
            Debug::KernelRouteSkipConnected(..) => {
                write!(f, "not overriding connected route")
            }
        }
    }
}

// ===== helper functions =====

// Serializes a packet for the debug logs. Skipped entirely unless debug
// logging is enabled.
pub(crate) fn packet_data<T: Serialize>(packet: &T) -> String {
    if !tracing::enabled!(Level::DEBUG) {
        return String::new();
    }
    serde_json::to_string(packet).unwrap_or_default()
}
