//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::future::Future;
use std::net::IpAddr;

use ipnetwork::IpNetwork;
use ospf_utils::ip::{AddressFamily, IpAddrExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::debug::Debug;
use crate::error::IoError;
use crate::network::OSPF_IP_PROTO;

// Protocol tag the kernel assigns to routes it creates itself when an
// address is configured.
pub const KERNEL_ROUTE_PROTO: u8 = 2;

// Route as listed by the kernel.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct KernelRoute {
    pub prefix: IpNetwork,
    pub nexthop: Option<IpAddr>,
    pub ifname: String,
    pub protocol: u8,
}

// Kernel routing table access.
pub trait RouteInstaller: Send {
    // Install a route tagged with the OSPF protocol number.
    fn add_route(
        &mut self,
        prefix: IpNetwork,
        nexthop: IpAddr,
        ifname: &str,
    ) -> impl Future<Output = Result<(), std::io::Error>> + Send;

    // Remove a route previously listed by the kernel.
    fn delete_route(
        &mut self,
        route: &KernelRoute,
    ) -> impl Future<Output = Result<(), std::io::Error>> + Send;

    // List every route of the kernel routing table.
    fn list_routes(
        &mut self,
    ) -> impl Future<Output = Result<Vec<KernelRoute>, std::io::Error>> + Send;
}

// Serialized access to the kernel routing table.
//
// One mutating call is outstanding at any time.
#[derive(Debug)]
pub struct Southbound<T: RouteInstaller> {
    installer: Mutex<T>,
}

// ===== impl KernelRoute =====

impl KernelRoute {
    // Returns whether this is a directly-connected prefix.
    pub fn is_connected(&self) -> bool {
        self.protocol == KERNEL_ROUTE_PROTO || self.nexthop.is_none()
    }

    // Returns whether this route was installed by OSPF.
    pub fn is_ospf(&self) -> bool {
        self.protocol == OSPF_IP_PROTO
    }

    fn address_family(&self) -> AddressFamily {
        self.prefix.ip().address_family()
    }
}

// ===== impl Southbound =====

impl<T> Southbound<T>
where
    T: RouteInstaller,
{
    pub fn new(installer: T) -> Self {
        Southbound {
            installer: Mutex::new(installer),
        }
    }

    // Installs a route unless a directly-connected route already covers the
    // same prefix. Returns whether the route was installed.
    pub async fn add_route(
        &self,
        prefix: IpNetwork,
        nexthop: IpAddr,
        ifname: &str,
    ) -> Result<bool, IoError> {
        let mut installer = self.installer.lock().await;

        let routes = installer
            .list_routes()
            .await
            .map_err(IoError::RouteListError)?;
        if routes
            .iter()
            .any(|route| route.prefix == prefix && route.is_connected())
        {
            Debug::KernelRouteSkipConnected(&prefix).log();
            return Ok(false);
        }

        Debug::KernelRouteInstall(&prefix, Some(nexthop), ifname).log();
        installer
            .add_route(prefix, nexthop, ifname)
            .await
            .map_err(|error| IoError::RouteInstallError(prefix, error))?;

        Ok(true)
    }

    // Removes the routes installed by OSPF, optionally restricted to one
    // address family. Returns the number of removed routes.
    pub async fn delete_routes(
        &self,
        af: Option<AddressFamily>,
    ) -> Result<usize, IoError> {
        let mut installer = self.installer.lock().await;

        let routes = installer
            .list_routes()
            .await
            .map_err(IoError::RouteListError)?;

        let mut count = 0;
        for route in routes.iter().filter(|route| {
            route.is_ospf()
                && af.is_none_or(|af| route.address_family() == af)
        }) {
            Debug::KernelRouteUninstall(
                &route.prefix,
                route.nexthop,
                &route.ifname,
            )
            .log();
            installer.delete_route(route).await.map_err(|error| {
                IoError::RouteUninstallError(route.prefix, error)
            })?;
            count += 1;
        }

        Ok(count)
    }

    pub async fn list_routes(&self) -> Result<Vec<KernelRoute>, IoError> {
        let mut installer = self.installer.lock().await;
        installer
            .list_routes()
            .await
            .map_err(IoError::RouteListError)
    }
}
