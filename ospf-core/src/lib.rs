//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod config;
pub mod debug;
pub mod error;
pub mod network;
pub mod ospfv2;
pub mod ospfv3;
pub mod packet;
pub mod route;
pub mod southbound;
pub mod version;
