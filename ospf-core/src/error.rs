//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use ipnetwork::IpNetwork;
use ospf_utils::ip::AddrFormatError;
use ospf_utils::task::TimerError;
use tracing::{error, warn};

use crate::network::MulticastAddr;
use crate::packet::error::{DecodeError, ValidationError};

// OSPF errors.
#[derive(Debug)]
pub enum Error {
    // I/O errors
    IoError(IoError),
    // Packet input/output
    PacketDecodeError(DecodeError),
    PacketValidationError(ValidationError),
    // Other
    AddrFormatError(AddrFormatError),
    TimerError(TimerError),
}

// OSPF I/O errors.
#[derive(Debug)]
pub enum IoError {
    SendError(std::io::Error),
    RecvError(std::io::Error),
    MulticastJoinError(MulticastAddr, std::io::Error),
    RouteInstallError(IpNetwork, std::io::Error),
    RouteUninstallError(IpNetwork, std::io::Error),
    RouteListError(std::io::Error),
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::IoError(error) => {
                error.log();
            }
            Error::PacketDecodeError(error) => {
                warn!(%error, "{}", self);
            }
            Error::PacketValidationError(error) => {
                warn!(field = error.field(), %error, "{}", self);
            }
            Error::AddrFormatError(error) => {
                warn!(%error, "{}", self);
            }
            Error::TimerError(error) => {
                error!(%error, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(error) => error.fmt(f),
            Error::PacketDecodeError(..) => {
                write!(f, "failed to decode packet")
            }
            Error::PacketValidationError(..) => {
                write!(f, "packet failed validation")
            }
            Error::AddrFormatError(..) => {
                write!(f, "invalid address")
            }
            Error::TimerError(..) => {
                write!(f, "failed to create timer")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(error) => Some(error),
            Error::PacketDecodeError(error) => Some(error),
            Error::PacketValidationError(error) => Some(error),
            Error::AddrFormatError(error) => Some(error),
            Error::TimerError(error) => Some(error),
        }
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl From<DecodeError> for Error {
    fn from(error: DecodeError) -> Error {
        Error::PacketDecodeError(error)
    }
}

impl From<ValidationError> for Error {
    fn from(error: ValidationError) -> Error {
        Error::PacketValidationError(error)
    }
}

impl From<AddrFormatError> for Error {
    fn from(error: AddrFormatError) -> Error {
        Error::AddrFormatError(error)
    }
}

impl From<TimerError> for Error {
    fn from(error: TimerError) -> Error {
        Error::TimerError(error)
    }
}

// ===== impl IoError =====

impl IoError {
    pub(crate) fn log(&self) {
        match self {
            IoError::RecvError(error) | IoError::SendError(error) => {
                warn!(error = %with_source(error), "{}", self);
            }
            IoError::MulticastJoinError(addr, error) => {
                warn!(?addr, error = %with_source(error), "{}", self);
            }
            IoError::RouteInstallError(prefix, error)
            | IoError::RouteUninstallError(prefix, error) => {
                error!(%prefix, error = %with_source(error), "{}", self);
            }
            IoError::RouteListError(error) => {
                error!(error = %with_source(error), "{}", self);
            }
        }
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::SendError(..) => {
                write!(f, "failed to send IP packet")
            }
            IoError::RecvError(..) => {
                write!(f, "failed to receive IP packet")
            }
            IoError::MulticastJoinError(..) => {
                write!(f, "failed to join multicast group")
            }
            IoError::RouteInstallError(..) => {
                write!(f, "failed to install route")
            }
            IoError::RouteUninstallError(..) => {
                write!(f, "failed to uninstall route")
            }
            IoError::RouteListError(..) => {
                write!(f, "failed to list kernel routes")
            }
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::SendError(error)
            | IoError::RecvError(error)
            | IoError::MulticastJoinError(_, error)
            | IoError::RouteInstallError(_, error)
            | IoError::RouteUninstallError(_, error)
            | IoError::RouteListError(error) => Some(error),
        }
    }
}

// ===== global functions =====

fn with_source<E: std::error::Error>(error: E) -> String {
    if let Some(source) = error.source() {
        format!("{} ({})", error, with_source(source))
    } else {
        error.to_string()
    }
}
