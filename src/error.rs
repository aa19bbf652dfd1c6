// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Error types for the crate

#![deny(missing_docs)]

use std::{fmt, io, net::AddrParseError};

use thiserror::Error;

/// An alias for results returned by functions of this crate
pub type HostsFileResult<T> = ::std::result::Result<T, HostsFileError>;

/// The error kind for errors that get returned in the crate
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HostsFileErrorKind {
    /// A hostname did not conform to the hosts(5) grammar
    ///
    /// Produced by the `set_host` family of mutators before any text is
    /// rewritten; the entry that rejected the name is left untouched.
    #[error("invalid hostname: {0:?}")]
    InvalidHostname(String),

    /// An address string could not be parsed as an IPv4 or IPv6 address
    #[error("invalid IP address: {0}")]
    AddrParse(#[from] AddrParseError),

    /// A write was requested on a document with no backing path
    #[error("hosts file has no backing path")]
    NoPath,

    // foreign
    /// An error got returned from IO
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// The error type for errors that get returned in the crate
#[derive(Debug, Error)]
pub struct HostsFileError {
    kind: HostsFileErrorKind,
}

impl HostsFileError {
    /// Get the kind of the error
    pub fn kind(&self) -> &HostsFileErrorKind {
        &self.kind
    }

    /// Returns true if the error came from hostname validation
    pub fn is_invalid_hostname(&self) -> bool {
        matches!(self.kind, HostsFileErrorKind::InvalidHostname(_))
    }
}

impl fmt::Display for HostsFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl<E: Into<HostsFileErrorKind>> From<E> for HostsFileError {
    fn from(error: E) -> Self {
        Self { kind: error.into() }
    }
}

impl From<HostsFileError> for io::Error {
    fn from(e: HostsFileError) -> Self {
        match e.kind {
            HostsFileErrorKind::Io(io) => io,
            _ => Self::new(io::ErrorKind::InvalidData, e),
        }
    }
}
