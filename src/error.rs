// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! Crate error taxonomy.
//!
//! Failure granularity matters more than failure detail here: a `Config`
//! error prevents the reporter from being built at all, `Connection` and
//! `Transport` errors abort one report cycle, and `Encode`/`Security`
//! errors abort only the metric or datagram being processed. Nothing
//! escapes a report cycle - the scheduling caller never observes an error.

use crate::protocol::EncodeError;
use crate::security::SecurityError;
use std::fmt;
use std::io;

/// Errors surfaced by the reporter and its components.
#[derive(Debug)]
pub enum Error {
    /// Invalid configuration (missing credentials for a non-plaintext
    /// security level). Raised at build time, before any network activity.
    Config(String),

    /// Address resolution or socket-open failure, or a connect on an
    /// already-connected transport. Aborts the current cycle.
    Connection(String),

    /// Malformed header state while encoding one metric. The remaining
    /// metrics in the cycle are still processed.
    Encode(EncodeError),

    /// Cryptographic failure while sealing one datagram. Aborts only that
    /// datagram.
    Security(SecurityError),

    /// Send failure after a successful connect. The cycle proceeds to
    /// disconnect.
    Transport(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::Connection(msg) => write!(f, "connection error: {}", msg),
            Error::Encode(err) => write!(f, "encoding error: {}", err),
            Error::Security(err) => write!(f, "security error: {}", err),
            Error::Transport(err) => write!(f, "transport error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Encode(err) => Some(err),
            Error::Security(err) => Some(err),
            Error::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        Error::Encode(err)
    }
}

impl From<SecurityError> for Error {
    fn from(err: SecurityError) -> Self {
        Error::Security(err)
    }
}

/// Convenient alias for results using the crate [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
