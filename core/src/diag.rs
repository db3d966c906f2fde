//! The error funnel.
//!
//! Every failing native call ends up here: the OS error is captured right after the
//! call, logged once with the component tag, and turned into an [`Error::Os`] for the
//! caller. Nothing in this crate decides that a failure is fatal.

use std::fmt;
use std::io;

use netbridge_common::config::Config;
use netbridge_common::error::{Error, Result};
use tracing::{debug, error};

pub const SOCKET_TAG: &str = "RawSocket";
pub const TUN_TAG: &str = "TunSocket";

#[derive(Debug, Clone, Copy)]
pub struct Diagnostics {
    tag: &'static str,
    debug: bool,
}

impl Diagnostics {
    pub fn new(tag: &'static str, config: &Config) -> Self {
        Self { tag, debug: config.debug }
    }

    /// Prefixes a message with the component tag.
    pub fn format(&self, msg: impl fmt::Display) -> String {
        format!("{}: {}", self.tag, msg)
    }

    /// Logs `source` and wraps it for the caller.
    pub fn fail(&self, op: &'static str, source: io::Error) -> Error {
        error!(target: "netbridge", errno = source.raw_os_error(), "{}", self.format(format_args!("{op}: {source}")));
        Error::Os { op, source }
    }

    /// Like [`Diagnostics::fail`] with the calling thread's last OS error.
    pub fn last_os_error(&self, op: &'static str) -> Error {
        self.fail(op, io::Error::last_os_error())
    }

    /// Checks a status-style return: `-1` is a failure.
    pub fn check(&self, op: &'static str, ret: libc::c_int) -> Result<libc::c_int> {
        if ret < 0 {
            return Err(self.last_os_error(op));
        }
        Ok(ret)
    }

    /// Checks a byte-count return; negative is a failure, anything else is reported as is.
    pub fn check_len(&self, op: &'static str, ret: libc::ssize_t) -> Result<usize> {
        if ret < 0 {
            return Err(self.last_os_error(op));
        }
        Ok(ret as usize)
    }

    /// Per-call trace, only when debugging is enabled.
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        if self.debug {
            debug!(target: "netbridge", "{}", self.format(args));
        }
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }
}
