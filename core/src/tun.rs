//! # TUN devices
//!
//! Opens `/dev/net/tun`, attaches the descriptor to a named point-to-point interface
//! with `TUNSETIFF`, and moves whole IP packets in and out with blocking reads and
//! writes. Open, read and write failures come back as errors through the funnel; the
//! process is never brought down from here.

use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};
use std::sync::Mutex;

use netbridge_common::config::Config;
use netbridge_common::error::{Error, Result};
use netbridge_common::utils::buffer;

use crate::diag::{Diagnostics, TUN_TAG};
use crate::sys::{self, IfReq};

#[derive(Debug)]
pub struct TunDevice {
    fd: OwnedFd,
    name: String,
    packet_info: bool,
    recv_buffer: Mutex<Vec<u8>>,
    diag: Diagnostics,
}

impl TunDevice {
    /// Creates or attaches to the TUN interface `name`.
    ///
    /// The name is cut to 15 bytes plus terminator before the kernel sees it; the name
    /// the kernel actually bound is available from [`TunDevice::name`].
    pub fn open(name: &str, config: &Config) -> Result<Self> {
        let diag = Diagnostics::new(TUN_TAG, config);
        let ret = unsafe { libc::open(sys::DEV_NET_TUN.as_ptr(), libc::O_RDWR) };
        let fd = diag.check("open /dev/net/tun", ret)?;
        // SAFETY: open() just returned this descriptor; dropping it on the error path below closes it.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };

        let mut flags = sys::IFF_TUN;
        if !config.tun_packet_info {
            flags |= sys::IFF_NO_PI;
        }
        let mut req = IfReq::new(name, flags);
        let ret = unsafe { libc::ioctl(fd.as_raw_fd(), sys::TUNSETIFF as _, req.as_mut_ptr()) };
        diag.check("ioctl TUNSETIFF", ret)?;

        let bound = req.name();
        diag.trace(format_args!("tun '{name}' bound as '{bound}' on fd {}", fd.as_raw_fd()));
        Ok(Self::from_parts(fd, bound, config, diag))
    }

    fn from_parts(fd: OwnedFd, name: String, config: &Config, diag: Diagnostics) -> Self {
        Self {
            fd,
            name,
            packet_info: config.tun_packet_info,
            recv_buffer: Mutex::new(vec![0u8; config.tun_recv_buffer]),
            diag,
        }
    }

    /// Interface name as bound by the kernel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether frames carry the 4-byte packet information header.
    pub fn packet_info(&self) -> bool {
        self.packet_info
    }

    /// Blocking read of at most `buf.len() - offset` bytes into `buf[offset..]`.
    pub fn read(&self, buf: &mut [u8], offset: usize) -> Result<usize> {
        let range = buffer::tail_range(buf.len(), offset)?;
        let data = &mut buf[range];
        let ret = unsafe { libc::read(self.raw(), data.as_mut_ptr() as *mut libc::c_void, data.len()) };
        let read = self.diag.check_len("read()", ret)?;
        self.diag.trace(format_args!("read {}: {read} bytes", self.name));
        Ok(read)
    }

    /// Blocking write of `buf[offset..offset + length]`. A short count is returned as is.
    pub fn write(&self, buf: &[u8], offset: usize, length: usize) -> Result<usize> {
        let range = buffer::checked_range(buf.len(), offset, length)?;
        let data = &buf[range];
        let ret = unsafe { libc::write(self.raw(), data.as_ptr() as *const libc::c_void, data.len()) };
        let written = self.diag.check_len("write()", ret)?;
        self.diag.trace(format_args!("write {}: {written}/{length} bytes", self.name));
        Ok(written)
    }

    /// Writes one whole packet; anything less than all of it is [`Error::ShortWrite`].
    pub fn send_packet(&self, packet: &[u8]) -> Result<()> {
        let written = self.write(packet, 0, packet.len())?;
        if written != packet.len() {
            return Err(Error::ShortWrite { written, expected: packet.len() });
        }
        Ok(())
    }

    /// Reads one packet into the shared receive buffer and returns a copy of it.
    ///
    /// Concurrent callers are serialized on the buffer.
    pub fn recv_packet(&self) -> Result<Vec<u8>> {
        let mut scratch = self
            .recv_buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let len = self.read(&mut scratch, 0)?;
        Ok(scratch[..len].to_vec())
    }

    pub fn close(self) -> Result<()> {
        let fd = self.fd.into_raw_fd();
        let ret = unsafe { libc::close(fd) };
        self.diag.check("close", ret)?;
        self.diag.trace(format_args!("closed {}", self.name));
        Ok(())
    }

    fn raw(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl AsRawFd for TunDevice {
    fn as_raw_fd(&self) -> RawFd {
        self.raw()
    }
}

impl AsFd for TunDevice {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
