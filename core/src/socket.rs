//! # Socket core
//!
//! Raw, datagram and packet sockets over a single owned descriptor.
//!
//! Every data operation takes the caller's buffer together with an `(offset, length)`
//! window. The window is checked against the buffer before the OS sees a pointer, and
//! the count the OS returns is handed back unchanged: a short send or a zero-length
//! receive is a value, not an error, and nothing is retried here.

use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};
use std::time::Duration;

use netbridge_common::config::Config;
use netbridge_common::error::Result;
use netbridge_common::network::address::SocketAddress;
use netbridge_common::network::destination::Destination;
use netbridge_common::network::family::{AddressFamily, SocketType};
use netbridge_common::utils::buffer;

use crate::diag::{Diagnostics, SOCKET_TAG};
use crate::sys::{self, RawAddress};

/// What `recv_from` learned about a datagram besides its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    /// Byte count reported by the OS.
    pub len: usize,
    /// Sender address as written by the kernel.
    pub from: SocketAddress,
    /// Receiving interface; 0 when the family does not report one.
    pub ifindex: u32,
}

impl Received {
    /// Copies the sender address bytes and the interface index (4 bytes, network order)
    /// into caller buffers, truncating to their size. Returns the bytes written to each.
    pub fn write_into(&self, out_address: &mut [u8], out_interface: &mut [u8]) -> (usize, usize) {
        let address = self.from.bytes();
        let address_len = address.len().min(out_address.len());
        out_address[..address_len].copy_from_slice(&address[..address_len]);

        let ifindex = self.ifindex.to_be_bytes();
        let interface_len = ifindex.len().min(out_interface.len());
        out_interface[..interface_len].copy_from_slice(&ifindex[..interface_len]);

        (address_len, interface_len)
    }
}

/// An open socket. Dropping it closes the descriptor.
#[derive(Debug)]
pub struct Socket {
    fd: OwnedFd,
    family: AddressFamily,
    diag: Diagnostics,
}

impl Socket {
    /// Asks the OS for a new socket. The triple is passed through unchecked.
    ///
    /// Packet sockets expect `protocol` in network byte order, see
    /// [`netbridge_common::network::family::link_protocol`].
    pub fn new(family: AddressFamily, ty: SocketType, protocol: i32, config: &Config) -> Result<Self> {
        let diag = Diagnostics::new(SOCKET_TAG, config);
        let ret = unsafe { libc::socket(family.code(), ty.code(), protocol) };
        let fd = diag.check("socket", ret)?;
        diag.trace(format_args!("socket({family}, {ty}, {protocol}) -> fd {fd}"));
        // SAFETY: socket() just returned this descriptor and nothing else owns it.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        Ok(Self { fd, family, diag })
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn bind(&self, addr: &SocketAddress) -> Result<()> {
        let raw = RawAddress::encode(addr)?;
        let ret = unsafe { libc::bind(self.raw(), raw.as_ptr(), raw.len()) };
        self.diag.check("bind", ret)?;
        self.diag.trace(format_args!("bind fd {} to {addr}", self.raw()));
        Ok(())
    }

    /// Boundary form of [`Socket::bind`]: the first `address_len` bytes of `address`
    /// are the record body for `family`.
    pub fn bind_raw(&self, family: AddressFamily, address: &[u8], address_len: usize) -> Result<()> {
        let addr = SocketAddress::from_parts(family, address, address_len)?;
        self.bind(&addr)
    }

    /// Address the socket is bound to (`getsockname`).
    pub fn local_address(&self) -> Result<SocketAddress> {
        let mut raw = RawAddress::empty();
        let ret = unsafe { libc::getsockname(self.raw(), raw.as_mut_ptr(), raw.len_mut()) };
        self.diag.check("getsockname", ret)?;
        Ok(raw.decode())
    }

    /// Sends `buf[offset..offset + length]`. Returns the count the OS accepted.
    pub fn send_to(
        &self,
        buf: &[u8],
        offset: usize,
        length: usize,
        flags: i32,
        dest: &Destination,
    ) -> Result<usize> {
        let range = buffer::checked_range(buf.len(), offset, length)?;
        let data = &buf[range];
        let ret = match dest.to_address() {
            None => unsafe {
                libc::send(self.raw(), data.as_ptr() as *const libc::c_void, data.len(), flags)
            },
            Some(addr) => {
                let raw = RawAddress::encode(&addr)?;
                unsafe {
                    libc::sendto(
                        self.raw(),
                        data.as_ptr() as *const libc::c_void,
                        data.len(),
                        flags,
                        raw.as_ptr(),
                        raw.len(),
                    )
                }
            }
        };
        let sent = self.diag.check_len("sendto", ret)?;
        self.diag.trace(format_args!("sendto fd {}: {sent}/{length} bytes to {dest:?}", self.raw()));
        Ok(sent)
    }

    /// Boundary form of [`Socket::send_to`]: the destination is given as
    /// `(interface index, address string, port)`.
    #[allow(clippy::too_many_arguments)]
    pub fn sendto(
        &self,
        buf: &[u8],
        offset: usize,
        length: usize,
        flags: i32,
        ifindex: i32,
        dest_address: &str,
        dest_port: u16,
    ) -> Result<usize> {
        let dest = Destination::from_parts(ifindex, dest_address, dest_port)?;
        self.send_to(buf, offset, length, flags, &dest)
    }

    /// Blocking receive into `buf[offset..offset + length]`.
    pub fn recv(&self, buf: &mut [u8], offset: usize, length: usize) -> Result<usize> {
        let range = buffer::checked_range(buf.len(), offset, length)?;
        let data = &mut buf[range];
        let ret = unsafe {
            libc::recv(self.raw(), data.as_mut_ptr() as *mut libc::c_void, data.len(), 0)
        };
        let read = self.diag.check_len("recv", ret)?;
        self.diag.trace(format_args!("recv fd {}: {read} bytes", self.raw()));
        Ok(read)
    }

    /// Blocking receive that also reports the sender and the receiving interface.
    pub fn recv_from(&self, buf: &mut [u8], offset: usize, length: usize) -> Result<Received> {
        let range = buffer::checked_range(buf.len(), offset, length)?;
        let data = &mut buf[range];
        let mut raw = RawAddress::empty();
        let ret = unsafe {
            libc::recvfrom(
                self.raw(),
                data.as_mut_ptr() as *mut libc::c_void,
                data.len(),
                0,
                raw.as_mut_ptr(),
                raw.len_mut(),
            )
        };
        let len = self.diag.check_len("recvfrom", ret)?;
        let received = Received { len, from: raw.decode(), ifindex: raw.ifindex() };
        self.diag.trace(format_args!(
            "recvfrom fd {}: {len} bytes from {} on interface {}",
            self.raw(),
            received.from,
            received.ifindex
        ));
        Ok(received)
    }

    /// Boundary form of [`Socket::recv_from`] filling caller-owned output buffers.
    pub fn recvfrom(
        &self,
        buf: &mut [u8],
        offset: usize,
        length: usize,
        out_address: &mut [u8],
        out_interface: &mut [u8],
    ) -> Result<usize> {
        let received = self.recv_from(buf, offset, length)?;
        received.write_into(out_address, out_interface);
        Ok(received.len)
    }

    /// Hands `payload[..payload_len]` to the OS option table unchanged.
    ///
    /// `protocol_hint` is recorded in the debug trace only.
    pub fn set_option(
        &self,
        level: i32,
        name: i32,
        payload: &[u8],
        payload_len: usize,
        protocol_hint: i32,
    ) -> Result<()> {
        let range = buffer::checked_range(payload.len(), 0, payload_len)?;
        let data = &payload[range];
        let ret = unsafe {
            libc::setsockopt(
                self.raw(),
                level,
                name,
                data.as_ptr() as *const libc::c_void,
                data.len() as libc::socklen_t,
            )
        };
        self.diag.check("setsockopt", ret)?;
        self.diag.trace(format_args!(
            "setsockopt fd {} level {level} name {name}: {payload_len} bytes (hint {protocol_hint})",
            self.raw()
        ));
        Ok(())
    }

    /// Reads an option into `out[..out_len]`. Returns the length the OS reported.
    pub fn get_option(&self, level: i32, name: i32, out: &mut [u8], out_len: usize) -> Result<usize> {
        let range = buffer::checked_range(out.len(), 0, out_len)?;
        let data = &mut out[range];
        let mut len = data.len() as libc::socklen_t;
        let ret = unsafe {
            libc::getsockopt(self.raw(), level, name, data.as_mut_ptr() as *mut libc::c_void, &mut len)
        };
        self.diag.check("getsockopt", ret)?;
        Ok(len as usize)
    }

    /// `SO_RCVTIMEO` through the option pass-through; `None` blocks forever.
    pub fn set_recv_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or(Duration::ZERO);
        let tv = libc::timeval {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_usec: timeout.subsec_micros() as libc::suseconds_t,
        };
        let payload = sys::record_bytes(&tv);
        self.set_option(libc::SOL_SOCKET, libc::SO_RCVTIMEO, payload, payload.len(), 0)
    }

    /// Releases the descriptor now and reports the OS result.
    pub fn close(self) -> Result<()> {
        let fd = self.fd.into_raw_fd();
        let ret = unsafe { libc::close(fd) };
        self.diag.check("close", ret)?;
        self.diag.trace(format_args!("close fd {fd}"));
        Ok(())
    }

    fn raw(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl AsRawFd for Socket {
    fn as_raw_fd(&self) -> RawFd {
        self.raw()
    }
}

impl AsFd for Socket {
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
