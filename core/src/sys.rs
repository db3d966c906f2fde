//! Native records shared by the socket and TUN paths.
//!
//! Everything here converts between the crate's byte-oriented types and the C structs
//! the kernel expects. No system calls are made in this module.

use std::mem;
use std::ptr;

use netbridge_common::error::{Error, Result};
use netbridge_common::network::address::SocketAddress;
use netbridge_common::network::family::AddressFamily;

const FAMILY_LEN: usize = mem::size_of::<libc::sa_family_t>();
const STORAGE_LEN: usize = mem::size_of::<libc::sockaddr_storage>();

pub const IFNAMSIZ: usize = 16;
pub const TUNSETIFF: libc::c_ulong = 0x4004_54ca;
pub const IFF_TUN: libc::c_short = 0x0001;
pub const IFF_NO_PI: libc::c_short = 0x1000;
pub const DEV_NET_TUN: &std::ffi::CStr = c"/dev/net/tun";

/// A `sockaddr_storage` plus the length the kernel should read or did write.
pub struct RawAddress {
    storage: libc::sockaddr_storage,
    len: libc::socklen_t,
}

impl RawAddress {
    /// Zeroed record with the full storage length, ready for `recvfrom`/`getsockname`.
    pub fn empty() -> Self {
        Self {
            // SAFETY: sockaddr_storage is plain old data; all-zero is a valid value.
            storage: unsafe { mem::zeroed() },
            len: STORAGE_LEN as libc::socklen_t,
        }
    }

    pub fn encode(addr: &SocketAddress) -> Result<Self> {
        let mut raw = Self::empty();
        let family = addr.family();
        let bytes = addr.bytes();

        if family == AddressFamily::INET && matches!(bytes.len(), 4 | 6) {
            let port = port_of(&bytes[4..]);
            let sin = libc::sockaddr_in {
                sin_family: libc::AF_INET as libc::sa_family_t,
                sin_port: port.to_be(),
                sin_addr: libc::in_addr {
                    s_addr: u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
                },
                sin_zero: [0; 8],
            };
            raw.write(&sin);
            return Ok(raw);
        }

        if family == AddressFamily::inet6() && matches!(bytes.len(), 16 | 18) {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(&bytes[..16]);
            let sin6 = libc::sockaddr_in6 {
                sin6_family: libc::AF_INET6 as libc::sa_family_t,
                sin6_port: port_of(&bytes[16..]).to_be(),
                sin6_flowinfo: 0,
                sin6_addr: libc::in6_addr { s6_addr: octets },
                sin6_scope_id: 0,
            };
            raw.write(&sin6);
            return Ok(raw);
        }

        if bytes.len() > STORAGE_LEN - FAMILY_LEN {
            return Err(Error::OutOfBounds {
                offset: FAMILY_LEN,
                length: bytes.len(),
                capacity: STORAGE_LEN,
            });
        }
        raw.storage.ss_family = family.code() as libc::sa_family_t;
        raw.as_bytes_mut()[FAMILY_LEN..FAMILY_LEN + bytes.len()].copy_from_slice(bytes);
        raw.len = (FAMILY_LEN + bytes.len()) as libc::socklen_t;
        Ok(raw)
    }

    /// Reads back what the kernel wrote. IP families come back in their port-bearing form.
    pub fn decode(&self) -> SocketAddress {
        let len = (self.len as usize).min(STORAGE_LEN);
        if len < FAMILY_LEN {
            return SocketAddress::new(AddressFamily::UNSPEC, Vec::new());
        }
        let family = AddressFamily(i32::from(self.storage.ss_family));

        if family == AddressFamily::INET && len >= mem::size_of::<libc::sockaddr_in>() {
            // SAFETY: the kernel filled a sockaddr_in; storage is large and aligned enough.
            let sin = unsafe { &*(&self.storage as *const _ as *const libc::sockaddr_in) };
            let mut bytes = sin.sin_addr.s_addr.to_ne_bytes().to_vec();
            bytes.extend_from_slice(&u16::from_be(sin.sin_port).to_be_bytes());
            return SocketAddress::new(family, bytes);
        }

        if family == AddressFamily::inet6() && len >= mem::size_of::<libc::sockaddr_in6>() {
            // SAFETY: as above, for sockaddr_in6.
            let sin6 = unsafe { &*(&self.storage as *const _ as *const libc::sockaddr_in6) };
            let mut bytes = sin6.sin6_addr.s6_addr.to_vec();
            bytes.extend_from_slice(&u16::from_be(sin6.sin6_port).to_be_bytes());
            return SocketAddress::new(family, bytes);
        }

        SocketAddress::new(family, self.as_bytes()[FAMILY_LEN..len].to_vec())
    }

    /// Interface index carried by a link-layer record, 0 for every other family.
    pub fn ifindex(&self) -> u32 {
        let len = self.len as usize;
        if i32::from(self.storage.ss_family) != libc::AF_PACKET
            || len < mem::size_of::<libc::sockaddr_ll>()
        {
            return 0;
        }
        // SAFETY: family and length say the kernel wrote a sockaddr_ll.
        let sll = unsafe { &*(&self.storage as *const _ as *const libc::sockaddr_ll) };
        sll.sll_ifindex as u32
    }

    pub fn as_ptr(&self) -> *const libc::sockaddr {
        &self.storage as *const _ as *const libc::sockaddr
    }

    pub fn as_mut_ptr(&mut self) -> *mut libc::sockaddr {
        &mut self.storage as *mut _ as *mut libc::sockaddr
    }

    pub fn len(&self) -> libc::socklen_t {
        self.len
    }

    pub fn len_mut(&mut self) -> &mut libc::socklen_t {
        &mut self.len
    }

    fn write<T>(&mut self, record: &T) {
        let size = mem::size_of::<T>();
        debug_assert!(size <= STORAGE_LEN);
        // SAFETY: T is one of the sockaddr_* records, all smaller than sockaddr_storage.
        unsafe {
            ptr::copy_nonoverlapping(
                record as *const T as *const u8,
                &mut self.storage as *mut _ as *mut u8,
                size,
            );
        }
        self.len = size as libc::socklen_t;
    }

    fn as_bytes(&self) -> &[u8] {
        // SAFETY: sockaddr_storage is STORAGE_LEN bytes of plain data.
        unsafe { std::slice::from_raw_parts(&self.storage as *const _ as *const u8, STORAGE_LEN) }
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above.
        unsafe { std::slice::from_raw_parts_mut(&mut self.storage as *mut _ as *mut u8, STORAGE_LEN) }
    }
}

fn port_of(tail: &[u8]) -> u16 {
    match tail {
        [hi, lo] => u16::from_be_bytes([*hi, *lo]),
        _ => 0,
    }
}

/// Bytes of a plain C record, for passing typed option values through the byte interface.
pub fn record_bytes<T: Copy>(record: &T) -> &[u8] {
    // SAFETY: T is Copy plain data and the slice borrows it for its whole size.
    unsafe { std::slice::from_raw_parts(record as *const T as *const u8, mem::size_of::<T>()) }
}

/// `struct ifreq` restricted to the name and flags members `TUNSETIFF` uses.
#[repr(C)]
pub struct IfReq {
    name: [libc::c_char; IFNAMSIZ],
    flags: libc::c_short,
    _pad: [u8; 22],
}

impl IfReq {
    /// Copies at most `IFNAMSIZ - 1` bytes of `name`, keeping the terminator.
    pub fn new(name: &str, flags: libc::c_short) -> Self {
        let mut req = Self { name: [0; IFNAMSIZ], flags, _pad: [0; 22] };
        for (dst, src) in req.name.iter_mut().zip(truncate_name(name)) {
            *dst = *src as libc::c_char;
        }
        req
    }

    /// Name as left in the record by the kernel.
    pub fn name(&self) -> String {
        let bytes: Vec<u8> = self
            .name
            .iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c as u8)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn flags(&self) -> libc::c_short {
        self.flags
    }

    pub fn as_mut_ptr(&mut self) -> *mut libc::c_void {
        self as *mut Self as *mut libc::c_void
    }
}

/// Interface-name bytes the kernel will see: cut at the first NUL and at `IFNAMSIZ - 1`.
pub fn truncate_name(name: &str) -> &[u8] {
    let bytes = name.as_bytes();
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end.min(IFNAMSIZ - 1)]
}
