//! # Socket addresses
//!
//! A [`SocketAddress`] is a family tag plus the bytes of that family's address record.
//! The bytes are placed in the native `sockaddr` without being validated here:
//!
//! * `INET`: 4 bytes (address) or 6 bytes (address, then port in network order).
//! * `INET6`: 16 bytes (address) or 18 bytes (address, then port in network order).
//! * anything else: the record body that follows the family field, copied verbatim.
//!   For `PACKET` this is the `sockaddr_ll` body: protocol, interface index,
//!   hardware type, packet type, address length, hardware address.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

use pnet::util::MacAddr;

use crate::error::Result;
use crate::network::family::AddressFamily;
use crate::utils::buffer;

/// Size of the `sockaddr_ll` record without its family field.
pub const LINK_BODY_LEN: usize = 18;

const LINK_IFINDEX: std::ops::Range<usize> = 2..6;
const LINK_HALEN: usize = 9;
const LINK_ADDR: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocketAddress {
    family: AddressFamily,
    bytes: Vec<u8>,
}

impl SocketAddress {
    pub fn new(family: AddressFamily, bytes: Vec<u8>) -> Self {
        Self { family, bytes }
    }

    /// Takes the first `address_len` bytes of `address`.
    ///
    /// Fails with `OutOfBounds` when the length exceeds the buffer.
    pub fn from_parts(family: AddressFamily, address: &[u8], address_len: usize) -> Result<Self> {
        let range = buffer::checked_range(address.len(), 0, address_len)?;
        Ok(Self::new(family, address[range].to_vec()))
    }

    pub fn inet(addr: Ipv4Addr) -> Self {
        Self::new(AddressFamily::INET, addr.octets().to_vec())
    }

    pub fn inet6(addr: Ipv6Addr) -> Self {
        Self::new(AddressFamily::inet6(), addr.octets().to_vec())
    }

    pub fn from_socket_addr(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(v4) => {
                let mut bytes = v4.ip().octets().to_vec();
                bytes.extend_from_slice(&v4.port().to_be_bytes());
                Self::new(AddressFamily::INET, bytes)
            }
            SocketAddr::V6(v6) => {
                let mut bytes = v6.ip().octets().to_vec();
                bytes.extend_from_slice(&v6.port().to_be_bytes());
                Self::new(AddressFamily::inet6(), bytes)
            }
        }
    }

    /// Link-layer address bound to one interface and one ethertype.
    pub fn link(ifindex: u32, protocol: u16, hw_addr: Option<MacAddr>) -> Self {
        let mut bytes = vec![0u8; LINK_BODY_LEN];
        bytes[0..2].copy_from_slice(&protocol.to_be_bytes());
        bytes[LINK_IFINDEX].copy_from_slice(&(ifindex as i32).to_ne_bytes());
        if let Some(mac) = hw_addr {
            bytes[LINK_HALEN] = 6;
            bytes[LINK_ADDR..LINK_ADDR + 6].copy_from_slice(&mac.octets());
        }
        Self::new(AddressFamily::PACKET, bytes)
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// IP address and port, for the two IP families.
    pub fn to_socket_addr(&self) -> Option<SocketAddr> {
        let port = |tail: &[u8]| match tail {
            [hi, lo] => Some(u16::from_be_bytes([*hi, *lo])),
            [] => Some(0),
            _ => None,
        };
        if self.family == AddressFamily::INET && matches!(self.bytes.len(), 4 | 6) {
            let octets: [u8; 4] = self.bytes[..4].try_into().ok()?;
            let port = port(&self.bytes[4..])?;
            return Some(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::from(octets), port)));
        }
        if self.family == AddressFamily::inet6() && matches!(self.bytes.len(), 16 | 18) {
            let octets: [u8; 16] = self.bytes[..16].try_into().ok()?;
            let port = port(&self.bytes[16..])?;
            return Some(SocketAddr::V6(SocketAddrV6::new(Ipv6Addr::from(octets), port, 0, 0)));
        }
        None
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.to_socket_addr().map(|addr| addr.ip())
    }

    /// Interface index of a link-layer address.
    pub fn ifindex(&self) -> Option<u32> {
        if self.family != AddressFamily::PACKET || self.bytes.len() < LINK_IFINDEX.end {
            return None;
        }
        let raw: [u8; 4] = self.bytes[LINK_IFINDEX].try_into().ok()?;
        Some(i32::from_ne_bytes(raw) as u32)
    }

    /// Hardware address of a link-layer address, when it carries a 6-byte one.
    pub fn hw_addr(&self) -> Option<MacAddr> {
        if self.family != AddressFamily::PACKET || self.bytes.len() < LINK_ADDR + 6 {
            return None;
        }
        if self.bytes[LINK_HALEN] != 6 {
            return None;
        }
        let b = &self.bytes[LINK_ADDR..LINK_ADDR + 6];
        Some(MacAddr::new(b[0], b[1], b[2], b[3], b[4], b[5]))
    }
}

impl fmt::Display for SocketAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(addr) = self.to_socket_addr() {
            return write!(f, "{addr}");
        }
        if let Some(ifindex) = self.ifindex() {
            return match self.hw_addr() {
                Some(mac) => write!(f, "{mac}%{ifindex}"),
                None => write!(f, "link%{ifindex}"),
            };
        }
        write!(f, "{}[", self.family)?;
        for byte in &self.bytes {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "]")
    }
}
