use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use pnet::util::MacAddr;

use crate::error::{Error, Result};
use crate::network::address::SocketAddress;

/// Where a datagram goes.
///
/// Packet sockets name the outgoing interface explicitly, so a link-layer destination
/// is an interface index plus an optional hardware address instead of an IP endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// No address: the socket is already connected or the protocol does not need one.
    Unspecified,
    Ip(SocketAddr),
    Link {
        ifindex: u32,
        /// Ethertype, host order.
        protocol: u16,
        hw_addr: Option<MacAddr>,
    },
}

impl Destination {
    /// Resolves the `(interface index, address, port)` triple of a `sendto` call.
    ///
    /// * `ifindex > 0`: link-layer destination; `address` is empty or a MAC address and
    ///   `port` is the ethertype.
    /// * otherwise an empty `address` means [`Destination::Unspecified`], anything else
    ///   must parse as an IPv4 or IPv6 address.
    pub fn from_parts(ifindex: i32, address: &str, port: u16) -> Result<Self> {
        let address = address.trim();
        if ifindex > 0 {
            let hw_addr = match address {
                "" => None,
                text => Some(
                    MacAddr::from_str(text).map_err(|_| Error::InvalidAddress(text.to_string()))?,
                ),
            };
            return Ok(Destination::Link {
                ifindex: ifindex as u32,
                protocol: port,
                hw_addr,
            });
        }
        if address.is_empty() {
            return Ok(Destination::Unspecified);
        }
        let ip = IpAddr::from_str(address).map_err(|_| Error::InvalidAddress(address.to_string()))?;
        Ok(Destination::Ip(SocketAddr::new(ip, port)))
    }

    pub fn to_address(&self) -> Option<SocketAddress> {
        match *self {
            Destination::Unspecified => None,
            Destination::Ip(addr) => Some(SocketAddress::from_socket_addr(addr)),
            Destination::Link { ifindex, protocol, hw_addr } => {
                Some(SocketAddress::link(ifindex, protocol, hw_addr))
            }
        }
    }
}

impl From<SocketAddr> for Destination {
    fn from(addr: SocketAddr) -> Self {
        Destination::Ip(addr)
    }
}
