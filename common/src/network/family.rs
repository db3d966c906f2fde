//! # Address families and socket types
//!
//! The numeric values below are part of the compatibility contract and match the
//! Linux ABI. Both types wrap any integer: an unsupported code is not rejected here,
//! the OS reports it when the socket is created.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressFamily(pub i32);

impl AddressFamily {
    pub const UNSPEC: AddressFamily = AddressFamily(0);
    pub const UNIX: AddressFamily = AddressFamily(1);
    pub const LOCAL: AddressFamily = AddressFamily(1);
    pub const INET: AddressFamily = AddressFamily(2);
    pub const PACKET: AddressFamily = AddressFamily(17);

    /// IPv6 family code of the running platform.
    ///
    /// Not part of the fixed constant table because the value differs between systems.
    pub fn inet6() -> AddressFamily {
        AddressFamily(libc::AF_INET6)
    }

    pub fn code(self) -> i32 {
        self.0
    }
}

impl From<i32> for AddressFamily {
    fn from(code: i32) -> Self {
        AddressFamily(code)
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AddressFamily::UNSPEC => write!(f, "PF_UNSPEC"),
            AddressFamily::UNIX => write!(f, "PF_UNIX"),
            AddressFamily::INET => write!(f, "PF_INET"),
            AddressFamily::PACKET => write!(f, "PF_PACKET"),
            family if family == AddressFamily::inet6() => write!(f, "PF_INET6"),
            AddressFamily(code) => write!(f, "PF_{code}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SocketType(pub i32);

impl SocketType {
    pub const STREAM: SocketType = SocketType(1);
    pub const DGRAM: SocketType = SocketType(2);
    pub const RAW: SocketType = SocketType(3);
    pub const RDM: SocketType = SocketType(4);
    pub const SEQPACKET: SocketType = SocketType(5);
    pub const PACKET: SocketType = SocketType(10);

    pub fn code(self) -> i32 {
        self.0
    }
}

impl From<i32> for SocketType {
    fn from(code: i32) -> Self {
        SocketType(code)
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            SocketType::STREAM => "SOCK_STREAM",
            SocketType::DGRAM => "SOCK_DGRAM",
            SocketType::RAW => "SOCK_RAW",
            SocketType::RDM => "SOCK_RDM",
            SocketType::SEQPACKET => "SOCK_SEQPACKET",
            SocketType::PACKET => "SOCK_PACKET",
            SocketType(code) => return write!(f, "SOCK_{code}"),
        };
        f.write_str(name)
    }
}

/// Every link-layer protocol, for capturing on packet sockets.
pub const ETH_P_ALL: u16 = 0x0003;
pub const ETH_P_IP: u16 = 0x0800;

/// Protocol argument for a packet socket: the ethertype in network byte order.
pub fn link_protocol(ethertype: u16) -> i32 {
    i32::from(ethertype.to_be())
}

/// Every named constant, in table order.
pub fn constant_table() -> Vec<(&'static str, i32)> {
    vec![
        ("PF_UNSPEC", AddressFamily::UNSPEC.code()),
        ("PF_UNIX", AddressFamily::UNIX.code()),
        ("PF_LOCAL", AddressFamily::LOCAL.code()),
        ("PF_INET", AddressFamily::INET.code()),
        ("PF_PACKET", AddressFamily::PACKET.code()),
        ("SOCK_STREAM", SocketType::STREAM.code()),
        ("SOCK_DGRAM", SocketType::DGRAM.code()),
        ("SOCK_RAW", SocketType::RAW.code()),
        ("SOCK_RDM", SocketType::RDM.code()),
        ("SOCK_SEQPACKET", SocketType::SEQPACKET.code()),
        ("SOCK_PACKET", SocketType::PACKET.code()),
    ]
}
