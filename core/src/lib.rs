//! # netbridge core
//!
//! Blocking packet I/O for raw, datagram and link-layer sockets and for TUN devices.
//!
//! * **[`socket`]**: descriptor creation, binding, option pass-through, send and receive.
//! * **[`tun`]**: opening a named TUN interface and reading/writing packets on it.
//! * **[`diag`]**: the error funnel every failure goes through.
//! * **[`bridge`]**: startup/cleanup bracket and the configuration handles inherit.
//! * **[`device`]**: the frame-I/O trait both handle kinds implement.
//!
//! Callers supply and interpret the bytes; nothing here parses packets.

#[cfg(not(target_os = "linux"))]
compile_error!("netbridge-core needs Linux: packet sockets and /dev/net/tun");

pub mod bridge;
pub mod device;
pub mod diag;
pub mod socket;
pub mod sys;
pub mod tun;

pub use bridge::NetBridge;
pub use device::Device;
pub use socket::{Received, Socket};
pub use tun::TunDevice;
