//! A blocking frame source/sink, implemented by both descriptor kinds.
//!
//! Front ends that only move whole frames depend on this trait instead of on
//! [`Socket`] or [`TunDevice`] directly.

use netbridge_common::error::Result;
use netbridge_common::network::destination::Destination;

use crate::socket::Socket;
use crate::tun::TunDevice;

pub trait Device {
    /// Receives one frame into `buf`, returning its length.
    fn recv_frame(&self, buf: &mut [u8]) -> Result<usize>;

    /// Sends one frame, returning the count the OS accepted.
    fn send_frame(&self, frame: &[u8]) -> Result<usize>;

    /// Short human-readable name for logs.
    fn label(&self) -> String;
}

impl Device for Socket {
    fn recv_frame(&self, buf: &mut [u8]) -> Result<usize> {
        let len = buf.len();
        self.recv(buf, 0, len)
    }

    fn send_frame(&self, frame: &[u8]) -> Result<usize> {
        self.send_to(frame, 0, frame.len(), 0, &Destination::Unspecified)
    }

    fn label(&self) -> String {
        format!("{} socket", self.family())
    }
}

impl Device for TunDevice {
    fn recv_frame(&self, buf: &mut [u8]) -> Result<usize> {
        self.read(buf, 0)
    }

    fn send_frame(&self, frame: &[u8]) -> Result<usize> {
        self.write(frame, 0, frame.len())
    }

    fn label(&self) -> String {
        self.name().to_string()
    }
}
