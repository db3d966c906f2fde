//! Process-level entry points: startup, cleanup and the factory for handles.
//!
//! On Linux no native initialization is needed; `startup` and `cleanup` only fix the
//! configuration every handle is created with and log the bracket.

use netbridge_common::config::Config;
use netbridge_common::error::Result;
use netbridge_common::network::family::{AddressFamily, SocketType};
use tracing::debug;

use crate::socket::Socket;
use crate::tun::TunDevice;

#[derive(Debug)]
pub struct NetBridge {
    config: Config,
}

impl NetBridge {
    pub fn startup(config: Config) -> Result<Self> {
        debug!(target: "netbridge", debug = config.debug, "native layer started");
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runtime value of the IPv6 family.
    pub fn pf_inet6() -> AddressFamily {
        AddressFamily::inet6()
    }

    pub fn socket(&self, family: AddressFamily, ty: SocketType, protocol: i32) -> Result<Socket> {
        Socket::new(family, ty, protocol, &self.config)
    }

    pub fn open_tun(&self, name: &str) -> Result<TunDevice> {
        TunDevice::open(name, &self.config)
    }

    /// Ends the bracket. Handles already created stay valid until they are closed.
    pub fn cleanup(self) {
        debug!(target: "netbridge", "native layer cleaned up");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_inherit_bridge_config() {
        let bridge = NetBridge::startup(Config::default().with_debug(true)).unwrap();
        assert!(bridge.config().debug);
        let socket = bridge.socket(AddressFamily::INET, SocketType::DGRAM, 0).unwrap();
        assert_eq!(socket.family(), AddressFamily::INET);
        socket.close().unwrap();
        bridge.cleanup();
    }

    #[test]
    fn pf_inet6_is_queried_at_runtime() {
        assert_eq!(NetBridge::pf_inet6().code(), libc::AF_INET6);
    }

    #[test]
    fn socket_outlives_cleanup() {
        let bridge = NetBridge::startup(Config::default()).unwrap();
        let socket = bridge.socket(AddressFamily::INET, SocketType::DGRAM, 0).unwrap();
        bridge.cleanup();
        assert!(socket.local_address().is_ok());
    }
}
