use is_root::is_root;
use netbridge_core::NetBridge;
use tracing::{info, warn};

use crate::commands::capture;
use crate::terminal::format;

pub fn tun(bridge: &NetBridge, name: &str, count: Option<usize>) -> anyhow::Result<()> {
    if !is_root() {
        warn!("opening /dev/net/tun usually needs CAP_NET_ADMIN");
    }

    let device = bridge.open_tun(name)?;
    if device.name() != name {
        warn!("interface bound as '{}'", device.name());
    }
    info!("opened {}; bring it up with `ip link set {} up`", device.name(), device.name());

    let packet_info = device.packet_info();
    let seen = capture(&device, count, bridge.config().tun_recv_buffer, |frame| {
        format::tun_summary(frame, packet_info)
    })?;
    info!("read {seen} packets");
    device.close()?;
    Ok(())
}
