use anyhow::Context;
use is_root::is_root;
use netbridge_common::network::address::SocketAddress;
use netbridge_common::network::family::{AddressFamily, ETH_P_ALL, SocketType, link_protocol};
use netbridge_common::utils::interface;
use netbridge_core::{Device, NetBridge};
use tracing::{info, warn};

use crate::commands::capture;
use crate::terminal::format;

const FRAME_BUFFER: usize = 65536;

pub fn sniff(bridge: &NetBridge, interface_name: &str, count: Option<usize>) -> anyhow::Result<()> {
    if !is_root() {
        warn!("packet sockets need CAP_NET_RAW; expect the socket call to fail");
    }

    let ifindex = interface::index_of(interface_name)
        .with_context(|| format!("no interface named '{interface_name}'"))?;

    let socket = bridge.socket(AddressFamily::PACKET, SocketType::RAW, link_protocol(ETH_P_ALL))?;
    socket.bind(&SocketAddress::link(ifindex, ETH_P_ALL, None))?;
    info!("listening on {} via {}", interface_name, socket.label());

    let seen = capture(&socket, count, FRAME_BUFFER, format::ethernet_summary)?;
    info!("captured {seen} frames");
    socket.close()?;
    Ok(())
}
