use is_root::is_root;
use netbridge_common::network::family::constant_table;
use netbridge_common::utils::interface::NetworkInterfaceExtension;
use netbridge_core::NetBridge;
use pnet::datalink;

use crate::terminal::print;

const KEY_WIDTH: usize = 14;

pub fn info(bridge: &NetBridge) -> anyhow::Result<()> {
    print::header("native constants");
    for (name, value) in constant_table() {
        print::aligned_line(name, value, KEY_WIDTH);
    }
    print::aligned_line("PF_INET6*", NetBridge::pf_inet6(), KEY_WIDTH);

    print::header("runtime");
    print::aligned_line("privileged", is_root(), KEY_WIDTH);
    print::aligned_line("debug", bridge.config().debug, KEY_WIDTH);
    print::aligned_line("tun buffer", bridge.config().tun_recv_buffer, KEY_WIDTH);

    print::header("interfaces");
    for iface in datalink::interfaces() {
        print::print_status(iface.describe());
    }
    Ok(())
}
