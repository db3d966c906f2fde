use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;

/// Finds an interface by its exact name.
pub fn find_by_name<'a>(name: &str, interfaces: &'a [NetworkInterface]) -> Option<&'a NetworkInterface> {
    interfaces.iter().find(|iface| iface.name == name)
}

pub fn find_by_index(index: u32, interfaces: &[NetworkInterface]) -> Option<&NetworkInterface> {
    interfaces.iter().find(|iface| iface.index == index)
}

/// Index of a host interface, as expected by packet sockets.
pub fn index_of(name: &str) -> Option<u32> {
    let interfaces = datalink::interfaces();
    find_by_name(name, &interfaces).map(|iface| iface.index)
}

pub fn name_of(index: u32) -> Option<String> {
    let interfaces = datalink::interfaces();
    find_by_index(index, &interfaces).map(|iface| iface.name.clone())
}

pub trait NetworkInterfaceExtension {
    fn describe(&self) -> String;
}

impl NetworkInterfaceExtension for NetworkInterface {
    /// One-line summary: name, index, MAC and addresses.
    fn describe(&self) -> String {
        let mac = self.mac.map(|mac| mac.to_string()).unwrap_or_else(|| "-".to_string());
        let ips: Vec<String> = self
            .ips
            .iter()
            .map(|net| match net {
                IpNetwork::V4(v4) => v4.to_string(),
                IpNetwork::V6(v6) => v6.to_string(),
            })
            .collect();
        format!("{} (#{}) {} [{}]", self.name, self.index, mac, ips.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::ipnetwork::Ipv4Network;
    use pnet::util::MacAddr;
    use std::net::Ipv4Addr;

    fn ni(name: &str, index: u32, mac: Option<MacAddr>, ips: Vec<IpNetwork>) -> NetworkInterface {
        NetworkInterface {
            name: name.to_string(),
            description: "".to_string(),
            index,
            mac,
            ips,
            flags: 0,
        }
    }

    fn mock_interfaces() -> Vec<NetworkInterface> {
        vec![
            ni("lo", 1, None, vec![IpNetwork::V4(Ipv4Network::new(Ipv4Addr::LOCALHOST, 8).unwrap())]),
            ni("eth0", 2, Some(MacAddr::new(0x52, 0x54, 0, 0x12, 0x34, 0x56)), vec![]),
            ni("tun0", 5, None, vec![]),
        ]
    }

    #[test]
    fn find_by_name_matches_exactly() {
        let interfaces = mock_interfaces();
        assert_eq!(find_by_name("eth0", &interfaces).map(|i| i.index), Some(2));
        assert!(find_by_name("eth", &interfaces).is_none());
    }

    #[test]
    fn find_by_index_returns_owner() {
        let interfaces = mock_interfaces();
        assert_eq!(find_by_index(5, &interfaces).map(|i| i.name.as_str()), Some("tun0"));
        assert!(find_by_index(9, &interfaces).is_none());
    }

    #[test]
    fn describe_lists_mac_and_addresses() {
        let interfaces = mock_interfaces();
        assert_eq!(interfaces[0].describe(), "lo (#1) - [127.0.0.1/8]");
        assert_eq!(interfaces[1].describe(), "eth0 (#2) 52:54:00:12:34:56 []");
    }

    #[test]
    fn loopback_has_an_index() {
        // Every Linux host has "lo"; the lookup goes through the live interface table.
        if let Some(index) = index_of("lo") {
            assert!(index > 0);
            assert_eq!(name_of(index).as_deref(), Some("lo"));
        }
    }
}
