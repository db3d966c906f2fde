use colored::*;
use pnet::packet::Packet;
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;

use crate::terminal::colors;

/// Length of the packet information header a TUN device prepends unless opened with `IFF_NO_PI`.
pub const PACKET_INFO_LEN: usize = 4;

pub fn protocol_name(protocol: u8) -> String {
    match protocol {
        1 => "ICMP".to_string(),
        6 => "TCP".to_string(),
        17 => "UDP".to_string(),
        58 => "ICMPv6".to_string(),
        other => format!("proto {other}"),
    }
}

pub fn hex_preview(bytes: &[u8], max: usize) -> String {
    let mut out: Vec<String> = bytes.iter().take(max).map(|b| format!("{b:02x}")).collect();
    if bytes.len() > max {
        out.push("..".to_string());
    }
    out.join(" ")
}

fn ipv4_summary(payload: &[u8]) -> Option<String> {
    let packet = Ipv4Packet::new(payload)?;
    Some(format!(
        "{} {} {} {}",
        "IPv4".color(colors::PRIMARY),
        packet.get_source(),
        "->".color(colors::SEPARATOR),
        format!("{} {}", packet.get_destination(), protocol_name(packet.get_next_level_protocol().0)),
    ))
}

fn ipv6_summary(payload: &[u8]) -> Option<String> {
    let packet = Ipv6Packet::new(payload)?;
    Some(format!(
        "{} {} {} {}",
        "IPv6".color(colors::PRIMARY),
        packet.get_source(),
        "->".color(colors::SEPARATOR),
        format!("{} {}", packet.get_destination(), protocol_name(packet.get_next_header().0)),
    ))
}

/// Picks the layer-3 parser by the first nibble, as a TUN device without headers delivers.
pub fn ip_summary(packet: &[u8]) -> String {
    let parsed = match packet.first().map(|b| b >> 4) {
        Some(4) => ipv4_summary(packet),
        Some(6) => ipv6_summary(packet),
        _ => None,
    };
    parsed.unwrap_or_else(|| hex_preview(packet, 16))
}

pub fn ethernet_summary(frame: &[u8]) -> String {
    let Some(eth) = EthernetPacket::new(frame) else {
        return hex_preview(frame, 16);
    };
    let l3 = match eth.get_ethertype() {
        EtherTypes::Ipv4 => ipv4_summary(eth.payload()),
        EtherTypes::Ipv6 => ipv6_summary(eth.payload()),
        _ => None,
    };
    let link = format!("{} > {}", eth.get_source(), eth.get_destination()).color(colors::ACCENT);
    match l3 {
        Some(l3) => format!("{link} {l3}"),
        None => format!("{link} ethertype 0x{:04x}", eth.get_ethertype().0),
    }
}

/// Summary of one TUN read; strips the flags/protocol header first when present.
pub fn tun_summary(frame: &[u8], packet_info: bool) -> String {
    if !packet_info {
        return ip_summary(frame);
    }
    if frame.len() < PACKET_INFO_LEN {
        return hex_preview(frame, 16);
    }
    let proto = u16::from_be_bytes([frame[2], frame[3]]);
    format!("[pi 0x{proto:04x}] {}", ip_summary(&frame[PACKET_INFO_LEN..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ipv4_header(protocol: u8) -> Vec<u8> {
        vec![
            0x45, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00, 0x40, protocol, 0x00, 0x00, //
            10, 0, 0, 1, //
            10, 0, 0, 2,
        ]
    }

    #[test]
    fn protocol_names() {
        assert_eq!(protocol_name(6), "TCP");
        assert_eq!(protocol_name(58), "ICMPv6");
        assert_eq!(protocol_name(200), "proto 200");
    }

    #[test]
    fn hex_preview_truncates() {
        assert_eq!(hex_preview(&[0xde, 0xad], 4), "de ad");
        assert_eq!(hex_preview(&[1, 2, 3], 2), "01 02 ..");
    }

    #[test]
    fn tun_summary_without_packet_info() {
        colored::control::set_override(false);
        let summary = tun_summary(&ipv4_header(17), false);
        assert_eq!(summary, "IPv4 10.0.0.1 -> 10.0.0.2 UDP");
    }

    #[test]
    fn tun_summary_strips_packet_info() {
        colored::control::set_override(false);
        let mut frame = vec![0x00, 0x00, 0x08, 0x00];
        frame.extend(ipv4_header(1));
        assert_eq!(tun_summary(&frame, true), "[pi 0x0800] IPv4 10.0.0.1 -> 10.0.0.2 ICMP");
        assert_eq!(tun_summary(&[0x00, 0x00], true), "00 00");
    }

    #[test]
    fn ethernet_summary_reports_unknown_ethertype() {
        colored::control::set_override(false);
        let mut frame = vec![0xff; 6];
        frame.extend([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
        frame.extend([0x08, 0x06]);
        frame.extend([0u8; 28]);
        assert_eq!(
            ethernet_summary(&frame),
            "02:00:00:00:00:01 > ff:ff:ff:ff:ff:ff ethertype 0x0806"
        );
    }

    #[test]
    fn short_garbage_falls_back_to_hex() {
        assert_eq!(ethernet_summary(&[1, 2, 3]), "01 02 03");
        assert_eq!(ip_summary(&[0x00, 0x01]), "00 01");
    }
}
