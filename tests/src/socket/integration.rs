use netbridge_common::config::Config;
use netbridge_common::error::Error;
use netbridge_common::network::address::SocketAddress;
use netbridge_common::network::destination::Destination;
use netbridge_common::network::family::{AddressFamily, SocketType, link_protocol};
use netbridge_common::utils::interface;
use netbridge_core::{NetBridge, Socket};
use rand::RngCore;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

fn udp_pair(bridge: &NetBridge) -> (Socket, Socket, SocketAddr) {
    let rx = bridge.socket(AddressFamily::INET, SocketType::DGRAM, 0).unwrap();
    rx.bind(&SocketAddress::inet(Ipv4Addr::LOCALHOST)).unwrap();
    rx.set_recv_timeout(Some(Duration::from_secs(2))).unwrap();
    let bound = rx.local_address().unwrap().to_socket_addr().unwrap();

    let tx = bridge.socket(AddressFamily::INET, SocketType::DGRAM, 0).unwrap();
    (tx, rx, bound)
}

/// A datagram sent through the boundary `sendto` form arrives intact through the
/// boundary `recvfrom` form, with the sender written into the caller's buffers.
#[test]
fn loopback_datagram_through_boundary_calls() {
    let bridge = NetBridge::startup(Config::default()).unwrap();
    let (tx, rx, bound) = udp_pair(&bridge);

    let mut payload = vec![0u8; 512];
    rand::rng().fill_bytes(&mut payload);

    let sent = tx
        .sendto(&payload, 0, payload.len(), 0, 0, &bound.ip().to_string(), bound.port())
        .unwrap();
    assert_eq!(sent, payload.len());

    let mut buf = vec![0u8; 1024];
    let mut out_address = [0u8; 6];
    let mut out_interface = [0xffu8; 4];
    let len = rx.recvfrom(&mut buf, 100, 600, &mut out_address, &mut out_interface).unwrap();

    assert_eq!(len, payload.len());
    assert_eq!(&buf[100..100 + len], payload.as_slice());
    assert_eq!(&out_address[..4], &[127, 0, 0, 1]);
    assert_eq!(out_interface, [0, 0, 0, 0], "UDP reports no interface index");

    tx.close().unwrap();
    rx.close().unwrap();
    bridge.cleanup();
}

#[test]
fn datagram_larger_than_window_is_truncated() {
    let bridge = NetBridge::startup(Config::default()).unwrap();
    let (tx, rx, bound) = udp_pair(&bridge);

    tx.send_to(&[9u8; 64], 0, 64, 0, &Destination::from(bound)).unwrap();

    let mut buf = [0u8; 64];
    let received = rx.recv_from(&mut buf, 0, 16).unwrap();
    assert_eq!(received.len, 16);
    assert!(buf[16..].iter().all(|&b| b == 0));
}

#[test]
fn option_round_trip_through_byte_interface() {
    let bridge = NetBridge::startup(Config::default().with_debug(true)).unwrap();
    let socket = bridge.socket(AddressFamily::INET, SocketType::DGRAM, 0).unwrap();

    let size: libc::c_int = 1 << 16;
    socket
        .set_option(libc::SOL_SOCKET, libc::SO_RCVBUF, &size.to_ne_bytes(), 4, 0)
        .unwrap();

    let mut out = [0u8; 8];
    let len = socket.get_option(libc::SOL_SOCKET, libc::SO_RCVBUF, &mut out, 4).unwrap();
    assert_eq!(len, 4);
    // Linux doubles the requested value for bookkeeping overhead.
    let granted = libc::c_int::from_ne_bytes([out[0], out[1], out[2], out[3]]);
    assert!(granted >= size, "granted {granted}");
}

#[test]
fn invalid_triple_fails_with_os_error() {
    let bridge = NetBridge::startup(Config::default()).unwrap();
    let err = bridge.socket(AddressFamily::INET, SocketType(999), 0).unwrap_err();
    assert!(matches!(err, Error::Os { op: "socket", .. }));
    assert_eq!(err.raw_os_error(), Some(libc::EINVAL));
}

#[test]
fn ipv6_loopback_reports_port_bearing_address() {
    let bridge = NetBridge::startup(Config::default()).unwrap();
    let Ok(rx) = bridge.socket(NetBridge::pf_inet6(), SocketType::DGRAM, 0) else {
        return;
    };
    if rx.bind(&SocketAddress::from_socket_addr("[::1]:0".parse().unwrap())).is_err() {
        // No IPv6 loopback on this host.
        return;
    }
    rx.set_recv_timeout(Some(Duration::from_secs(2))).unwrap();
    let bound = rx.local_address().unwrap();
    assert_eq!(bound.len(), 18);
    let bound = bound.to_socket_addr().unwrap();

    let tx = bridge.socket(NetBridge::pf_inet6(), SocketType::DGRAM, 0).unwrap();
    tx.sendto(b"v6", 0, 2, 0, 0, "::1", bound.port()).unwrap();

    let mut buf = [0u8; 8];
    let received = rx.recv_from(&mut buf, 0, 8).unwrap();
    assert_eq!(received.len, 2);
    assert_eq!(received.from.ip(), Some("::1".parse().unwrap()));
}

#[test]
#[ignore = "needs CAP_NET_RAW"]
fn raw_icmp_socket_opens_when_privileged() {
    let bridge = NetBridge::startup(Config::default()).unwrap();
    let socket = bridge
        .socket(AddressFamily::INET, SocketType::RAW, libc::IPPROTO_ICMP)
        .unwrap();
    socket.close().unwrap();
}

/// Ethertype reserved for local experiments (IEEE 802 local experimental 1).
const EXPERIMENTAL_ETHERTYPE: u16 = 0x88b5;

#[test]
#[ignore = "needs CAP_NET_RAW"]
fn packet_socket_loopback_round_trip() {
    let bridge = NetBridge::startup(Config::default()).unwrap();
    let lo_index = interface::index_of("lo").expect("loopback interface");
    let protocol = link_protocol(EXPERIMENTAL_ETHERTYPE);
    let on_lo = SocketAddress::link(lo_index, EXPERIMENTAL_ETHERTYPE, None);

    let rx = bridge.socket(AddressFamily::PACKET, SocketType::RAW, protocol).unwrap();
    rx.bind(&on_lo).unwrap();
    rx.set_recv_timeout(Some(Duration::from_secs(2))).unwrap();
    let tx = bridge.socket(AddressFamily::PACKET, SocketType::RAW, protocol).unwrap();
    tx.bind(&on_lo).unwrap();

    // Ethernet header (zero MACs as loopback uses) followed by random payload.
    let mut frame = vec![0u8; 64];
    frame[16..18].copy_from_slice(&EXPERIMENTAL_ETHERTYPE.to_be_bytes());
    rand::rng().fill_bytes(&mut frame[18..]);

    let sent = tx
        .sendto(&frame, 4, 60, 0, lo_index as i32, "", EXPERIMENTAL_ETHERTYPE)
        .unwrap();
    assert_eq!(sent, 60);

    let mut buf = vec![0u8; 128];
    let mut out_address = [0u8; 18];
    let mut out_interface = [0u8; 4];
    let len = rx.recvfrom(&mut buf, 32, 96, &mut out_address, &mut out_interface).unwrap();

    assert_eq!(len, 60);
    assert_eq!(&buf[32..32 + len], &frame[4..64]);
    assert_eq!(out_interface, lo_index.to_be_bytes());
    assert_eq!(&out_address[..2], &EXPERIMENTAL_ETHERTYPE.to_be_bytes());

    tx.close().unwrap();
    rx.close().unwrap();
}
