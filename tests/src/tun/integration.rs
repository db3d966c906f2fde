use netbridge_common::config::Config;
use netbridge_common::error::Error;
use netbridge_core::NetBridge;

#[test]
fn tun_open_without_privilege_is_an_error() {
    let bridge = NetBridge::startup(Config::default()).unwrap();
    match bridge.open_tun("nbtest0") {
        Ok(device) => device.close().unwrap(),
        Err(err) => {
            assert!(matches!(err, Error::Os { .. }));
            assert!(err.raw_os_error().is_some());
        }
    }
}

#[test]
#[ignore = "needs CAP_NET_ADMIN and /dev/net/tun"]
fn long_tun_name_is_cut_to_fifteen_bytes() {
    let bridge = NetBridge::startup(Config::default()).unwrap();
    let device = bridge.open_tun("nbtest-with-a-long-name").unwrap();
    assert_eq!(device.name(), "nbtest-with-a-l");
    device.close().unwrap();
}

#[test]
#[ignore = "needs CAP_NET_ADMIN and /dev/net/tun"]
fn kernel_assigns_name_from_pattern() {
    let bridge = NetBridge::startup(Config::default()).unwrap();
    let device = bridge.open_tun("nbtest%d").unwrap();
    assert!(device.name().starts_with("nbtest"));
    assert!(!device.name().contains('%'));
    device.close().unwrap();
}

#[test]
#[ignore = "needs CAP_NET_ADMIN and /dev/net/tun"]
fn write_on_fresh_interface_returns_count_or_error() {
    let config = Config { tun_packet_info: false, ..Config::default() };
    let bridge = NetBridge::startup(config).unwrap();
    let device = bridge.open_tun("nbtest1").unwrap();
    assert!(!device.packet_info());

    let packet = [0x45u8, 0, 0, 20, 0, 0, 0, 0, 64, 17, 0, 0, 10, 0, 0, 1, 10, 0, 0, 2];
    match device.write(&packet, 0, packet.len()) {
        Ok(written) => assert_eq!(written, packet.len()),
        Err(err) => assert!(err.raw_os_error().is_some(), "unexpected error: {err}"),
    }
    device.close().unwrap();
}
