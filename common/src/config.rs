/// Scratch buffer size for whole-packet TUN reads.
pub const DEFAULT_TUN_RECV_BUFFER: usize = 32768;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Emits a debug trace for every native call, not only for failures.
    ///
    /// Does not change what any operation returns.
    pub debug: bool,
    /// Keeps the 4-byte packet information header in front of every TUN frame.
    ///
    /// When disabled the device is opened with `IFF_NO_PI` and frames are bare IP packets.
    pub tun_packet_info: bool,
    /// Size of the scratch buffer behind `TunDevice::recv_packet`.
    pub tun_recv_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            tun_packet_info: true,
            tun_recv_buffer: DEFAULT_TUN_RECV_BUFFER,
        }
    }
}

impl Config {
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
