mod commands;
mod terminal;

use commands::{CommandLine, Commands, info, sniff, tun};
use netbridge_common::config::Config;
use netbridge_core::NetBridge;
use terminal::{logging, print};

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.debug);

    let mut cfg = Config::default().with_debug(commands.debug);
    if let Commands::Tun { no_pi: true, .. } = commands.command {
        cfg.tun_packet_info = false;
    }

    let bridge = NetBridge::startup(cfg)?;

    let result = match &commands.command {
        Commands::Info => {
            print::header("about the tool");
            info::info(&bridge)
        }
        Commands::Sniff { interface, count } => {
            print::header("starting capture");
            sniff::sniff(&bridge, interface, *count)
        }
        Commands::Tun { name, count, .. } => {
            print::header("opening tun device");
            tun::tun(&bridge, name, *count)
        }
    };

    bridge.cleanup();
    print::end_of_program();
    result
}
