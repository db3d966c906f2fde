pub mod info;
pub mod sniff;
pub mod tun;

use clap::{Parser, Subcommand};
use netbridge_core::Device;

use crate::terminal::print;

#[derive(Parser)]
#[command(name = "netbridge")]
#[command(about = "Raw sockets, packet sockets and TUN devices from the command line.")]
pub struct CommandLine {
    /// Trace every native call
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the address family constants and host interfaces
    #[command(alias = "i")]
    Info,
    /// Print frames arriving on an interface
    #[command(alias = "s")]
    Sniff {
        interface: String,
        /// Stop after this many frames
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Open a TUN interface and print packets written to it
    #[command(alias = "t")]
    Tun {
        name: String,
        /// Stop after this many packets
        #[arg(short, long)]
        count: Option<usize>,
        /// Open without the 4-byte packet information header
        #[arg(long)]
        no_pi: bool,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Reads frames from `device` until `count` is reached, summarizing each one.
pub fn capture<D, F>(device: &D, count: Option<usize>, buf_len: usize, summarize: F) -> anyhow::Result<usize>
where
    D: Device,
    F: Fn(&[u8]) -> String,
{
    let mut buf = vec![0u8; buf_len];
    let mut seen = 0usize;
    while count.is_none_or(|limit| seen < limit) {
        let len = device.recv_frame(&mut buf)?;
        seen += 1;
        print::frame_line(seen, len, &summarize(&buf[..len]));
    }
    Ok(seen)
}

