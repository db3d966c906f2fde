#![cfg(test)]
mod socket;
mod tun;
