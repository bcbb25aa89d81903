//! Decodes an Ethernet frame given as hex and prints its layers.
//!
//! # Usage
//!
//! Pass the frame as a single hex string, for example one copied from a capture tool:
//!
//!   > $ cargo run --example decode_hex -- ffffffffffff0200000000010806000108000604000102000000000100000000
//!
//! With `--answer` the frame is also rebuilt with swapped addresses, as a reply would be, and
//! printed as hex again.
use std::process;

use structopt::StructOpt;

use packet_layers::decode::{DecodeOptions, LayerRegistry, Packet};
use packet_layers::layer::{LayerType, Payload};
use packet_layers::layer::eth::Ethernet;
use packet_layers::serialize::{serialize_layers, SerializeBuffer, SerializeOptions};

fn main() {
    let Config {
        frame,
        max_depth,
        answer,
    } = Config::from_args();

    let bytes = hex::decode(frame.trim()).unwrap_or_else(|err| {
        eprintln!("Not a hex frame: {}", err);
        process::exit(1);
    });

    let registry = LayerRegistry::default();
    let options = DecodeOptions { max_depth };
    let packet = Packet::decode_with(&bytes, LayerType::ETHERNET, &registry, options);
    println!("{}", packet);

    if !answer {
        return;
    }

    let eth = match packet.link_layer().and_then(|layer| Ethernet::from_layer(layer)) {
        Some(eth) => eth,
        None => {
            eprintln!("No ethernet header to answer");
            process::exit(1);
        },
    };

    let reply = Ethernet::new(eth.dst_mac, eth.src_mac, eth.ethernet_type);
    let payload = Payload(eth.base.payload);
    let options = SerializeOptions { fix_lengths: true, ..SerializeOptions::default() };

    let mut buffer = SerializeBuffer::new();
    match serialize_layers(&mut buffer, options, &[&reply, &payload]) {
        Ok(()) => println!("{}", hex::encode(buffer.bytes())),
        Err(err) => {
            eprintln!("Failed to build the answer: {}", err);
            process::exit(1);
        },
    }
}

#[derive(StructOpt)]
struct Config {
    /// The frame, as hex.
    frame: String,
    /// The maximum number of layers to decode.
    #[structopt(long, default_value = "50")]
    max_depth: usize,
    /// Also print the frame with source and destination swapped.
    #[structopt(long)]
    answer: bool,
}
