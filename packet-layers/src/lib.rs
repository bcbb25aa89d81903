//! Layered, zero-copy decoding and encoding of network packets.
//!
//! ## Table of contents
//!
//! This is also a recommended reading order but feel free to skip ahead, each chapter tries to be
//! somewhat self-contained.
//!
//! 1. [Design](#design-and-relevant-core-concepts)
//! 2. [The wire module](wire/index.html)
//!    1. [Ethernet header access](wire/ethernet/index.html)
//! 3. [The layers](layer/index.html)
//!    1. [The eth layer](layer/eth/index.html)
//! 4. [Decoding](decode/index.html)
//!    1. [The registry](decode/registry/index.html)
//! 5. [Serializing](serialize/index.html)
//!
//! ## Design and relevant core concepts
//!
//! A packet is a stack of protocol headers, each describing the bytes that follow it. Decoding
//! peels off one header at a time: the decoder for a layer type parses its header, records the
//! resulting layer and names the type of its payload. The decoder for that type is looked up in a
//! registry and continues. Protocols are added by registering a decoder for a new layer type, not
//! by editing a central dispatch.
//!
//! Decoding never copies packet data. Every decoded layer borrows the input buffer and so does the
//! [`Packet`] collecting them. Input is untrusted: a decoder checks lengths before it reads, a
//! failure ends the chain without discarding what was decoded before it, and the chain length is
//! capped.
//!
//! Encoding runs the other way around. Layers are written innermost first into a
//! [`SerializeBuffer`] that grows towards the front, each prepending its header to its payload.
//!
//! ```
//! use packet_layers::decode::Packet;
//! use packet_layers::layer::{Layer, LayerType};
//! use packet_layers::layer::eth::Ethernet;
//!
//! let mut frame = [0u8; 60];
//! frame[..6].copy_from_slice(&[0xff; 6]);
//! frame[6..12].copy_from_slice(&[0x02, 0, 0, 0, 0, 1]);
//! frame[12..14].copy_from_slice(&[0x08, 0x00]);
//!
//! let packet = Packet::decode(&frame, LayerType::ETHERNET);
//! assert!(packet.error().is_none());
//!
//! let eth = Ethernet::from_layer(packet.link_layer().unwrap()).unwrap();
//! assert!(eth.dst_addr().unwrap().is_broadcast());
//! // No decoder for IPv4 is registered, the rest is an opaque payload.
//! assert_eq!(packet.application_layer().unwrap().contents().len(), 46);
//! ```
//!
//! [`Packet`]: decode/struct.Packet.html
//! [`SerializeBuffer`]: serialize/struct.SerializeBuffer.html
#![warn(missing_docs)]
#![warn(unreachable_pub)]

#[macro_use] mod macros;
pub mod wire;
pub mod layer;
pub mod decode;
pub mod serialize;
