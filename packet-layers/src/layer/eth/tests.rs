use crate::decode::NilDecodeFeedback;
use crate::serialize::{SerializeBuffer, SerializeOptions};
use crate::wire::{Error, EndpointType, EthernetAddress, EthernetProtocol};

use super::*;

const DST: [u8; 6] = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
const SRC: [u8; 6] = [0x00, 0x11, 0x22, 0x33, 0x44, 0x55];

fn header(ethertype: [u8; 2]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&DST);
    bytes.extend_from_slice(&SRC);
    bytes.extend_from_slice(&ethertype);
    bytes
}

/// Records truncation for inspection.
#[derive(Default)]
struct Truncation(bool);

impl DecodeFeedback for Truncation {
    fn set_truncated(&mut self) {
        self.0 = true;
    }
}

#[test]
fn decode_ethertype() {
    let mut frame = header([0x08, 0x00]);
    frame.extend_from_slice(&[0; 46]);

    let mut eth = Ethernet::default();
    eth.decode_from_bytes(&frame, &mut NilDecodeFeedback).unwrap();
    assert_eq!(eth.dst_mac, &DST);
    assert_eq!(eth.src_mac, &SRC);
    assert_eq!(eth.ethernet_type, EthernetProtocol::Ipv4);
    assert_eq!(eth.length, 0);
    assert_eq!(eth.contents(), &frame[..14]);
    assert_eq!(eth.payload(), &[0; 46][..]);
    assert_eq!(eth.next_layer_type(), LayerType::IPV4);
    assert!(!eth.is_length_framed());
}

#[test]
fn decode_length() {
    let mut frame = header([0x00, 0x05]);
    frame.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);

    let mut feedback = Truncation::default();
    let mut eth = Ethernet::default();
    eth.decode_from_bytes(&frame, &mut feedback).unwrap();
    assert_eq!(eth.ethernet_type, EthernetProtocol::Llc);
    assert_eq!(eth.length, 5);
    assert_eq!(eth.payload(), &[1, 2, 3, 4, 5]);
    assert_eq!(eth.next_layer_type(), LayerType::LLC);
    assert!(!feedback.0);
}

#[test]
fn decode_truncated() {
    let mut frame = header([0x00, 0x20]);
    frame.extend_from_slice(&[0xab; 8]);

    let mut feedback = Truncation::default();
    let mut eth = Ethernet::default();
    eth.decode_from_bytes(&frame, &mut feedback).unwrap();
    assert_eq!(eth.length, 0x20);
    assert_eq!(eth.payload(), &[0xab; 8]);
    assert!(feedback.0);
}

#[test]
fn decode_too_short() {
    let frame = header([0x08, 0x00]);
    let mut eth = Ethernet::default();
    assert_eq!(
        eth.decode_from_bytes(&frame[..13], &mut NilDecodeFeedback),
        Err(Error::TooShort { needed: 14, available: 13 }));
}

#[test]
fn decode_overwrites() {
    let mut llc = header([0x00, 0x02]);
    llc.extend_from_slice(&[1, 2, 3]);
    let ipv6 = header([0x86, 0xdd]);

    let mut eth = Ethernet::default();
    eth.decode_from_bytes(&llc, &mut NilDecodeFeedback).unwrap();
    eth.decode_from_bytes(&ipv6, &mut NilDecodeFeedback).unwrap();
    assert_eq!(eth.length, 0);
    assert_eq!(eth.ethernet_type, EthernetProtocol::Ipv6);
    assert!(eth.payload().is_empty());
}

#[test]
fn header_round_trip() {
    let mut frame = header([0x88, 0x70]);
    frame.extend_from_slice(&[0x5a; 100]);

    let mut eth = Ethernet::default();
    eth.decode_from_bytes(&frame, &mut NilDecodeFeedback).unwrap();
    assert_eq!(eth.ethernet_type, EthernetProtocol::JumboFrame);
    assert_eq!(eth.next_layer_type(), LayerType::UNKNOWN);

    let mut buffer = SerializeBuffer::new();
    buffer.append_bytes(100).copy_from_slice(eth.payload());
    eth.serialize_to(&mut buffer, SerializeOptions::default()).unwrap();
    assert_eq!(buffer.bytes(), &frame[..]);
}

#[test]
fn serialize_pads() {
    let eth = Ethernet::new(&SRC, &DST, EthernetProtocol::Ipv4);
    let mut buffer = SerializeBuffer::new();
    buffer.append_bytes(10).copy_from_slice(&[9; 10]);
    eth.serialize_to(&mut buffer, SerializeOptions::default()).unwrap();

    let bytes = buffer.bytes();
    assert_eq!(bytes.len(), 60);
    assert_eq!(&bytes[..14], &header([0x08, 0x00])[..]);
    assert_eq!(&bytes[14..24], &[9; 10]);
    assert!(bytes[24..].iter().all(|&b| b == 0));
}

#[test]
fn serialize_no_padding() {
    let eth = Ethernet::new(&SRC, &DST, EthernetProtocol::Arp);
    let mut buffer = SerializeBuffer::new();
    buffer.append_bytes(46);
    eth.serialize_to(&mut buffer, SerializeOptions::default()).unwrap();
    assert_eq!(buffer.len(), 60);

    let mut buffer = SerializeBuffer::new();
    buffer.append_bytes(100);
    eth.serialize_to(&mut buffer, SerializeOptions::default()).unwrap();
    assert_eq!(buffer.len(), 114);
}

#[test]
fn serialize_address_width() {
    let short = [0x02, 0x00, 0x00, 0x00, 0x01];
    let mut buffer = SerializeBuffer::new();

    let eth = Ethernet::new(&SRC, &short, EthernetProtocol::Ipv4);
    assert_eq!(
        eth.serialize_to(&mut buffer, SerializeOptions::default()),
        Err(Error::InvalidAddressWidth { field: "destination", len: 5 }));

    let eth = Ethernet::new(&short, &DST, EthernetProtocol::Ipv4);
    assert_eq!(
        eth.serialize_to(&mut buffer, SerializeOptions::default()),
        Err(Error::InvalidAddressWidth { field: "source", len: 5 }));

    assert!(buffer.is_empty());
}

#[test]
fn serialize_length() {
    let mut eth = Ethernet::new(&SRC, &DST, EthernetProtocol::Llc);
    eth.length = 3;

    let mut buffer = SerializeBuffer::new();
    buffer.append_bytes(7);
    eth.serialize_to(&mut buffer, SerializeOptions::default()).unwrap();
    assert_eq!(&buffer.bytes()[12..14], &[0x00, 0x03]);
    assert_eq!(buffer.len(), 60);

    let options = SerializeOptions { fix_lengths: true, ..SerializeOptions::default() };
    let mut buffer = SerializeBuffer::new();
    buffer.append_bytes(7);
    eth.serialize_to(&mut buffer, options).unwrap();
    assert_eq!(&buffer.bytes()[12..14], &[0x00, 0x07]);
    // The layer itself is not changed.
    assert_eq!(eth.length, 3);
}

#[test]
fn serialize_malformed() {
    let mut buffer = SerializeBuffer::new();

    let mut eth = Ethernet::new(&SRC, &DST, EthernetProtocol::Ipv4);
    eth.length = 4;
    assert!(matches!(
        eth.serialize_to(&mut buffer, SerializeOptions::default()),
        Err(Error::MalformedField(_))));

    let mut eth = Ethernet::new(&SRC, &DST, EthernetProtocol::Llc);
    eth.length = 0x0600;
    assert!(matches!(
        eth.serialize_to(&mut buffer, SerializeOptions::default()),
        Err(Error::MalformedField(_))));

    let eth = Ethernet::new(&SRC, &DST, EthernetProtocol::Llc);
    let options = SerializeOptions { fix_lengths: true, ..SerializeOptions::default() };
    buffer.append_bytes(0x0600);
    assert!(matches!(
        eth.serialize_to(&mut buffer, options),
        Err(Error::MalformedField(_))));
    assert_eq!(buffer.len(), 0x0600);
}

#[test]
fn from_layer() {
    let mut frame = header([0x08, 0x06]);
    frame.extend_from_slice(&[0; 28]);

    let mut eth = Ethernet::default();
    eth.decode_from_bytes(&frame, &mut NilDecodeFeedback).unwrap();
    let layer: &dyn Layer = &eth;
    assert_eq!(Ethernet::from_layer(layer), Some(eth));

    let payload = crate::layer::Payload(&frame);
    assert_eq!(Ethernet::from_layer(&payload), None);
}

#[test]
fn addresses_and_flow() {
    let eth = Ethernet::new(&SRC, &DST, EthernetProtocol::Ipv4);
    assert_eq!(eth.src_addr(), Ok(EthernetAddress(SRC)));
    assert!(eth.dst_addr().unwrap().is_broadcast());

    let flow = eth.link_flow().unwrap();
    assert_eq!(flow.endpoint_type(), EndpointType::MAC);
    assert_eq!(flow.src().raw(), &SRC);
    assert_eq!(flow.dst().raw(), &DST);
    assert_eq!(eth.flow(), Some(flow));
    assert_eq!(flow.to_string(), "00:11:22:33:44:55->ff:ff:ff:ff:ff:ff");

    let odd = [1, 2, 3];
    assert!(Ethernet::new(&odd, &DST, EthernetProtocol::Ipv4).src_addr().is_err());
}
