use byteorder::{ByteOrder, NetworkEndian};

use crate::layer::{BaseLayer, Layer, LayerType, Payload};
use crate::layer::eth::Ethernet;
use crate::wire::{Error, EthernetProtocol, Result};

use super::*;

fn frame(ethertype: [u8; 2], payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0xff; 6];
    bytes.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
    bytes.extend_from_slice(&ethertype);
    bytes.extend_from_slice(payload);
    bytes
}

/// A four byte header holding the next layer type.
#[derive(Debug)]
struct Tagged<'a> {
    base: BaseLayer<'a>,
}

impl<'a> Layer<'a> for Tagged<'a> {
    fn layer_type(&self) -> LayerType {
        TAGGED
    }

    fn contents(&self) -> &'a [u8] {
        self.base.contents
    }

    fn payload(&self) -> &'a [u8] {
        self.base.payload
    }
}

const TAGGED: LayerType = LayerType::new(0x2_0001);

fn decode_tagged<'a>(data: &'a [u8], builder: &mut dyn PacketBuilder<'a>) -> Result<()> {
    if data.len() < 4 {
        return Err(Error::TooShort { needed: 4, available: data.len() });
    }

    let tagged = Tagged { base: BaseLayer::split(data, 4) };
    let next = LayerType::new(NetworkEndian::read_u32(&data[..4]));
    let payload = tagged.base.payload;
    let id = builder.add_layer(Box::new(tagged));
    builder.set_network_layer(id);
    builder.next_decoder(next, payload)
}

const LOOPING: LayerType = LayerType::new(0x2_0002);

fn decode_looping<'a>(data: &'a [u8], builder: &mut dyn PacketBuilder<'a>) -> Result<()> {
    builder.add_layer(Box::new(Payload(&data[..1])));
    builder.next_decoder(LOOPING, &data[1..])
}

fn registry() -> LayerRegistry {
    let mut registry = LayerRegistry::default();
    registry.register(TAGGED, LayerTypeMetadata {
        name: "Tagged",
        decoder: decode_tagged,
    }).unwrap();
    registry.register(LOOPING, LayerTypeMetadata {
        name: "Looping",
        decoder: decode_looping,
    }).unwrap();
    registry
}

#[test]
fn ethernet_and_payload() {
    let data = frame([0x08, 0x00], &[0; 46]);
    let packet = Packet::decode(&data, LayerType::ETHERNET);

    assert_eq!(packet.len(), 2);
    assert_eq!(packet.error(), None);
    assert!(!packet.truncated());

    let link = packet.link_layer().unwrap();
    assert_eq!(link.layer_type(), LayerType::ETHERNET);
    assert_eq!(link.contents(), &data[..14]);
    let eth = Ethernet::from_layer(link).unwrap();
    assert_eq!(eth.ethernet_type, EthernetProtocol::Ipv4);

    let app = packet.application_layer().unwrap();
    assert_eq!(app.layer_type(), LayerType::PAYLOAD);
    assert_eq!(app.contents(), &data[14..]);
    assert!(packet.network_layer().is_none());
    assert!(packet.transport_layer().is_none());
    assert!(packet.error_layer().is_none());
}

#[test]
fn length_framed() {
    let data = frame([0x00, 0x05], &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    let packet = Packet::decode(&data, LayerType::ETHERNET);

    assert_eq!(packet.len(), 2);
    assert!(!packet.truncated());
    assert_eq!(packet.application_layer().unwrap().contents(), &[1, 2, 3, 4, 5]);
}

#[test]
fn truncated() {
    let data = frame([0x00, 0x20], &[7; 8]);
    let packet = Packet::decode(&data, LayerType::ETHERNET);

    assert!(packet.truncated());
    assert_eq!(packet.error(), None);
    assert_eq!(packet.application_layer().unwrap().contents(), &[7; 8]);
    assert!(packet.to_string().contains("truncated"));
}

#[test]
fn too_short() {
    let data = frame([0x08, 0x00], &[]);
    let packet = Packet::decode(&data[..13], LayerType::ETHERNET);

    assert_eq!(packet.len(), 1);
    assert_eq!(packet.error(), Some(Error::TooShort { needed: 14, available: 13 }));
    assert!(packet.link_layer().is_none());

    let failure = packet.error_layer().unwrap();
    assert_eq!(failure.layer_type(), LayerType::DECODE_FAILURE);
    assert_eq!(failure.contents(), &data[..13]);

    let empty = Packet::decode(&[], LayerType::ETHERNET);
    assert_eq!(empty.error(), Some(Error::TooShort { needed: 14, available: 0 }));
}

#[test]
fn header_only() {
    let data = frame([0x08, 0x00], &[]);
    let packet = Packet::decode(&data, LayerType::ETHERNET);

    assert_eq!(packet.len(), 1);
    assert!(packet.application_layer().is_none());
    assert_eq!(packet.error(), None);
}

#[test]
fn unregistered_start() {
    let data = [1, 2, 3];
    let packet = Packet::decode(&data, LayerType::new(0x3_0000));

    assert_eq!(packet.len(), 1);
    assert_eq!(packet.layer(LayerType::PAYLOAD).unwrap().contents(), &data);
}

#[test]
fn custom_decoder() {
    // Two nested tagged headers, the inner one naming the unknown type.
    let mut inner = TAGGED.id().to_be_bytes().to_vec();
    inner.extend_from_slice(&[0, 0, 0, 0, 0xaa, 0xbb]);
    let registry = registry();
    let packet = Packet::decode_with(&inner, TAGGED, &registry, DecodeOptions::default());

    let types: Vec<_> = packet.layers().map(|layer| layer.layer_type()).collect();
    assert_eq!(types, [TAGGED, TAGGED, LayerType::PAYLOAD]);
    // The first one wins.
    assert_eq!(packet.network_layer().unwrap().contents(), &inner[..4]);
    assert_eq!(packet.application_layer().unwrap().contents(), &[0xaa, 0xbb]);
}

#[test]
fn failure_keeps_earlier_layers() {
    let mut inner = TAGGED.id().to_be_bytes().to_vec();
    inner.extend_from_slice(&[1, 2]);
    let packet = Packet::decode_with(&inner, TAGGED, &registry(), DecodeOptions::default());

    assert_eq!(packet.len(), 2);
    assert_eq!(packet.network_layer().unwrap().layer_type(), TAGGED);
    assert_eq!(packet.error(), Some(Error::TooShort { needed: 4, available: 2 }));
    assert_eq!(packet.error_layer().unwrap().contents(), &[1, 2]);
}

#[test]
fn chain_too_deep() {
    let data = [0u8; 100];
    let packet = Packet::decode_with(&data, LOOPING, &registry(), DecodeOptions::default());

    assert_eq!(packet.error(), Some(Error::ChainTooDeep { limit: DEFAULT_MAX_DEPTH }));
    assert_eq!(packet.len(), DEFAULT_MAX_DEPTH + 1);
    assert_eq!(packet.error_layer().unwrap().contents().len(), 100 - DEFAULT_MAX_DEPTH);
}

#[test]
fn depth_option() {
    let data = frame([0x08, 0x00], &[0; 46]);
    let options = DecodeOptions { max_depth: 1 };
    let packet = Packet::decode_with(&data, LayerType::ETHERNET, &LayerRegistry::default(), options);

    assert_eq!(packet.len(), 2);
    assert!(packet.link_layer().is_some());
    assert_eq!(packet.error(), Some(Error::ChainTooDeep { limit: 1 }));
    assert_eq!(packet.error_layer().unwrap().contents(), &data[14..]);
}

#[test]
fn global_decoder() {
    const GLOBAL_TAGGED: LayerType = LayerType::new(0x2_0003);

    fn decode_global<'a>(data: &'a [u8], builder: &mut dyn PacketBuilder<'a>) -> Result<()> {
        let id = builder.add_layer(Box::new(Payload(data)));
        builder.set_transport_layer(id);
        Ok(())
    }

    register_layer_type(GLOBAL_TAGGED, LayerTypeMetadata {
        name: "GlobalTagged",
        decoder: decode_global,
    }).unwrap();

    let err = register_layer_type(GLOBAL_TAGGED, LayerTypeMetadata {
        name: "GlobalTagged",
        decoder: decode_global,
    });
    assert_eq!(err, Err(RegisterError::Duplicate(GLOBAL_TAGGED)));

    let data = [1, 2, 3, 4];
    let packet = Packet::decode(&data, GLOBAL_TAGGED);
    assert_eq!(packet.transport_layer().unwrap().contents(), &data);
    assert!(packet.application_layer().is_none());
}

#[test]
fn display() {
    let data = frame([0x08, 0x00], &[0; 46]);
    let packet = Packet::decode(&data, LayerType::ETHERNET);
    let text = packet.to_string();

    assert!(text.starts_with("PACKET: 60 bytes"));
    assert!(text.contains("= Ethernet 02:00:00:00:00:01->ff:ff:ff:ff:ff:ff"));
    assert!(text.contains("= Payload"));
}
