use proptest::prelude::*;

use packet_layers::decode::{NilDecodeFeedback, Packet};
use packet_layers::layer::{DecodingLayer, Layer, LayerType, SerializableLayer};
use packet_layers::layer::eth::Ethernet;
use packet_layers::serialize::{SerializeBuffer, SerializeOptions};
use packet_layers::wire::{Error, EthernetProtocol};

proptest! {
    #[test]
    fn header_round_trip(frame in proptest::collection::vec(any::<u8>(), 14..200)) {
        let mut eth = Ethernet::default();
        eth.decode_from_bytes(&frame, &mut NilDecodeFeedback).unwrap();

        let mut buffer = SerializeBuffer::new();
        buffer.append_bytes(frame.len() - 14).copy_from_slice(&frame[14..]);
        eth.serialize_to(&mut buffer, SerializeOptions::default()).unwrap();
        prop_assert_eq!(&buffer.bytes()[..frame.len()], &frame[..]);
    }

    #[test]
    fn type_or_length(raw in any::<u16>()) {
        let mut frame = vec![0x02; 12];
        frame.extend_from_slice(&raw.to_be_bytes());

        let mut eth = Ethernet::default();
        eth.decode_from_bytes(&frame, &mut NilDecodeFeedback).unwrap();
        if raw < 0x0600 {
            prop_assert_eq!(eth.ethernet_type, EthernetProtocol::Llc);
            prop_assert_eq!(eth.length, raw);
            prop_assert_eq!(eth.next_layer_type(), LayerType::LLC);
        } else {
            prop_assert_eq!(eth.length, 0);
            prop_assert_eq!(u16::from(eth.ethernet_type), raw);
        }
    }

    #[test]
    fn decode_arbitrary(data in proptest::collection::vec(any::<u8>(), 0..100)) {
        let packet = Packet::decode(&data, LayerType::ETHERNET);

        if data.len() < 14 {
            prop_assert_eq!(packet.error(), Some(Error::TooShort { needed: 14, available: data.len() }));
            prop_assert_eq!(packet.len(), 1);
        } else {
            prop_assert_eq!(packet.error(), None);
            prop_assert_eq!(packet.link_layer().map(|layer| layer.contents()), Some(&data[..14]));
        }

        // Every layer is a view into the input.
        let range = data.as_ptr_range();
        for layer in packet.layers() {
            let contents = layer.contents().as_ptr_range();
            prop_assert!(layer.contents().is_empty()
                || (range.start <= contents.start && contents.end <= range.end));
        }
    }
}
