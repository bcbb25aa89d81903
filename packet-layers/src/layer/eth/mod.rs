//! The ethernet layer.
//!
//! Decodes Ethernet II and IEEE 802.3 headers and writes them back. The two framings share one
//! 16-bit field whose value decides its meaning: from `0x0600` upwards it is the EtherType of the
//! payload, below it is the length of the payload, which is then followed by an 802.2 LLC header.
//! A length is reported as `EtherType::Llc` with the value in [`Ethernet::length`].
//!
//! The state of this layer is tiny. Decoding is a single check and split, the interesting part is
//! the handling of the length field in both directions and the padding to the minimum frame size
//! when serializing.
//!
//! [`Ethernet::length`]: struct.Ethernet.html#structfield.length
use crate::decode::{DecodeFeedback, LayerRegistrar, LinkLayerSetter, PacketBuilder};
use crate::serialize::{SerializeBuffer, SerializeOptions};
use crate::wire::{Error, EndpointType, Flow, Result};
use crate::wire::{EthernetAddress, EthernetProtocol, ethernet_frame};
use crate::wire::ethernet::{HEADER_LEN, LENGTH_LIMIT, MIN_FRAME_LEN};

use super::{BaseLayer, DecodingLayer, Layer, LayerClass, LayerType, SerializableLayer};

#[cfg(test)]
mod tests;

/// An Ethernet header.
///
/// The addresses are views into the decoded buffer. For serialization any byte slices can be
/// used, their width is checked when the header is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ethernet<'a> {
    /// The header and payload split of the decoded bytes.
    pub base: BaseLayer<'a>,
    /// The source hardware address.
    pub src_mac: &'a [u8],
    /// The destination hardware address.
    pub dst_mac: &'a [u8],
    /// The protocol of the payload, `Llc` if the header carries a length.
    pub ethernet_type: EthernetProtocol,
    /// The payload length, only set if the header carries a length instead of a type.
    pub length: u16,
}

impl<'a> Ethernet<'a> {
    /// Create a header for serialization.
    pub fn new(src_mac: &'a [u8], dst_mac: &'a [u8], ethernet_type: EthernetProtocol) -> Self {
        Ethernet {
            src_mac,
            dst_mac,
            ethernet_type,
            ..Ethernet::default()
        }
    }

    /// Recover the typed header from a layer of a decoded packet.
    ///
    /// Returns `None` if the layer is not an Ethernet layer.
    pub fn from_layer(layer: &dyn Layer<'a>) -> Option<Self> {
        if layer.layer_type() != LayerType::ETHERNET {
            return None;
        }

        let mut eth = Ethernet::default();
        eth.read_header(layer.contents()).ok()?;
        eth.base.payload = layer.payload();
        Some(eth)
    }

    /// The source address, if it has the width of an Ethernet address.
    pub fn src_addr(&self) -> Result<EthernetAddress> {
        EthernetAddress::from_bytes(self.src_mac)
    }

    /// The destination address, if it has the width of an Ethernet address.
    pub fn dst_addr(&self) -> Result<EthernetAddress> {
        EthernetAddress::from_bytes(self.dst_mac)
    }

    /// The hardware addresses as a flow from source to destination.
    pub fn link_flow(&self) -> Result<Flow> {
        Flow::new(EndpointType::MAC, self.src_mac, self.dst_mac)
    }

    /// Query whether the header carries a length instead of a type.
    pub fn is_length_framed(&self) -> bool {
        self.length != 0 || self.ethernet_type == EthernetProtocol::Llc
    }

    /// Parse the fixed header and leave the payload empty.
    fn read_header(&mut self, data: &'a [u8]) -> Result<()> {
        let frame = ethernet_frame::new_checked(data)?;
        let raw = frame.next_protocol();

        self.dst_mac = frame.dst_addr_slice();
        self.src_mac = frame.src_addr_slice();
        if raw < LENGTH_LIMIT {
            self.length = raw;
            self.ethernet_type = EthernetProtocol::Llc;
        } else {
            self.length = 0;
            self.ethernet_type = EthernetProtocol::from(raw);
        }
        self.base = BaseLayer::split(&data[..HEADER_LEN], HEADER_LEN);
        Ok(())
    }

    /// The value of the type-or-length field when serializing.
    fn type_field(&self, payload_len: usize, options: SerializeOptions) -> Result<u16> {
        if !self.is_length_framed() {
            return Ok(self.ethernet_type.into());
        }

        if self.ethernet_type != EthernetProtocol::Llc {
            return Err(Error::MalformedField("ethernet type not compatible with a length value"));
        }

        let length = if options.fix_lengths {
            payload_len
        } else {
            usize::from(self.length)
        };

        if length >= usize::from(LENGTH_LIMIT) {
            return Err(Error::MalformedField("ethernet length collides with the type range"));
        }

        Ok(length as u16)
    }
}

impl<'a> Layer<'a> for Ethernet<'a> {
    fn layer_type(&self) -> LayerType {
        LayerType::ETHERNET
    }

    fn contents(&self) -> &'a [u8] {
        self.base.contents
    }

    fn payload(&self) -> &'a [u8] {
        self.base.payload
    }

    fn flow(&self) -> Option<Flow> {
        self.link_flow().ok()
    }
}

impl<'a> DecodingLayer<'a> for Ethernet<'a> {
    fn decode_from_bytes(&mut self, data: &'a [u8], feedback: &mut dyn DecodeFeedback)
        -> Result<()>
    {
        self.read_header(data)?;
        let mut payload = &data[HEADER_LEN..];

        if self.ethernet_type == EthernetProtocol::Llc {
            let declared = usize::from(self.length);
            if payload.len() < declared {
                feedback.set_truncated();
            } else {
                // Trailing bytes, e.g. padding, are not part of the payload.
                payload = &payload[..declared];
            }
        }

        self.base.payload = payload;
        Ok(())
    }

    fn can_decode(&self) -> LayerClass {
        LayerType::ETHERNET.into()
    }

    fn next_layer_type(&self) -> LayerType {
        self.ethernet_type.layer_type()
    }
}

impl<'a> SerializableLayer<'a> for Ethernet<'a> {
    fn serialize_to(&self, buffer: &mut SerializeBuffer, options: SerializeOptions)
        -> Result<()>
    {
        let dst_addr = EthernetAddress::from_bytes(self.dst_mac)
            .map_err(|_| Error::InvalidAddressWidth { field: "destination", len: self.dst_mac.len() })?;
        let src_addr = EthernetAddress::from_bytes(self.src_mac)
            .map_err(|_| Error::InvalidAddressWidth { field: "source", len: self.src_mac.len() })?;
        let type_field = self.type_field(buffer.len(), options)?;

        let frame = ethernet_frame::new_unchecked_mut(buffer.prepend_bytes(HEADER_LEN));
        frame.set_dst_addr(dst_addr);
        frame.set_src_addr(src_addr);
        frame.set_next_protocol(type_field);

        let length = buffer.len();
        if length < MIN_FRAME_LEN {
            for byte in buffer.append_bytes(MIN_FRAME_LEN - length) {
                *byte = 0;
            }
        }

        Ok(())
    }
}

/// Decode an Ethernet header and continue with its payload.
///
/// This is the decoder registered for `LayerType::ETHERNET`.
pub fn decode_ethernet<'a>(data: &'a [u8], mut builder: &mut dyn PacketBuilder<'a>)
    -> Result<()>
{
    let mut eth = Ethernet::default();
    eth.decode_from_bytes(data, &mut builder)?;

    let next = eth.next_layer_type();
    let payload = eth.base.payload;
    let id = builder.add_layer(Box::new(eth));
    builder.set_link_layer(id);
    builder.next_decoder(next, payload)
}
