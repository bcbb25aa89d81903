//! The layer abstraction shared by all protocol implementations.
//!
//! ## Layers
//!
//! A layer is one decoded protocol header together with the split of its input into the bytes
//! it consumed (its *contents*) and the bytes it hands on (its *payload*). Both are views into the
//! buffer the packet was decoded from, nothing is copied. The lifetime `'a` on every layer is the
//! lifetime of that buffer; a layer, and the [`Packet`] holding it, can not outlive it.
//!
//! The capabilities are split over three traits:
//!
//! * [`Layer`] is the object safe view used once a layer sits in a packet: its type, its byte
//!   ranges and optionally the flow it belongs to.
//! * [`DecodingLayer`] parses a layer in place from bytes and names the type of the next layer.
//! * [`SerializableLayer`] writes the layer back into a [`SerializeBuffer`].
//!
//! ## Layer types
//!
//! A [`LayerType`] is an open-ended numeric identifier. It is the key under which a decoder is
//! registered with the [registry], so new protocols add new values instead of editing a central
//! match. Values below 10 are reserved for the sentinels of this crate.
//!
//! [`Packet`]: ../decode/struct.Packet.html
//! [`Layer`]: trait.Layer.html
//! [`DecodingLayer`]: trait.DecodingLayer.html
//! [`SerializableLayer`]: trait.SerializableLayer.html
//! [`SerializeBuffer`]: ../serialize/struct.SerializeBuffer.html
//! [`LayerType`]: struct.LayerType.html
//! [registry]: ../decode/registry/index.html
use core::{fmt, slice};

use crate::decode::{registry, DecodeFeedback};
use crate::serialize::{SerializeBuffer, SerializeOptions};
use crate::wire::{Flow, Result};

pub mod eth;
mod payload;

pub use payload::{
    decode_payload,
    DecodeFailure,
    Payload,
};

/// Identifies a protocol, and the decoder registered for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LayerType(u32);

impl LayerType {
    /// Unknown type, never registered.
    pub const UNKNOWN: LayerType = LayerType(0);
    /// A marker for the bytes a decoder failed on.
    pub const DECODE_FAILURE: LayerType = LayerType(1);
    /// Opaque bytes without further structure.
    pub const PAYLOAD: LayerType = LayerType(2);

    /// Ethernet II and IEEE 802.3 framing.
    pub const ETHERNET: LayerType = LayerType(10);
    /// IEEE 802.2 logical link control, following an 802.3 length field.
    pub const LLC: LayerType = LayerType(11);
    /// 802.1Q virtual LAN tag.
    pub const DOT1Q: LayerType = LayerType(12);
    /// Address resolution protocol.
    pub const ARP: LayerType = LayerType(20);
    /// Internet protocol, version 4.
    pub const IPV4: LayerType = LayerType(21);
    /// Internet protocol, version 6.
    pub const IPV6: LayerType = LayerType(22);

    /// Create a layer type from its raw identifier.
    pub const fn new(id: u32) -> Self {
        LayerType(id)
    }

    /// The raw identifier.
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Query whether this is one of the sentinels reserved by this crate.
    pub fn is_reserved(self) -> bool {
        self.0 < 10
    }

    fn builtin_name(self) -> Option<&'static str> {
        Some(match self {
            LayerType::UNKNOWN => "Unknown",
            LayerType::DECODE_FAILURE => "DecodeFailure",
            LayerType::PAYLOAD => "Payload",
            LayerType::ETHERNET => "Ethernet",
            LayerType::LLC => "LLC",
            LayerType::DOT1Q => "Dot1Q",
            LayerType::ARP => "ARP",
            LayerType::IPV4 => "IPv4",
            LayerType::IPV6 => "IPv6",
            _ => return None,
        })
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(name) = self.builtin_name() {
            return f.write_str(name);
        }

        match registry::layer_type_name(*self) {
            Some(name) => f.write_str(name),
            None => write!(f, "LayerType({})", self.0),
        }
    }
}

/// The set of layer types a decoder claims to handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerClass {
    /// Exactly one type.
    One(LayerType),
    /// Any type in the list.
    Many(&'static [LayerType]),
}

impl LayerClass {
    /// Query whether the class contains a layer type.
    pub fn contains(&self, layer_type: LayerType) -> bool {
        self.layer_types().contains(&layer_type)
    }

    /// All layer types in this class.
    pub fn layer_types(&self) -> &[LayerType] {
        match self {
            LayerClass::One(one) => slice::from_ref(one),
            LayerClass::Many(many) => many,
        }
    }
}

impl From<LayerType> for LayerClass {
    fn from(layer_type: LayerType) -> Self {
        LayerClass::One(layer_type)
    }
}

/// The split of a decoded byte range into header and payload.
///
/// Both are subslices of the range the layer was decoded from, `contents` directly followed by
/// `payload`. A layer may leave trailing bytes out of its payload when its header declares a
/// shorter length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BaseLayer<'a> {
    /// The bytes of the header of this layer.
    pub contents: &'a [u8],
    /// The bytes following the header, handed to the next layer.
    pub payload: &'a [u8],
}

impl<'a> BaseLayer<'a> {
    /// Split `data` after a header of `header_len` bytes.
    ///
    /// # Panics
    /// This panics if `data` is shorter than `header_len`; decoders check the length first.
    pub fn split(data: &'a [u8], header_len: usize) -> Self {
        let (contents, payload) = data.split_at(header_len);
        BaseLayer { contents, payload }
    }
}

/// A decoded layer within a packet.
pub trait Layer<'a>: fmt::Debug {
    /// The type of this layer.
    fn layer_type(&self) -> LayerType;

    /// The header bytes of this layer.
    fn contents(&self) -> &'a [u8];

    /// The bytes following this layer.
    fn payload(&self) -> &'a [u8];

    /// The conversation this layer belongs to, if the protocol has addresses.
    fn flow(&self) -> Option<Flow> {
        None
    }
}

/// A layer that can parse itself from bytes.
pub trait DecodingLayer<'a>: Layer<'a> {
    /// Parse `data` into this layer, overwriting all previous state.
    ///
    /// Must fail with `Error::TooShort` when `data` is shorter than the minimum header and must
    /// never read beyond `data`. A payload shorter than a length declared in the header is
    /// reported via `feedback.set_truncated()` instead of failing.
    fn decode_from_bytes(&mut self, data: &'a [u8], feedback: &mut dyn DecodeFeedback)
        -> Result<()>;

    /// The layer types this decoder handles.
    fn can_decode(&self) -> LayerClass;

    /// The type of the layer contained in the payload.
    ///
    /// `LayerType::UNKNOWN` when no further structure is known.
    fn next_layer_type(&self) -> LayerType;
}

/// A layer that can write itself to wire format.
///
/// Layers are serialized innermost first. Each prepends its header to the bytes already in the
/// buffer, which at that point are its payload.
pub trait SerializableLayer<'a>: Layer<'a> {
    /// Prepend this layer to the buffer.
    ///
    /// Fails, without writing, if a field is structurally invalid.
    fn serialize_to(&self, buffer: &mut SerializeBuffer, options: SerializeOptions)
        -> Result<()>;
}
