use crate::decode::{ApplicationLayerSetter, DecodeFeedback, LayerRegistrar, PacketBuilder};
use crate::serialize::{SerializeBuffer, SerializeOptions};
use crate::wire::{Error, Result};

use super::{DecodingLayer, Layer, LayerClass, LayerType, SerializableLayer};

/// Bytes without further known structure.
///
/// Ends most decode chains: every layer type without a registered decoder is wrapped as a payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Payload<'a>(pub &'a [u8]);

/// The bytes a decoder failed on, and why.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeFailure<'a> {
    data: &'a [u8],
    error: Error,
}

impl<'a> Payload<'a> {
    /// The payload bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }
}

impl<'a> Layer<'a> for Payload<'a> {
    fn layer_type(&self) -> LayerType {
        LayerType::PAYLOAD
    }

    fn contents(&self) -> &'a [u8] {
        self.0
    }

    fn payload(&self) -> &'a [u8] {
        &[]
    }
}

impl<'a> DecodingLayer<'a> for Payload<'a> {
    fn decode_from_bytes(&mut self, data: &'a [u8], _: &mut dyn DecodeFeedback) -> Result<()> {
        self.0 = data;
        Ok(())
    }

    fn can_decode(&self) -> LayerClass {
        LayerType::PAYLOAD.into()
    }

    fn next_layer_type(&self) -> LayerType {
        LayerType::UNKNOWN
    }
}

impl<'a> SerializableLayer<'a> for Payload<'a> {
    fn serialize_to(&self, buffer: &mut SerializeBuffer, _: SerializeOptions) -> Result<()> {
        buffer.prepend_bytes(self.0.len()).copy_from_slice(self.0);
        Ok(())
    }
}

impl<'a> DecodeFailure<'a> {
    /// Record a failure to decode `data`.
    pub fn new(data: &'a [u8], error: Error) -> Self {
        DecodeFailure { data, error }
    }

    /// The error the decoder returned.
    pub fn error(&self) -> Error {
        self.error
    }
}

impl<'a> Layer<'a> for DecodeFailure<'a> {
    fn layer_type(&self) -> LayerType {
        LayerType::DECODE_FAILURE
    }

    fn contents(&self) -> &'a [u8] {
        self.data
    }

    fn payload(&self) -> &'a [u8] {
        &[]
    }
}

/// Decode the remaining bytes as an opaque payload, ending the chain.
pub fn decode_payload<'a>(data: &'a [u8], builder: &mut dyn PacketBuilder<'a>) -> Result<()> {
    let id = builder.add_layer(Box::new(Payload(data)));
    builder.set_application_layer(id);
    Ok(())
}
