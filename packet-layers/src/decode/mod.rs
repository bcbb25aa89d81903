//! Decoding a buffer into a chain of layers.
//!
//! ## The decode chain
//!
//! Decoding starts with a caller chosen [`LayerType`], usually the link type of the capture. Its
//! registered decoder parses one layer, hands it to the [`PacketBuilder`] and names the type and
//! bytes to continue with via [`PacketBuilder::next_decoder`]. The builder then looks up that
//! type and repeats. The chain ends when a decoder does not continue, when no bytes remain, or
//! with an opaque [`Payload`] when no decoder is registered for the next type. The last case is
//! the common one and not an error.
//!
//! The chain is driven by a loop, there is no recursion between decoders. The number of layers is
//! capped by [`DecodeOptions::max_depth`] so that a crafted packet can not keep the decoder busy.
//!
//! ## Failures
//!
//! A failing decoder ends the chain. Layers decoded before it are kept and a [`DecodeFailure`]
//! layer holding the undecoded bytes is appended, so that callers can inspect what was learned.
//! Truncation is not a failure: a decoder that finds fewer bytes than its header declares sets
//! the truncated flag and continues with what is there.
//!
//! [`LayerType`]: ../layer/struct.LayerType.html
//! [`PacketBuilder`]: trait.PacketBuilder.html
//! [`PacketBuilder::next_decoder`]: trait.PacketBuilder.html#tymethod.next_decoder
//! [`Payload`]: ../layer/struct.Payload.html
//! [`DecodeOptions::max_depth`]: struct.DecodeOptions.html#structfield.max_depth
//! [`DecodeFailure`]: ../layer/struct.DecodeFailure.html
use crate::layer::{decode_payload, DecodeFailure, Layer, LayerType};
use crate::wire::{Error, Result};

pub mod registry;

mod packet;

#[cfg(test)]
mod tests;

pub use self::packet::Packet;
pub use self::registry::{
    DecodeFn,
    LayerRegistry,
    LayerTypeMetadata,
    RegisterError,
    register_layer_type,
};

/// The default cap on the number of layers in one packet.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Configures a decode pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodeOptions {
    /// The maximum number of decoders run for one packet.
    ///
    /// Scheduling another decoder beyond this fails with `Error::ChainTooDeep`.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Refers to a layer added to a packet under construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(usize);

impl LayerId {
    /// The position of the layer in the packet, outermost first.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Receives non-fatal observations of a decoder.
pub trait DecodeFeedback {
    /// Note that the packet is shorter than some layer declared.
    ///
    /// The flag can not be reset within a decode pass.
    fn set_truncated(&mut self);
}

/// Collects decoded layers in order.
pub trait LayerRegistrar<'a> {
    /// Append a layer, outermost layers first.
    fn add_layer(&mut self, layer: Box<dyn Layer<'a> + 'a>) -> LayerId;
}

/// Records the link layer of a packet.
pub trait LinkLayerSetter {
    /// Mark a layer as the link layer, unless one is already set.
    fn set_link_layer(&mut self, layer: LayerId);
}

/// Records the network layer of a packet.
pub trait NetworkLayerSetter {
    /// Mark a layer as the network layer, unless one is already set.
    fn set_network_layer(&mut self, layer: LayerId);
}

/// Records the transport layer of a packet.
pub trait TransportLayerSetter {
    /// Mark a layer as the transport layer, unless one is already set.
    fn set_transport_layer(&mut self, layer: LayerId);
}

/// Records the application layer of a packet.
pub trait ApplicationLayerSetter {
    /// Mark a layer as the application layer, unless one is already set.
    fn set_application_layer(&mut self, layer: LayerId);
}

/// Records the layer describing a decode failure.
pub trait ErrorLayerSetter {
    /// Mark a layer as the error layer, unless one is already set.
    fn set_error_layer(&mut self, layer: LayerId);
}

/// The context a decoder works in.
///
/// Decoders should only rely on the narrow capability they need where possible, e.g. a
/// `DecodingLayer` only ever sees a `DecodeFeedback`.
pub trait PacketBuilder<'a>: DecodeFeedback
    + LayerRegistrar<'a>
    + LinkLayerSetter
    + NetworkLayerSetter
    + TransportLayerSetter
    + ApplicationLayerSetter
    + ErrorLayerSetter
{
    /// Continue decoding `data` as a layer of type `next`.
    ///
    /// Decoding happens after the current decoder returned. Nothing is scheduled when `data` is
    /// empty. Fails with `Error::ChainTooDeep` when the packet already holds the maximum number of
    /// layers.
    fn next_decoder(&mut self, next: LayerType, data: &'a [u8]) -> Result<()>;
}

impl<T: DecodeFeedback + ?Sized> DecodeFeedback for &'_ mut T {
    fn set_truncated(&mut self) {
        (**self).set_truncated()
    }
}

/// Discards all feedback.
///
/// For decoding single layers outside of a packet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NilDecodeFeedback;

impl DecodeFeedback for NilDecodeFeedback {
    fn set_truncated(&mut self) { }
}

/// The packet builder of one decode pass.
struct Builder<'a> {
    packet: Packet<'a>,
    pending: Option<(LayerType, &'a [u8])>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Builder<'a> {
    fn new(data: &'a [u8], options: DecodeOptions) -> Self {
        Builder {
            packet: Packet::empty(data),
            pending: None,
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    /// Drive the chain from the first layer type until it ends.
    fn run<F>(mut self, first: LayerType, lookup: F) -> Packet<'a>
        where F: Fn(LayerType) -> Option<LayerTypeMetadata>,
    {
        let mut next = Some((first, self.packet.data()));

        while let Some((layer_type, data)) = next.take() {
            self.depth += 1;

            let result = match lookup(layer_type) {
                Some(metadata) => {
                    net_trace!("decoding {} bytes as {}", data.len(), metadata.name);
                    (metadata.decoder)(data, &mut self)
                },
                None => {
                    net_trace!("no decoder for {}, {} bytes of payload", layer_type, data.len());
                    decode_payload(data, &mut self)
                },
            };

            if let Err(err) = result {
                // A decoder failing after scheduling its successor leaves only those bytes.
                let failed = self.pending.take().map_or(data, |(_, rest)| rest);
                self.fail(layer_type, failed, err);
                break;
            }

            next = self.pending.take();
        }

        self.packet
    }

    fn fail(&mut self, layer_type: LayerType, data: &'a [u8], err: Error) {
        net_debug!("decoding {} failed after {} layers: {}", layer_type, self.packet.len(), err);
        let id = self.add_layer(Box::new(DecodeFailure::new(data, err)));
        self.set_error_layer(id);
        self.packet.set_error(err);
    }
}

impl DecodeFeedback for Builder<'_> {
    fn set_truncated(&mut self) {
        if !self.packet.truncated() {
            net_trace!("packet truncated at layer {}", self.packet.len());
        }
        self.packet.set_truncated();
    }
}

impl<'a> LayerRegistrar<'a> for Builder<'a> {
    fn add_layer(&mut self, layer: Box<dyn Layer<'a> + 'a>) -> LayerId {
        LayerId(self.packet.push(layer))
    }
}

impl LinkLayerSetter for Builder<'_> {
    fn set_link_layer(&mut self, layer: LayerId) {
        self.packet.link.get_or_insert(layer);
    }
}

impl NetworkLayerSetter for Builder<'_> {
    fn set_network_layer(&mut self, layer: LayerId) {
        self.packet.network.get_or_insert(layer);
    }
}

impl TransportLayerSetter for Builder<'_> {
    fn set_transport_layer(&mut self, layer: LayerId) {
        self.packet.transport.get_or_insert(layer);
    }
}

impl ApplicationLayerSetter for Builder<'_> {
    fn set_application_layer(&mut self, layer: LayerId) {
        self.packet.application.get_or_insert(layer);
    }
}

impl ErrorLayerSetter for Builder<'_> {
    fn set_error_layer(&mut self, layer: LayerId) {
        self.packet.error_layer.get_or_insert(layer);
    }
}

impl<'a> PacketBuilder<'a> for Builder<'a> {
    fn next_decoder(&mut self, next: LayerType, data: &'a [u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        self.pending = Some((next, data));
        if self.depth >= self.max_depth {
            net_debug!("refusing to decode {} beyond {} layers", next, self.max_depth);
            return Err(Error::ChainTooDeep { limit: self.max_depth });
        }

        Ok(())
    }
}
