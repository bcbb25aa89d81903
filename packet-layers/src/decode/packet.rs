use core::fmt;

use crate::layer::{Layer, LayerType};
use crate::wire::Error;

use super::{registry, Builder, DecodeOptions, LayerId, LayerRegistry};

/// A decoded packet.
///
/// Holds the layers in decode order, outermost first, together with quick access to the first
/// layer of each class. All layers borrow the decoded buffer.
#[derive(Debug)]
pub struct Packet<'a> {
    data: &'a [u8],
    layers: Vec<Box<dyn Layer<'a> + 'a>>,
    pub(super) link: Option<LayerId>,
    pub(super) network: Option<LayerId>,
    pub(super) transport: Option<LayerId>,
    pub(super) application: Option<LayerId>,
    pub(super) error_layer: Option<LayerId>,
    error: Option<Error>,
    truncated: bool,
}

impl<'a> Packet<'a> {
    /// Decode `data` starting with the decoder for `first`, using the process-wide registry.
    ///
    /// This never fails. A decode error ends the chain and is recorded in the packet, see
    /// [`error`](#method.error).
    pub fn decode(data: &'a [u8], first: LayerType) -> Self {
        Builder::new(data, DecodeOptions::default())
            .run(first, registry::lookup)
    }

    /// Decode `data` with a specific registry and options.
    pub fn decode_with(
        data: &'a [u8],
        first: LayerType,
        registry: &LayerRegistry,
        options: DecodeOptions,
    ) -> Self {
        Builder::new(data, options)
            .run(first, |layer_type| registry.lookup(layer_type))
    }

    pub(super) fn empty(data: &'a [u8]) -> Self {
        Packet {
            data,
            layers: Vec::new(),
            link: None,
            network: None,
            transport: None,
            application: None,
            error_layer: None,
            error: None,
            truncated: false,
        }
    }

    pub(super) fn push(&mut self, layer: Box<dyn Layer<'a> + 'a>) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    pub(super) fn set_truncated(&mut self) {
        self.truncated = true;
    }

    pub(super) fn set_error(&mut self, error: Error) {
        self.error.get_or_insert(error);
    }

    /// The buffer the packet was decoded from.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Query whether no layer was decoded.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// All layers, outermost first.
    pub fn layers(&self) -> impl Iterator<Item = &(dyn Layer<'a> + 'a)> + '_ {
        self.layers.iter().map(|layer| &**layer)
    }

    /// The layer with the given id.
    pub fn get(&self, id: LayerId) -> Option<&(dyn Layer<'a> + 'a)> {
        self.layers.get(id.index()).map(|layer| &**layer)
    }

    /// The first layer of a type.
    pub fn layer(&self, layer_type: LayerType) -> Option<&(dyn Layer<'a> + 'a)> {
        self.layers().find(|layer| layer.layer_type() == layer_type)
    }

    /// The first link layer.
    pub fn link_layer(&self) -> Option<&(dyn Layer<'a> + 'a)> {
        self.link.and_then(|id| self.get(id))
    }

    /// The first network layer.
    pub fn network_layer(&self) -> Option<&(dyn Layer<'a> + 'a)> {
        self.network.and_then(|id| self.get(id))
    }

    /// The first transport layer.
    pub fn transport_layer(&self) -> Option<&(dyn Layer<'a> + 'a)> {
        self.transport.and_then(|id| self.get(id))
    }

    /// The first application layer, usually the final payload.
    pub fn application_layer(&self) -> Option<&(dyn Layer<'a> + 'a)> {
        self.application.and_then(|id| self.get(id))
    }

    /// The layer holding the bytes that failed to decode.
    pub fn error_layer(&self) -> Option<&(dyn Layer<'a> + 'a)> {
        self.error_layer.and_then(|id| self.get(id))
    }

    /// The error that ended decoding early, if any.
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// Query whether some layer declared more bytes than were present.
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Display for Packet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PACKET: {} bytes", self.data.len())?;
        if self.truncated {
            f.write_str(", truncated")?;
        }
        for (i, layer) in self.layers().enumerate() {
            write!(f, "\n- Layer {} ({:02} bytes) = {}",
                i + 1, layer.contents().len(), layer.layer_type())?;
            if let Some(flow) = layer.flow() {
                write!(f, " {}", flow)?;
            }
        }
        if let Some(err) = self.error {
            write!(f, "\n- Error: {}", err)?;
        }
        Ok(())
    }
}
