//! The mapping from layer types to their decoders.
//!
//! Protocol implementations plug into decoding by registering a [`DecodeFn`] under their
//! [`LayerType`]. There are two places to do so:
//!
//! * A [`LayerRegistry`] value, owned by the caller and passed to [`Packet::decode_with`]. This is
//!   the choice for tests and for programs that want full control over the set of protocols.
//! * The process-wide registry behind [`register_layer_type`], used by [`Packet::decode`]. It
//!   starts out with the decoders of this crate. Register additional protocols once during
//!   startup, before decoding begins. Lookups copy the entry out of the registry so no lock is
//!   held while a decoder runs.
//!
//! [`DecodeFn`]: type.DecodeFn.html
//! [`LayerType`]: ../../layer/struct.LayerType.html
//! [`LayerRegistry`]: struct.LayerRegistry.html
//! [`Packet::decode_with`]: ../struct.Packet.html#method.decode_with
//! [`Packet::decode`]: ../struct.Packet.html#method.decode
//! [`register_layer_type`]: fn.register_layer_type.html
use core::fmt;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::layer::{decode_payload, DecodingLayer, LayerClass, LayerType, Payload};
use crate::layer::eth::{decode_ethernet, Ethernet};
use crate::wire::Result;

use super::PacketBuilder;

/// The entry point of a protocol decoder.
///
/// Parses the layer at the start of the data, adds it to the builder and usually continues with
/// `PacketBuilder::next_decoder`.
pub type DecodeFn = for<'a> fn(&'a [u8], &mut dyn PacketBuilder<'a>) -> Result<()>;

/// A registered layer type.
#[derive(Clone, Copy)]
pub struct LayerTypeMetadata {
    /// A human readable name of the protocol.
    pub name: &'static str,
    /// Decodes a layer of this type.
    pub decoder: DecodeFn,
}

/// A reason to reject a registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegisterError {
    /// The layer type is a sentinel with a fixed meaning.
    Reserved(LayerType),
    /// A decoder is already registered for the layer type.
    Duplicate(LayerType),
}

/// Maps layer types to decoders.
///
/// The default value contains the decoders of this crate, `new` creates an empty registry.
#[derive(Clone, Debug)]
pub struct LayerRegistry {
    types: HashMap<LayerType, LayerTypeMetadata>,
}

impl LayerRegistry {
    /// Create a registry without any decoders.
    pub fn new() -> Self {
        LayerRegistry {
            types: HashMap::new(),
        }
    }

    /// Register the decoder for a layer type.
    ///
    /// The unknown type can not be registered, it always ends a chain with a payload. Each type
    /// can only be registered once.
    pub fn register(&mut self, layer_type: LayerType, metadata: LayerTypeMetadata)
        -> core::result::Result<(), RegisterError>
    {
        if layer_type == LayerType::UNKNOWN || layer_type == LayerType::DECODE_FAILURE {
            return Err(RegisterError::Reserved(layer_type));
        }

        if self.types.contains_key(&layer_type) {
            return Err(RegisterError::Duplicate(layer_type));
        }

        // Not the `Display` of the type, that may look into the global registry.
        net_debug!("registered decoder {} for layer type {}", metadata.name, layer_type.id());
        self.types.insert(layer_type, metadata);
        Ok(())
    }

    /// Register one decoder for every type in a class.
    ///
    /// Either all types are registered or none.
    pub fn register_class(&mut self, class: LayerClass, metadata: LayerTypeMetadata)
        -> core::result::Result<(), RegisterError>
    {
        for &layer_type in class.layer_types() {
            if layer_type == LayerType::UNKNOWN || layer_type == LayerType::DECODE_FAILURE {
                return Err(RegisterError::Reserved(layer_type));
            }
            if self.types.contains_key(&layer_type) {
                return Err(RegisterError::Duplicate(layer_type));
            }
        }

        for &layer_type in class.layer_types() {
            self.register(layer_type, metadata)?;
        }

        Ok(())
    }

    /// The registration of a layer type.
    pub fn lookup(&self, layer_type: LayerType) -> Option<LayerTypeMetadata> {
        self.types.get(&layer_type).copied()
    }

    /// Query whether a decoder is registered for the layer type.
    pub fn contains(&self, layer_type: LayerType) -> bool {
        self.types.contains_key(&layer_type)
    }

    /// The registered name of a layer type.
    pub fn name(&self, layer_type: LayerType) -> Option<&'static str> {
        self.types.get(&layer_type).map(|metadata| metadata.name)
    }

    /// The number of registered layer types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Query whether no layer type is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Contains the decoders implemented in this crate.
impl Default for LayerRegistry {
    fn default() -> Self {
        let mut registry = LayerRegistry::new();
        let builtin = [
            (Ethernet::default().can_decode(), LayerTypeMetadata {
                name: "Ethernet",
                decoder: decode_ethernet,
            }),
            (Payload::default().can_decode(), LayerTypeMetadata {
                name: "Payload",
                decoder: decode_payload,
            }),
        ];

        for (class, metadata) in builtin.iter() {
            // The builtin types are distinct and not reserved.
            let _ = registry.register_class(*class, *metadata);
        }

        registry
    }
}

fn global() -> &'static RwLock<LayerRegistry> {
    static GLOBAL: OnceLock<RwLock<LayerRegistry>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(LayerRegistry::default()))
}

/// Register a decoder with the process-wide registry.
///
/// This is the extension point for protocol implementations outside of this crate. Call it once
/// per layer type during startup.
pub fn register_layer_type(layer_type: LayerType, metadata: LayerTypeMetadata)
    -> core::result::Result<(), RegisterError>
{
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(layer_type, metadata)
}

/// Look up a layer type in the process-wide registry.
pub fn lookup(layer_type: LayerType) -> Option<LayerTypeMetadata> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .lookup(layer_type)
}

/// The name of a layer type in the process-wide registry.
///
/// This is what `Display` of a `LayerType` falls back to, so the registry must never format a
/// layer type while holding its write lock.
pub fn layer_type_name(layer_type: LayerType) -> Option<&'static str> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .name(layer_type)
}

impl fmt::Debug for LayerTypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LayerTypeMetadata")
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RegisterError::Reserved(layer_type) =>
                write!(f, "layer type {} is reserved", layer_type.id()),
            RegisterError::Duplicate(layer_type) =>
                write!(f, "layer type {} ({}) is already registered", layer_type.id(), layer_type),
        }
    }
}

impl std::error::Error for RegisterError {}
