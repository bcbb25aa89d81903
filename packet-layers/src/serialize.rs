//! Writing layers back to wire format.
//!
//! A frame is built from the inside out. The innermost layer is written first and every
//! enclosing layer prepends its header in front of it, so that at the time a layer is serialized
//! the buffer holds exactly its payload. This lets headers fill in lengths of what follows them.
//! Trailers, such as the padding of an Ethernet frame, are appended at the end.
//!
//! ```
//! use packet_layers::layer::Payload;
//! use packet_layers::layer::eth::Ethernet;
//! use packet_layers::serialize::{serialize_layers, SerializeBuffer, SerializeOptions};
//! use packet_layers::wire::EthernetProtocol;
//!
//! let src = [0x02, 0, 0, 0, 0, 1];
//! let dst = [0xff; 6];
//! let eth = Ethernet::new(&src, &dst, EthernetProtocol::Ipv4);
//! let payload = Payload(&[0xaa; 4]);
//!
//! let mut buffer = SerializeBuffer::new();
//! serialize_layers(&mut buffer, SerializeOptions::default(), &[&eth, &payload]).unwrap();
//!
//! // Padded to the minimum frame size.
//! assert_eq!(buffer.len(), 60);
//! assert_eq!(&buffer.bytes()[12..18], &[0x08, 0x00, 0xaa, 0xaa, 0xaa, 0xaa]);
//! ```
use crate::layer::{LayerType, SerializableLayer};
use crate::wire::Result;

/// The front space reserved when a buffer first needs to grow at the front.
const MIN_HEADROOM: usize = 64;

/// Configures how layers are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SerializeOptions {
    /// Recompute length fields from the data actually following a header.
    pub fix_lengths: bool,
    /// Recompute checksums over the written data.
    ///
    /// No layer of this crate carries a checksum, this is passed on to protocols that do.
    pub compute_checksums: bool,
}

/// A byte buffer that grows at both ends.
///
/// The bytes in use are a contiguous range of an allocation with spare room in front of it.
/// Prepending moves into that room and only reallocates when it runs out, doubling it each time.
/// Bytes already written keep their content and order through all later operations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SerializeBuffer {
    data: Vec<u8>,
    start: usize,
    layers: Vec<LayerType>,
}

impl SerializeBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        SerializeBuffer::default()
    }

    /// Create an empty buffer with room for `prepend` bytes in front and `append` bytes behind.
    pub fn with_capacity(prepend: usize, append: usize) -> Self {
        let mut data = Vec::with_capacity(prepend + append);
        data.resize(prepend, 0);
        SerializeBuffer {
            data,
            start: prepend,
            layers: Vec::new(),
        }
    }

    /// Make room for `count` bytes in front of the current contents.
    ///
    /// The returned bytes are not cleared, the caller is expected to overwrite all of them.
    pub fn prepend_bytes(&mut self, count: usize) -> &mut [u8] {
        if self.start < count {
            self.grow_front(count);
        }

        self.start -= count;
        &mut self.data[self.start..self.start + count]
    }

    /// Add `count` zeroed bytes behind the current contents.
    pub fn append_bytes(&mut self, count: usize) -> &mut [u8] {
        let end = self.data.len();
        self.data.resize(end + count, 0);
        &mut self.data[end..]
    }

    /// The bytes written so far.
    pub fn bytes(&self) -> &[u8] {
        &self.data[self.start..]
    }

    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len() - self.start
    }

    /// Query whether nothing was written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard all contents and recorded layers, keeping the allocation.
    ///
    /// All of the previous space becomes headroom for the next frame.
    pub fn clear(&mut self) {
        self.start = self.data.len();
        self.layers.clear();
    }

    /// Record that a layer was written.
    pub fn push_layer(&mut self, layer_type: LayerType) {
        self.layers.push(layer_type);
    }

    /// The types of the layers written so far, in the order they were written.
    ///
    /// This is innermost first when filled by `serialize_layers`.
    pub fn layers(&self) -> &[LayerType] {
        &self.layers
    }

    fn grow_front(&mut self, count: usize) {
        let len = self.len();
        let headroom = count
            .max(2*self.start)
            .max(len)
            .max(MIN_HEADROOM);

        let mut data = Vec::with_capacity(headroom + len);
        data.resize(headroom, 0);
        data.extend_from_slice(self.bytes());

        net_trace!("serialize buffer headroom {} -> {}", self.start, headroom);
        self.data = data;
        self.start = headroom;
    }
}

impl AsRef<[u8]> for SerializeBuffer {
    fn as_ref(&self) -> &[u8] {
        self.bytes()
    }
}

/// Write a chain of layers, given outermost first.
///
/// The buffer is cleared first. Layers are then serialized innermost first, each prepending to
/// the bytes of the layers it encloses. Stops at the first layer that fails to serialize.
pub fn serialize_layers<'a>(
    buffer: &mut SerializeBuffer,
    options: SerializeOptions,
    layers: &[&dyn SerializableLayer<'a>],
) -> Result<()> {
    buffer.clear();

    for layer in layers.iter().rev() {
        layer.serialize_to(buffer, options)?;
        buffer.push_layer(layer.layer_type());
    }

    Ok(())
}
