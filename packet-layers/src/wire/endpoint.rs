//! Protocol independent identities of communicating parties.
use core::{cmp, fmt};
use core::hash::{Hash, Hasher};

use crate::wire::{Error, Result};

/// The maximum number of address bytes held by an endpoint.
pub const MAX_ENDPOINT_LEN: usize = 16;

/// Names the kind of address an endpoint carries.
///
/// The set of types is open. Protocol implementations outside this crate define their own values
/// with [`EndpointType::new`], choosing numbers that do not collide with the well-known ones.
///
/// [`EndpointType::new`]: #method.new
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointType(u32);

impl EndpointType {
    /// Not a valid endpoint type.
    pub const INVALID: EndpointType = EndpointType(0);
    /// A six-octet hardware (MAC) address.
    pub const MAC: EndpointType = EndpointType(1);

    /// Create an endpoint type from its raw identifier.
    pub const fn new(id: u32) -> Self {
        EndpointType(id)
    }

    /// The raw identifier.
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EndpointType::INVALID => f.write_str("Invalid"),
            EndpointType::MAC => f.write_str("MAC"),
            EndpointType(other) => write!(f, "EndpointType({})", other),
        }
    }
}

/// An address of some endpoint type.
///
/// Endpoints are small values that can be copied around and used as map keys.
#[derive(Clone, Copy)]
pub struct Endpoint {
    kind: EndpointType,
    len: u8,
    raw: [u8; MAX_ENDPOINT_LEN],
}

impl Endpoint {
    /// Create an endpoint from a type and its address bytes.
    ///
    /// Fails with `InvalidAddressWidth` if the address is longer than [`MAX_ENDPOINT_LEN`].
    ///
    /// [`MAX_ENDPOINT_LEN`]: constant.MAX_ENDPOINT_LEN.html
    pub fn new(kind: EndpointType, addr: &[u8]) -> Result<Self> {
        if addr.len() > MAX_ENDPOINT_LEN {
            return Err(Error::InvalidAddressWidth { field: "endpoint", len: addr.len() });
        }

        let mut raw = [0; MAX_ENDPOINT_LEN];
        raw[..addr.len()].copy_from_slice(addr);
        Ok(Endpoint {
            kind,
            len: addr.len() as u8,
            raw,
        })
    }

    /// The type of this endpoint.
    pub fn endpoint_type(&self) -> EndpointType {
        self.kind
    }

    /// The address bytes.
    pub fn raw(&self) -> &[u8] {
        &self.raw[..usize::from(self.len)]
    }

    /// Order two endpoints, first by type and then by address.
    ///
    /// Unlike the `PartialOrd` implementation this is total, which makes it usable for sorting a
    /// mixed set of endpoints.
    pub fn less_than(&self, other: &Endpoint) -> bool {
        (self.kind, self.raw()) < (other.kind, other.raw())
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Endpoint) -> bool {
        self.kind == other.kind && self.raw() == other.raw()
    }
}

impl Eq for Endpoint { }

impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.raw().hash(state);
    }
}

/// Endpoints of different types are not comparable.
impl PartialOrd for Endpoint {
    fn partial_cmp(&self, other: &Endpoint) -> Option<cmp::Ordering> {
        if self.kind != other.kind {
            return None;
        }
        Some(self.raw().cmp(other.raw()))
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Endpoint({}, {})", self.kind, self)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let separator = if self.kind == EndpointType::MAC { ":" } else { "" };
        for (i, byte) in self.raw().iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// A directed conversation between two endpoints of the same type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Flow {
    src: Endpoint,
    dst: Endpoint,
}

impl Flow {
    /// Create a flow from raw source and destination addresses.
    pub fn new(kind: EndpointType, src: &[u8], dst: &[u8]) -> Result<Self> {
        Ok(Flow {
            src: Endpoint::new(kind, src)?,
            dst: Endpoint::new(kind, dst)?,
        })
    }

    /// Create a flow from two endpoints.
    ///
    /// Fails when the endpoint types differ since such a pair does not describe a conversation
    /// at any single layer.
    pub fn from_endpoints(src: Endpoint, dst: Endpoint) -> Result<Self> {
        if src.kind != dst.kind {
            return Err(Error::MalformedField("flow endpoints of different types"));
        }
        Ok(Flow { src, dst })
    }

    /// The endpoint type of both sides.
    pub fn endpoint_type(&self) -> EndpointType {
        self.src.kind
    }

    /// The sending side.
    pub fn src(&self) -> Endpoint {
        self.src
    }

    /// The receiving side.
    pub fn dst(&self) -> Endpoint {
        self.dst
    }

    /// Both endpoints, source first.
    pub fn endpoints(&self) -> (Endpoint, Endpoint) {
        (self.src, self.dst)
    }

    /// The flow in the opposite direction.
    pub fn reverse(&self) -> Flow {
        Flow { src: self.dst, dst: self.src }
    }

    /// A hash that is equal for a flow and its reverse.
    ///
    /// Useful for sharding both directions of a conversation to the same worker. This is FNV-1a
    /// over each endpoint, combined commutatively, and is stable across runs and platforms.
    pub fn fast_hash(&self) -> u64 {
        let src = fnv1a(self.src.raw());
        let dst = fnv1a(self.dst.raw());
        let kind = u64::from(self.src.kind.id()).wrapping_mul(FNV_PRIME);
        src.wrapping_add(dst) ^ (src.wrapping_mul(dst)) ^ kind
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}->{}", self.src, self.dst)
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}
