use core::fmt;

/// The error type for decoding and serializing layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The data was shorter than the fixed minimum header of the protocol.
    ///
    /// This is fatal to the decode of that layer but layers decoded before it stay valid. A
    /// payload shorter than a length *declared* inside a header is not this error, it only marks
    /// the packet as truncated.
    TooShort {
        /// The number of bytes the header requires.
        needed: usize,
        /// The number of bytes that were available.
        available: usize,
    },

    /// A field value is structurally invalid.
    ///
    /// For example an Ethernet header carrying both a payload length and a protocol type that is
    /// not the length-prefixed type, or a length that collides with the protocol type range.
    MalformedField(&'static str),

    /// An address did not have the width required by the protocol.
    InvalidAddressWidth {
        /// Which address field was invalid.
        field: &'static str,
        /// The width that was found.
        len: usize,
    },

    /// The packet declared more nested layers than the decoder is willing to follow.
    ChainTooDeep {
        /// The configured maximum number of layers.
        limit: usize,
    },
}

/// The result type for decoding and serializing layers.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::TooShort { needed, available } =>
                write!(f, "packet too short: need {} bytes, got {}", needed, available),
            Error::MalformedField(what) => write!(f, "malformed field: {}", what),
            Error::InvalidAddressWidth { field, len } =>
                write!(f, "invalid {} address width: {} bytes", field, len),
            Error::ChainTooDeep { limit } =>
                write!(f, "layer chain exceeds {} layers", limit),
        }
    }
}

impl std::error::Error for Error {}
