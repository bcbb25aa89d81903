use core::{fmt, str::FromStr};
use byteorder::{ByteOrder, NetworkEndian};

use crate::layer::LayerType;
use crate::wire::{Error, Result};

/// The length of an Ethernet II header.
pub const HEADER_LEN: usize = field::PAYLOAD.start;

/// The minimum frame length, excluding the frame check sequence.
///
/// Shorter frames are zero padded when serialized.
pub const MIN_FRAME_LEN: usize = 60;

/// Values of the type field below this are an IEEE 802.3 payload length.
pub const LENGTH_LIMIT: u16 = 0x0600;

enum_with_unknown! {
    /// Ethernet protocol type.
    pub enum EtherType(u16) {
        /// The header carries a payload length, followed by an 802.2 LLC header.
        ///
        /// This is not a registered EtherType but the value the type is set to when the field
        /// held a length.
        Llc  = 0x0000,
        Ipv4 = 0x0800,
        Arp  = 0x0806,
        Dot1Q = 0x8100,
        Ipv6 = 0x86DD,
        JumboFrame = 0x8870,
    }
}

impl EtherType {
    /// The layer type that decodes a payload of this protocol.
    ///
    /// Unassigned values map to `LayerType::UNKNOWN`, which is never registered and thus ends the
    /// decode chain with an opaque payload.
    pub fn layer_type(self) -> LayerType {
        match self {
            EtherType::Llc => LayerType::LLC,
            EtherType::Ipv4 => LayerType::IPV4,
            EtherType::Arp => LayerType::ARP,
            EtherType::Dot1Q => LayerType::DOT1Q,
            EtherType::Ipv6 => LayerType::IPV6,
            EtherType::JumboFrame | EtherType::Unknown(_) => LayerType::UNKNOWN,
        }
    }
}

impl Default for EtherType {
    fn default() -> Self {
        EtherType::Llc
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EtherType::Llc  => write!(f, "LLC"),
            EtherType::Ipv4 => write!(f, "IPv4"),
            EtherType::Ipv6 => write!(f, "IPv6"),
            EtherType::Arp  => write!(f, "ARP"),
            EtherType::Dot1Q => write!(f, "802.1Q"),
            EtherType::JumboFrame => write!(f, "JumboFrame"),
            EtherType::Unknown(id) => write!(f, "0x{:04x}", id)
        }
    }
}

/// A six-octet Ethernet II address.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Address(pub [u8; 6]);

impl Address {
    /// The broadcast address.
    pub const BROADCAST: Address = Address([0xff; 6]);

    /// Construct an Ethernet address from a sequence of octets, in big-endian.
    ///
    /// Fails if `data` is not six octets long.
    pub fn from_bytes(data: &[u8]) -> Result<Address> {
        if data.len() != 6 {
            return Err(Error::InvalidAddressWidth { field: "ethernet", len: data.len() });
        }
        let mut bytes = [0; 6];
        bytes.copy_from_slice(data);
        Ok(Address(bytes))
    }

    /// Return an Ethernet address as a sequence of octets, in big-endian.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Query whether the address is an unicast address.
    pub fn is_unicast(&self) -> bool {
        !(self.is_broadcast() ||
          self.is_multicast())
    }

    /// Query whether this address is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Query whether the "multicast" bit in the OUI is set.
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// Query whether the "locally administered" bit in the OUI is set.
    pub fn is_local(&self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

/// The error of parsing an address from its colon separated hex form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseAddressError {
    kind: ParseAddressErrorKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParseAddressErrorKind {
    ComponentError,
    SeparatorError,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bytes = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
               bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5])
    }
}

impl fmt::Display for ParseAddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self.kind {
            ParseAddressErrorKind::ComponentError => "invalid ethernet component",
            ParseAddressErrorKind::SeparatorError => "unexpected number of ethernet address components (should be 6)",
        })
    }
}

impl std::error::Error for ParseAddressError {}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(src: &str) -> core::result::Result<Self, ParseAddressError> {
        let mut parsed = [0; 6];
        let mut components = src.split(':');
        for c in parsed.iter_mut() {
            let part = components
                .next()
                .ok_or(ParseAddressError {
                    kind: ParseAddressErrorKind::SeparatorError,
                })?;
            *c = u8::from_str_radix(part, 16)
                .map_err(|_| ParseAddressError {
                    kind: ParseAddressErrorKind::ComponentError,
                })?;
        }

        if components.next().is_some() {
            Err(ParseAddressError {
                kind: ParseAddressErrorKind::SeparatorError,
            })
        } else {
            Ok(Address(parsed))
        }
    }
}

byte_wrapper! {
    /// A byte sequence representing an Ethernet II header and its payload.
    ///
    /// All accessors stay within the first `HEADER_LEN` bytes, except the payload slices. Use one
    /// of the checked constructors on untrusted data, the accessors panic on shorter buffers.
    #[derive(Debug, PartialEq, Eq)]
    pub struct ethernet([u8]);
}

mod field {
    use crate::wire::field::*;

    pub(crate) const DESTINATION: Field =  0..6;
    pub(crate) const SOURCE:      Field =  6..12;
    pub(crate) const ETHERTYPE:   Field = 12..14;
    pub(crate) const PAYLOAD:     Rest  = 14..;
}

impl ethernet {
    /// Imbue a raw octet buffer with Ethernet frame structure.
    pub fn new_unchecked(data: &[u8]) -> &Self {
        Self::__from_macro_new_unchecked(data)
    }

    /// Imbue a mutable octet buffer with Ethernet frame structure.
    pub fn new_unchecked_mut(data: &mut [u8]) -> &mut Self {
        Self::__from_macro_new_unchecked_mut(data)
    }

    /// Shorthand for a combination of `new_unchecked` and `check_len`.
    pub fn new_checked(data: &[u8]) -> Result<&Self> {
        Self::new_unchecked(data).check_len()?;
        Ok(Self::new_unchecked(data))
    }

    /// Shorthand for a combination of `new_unchecked_mut` and `check_len`.
    pub fn new_checked_mut(data: &mut [u8]) -> Result<&mut Self> {
        Self::new_checked(&data[..])?;
        Ok(Self::new_unchecked_mut(data))
    }

    /// Unwrap the packet as a raw byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Unwrap the packet as a mutable raw byte slice.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Ensure that no accessor method will panic if called.
    ///
    /// Returns `Err(Error::TooShort)` if the buffer is too short.
    pub fn check_len(&self) -> Result<()> {
        let len = self.0.len();
        if len < field::PAYLOAD.start {
            Err(Error::TooShort { needed: field::PAYLOAD.start, available: len })
        } else {
            Ok(())
        }
    }

    /// Return the length of a frame header.
    pub fn header_len() -> usize {
        field::PAYLOAD.start
    }

    /// Return the length of a buffer required to hold a packet with the payload
    /// of a given length.
    pub fn buffer_len(payload_len: usize) -> usize {
        field::PAYLOAD.start + payload_len
    }

    /// Return the destination address field.
    pub fn dst_addr(&self) -> Address {
        Address(self.dst_bytes())
    }

    /// Return the source address field.
    pub fn src_addr(&self) -> Address {
        Address(self.src_bytes())
    }

    /// Return the destination address field as a byte slice.
    pub fn dst_addr_slice(&self) -> &[u8] {
        &self.0[field::DESTINATION]
    }

    /// Return the source address field as a byte slice.
    pub fn src_addr_slice(&self) -> &[u8] {
        &self.0[field::SOURCE]
    }

    /// Return the raw type-or-length field.
    pub fn next_protocol(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::ETHERTYPE])
    }

    /// Return the EtherType field, without checking for a length value.
    pub fn ethertype(&self) -> EtherType {
        EtherType::from(self.next_protocol())
    }

    /// Set the destination address field.
    pub fn set_dst_addr(&mut self, value: Address) {
        self.0[field::DESTINATION].copy_from_slice(value.as_bytes())
    }

    /// Set the source address field.
    pub fn set_src_addr(&mut self, value: Address) {
        self.0[field::SOURCE].copy_from_slice(value.as_bytes())
    }

    /// Set the raw type-or-length field.
    pub fn set_next_protocol(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.0[field::ETHERTYPE], value)
    }

    /// Set the EtherType field.
    pub fn set_ethertype(&mut self, value: EtherType) {
        self.set_next_protocol(value.into())
    }

    /// Exchange source and destination address, e.g. to answer a frame in place.
    pub fn swap_addrs(&mut self) {
        let dst = self.dst_bytes();
        self.0.copy_within(field::SOURCE, field::DESTINATION.start);
        self.0[field::SOURCE].copy_from_slice(&dst);
    }

    /// Direct the frame to every station on the link.
    pub fn set_broadcast(&mut self) {
        self.set_dst_addr(Address::BROADCAST)
    }

    /// Query whether the frame is addressed to the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        self.0[field::DESTINATION] == Address::BROADCAST.0[..]
    }

    /// Query whether the frame is addressed to a group, broadcast included.
    pub fn is_multicast(&self) -> bool {
        self.0[field::DESTINATION.start] & 0x01 != 0
    }

    /// Return the payload as a byte slice.
    pub fn payload_slice(&self) -> &[u8] {
        &self.0[field::PAYLOAD]
    }

    /// Return the payload as a mutable byte slice.
    pub fn payload_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0[field::PAYLOAD]
    }

    fn dst_bytes(&self) -> [u8; 6] {
        let mut bytes = [0; 6];
        bytes.copy_from_slice(&self.0[field::DESTINATION]);
        bytes
    }

    fn src_bytes(&self) -> [u8; 6] {
        let mut bytes = [0; 6];
        bytes.copy_from_slice(&self.0[field::SOURCE]);
        bytes
    }
}

impl AsRef<[u8]> for ethernet {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for ethernet {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl fmt::Display for ethernet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.check_len() {
            Err(err) => write!(f, "EthernetII ({})", err),
            Ok(()) => write!(f, "EthernetII src={} dst={} type={}",
                self.src_addr(), self.dst_addr(), self.ethertype()),
        }
    }
}
