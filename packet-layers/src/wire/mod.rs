/*! Low-level header access and protocol independent value types.

# Header views

The lowercase structures, e.g. [`ethernet_frame`], are dynamically sized wrappers around `[u8]`.
They extract fields from sequences of octets and insert fields into them, without copying and
without any knowledge of the layers before or after them. The `new_checked` constructors ensure
that no accessor panics afterwards; this is what the decoders in [`layer`] use on untrusted input.

# Identities

[`Endpoint`] and [`Flow`] describe who talks to whom at some layer, independent of the protocol.
A link layer reports hardware addresses, a network layer would report its own addresses, and so
on. Both are small `Copy` values usable as map keys.

# Examples

Answer a frame in place by swapping its addresses:

```rust
use packet_layers::wire::{ethernet_frame, EthernetAddress};

let mut bytes = [0u8; 60];
let frame = ethernet_frame::new_checked_mut(&mut bytes[..])
    .expect("long enough");
frame.set_src_addr(EthernetAddress([2, 0, 0, 0, 0, 1]));
frame.set_broadcast();
frame.swap_addrs();
assert!(frame.src_addr().is_broadcast());
assert_eq!(frame.dst_addr(), EthernetAddress([2, 0, 0, 0, 0, 1]));
```

[`ethernet_frame`]: struct.ethernet_frame.html
[`layer`]: ../layer/index.html
[`Endpoint`]: struct.Endpoint.html
[`Flow`]: struct.Flow.html
*/
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
//
// Applies to files in this folder unless otherwise noted. These are:
// * `error.rs`
// * `ethernet.rs`
// * `mod.rs` (this file)

mod field {
    pub(crate) type Field = ::core::ops::Range<usize>;
    pub(crate) type Rest  = ::core::ops::RangeFrom<usize>;
}

pub mod ethernet;
mod endpoint;
mod error;

pub use self::ethernet::{
    ethernet as ethernet_frame,
    EtherType as EthernetProtocol,
    Address as EthernetAddress,
    ParseAddressError as ParseEthernetAddressError};

pub use self::endpoint::{
    Endpoint,
    EndpointType,
    Flow,
    MAX_ENDPOINT_LEN};

pub use self::error::{
    Error,
    Result};
