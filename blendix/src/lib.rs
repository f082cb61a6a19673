//! Fixed-count coordinate triples plus a text label, exchanged as delimited ASCII:
//!
//! ```text
//! x,y,z,x,y,z,...;label
//! ```

mod codec;
mod config;
mod decode;
mod encode;
mod error;
mod format;
mod triple;

pub use codec::SerialCodec;
pub use config::Config;
pub use decode::{decode, parse_lenient, tokens, ParsePolicy};
pub use encode::{encode, encode_set, encode_to_string};
pub use error::{DecodeError, Error};
pub use format::{BoundedWriter, WireNumber};
pub use triple::{ReceiveSet, TransmitSet, Triple, Variant};

/// Maximum number of triples shared between the transmit and receive sides.
pub const MAX_SETS: usize = 5;

/// Bytes reserved for the label, including the terminator slot.
pub const TEXT_BUFFER_SIZE: usize = 50;

/// Longest label that can be stored.
pub const TEXT_CAPACITY: usize = TEXT_BUFFER_SIZE - 1;

/// Numeric tokens the decoder will ever keep.
pub const MAX_VALUES: usize = MAX_SETS * 3;

/// Separator between numeric tokens on the wire.
pub const VALUE_SEPARATOR: char = ',';

/// Separator between the numeric tokens and the label.
pub const TEXT_SEPARATOR: char = ';';

/// Worst case wire length for a full transmit set of floats and a full label.
// An f32 rendered with two fraction digits is at most 39 integer digits, a sign, the point and two
// fraction digits. One separator follows every value, the last one being the `;`.
pub const WIRE_BUFFER_MAX_SIZE: usize = MAX_VALUES * (43 + 1) + TEXT_CAPACITY + 1;
