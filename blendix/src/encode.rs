use std::fmt::{self, Write};

use mint::Vector3;

use crate::format::{BoundedWriter, WireNumber};
use crate::{TransmitSet, TEXT_SEPARATOR, VALUE_SEPARATOR};

fn write_wire<T: WireNumber, W: Write>(
    w: &mut W,
    triples: &[Vector3<T>],
    label: &str,
) -> fmt::Result {
    for (i, triple) in triples.iter().enumerate() {
        if i > 0 {
            w.write_char(VALUE_SEPARATOR)?;
        }
        triple.x.write_token(w)?;
        w.write_char(VALUE_SEPARATOR)?;
        triple.y.write_token(w)?;
        w.write_char(VALUE_SEPARATOR)?;
        triple.z.write_token(w)?;
    }
    w.write_char(TEXT_SEPARATOR)?;
    w.write_str(label)
}

/// Writes `x,y,z,...;label` into `out` and returns the number of content bytes.
///
/// Output that does not fit is dropped; the last byte of `out` is always left as a `0`
/// terminator, so at most `out.len() - 1` content bytes are written.
pub fn encode<T: WireNumber>(triples: &[Vector3<T>], label: &str, out: &mut [u8]) -> usize {
    if out.is_empty() {
        return 0;
    }

    let mut w = BoundedWriter::new(out);
    // BoundedWriter never fails, it truncates
    let _ = write_wire(&mut w, triples, label);
    if w.truncated() {
        log::trace!("wire output truncated to {} bytes", w.len());
    }
    w.finish()
}

/// Encodes the first `count` triples of `set`.
pub fn encode_set(set: &TransmitSet, count: usize, label: &str, out: &mut [u8]) -> usize {
    match set {
        TransmitSet::Int(sets) => encode(&sets[..count.min(sets.len())], label, out),
        TransmitSet::Float(sets) => encode(&sets[..count.min(sets.len())], label, out),
    }
}

/// Renders the complete wire string without any length limit.
pub fn encode_to_string<T: WireNumber>(triples: &[Vector3<T>], label: &str) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_wire(&mut out, triples, label);
    out
}
