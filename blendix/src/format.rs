use std::fmt::{self, Write};

/// A coordinate component that can be rendered as a wire token.
pub trait WireNumber: Copy {
    fn write_token<W: Write>(&self, w: &mut W) -> fmt::Result;
}

impl WireNumber for i32 {
    fn write_token<W: Write>(&self, w: &mut W) -> fmt::Result {
        write!(w, "{}", self)
    }
}

impl WireNumber for f32 {
    // Always two fraction digits. `-0.001` renders as `-0.00`, like the device side.
    fn write_token<W: Write>(&self, w: &mut W) -> fmt::Result {
        write!(w, "{:.2}", self)
    }
}

/// `fmt::Write` sink over a fixed byte buffer.
///
/// Keeps at most `capacity - 1` bytes and drops the rest without reporting an error. The byte
/// following the content and the last byte of the buffer are always `0`, so the buffer can be
/// handed to anything expecting a terminated string even after truncation.
pub struct BoundedWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    truncated: bool,
}

impl<'a> BoundedWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        if let Some(first) = buf.first_mut() {
            *first = 0;
        }
        Self { buf, len: 0, truncated: false }
    }

    /// Content bytes written so far, terminator excluded.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Terminates the buffer and returns the content length.
    pub fn finish(self) -> usize {
        if let Some(last) = self.buf.last_mut() {
            *last = 0;
        }
        self.len
    }

    fn room(&self) -> usize {
        self.buf.len().saturating_sub(1).saturating_sub(self.len)
    }
}

impl Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let take = s.len().min(self.room());
        if take < s.len() {
            self.truncated = true;
        }

        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        if let Some(terminator) = self.buf.get_mut(self.len) {
            *terminator = 0;
        }
        Ok(())
    }
}
