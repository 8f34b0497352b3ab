use crate::error::DecodeError;

/// Checked reader over a borrowed byte slice, big-endian like the wire.
///
/// Datagram content is attacker-controlled, so every read validates the remaining length
///  and fails with [`DecodeError::Truncated`] instead of panicking. Slices handed out by
///  [`try_take`](ByteCursor::try_take) and [`rest`](ByteCursor::rest) borrow from the
///  underlying buffer, not from the cursor, so they stay usable while the cursor moves on.
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn ensure(&self, requested: usize) -> Result<(), DecodeError> {
        if self.remaining() < requested {
            return Err(DecodeError::Truncated {
                requested,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn try_get_u8(&mut self) -> Result<u8, DecodeError> {
        self.ensure(1)?;
        let value = self.buf[self.pos];
        self.pos += 1;
        Ok(value)
    }

    pub fn try_get_i16(&mut self) -> Result<i16, DecodeError> {
        self.ensure(2)?;
        let value = i16::from_be_bytes([self.buf[self.pos], self.buf[self.pos + 1]]);
        self.pos += 2;
        Ok(value)
    }

    pub fn try_get_i32(&mut self) -> Result<i32, DecodeError> {
        self.ensure(4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        Ok(i32::from_be_bytes(raw))
    }

    pub fn try_get_u32(&mut self) -> Result<u32, DecodeError> {
        let value = self.try_get_i32()?;
        Ok(value as u32)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// The next `n` bytes as a slice, advancing past them.
    pub fn try_take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.ensure(n)?;
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Everything that has not been read yet, advancing to the end.
    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.buf[self.pos..];
        self.pos = self.buf.len();
        slice
    }
}

/// Writes a big-endian i32 at an absolute offset, e.g. to zero or embed the checksum
///  field of a datagram.
pub fn write_i32_at(buf: &mut [u8], pos: usize, value: i32) -> Result<(), DecodeError> {
    let available = buf.len().saturating_sub(pos);
    if available < 4 {
        return Err(DecodeError::Truncated {
            requested: 4,
            available,
        });
    }
    buf[pos..pos + 4].copy_from_slice(&value.to_be_bytes());
    Ok(())
}
