//! Bit-level reading and writing of codeword streams.
use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::error::DecodeError;

/// Reads MSB-first bit groups from data codewords.
pub(crate) struct BitSource<'a> {
    reader: BitReader<&'a [u8], BigEndian>,
    len: usize,
    pos: usize,
}

impl<'a> BitSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            reader: BitReader::endian(bytes, BigEndian),
            len: bytes.len() * 8,
            pos: 0,
        }
    }

    /// Number of unread bits.
    pub fn available(&self) -> usize {
        self.len - self.pos
    }

    /// Index of the byte the next bit is read from.
    pub fn byte_offset(&self) -> usize {
        self.pos / 8
    }

    pub fn read_bits(&mut self, n: u32) -> Result<u32, DecodeError> {
        if n == 0 {
            return Ok(0);
        }
        if n > 32 || n as usize > self.available() {
            return Err(DecodeError::Format("bit stream ends early"));
        }
        let value = self
            .reader
            .read::<u32>(n)
            .map_err(|_| DecodeError::Format("bit stream ends early"))?;
        self.pos += n as usize;
        Ok(value)
    }

    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bits(8)? as u8)
    }

    pub fn skip_to_byte_boundary(&mut self) {
        self.reader.byte_align();
        self.pos = (self.pos + 7) / 8 * 8;
    }
}

/// Collects MSB-first bit groups and keeps track of their count.
pub(crate) struct BitBuffer {
    writer: BitWriter<Vec<u8>, BigEndian>,
    len: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self {
            writer: BitWriter::endian(Vec::new(), BigEndian),
            len: 0,
        }
    }

    /// Number of bits written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn append_bits(&mut self, value: u32, n: u32) -> std::io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        self.writer.write(n, value)?;
        self.len += n as usize;
        Ok(())
    }

    /// Zero-pad to the next byte boundary and return the bytes.
    pub fn into_bytes(mut self) -> std::io::Result<Vec<u8>> {
        self.writer.byte_align()?;
        Ok(self.writer.into_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::{BitBuffer, BitSource};
    use pretty_assertions::assert_eq;

    #[test]
    fn write_then_read_groups() {
        let mut buf = BitBuffer::new();
        buf.append_bits(0b0100, 4).unwrap();
        buf.append_bits(0x1F, 6).unwrap();
        assert_eq!(buf.len(), 10);
        let bytes = buf.into_bytes().unwrap();
        assert_eq!(bytes, vec![0b0100_0111, 0b1100_0000]);

        let mut src = BitSource::new(&bytes);
        assert_eq!(src.read_bits(4).unwrap(), 0b0100);
        assert_eq!(src.read_bits(6).unwrap(), 0x1F);
        assert_eq!(src.byte_offset(), 1);
        assert_eq!(src.available(), 6);
        src.skip_to_byte_boundary();
        assert_eq!(src.available(), 0);
        assert!(src.read_bits(1).is_err());
    }
}
