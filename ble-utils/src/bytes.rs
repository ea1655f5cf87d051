//! Byte-level encoding and decoding.
//!
//! Attribute values produced for the host (service and characteristic declarations, CCC values)
//! and advertising payloads are written through [`ToBytes`] into a caller-provided buffer wrapped
//! in a [`ByteWriter`]. Structured values coming back, such as a declaration read by a host, are
//! parsed with [`FromBytes`] from a [`ByteReader`].
//!
//! Nothing in here allocates. Running out of buffer, in either direction, is `Error::Eof`.
//!
//! [`ToBytes`]: trait.ToBytes.html
//! [`FromBytes`]: trait.FromBytes.html
//! [`ByteWriter`]: struct.ByteWriter.html
//! [`ByteReader`]: struct.ByteReader.html

use crate::Error;
use core::mem;

/// Cursor writing into a mutable byte slice.
///
/// Every `write_*` method either writes all of its input or fails with `Error::Eof` without
/// touching the buffer.
pub struct ByteWriter<'a>(&'a mut [u8]);

impl<'a> ByteWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        ByteWriter(buf)
    }

    /// Reserves the next byte and returns it, advancing past it.
    ///
    /// Used for length prefixes that are only known once the rest has been written.
    pub fn split_next_mut(&mut self) -> Option<&'a mut u8> {
        let buf = mem::replace(&mut self.0, &mut []);
        let (first, rest) = buf.split_first_mut()?;
        self.0 = rest;
        Some(first)
    }

    /// Number of bytes that still fit.
    pub fn space_left(&self) -> usize {
        self.0.len()
    }

    pub fn write_slice(&mut self, data: &[u8]) -> Result<(), Error> {
        if data.len() > self.space_left() {
            return Err(Error::Eof);
        }
        let buf = mem::replace(&mut self.0, &mut []);
        let (dest, rest) = buf.split_at_mut(data.len());
        dest.copy_from_slice(data);
        self.0 = rest;
        Ok(())
    }

    pub fn write_u8(&mut self, byte: u8) -> Result<(), Error> {
        self.write_slice(&[byte])
    }

    /// Writes `value` in little-endian byte order.
    pub fn write_u16_le(&mut self, value: u16) -> Result<(), Error> {
        self.write_slice(&value.to_le_bytes())
    }
}

/// Cursor reading from a byte slice.
///
/// Failed reads leave the cursor where it was.
pub struct ByteReader<'a>(&'a [u8]);

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        ByteReader(bytes)
    }

    /// Number of bytes not consumed yet.
    pub fn bytes_left(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes and returns the next `len` bytes.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if len > self.bytes_left() {
            return Err(Error::Eof);
        }
        let (head, rest) = self.0.split_at(len);
        self.0 = rest;
        Ok(head)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut array = [0; N];
        array.copy_from_slice(self.read_slice(N)?);
        Ok(array)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> Result<u16, Error> {
        self.read_array().map(u16::from_le_bytes)
    }
}

/// Types with a wire representation.
pub trait ToBytes {
    /// Appends the encoded form of `self` to `writer`.
    ///
    /// On error, part of `self` may already have been written.
    fn to_bytes(&self, writer: &mut ByteWriter<'_>) -> Result<(), Error>;
}

/// Types that can be parsed from their wire representation.
pub trait FromBytes<'a>: Sized {
    /// Parses a value from the front of `bytes`, consuming what was read.
    fn from_bytes(bytes: &mut ByteReader<'a>) -> Result<Self, Error>;
}

impl<T: ToBytes> ToBytes for [T] {
    fn to_bytes(&self, writer: &mut ByteWriter<'_>) -> Result<(), Error> {
        self.iter().try_for_each(|item| item.to_bytes(writer))
    }
}

/// Encodes `value` into `buf` and returns the encoded bytes.
pub fn encode<'b, T: ToBytes + ?Sized>(value: &T, buf: &'b mut [u8]) -> Result<&'b [u8], Error> {
    let total = buf.len();
    let mut writer = ByteWriter::new(&mut *buf);
    value.to_bytes(&mut writer)?;
    let used = total - writer.space_left();
    let buf: &'b [u8] = buf;
    Ok(&buf[..used])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Le16(u16);

    impl ToBytes for Le16 {
        fn to_bytes(&self, writer: &mut ByteWriter<'_>) -> Result<(), Error> {
            writer.write_u16_le(self.0)
        }
    }

    #[test]
    fn writer_reports_eof_without_writing() {
        let mut buf = [0xFF; 3];
        let mut writer = ByteWriter::new(&mut buf);
        writer.write_u16_le(0x1234).unwrap();
        assert_eq!(writer.write_u16_le(0xABCD), Err(Error::Eof));
        assert_eq!(writer.space_left(), 1);
        assert_eq!(buf, [0x34, 0x12, 0xFF]);
    }

    #[test]
    fn length_prefix() {
        let mut buf = [0; 4];
        let mut writer = ByteWriter::new(&mut buf);
        let len = writer.split_next_mut().unwrap();
        writer.write_slice(&[7, 8]).unwrap();
        *len = 2;
        assert_eq!(buf, [2, 7, 8, 0]);

        let mut empty = ByteWriter::new(&mut []);
        assert!(empty.split_next_mut().is_none());
    }

    #[test]
    fn reader() {
        let mut reader = ByteReader::new(&[0x01, 0x02, 0x03]);
        assert_eq!(reader.read_u16_le(), Ok(0x0201));
        assert_eq!(reader.read_u16_le(), Err(Error::Eof));
        assert_eq!(reader.bytes_left(), 1);
        assert_eq!(reader.read_u8(), Ok(0x03));
        assert!(reader.is_empty());
    }

    #[test]
    fn encode_returns_written_prefix() {
        let mut buf = [0; 8];
        let bytes = encode(&[Le16(1), Le16(2)][..], &mut buf).unwrap();
        assert_eq!(bytes, &[1, 0, 2, 0]);

        let mut short = [0; 3];
        assert_eq!(encode(&[Le16(1), Le16(2)][..], &mut short), Err(Error::Eof));
    }
}
