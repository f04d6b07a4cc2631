use std::io::{ErrorKind, Read};

use crate::Error;

/// Length-checked big-endian reads on top of [`std::io::Read`].
///
/// Every value is assembled from its bytes in stream order, so the result doesn't depend on
/// the platform byte order. Each method takes the name of the field being read; running out
/// of bytes returns [`Error::TruncatedStream`] with that name.
pub trait ReadBytesBe: Read {
    /// Reads exactly `N` bytes.
    fn read_be_bytes<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], Error> {
        let mut buf = [0u8; N];
        match self.read_exact(&mut buf) {
            Ok(()) => Ok(buf),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(Error::TruncatedStream(field)),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn read_u8(&mut self, field: &'static str) -> Result<u8, Error> {
        let [b] = self.read_be_bytes::<1>(field)?;
        Ok(b)
    }

    fn read_be_u16(&mut self, field: &'static str) -> Result<u16, Error> {
        Ok(u16::from_be_bytes(self.read_be_bytes(field)?))
    }

    fn read_be_i16(&mut self, field: &'static str) -> Result<i16, Error> {
        Ok(i16::from_be_bytes(self.read_be_bytes(field)?))
    }

    /// Reads a 24-bit unsigned value widened to `u32`.
    fn read_be_u24(&mut self, field: &'static str) -> Result<u32, Error> {
        let [b0, b1, b2] = self.read_be_bytes::<3>(field)?;
        // the three bytes are the top of a 4-byte big-endian word with a zero low byte
        Ok(u32::from_be_bytes([b0, b1, b2, 0]) >> 8)
    }

    fn read_be_u32(&mut self, field: &'static str) -> Result<u32, Error> {
        Ok(u32::from_be_bytes(self.read_be_bytes(field)?))
    }

    fn read_be_u64(&mut self, field: &'static str) -> Result<u64, Error> {
        Ok(u64::from_be_bytes(self.read_be_bytes(field)?))
    }
}

impl<R: Read + ?Sized> ReadBytesBe for R {}
