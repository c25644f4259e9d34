//! Little-endian cursor over the instruction bytes.

use crate::DecodeError;

#[derive(Debug, Clone)]
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
    address: u64,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8], address: u64) -> Self {
        Self {
            bytes,
            position: 0,
            address,
        }
    }

    /// Bytes consumed so far.
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn skip(&mut self, count: usize) {
        self.position += count;
    }

    /// Everything consumed so far.
    pub(crate) fn consumed(&self) -> &'a [u8] {
        &self.bytes[..self.position.min(self.bytes.len())]
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self
            .bytes
            .get(self.position..self.position + N)
            .ok_or_else(|| self.truncated(N))?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.position += N;
        Ok(out)
    }

    fn truncated(&self, wanted: usize) -> DecodeError {
        DecodeError::truncated(self.address, self.position + wanted, self.bytes.len())
    }

    pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
        self.take::<1>().map(|[byte]| byte)
    }

    pub(crate) fn u16(&mut self) -> Result<u16, DecodeError> {
        self.take().map(u16::from_le_bytes)
    }

    pub(crate) fn u32(&mut self) -> Result<u32, DecodeError> {
        self.take().map(u32::from_le_bytes)
    }

    pub(crate) fn u64(&mut self) -> Result<u64, DecodeError> {
        self.take().map(u64::from_le_bytes)
    }

    /// Reads an unsigned little-endian value of `size` bytes (1, 2, 4 or 8).
    pub(crate) fn unsigned(&mut self, size: usize) -> Result<u64, DecodeError> {
        match size {
            1 => self.u8().map(u64::from),
            2 => self.u16().map(u64::from),
            4 => self.u32().map(u64::from),
            _ => self.u64(),
        }
    }

    /// Reads a sign-extended little-endian value of `size` bytes.
    pub(crate) fn signed(&mut self, size: usize) -> Result<i64, DecodeError> {
        match size {
            1 => self.u8().map(|v| i64::from(v as i8)),
            2 => self.u16().map(|v| i64::from(v as i16)),
            4 => self.u32().map(|v| i64::from(v as i32)),
            _ => self.u64().map(|v| v as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let mut reader = Reader::new(&[0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12], 0);
        assert_eq!(reader.u8().unwrap(), 1);
        assert_eq!(reader.u16().unwrap(), 0x1234);
        assert_eq!(reader.u32().unwrap(), 0x1234_5678);
        assert_eq!(reader.position(), 7);
    }

    #[test]
    fn test_signed_reads() {
        let mut reader = Reader::new(&[0xF0, 0xFE, 0xFF], 0);
        assert_eq!(reader.signed(1).unwrap(), -16);
        assert_eq!(reader.signed(2).unwrap(), -2);
    }

    #[test]
    fn test_truncation_reports_need() {
        let mut reader = Reader::new(&[0xB8, 0x01, 0x00], 0x400);
        reader.skip(1);
        assert_eq!(reader.u32().unwrap_err(), DecodeError::truncated(0x400, 5, 3));
        assert_eq!(reader.position(), 1);
    }
}
