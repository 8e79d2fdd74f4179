use alloc::string::String;
use alloc::vec::Vec;

use ez_reflect::info::Unmanaged;

use crate::SerializationError;
use crate::binary::{BULK_COPY_THRESHOLD, MAX_EMPTY_ELEMENTS};
use crate::varint::{self, VarInt};

// -----------------------------------------------------------------------------
// BinaryReader

/// A bounds-checked cursor over a borrowed byte slice.
///
/// Every read past the end fails with [`SerializationError::EndOfStream`]
/// and leaves the position where the failed read started, length prefix
/// included. Decoders built on top, such as processors, may stop midway.
///
/// # Examples
///
/// ```
/// use ez_serial::binary::BinaryReader;
/// use ez_serial::SerializationError;
///
/// let mut reader = BinaryReader::new();
/// reader.set_buffer(&[0x02, b'o', b'k', 0x05]);
/// assert_eq!(reader.read_string().unwrap(), "ok");
/// assert_eq!(reader.remaining(), 1);
///
/// assert!(matches!(
///     reader.read_string(),
///     Err(SerializationError::EndOfStream { position: 4, needed: 5, remaining: 0 })
/// ));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BinaryReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    /// Creates a reader over an empty buffer.
    #[inline]
    pub const fn new() -> Self {
        Self { buf: &[], pos: 0 }
    }

    #[inline]
    pub const fn from_slice(bytes: &'a [u8]) -> Self {
        Self { buf: bytes, pos: 0 }
    }

    /// Installs `bytes` and rewinds to the start.
    #[inline]
    pub fn set_buffer(&mut self, bytes: &'a [u8]) {
        self.buf = bytes;
        self.pos = 0;
    }

    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of unread bytes.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Returns the whole installed buffer, read or not.
    #[inline]
    pub const fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// Takes the next `len` bytes.
    pub fn read_raw(&mut self, len: usize) -> Result<&'a [u8], SerializationError> {
        if len > self.remaining() {
            return Err(self.end_of_stream(len));
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Checks the count of a sequence whose elements take no bytes.
    ///
    /// Counts above both [`MAX_EMPTY_ELEMENTS`] and the remaining length are
    /// rejected as truncated input.
    pub fn check_empty_count(&self, count: usize) -> Result<(), SerializationError> {
        if count > MAX_EMPTY_ELEMENTS.max(self.remaining()) {
            return Err(self.end_of_stream(count));
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn rewind(&mut self, position: usize) {
        debug_assert!(position <= self.pos);
        self.pos = position;
    }

    fn end_of_stream(&self, needed: usize) -> SerializationError {
        SerializationError::EndOfStream {
            position: self.pos,
            needed,
            remaining: self.remaining(),
        }
    }

    // Raw ---------------------------------------------------------------------

    pub fn read_u8(&mut self) -> Result<u8, SerializationError> {
        match self.buf.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(byte)
            }
            None => Err(self.end_of_stream(1)),
        }
    }

    #[inline]
    pub fn read_i8(&mut self) -> Result<i8, SerializationError> {
        self.read_u8().map(|byte| byte as i8)
    }

    /// Reads `0x00` or `0x01`; other bytes are an error.
    pub fn read_bool(&mut self) -> Result<bool, SerializationError> {
        let position = self.pos;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(SerializationError::InvalidBool { position, value }),
        }
    }

    // Varints -----------------------------------------------------------------

    #[inline]
    pub fn read_var_u64(&mut self) -> Result<u64, SerializationError> {
        varint::read_u64(self)
    }

    #[inline]
    pub fn read_var_i64(&mut self) -> Result<i64, SerializationError> {
        varint::read_u64(self).map(varint::zigzag_decode)
    }

    /// Reads a length or element count.
    pub fn read_len(&mut self) -> Result<usize, SerializationError> {
        let position = self.pos;
        let len = self.read_var_u64()?;
        usize::try_from(len).map_err(|_| SerializationError::MalformedVarint { position })
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, SerializationError> {
        u16::read_varint(self)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, SerializationError> {
        u32::read_varint(self)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, SerializationError> {
        u64::read_varint(self)
    }

    #[inline]
    pub fn read_i16(&mut self) -> Result<i16, SerializationError> {
        i16::read_varint(self)
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32, SerializationError> {
        i32::read_varint(self)
    }

    #[inline]
    pub fn read_i64(&mut self) -> Result<i64, SerializationError> {
        i64::read_varint(self)
    }

    // Fixed width -------------------------------------------------------------

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32, SerializationError> {
        self.read_unmanaged()
    }

    #[inline]
    pub fn read_f64(&mut self) -> Result<f64, SerializationError> {
        self.read_unmanaged()
    }

    #[inline]
    pub fn read_unmanaged<T: Unmanaged>(&mut self) -> Result<T, SerializationError> {
        self.read_raw(T::SIZE).map(T::read_le)
    }

    /// Reads `count` fixed-size elements written back to back.
    ///
    /// The body is bounds checked as a whole before anything is allocated.
    pub fn read_unmanaged_vec<T: Unmanaged>(&mut self, count: usize) -> Result<Vec<T>, SerializationError> {
        if T::SIZE == 0 {
            self.check_empty_count(count)?;
            return Ok(core::iter::repeat_n(T::read_le(&[]), count).collect());
        }
        let needed = count.checked_mul(T::SIZE).unwrap_or(usize::MAX);
        if needed > self.remaining() {
            return Err(self.end_of_stream(needed));
        }
        if count < BULK_COPY_THRESHOLD {
            return (0..count).map(|_| self.read_unmanaged()).collect();
        }
        let body = self.read_raw(needed)?;
        Ok(body.chunks_exact(T::SIZE).map(T::read_le).collect())
    }

    // Length prefixed ---------------------------------------------------------

    /// Reads a varint count followed by the fixed-size elements.
    pub fn read_array<T: Unmanaged>(&mut self) -> Result<Vec<T>, SerializationError> {
        let start = self.pos;
        let count = self.read_len()?;
        self.read_unmanaged_vec(count).inspect_err(|_| self.pos = start)
    }

    /// Reads a varint length followed by the bytes, borrowed from the buffer.
    pub fn read_bytes(&mut self) -> Result<&'a [u8], SerializationError> {
        let start = self.pos;
        let len = self.read_len()?;
        self.read_raw(len).inspect_err(|_| self.pos = start)
    }

    /// Reads a length-prefixed UTF-8 string. Always yields a string, empty
    /// for zero length.
    pub fn read_string(&mut self) -> Result<String, SerializationError> {
        let position = self.pos;
        let bytes = self.read_bytes()?;
        match core::str::from_utf8(bytes) {
            Ok(value) => Ok(String::from(value)),
            Err(_) => {
                self.pos = position;
                Err(SerializationError::InvalidUtf8 { position })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::BinaryReader;
    use crate::SerializationError;
    use crate::binary::{BinaryWriter, MAX_EMPTY_ELEMENTS};

    #[test]
    fn set_buffer_rewinds() {
        let first = [1_u8, 2];
        let second = [3_u8];
        let mut reader = BinaryReader::from_slice(&first);
        assert_eq!(reader.read_u8(), Ok(1));

        reader.set_buffer(&second);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.buffer(), &[3]);
        assert_eq!(reader.read_u8(), Ok(3));
        assert!(matches!(reader.read_u8(), Err(SerializationError::EndOfStream { position: 1, .. })));
    }

    #[test]
    fn buffer_is_the_whole_input() {
        let bytes = [1_u8, 2, 3];
        let mut reader = BinaryReader::from_slice(&bytes);
        reader.read_raw(2).unwrap();
        assert_eq!(reader.buffer(), &bytes);
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    #[allow(clippy::approx_constant, reason = "arbitrary float sample")]
    fn primitives_round_trip() {
        let mut writer = BinaryWriter::default();
        writer.write_i8(i8::MIN);
        writer.write_bool(true);
        writer.write_u64(18_446_744_073_709_551_615);
        writer.write_f32(3.14159);
        writer.write_f64(123.456_789_012_34);
        writer.write_i16(i16::MIN);

        let mut reader = BinaryReader::from_slice(writer.as_slice());
        assert_eq!(reader.read_i8(), Ok(i8::MIN));
        assert_eq!(reader.read_bool(), Ok(true));
        assert_eq!(reader.read_u64(), Ok(u64::MAX));
        assert!((reader.read_f32().unwrap() - 3.14159).abs() < 1e-5);
        assert!((reader.read_f64().unwrap() - 123.456_789_012_34).abs() < 1e-8);
        assert_eq!(reader.read_i16(), Ok(i16::MIN));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn empty_containers_are_never_null() {
        let mut writer = BinaryWriter::default();
        writer.write_opt_str(None);
        writer.write_opt_bytes(None);
        writer.write_array::<i32>(&[]);

        let mut reader = BinaryReader::from_slice(writer.as_slice());
        assert_eq!(reader.read_string().unwrap(), "");
        assert_eq!(reader.read_bytes().unwrap(), &[] as &[u8]);
        assert_eq!(reader.read_array::<i32>().unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn bad_bytes_are_rejected() {
        let mut reader = BinaryReader::from_slice(&[2]);
        assert_eq!(reader.read_bool(), Err(SerializationError::InvalidBool { position: 0, value: 2 }));

        let mut reader = BinaryReader::from_slice(&[2, 0xC3, 0x28]);
        assert_eq!(reader.read_string(), Err(SerializationError::InvalidUtf8 { position: 0 }));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn oversized_counts_fail_before_allocating() {
        let mut writer = BinaryWriter::default();
        writer.write_len(usize::MAX / 2);
        writer.write_raw(&[0; 16]);

        let mut reader = BinaryReader::from_slice(writer.as_slice());
        assert!(matches!(
            reader.read_array::<u64>(),
            Err(SerializationError::EndOfStream { needed: usize::MAX, .. })
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn empty_element_counts_are_bounded() {
        let reader = BinaryReader::from_slice(&[]);
        assert_eq!(reader.check_empty_count(2), Ok(()));
        assert_eq!(reader.check_empty_count(MAX_EMPTY_ELEMENTS), Ok(()));
        assert_eq!(
            reader.check_empty_count(MAX_EMPTY_ELEMENTS + 1),
            Err(SerializationError::EndOfStream {
                position: 0,
                needed: MAX_EMPTY_ELEMENTS + 1,
                remaining: 0,
            })
        );
    }

    #[test]
    fn large_arrays_read_back() {
        let longs = (0..10_000_i64).map(|i| i * i - 77).collect::<Vec<_>>();
        let mut writer = BinaryWriter::default();
        writer.write_array(&longs);
        writer.write_array(&longs[..3]);

        let mut reader = BinaryReader::from_slice(writer.as_slice());
        assert_eq!(reader.read_array::<i64>().unwrap(), longs);
        assert_eq!(reader.read_array::<i64>().unwrap(), &longs[..3]);
    }
}
