use alloc::vec;
use alloc::vec::Vec;

use ez_reflect::info::Unmanaged;

use crate::SerializationError;
use crate::binary::BULK_COPY_THRESHOLD;
use crate::varint::{self, VarInt};

// -----------------------------------------------------------------------------
// BinaryWriter

/// A growable output buffer with position and length tracking.
///
/// The backing storage is always initialized, so [`buffer`] may expose bytes
/// past [`len`] left over from earlier writes. [`reset`] rewinds without
/// releasing the storage, which makes pooled writers cheap to reuse.
///
/// Not meant to be shared: one call stack owns a writer at a time.
///
/// # Examples
///
/// ```
/// use ez_serial::binary::BinaryWriter;
///
/// let mut writer = BinaryWriter::new(4).unwrap();
/// writer.write_i32(-1);
/// writer.write_str("hi");
/// assert_eq!(writer.to_vec(), [0x01, 0x02, b'h', b'i']);
///
/// writer.reset();
/// assert_eq!(writer.len(), 0);
/// assert!(writer.buffer().len() >= 4);
/// ```
///
/// [`buffer`]: BinaryWriter::buffer
/// [`len`]: BinaryWriter::len
/// [`reset`]: BinaryWriter::reset
#[derive(Clone)]
pub struct BinaryWriter {
    buf: Vec<u8>,
    pos: usize,
    len: usize,
}

impl BinaryWriter {
    /// Capacity used by [`Default`].
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Creates a writer with `initial_capacity` bytes of storage.
    ///
    /// Fails with [`SerializationError::InvalidCapacity`] for zero.
    pub fn new(initial_capacity: usize) -> Result<Self, SerializationError> {
        if initial_capacity == 0 {
            return Err(SerializationError::InvalidCapacity);
        }
        Ok(Self {
            buf: vec![0; initial_capacity],
            pos: 0,
            len: 0,
        })
    }

    /// Reuses the allocation of `storage`, discarding its contents.
    pub fn from_storage(mut storage: Vec<u8>) -> Self {
        let capacity = storage.capacity().max(Self::DEFAULT_CAPACITY);
        storage.clear();
        storage.resize(capacity, 0);
        Self {
            buf: storage,
            pos: 0,
            len: 0,
        }
    }

    /// Returns the write position.
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Moves the write position inside the written range, e.g. to patch a
    /// length prefix. Writing there overwrites earlier bytes.
    pub fn set_position(&mut self, position: usize) -> Result<(), SerializationError> {
        if position > self.len {
            return Err(SerializationError::InvalidPosition { position, len: self.len });
        }
        self.pos = position;
        Ok(())
    }

    /// Returns the number of bytes written.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current capacity of the backing storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the whole backing storage, which may be longer than [`len`](Self::len).
    #[inline]
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the written bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Copies the written bytes.
    #[inline]
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    /// Returns the written bytes, keeping the allocation.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.truncate(self.len);
        self.buf
    }

    /// Rewinds position and length to zero, keeping the storage.
    #[inline]
    pub fn reset(&mut self) {
        self.pos = 0;
        self.len = 0;
    }

    /// Advances past `additional` bytes and returns them for the caller to
    /// fill. Their previous content is unspecified.
    pub fn reserve(&mut self, additional: usize) -> &mut [u8] {
        let end = self.pos + additional;
        if end > self.buf.len() {
            let capacity = (self.buf.len() * 2).max(end);
            self.buf.resize(capacity, 0);
        }
        let start = self.pos;
        self.pos = end;
        self.len = self.len.max(end);
        &mut self.buf[start..end]
    }

    // Raw ---------------------------------------------------------------------

    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.reserve(1)[0] = value;
    }

    #[inline]
    pub fn write_i8(&mut self, value: i8) {
        self.write_u8(value as u8);
    }

    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    /// Writes `bytes` as they are, without a length prefix.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len()).copy_from_slice(bytes);
    }

    // Varints -----------------------------------------------------------------

    /// Writes a LEB128 varint.
    #[inline]
    pub fn write_var_u64(&mut self, value: u64) {
        let mut scratch = [0; varint::MAX_LEN];
        let used = varint::encode_u64(value, &mut scratch);
        self.write_raw(&scratch[..used]);
    }

    /// Writes a ZigZag varint.
    #[inline]
    pub fn write_var_i64(&mut self, value: i64) {
        self.write_var_u64(varint::zigzag_encode(value));
    }

    /// Writes a length or element count.
    #[inline]
    pub fn write_len(&mut self, len: usize) {
        self.write_var_u64(len as u64);
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        value.write_varint(self);
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        value.write_varint(self);
    }

    #[inline]
    pub fn write_u64(&mut self, value: u64) {
        value.write_varint(self);
    }

    #[inline]
    pub fn write_i16(&mut self, value: i16) {
        value.write_varint(self);
    }

    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        value.write_varint(self);
    }

    #[inline]
    pub fn write_i64(&mut self, value: i64) {
        value.write_varint(self);
    }

    // Fixed width -------------------------------------------------------------

    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.write_unmanaged(&value);
    }

    #[inline]
    pub fn write_f64(&mut self, value: f64) {
        self.write_unmanaged(&value);
    }

    /// Writes the fixed-size little-endian form of `value`.
    #[inline]
    pub fn write_unmanaged<T: Unmanaged>(&mut self, value: &T) {
        value.write_le(self.reserve(T::SIZE));
    }

    /// Writes the fixed-size forms of `values` back to back, without a count.
    ///
    /// Slices of at least [`BULK_COPY_THRESHOLD`] elements reserve their whole
    /// body once; shorter ones go through [`write_unmanaged`](Self::write_unmanaged).
    /// Both produce the same bytes.
    pub fn write_unmanaged_slice<T: Unmanaged>(&mut self, values: &[T]) {
        if values.len() < BULK_COPY_THRESHOLD || T::SIZE == 0 {
            values.iter().for_each(|value| self.write_unmanaged(value));
            return;
        }
        let body = self.reserve(values.len() * T::SIZE);
        for (value, chunk) in values.iter().zip(body.chunks_exact_mut(T::SIZE)) {
            value.write_le(chunk);
        }
    }

    // Length prefixed ---------------------------------------------------------

    /// Writes a varint count followed by the fixed-size elements.
    pub fn write_array<T: Unmanaged>(&mut self, values: &[T]) {
        self.write_len(values.len());
        self.write_unmanaged_slice(values);
    }

    /// Writes a varint length followed by the bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_len(bytes.len());
        self.write_raw(bytes);
    }

    /// Like [`write_bytes`](Self::write_bytes); `None` is written as empty.
    #[inline]
    pub fn write_opt_bytes(&mut self, bytes: Option<&[u8]>) {
        self.write_bytes(bytes.unwrap_or_default());
    }

    /// Writes the UTF-8 length as a varint followed by the bytes.
    #[inline]
    pub fn write_str(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    /// Like [`write_str`](Self::write_str); `None` is written as `""`.
    #[inline]
    pub fn write_opt_str(&mut self, value: Option<&str>) {
        self.write_str(value.unwrap_or_default());
    }
}

impl Default for BinaryWriter {
    fn default() -> Self {
        Self {
            buf: vec![0; Self::DEFAULT_CAPACITY],
            pos: 0,
            len: 0,
        }
    }
}

impl core::fmt::Debug for BinaryWriter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BinaryWriter")
            .field("position", &self.pos)
            .field("len", &self.len)
            .field("capacity", &self.buf.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::BinaryWriter;
    use crate::SerializationError;

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(BinaryWriter::new(0).unwrap_err(), SerializationError::InvalidCapacity);
        assert!(BinaryWriter::new(1).is_ok());
    }

    #[test]
    fn growth_keeps_written_bytes() {
        let mut writer = BinaryWriter::new(1).unwrap();
        for byte in 0..100_u8 {
            writer.write_u8(byte);
        }
        assert_eq!(writer.len(), 100);
        assert!(writer.capacity() >= 100);
        assert_eq!(writer.to_vec(), (0..100).collect::<Vec<u8>>());
    }

    #[test]
    fn reset_keeps_storage() {
        let mut writer = BinaryWriter::new(8).unwrap();
        writer.write_raw(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let capacity = writer.capacity();

        writer.reset();
        assert_eq!((writer.position(), writer.len()), (0, 0));
        assert_eq!(writer.capacity(), capacity);
        assert_eq!(&writer.buffer()[..3], &[1, 2, 3]);

        writer.write_u8(42);
        assert_eq!(writer.to_vec(), [42]);
    }

    #[test]
    fn patch_a_length_prefix() {
        let mut writer = BinaryWriter::new(8).unwrap();
        writer.write_u8(0);
        writer.write_raw(b"abc");
        writer.set_position(0).unwrap();
        writer.write_u8(3);
        assert_eq!(writer.to_vec(), [3, b'a', b'b', b'c']);
        assert_eq!(writer.position(), 1);
        assert_eq!(
            writer.set_position(5),
            Err(SerializationError::InvalidPosition { position: 5, len: 4 })
        );
    }

    #[test]
    fn null_and_empty_strings_share_bytes() {
        let mut a = BinaryWriter::default();
        let mut b = BinaryWriter::default();
        a.write_opt_str(None);
        b.write_str("");
        assert_eq!(a.to_vec(), [0]);
        assert_eq!(a.to_vec(), b.to_vec());

        a.reset();
        b.reset();
        a.write_opt_bytes(None);
        b.write_bytes(&[]);
        assert_eq!(a.to_vec(), b.to_vec());
    }

    #[test]
    fn bulk_and_scalar_paths_agree() {
        let ints = (0..10_000).map(|i| i * 7919 - 5_000_000).collect::<Vec<i32>>();
        let longs = ints.iter().map(|&i| i64::from(i) << 20).collect::<Vec<i64>>();

        let mut bulk = BinaryWriter::default();
        bulk.write_unmanaged_slice(&ints);
        bulk.write_unmanaged_slice(&longs);

        let mut scalar = BinaryWriter::default();
        ints.iter().for_each(|v| scalar.write_unmanaged(v));
        longs.iter().for_each(|v| scalar.write_unmanaged(v));

        assert_eq!(bulk.len(), 10_000 * 12);
        assert_eq!(bulk.as_slice(), scalar.as_slice());
    }

    #[test]
    fn into_vec_keeps_allocation() {
        let mut writer = BinaryWriter::new(64).unwrap();
        writer.write_str("abc");
        let bytes = writer.into_vec();
        assert_eq!(bytes, [3, b'a', b'b', b'c']);
        assert!(bytes.capacity() >= 64);

        let writer = BinaryWriter::from_storage(bytes);
        assert!(writer.is_empty());
        assert!(writer.capacity() >= 64);
    }
}
