//! LEB128 varints and ZigZag mapping.
//!
//! Unsigned values are written seven bits at a time, lowest group first; the
//! high bit of each byte says that more bytes follow. Zero is the single
//! byte `0x00`. Signed values are ZigZag mapped first so that small
//! negative numbers stay short.
//!
//! ```
//! use ez_serial::varint;
//!
//! let mut out = [0; varint::MAX_LEN];
//! assert_eq!(varint::encode_u64(300, &mut out), 2);
//! assert_eq!(out[..2], [0xAC, 0x02]);
//!
//! assert_eq!(varint::zigzag_encode(-1), 1);
//! assert_eq!(varint::zigzag_encode(1), 2);
//! assert_eq!(varint::zigzag_decode(3), -2);
//! ```

use crate::SerializationError;
use crate::binary::{BinaryReader, BinaryWriter};

/// The longest encoding of a 64-bit value.
pub const MAX_LEN: usize = 10;

/// Encodes `value` into `out`, returning the number of bytes used.
#[inline]
pub fn encode_u64(mut value: u64, out: &mut [u8; MAX_LEN]) -> usize {
    let mut used = 0;
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out[used] = byte;
        used += 1;
        if value == 0 {
            return used;
        }
    }
}

/// Maps signed to unsigned: `0, -1, 1, -2, ...` to `0, 1, 2, 3, ...`.
#[inline]
pub const fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
#[inline]
pub const fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Reads one unsigned varint.
///
/// Fails with [`EndOfStream`] when the input ends while a continuation bit
/// is set, and with [`MalformedVarint`] when the value does not fit in 64
/// bits. On failure the reader is back at the first byte of the varint.
///
/// [`EndOfStream`]: SerializationError::EndOfStream
/// [`MalformedVarint`]: SerializationError::MalformedVarint
pub fn read_u64(reader: &mut BinaryReader<'_>) -> Result<u64, SerializationError> {
    let start = reader.position();
    decode_u64(reader, start).inspect_err(|_| reader.rewind(start))
}

fn decode_u64(reader: &mut BinaryReader<'_>, start: usize) -> Result<u64, SerializationError> {
    let mut value = 0_u64;
    for index in 0..MAX_LEN {
        let byte = reader.read_u8()?;
        // The tenth byte only carries the top bit.
        if index == MAX_LEN - 1 && byte > 0x01 {
            return Err(SerializationError::MalformedVarint { position: start });
        }
        value |= u64::from(byte & 0x7F) << (7 * index);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(SerializationError::MalformedVarint { position: start })
}

// -----------------------------------------------------------------------------
// VarInt

/// An integer with a varint wire form.
///
/// Unsigned types are written as plain varints, signed types ZigZag mapped.
/// Reading checks that the decoded value fits the width.
pub trait VarInt: Sized + Copy {
    fn write_varint(self, writer: &mut BinaryWriter);

    fn read_varint(reader: &mut BinaryReader<'_>) -> Result<Self, SerializationError>;
}

macro_rules! impl_var_unsigned {
    ($($ty:ty),*) => {$(
        impl VarInt for $ty {
            #[inline]
            fn write_varint(self, writer: &mut BinaryWriter) {
                writer.write_var_u64(u64::from(self));
            }

            fn read_varint(reader: &mut BinaryReader<'_>) -> Result<Self, SerializationError> {
                let value = read_u64(reader)?;
                <$ty>::try_from(value).map_err(|_| SerializationError::VarintOverflow {
                    ty: stringify!($ty),
                    value: i128::from(value),
                })
            }
        }
    )*};
}

macro_rules! impl_var_signed {
    ($($ty:ty),*) => {$(
        impl VarInt for $ty {
            #[inline]
            fn write_varint(self, writer: &mut BinaryWriter) {
                writer.write_var_u64(zigzag_encode(i64::from(self)));
            }

            fn read_varint(reader: &mut BinaryReader<'_>) -> Result<Self, SerializationError> {
                let value = zigzag_decode(read_u64(reader)?);
                <$ty>::try_from(value).map_err(|_| SerializationError::VarintOverflow {
                    ty: stringify!($ty),
                    value: i128::from(value),
                })
            }
        }
    )*};
}

impl_var_unsigned!(u16, u32, u64);
impl_var_signed!(i16, i32, i64);

#[cfg(test)]
mod tests {
    use super::{MAX_LEN, VarInt, encode_u64, zigzag_decode, zigzag_encode};
    use crate::SerializationError;
    use crate::binary::{BinaryReader, BinaryWriter};

    fn round_trip<T: VarInt + PartialEq + core::fmt::Debug>(value: T) -> usize {
        let mut writer = BinaryWriter::default();
        value.write_varint(&mut writer);
        let mut reader = BinaryReader::from_slice(writer.as_slice());
        assert_eq!(T::read_varint(&mut reader).unwrap(), value);
        assert_eq!(reader.remaining(), 0);
        writer.len()
    }

    #[test]
    fn full_range_of_each_width() {
        for value in [0, 1, 127, 128, 16_383, 16_384, u16::MAX] {
            round_trip(value);
        }
        for value in [i16::MIN, -1, 0, 1, i16::MAX] {
            round_trip(value);
        }
        for value in [0, 42, -9999, i32::MIN, i32::MAX] {
            round_trip(value);
        }
        for value in [0, u32::MAX] {
            round_trip(value);
        }
        assert_eq!(round_trip(u64::MAX), MAX_LEN);
        assert_eq!(round_trip(i64::MIN), MAX_LEN);
        round_trip(i64::MAX);
    }

    #[test]
    fn small_magnitudes_are_short() {
        assert_eq!(round_trip(0_u64), 1);
        assert_eq!(round_trip(-64_i32), 1);
        assert_eq!(round_trip(63_i32), 1);
        assert_eq!(round_trip(64_i32), 2);
    }

    #[test]
    fn zigzag_is_bijective_at_the_edges() {
        for value in [i64::MIN, i64::MIN + 1, -1, 0, 1, i64::MAX] {
            assert_eq!(zigzag_decode(zigzag_encode(value)), value);
        }
        assert_eq!(zigzag_encode(i64::MIN), u64::MAX);
    }

    #[test]
    fn truncated_input_is_end_of_stream() {
        let mut out = [0; MAX_LEN];
        let used = encode_u64(1 << 40, &mut out);
        let mut reader = BinaryReader::from_slice(&out[..used - 1]);
        assert!(matches!(
            u64::read_varint(&mut reader),
            Err(SerializationError::EndOfStream { .. })
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn oversized_input_is_rejected() {
        let too_long = [0xFF; 11];
        let mut reader = BinaryReader::from_slice(&too_long);
        assert_eq!(
            u64::read_varint(&mut reader),
            Err(SerializationError::MalformedVarint { position: 0 })
        );

        let mut writer = BinaryWriter::default();
        writer.write_var_u64(u64::from(u32::MAX) + 1);
        let mut reader = BinaryReader::from_slice(writer.as_slice());
        assert!(matches!(
            u32::read_varint(&mut reader),
            Err(SerializationError::VarintOverflow { ty: "u32", .. })
        ));
    }
}
