use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use ez_reflect::info::PrimitiveKind;

use crate::binary::{BinaryReader, BinaryWriter};
use crate::processor::{ProcessorKind, ValueProcessor};
use crate::{ProcessorRegistry, SerializationError};

// -----------------------------------------------------------------------------
// Scalars

macro_rules! scalar_processor {
    ($($(#[$doc:meta])* $name:ident($ty:ty) => $kind:ident, $write:ident, $read:ident;)*) => {$(
        $(#[$doc])*
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;

        impl ValueProcessor for $name {
            type Value = $ty;

            #[inline]
            fn kind(&self) -> ProcessorKind {
                ProcessorKind::$kind
            }

            #[inline]
            fn write_value(&self, value: &$ty, writer: &mut BinaryWriter, _: &ProcessorRegistry) -> Result<(), SerializationError> {
                writer.$write(*value);
                Ok(())
            }

            #[inline]
            fn read_value(&self, reader: &mut BinaryReader<'_>, _: &ProcessorRegistry) -> Result<$ty, SerializationError> {
                reader.$read()
            }
        }
    )*};
}

scalar_processor! {
    /// One raw byte.
    Int8Processor(i8) => Int8, write_i8, read_i8;
    /// ZigZag varint.
    Int16Processor(i16) => Int16, write_i16, read_i16;
    /// ZigZag varint.
    Int32Processor(i32) => Int32, write_i32, read_i32;
    /// ZigZag varint.
    Int64Processor(i64) => Int64, write_i64, read_i64;
    /// One raw byte.
    UInt8Processor(u8) => UInt8, write_u8, read_u8;
    /// Varint.
    UInt16Processor(u16) => UInt16, write_u16, read_u16;
    /// Varint.
    UInt32Processor(u32) => UInt32, write_u32, read_u32;
    /// Varint.
    UInt64Processor(u64) => UInt64, write_u64, read_u64;
    /// Four bytes, little-endian.
    SingleProcessor(f32) => Single, write_f32, read_f32;
    /// Eight bytes, little-endian.
    DoubleProcessor(f64) => Double, write_f64, read_f64;
    /// `0x00` or `0x01`.
    BoolProcessor(bool) => Bool, write_bool, read_bool;
}

/// Length-prefixed UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringProcessor;

impl ValueProcessor for StringProcessor {
    type Value = String;

    #[inline]
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::String
    }

    #[inline]
    fn write_value(&self, value: &String, writer: &mut BinaryWriter, _: &ProcessorRegistry) -> Result<(), SerializationError> {
        writer.write_str(value);
        Ok(())
    }

    #[inline]
    fn read_value(&self, reader: &mut BinaryReader<'_>, _: &ProcessorRegistry) -> Result<String, SerializationError> {
        reader.read_string()
    }
}

// -----------------------------------------------------------------------------
// Arrays

/// A primitive that can be the element of a [`PrimitiveArrayProcessor`].
///
/// Numbers are written fixed-width and little-endian, through the bulk
/// paths of the cursors; `u8` bodies are copied as they are.
pub trait ArrayElement: Any + Send + Sync + Sized {
    const KIND: PrimitiveKind;

    fn write_elements(values: &[Self], writer: &mut BinaryWriter);

    fn read_elements(reader: &mut BinaryReader<'_>, count: usize) -> Result<Vec<Self>, SerializationError>;
}

macro_rules! impl_numeric_element {
    ($($ty:ty => $kind:ident),*) => {$(
        impl ArrayElement for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;

            #[inline]
            fn write_elements(values: &[Self], writer: &mut BinaryWriter) {
                writer.write_unmanaged_slice(values);
            }

            #[inline]
            fn read_elements(reader: &mut BinaryReader<'_>, count: usize) -> Result<Vec<Self>, SerializationError> {
                reader.read_unmanaged_vec(count)
            }
        }
    )*};
}

impl_numeric_element!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, u16 => U16, u32 => U32, u64 => U64, f32 => F32, f64 => F64);

impl ArrayElement for u8 {
    const KIND: PrimitiveKind = PrimitiveKind::U8;

    #[inline]
    fn write_elements(values: &[Self], writer: &mut BinaryWriter) {
        writer.write_raw(values);
    }

    #[inline]
    fn read_elements(reader: &mut BinaryReader<'_>, count: usize) -> Result<Vec<Self>, SerializationError> {
        reader.read_raw(count).map(<[u8]>::to_vec)
    }
}

impl ArrayElement for bool {
    const KIND: PrimitiveKind = PrimitiveKind::Bool;

    fn write_elements(values: &[Self], writer: &mut BinaryWriter) {
        values.iter().for_each(|&value| writer.write_bool(value));
    }

    fn read_elements(reader: &mut BinaryReader<'_>, count: usize) -> Result<Vec<Self>, SerializationError> {
        if count > reader.remaining() {
            return reader.read_raw(count).map(|_| Vec::new());
        }
        (0..count).map(|_| reader.read_bool()).collect()
    }
}

impl ArrayElement for String {
    const KIND: PrimitiveKind = PrimitiveKind::String;

    fn write_elements(values: &[Self], writer: &mut BinaryWriter) {
        values.iter().for_each(|value| writer.write_str(value));
    }

    fn read_elements(reader: &mut BinaryReader<'_>, count: usize) -> Result<Vec<Self>, SerializationError> {
        // Every string takes at least its length byte.
        let mut values = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            values.push(reader.read_string()?);
        }
        Ok(values)
    }
}

/// `Vec<T>` of a primitive: a varint count, then the elements.
///
/// `Vec<u8>` doubles as the byte-array processor.
pub struct PrimitiveArrayProcessor<T>(PhantomData<fn() -> T>);

impl<T> PrimitiveArrayProcessor<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for PrimitiveArrayProcessor<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for PrimitiveArrayProcessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimitiveArrayProcessor<{}>", core::any::type_name::<T>())
    }
}

impl<T: ArrayElement> ValueProcessor for PrimitiveArrayProcessor<T> {
    type Value = Vec<T>;

    #[inline]
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::PrimitiveArray(T::KIND)
    }

    fn write_value(&self, value: &Vec<T>, writer: &mut BinaryWriter, _: &ProcessorRegistry) -> Result<(), SerializationError> {
        writer.write_len(value.len());
        T::write_elements(value, writer);
        Ok(())
    }

    fn read_value(&self, reader: &mut BinaryReader<'_>, _: &ProcessorRegistry) -> Result<Vec<T>, SerializationError> {
        let count = reader.read_len()?;
        T::read_elements(reader, count)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::{PrimitiveArrayProcessor, StringProcessor, UInt8Processor};
    use crate::ProcessorRegistry;
    use crate::binary::{BinaryReader, BinaryWriter};
    use crate::processor::ValueProcessor;

    #[test]
    fn byte_arrays_are_copied_raw() {
        let registry = ProcessorRegistry::default();
        let mut writer = BinaryWriter::default();
        PrimitiveArrayProcessor::<u8>::new()
            .write_value(&vec![9, 8, 7], &mut writer, &registry)
            .unwrap();
        assert_eq!(writer.as_slice(), &[3, 9, 8, 7]);
    }

    #[test]
    fn string_arrays_keep_empty_elements() {
        let registry = ProcessorRegistry::default();
        let values = vec![String::new(), String::from("b"), String::new()];
        let processor = PrimitiveArrayProcessor::<String>::new();

        let mut writer = BinaryWriter::default();
        processor.write_value(&values, &mut writer, &registry).unwrap();
        assert_eq!(writer.as_slice(), &[3, 0, 1, b'b', 0]);

        let mut reader = BinaryReader::from_slice(writer.as_slice());
        assert_eq!(processor.read_value(&mut reader, &registry).unwrap(), values);
    }

    #[test]
    fn scalars_share_the_cursor_encoding() {
        let registry = ProcessorRegistry::default();
        let mut writer = BinaryWriter::default();
        UInt8Processor.write_value(&200, &mut writer, &registry).unwrap();
        StringProcessor.write_value(&String::from("é"), &mut writer, &registry).unwrap();
        assert_eq!(writer.as_slice(), &[200, 2, 0xC3, 0xA9]);

        let mut reader = BinaryReader::from_slice(writer.as_slice());
        assert_eq!(UInt8Processor.read_value(&mut reader, &registry), Ok(200));
        assert_eq!(StringProcessor.read_value(&mut reader, &registry).unwrap(), "é");
        assert_eq!(reader.remaining(), 0);
    }
}
