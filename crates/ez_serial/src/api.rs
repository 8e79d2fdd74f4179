use alloc::vec::Vec;

use ez_reflect::registry::{GetTypeMeta, TypeRegistryArc};

use crate::binary::{BinaryReader, BinaryWriter};
use crate::{ProcessorRegistry, SerializationError};

// -----------------------------------------------------------------------------
// SerializationFormat

/// The wire encoding of a [`SerializationData`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializationFormat {
    /// The compact format of [`binary`](crate::binary).
    #[default]
    Binary,
}

// -----------------------------------------------------------------------------
// SerializationData

/// Encoded bytes and their format.
///
/// Owned by one caller at a time. Serializing into existing data reuses its
/// allocation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SerializationData {
    format: SerializationFormat,
    bytes: Vec<u8>,
}

impl SerializationData {
    #[inline]
    pub const fn new(format: SerializationFormat) -> Self {
        Self {
            format,
            bytes: Vec::new(),
        }
    }

    /// Wraps bytes produced elsewhere, in the binary format.
    #[inline]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            format: SerializationFormat::Binary,
            bytes,
        }
    }

    #[inline]
    pub const fn format(&self) -> SerializationFormat {
        self.format
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

// -----------------------------------------------------------------------------
// Serializer

/// The entry point: serializes values of registered types to bytes and back.
///
/// Types are registered in the type registry on first use, together with
/// the types they depend on. A decoded value must consume the whole input;
/// leftover bytes fail with [`SerializationError::TrailingBytes`].
///
/// # Examples
///
/// ```
/// use ez_reflect::derive::Reflect;
/// use ez_serial::Serializer;
///
/// #[derive(Reflect, Default, Debug, PartialEq)]
/// #[reflect(serializable, default)]
/// struct Player {
///     pub id: i32,
///     pub name: String,
///     pub health: f32,
///     pub scores: Vec<i32>,
/// }
///
/// let player = Player {
///     id: 100,
///     name: "TestPlayer".into(),
///     health: 75.5,
///     scores: vec![100, 200, 300],
/// };
///
/// let serializer = Serializer::default();
/// let bytes = serializer.serialize_to_binary(&player).unwrap();
/// assert_eq!(serializer.deserialize_from_binary::<Player>(&bytes).unwrap(), player);
/// ```
#[derive(Debug)]
pub struct Serializer {
    processors: ProcessorRegistry,
    initial_capacity: usize,
}

impl Serializer {
    pub fn new(types: TypeRegistryArc) -> Self {
        Self {
            processors: ProcessorRegistry::new(types),
            initial_capacity: BinaryWriter::DEFAULT_CAPACITY,
        }
    }

    /// Sets the storage size of writers created for empty data.
    ///
    /// Fails with [`SerializationError::InvalidCapacity`] for zero.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Result<Self, SerializationError> {
        if capacity == 0 {
            return Err(SerializationError::InvalidCapacity);
        }
        self.initial_capacity = capacity;
        Ok(self)
    }

    /// The processor cache, for lookups and custom processors.
    #[inline]
    pub fn processors(&self) -> &ProcessorRegistry {
        &self.processors
    }

    /// Encodes `value` into `data`, replacing its content.
    ///
    /// On failure `data` is left empty.
    pub fn serialize<T: GetTypeMeta>(&self, value: &T, data: &mut SerializationData) -> Result<(), SerializationError> {
        let storage = core::mem::take(&mut data.bytes);
        let processor = self.processors.typed::<T>()?;

        let mut writer = match data.format {
            SerializationFormat::Binary if storage.capacity() == 0 => BinaryWriter::new(self.initial_capacity)?,
            SerializationFormat::Binary => BinaryWriter::from_storage(storage),
        };
        processor.write(value, &mut writer, &self.processors)?;

        log::trace!("serialized `{}` into {} byte(s)", core::any::type_name::<T>(), writer.len());
        data.bytes = writer.into_vec();
        Ok(())
    }

    /// Decodes a new `T` from `data`.
    pub fn deserialize<T: GetTypeMeta>(&self, data: &SerializationData) -> Result<T, SerializationError> {
        let processor = self.processors.typed::<T>()?;
        let mut reader = match data.format {
            SerializationFormat::Binary => BinaryReader::from_slice(&data.bytes),
        };
        let value = processor.read(&mut reader, &self.processors)?;
        finish(&reader)?;
        Ok(value)
    }

    /// Decodes into an existing `T`. Composites keep the instance and assign
    /// the decoded members.
    ///
    /// On failure `target` may be partially updated.
    pub fn deserialize_into<T: GetTypeMeta>(
        &self,
        data: &SerializationData,
        target: &mut T,
    ) -> Result<(), SerializationError> {
        let processor = self.processors.typed::<T>()?;
        let mut reader = match data.format {
            SerializationFormat::Binary => BinaryReader::from_slice(&data.bytes),
        };
        processor.read_into(&mut reader, &self.processors, target)?;
        finish(&reader)
    }

    /// Encodes `value` into a new byte vector.
    pub fn serialize_to_binary<T: GetTypeMeta>(&self, value: &T) -> Result<Vec<u8>, SerializationError> {
        let mut data = SerializationData::new(SerializationFormat::Binary);
        self.serialize(value, &mut data)?;
        Ok(data.into_bytes())
    }

    /// Decodes a `T` from binary `bytes`.
    pub fn deserialize_from_binary<T: GetTypeMeta>(&self, bytes: &[u8]) -> Result<T, SerializationError> {
        let processor = self.processors.typed::<T>()?;
        let mut reader = BinaryReader::from_slice(bytes);
        let value = processor.read(&mut reader, &self.processors)?;
        finish(&reader)?;
        Ok(value)
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new(TypeRegistryArc::default())
    }
}

fn finish(reader: &BinaryReader<'_>) -> Result<(), SerializationError> {
    match reader.remaining() {
        0 => Ok(()),
        remaining => Err(SerializationError::TrailingBytes { remaining }),
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::{SerializationData, SerializationFormat, Serializer};
    use crate::SerializationError;

    #[test]
    fn data_storage_is_reused() {
        let serializer = Serializer::default();
        let mut data = SerializationData::from_bytes(vec![0; 1024]);

        serializer.serialize(&String::from("abc"), &mut data).unwrap();
        assert_eq!(data.bytes(), &[3, b'a', b'b', b'c']);
        assert_eq!(data.format(), SerializationFormat::Binary);

        let before = data.bytes().as_ptr();
        serializer.serialize(&7_i32, &mut data).unwrap();
        assert_eq!(data.bytes(), &[14]);
        assert_eq!(data.bytes().as_ptr(), before);
    }

    #[test]
    fn deserialize_into_replaces_value() {
        let serializer = Serializer::default();
        let mut data = SerializationData::default();
        serializer.serialize(&vec![1_u16, 2, 3], &mut data).unwrap();

        let mut target = vec![9_u16; 10];
        serializer.deserialize_into(&data, &mut target).unwrap();
        assert_eq!(target, [1, 2, 3]);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = Serializer::default().with_initial_capacity(0).unwrap_err();
        assert_eq!(err, SerializationError::InvalidCapacity);
    }
}
