//! Provide the per-type strategies that read and write values.
//!
//! ## Menu
//!
//! - [`Processor`]: the erased strategy stored in the
//!   [`ProcessorRegistry`](crate::ProcessorRegistry).
//! - [`ValueProcessor`]: the typed form; every `ValueProcessor` is a
//!   `Processor`.
//! - Primitives: [`Int8Processor`] ... [`DoubleProcessor`],
//!   [`BoolProcessor`], [`StringProcessor`] and [`PrimitiveArrayProcessor`].
//! - [`EnumProcessor`]: the underlying integer of a fieldless enum.
//! - [`GenericPrimitiveProcessor`], [`GenericPrimitiveArrayProcessor`]:
//!   fixed-size blobs of unmanaged types.
//! - [`OptionProcessor`], [`ListProcessor`]: `Option<T>` and `Vec<T>` of
//!   any serializable `T`.
//! - [`GenericProcessor`]: composite types, driven by a
//!   [`MemberModel`](crate::MemberModel).
//!
//! Processors hold no mutable state besides lazily resolved nested
//! processors, so one instance serves concurrent calls on independent
//! buffers.

// -----------------------------------------------------------------------------
// Modules

mod composite;
mod container;
mod enums;
mod primitive;
mod unmanaged;

// -----------------------------------------------------------------------------
// Exports

pub use composite::GenericProcessor;
pub use container::{ListProcessor, OptionProcessor};
pub use enums::EnumProcessor;
pub use primitive::{ArrayElement, PrimitiveArrayProcessor};
pub use primitive::{BoolProcessor, DoubleProcessor, SingleProcessor, StringProcessor};
pub use primitive::{Int8Processor, Int16Processor, Int32Processor, Int64Processor};
pub use primitive::{UInt8Processor, UInt16Processor, UInt32Processor, UInt64Processor};
pub use unmanaged::{GenericPrimitiveArrayProcessor, GenericPrimitiveProcessor};

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::{Any, type_name};
use core::fmt;
use std::sync::OnceLock;

use ez_reflect::info::{PrimitiveKind, Type};

use crate::binary::{BinaryReader, BinaryWriter};
use crate::{ProcessorRegistry, SerializationError};

// -----------------------------------------------------------------------------
// ProcessorKind

/// Which strategy a processor implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessorKind {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Single,
    Double,
    Bool,
    String,
    /// `Vec` of the given primitive.
    PrimitiveArray(PrimitiveKind),
    Enum,
    GenericPrimitive,
    GenericPrimitiveArray,
    Option,
    List,
    Composite,
    /// Registered by the user.
    Custom,
}

impl fmt::Display for ProcessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimitiveArray(kind) => write!(f, "PrimitiveArray<{kind}>"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

// -----------------------------------------------------------------------------
// Processor

/// Reads and writes values of exactly one type.
///
/// `value` and `target` must be of [`value_type`](Processor::value_type);
/// anything else fails with [`SerializationError::TypeMismatch`]. Nested
/// values are delegated to the processors found in `registry`.
pub trait Processor: Send + Sync + 'static {
    fn kind(&self) -> ProcessorKind;

    fn value_type(&self) -> Type;

    fn write(
        &self,
        value: &dyn Any,
        writer: &mut BinaryWriter,
        registry: &ProcessorRegistry,
    ) -> Result<(), SerializationError>;

    /// Decodes a new value.
    fn read(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
    ) -> Result<Box<dyn Any>, SerializationError>;

    /// Decodes into an existing value. Composites keep the instance and
    /// only assign their members.
    fn read_in_place(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
        target: &mut dyn Any,
    ) -> Result<(), SerializationError>;

    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("kind", &self.kind())
            .field("value_type", &self.value_type())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ValueProcessor

/// A [`Processor`] written against its concrete value type.
///
/// # Examples
///
/// A custom processor storing a `Celsius` as tenths of a degree:
///
/// ```
/// use ez_serial::binary::{BinaryReader, BinaryWriter};
/// use ez_serial::processor::{ProcessorKind, ValueProcessor};
/// use ez_serial::{ProcessorRegistry, SerializationError, Serializer};
/// use ez_reflect::derive::Reflect;
/// use std::sync::Arc;
///
/// #[derive(Reflect, Debug, PartialEq)]
/// struct Celsius(f32);
///
/// struct Tenths;
///
/// impl ValueProcessor for Tenths {
///     type Value = Celsius;
///
///     fn kind(&self) -> ProcessorKind {
///         ProcessorKind::Custom
///     }
///
///     fn write_value(&self, value: &Celsius, writer: &mut BinaryWriter, _: &ProcessorRegistry) -> Result<(), SerializationError> {
///         writer.write_i32((value.0 * 10.0).round() as i32);
///         Ok(())
///     }
///
///     fn read_value(&self, reader: &mut BinaryReader<'_>, _: &ProcessorRegistry) -> Result<Celsius, SerializationError> {
///         Ok(Celsius(reader.read_i32()? as f32 / 10.0))
///     }
/// }
///
/// let serializer = Serializer::default();
/// serializer.processors().register_processor::<Celsius>(Arc::new(Tenths)).unwrap();
///
/// let bytes = serializer.serialize_to_binary(&Celsius(21.5)).unwrap();
/// assert_eq!(bytes, [0xAE, 0x03]);
/// assert_eq!(serializer.deserialize_from_binary::<Celsius>(&bytes).unwrap(), Celsius(21.5));
/// ```
pub trait ValueProcessor: Send + Sync + 'static {
    type Value: Any;

    fn kind(&self) -> ProcessorKind;

    fn write_value(
        &self,
        value: &Self::Value,
        writer: &mut BinaryWriter,
        registry: &ProcessorRegistry,
    ) -> Result<(), SerializationError>;

    fn read_value(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
    ) -> Result<Self::Value, SerializationError>;

    fn read_value_into(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
        target: &mut Self::Value,
    ) -> Result<(), SerializationError> {
        *target = self.read_value(reader, registry)?;
        Ok(())
    }
}

#[inline]
pub(crate) fn mismatch<T: ?Sized>() -> SerializationError {
    SerializationError::TypeMismatch { expected: type_name::<T>() }
}

impl<P: ValueProcessor> Processor for P {
    #[inline]
    fn kind(&self) -> ProcessorKind {
        ValueProcessor::kind(self)
    }

    #[inline]
    fn value_type(&self) -> Type {
        Type::of::<P::Value>()
    }

    fn write(
        &self,
        value: &dyn Any,
        writer: &mut BinaryWriter,
        registry: &ProcessorRegistry,
    ) -> Result<(), SerializationError> {
        let value = value.downcast_ref::<P::Value>().ok_or_else(mismatch::<P::Value>)?;
        self.write_value(value, writer, registry)
    }

    fn read(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
    ) -> Result<Box<dyn Any>, SerializationError> {
        self.read_value(reader, registry).map(|value| Box::new(value) as Box<dyn Any>)
    }

    fn read_in_place(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
        target: &mut dyn Any,
    ) -> Result<(), SerializationError> {
        let target = target.downcast_mut::<P::Value>().ok_or_else(mismatch::<P::Value>)?;
        self.read_value_into(reader, registry, target)
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// -----------------------------------------------------------------------------
// LazyProcessor

/// A nested processor, looked up on first use and kept.
///
/// Resolving late lets recursive types (`struct Node { children: Vec<Node> }`)
/// build their processors without recursing forever.
pub(crate) struct LazyProcessor {
    ty: Type,
    cell: OnceLock<Arc<dyn Processor>>,
}

impl LazyProcessor {
    #[inline]
    pub(crate) const fn new(ty: Type) -> Self {
        Self {
            ty,
            cell: OnceLock::new(),
        }
    }

    pub(crate) fn get(&self, registry: &ProcessorRegistry) -> Result<&Arc<dyn Processor>, SerializationError> {
        if let Some(processor) = self.cell.get() {
            return Ok(processor);
        }
        let processor = registry.processor_for(self.ty)?;
        Ok(self.cell.get_or_init(|| processor))
    }
}

impl fmt::Debug for LazyProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyProcessor")
            .field("ty", &self.ty)
            .field("resolved", &self.cell.get().is_some())
            .finish()
    }
}
