use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use ez_reflect::info::{PrimitiveKind, Type, TypeInfo};
use ez_reflect::registry::{GetTypeMeta, TypeMeta, TypeRegistry, TypeRegistryArc};
use ez_utils::ReadThroughCache;

use crate::binary::{BinaryReader, BinaryWriter};
use crate::SerializationError;
use crate::model::MemberModel;
use crate::processor::{ArrayElement, EnumProcessor, GenericPrimitiveArrayProcessor, GenericPrimitiveProcessor};
use crate::processor::{BoolProcessor, DoubleProcessor, SingleProcessor, StringProcessor};
use crate::processor::{GenericProcessor, ListProcessor, OptionProcessor, PrimitiveArrayProcessor};
use crate::processor::{Int8Processor, Int16Processor, Int32Processor, Int64Processor};
use crate::processor::{Processor, mismatch};
use crate::processor::{UInt8Processor, UInt16Processor, UInt32Processor, UInt64Processor};

// -----------------------------------------------------------------------------
// ProcessorRegistry

/// Resolves and caches one [`Processor`] per type.
///
/// Resolution, first match wins:
///
/// 1. processors added with [`register_processor`](Self::register_processor);
/// 2. the primitives: `i8` to `i64`, `u8` to `u64`, `f32`, `f64`, `bool`
///    and `String`;
/// 3. `Vec` of a primitive, with `Vec<u8>` as the byte array;
/// 4. fieldless enums;
/// 5. unmanaged value types and `Vec`s of them;
/// 6. `Option<T>` and `Vec<T>` of any serializable `T`;
/// 7. structs with a serialization configuration, own or inherited.
///
/// Anything else fails with [`SerializationError::UnsupportedType`].
///
/// Entries are built on first request and never evicted; repeated requests
/// return the same `Arc`. The type registry lock is only held while a
/// processor is built, never while one runs.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use ez_serial::ProcessorRegistry;
/// use ez_serial::processor::ProcessorKind;
///
/// let registry = ProcessorRegistry::default();
///
/// let first = registry.get_processor::<i32>().unwrap();
/// assert_eq!(first.kind(), ProcessorKind::Int32);
///
/// let second = registry.get_processor::<i32>().unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
pub struct ProcessorRegistry {
    types: TypeRegistryArc,
    cache: ReadThroughCache<TypeId, Arc<dyn Processor>>,
}

impl ProcessorRegistry {
    /// Creates an empty cache over `types`.
    pub fn new(types: TypeRegistryArc) -> Self {
        Self {
            types,
            cache: ReadThroughCache::new(),
        }
    }

    /// The type registry processors are resolved against.
    #[inline]
    pub fn types(&self) -> &TypeRegistryArc {
        &self.types
    }

    /// Number of cached processors.
    #[inline]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Uses `processor` for `T`, replacing any cached one.
    ///
    /// Custom processors take precedence over every built-in rule; register
    /// them before the first value of `T` is processed, since composites
    /// keep the processors of their members once resolved.
    ///
    /// Fails with [`SerializationError::TypeMismatch`], caching nothing,
    /// when `processor` handles a type other than `T`.
    pub fn register_processor<T: Any>(&self, processor: Arc<dyn Processor>) -> Result<(), SerializationError> {
        if processor.value_type().id() != TypeId::of::<T>() {
            return Err(SerializationError::TypeMismatch {
                expected: core::any::type_name::<T>(),
            });
        }
        log::debug!("registered custom processor for `{}`", core::any::type_name::<T>());
        self.cache.insert(TypeId::of::<T>(), processor);
        Ok(())
    }

    /// Returns the processor for `T`, registering `T` in the type registry
    /// first if needed.
    pub fn get_processor<T: GetTypeMeta>(&self) -> Result<Arc<dyn Processor>, SerializationError> {
        if let Some(processor) = self.cache.get(&TypeId::of::<T>()) {
            return Ok(processor);
        }
        self.types.ensure_registered::<T>();
        self.processor_for(Type::of::<T>())
    }

    /// Like [`get_processor`](Self::get_processor), with the static type
    /// restored.
    pub fn typed<T: GetTypeMeta>(&self) -> Result<TypedProcessor<T>, SerializationError> {
        self.get_processor::<T>().map(TypedProcessor::new)
    }

    /// Returns the processor for `ty`, which must already be registered.
    pub fn processor_for(&self, ty: Type) -> Result<Arc<dyn Processor>, SerializationError> {
        self.cache.get_or_try_insert_with(ty.id(), || {
            let types = self.types.read();
            let processor = resolve(&types, ty)?;
            log::debug!("built {} processor for `{}`", processor.kind(), ty.path());
            Ok(processor)
        })
    }
}

impl Default for ProcessorRegistry {
    /// An empty cache over a fresh [`TypeRegistry::new`].
    fn default() -> Self {
        Self::new(TypeRegistryArc::default())
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Resolution

fn resolve(types: &TypeRegistry, ty: Type) -> Result<Arc<dyn Processor>, SerializationError> {
    let meta = types
        .get(ty.id())
        .ok_or(SerializationError::NotRegistered { type_path: ty.path() })?;

    match meta.info() {
        TypeInfo::Primitive(kind) => Ok(primitive(*kind)),
        TypeInfo::List(list) => {
            let element = types
                .get(list.element().id())
                .ok_or(SerializationError::NotRegistered { type_path: list.element().path() })?;
            if let Some(kind) = element.info().as_primitive() {
                return Ok(primitive_array(kind));
            }
            if let Some(unmanaged) = element.unmanaged().filter(|_| element.info().as_enum().is_none()) {
                return Ok(Arc::new(GenericPrimitiveArrayProcessor::new(ty, list.clone(), unmanaged.clone())));
            }
            Ok(Arc::new(ListProcessor::new(ty, list.clone())))
        }
        TypeInfo::Enum(info) => Ok(Arc::new(EnumProcessor::new(ty, info.clone(), meta.assign_fn()))),
        TypeInfo::Option(info) => Ok(Arc::new(OptionProcessor::new(ty, info.clone(), meta.assign_fn()))),
        TypeInfo::Struct => match meta.unmanaged() {
            Some(unmanaged) => Ok(Arc::new(GenericPrimitiveProcessor::new(
                ty,
                unmanaged.clone(),
                meta.assign_fn(),
            ))),
            None => composite(types, meta),
        },
        _ => match meta.unmanaged() {
            Some(unmanaged) => Ok(Arc::new(GenericPrimitiveProcessor::new(
                ty,
                unmanaged.clone(),
                meta.assign_fn(),
            ))),
            None => Err(SerializationError::UnsupportedType { type_path: ty.path() }),
        },
    }
}

fn composite(types: &TypeRegistry, meta: &TypeMeta) -> Result<Arc<dyn Processor>, SerializationError> {
    let model = MemberModel::build(types, meta.ty())?;
    let constructor = meta.default_constructor().cloned();
    Ok(Arc::new(GenericProcessor::new(model, constructor)))
}

fn primitive(kind: PrimitiveKind) -> Arc<dyn Processor> {
    match kind {
        PrimitiveKind::Bool => Arc::new(BoolProcessor),
        PrimitiveKind::I8 => Arc::new(Int8Processor),
        PrimitiveKind::I16 => Arc::new(Int16Processor),
        PrimitiveKind::I32 => Arc::new(Int32Processor),
        PrimitiveKind::I64 => Arc::new(Int64Processor),
        PrimitiveKind::U8 => Arc::new(UInt8Processor),
        PrimitiveKind::U16 => Arc::new(UInt16Processor),
        PrimitiveKind::U32 => Arc::new(UInt32Processor),
        PrimitiveKind::U64 => Arc::new(UInt64Processor),
        PrimitiveKind::F32 => Arc::new(SingleProcessor),
        PrimitiveKind::F64 => Arc::new(DoubleProcessor),
        PrimitiveKind::String => Arc::new(StringProcessor),
    }
}

fn primitive_array(kind: PrimitiveKind) -> Arc<dyn Processor> {
    fn of<T: ArrayElement>() -> Arc<dyn Processor> {
        Arc::new(PrimitiveArrayProcessor::<T>::new())
    }

    match kind {
        PrimitiveKind::Bool => of::<bool>(),
        PrimitiveKind::I8 => of::<i8>(),
        PrimitiveKind::I16 => of::<i16>(),
        PrimitiveKind::I32 => of::<i32>(),
        PrimitiveKind::I64 => of::<i64>(),
        PrimitiveKind::U8 => of::<u8>(),
        PrimitiveKind::U16 => of::<u16>(),
        PrimitiveKind::U32 => of::<u32>(),
        PrimitiveKind::U64 => of::<u64>(),
        PrimitiveKind::F32 => of::<f32>(),
        PrimitiveKind::F64 => of::<f64>(),
        PrimitiveKind::String => of::<alloc::string::String>(),
    }
}

// -----------------------------------------------------------------------------
// TypedProcessor

/// A cached processor used at its static type.
pub struct TypedProcessor<T> {
    processor: Arc<dyn Processor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> TypedProcessor<T> {
    #[inline]
    fn new(processor: Arc<dyn Processor>) -> Self {
        Self {
            processor,
            _marker: PhantomData,
        }
    }

    /// The erased processor.
    #[inline]
    pub fn processor(&self) -> &Arc<dyn Processor> {
        &self.processor
    }

    #[inline]
    pub fn write(&self, value: &T, writer: &mut BinaryWriter, registry: &ProcessorRegistry) -> Result<(), SerializationError> {
        self.processor.write(value, writer, registry)
    }

    pub fn read(&self, reader: &mut BinaryReader<'_>, registry: &ProcessorRegistry) -> Result<T, SerializationError> {
        let value: Box<dyn Any> = self.processor.read(reader, registry)?;
        value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| mismatch::<T>())
    }

    /// Decodes into `target`, reusing its allocations where the processor
    /// supports it.
    #[inline]
    pub fn read_into(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
        target: &mut T,
    ) -> Result<(), SerializationError> {
        self.processor.read_in_place(reader, registry, target)
    }
}

impl<T> Clone for TypedProcessor<T> {
    fn clone(&self) -> Self {
        Self {
            processor: self.processor.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedProcessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedProcessor").field(&self.processor).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use ez_reflect::info::PrimitiveKind;

    use super::ProcessorRegistry;
    use crate::SerializationError;
    use crate::processor::{Int32Processor, Processor, ProcessorKind};

    #[test]
    fn builtin_kinds() {
        let registry = ProcessorRegistry::default();
        let kind = |p: Result<Arc<dyn Processor>, SerializationError>| p.unwrap().kind();

        assert_eq!(kind(registry.get_processor::<u64>()), ProcessorKind::UInt64);
        assert_eq!(kind(registry.get_processor::<String>()), ProcessorKind::String);
        assert_eq!(
            kind(registry.get_processor::<Vec<u8>>()),
            ProcessorKind::PrimitiveArray(PrimitiveKind::U8)
        );
        assert_eq!(kind(registry.get_processor::<Option<i32>>()), ProcessorKind::Option);
        assert_eq!(kind(registry.get_processor::<Vec<Vec<i32>>>()), ProcessorKind::List);
        assert_eq!(registry.cached(), 5);
    }

    #[test]
    fn custom_processors_must_match_their_type() {
        let registry = ProcessorRegistry::default();
        let err = registry.register_processor::<u32>(Arc::new(Int32Processor)).unwrap_err();
        assert_eq!(err, SerializationError::TypeMismatch { expected: "u32" });
        assert_eq!(registry.cached(), 0);

        registry.register_processor::<i32>(Arc::new(Int32Processor)).unwrap();
        assert_eq!(registry.get_processor::<u32>().unwrap().kind(), ProcessorKind::UInt32);
        assert_eq!(registry.get_processor::<i32>().unwrap().kind(), ProcessorKind::Int32);
    }

    #[test]
    fn identity_is_stable() {
        let registry = ProcessorRegistry::default();
        let first = registry.get_processor::<i32>().unwrap();
        let second = registry.get_processor::<i32>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
