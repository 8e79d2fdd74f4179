use alloc::boxed::Box;
use core::any::Any;

use ez_reflect::info::{ListInfo, OptionInfo, Type};
use ez_reflect::registry::AssignFn;

use crate::binary::{BinaryReader, BinaryWriter};
use crate::processor::{LazyProcessor, Processor, ProcessorKind};
use crate::{ProcessorRegistry, SerializationError};

#[inline]
fn mismatch(ty: Type) -> SerializationError {
    SerializationError::TypeMismatch { expected: ty.path() }
}

// -----------------------------------------------------------------------------
// OptionProcessor

/// `Option<T>`: a presence byte, then the inner value if present.
///
/// This is how the object tier keeps `None` apart from `Some("")` and
/// `Some(vec![])`, which the raw cursors would collapse.
#[derive(Debug)]
pub struct OptionProcessor {
    ty: Type,
    info: OptionInfo,
    inner: LazyProcessor,
    assign: AssignFn,
}

impl OptionProcessor {
    pub fn new(ty: Type, info: OptionInfo, assign: AssignFn) -> Self {
        Self {
            ty,
            inner: LazyProcessor::new(info.inner()),
            info,
            assign,
        }
    }
}

impl Processor for OptionProcessor {
    #[inline]
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Option
    }

    #[inline]
    fn value_type(&self) -> Type {
        self.ty
    }

    fn write(
        &self,
        value: &dyn Any,
        writer: &mut BinaryWriter,
        registry: &ProcessorRegistry,
    ) -> Result<(), SerializationError> {
        match self.info.get(value).ok_or_else(|| mismatch(self.ty))? {
            None => {
                writer.write_bool(false);
                Ok(())
            }
            Some(inner) => {
                writer.write_bool(true);
                self.inner.get(registry)?.write(inner, writer, registry)
            }
        }
    }

    fn read(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
    ) -> Result<Box<dyn Any>, SerializationError> {
        if !reader.read_bool()? {
            return Ok(self.info.none());
        }
        let inner = self.inner.get(registry)?.read(reader, registry)?;
        self.info.some(inner).map_err(|_| mismatch(self.ty))
    }

    fn read_in_place(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
        target: &mut dyn Any,
    ) -> Result<(), SerializationError> {
        if !self.ty.is_type_of(target) {
            return Err(mismatch(self.ty));
        }
        let value = self.read(reader, registry)?;
        (self.assign)(target, value).map_err(|_| mismatch(self.ty))
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// -----------------------------------------------------------------------------
// ListProcessor

/// `Vec<T>` of any serializable `T`: a varint count, then each element
/// through the element's processor.
///
/// Reading in place clears the list and keeps its allocation.
#[derive(Debug)]
pub struct ListProcessor {
    ty: Type,
    info: ListInfo,
    element: LazyProcessor,
}

impl ListProcessor {
    pub fn new(ty: Type, info: ListInfo) -> Self {
        Self {
            ty,
            element: LazyProcessor::new(info.element()),
            info,
        }
    }
}

impl Processor for ListProcessor {
    #[inline]
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::List
    }

    #[inline]
    fn value_type(&self) -> Type {
        self.ty
    }

    fn write(
        &self,
        value: &dyn Any,
        writer: &mut BinaryWriter,
        registry: &ProcessorRegistry,
    ) -> Result<(), SerializationError> {
        let len = self.info.len(value).ok_or_else(|| mismatch(self.ty))?;
        writer.write_len(len);
        if len == 0 {
            return Ok(());
        }

        let element = self.element.get(registry)?;
        for index in 0..len {
            let item = self.info.get(value, index).ok_or_else(|| mismatch(self.ty))?;
            element.write(item, writer, registry)?;
        }
        Ok(())
    }

    fn read(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
    ) -> Result<Box<dyn Any>, SerializationError> {
        let mut list = self.info.with_capacity(0);
        self.read_in_place(reader, registry, &mut *list)?;
        Ok(list)
    }

    fn read_in_place(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
        target: &mut dyn Any,
    ) -> Result<(), SerializationError> {
        if !self.info.clear(target) {
            return Err(mismatch(self.ty));
        }
        let count = reader.read_len()?;
        if count == 0 {
            return Ok(());
        }

        let element = self.element.get(registry)?;
        let start = reader.position();
        for index in 0..count {
            let item = element.read(reader, registry)?;
            // An element that read nothing makes the count unbounded.
            if index == 0 && reader.position() == start {
                reader.check_empty_count(count)?;
            }
            self.info.push(target, item).map_err(|_| mismatch(self.ty))?;
        }
        Ok(())
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}
