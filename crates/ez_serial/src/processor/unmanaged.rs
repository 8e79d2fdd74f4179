use alloc::boxed::Box;
use core::any::Any;

use ez_reflect::info::{ListInfo, Type, UnmanagedInfo};
use ez_reflect::registry::AssignFn;

use crate::binary::{BinaryReader, BinaryWriter};
use crate::processor::{Processor, ProcessorKind};
use crate::{ProcessorRegistry, SerializationError};

// -----------------------------------------------------------------------------
// GenericPrimitiveProcessor

/// A plain-data type written as its fixed-size little-endian blob.
#[derive(Debug)]
pub struct GenericPrimitiveProcessor {
    ty: Type,
    info: UnmanagedInfo,
    assign: AssignFn,
}

impl GenericPrimitiveProcessor {
    pub fn new(ty: Type, info: UnmanagedInfo, assign: AssignFn) -> Self {
        Self { ty, info, assign }
    }

    /// Encoded size of one value.
    #[inline]
    pub const fn size(&self) -> usize {
        self.info.size()
    }
}

impl Processor for GenericPrimitiveProcessor {
    #[inline]
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::GenericPrimitive
    }

    #[inline]
    fn value_type(&self) -> Type {
        self.ty
    }

    fn write(
        &self,
        value: &dyn Any,
        writer: &mut BinaryWriter,
        _: &ProcessorRegistry,
    ) -> Result<(), SerializationError> {
        if !self.ty.is_type_of(value) {
            return Err(mismatch(self.ty));
        }
        self.info.write(value, writer.reserve(self.info.size()));
        Ok(())
    }

    fn read(
        &self,
        reader: &mut BinaryReader<'_>,
        _: &ProcessorRegistry,
    ) -> Result<Box<dyn Any>, SerializationError> {
        reader.read_raw(self.info.size()).map(|bytes| self.info.read(bytes))
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
// GenericPrimitiveArrayProcessor

/// `Vec<T>` of a plain-data `T`: a varint count, then the blobs back to back.
#[derive(Debug)]
pub struct GenericPrimitiveArrayProcessor {
    ty: Type,
    list: ListInfo,
    element: UnmanagedInfo,
}

impl GenericPrimitiveArrayProcessor {
    pub fn new(ty: Type, list: ListInfo, element: UnmanagedInfo) -> Self {
        Self { ty, list, element }
    }
}

impl Processor for GenericPrimitiveArrayProcessor {
    #[inline]
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::GenericPrimitiveArray
    }

    #[inline]
    fn value_type(&self) -> Type {
        self.ty
    }

    fn write(
        &self,
        value: &dyn Any,
        writer: &mut BinaryWriter,
        _: &ProcessorRegistry,
    ) -> Result<(), SerializationError> {
        let len = self.list.len(value).ok_or_else(|| mismatch(self.ty))?;
        writer.write_len(len);

        let size = self.element.size();
        let body = writer.reserve(len * size);
        for index in 0..len {
            let element = self.list.get(value, index).ok_or_else(|| mismatch(self.ty))?;
            self.element.write(element, &mut body[index * size..]);
        }
        Ok(())
    }

    fn read(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
    ) -> Result<Box<dyn Any>, SerializationError> {
        let mut list = self.list.with_capacity(0);
        self.read_in_place(reader, registry, &mut *list)?;
        Ok(list)
    }

    fn read_in_place(
        &self,
        reader: &mut BinaryReader<'_>,
        _: &ProcessorRegistry,
        target: &mut dyn Any,
    ) -> Result<(), SerializationError> {
        if !self.ty.is_type_of(target) {
            return Err(mismatch(self.ty));
        }
        let count = reader.read_len()?;
        let size = self.element.size();
        if size == 0 {
            reader.check_empty_count(count)?;
        }
        let body = reader.read_raw(count.checked_mul(size).unwrap_or(usize::MAX))?;

        self.list.clear(target);
        for index in 0..count {
            let element = self.element.read(&body[index * size..]);
            self.list.push(target, element).map_err(|_| mismatch(self.ty))?;
        }
        Ok(())
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[inline]
fn mismatch(ty: Type) -> SerializationError {
    SerializationError::TypeMismatch { expected: ty.path() }
}
