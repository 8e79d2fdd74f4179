use alloc::boxed::Box;
use core::any::Any;

use ez_reflect::info::{EnumInfo, PrimitiveKind, Type};
use ez_reflect::registry::AssignFn;

use crate::binary::{BinaryReader, BinaryWriter};
use crate::processor::{Processor, ProcessorKind};
use crate::{ProcessorRegistry, SerializationError};

/// A fieldless enum, written as its discriminant in the encoding of its
/// integer representation.
///
/// `#[repr(u8)]` takes one byte, `#[repr(i32)]` a ZigZag varint, and so on.
/// Reading a discriminant that names no variant fails with
/// [`SerializationError::InvalidDiscriminant`].
#[derive(Debug)]
pub struct EnumProcessor {
    ty: Type,
    info: EnumInfo,
    assign: AssignFn,
}

impl EnumProcessor {
    pub fn new(ty: Type, info: EnumInfo, assign: AssignFn) -> Self {
        Self { ty, info, assign }
    }

    #[inline]
    pub const fn repr(&self) -> PrimitiveKind {
        self.info.repr()
    }

    fn mismatch(&self) -> SerializationError {
        SerializationError::TypeMismatch { expected: self.ty.path() }
    }
}

impl Processor for EnumProcessor {
    #[inline]
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Enum
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
        let discriminant = self.info.to_discriminant(value).ok_or_else(|| self.mismatch())?;
        match self.info.repr() {
            PrimitiveKind::I8 => writer.write_i8(discriminant as i8),
            PrimitiveKind::U8 => writer.write_u8(discriminant as u8),
            PrimitiveKind::I16 => writer.write_i16(discriminant as i16),
            PrimitiveKind::U16 => writer.write_u16(discriminant as u16),
            PrimitiveKind::I32 => writer.write_i32(discriminant as i32),
            PrimitiveKind::U32 => writer.write_u32(discriminant as u32),
            PrimitiveKind::U64 => writer.write_u64(discriminant as u64),
            _ => writer.write_i64(discriminant),
        }
        Ok(())
    }

    fn read(
        &self,
        reader: &mut BinaryReader<'_>,
        _: &ProcessorRegistry,
    ) -> Result<Box<dyn Any>, SerializationError> {
        let discriminant = match self.info.repr() {
            PrimitiveKind::I8 => i64::from(reader.read_i8()?),
            PrimitiveKind::U8 => i64::from(reader.read_u8()?),
            PrimitiveKind::I16 => i64::from(reader.read_i16()?),
            PrimitiveKind::U16 => i64::from(reader.read_u16()?),
            PrimitiveKind::I32 => i64::from(reader.read_i32()?),
            PrimitiveKind::U32 => i64::from(reader.read_u32()?),
            PrimitiveKind::U64 => reader.read_u64()? as i64,
            _ => reader.read_i64()?,
        };
        self.info
            .from_discriminant(discriminant)
            .ok_or(SerializationError::InvalidDiscriminant {
                type_path: self.ty.path(),
                discriminant,
            })
    }

    fn read_in_place(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
        target: &mut dyn Any,
    ) -> Result<(), SerializationError> {
        if !self.ty.is_type_of(target) {
            return Err(self.mismatch());
        }
        let value = self.read(reader, registry)?;
        (self.assign)(target, value).map_err(|_| self.mismatch())
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}
