use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use ez_reflect::info::Type;
use ez_reflect::member::ConstructorDescriptor;

use crate::binary::{BinaryReader, BinaryWriter};
use crate::model::{MemberModel, ModelMember};
use crate::processor::{LazyProcessor, Processor, ProcessorKind};
use crate::{ProcessorRegistry, SerializationError};

/// A composite type, written as its [`MemberModel`] members back to back.
///
/// There is no framing: no member names, counts or tags. The layout is
/// fixed by the model, so both sides must agree on the type definition.
/// Member processors are resolved on first use and kept.
#[derive(Debug)]
pub struct GenericProcessor {
    model: MemberModel,
    processors: Box<[LazyProcessor]>,
    constructor: Option<Arc<ConstructorDescriptor>>,
}

impl GenericProcessor {
    /// `constructor` must take no arguments; it is used by [`Processor::read`].
    pub fn new(model: MemberModel, constructor: Option<Arc<ConstructorDescriptor>>) -> Self {
        let processors = model
            .members()
            .iter()
            .map(|member| LazyProcessor::new(member.descriptor().value_type()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            model,
            processors,
            constructor,
        }
    }

    #[inline]
    pub fn model(&self) -> &MemberModel {
        &self.model
    }

    fn mismatch(&self) -> SerializationError {
        SerializationError::TypeMismatch { expected: self.model.ty().path() }
    }

    fn read_member(
        &self,
        member: &ModelMember,
        processor: &LazyProcessor,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
        target: &mut dyn Any,
    ) -> Result<(), SerializationError> {
        let owner = member
            .bases()
            .iter()
            .try_fold(target, |value, base| base.project_mut(value))
            .ok_or_else(|| self.mismatch())?;
        let descriptor = member.descriptor();
        let processor = processor.get(registry)?;

        if descriptor.can_borrow_mut() {
            let slot = descriptor.read_mut(owner)?;
            processor.read_in_place(reader, registry, slot)
        } else {
            let value = processor.read(reader, registry)?;
            descriptor.write(Some(owner), value)?;
            Ok(())
        }
    }
}

impl Processor for GenericProcessor {
    #[inline]
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Composite
    }

    #[inline]
    fn value_type(&self) -> Type {
        self.model.ty()
    }

    fn write(
        &self,
        value: &dyn Any,
        writer: &mut BinaryWriter,
        registry: &ProcessorRegistry,
    ) -> Result<(), SerializationError> {
        if !self.model.ty().is_type_of(value) {
            return Err(self.mismatch());
        }
        for (member, processor) in self.model.members().iter().zip(&self.processors) {
            let owner = member
                .bases()
                .iter()
                .try_fold(value, |value, base| base.project(value))
                .ok_or_else(|| self.mismatch())?;
            let current = member.descriptor().read(Some(owner))?;
            processor.get(registry)?.write(current.as_any(), writer, registry)?;
        }
        Ok(())
    }

    fn read(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
    ) -> Result<Box<dyn Any>, SerializationError> {
        let constructor = self
            .constructor
            .as_ref()
            .ok_or(SerializationError::MissingDefaultConstructor {
                type_path: self.model.ty().path(),
            })?;
        let mut value = constructor.invoke(Vec::new())?;
        self.read_in_place(reader, registry, &mut *value)?;
        Ok(value)
    }

    fn read_in_place(
        &self,
        reader: &mut BinaryReader<'_>,
        registry: &ProcessorRegistry,
        target: &mut dyn Any,
    ) -> Result<(), SerializationError> {
        if !self.model.ty().is_type_of(target) {
            return Err(self.mismatch());
        }
        for (member, processor) in self.model.members().iter().zip(&self.processors) {
            self.read_member(member, processor, reader, registry, &mut *target)?;
        }
        Ok(())
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}
