use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{Generics, SerializationConfig, Type, TypeFlags, TypeInfo, UnmanagedInfo};
use crate::member::{ConstructorDescriptor, MemberDescriptor, MethodDescriptor};
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// BaseInfo

/// The base of a composite type.
///
/// Inheritance is expressed by composition: a derived struct embeds its base
/// as a field marked `#[reflect(base)]`. Members of the base are reachable
/// through the derived type by projecting into that field.
#[derive(Clone)]
pub struct BaseInfo {
    ty: Type,
    ops: Arc<dyn BaseOps>,
}

trait BaseOps: Send + Sync {
    fn project<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any>;
    fn project_mut<'a>(&self, value: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct Projection<T, B> {
    get: fn(&T) -> &B,
    get_mut: fn(&mut T) -> &mut B,
}

impl<T: Any, B: Any> BaseOps for Projection<T, B> {
    fn project<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any> {
        let value = value.downcast_ref::<T>()?;
        Some((self.get)(value) as &dyn Any)
    }

    fn project_mut<'a>(&self, value: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let value = value.downcast_mut::<T>()?;
        Some((self.get_mut)(value) as &mut dyn Any)
    }
}

impl BaseInfo {
    /// `T` embeds its base `B`, reached through `get` and `get_mut`.
    pub fn new<T: Any, B: Any>(get: fn(&T) -> &B, get_mut: fn(&mut T) -> &mut B) -> Self {
        Self {
            ty: Type::of::<B>(),
            ops: Arc::new(Projection { get, get_mut }),
        }
    }

    /// Returns the base type.
    #[inline]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    /// Returns the embedded base of `value`.
    #[inline]
    pub fn project<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any> {
        self.ops.project(value)
    }

    #[inline]
    pub fn project_mut<'a>(&self, value: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.ops.project_mut(value)
    }
}

impl fmt::Debug for BaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BaseInfo").field(&self.ty).finish()
    }
}

// -----------------------------------------------------------------------------
// AssignFn

/// Moves a boxed value into a slot of the same type.
///
/// Hands the value back when either side has another type.
pub type AssignFn = fn(&mut dyn Any, Box<dyn Any>) -> Result<(), Box<dyn Any>>;

fn assign<T: Any>(slot: &mut dyn Any, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
    match slot.downcast_mut::<T>() {
        Some(slot) => {
            *slot = *value.downcast::<T>()?;
            Ok(())
        }
        None => Err(value),
    }
}

// -----------------------------------------------------------------------------
// TypeMeta

/// Runtime metadata of one type, registered into the [`TypeRegistry`].
///
/// Holds the structural [`TypeInfo`], [`TypeFlags`], the ordered member,
/// method and constructor descriptors, and the optional serialization
/// config, base and unmanaged representation.
///
/// Usually produced by [`#[derive(Reflect)]`](crate::derive::Reflect)
/// through [`GetTypeMeta`].
///
/// # Example
///
/// ```
/// use ez_reflect::info::{TypeFlags, TypeInfo};
/// use ez_reflect::member::{MemberDescriptor, Visibility};
/// use ez_reflect::registry::TypeMeta;
///
/// struct Point { x: f32 }
///
/// let mut meta = TypeMeta::new::<Point>(TypeInfo::Struct);
/// meta.push_member(MemberDescriptor::field::<Point, f32>(
///     "x", Visibility::Public, |p| &p.x, Some(|p| &mut p.x),
/// ));
///
/// assert!(meta.flags().contains(TypeFlags::REFERENCE_TYPE));
/// assert_eq!(meta.member("x").unwrap().name(), "x");
/// ```
pub struct TypeMeta {
    ty: Type,
    assign: AssignFn,
    info: TypeInfo,
    flags: TypeFlags,
    members: Vec<Arc<MemberDescriptor>>,
    methods: Vec<Arc<MethodDescriptor>>,
    constructors: Vec<Arc<ConstructorDescriptor>>,
    serialization: Option<SerializationConfig>,
    base: Option<BaseInfo>,
    interfaces: Vec<Type>,
    generics: Generics,
    unmanaged: Option<UnmanagedInfo>,
}

impl TypeMeta {
    /// Creates the metadata of `T`, flagged [`TypeFlags::REFERENCE_TYPE`].
    pub fn new<T: Any>(info: TypeInfo) -> Self {
        Self {
            ty: Type::of::<T>(),
            assign: assign::<T>,
            info,
            flags: TypeFlags::REFERENCE_TYPE,
            members: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            serialization: None,
            base: None,
            interfaces: Vec::new(),
            generics: Generics::new(),
            unmanaged: None,
        }
    }

    /// Replaces the flags.
    #[inline]
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn set_flags(&mut self, flags: TypeFlags) {
        self.flags = flags;
    }

    #[inline]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    /// Returns the typed move-assignment of this type, see [`AssignFn`].
    #[inline]
    pub const fn assign_fn(&self) -> AssignFn {
        self.assign
    }

    #[inline]
    pub const fn info(&self) -> &TypeInfo {
        &self.info
    }

    #[inline]
    pub const fn flags(&self) -> TypeFlags {
        self.flags
    }

    // Members -----------------------------------------------------------------

    /// Returns the declared members in declaration order.
    #[inline]
    pub fn members(&self) -> &[Arc<MemberDescriptor>] {
        &self.members
    }

    /// Returns the member declared on this type with the given name.
    pub fn member(&self, name: &str) -> Option<&Arc<MemberDescriptor>> {
        self.members.iter().find(|m| m.name() == name)
    }

    pub fn push_member(&mut self, member: MemberDescriptor) {
        debug_assert!(
            member.declaring_type() == self.ty,
            "member `{}` is declared on `{}`, not `{}`",
            member.name(),
            member.declaring_type(),
            self.ty,
        );
        self.members.push(Arc::new(member));
    }

    // Methods -----------------------------------------------------------------

    #[inline]
    pub fn methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }

    /// Returns the first method declared on this type with the given name.
    pub fn method(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.iter().find(|m| m.name() == name)
    }

    pub fn push_method(&mut self, method: MethodDescriptor) {
        self.methods.push(Arc::new(method));
    }

    // Constructors ------------------------------------------------------------

    #[inline]
    pub fn constructors(&self) -> &[Arc<ConstructorDescriptor>] {
        &self.constructors
    }

    /// Returns the parameterless constructor, if any.
    pub fn default_constructor(&self) -> Option<&Arc<ConstructorDescriptor>> {
        self.constructors.iter().find(|c| c.arity() == 0)
    }

    pub fn push_constructor(&mut self, constructor: ConstructorDescriptor) {
        self.constructors.push(Arc::new(constructor));
    }

    // Serialization / Base / Interfaces ---------------------------------------

    /// Returns the serialization config declared on this type itself.
    #[inline]
    pub const fn serialization(&self) -> Option<&SerializationConfig> {
        self.serialization.as_ref()
    }

    #[inline]
    pub fn set_serialization(&mut self, config: SerializationConfig) {
        self.serialization = Some(config);
    }

    #[inline]
    pub const fn base(&self) -> Option<&BaseInfo> {
        self.base.as_ref()
    }

    #[inline]
    pub fn set_base(&mut self, base: BaseInfo) {
        self.base = Some(base);
    }

    /// Returns the implemented interfaces, usually `dyn Trait` types.
    #[inline]
    pub fn interfaces(&self) -> &[Type] {
        &self.interfaces
    }

    pub fn push_interface(&mut self, interface: Type) {
        if !self.interfaces.contains(&interface) {
            self.interfaces.push(interface);
        }
    }

    // Generics / Unmanaged ----------------------------------------------------

    #[inline]
    pub const fn generics(&self) -> &Generics {
        &self.generics
    }

    #[inline]
    pub fn set_generics(&mut self, generics: Generics) {
        self.generics = generics;
    }

    /// Returns the fixed-size representation, set for unmanaged types.
    #[inline]
    pub const fn unmanaged(&self) -> Option<&UnmanagedInfo> {
        self.unmanaged.as_ref()
    }

    /// Sets the fixed-size representation and adds [`TypeFlags::UNMANAGED`].
    pub fn set_unmanaged(&mut self, info: UnmanagedInfo) {
        self.flags |= TypeFlags::UNMANAGED;
        self.unmanaged = Some(info);
    }
}

impl fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMeta")
            .field("ty", &self.ty)
            .field("info", &self.info)
            .field("flags", &self.flags)
            .field("members", &self.members)
            .field("methods", &self.methods)
            .field("serialization", &self.serialization)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// A trait which allows a type to generate its [`TypeMeta`]
/// for registration into the [`TypeRegistry`].
///
/// This trait is automatically implemented for items using
/// [`#[derive(Reflect)]`](crate::derive::Reflect).
pub trait GetTypeMeta: Any {
    /// Returns the default [`TypeMeta`] for this type.
    fn get_type_meta() -> TypeMeta;

    /// Registers other types needed by this type.
    ///
    /// For composite types this is the types of their members and base.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use super::TypeMeta;
    use crate::info::{PrimitiveKind, TypeInfo};

    #[test]
    fn assign_checks_both_sides() {
        let meta = TypeMeta::new::<String>(TypeInfo::Primitive(PrimitiveKind::String));
        let assign = meta.assign_fn();

        let mut slot = String::from("old");
        assert!(assign(&mut slot, Box::new(String::from("new"))).is_ok());
        assert_eq!(slot, "new");

        let rejected = assign(&mut slot, Box::new(1_u8)).unwrap_err();
        assert_eq!(rejected.downcast_ref::<u8>(), Some(&1));
        assert!(assign(&mut 0_u8, Box::new(String::new())).is_err());
        assert_eq!(slot, "new");
    }
}
