use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use bitflags::bitflags;

use crate::access::AccessError;
use crate::info::Type;
use crate::member::{FieldAccess, MemberAccess, MemberValue, PropertyAccess, StaticAccess};

// -----------------------------------------------------------------------------
// Visibility / MemberKind / MemberAttributes

/// Whether a member is part of its type's public surface.
///
/// `#[derive(Reflect)]` maps `pub` to [`Public`](Visibility::Public) and
/// every restricted visibility (`pub(crate)`, private, ...) to
/// [`NonPublic`](Visibility::NonPublic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    NonPublic,
}

impl Visibility {
    #[inline]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Field => "field",
            Self::Property => "property",
        })
    }
}

bitflags! {
    /// Declarative markers attached to a member.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemberAttributes: u8 {
        /// Never written, even when a mutator exists.
        const READ_ONLY = 1 << 0;
        /// Field-level serialization opt-in for non-public fields.
        const SERIALIZE_FIELD = 1 << 1;
        /// Excluded from serialization.
        const NON_SERIALIZED = 1 << 2;
        /// The embedded base of a composite type, see [`BaseInfo`](crate::registry::BaseInfo).
        const BASE = 1 << 3;
    }
}

// -----------------------------------------------------------------------------
// MemberDescriptor

/// A field or property of a registered type.
///
/// Descriptors carry the typed accessor functions behind an erased
/// [`MemberAccess`]; the [`ReflectionCompiler`] recovers the typed form, the
/// path factory and the serializer use the erased one.
///
/// # Examples
///
/// ```
/// use ez_reflect::member::{MemberDescriptor, Visibility};
///
/// struct Player { id: i32 }
///
/// let id = MemberDescriptor::field::<Player, i32>(
///     "id",
///     Visibility::Public,
///     |p| &p.id,
///     Some(|p| &mut p.id),
/// );
///
/// let mut player = Player { id: 1 };
/// id.write(Some(&mut player), Box::new(7_i32)).unwrap();
/// let value = id.read(Some(&player)).unwrap();
/// assert_eq!(value.as_any().downcast_ref::<i32>(), Some(&7));
/// ```
///
/// [`ReflectionCompiler`]: crate::compile::ReflectionCompiler
pub struct MemberDescriptor {
    name: &'static str,
    declaring: Type,
    value_type: Type,
    kind: MemberKind,
    visibility: Visibility,
    setter_visibility: Visibility,
    is_static: bool,
    attributes: MemberAttributes,
    access: Box<dyn MemberAccess>,
}

impl MemberDescriptor {
    fn new<T: Any, V: Any>(
        name: &'static str,
        kind: MemberKind,
        visibility: Visibility,
        is_static: bool,
        access: Box<dyn MemberAccess>,
    ) -> Self {
        Self {
            name,
            declaring: Type::of::<T>(),
            value_type: Type::of::<V>(),
            kind,
            visibility,
            setter_visibility: visibility,
            is_static,
            attributes: MemberAttributes::empty(),
            access,
        }
    }

    /// An instance field. `get_mut == None` makes the field read-only.
    pub fn field<T: Any, V: Any>(
        name: &'static str,
        visibility: Visibility,
        get: fn(&T) -> &V,
        get_mut: Option<fn(&mut T) -> &mut V>,
    ) -> Self {
        let access = FieldAccess::new(get, get_mut);
        Self::new::<T, V>(name, MemberKind::Field, visibility, false, Box::new(access))
    }

    /// An instance property with optional getter and setter.
    pub fn property<T: Any, V: Any>(
        name: &'static str,
        visibility: Visibility,
        get: Option<fn(&T) -> V>,
        set: Option<fn(&mut T, V)>,
    ) -> Self {
        let access = PropertyAccess::new(get, set);
        Self::new::<T, V>(name, MemberKind::Property, visibility, false, Box::new(access))
    }

    /// A static field declared on `T`. `set == None` makes the field read-only.
    pub fn static_field<T: Any, V: Any>(
        name: &'static str,
        visibility: Visibility,
        get: fn() -> V,
        set: Option<fn(V)>,
    ) -> Self {
        let access = StaticAccess::new(Some(get), set);
        Self::new::<T, V>(name, MemberKind::Field, visibility, true, Box::new(access))
    }

    /// A static property declared on `T`.
    pub fn static_property<T: Any, V: Any>(
        name: &'static str,
        visibility: Visibility,
        get: Option<fn() -> V>,
        set: Option<fn(V)>,
    ) -> Self {
        let access = StaticAccess::new(get, set);
        Self::new::<T, V>(name, MemberKind::Property, visibility, true, Box::new(access))
    }

    /// Sets the visibility of the setter, which defaults to the member's.
    #[inline]
    pub fn with_setter_visibility(mut self, visibility: Visibility) -> Self {
        self.setter_visibility = visibility;
        self
    }

    /// Adds `attributes`.
    #[inline]
    pub fn with_attributes(mut self, attributes: MemberAttributes) -> Self {
        self.attributes |= attributes;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type declaring this member.
    #[inline]
    pub const fn declaring_type(&self) -> Type {
        self.declaring
    }

    #[inline]
    pub const fn value_type(&self) -> Type {
        self.value_type
    }

    #[inline]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline]
    pub const fn is_field(&self) -> bool {
        matches!(self.kind, MemberKind::Field)
    }

    #[inline]
    pub const fn is_property(&self) -> bool {
        matches!(self.kind, MemberKind::Property)
    }

    #[inline]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub const fn setter_visibility(&self) -> Visibility {
        self.setter_visibility
    }

    #[inline]
    pub const fn is_static(&self) -> bool {
        self.is_static
    }

    #[inline]
    pub const fn attributes(&self) -> MemberAttributes {
        self.attributes
    }

    #[inline]
    pub fn can_read(&self) -> bool {
        self.access.can_read()
    }

    /// Returns `true` if a value can be stored through this member.
    #[inline]
    pub fn can_write(&self) -> bool {
        self.access.can_write() && !self.attributes.contains(MemberAttributes::READ_ONLY)
    }

    /// Returns `true` for fields that cannot be written.
    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.is_field() && !self.can_write()
    }

    /// Returns `true` if [`read_mut`](Self::read_mut) lends the member in place.
    #[inline]
    pub fn can_borrow_mut(&self) -> bool {
        self.access.can_borrow_mut() && !self.attributes.contains(MemberAttributes::READ_ONLY)
    }

    /// Returns the typed access object, e.g. `FieldAccess<T, V>`.
    #[inline]
    pub fn access_as<A: MemberAccess>(&self) -> Option<&A> {
        self.access.as_any().downcast_ref::<A>()
    }

    fn target_error(&self, target_given: bool) -> AccessError {
        if !self.is_static && !target_given {
            AccessError::MissingTarget { member: self.name }
        } else {
            AccessError::TargetMismatch {
                member: self.name,
                expected: self.declaring.path(),
            }
        }
    }

    /// Reads the member. `target` is ignored for static members.
    pub fn read<'a>(&self, target: Option<&'a dyn Any>) -> Result<MemberValue<'a>, AccessError> {
        if !self.can_read() {
            return Err(AccessError::NotReadable { member: self.name });
        }
        let given = target.is_some();
        self.access
            .read(target)
            .ok_or_else(|| self.target_error(given))
    }

    /// Lends a writable instance field in place.
    pub fn read_mut<'a>(&self, target: &'a mut dyn Any) -> Result<&'a mut dyn Any, AccessError> {
        if !self.can_borrow_mut() {
            return Err(AccessError::NotWritable { member: self.name });
        }
        self.access
            .read_mut(target)
            .ok_or_else(|| self.target_error(true))
    }

    /// Stores `value` into the member. `target` is ignored for static members.
    pub fn write(&self, target: Option<&mut dyn Any>, value: Box<dyn Any>) -> Result<(), AccessError> {
        if !self.can_write() {
            return Err(AccessError::NotWritable { member: self.name });
        }
        if !self.is_static {
            match &target {
                None => return Err(self.target_error(false)),
                Some(t) if !self.declaring.is_type_of(&**t) => return Err(self.target_error(true)),
                Some(_) => {}
            }
        }
        self.access
            .write(target, value)
            .map_err(|_| AccessError::ValueMismatch {
                member: self.name,
                expected: self.value_type.path(),
            })
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("declaring", &self.declaring)
            .field("value_type", &self.value_type)
            .field("kind", &self.kind)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .field("attributes", &self.attributes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use core::sync::atomic::{AtomicI32, Ordering};

    use super::{MemberAttributes, MemberDescriptor, Visibility};
    use crate::access::AccessError;

    struct Player {
        name: String,
        level: u8,
    }

    static COUNT: AtomicI32 = AtomicI32::new(3);

    fn level() -> MemberDescriptor {
        MemberDescriptor::property::<Player, u8>(
            "level",
            Visibility::Public,
            Some(|p| p.level),
            Some(|p, v| p.level = v),
        )
    }

    #[test]
    fn field_reads_are_borrowed() {
        let name = MemberDescriptor::field::<Player, String>("name", Visibility::Public, |p| &p.name, None);
        let player = Player { name: "a".into(), level: 1 };
        let value = name.read(Some(&player)).unwrap();
        assert!(!value.is_owned());
        assert!(name.is_read_only());
        assert!(matches!(
            name.write(None, Box::new(String::new())),
            Err(AccessError::NotWritable { member: "name" })
        ));
    }

    #[test]
    fn property_reads_are_owned() {
        let level = level();
        let mut player = Player { name: String::new(), level: 1 };
        level.write(Some(&mut player), Box::new(9_u8)).unwrap();
        let value = level.read(Some(&player)).unwrap();
        assert!(value.is_owned());
        assert_eq!(value.take::<u8>(), Some(9));
    }

    #[test]
    fn wrong_target_and_value_types_are_reported() {
        let level = level();
        assert!(matches!(level.read(None), Err(AccessError::MissingTarget { .. })));
        assert!(matches!(level.read(Some(&5_i32)), Err(AccessError::TargetMismatch { .. })));

        let mut player = Player { name: String::new(), level: 1 };
        assert!(matches!(
            level.write(Some(&mut player), Box::new(9_i64)),
            Err(AccessError::ValueMismatch { .. })
        ));
    }

    #[test]
    fn static_members_ignore_target() {
        let count = MemberDescriptor::static_field::<Player, i32>(
            "count",
            Visibility::NonPublic,
            || COUNT.load(Ordering::Relaxed),
            Some(|v| COUNT.store(v, Ordering::Relaxed)),
        );
        count.write(None, Box::new(11_i32)).unwrap();
        assert_eq!(count.read(None).unwrap().take::<i32>(), Some(11));
        assert!(count.is_static());
    }

    #[test]
    fn read_only_attribute_blocks_writes() {
        let level = level().with_attributes(MemberAttributes::READ_ONLY);
        assert!(!level.can_write());
        assert!(!level.is_read_only());
    }
}
