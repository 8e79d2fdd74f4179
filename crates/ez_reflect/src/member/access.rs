use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

// -----------------------------------------------------------------------------
// MemberValue

/// The value read from a member.
///
/// Fields are borrowed from their owner; properties and static members
/// produce an owned temporary.
pub enum MemberValue<'a> {
    Borrowed(&'a dyn Any),
    Owned(Box<dyn Any>),
}

impl MemberValue<'_> {
    /// Returns the value as `&dyn Any`.
    #[inline]
    pub fn as_any(&self) -> &dyn Any {
        match self {
            Self::Borrowed(value) => *value,
            Self::Owned(value) => &**value,
        }
    }

    /// Returns `true` if the value is a temporary.
    #[inline]
    pub const fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Returns the temporary, or `None` for a borrowed value.
    #[inline]
    pub fn into_owned(self) -> Option<Box<dyn Any>> {
        match self {
            Self::Borrowed(_) => None,
            Self::Owned(value) => Some(value),
        }
    }

    /// Takes the value as `V`, cloning it when borrowed.
    pub fn take<V: Any + Clone>(self) -> Option<V> {
        match self {
            Self::Borrowed(value) => value.downcast_ref::<V>().cloned(),
            Self::Owned(value) => value.downcast::<V>().ok().map(|v| *v),
        }
    }
}

impl fmt::Debug for MemberValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Borrowed(_) => f.write_str("MemberValue::Borrowed(..)"),
            Self::Owned(_) => f.write_str("MemberValue::Owned(..)"),
        }
    }
}

// -----------------------------------------------------------------------------
// MemberAccess

/// Erased access to one member, implemented by [`FieldAccess`],
/// [`PropertyAccess`] and [`StaticAccess`].
///
/// Instance members ignore calls without a target and static members ignore
/// the target. A `None` or `Err` result means the target or value has another
/// type, or the operation is not supported; the owning
/// [`MemberDescriptor`](crate::member::MemberDescriptor) turns it into an error.
pub trait MemberAccess: Send + Sync + 'static {
    fn can_read(&self) -> bool;

    fn can_write(&self) -> bool;

    /// Whether [`read_mut`](Self::read_mut) can lend the member in place.
    fn can_borrow_mut(&self) -> bool;

    fn read<'a>(&self, target: Option<&'a dyn Any>) -> Option<MemberValue<'a>>;

    fn read_mut<'a>(&self, target: &'a mut dyn Any) -> Option<&'a mut dyn Any>;

    /// Stores `value`, handing it back on failure.
    fn write(&self, target: Option<&mut dyn Any>, value: Box<dyn Any>) -> Result<(), Box<dyn Any>>;

    fn as_any(&self) -> &dyn Any;
}

// -----------------------------------------------------------------------------
// FieldAccess

/// An instance field of `T` with type `V`.
pub struct FieldAccess<T, V> {
    get: fn(&T) -> &V,
    get_mut: Option<fn(&mut T) -> &mut V>,
}

impl<T, V> FieldAccess<T, V> {
    #[inline]
    pub const fn new(get: fn(&T) -> &V, get_mut: Option<fn(&mut T) -> &mut V>) -> Self {
        Self { get, get_mut }
    }

    #[inline]
    pub const fn getter(&self) -> fn(&T) -> &V {
        self.get
    }

    /// Returns `None` for read-only fields.
    #[inline]
    pub const fn mutator(&self) -> Option<fn(&mut T) -> &mut V> {
        self.get_mut
    }
}

impl<T: Any, V: Any> MemberAccess for FieldAccess<T, V> {
    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        self.get_mut.is_some()
    }

    fn can_borrow_mut(&self) -> bool {
        self.get_mut.is_some()
    }

    fn read<'a>(&self, target: Option<&'a dyn Any>) -> Option<MemberValue<'a>> {
        let target = target?.downcast_ref::<T>()?;
        Some(MemberValue::Borrowed((self.get)(target)))
    }

    fn read_mut<'a>(&self, target: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let get_mut = self.get_mut?;
        let target = target.downcast_mut::<T>()?;
        Some(get_mut(target) as &mut dyn Any)
    }

    fn write(&self, target: Option<&mut dyn Any>, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        let (Some(get_mut), Some(target)) = (self.get_mut, target) else {
            return Err(value);
        };
        let Some(target) = target.downcast_mut::<T>() else {
            return Err(value);
        };
        *get_mut(target) = *value.downcast::<V>()?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// -----------------------------------------------------------------------------
// PropertyAccess

/// An instance property of `T` with type `V`: a getter and/or a setter.
pub struct PropertyAccess<T, V> {
    get: Option<fn(&T) -> V>,
    set: Option<fn(&mut T, V)>,
}

impl<T, V> PropertyAccess<T, V> {
    #[inline]
    pub const fn new(get: Option<fn(&T) -> V>, set: Option<fn(&mut T, V)>) -> Self {
        Self { get, set }
    }

    #[inline]
    pub const fn getter(&self) -> Option<fn(&T) -> V> {
        self.get
    }

    #[inline]
    pub const fn setter(&self) -> Option<fn(&mut T, V)> {
        self.set
    }
}

impl<T: Any, V: Any> MemberAccess for PropertyAccess<T, V> {
    fn can_read(&self) -> bool {
        self.get.is_some()
    }

    fn can_write(&self) -> bool {
        self.set.is_some()
    }

    fn can_borrow_mut(&self) -> bool {
        false
    }

    fn read<'a>(&self, target: Option<&'a dyn Any>) -> Option<MemberValue<'a>> {
        let get = self.get?;
        let target = target?.downcast_ref::<T>()?;
        Some(MemberValue::Owned(Box::new(get(target))))
    }

    fn read_mut<'a>(&self, _: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        None
    }

    fn write(&self, target: Option<&mut dyn Any>, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        let (Some(set), Some(target)) = (self.set, target) else {
            return Err(value);
        };
        let Some(target) = target.downcast_mut::<T>() else {
            return Err(value);
        };
        set(target, *value.downcast::<V>()?);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// -----------------------------------------------------------------------------
// StaticAccess

/// A static member with type `V`.
///
/// Rust statics are reached through functions, so static fields and static
/// properties share this representation.
pub struct StaticAccess<V> {
    get: Option<fn() -> V>,
    set: Option<fn(V)>,
}

impl<V> StaticAccess<V> {
    #[inline]
    pub const fn new(get: Option<fn() -> V>, set: Option<fn(V)>) -> Self {
        Self { get, set }
    }

    #[inline]
    pub const fn getter(&self) -> Option<fn() -> V> {
        self.get
    }

    #[inline]
    pub const fn setter(&self) -> Option<fn(V)> {
        self.set
    }
}

impl<V: Any> MemberAccess for StaticAccess<V> {
    fn can_read(&self) -> bool {
        self.get.is_some()
    }

    fn can_write(&self) -> bool {
        self.set.is_some()
    }

    fn can_borrow_mut(&self) -> bool {
        false
    }

    fn read<'a>(&self, _: Option<&'a dyn Any>) -> Option<MemberValue<'a>> {
        let get = self.get?;
        Some(MemberValue::Owned(Box::new(get())))
    }

    fn read_mut<'a>(&self, _: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        None
    }

    fn write(&self, _: Option<&mut dyn Any>, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        let Some(set) = self.set else {
            return Err(value);
        };
        set(*value.downcast::<V>()?);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
