use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::info::PrimitiveKind;

// -----------------------------------------------------------------------------
// EnumInfo

/// A fieldless enum and its integer representation.
///
/// Discriminants are widened to `i64`. For `u64` representations the value
/// is reinterpreted, which round-trips through [`to_discriminant`] and
/// [`from_discriminant`] unchanged.
///
/// # Examples
///
/// ```
/// use ez_reflect::info::{EnumInfo, PrimitiveKind};
///
/// #[derive(Debug, PartialEq)]
/// enum Mode { Idle = 1, Busy = 4 }
///
/// let info = EnumInfo::new::<Mode>(
///     PrimitiveKind::U8,
///     &["Idle", "Busy"],
///     |v| match v { Mode::Idle => Mode::Idle as i64, Mode::Busy => Mode::Busy as i64 },
///     |d| match d { 1 => Some(Mode::Idle), 4 => Some(Mode::Busy), _ => None },
/// );
///
/// assert_eq!(info.to_discriminant(&Mode::Busy), Some(4));
/// let value = info.from_discriminant(1).unwrap();
/// assert_eq!(value.downcast_ref::<Mode>(), Some(&Mode::Idle));
/// assert!(info.from_discriminant(2).is_none());
/// ```
///
/// [`to_discriminant`]: EnumInfo::to_discriminant
/// [`from_discriminant`]: EnumInfo::from_discriminant
#[derive(Clone)]
pub struct EnumInfo {
    repr: PrimitiveKind,
    variants: &'static [&'static str],
    ops: Arc<dyn EnumOps>,
}

trait EnumOps: Send + Sync {
    fn to_discriminant(&self, value: &dyn Any) -> Option<i64>;
    fn from_discriminant(&self, discriminant: i64) -> Option<Box<dyn Any>>;
}

struct TypedEnum<T> {
    to: fn(&T) -> i64,
    from: fn(i64) -> Option<T>,
}

impl<T: Any> EnumOps for TypedEnum<T> {
    fn to_discriminant(&self, value: &dyn Any) -> Option<i64> {
        value.downcast_ref::<T>().map(self.to)
    }

    fn from_discriminant(&self, discriminant: i64) -> Option<Box<dyn Any>> {
        (self.from)(discriminant).map(|v| Box::new(v) as Box<dyn Any>)
    }
}

impl EnumInfo {
    /// Creates the info for enum `T` with integer representation `repr`.
    pub fn new<T: Any>(
        repr: PrimitiveKind,
        variants: &'static [&'static str],
        to: fn(&T) -> i64,
        from: fn(i64) -> Option<T>,
    ) -> Self {
        debug_assert!(repr.is_integer(), "enum repr must be an integer kind");
        Self {
            repr,
            variants,
            ops: Arc::new(TypedEnum { to, from }),
        }
    }

    /// Returns the integer representation.
    #[inline]
    pub const fn repr(&self) -> PrimitiveKind {
        self.repr
    }

    /// Returns the variant names in declaration order.
    #[inline]
    pub const fn variants(&self) -> &'static [&'static str] {
        self.variants
    }

    /// Returns the discriminant of `value`, or `None` if it is not this enum.
    #[inline]
    pub fn to_discriminant(&self, value: &dyn Any) -> Option<i64> {
        self.ops.to_discriminant(value)
    }

    /// Returns the variant with `discriminant`, or `None` if there is none.
    #[inline]
    pub fn from_discriminant(&self, discriminant: i64) -> Option<Box<dyn Any>> {
        self.ops.from_discriminant(discriminant)
    }
}

impl fmt::Debug for EnumInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumInfo")
            .field("repr", &self.repr)
            .field("variants", &self.variants)
            .finish()
    }
}
