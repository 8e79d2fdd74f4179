use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use crate::info::Type;

// -----------------------------------------------------------------------------
// ListInfo

/// Erased operations over a `Vec<T>`.
///
/// # Examples
///
/// ```
/// use ez_reflect::info::ListInfo;
///
/// let info = ListInfo::of_vec::<i32>();
/// assert!(info.element().is::<i32>());
///
/// let mut list = info.with_capacity(2);
/// info.push(&mut *list, Box::new(7_i32)).unwrap();
/// assert_eq!(info.len(&*list), Some(1));
/// assert_eq!(info.get(&*list, 0).unwrap().downcast_ref::<i32>(), Some(&7));
/// ```
#[derive(Clone)]
pub struct ListInfo {
    element: Type,
    ops: Arc<dyn ListOps>,
}

trait ListOps: Send + Sync {
    fn len(&self, list: &dyn Any) -> Option<usize>;
    fn get<'a>(&self, list: &'a dyn Any, index: usize) -> Option<&'a dyn Any>;
    fn with_capacity(&self, capacity: usize) -> Box<dyn Any>;
    fn push(&self, list: &mut dyn Any, element: Box<dyn Any>) -> Result<(), Box<dyn Any>>;
    fn clear(&self, list: &mut dyn Any) -> bool;
}

struct VecOps<T>(PhantomData<fn() -> T>);

impl<T: Any> ListOps for VecOps<T> {
    fn len(&self, list: &dyn Any) -> Option<usize> {
        list.downcast_ref::<Vec<T>>().map(Vec::len)
    }

    fn get<'a>(&self, list: &'a dyn Any, index: usize) -> Option<&'a dyn Any> {
        let list = list.downcast_ref::<Vec<T>>()?;
        list.get(index).map(|v| v as &dyn Any)
    }

    fn with_capacity(&self, capacity: usize) -> Box<dyn Any> {
        Box::new(Vec::<T>::with_capacity(capacity))
    }

    fn push(&self, list: &mut dyn Any, element: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        let Some(list) = list.downcast_mut::<Vec<T>>() else {
            return Err(element);
        };
        list.push(*element.downcast::<T>()?);
        Ok(())
    }

    fn clear(&self, list: &mut dyn Any) -> bool {
        match list.downcast_mut::<Vec<T>>() {
            Some(list) => {
                list.clear();
                true
            }
            None => false,
        }
    }
}

impl ListInfo {
    /// Creates the info for `Vec<T>`.
    pub fn of_vec<T: Any>() -> Self {
        Self {
            element: Type::of::<T>(),
            ops: Arc::new(VecOps::<T>(PhantomData)),
        }
    }

    /// Returns the element type.
    #[inline]
    pub const fn element(&self) -> Type {
        self.element
    }

    /// Returns the length, or `None` if `list` is not this list type.
    #[inline]
    pub fn len(&self, list: &dyn Any) -> Option<usize> {
        self.ops.len(list)
    }

    /// Returns the element at `index`.
    #[inline]
    pub fn get<'a>(&self, list: &'a dyn Any, index: usize) -> Option<&'a dyn Any> {
        self.ops.get(list, index)
    }

    /// Creates an empty list.
    #[inline]
    pub fn with_capacity(&self, capacity: usize) -> Box<dyn Any> {
        self.ops.with_capacity(capacity)
    }

    /// Appends `element`, handing it back when either type does not match.
    #[inline]
    pub fn push(&self, list: &mut dyn Any, element: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        self.ops.push(list, element)
    }

    /// Removes all elements. Returns `false` on a type mismatch.
    #[inline]
    pub fn clear(&self, list: &mut dyn Any) -> bool {
        self.ops.clear(list)
    }
}

impl fmt::Debug for ListInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListInfo")
            .field("element", &self.element)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// OptionInfo

/// Erased operations over an `Option<T>`.
///
/// # Examples
///
/// ```
/// use ez_reflect::info::OptionInfo;
///
/// let info = OptionInfo::of::<String>();
/// let none = info.none();
/// assert_eq!(info.get(&*none).map(|v| v.is_none()), Some(true));
///
/// let some = info.some(Box::new(String::from("x"))).unwrap();
/// let inner = info.get(&*some).flatten().unwrap();
/// assert_eq!(inner.downcast_ref::<String>().unwrap(), "x");
/// ```
#[derive(Clone)]
pub struct OptionInfo {
    inner: Type,
    ops: Arc<dyn OptionOps>,
}

trait OptionOps: Send + Sync {
    fn get<'a>(&self, value: &'a dyn Any) -> Option<Option<&'a dyn Any>>;
    fn none(&self) -> Box<dyn Any>;
    fn some(&self, inner: Box<dyn Any>) -> Result<Box<dyn Any>, Box<dyn Any>>;
}

struct OptOps<T>(PhantomData<fn() -> T>);

impl<T: Any> OptionOps for OptOps<T> {
    fn get<'a>(&self, value: &'a dyn Any) -> Option<Option<&'a dyn Any>> {
        value
            .downcast_ref::<Option<T>>()
            .map(|v| v.as_ref().map(|v| v as &dyn Any))
    }

    fn none(&self) -> Box<dyn Any> {
        Box::new(None::<T>)
    }

    fn some(&self, inner: Box<dyn Any>) -> Result<Box<dyn Any>, Box<dyn Any>> {
        Ok(Box::new(Some(*inner.downcast::<T>()?)))
    }
}

impl OptionInfo {
    /// Creates the info for `Option<T>`.
    pub fn of<T: Any>() -> Self {
        Self {
            inner: Type::of::<T>(),
            ops: Arc::new(OptOps::<T>(PhantomData)),
        }
    }

    /// Returns the wrapped type.
    #[inline]
    pub const fn inner(&self) -> Type {
        self.inner
    }

    /// Returns the inner value, or `None` if `value` is not this option type.
    #[inline]
    pub fn get<'a>(&self, value: &'a dyn Any) -> Option<Option<&'a dyn Any>> {
        self.ops.get(value)
    }

    /// Creates `None`.
    #[inline]
    pub fn none(&self) -> Box<dyn Any> {
        self.ops.none()
    }

    /// Wraps `inner` in `Some`, handing it back on a type mismatch.
    #[inline]
    pub fn some(&self, inner: Box<dyn Any>) -> Result<Box<dyn Any>, Box<dyn Any>> {
        self.ops.some(inner)
    }
}

impl fmt::Debug for OptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionInfo")
            .field("inner", &self.inner)
            .finish()
    }
}
