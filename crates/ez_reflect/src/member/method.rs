use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::access::AccessError;
use crate::info::Type;
use crate::member::Visibility;

// -----------------------------------------------------------------------------
// MethodArgs

/// An argument tuple of arity 0 to 4.
///
/// Reflected methods take their arguments as one tuple, so
/// `fn(&T, (i32, String)) -> R` is a two-argument method.
pub trait MethodArgs: Sized + 'static {
    const ARITY: usize;

    /// Returns the argument types in order.
    fn param_types() -> Vec<Type>;

    /// Rebuilds the tuple from erased values.
    ///
    /// Returns `None` if the count or any type does not match.
    fn from_values(values: Vec<Box<dyn Any>>) -> Option<Self>;
}

macro_rules! impl_method_args {
    ($($arg:ident),*) => {
        impl<$($arg: Any),*> MethodArgs for ($($arg,)*) {
            const ARITY: usize = <[&str]>::len(&[$(stringify!($arg)),*]);

            fn param_types() -> Vec<Type> {
                vec![$(Type::of::<$arg>()),*]
            }

            #[allow(unused_mut, reason = "zero-arity tuple")]
            fn from_values(values: Vec<Box<dyn Any>>) -> Option<Self> {
                let mut values = values.into_iter();
                let args = ($(*values.next()?.downcast::<$arg>().ok()?,)*);
                values.next().is_none().then_some(args)
            }
        }
    };
}

impl_method_args!();
impl_method_args!(A0);
impl_method_args!(A0, A1);
impl_method_args!(A0, A1, A2);
impl_method_args!(A0, A1, A2, A3);

// -----------------------------------------------------------------------------
// MethodDescriptor

/// How a method receives its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    /// `fn(&T, A) -> R`
    Shared,
    /// `fn(&mut T, A) -> R`
    Exclusive,
    /// `fn(A) -> R`
    Static,
}

type SharedCall = fn(&dyn Any, &dyn Any, Vec<Box<dyn Any>>) -> Option<Box<dyn Any>>;
type ExclusiveCall = fn(&dyn Any, &mut dyn Any, Vec<Box<dyn Any>>) -> Option<Box<dyn Any>>;
type StaticCall = fn(&dyn Any, Vec<Box<dyn Any>>) -> Option<Box<dyn Any>>;

#[derive(Clone, Copy)]
enum ErasedCall {
    Shared(SharedCall),
    Exclusive(ExclusiveCall),
    Static(StaticCall),
}

fn call_shared<T: Any, A: MethodArgs, R: Any>(
    func: &dyn Any,
    target: &dyn Any,
    args: Vec<Box<dyn Any>>,
) -> Option<Box<dyn Any>> {
    let func = func.downcast_ref::<fn(&T, A) -> R>()?;
    let target = target.downcast_ref::<T>()?;
    let args = A::from_values(args)?;
    Some(Box::new(func(target, args)))
}

fn call_exclusive<T: Any, A: MethodArgs, R: Any>(
    func: &dyn Any,
    target: &mut dyn Any,
    args: Vec<Box<dyn Any>>,
) -> Option<Box<dyn Any>> {
    let func = func.downcast_ref::<fn(&mut T, A) -> R>()?;
    let target = target.downcast_mut::<T>()?;
    let args = A::from_values(args)?;
    Some(Box::new(func(target, args)))
}

fn call_static<A: MethodArgs, R: Any>(func: &dyn Any, args: Vec<Box<dyn Any>>) -> Option<Box<dyn Any>> {
    let func = func.downcast_ref::<fn(A) -> R>()?;
    let args = A::from_values(args)?;
    Some(Box::new(func(args)))
}

/// A method of a registered type.
///
/// A method returning `()` is void: [`return_type`](Self::return_type)
/// is `None`.
///
/// # Examples
///
/// ```
/// use ez_reflect::member::{MethodDescriptor, Receiver, Visibility};
///
/// struct Counter { value: i32 }
///
/// let add = MethodDescriptor::exclusive::<Counter, (i32,), i32>(
///     "add",
///     Visibility::Public,
///     |c, (n,)| { c.value += n; c.value },
/// );
/// assert_eq!(add.receiver(), Receiver::Exclusive);
/// assert_eq!(add.arity(), 1);
///
/// let mut counter = Counter { value: 1 };
/// let out = add.invoke_mut(Some(&mut counter), vec![Box::new(2_i32)]).unwrap();
/// assert_eq!(out.downcast_ref::<i32>(), Some(&3));
/// assert_eq!(counter.value, 3);
/// ```
pub struct MethodDescriptor {
    name: &'static str,
    declaring: Type,
    params: Box<[Type]>,
    return_type: Option<Type>,
    visibility: Visibility,
    func: Box<dyn Any + Send + Sync>,
    call: ErasedCall,
}

fn return_type_of<R: Any>() -> Option<Type> {
    let ty = Type::of::<R>();
    (!ty.is::<()>()).then_some(ty)
}

impl MethodDescriptor {
    /// A method taking `&T`.
    pub fn shared<T: Any, A: MethodArgs, R: Any>(
        name: &'static str,
        visibility: Visibility,
        func: fn(&T, A) -> R,
    ) -> Self {
        Self {
            name,
            declaring: Type::of::<T>(),
            params: A::param_types().into_boxed_slice(),
            return_type: return_type_of::<R>(),
            visibility,
            func: Box::new(func),
            call: ErasedCall::Shared(call_shared::<T, A, R>),
        }
    }

    /// A method taking `&mut T`.
    pub fn exclusive<T: Any, A: MethodArgs, R: Any>(
        name: &'static str,
        visibility: Visibility,
        func: fn(&mut T, A) -> R,
    ) -> Self {
        Self {
            name,
            declaring: Type::of::<T>(),
            params: A::param_types().into_boxed_slice(),
            return_type: return_type_of::<R>(),
            visibility,
            func: Box::new(func),
            call: ErasedCall::Exclusive(call_exclusive::<T, A, R>),
        }
    }

    /// A static method declared on `T`.
    pub fn static_method<T: Any, A: MethodArgs, R: Any>(
        name: &'static str,
        visibility: Visibility,
        func: fn(A) -> R,
    ) -> Self {
        Self {
            name,
            declaring: Type::of::<T>(),
            params: A::param_types().into_boxed_slice(),
            return_type: return_type_of::<R>(),
            visibility,
            func: Box::new(func),
            call: ErasedCall::Static(call_static::<A, R>),
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn declaring_type(&self) -> Type {
        self.declaring
    }

    #[inline]
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Returns `None` for void methods.
    #[inline]
    pub const fn return_type(&self) -> Option<Type> {
        self.return_type
    }

    #[inline]
    pub const fn is_void(&self) -> bool {
        self.return_type.is_none()
    }

    #[inline]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub const fn receiver(&self) -> Receiver {
        match self.call {
            ErasedCall::Shared(_) => Receiver::Shared,
            ErasedCall::Exclusive(_) => Receiver::Exclusive,
            ErasedCall::Static(_) => Receiver::Static,
        }
    }

    #[inline]
    pub const fn is_static(&self) -> bool {
        matches!(self.call, ErasedCall::Static(_))
    }

    /// Returns the function pointer if it is `fn(&T, A) -> R`.
    #[inline]
    pub fn typed_shared<T: Any, A: MethodArgs, R: Any>(&self) -> Option<fn(&T, A) -> R> {
        self.func.downcast_ref::<fn(&T, A) -> R>().copied()
    }

    /// Returns the function pointer if it is `fn(&mut T, A) -> R`.
    #[inline]
    pub fn typed_exclusive<T: Any, A: MethodArgs, R: Any>(&self) -> Option<fn(&mut T, A) -> R> {
        self.func.downcast_ref::<fn(&mut T, A) -> R>().copied()
    }

    /// Returns the function pointer if it is `fn(A) -> R`.
    #[inline]
    pub fn typed_static<A: MethodArgs, R: Any>(&self) -> Option<fn(A) -> R> {
        self.func.downcast_ref::<fn(A) -> R>().copied()
    }

    fn call_error(&self) -> AccessError {
        AccessError::InvocationMismatch { method: self.name }
    }

    /// Invokes a static or shared-receiver method.
    ///
    /// Fails with [`AccessError::NotWritable`] for exclusive receivers.
    pub fn invoke(&self, target: Option<&dyn Any>, args: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, AccessError> {
        let func = &*self.func as &dyn Any;
        let result = match (self.call, target) {
            (ErasedCall::Static(call), _) => call(func, args),
            (ErasedCall::Shared(call), Some(target)) => call(func, target, args),
            (ErasedCall::Shared(_), None) => {
                return Err(AccessError::MissingTarget { member: self.name });
            }
            (ErasedCall::Exclusive(_), _) => {
                return Err(AccessError::NotWritable { member: self.name });
            }
        };
        result.ok_or_else(|| self.call_error())
    }

    /// Invokes the method with any receiver.
    pub fn invoke_mut(
        &self,
        target: Option<&mut dyn Any>,
        args: Vec<Box<dyn Any>>,
    ) -> Result<Box<dyn Any>, AccessError> {
        let func = &*self.func as &dyn Any;
        let result = match (self.call, target) {
            (ErasedCall::Static(call), _) => call(func, args),
            (ErasedCall::Shared(call), Some(target)) => call(func, target, args),
            (ErasedCall::Exclusive(call), Some(target)) => call(func, target, args),
            (_, None) => return Err(AccessError::MissingTarget { member: self.name }),
        };
        result.ok_or_else(|| self.call_error())
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("declaring", &self.declaring)
            .field("receiver", &self.receiver())
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ConstructorDescriptor

/// A constructor `fn(A) -> T` of a registered type.
///
/// The zero-arity constructor is the parameterless (default) constructor.
pub struct ConstructorDescriptor {
    declaring: Type,
    params: Box<[Type]>,
    visibility: Visibility,
    func: Box<dyn Any + Send + Sync>,
    call: StaticCall,
}

impl ConstructorDescriptor {
    pub fn new<A: MethodArgs, T: Any>(visibility: Visibility, func: fn(A) -> T) -> Self {
        Self {
            declaring: Type::of::<T>(),
            params: A::param_types().into_boxed_slice(),
            visibility,
            func: Box::new(func),
            call: call_static::<A, T>,
        }
    }

    /// The parameterless constructor backed by [`Default`].
    pub fn default_of<T: Any + Default>() -> Self {
        Self::new::<(), T>(Visibility::Public, |()| T::default())
    }

    #[inline]
    pub const fn declaring_type(&self) -> Type {
        self.declaring
    }

    #[inline]
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Returns the function pointer if it is `fn(A) -> T`.
    #[inline]
    pub fn typed<A: MethodArgs, T: Any>(&self) -> Option<fn(A) -> T> {
        self.func.downcast_ref::<fn(A) -> T>().copied()
    }

    /// Invokes the constructor with erased arguments.
    pub fn invoke(&self, args: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, AccessError> {
        (self.call)(&*self.func as &dyn Any, args).ok_or(AccessError::InvocationMismatch {
            method: self.declaring.ident(),
        })
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("declaring", &self.declaring)
            .field("params", &self.params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use core::any::Any;

    use super::{ConstructorDescriptor, MethodArgs, MethodDescriptor, Receiver};
    use crate::access::AccessError;
    use crate::member::Visibility;

    #[derive(Default)]
    struct Greeter {
        greeting: String,
    }

    #[test]
    fn arity_of_tuples() {
        assert_eq!(<() as MethodArgs>::ARITY, 0);
        assert_eq!(<(i32,) as MethodArgs>::ARITY, 1);
        assert_eq!(<(i32, u8, bool, f32) as MethodArgs>::ARITY, 4);
    }

    #[test]
    fn from_values_checks_count_and_types() {
        let ok = <(i32, String)>::from_values(vec![Box::new(1_i32) as Box<dyn Any>, Box::new(String::from("a"))]);
        assert_eq!(ok, Some((1, String::from("a"))));

        let wrong_type = <(i32,)>::from_values(vec![Box::new(1_u8) as Box<dyn Any>]);
        assert_eq!(wrong_type, None);

        let too_many = <()>::from_values(vec![Box::new(1_i32) as Box<dyn Any>]);
        assert_eq!(too_many, None);
    }

    #[test]
    fn void_and_static_methods() {
        let reset = MethodDescriptor::exclusive::<Greeter, (), ()>("reset", Visibility::Public, |g, ()| {
            g.greeting.clear();
        });
        assert!(reset.is_void());

        let make = MethodDescriptor::static_method::<Greeter, (String,), Greeter>(
            "make",
            Visibility::Public,
            |(greeting,)| Greeter { greeting },
        );
        assert_eq!(make.receiver(), Receiver::Static);
        assert!(make.return_type().unwrap().is::<Greeter>());

        let out = make.invoke(None, vec![Box::new(String::from("hi"))]).unwrap();
        assert_eq!(out.downcast_ref::<Greeter>().unwrap().greeting, "hi");
    }

    #[test]
    fn shared_invoke_rejects_exclusive_receivers() {
        let reset = MethodDescriptor::exclusive::<Greeter, (), ()>("reset", Visibility::Public, |g, ()| {
            g.greeting.clear();
        });
        let greeter = Greeter::default();
        assert!(matches!(
            reset.invoke(Some(&greeter), vec![]),
            Err(AccessError::NotWritable { member: "reset" })
        ));
    }

    #[test]
    fn default_constructor() {
        let ctor = ConstructorDescriptor::default_of::<Greeter>();
        assert_eq!(ctor.arity(), 0);
        assert!(ctor.typed::<(), Greeter>().is_some());
        let value = ctor.invoke(vec![]).unwrap();
        assert!(value.downcast_ref::<Greeter>().is_some());
    }
}
