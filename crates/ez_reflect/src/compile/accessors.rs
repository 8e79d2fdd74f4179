use alloc::sync::Arc;
use core::fmt;

// -----------------------------------------------------------------------------
// Compiled closures

macro_rules! compiled {
    (
        $(#[$meta:meta])*
        $name:ident<$($param:ident),*>: Fn($($arg:ty),*) $(-> $ret:ty)?;
        fn $call:ident($($arg_name:ident),*);
    ) => {
        $(#[$meta])*
        pub struct $name<$($param),*>(Arc<dyn Fn($($arg),*) $(-> $ret)? + Send + Sync>);

        impl<$($param),*> $name<$($param),*> {
            pub(crate) fn new(func: impl Fn($($arg),*) $(-> $ret)? + Send + Sync + 'static) -> Self {
                Self(Arc::new(func))
            }

            #[inline]
            pub fn $call(&self, $($arg_name: $arg),*) $(-> $ret)? {
                (self.0)($($arg_name),*)
            }

            /// Returns `true` if both handles share one compiled closure.
            #[inline]
            pub fn ptr_eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0)
            }
        }

        impl<$($param),*> Clone for $name<$($param),*> {
            #[inline]
            fn clone(&self) -> Self {
                Self(self.0.clone())
            }
        }

        impl<$($param),*> fmt::Debug for $name<$($param),*> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}

compiled! {
    /// Reads a field or property of a `T`.
    InstanceGetter<T, V>: Fn(&T) -> V;
    fn get(target);
}

compiled! {
    /// Writes a field or property of a `T` in place.
    ///
    /// The target is taken by exclusive reference, so the mutation is visible
    /// to the caller for value types too.
    InstanceSetter<T, V>: Fn(&mut T, V);
    fn set(target, value);
}

compiled! {
    /// Reads a static field or property.
    StaticGetter<V>: Fn() -> V;
    fn get();
}

compiled! {
    /// Writes a static field or property.
    StaticSetter<V>: Fn(V);
    fn set(value);
}

compiled! {
    /// Calls an instance method with an argument tuple `A`.
    ///
    /// Shared-receiver methods are reborrowed, so one invoker type covers
    /// both receivers.
    InstanceInvoker<T, A, R>: Fn(&mut T, A) -> R;
    fn invoke(target, args);
}

compiled! {
    /// Calls a static method with an argument tuple `A`.
    StaticInvoker<A, R>: Fn(A) -> R;
    fn invoke(args);
}

compiled! {
    /// Calls a constructor of `T` with an argument tuple `A`.
    ConstructorInvoker<A, T>: Fn(A) -> T;
    fn invoke(args);
}

#[cfg(test)]
mod tests {
    use super::{InstanceSetter, StaticInvoker};

    #[derive(Clone, Copy)]
    struct Point {
        x: i32,
    }

    #[test]
    fn setter_mutates_in_place() {
        let set_x = InstanceSetter::<Point, i32>::new(|p, v| p.x = v);
        let mut point = Point { x: 1 };
        set_x.set(&mut point, 9);
        assert_eq!(point.x, 9);
    }

    #[test]
    fn clones_share_the_closure() {
        let double = StaticInvoker::<(i32,), i32>::new(|(v,)| v * 2);
        let other = double.clone();
        assert!(double.ptr_eq(&other));
        assert_eq!(other.invoke((21,)), 42);
    }
}
