//! Items used by the code generated by `ez_reflect_derive`. Not public API.

// -----------------------------------------------------------------------------
// auto_register

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::info::TypeInfo;
    use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};

    /// A registration function submitted by `#[reflect(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    /// Marker type, registered last-in-order when the platform supports
    /// `inventory`.
    pub struct __AvailFlag;

    impl GetTypeMeta for __AvailFlag {
        fn get_type_meta() -> TypeMeta {
            TypeMeta::new::<Self>(TypeInfo::Opaque)
        }
    }

    fn register_avail_flag(registry: &mut TypeRegistry) {
        registry.register::<__AvailFlag>();
    }

    inventory::submit! {
        __AutoRegisterFunc(register_avail_flag)
    }

    /// Runs every submitted registration function.
    pub fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }

    /// Gives generated code a plain `fn` pointer for any `GetTypeMeta` type.
    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: GetTypeMeta> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }
}
