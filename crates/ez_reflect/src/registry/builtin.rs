use alloc::string::String;
use alloc::vec::Vec;

use crate::info::{Generics, ListInfo, OptionInfo, PrimitiveKind};
use crate::info::{TypeFlags, TypeInfo, TypeParamInfo, UnmanagedInfo};
use crate::member::ConstructorDescriptor;
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};

// -----------------------------------------------------------------------------
// Primitives

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::new::<$ty>(TypeInfo::Primitive(PrimitiveKind::$kind))
                    .with_flags(TypeFlags::VALUE_TYPE);
                meta.set_unmanaged(UnmanagedInfo::of::<$ty>());
                meta.push_constructor(ConstructorDescriptor::default_of::<$ty>());
                meta
            }
        }
    )*};
}

impl_primitive!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
);

impl GetTypeMeta for String {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::new::<String>(TypeInfo::Primitive(PrimitiveKind::String));
        meta.push_constructor(ConstructorDescriptor::default_of::<String>());
        meta
    }
}

// -----------------------------------------------------------------------------
// Containers

impl<T: GetTypeMeta> GetTypeMeta for Vec<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::new::<Vec<T>>(TypeInfo::List(ListInfo::of_vec::<T>()));
        meta.set_generics(Generics::new().with(TypeParamInfo::new::<T>("T")));
        meta.push_constructor(ConstructorDescriptor::default_of::<Vec<T>>());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

impl<T: GetTypeMeta> GetTypeMeta for Option<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::new::<Option<T>>(TypeInfo::Option(OptionInfo::of::<T>()))
            .with_flags(TypeFlags::VALUE_TYPE);
        meta.set_generics(Generics::new().with(TypeParamInfo::new::<T>("T")));
        meta.push_constructor(ConstructorDescriptor::default_of::<Option<T>>());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use crate::info::{PrimitiveKind, Type, TypeFlags};
    use crate::registry::TypeRegistry;

    #[test]
    fn primitive_metadata() {
        let registry = TypeRegistry::new();
        let meta = registry.get(TypeId::of::<u16>()).unwrap();
        assert_eq!(meta.info().as_primitive(), Some(PrimitiveKind::U16));
        assert!(meta.flags().contains(TypeFlags::VALUE_TYPE | TypeFlags::UNMANAGED));
        assert_eq!(meta.unmanaged().map(|u| u.size()), Some(2));

        let value = meta.default_constructor().unwrap().invoke(Vec::new()).unwrap();
        assert_eq!(value.downcast_ref::<u16>(), Some(&0));

        let meta = registry.get(TypeId::of::<String>()).unwrap();
        assert!(meta.flags().contains(TypeFlags::REFERENCE_TYPE));
        assert!(meta.unmanaged().is_none());
    }

    #[test]
    fn containers_carry_generics() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Option<Vec<i32>>>();

        let meta = registry.get(TypeId::of::<Option<Vec<i32>>>()).unwrap();
        assert_eq!(meta.generics().get("T").map(|p| p.ty()), Some(Type::of::<Vec<i32>>()));
        assert_eq!(meta.info().as_option().map(|o| o.inner()), Some(Type::of::<Vec<i32>>()));

        let list = registry.get(TypeId::of::<Vec<i32>>()).unwrap();
        assert_eq!(list.info().as_list().map(|l| l.element()), Some(Type::of::<i32>()));
        assert!(registry.contains(TypeId::of::<i32>()));
    }
}
