use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ez_utils::TypeIdMap;
use ez_utils::hash::{HashMap, HashSet};

use crate::info::Type;
use crate::member::{MemberDescriptor, MethodDescriptor};
use crate::registry::{BaseInfo, GetTypeMeta, TypeMeta};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of reflected types.
///
/// This struct is the central store for type metadata.
/// [Registering] a type inserts a new [`TypeMeta`] entry built by the type's
/// [`GetTypeMeta`] implementation (generated by
/// [`#[derive(Reflect)]`](crate::derive::Reflect)), then registers its
/// dependencies.
///
/// Types can be looked up by [`TypeId`], by full type path, or by type name
/// when the name is not ambiguous.
///
/// # Example
///
/// ```
/// use ez_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
///
/// let meta = registry.get_with_type_name("String").unwrap();
/// assert_eq!(meta.type_path(), "alloc::string::String");
/// assert!(meta.default_constructor().is_some());
/// ```
///
/// [Registering]: TypeRegistry::register
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    #[inline]
    pub fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
        }
    }

    /// Create a type registry with default registrations for the types
    /// understood by the binary format.
    ///
    /// - `bool`
    /// - `i8 - i64`
    /// - `u8 - u64`
    /// - `f32` `f64`
    /// - `String`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let ty = type_meta.ty();
        let type_name = ty.name();

        // Check for duplicate names.
        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, ty.id());
            }
        }

        type_path_to_id.insert(ty.path(), ty.id());
    }

    // - If key [`TypeId`] has already exist, the function will do nothing and return `false`.
    // - If the key [`TypeId`] does not exist, the function will insert value and return `true`.
    fn register_internal(
        &mut self,
        type_id: TypeId,
        get_type_meta: impl FnOnce() -> TypeMeta,
    ) -> bool {
        self.type_meta_table.try_insert(type_id, || {
            let meta = get_type_meta();
            Self::add_new_type_indices(
                &meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            meta
        })
    }

    /// Insert or **Overwrite** a [`TypeMeta`].
    ///
    /// Name indices are only updated for types that were not registered yet.
    ///
    /// This method will _not_ register type dependencies.
    /// Use [`register`](Self::register) to register a type with its dependencies.
    pub fn insert_type_meta(&mut self, type_meta: TypeMeta) {
        if !self.type_meta_table.contains(&type_meta.type_id()) {
            Self::add_new_type_indices(
                &type_meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
        }
        self.type_meta_table.insert(type_meta.type_id(), type_meta);
    }

    /// Attempts to register the type `T` if it has not yet been registered already.
    ///
    /// This will also recursively register any type dependencies as specified by
    /// [`GetTypeMeta::register_dependencies`]. When deriving `Reflect`, these are
    /// the types of the reflected fields and the base.
    ///
    /// If the meta for type `T` already exists, it will not be registered again
    /// and neither will its type dependencies.
    ///
    /// # Example
    ///
    /// ```
    /// # use core::any::TypeId;
    /// # use ez_reflect::{derive::Reflect, registry::TypeRegistry};
    /// #[derive(Reflect, Default)]
    /// #[reflect(default)]
    /// struct Foo {
    ///   name: Option<String>,
    ///   value: Vec<i32>,
    /// }
    ///
    /// let mut type_registry = TypeRegistry::default();
    /// type_registry.register::<Foo>();
    ///
    /// // The main type
    /// assert!(type_registry.contains(TypeId::of::<Foo>()));
    ///
    /// // Its type dependencies
    /// assert!(type_registry.contains(TypeId::of::<Option<String>>()));
    /// assert!(type_registry.contains(TypeId::of::<Vec<i32>>()));
    /// ```
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.register_internal(TypeId::of::<T>(), T::get_type_meta) {
            log::trace!("registered type `{}`", core::any::type_name::<T>());
            T::register_dependencies(self);
        }
    }

    /// Automatically registers all non-generic types annotated with
    /// `#[reflect(auto_register)]`.
    ///
    /// Equivalent to calling [`register`](Self::register) for each of them.
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration succeeded on the current
    /// platform, `false` otherwise or when the `auto_register` feature is
    /// disabled.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use core::any::TypeId;
    /// # use ez_reflect::{derive::Reflect, registry::TypeRegistry};
    /// #[derive(Reflect, Default)]
    /// #[reflect(default, auto_register)]
    /// struct Foo {
    ///     value: i32,
    /// }
    ///
    /// let mut type_registry = TypeRegistry::empty();
    /// assert!(type_registry.auto_register());
    /// assert!(type_registry.contains(TypeId::of::<Foo>()));
    /// assert!(type_registry.contains(TypeId::of::<i32>()));
    /// ```
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&mut self) -> bool {
        use crate::__macro_exports::auto_register;
        // Reduce the cost of duplicate registrations.
        if self.contains(TypeId::of::<auto_register::__AvailFlag>()) {
            return true;
        }
        auto_register::__register_types(self);
        self.contains(TypeId::of::<auto_register::__AvailFlag>())
    }

    /// Always `false` without the `auto_register` feature.
    #[cfg(not(feature = "auto_register"))]
    #[inline(always)]
    pub fn auto_register(&mut self) -> bool {
        false
    }

    /// Whether the type with given [`TypeId`] has been registered in this registry.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    /// Returns a reference to the [`TypeMeta`] of the type with
    /// the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    /// Returns a mutable reference to the [`TypeMeta`] of the type with
    /// the given [`TypeId`].
    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        self.type_meta_table.get_mut(&type_id)
    }

    /// Returns the [`TypeMeta`] with the given full type path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns the [`TypeMeta`] with the given type name.
    ///
    /// Returns `None` if the name is ambiguous or unknown.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Looks a type up by full path first, then by name.
    pub fn resolve(&self, path_or_name: &str) -> Option<&TypeMeta> {
        self.get_with_type_path(path_or_name)
            .or_else(|| self.get_with_type_name(path_or_name))
    }

    /// Returns `true` if the given type name matches multiple registered types.
    ///
    /// # Example
    /// ```
    /// # use ez_reflect::registry::TypeRegistry;
    /// # mod foo {
    /// #     use ez_reflect::derive::Reflect;
    /// #     #[derive(Reflect)]
    /// #     pub struct MyType;
    /// # }
    /// # mod bar {
    /// #     use ez_reflect::derive::Reflect;
    /// #     #[derive(Reflect)]
    /// #     pub struct MyType;
    /// # }
    /// let mut type_registry = TypeRegistry::default();
    /// type_registry.register::<foo::MyType>();
    /// type_registry.register::<bar::MyType>();
    /// assert_eq!(type_registry.is_ambiguous("MyType"), true);
    /// ```
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Returns an iterator over the [`TypeMeta`]s of the registered types.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    // Base chains -------------------------------------------------------------

    /// Returns the base types of `type_id`, nearest first.
    ///
    /// Stops at the first unregistered base and on cycles.
    pub fn base_chain(&self, type_id: TypeId) -> Vec<Type> {
        let mut chain = Vec::new();
        let mut current = self.get(type_id);
        while let Some(base) = current.and_then(TypeMeta::base) {
            if base.ty().id() == type_id || chain.contains(&base.ty()) {
                break;
            }
            chain.push(base.ty());
            current = self.get(base.ty().id());
        }
        chain
    }

    /// Finds a member on `type_id` or its bases.
    ///
    /// Returns the base projections leading from `type_id` to the declaring
    /// type (empty for own members) and the member.
    pub fn find_member(&self, type_id: TypeId, name: &str) -> Option<(Vec<BaseInfo>, Arc<MemberDescriptor>)> {
        self.find_in_chain(type_id, |meta| meta.member(name).cloned())
    }

    /// Finds a method on `type_id` or its bases, see [`find_member`](Self::find_member).
    pub fn find_method(&self, type_id: TypeId, name: &str) -> Option<(Vec<BaseInfo>, Arc<MethodDescriptor>)> {
        self.find_in_chain(type_id, |meta| meta.method(name).cloned())
    }

    fn find_in_chain<R>(&self, type_id: TypeId, find: impl Fn(&TypeMeta) -> Option<R>) -> Option<(Vec<BaseInfo>, R)> {
        let mut projections = Vec::new();
        let mut meta = self.get(type_id)?;
        loop {
            if let Some(found) = find(meta) {
                return Some((projections, found));
            }
            let base = meta.base()?;
            if projections.len() > self.type_meta_table.len() {
                return None;
            }
            projections.push(base.clone());
            meta = self.get(base.ty().id())?;
        }
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A shareable [`TypeRegistry`], handed to the compiler, the path factory and
/// the serializer.
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `T` unless already present, taking the write lock only when needed.
    pub fn ensure_registered<T: GetTypeMeta>(&self) {
        if !self.read().contains(TypeId::of::<T>()) {
            self.write().register::<T>();
        }
    }
}

impl From<TypeRegistry> for TypeRegistryArc {
    fn from(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }
}

impl core::fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.internal
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .type_path_to_id
            .keys()
            .fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use super::TypeRegistry;
    use crate::info::{TypeInfo, Type};
    use crate::member::{MemberDescriptor, Visibility};
    use crate::registry::{BaseInfo, GetTypeMeta, TypeMeta};

    struct Entity {
        id: u32,
    }

    struct Player {
        base: Entity,
        name: String,
    }

    impl GetTypeMeta for Entity {
        fn get_type_meta() -> TypeMeta {
            let mut meta = TypeMeta::new::<Self>(TypeInfo::Struct);
            meta.push_member(MemberDescriptor::field::<Self, u32>("id", Visibility::Public, |v| &v.id, Some(|v| &mut v.id)));
            meta
        }
    }

    impl GetTypeMeta for Player {
        fn get_type_meta() -> TypeMeta {
            let mut meta = TypeMeta::new::<Self>(TypeInfo::Struct);
            meta.push_member(MemberDescriptor::field::<Self, String>(
                "name",
                Visibility::Public,
                |v| &v.name,
                Some(|v| &mut v.name),
            ));
            meta.set_base(BaseInfo::new::<Self, Entity>(|v| &v.base, |v| &mut v.base));
            meta
        }

        fn register_dependencies(registry: &mut TypeRegistry) {
            registry.register::<Entity>();
            registry.register::<String>();
        }
    }

    #[test]
    fn builtins_are_registered() {
        let registry = TypeRegistry::new();
        assert!(registry.contains(TypeId::of::<i64>()));
        assert!(registry.get_with_type_path("alloc::string::String").is_some());
        assert!(!registry.contains(TypeId::of::<Vec<i64>>()));
    }

    #[test]
    fn register_pulls_dependencies() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Player>();
        assert!(registry.contains(TypeId::of::<Entity>()));
        assert!(registry.contains(TypeId::of::<String>()));
        assert_eq!(registry.base_chain(TypeId::of::<Player>()), [Type::of::<Entity>()]);
    }

    #[test]
    fn find_member_walks_bases() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Player>();

        let (projections, member) = registry.find_member(TypeId::of::<Player>(), "id").unwrap();
        assert_eq!(projections.len(), 1);
        assert_eq!(member.declaring_type(), Type::of::<Entity>());

        let player = Player {
            base: Entity { id: 5 },
            name: String::new(),
        };
        let base = projections[0].project(&player).unwrap();
        let id = member.read(Some(base)).unwrap().take::<u32>();
        assert_eq!(id, Some(5));

        let (projections, _) = registry.find_member(TypeId::of::<Player>(), "name").unwrap();
        assert!(projections.is_empty());
        assert!(registry.find_member(TypeId::of::<Player>(), "missing").is_none());
    }

    #[test]
    fn resolve_by_path_or_name() {
        let mut registry = TypeRegistry::new();
        registry.register::<Player>();
        let by_name = registry.resolve("Player").map(TypeMeta::ty);
        let by_path = registry.resolve(core::any::type_name::<Player>()).map(TypeMeta::ty);
        assert_eq!(by_name, Some(Type::of::<Player>()));
        assert_eq!(by_path, by_name);
    }
}
