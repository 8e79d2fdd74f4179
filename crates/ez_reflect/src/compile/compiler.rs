use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use ez_utils::ReadThroughCache;

use crate::compile::{CompileError, ConstructorInvoker, InstanceGetter, InstanceInvoker};
use crate::compile::{InstanceSetter, StaticGetter, StaticInvoker, StaticSetter};
use crate::info::Type;
use crate::member::{ConstructorDescriptor, FieldAccess, MemberDescriptor, MethodArgs};
use crate::member::{MethodDescriptor, PropertyAccess, Receiver, StaticAccess};
use crate::registry::{GetTypeMeta, TypeRegistryArc};

// -----------------------------------------------------------------------------
// Cache key

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CompileOp {
    Getter,
    Setter,
    Invoker,
    Constructor,
}

/// `(declaring type, member name, operation, compiled closure type)`.
///
/// The closure type encodes every requested static type.
type CompileKey = (TypeId, &'static str, CompileOp, TypeId);

// -----------------------------------------------------------------------------
// ReflectionCompiler

/// Compiles member, method and constructor descriptors into typed closures.
///
/// Every request is validated before the cache is consulted, so an invalid
/// request fails the same way each time. Compiled closures are cached for the
/// lifetime of the compiler and shared between clones of the result.
///
/// # Examples
///
/// ```
/// use ez_reflect::compile::{CompileError, ReflectionCompiler};
/// use ez_reflect::derive::Reflect;
/// use ez_reflect::TypeRegistryArc;
///
/// #[derive(Reflect, Default)]
/// struct Position {
///     pub x: f32,
///     #[reflect(read_only)]
///     pub id: u32,
/// }
///
/// let compiler = ReflectionCompiler::new(TypeRegistryArc::default());
///
/// let get_x = compiler.instance_getter_by_name::<Position, f32>("x").unwrap();
/// let set_x = compiler.instance_setter_by_name::<Position, f32>("x").unwrap();
///
/// let mut pos = Position::default();
/// set_x.set(&mut pos, 2.5);
/// assert_eq!(get_x.get(&pos), 2.5);
///
/// let err = compiler.instance_setter_by_name::<Position, u32>("id").unwrap_err();
/// assert_eq!(err, CompileError::ReadOnly { member: "id" });
/// assert!(err.to_string().contains("read-only"));
/// ```
pub struct ReflectionCompiler {
    registry: TypeRegistryArc,
    allow_non_public: bool,
    cache: ReadThroughCache<CompileKey, Arc<dyn Any + Send + Sync>>,
}

impl ReflectionCompiler {
    /// Creates a compiler that only compiles public setters.
    pub fn new(registry: TypeRegistryArc) -> Self {
        Self {
            registry,
            allow_non_public: false,
            cache: ReadThroughCache::new(),
        }
    }

    /// Permits compiling setters that are not public.
    pub fn with_non_public_access(mut self, allow: bool) -> Self {
        self.allow_non_public = allow;
        self
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        &self.registry
    }

    /// Returns the number of cached closures.
    #[inline]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn cached_or_build<C: Clone + Send + Sync + 'static>(
        &self,
        key: (TypeId, &'static str, CompileOp),
        build: impl FnOnce() -> Result<C, CompileError>,
    ) -> Result<C, CompileError> {
        let key = (key.0, key.1, key.2, TypeId::of::<C>());
        let entry = self.cache.get_or_try_insert_with(key, || {
            let compiled = build()?;
            log::debug!(
                "compiled {:?} `{}` as `{}`",
                key.2,
                key.1,
                core::any::type_name::<C>()
            );
            Ok(Arc::new(compiled) as Arc<dyn Any + Send + Sync>)
        })?;
        // The key contains `TypeId::of::<C>()`.
        match entry.downcast_ref::<C>() {
            Some(compiled) => Ok(compiled.clone()),
            None => Err(CompileError::TypeMismatch {
                member: key.1,
                what: "cached closure",
                expected: core::any::type_name::<C>(),
                actual: "another closure type",
            }),
        }
    }

    // Getters -----------------------------------------------------------------

    /// Compiles a getter for an instance field or property.
    pub fn instance_getter<T: Any, V: Any + Clone>(
        &self,
        member: Option<&MemberDescriptor>,
    ) -> Result<InstanceGetter<T, V>, CompileError> {
        let member = require(member, "instance getter")?;
        require_instance(member)?;
        require_getter(member)?;
        check_member_types::<T, V>(member)?;

        self.cached_or_build(key_of(member, CompileOp::Getter), || {
            if let Some(access) = member.access_as::<FieldAccess<T, V>>() {
                let get = access.getter();
                return Ok(InstanceGetter::new(move |target: &T| get(target).clone()));
            }
            match member.access_as::<PropertyAccess<T, V>>().and_then(PropertyAccess::getter) {
                Some(get) => Ok(InstanceGetter::new(get)),
                None => Err(CompileError::NoGetter { member: member.name() }),
            }
        })
    }

    /// Compiles a getter for a static field or property.
    pub fn static_getter<V: Any>(&self, member: Option<&MemberDescriptor>) -> Result<StaticGetter<V>, CompileError> {
        let member = require(member, "static getter")?;
        require_static(member)?;
        require_getter(member)?;
        check_value_type::<V>(member)?;

        self.cached_or_build(key_of(member, CompileOp::Getter), || {
            match member.access_as::<StaticAccess<V>>().and_then(StaticAccess::getter) {
                Some(get) => Ok(StaticGetter::new(get)),
                None => Err(CompileError::NoGetter { member: member.name() }),
            }
        })
    }

    // Setters -----------------------------------------------------------------

    /// Compiles a setter for an instance field or property.
    pub fn instance_setter<T: Any, V: Any>(
        &self,
        member: Option<&MemberDescriptor>,
    ) -> Result<InstanceSetter<T, V>, CompileError> {
        let member = require(member, "instance setter")?;
        require_instance(member)?;
        self.require_setter(member)?;
        check_member_types::<T, V>(member)?;

        self.cached_or_build(key_of(member, CompileOp::Setter), || {
            if let Some(get_mut) = member.access_as::<FieldAccess<T, V>>().and_then(FieldAccess::mutator) {
                return Ok(InstanceSetter::new(move |target: &mut T, value: V| {
                    *get_mut(target) = value;
                }));
            }
            match member.access_as::<PropertyAccess<T, V>>().and_then(PropertyAccess::setter) {
                Some(set) => Ok(InstanceSetter::new(set)),
                None => Err(CompileError::ReadOnly { member: member.name() }),
            }
        })
    }

    /// Compiles a setter for a static field or property.
    pub fn static_setter<V: Any>(&self, member: Option<&MemberDescriptor>) -> Result<StaticSetter<V>, CompileError> {
        let member = require(member, "static setter")?;
        require_static(member)?;
        self.require_setter(member)?;
        check_value_type::<V>(member)?;

        self.cached_or_build(key_of(member, CompileOp::Setter), || {
            match member.access_as::<StaticAccess<V>>().and_then(StaticAccess::setter) {
                Some(set) => Ok(StaticSetter::new(set)),
                None => Err(CompileError::ReadOnly { member: member.name() }),
            }
        })
    }

    fn require_setter(&self, member: &MemberDescriptor) -> Result<(), CompileError> {
        if !member.can_write() {
            return Err(CompileError::ReadOnly { member: member.name() });
        }
        if !member.setter_visibility().is_public() && !self.allow_non_public {
            return Err(CompileError::NonPublicSetter { member: member.name() });
        }
        Ok(())
    }

    // Invokers ----------------------------------------------------------------

    /// Compiles an invoker for an instance method taking `A` and returning `R`.
    pub fn instance_invoker<T: Any, A: MethodArgs, R: Any>(
        &self,
        method: Option<&MethodDescriptor>,
    ) -> Result<InstanceInvoker<T, A, R>, CompileError> {
        let method = require(method, "instance invoker")?;
        if method.is_static() {
            return Err(CompileError::NotInstance { member: method.name() });
        }
        check_arity::<A>(method)?;
        check_method_types::<A, R>(method, Some(Type::of::<T>()))?;

        self.cached_or_build((method.declaring_type().id(), method.name(), CompileOp::Invoker), || {
            if let Some(func) = method.typed_shared::<T, A, R>() {
                return Ok(InstanceInvoker::new(move |target: &mut T, args: A| func(target, args)));
            }
            match method.typed_exclusive::<T, A, R>() {
                Some(func) => Ok(InstanceInvoker::new(func)),
                None => Err(signature_mismatch::<A, R>(method)),
            }
        })
    }

    /// Compiles an invoker for a void instance method.
    pub fn instance_action<T: Any, A: MethodArgs>(
        &self,
        method: Option<&MethodDescriptor>,
    ) -> Result<InstanceInvoker<T, A, ()>, CompileError> {
        let checked = require(method, "instance action")?;
        if checked.is_static() {
            return Err(CompileError::NotInstance { member: checked.name() });
        }
        require_void(checked)?;
        self.instance_invoker::<T, A, ()>(method)
    }

    /// Compiles an invoker for a static method taking `A` and returning `R`.
    pub fn static_invoker<A: MethodArgs, R: Any>(
        &self,
        method: Option<&MethodDescriptor>,
    ) -> Result<StaticInvoker<A, R>, CompileError> {
        let method = require(method, "static invoker")?;
        if !method.is_static() {
            return Err(CompileError::NotStatic { member: method.name() });
        }
        check_arity::<A>(method)?;
        check_method_types::<A, R>(method, None)?;

        self.cached_or_build((method.declaring_type().id(), method.name(), CompileOp::Invoker), || {
            match method.typed_static::<A, R>() {
                Some(func) => Ok(StaticInvoker::new(func)),
                None => Err(signature_mismatch::<A, R>(method)),
            }
        })
    }

    /// Compiles an invoker for a void static method.
    pub fn static_action<A: MethodArgs>(
        &self,
        method: Option<&MethodDescriptor>,
    ) -> Result<StaticInvoker<A, ()>, CompileError> {
        let checked = require(method, "static action")?;
        if !checked.is_static() {
            return Err(CompileError::NotStatic { member: checked.name() });
        }
        require_void(checked)?;
        self.static_invoker::<A, ()>(method)
    }

    /// Compiles a constructor of `T` taking `A`.
    pub fn constructor<A: MethodArgs, T: Any>(
        &self,
        constructor: Option<&ConstructorDescriptor>,
    ) -> Result<ConstructorInvoker<A, T>, CompileError> {
        let constructor = require(constructor, "constructor")?;
        if constructor.arity() != A::ARITY {
            return Err(CompileError::ArityMismatch {
                method: "constructor",
                expected: A::ARITY,
                actual: constructor.arity(),
            });
        }
        check_type("constructor", "declaring type", Type::of::<T>(), constructor.declaring_type())?;

        self.cached_or_build((constructor.declaring_type().id(), "", CompileOp::Constructor), || {
            match constructor.typed::<A, T>() {
                Some(func) => Ok(ConstructorInvoker::new(func)),
                None => Err(CompileError::TypeMismatch {
                    member: "constructor",
                    what: "parameters",
                    expected: core::any::type_name::<A>(),
                    actual: "another parameter list",
                }),
            }
        })
    }

    // By name -----------------------------------------------------------------

    fn find_member<T: GetTypeMeta>(&self, name: &'static str) -> Result<Arc<MemberDescriptor>, CompileError> {
        self.registry.ensure_registered::<T>();
        let registry = self.registry.read();
        registry
            .get(TypeId::of::<T>())
            .and_then(|meta| meta.member(name).cloned())
            .ok_or(CompileError::MemberNotFound {
                ty: core::any::type_name::<T>(),
                kind: "member",
                member: name,
            })
    }

    fn find_method<T: GetTypeMeta>(&self, name: &'static str) -> Result<Arc<MethodDescriptor>, CompileError> {
        self.registry.ensure_registered::<T>();
        let registry = self.registry.read();
        registry
            .get(TypeId::of::<T>())
            .and_then(|meta| meta.method(name).cloned())
            .ok_or(CompileError::MemberNotFound {
                ty: core::any::type_name::<T>(),
                kind: "method",
                member: name,
            })
    }

    /// Looks up a member declared on `T` and compiles its getter.
    pub fn instance_getter_by_name<T: GetTypeMeta, V: Any + Clone>(
        &self,
        name: &'static str,
    ) -> Result<InstanceGetter<T, V>, CompileError> {
        let member = self.find_member::<T>(name)?;
        self.instance_getter(Some(&*member))
    }

    pub fn instance_setter_by_name<T: GetTypeMeta, V: Any>(
        &self,
        name: &'static str,
    ) -> Result<InstanceSetter<T, V>, CompileError> {
        let member = self.find_member::<T>(name)?;
        self.instance_setter(Some(&*member))
    }

    /// Looks up a static member declared on `T` and compiles its getter.
    pub fn static_getter_by_name<T: GetTypeMeta, V: Any>(
        &self,
        name: &'static str,
    ) -> Result<StaticGetter<V>, CompileError> {
        let member = self.find_member::<T>(name)?;
        self.static_getter(Some(&*member))
    }

    pub fn static_setter_by_name<T: GetTypeMeta, V: Any>(
        &self,
        name: &'static str,
    ) -> Result<StaticSetter<V>, CompileError> {
        let member = self.find_member::<T>(name)?;
        self.static_setter(Some(&*member))
    }

    pub fn instance_invoker_by_name<T: GetTypeMeta, A: MethodArgs, R: Any>(
        &self,
        name: &'static str,
    ) -> Result<InstanceInvoker<T, A, R>, CompileError> {
        let method = self.find_method::<T>(name)?;
        self.instance_invoker(Some(&*method))
    }

    pub fn static_invoker_by_name<T: GetTypeMeta, A: MethodArgs, R: Any>(
        &self,
        name: &'static str,
    ) -> Result<StaticInvoker<A, R>, CompileError> {
        let method = self.find_method::<T>(name)?;
        self.static_invoker(Some(&*method))
    }

    /// Compiles the constructor of `T` whose parameters are `A`.
    pub fn constructor_of<A: MethodArgs, T: GetTypeMeta>(&self) -> Result<ConstructorInvoker<A, T>, CompileError> {
        self.registry.ensure_registered::<T>();
        let constructor = {
            let registry = self.registry.read();
            let params = A::param_types();
            registry
                .get(TypeId::of::<T>())
                .and_then(|meta| meta.constructors().iter().find(|c| c.params() == params.as_slice()).cloned())
        };
        match constructor {
            Some(constructor) => self.constructor(Some(&*constructor)),
            None => Err(CompileError::ConstructorNotFound {
                ty: core::any::type_name::<T>(),
                params: core::any::type_name::<A>(),
            }),
        }
    }
}

impl fmt::Debug for ReflectionCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionCompiler")
            .field("allow_non_public", &self.allow_non_public)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Checks

fn require<'a, D>(descriptor: Option<&'a D>, operation: &'static str) -> Result<&'a D, CompileError> {
    descriptor.ok_or(CompileError::NullDescriptor { operation })
}

#[inline]
fn key_of(member: &MemberDescriptor, op: CompileOp) -> (TypeId, &'static str, CompileOp) {
    (member.declaring_type().id(), member.name(), op)
}

fn require_instance(member: &MemberDescriptor) -> Result<(), CompileError> {
    if member.is_static() {
        return Err(CompileError::NotInstance { member: member.name() });
    }
    Ok(())
}

fn require_static(member: &MemberDescriptor) -> Result<(), CompileError> {
    if !member.is_static() {
        return Err(CompileError::NotStatic { member: member.name() });
    }
    Ok(())
}

fn require_getter(member: &MemberDescriptor) -> Result<(), CompileError> {
    if !member.can_read() {
        return Err(CompileError::NoGetter { member: member.name() });
    }
    Ok(())
}

fn require_void(method: &MethodDescriptor) -> Result<(), CompileError> {
    match method.return_type() {
        None => Ok(()),
        Some(ty) => Err(CompileError::NotVoid {
            method: method.name(),
            return_type: ty.path(),
        }),
    }
}

fn check_arity<A: MethodArgs>(method: &MethodDescriptor) -> Result<(), CompileError> {
    if method.arity() != A::ARITY {
        return Err(CompileError::ArityMismatch {
            method: method.name(),
            expected: A::ARITY,
            actual: method.arity(),
        });
    }
    Ok(())
}

fn check_type(member: &'static str, what: &'static str, expected: Type, actual: Type) -> Result<(), CompileError> {
    if expected == actual {
        return Ok(());
    }
    Err(CompileError::TypeMismatch {
        member,
        what,
        expected: expected.path(),
        actual: actual.path(),
    })
}

fn check_value_type<V: Any>(member: &MemberDescriptor) -> Result<(), CompileError> {
    check_type(member.name(), "value type", Type::of::<V>(), member.value_type())
}

fn check_member_types<T: Any, V: Any>(member: &MemberDescriptor) -> Result<(), CompileError> {
    check_type(member.name(), "declaring type", Type::of::<T>(), member.declaring_type())?;
    check_value_type::<V>(member)
}

fn check_method_types<A: MethodArgs, R: Any>(method: &MethodDescriptor, declaring: Option<Type>) -> Result<(), CompileError> {
    if let Some(declaring) = declaring {
        check_type(method.name(), "declaring type", declaring, method.declaring_type())?;
    }
    for (expected, actual) in A::param_types().into_iter().zip(method.params()) {
        check_type(method.name(), "parameter type", expected, *actual)?;
    }
    let ret = method.return_type().unwrap_or_else(Type::of::<()>);
    check_type(method.name(), "return type", Type::of::<R>(), ret)
}

fn signature_mismatch<A: MethodArgs, R: Any>(method: &MethodDescriptor) -> CompileError {
    let receiver = match method.receiver() {
        Receiver::Shared => "shared receiver",
        Receiver::Exclusive => "exclusive receiver",
        Receiver::Static => "static signature",
    };
    CompileError::TypeMismatch {
        member: method.name(),
        what: receiver,
        expected: core::any::type_name::<fn(A) -> R>(),
        actual: "another signature",
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use core::any::TypeId;
    use std::sync::atomic::{AtomicI32, Ordering};

    use super::ReflectionCompiler;
    use crate::compile::CompileError;
    use crate::info::TypeInfo;
    use crate::member::{ConstructorDescriptor, MemberDescriptor, MethodDescriptor, Visibility};
    use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistryArc};

    static COUNTER: AtomicI32 = AtomicI32::new(0);

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    struct Vec2 {
        x: f32,
        y: f32,
    }

    #[derive(Default)]
    struct Unit {
        name: String,
        hp: i32,
        level: u8,
    }

    impl Unit {
        fn hp(&self) -> i32 {
            self.hp
        }
    }

    impl GetTypeMeta for Vec2 {
        fn get_type_meta() -> TypeMeta {
            let mut meta = TypeMeta::new::<Self>(TypeInfo::Struct);
            meta.push_member(MemberDescriptor::field::<Self, f32>("x", Visibility::Public, |v| &v.x, Some(|v| &mut v.x)));
            meta.push_member(MemberDescriptor::field::<Self, f32>("y", Visibility::Public, |v| &v.y, Some(|v| &mut v.y)));
            meta
        }
    }

    impl GetTypeMeta for Unit {
        fn get_type_meta() -> TypeMeta {
            let mut meta = TypeMeta::new::<Self>(TypeInfo::Struct);
            meta.push_member(MemberDescriptor::field::<Self, String>("name", Visibility::Public, |u| &u.name, None));
            meta.push_member(MemberDescriptor::field::<Self, u8>(
                "level",
                Visibility::NonPublic,
                |u| &u.level,
                Some(|u| &mut u.level),
            ));
            meta.push_member(MemberDescriptor::property::<Self, i32>("hp", Visibility::Public, None, Some(|u, v| u.hp = v)));
            meta.push_member(MemberDescriptor::static_property::<Self, i32>(
                "counter",
                Visibility::Public,
                Some(|| COUNTER.load(Ordering::Relaxed)),
                Some(|v| COUNTER.store(v, Ordering::Relaxed)),
            ));
            meta.push_method(MethodDescriptor::shared::<Self, (), i32>("current_hp", Visibility::Public, |u, ()| u.hp()));
            meta.push_method(MethodDescriptor::exclusive::<Self, (i32,), ()>("heal", Visibility::Public, |u, (n,)| {
                u.hp += n;
            }));
            meta.push_method(MethodDescriptor::static_method::<Self, (i32, i32), i32>(
                "sum",
                Visibility::Public,
                |(a, b)| a + b,
            ));
            meta.push_constructor(ConstructorDescriptor::default_of::<Self>());
            meta.push_constructor(ConstructorDescriptor::new::<(String,), Self>(Visibility::Public, |(name,)| Unit {
                name,
                ..Unit::default()
            }));
            meta
        }
    }

    fn compiler() -> ReflectionCompiler {
        ReflectionCompiler::new(TypeRegistryArc::default())
    }

    #[test]
    fn null_descriptor_fails_first() {
        let err = compiler().instance_setter::<Unit, i32>(None).unwrap_err();
        assert!(matches!(err, CompileError::NullDescriptor { .. }));
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn read_only_and_not_static_messages() {
        let compiler = compiler();
        let err = compiler.instance_setter_by_name::<Unit, String>("name").unwrap_err();
        assert!(err.to_string().contains("read-only"));

        let err = compiler.static_getter_by_name::<Unit, String>("name").unwrap_err();
        assert!(err.to_string().contains("not static"));

        let err = compiler.instance_getter_by_name::<Unit, i32>("counter").unwrap_err();
        assert_eq!(err, CompileError::NotInstance { member: "counter" });
    }

    #[test]
    fn validation_order() {
        let compiler = compiler();
        // Read-only wins over the type mismatch.
        let err = compiler.instance_setter_by_name::<Unit, f64>("name").unwrap_err();
        assert!(matches!(err, CompileError::ReadOnly { .. }));

        let err = compiler.instance_setter_by_name::<Unit, u8>("level").unwrap_err();
        assert_eq!(err, CompileError::NonPublicSetter { member: "level" });

        let err = compiler.instance_getter_by_name::<Unit, i32>("hp").unwrap_err();
        assert_eq!(err, CompileError::NoGetter { member: "hp" });

        let err = compiler.instance_getter_by_name::<Unit, i64>("name").unwrap_err();
        assert!(matches!(err, CompileError::TypeMismatch { what: "value type", .. }));
    }

    #[test]
    fn non_public_access_can_be_permitted() {
        let compiler = compiler().with_non_public_access(true);
        let set_level = compiler.instance_setter_by_name::<Unit, u8>("level").unwrap();
        let mut unit = Unit::default();
        set_level.set(&mut unit, 7);
        assert_eq!(unit.level, 7);
    }

    #[test]
    fn struct_fields_mutate_by_reference() {
        let compiler = compiler();
        let get_y = compiler.instance_getter_by_name::<Vec2, f32>("y").unwrap();
        let set_y = compiler.instance_setter_by_name::<Vec2, f32>("y").unwrap();

        let mut v = Vec2 { x: 1.0, y: 2.0 };
        set_y.set(&mut v, 5.0);
        assert_eq!(get_y.get(&v), 5.0);
        assert_eq!(v, Vec2 { x: 1.0, y: 5.0 });
    }

    #[test]
    fn static_property_round_trip() {
        let compiler = compiler();
        let get = compiler.static_getter_by_name::<Unit, i32>("counter").unwrap();
        let set = compiler.static_setter_by_name::<Unit, i32>("counter").unwrap();
        set.set(11);
        assert_eq!(get.get(), 11);
    }

    #[test]
    fn invokers() {
        let compiler = compiler();
        let mut unit = Unit { hp: 3, ..Unit::default() };

        compiler.registry().ensure_registered::<Unit>();
        let heal = {
            let registry = compiler.registry().read();
            let method = registry.get(TypeId::of::<Unit>()).and_then(|m| m.method("heal"));
            compiler.instance_action::<Unit, (i32,)>(method.map(|m| &**m)).unwrap()
        };
        heal.invoke(&mut unit, (4,));

        let current = compiler.instance_invoker_by_name::<Unit, (), i32>("current_hp").unwrap();
        assert_eq!(current.invoke(&mut unit, ()), 7);

        let sum = compiler.static_invoker_by_name::<Unit, (i32, i32), i32>("sum").unwrap();
        assert_eq!(sum.invoke((2, 3)), 5);

        let err = compiler.static_invoker_by_name::<Unit, (i32,), i32>("sum").unwrap_err();
        assert_eq!(
            err,
            CompileError::ArityMismatch {
                method: "sum",
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn void_invokers_reject_values() {
        let compiler = compiler();
        let registry = compiler.registry().clone();
        registry.ensure_registered::<Unit>();
        let registry = registry.read();
        let meta = registry.get(TypeId::of::<Unit>()).unwrap();

        let err = compiler.instance_action::<Unit, ()>(meta.method("current_hp").map(|m| &**m)).unwrap_err();
        assert!(matches!(err, CompileError::NotVoid { method: "current_hp", .. }));

        let err = compiler.static_action::<(i32, i32)>(meta.method("heal").map(|m| &**m)).unwrap_err();
        assert!(matches!(err, CompileError::NotStatic { .. }));
    }

    #[test]
    fn constructors_and_cache() {
        let compiler = compiler();
        let new = compiler.constructor_of::<(String,), Unit>().unwrap();
        assert_eq!(new.invoke(("ada".into(),)).name, "ada");

        let again = compiler.constructor_of::<(String,), Unit>().unwrap();
        assert!(new.ptr_eq(&again));

        let first = compiler.instance_getter_by_name::<Vec2, f32>("x").unwrap();
        let second = compiler.instance_getter_by_name::<Vec2, f32>("x").unwrap();
        assert!(first.ptr_eq(&second));

        assert!(compiler.constructor_of::<(i32,), Unit>().is_err());
    }
}
