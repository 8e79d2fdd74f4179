use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use ez_utils::ReadThroughCache;

use crate::access::literal::{Literal, to_values};
use crate::access::{AccessError, MemberPath, PathError, Segment};
use crate::info::Type;
use crate::member::{MemberDescriptor, MethodDescriptor, Receiver};
use crate::registry::{BaseInfo, GetTypeMeta, TypeRegistry, TypeRegistryArc};

// -----------------------------------------------------------------------------
// Plan

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PathOp {
    Get,
    Set,
    Invoke,
}

impl fmt::Display for PathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "getter",
            Self::Set => "setter",
            Self::Invoke => "invoker",
        })
    }
}

enum Step {
    Member {
        bases: Box<[BaseInfo]>,
        member: Arc<MemberDescriptor>,
    },
    Method {
        bases: Box<[BaseInfo]>,
        method: Arc<MethodDescriptor>,
        args: Box<[Literal]>,
    },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Self::Member { member, .. } => member.name(),
            Self::Method { method, .. } => method.name(),
        }
    }
}

/// A validated path, shared by every typed accessor built from it.
struct PathPlan {
    steps: Box<[Step]>,
    /// Walk intermediate members mutably and write temporaries back.
    mutable: bool,
    /// The terminal result is dropped instead of returned.
    discard: bool,
}

type PlanKey = (Option<TypeId>, Box<str>, PathOp, TypeId);

fn resolve_plan(
    registry: &TypeRegistry,
    source: &str,
    instance: Option<Type>,
    op: PathOp,
    output: Type,
) -> Result<PathPlan, PathError> {
    let path = MemberPath::parse(source)?;

    let (mut current, static_root) = match (path.root(), instance) {
        (Some(name), _) => match registry.resolve(name) {
            Some(meta) => (meta.ty(), true),
            None => return Err(PathError::UnknownType { name: name.into() }),
        },
        (None, Some(ty)) => (ty, false),
        (None, None) => return Err(PathError::MissingStaticRoot { path: source.into() }),
    };

    let last = path.len() - 1;
    let mut steps = Vec::with_capacity(path.len());
    let mut discard = false;

    for (index, segment) in path.segments().iter().enumerate() {
        let terminal = index == last;
        let needs_static = index == 0 && static_root;

        if segment.is_call() {
            let (bases, method) = registry
                .find_method(current.id(), segment.name)
                .ok_or_else(|| not_found(current, segment))?;
            if !terminal {
                return Err(PathError::MethodNotTerminal { method: method.name() });
            }
            if needs_static && !method.is_static() {
                return Err(PathError::NotStatic { member: method.name() });
            }
            let args = convert_args(&method, segment)?;
            match op {
                PathOp::Get => {
                    if method.receiver() == Receiver::Exclusive {
                        return Err(PathError::ExclusiveReceiver { method: method.name() });
                    }
                    let Some(ret) = method.return_type() else {
                        return Err(PathError::VoidMethod { method: method.name() });
                    };
                    check_type(method.name(), output, ret)?;
                }
                PathOp::Set => return Err(PathError::NotWritable { member: method.name() }),
                PathOp::Invoke => {
                    discard = output.is::<()>();
                    if !discard {
                        let ret = method.return_type().unwrap_or_else(Type::of::<()>);
                        check_type(method.name(), output, ret)?;
                    }
                }
            }
            steps.push(Step::Method {
                bases: bases.into_boxed_slice(),
                method,
                args,
            });
            continue;
        }

        let (bases, member) = registry
            .find_member(current.id(), segment.name)
            .ok_or_else(|| not_found(current, segment))?;
        if needs_static && !member.is_static() {
            return Err(PathError::NotStatic { member: member.name() });
        }
        if !member.can_read() && !(terminal && op == PathOp::Set) {
            return Err(PathError::NotReadable { member: member.name() });
        }

        if terminal {
            match op {
                PathOp::Get => check_type(member.name(), output, member.value_type())?,
                PathOp::Set => {
                    if !member.can_write() {
                        return Err(PathError::NotWritable { member: member.name() });
                    }
                    check_type(member.name(), output, member.value_type())?;
                }
                PathOp::Invoke => return Err(PathError::NotInvokable { member: member.name() }),
            }
        } else {
            current = member.value_type();
            if !registry.contains(current.id()) {
                return Err(PathError::UnknownType { name: current.path().into() });
            }
        }

        steps.push(Step::Member {
            bases: bases.into_boxed_slice(),
            member,
        });
    }

    let mutable = match (op, steps.last()) {
        (PathOp::Set, _) => true,
        (PathOp::Invoke, Some(Step::Method { method, .. })) => method.receiver() == Receiver::Exclusive,
        _ => false,
    };

    if mutable {
        for step in &steps[..last] {
            if let Step::Member { member, .. } = step
                && !member.can_borrow_mut()
                && !member.can_write()
            {
                return Err(PathError::NotWritable { member: member.name() });
            }
        }
    }

    Ok(PathPlan {
        steps: steps.into_boxed_slice(),
        mutable,
        discard,
    })
}

fn not_found(ty: Type, segment: &Segment<'_>) -> PathError {
    PathError::MemberNotFound {
        ty: ty.path(),
        member: segment.name.into(),
    }
}

fn check_type(member: &'static str, expected: Type, actual: Type) -> Result<(), PathError> {
    if expected == actual {
        Ok(())
    } else {
        Err(PathError::TypeMismatch {
            member,
            expected: expected.path(),
            actual: actual.path(),
        })
    }
}

fn convert_args(method: &MethodDescriptor, segment: &Segment<'_>) -> Result<Box<[Literal]>, PathError> {
    let args = segment.call.as_deref().unwrap_or_default();
    if args.len() != method.arity() {
        return Err(PathError::ArgumentCount {
            method: method.name(),
            expected: method.arity(),
            actual: args.len(),
        });
    }
    args.iter()
        .zip(method.params())
        .enumerate()
        .map(|(index, (arg, ty))| {
            Literal::convert(arg, *ty).ok_or(PathError::ArgumentMismatch {
                method: method.name(),
                index,
                expected: ty.path(),
            })
        })
        .collect()
}

// -----------------------------------------------------------------------------
// Walks

fn project<'a>(bases: &[BaseInfo], target: &'a dyn Any, member: &'static str) -> Result<&'a dyn Any, AccessError> {
    bases.iter().try_fold(target, |value, base| {
        base.project(value).ok_or(AccessError::TargetMismatch {
            member,
            expected: base.ty().path(),
        })
    })
}

fn project_mut<'a>(
    bases: &[BaseInfo],
    target: &'a mut dyn Any,
    member: &'static str,
) -> Result<&'a mut dyn Any, AccessError> {
    let mut value = target;
    for base in bases {
        value = base.project_mut(value).ok_or(AccessError::TargetMismatch {
            member,
            expected: base.ty().path(),
        })?;
    }
    Ok(value)
}

fn shared_target<'a>(
    bases: &[BaseInfo],
    is_static: bool,
    target: Option<&'a dyn Any>,
    member: &'static str,
) -> Result<Option<&'a dyn Any>, AccessError> {
    match (is_static, target) {
        (true, _) => Ok(None),
        (false, Some(target)) => project(bases, target, member).map(Some),
        (false, None) => Err(AccessError::MissingTarget { member }),
    }
}

fn exclusive_target<'a>(
    bases: &[BaseInfo],
    is_static: bool,
    target: Option<&'a mut dyn Any>,
    member: &'static str,
) -> Result<Option<&'a mut dyn Any>, AccessError> {
    match (is_static, target) {
        (true, _) => Ok(None),
        (false, Some(target)) => project_mut(bases, target, member).map(Some),
        (false, None) => Err(AccessError::MissingTarget { member }),
    }
}

/// Walks `steps` by shared reference and hands the final value to `out`.
///
/// Owned temporaries produced by properties live on the stack of the walk.
fn read_chain(
    steps: &[Step],
    target: Option<&dyn Any>,
    out: &mut dyn FnMut(&dyn Any) -> Result<(), AccessError>,
) -> Result<(), AccessError> {
    let Some((step, rest)) = steps.split_first() else {
        return Ok(());
    };
    match step {
        Step::Member { bases, member } => {
            let target = shared_target(bases, member.is_static(), target, member.name())?;
            let value = member.read(target)?;
            read_next(rest, value.as_any(), out)
        }
        Step::Method { bases, method, args } => {
            let target = shared_target(bases, method.is_static(), target, method.name())?;
            let result = method.invoke(target, to_values(args))?;
            read_next(rest, &*result, out)
        }
    }
}

#[inline]
fn read_next(
    rest: &[Step],
    value: &dyn Any,
    out: &mut dyn FnMut(&dyn Any) -> Result<(), AccessError>,
) -> Result<(), AccessError> {
    if rest.is_empty() {
        out(value)
    } else {
        read_chain(rest, Some(value), out)
    }
}

/// Walks `steps` by exclusive reference and hands the last step and its
/// target to `out`.
///
/// Fields are borrowed in place. Properties and static members are read
/// into a temporary, which is written back after `out` returns.
fn write_chain(
    steps: &[Step],
    target: Option<&mut dyn Any>,
    out: &mut dyn FnMut(&Step, Option<&mut dyn Any>) -> Result<(), AccessError>,
) -> Result<(), AccessError> {
    let Some((step, rest)) = steps.split_first() else {
        return Ok(());
    };
    if rest.is_empty() {
        return out(step, target);
    }
    let Step::Member { bases, member } = step else {
        return Err(AccessError::InvocationMismatch { method: step.name() });
    };
    let name = member.name();

    if member.is_static() {
        let Some(mut temp) = member.read(None)?.into_owned() else {
            return Err(AccessError::NotWritable { member: name });
        };
        write_chain(rest, Some(&mut *temp), out)?;
        return member.write(None, temp);
    }

    let Some(target) = target else {
        return Err(AccessError::MissingTarget { member: name });
    };
    let target = project_mut(bases, target, name)?;

    if member.can_borrow_mut() {
        let inner = member.read_mut(target)?;
        write_chain(rest, Some(inner), out)
    } else {
        let Some(mut temp) = member.read(Some(&*target))?.into_owned() else {
            return Err(AccessError::NotWritable { member: name });
        };
        write_chain(rest, Some(&mut *temp), out)?;
        member.write(Some(target), temp)
    }
}

impl PathPlan {
    fn get<V: Any + Clone>(&self, target: Option<&dyn Any>) -> Result<V, AccessError> {
        let mut result = None;
        read_chain(&self.steps, target, &mut |value| {
            result = value.downcast_ref::<V>().cloned();
            Ok(())
        })?;
        result.ok_or_else(|| self.value_mismatch::<V>())
    }

    fn set<V: Any>(&self, target: Option<&mut dyn Any>, value: V) -> Result<(), AccessError> {
        let mut value = Some(Box::new(value) as Box<dyn Any>);
        write_chain(&self.steps, target, &mut |step, target| {
            let Step::Member { bases, member } = step else {
                return Err(AccessError::NotWritable { member: step.name() });
            };
            let target = exclusive_target(bases, member.is_static(), target, member.name())?;
            match value.take() {
                Some(value) => member.write(target, value),
                None => Err(AccessError::NotWritable { member: member.name() }),
            }
        })
    }

    fn invoke<R: Any>(&self, target: Option<&mut dyn Any>) -> Result<R, AccessError> {
        let mut result: Option<Box<dyn Any>> = None;
        if self.mutable {
            write_chain(&self.steps, target, &mut |step, target| {
                let Step::Method { bases, method, args } = step else {
                    return Err(AccessError::InvocationMismatch { method: step.name() });
                };
                let target = exclusive_target(bases, method.is_static(), target, method.name())?;
                result = Some(method.invoke_mut(target, to_values(args))?);
                Ok(())
            })?;
        } else {
            let target = target.as_deref();
            let Some((last, init)) = self.steps.split_last() else {
                return Err(self.value_mismatch::<R>());
            };
            let Step::Method { bases, method, args } = last else {
                return Err(AccessError::InvocationMismatch { method: last.name() });
            };
            let mut call = |target: Option<&dyn Any>| -> Result<(), AccessError> {
                let target = shared_target(bases, method.is_static(), target, method.name())?;
                result = Some(method.invoke(target, to_values(args))?);
                Ok(())
            };
            if init.is_empty() {
                call(target)?;
            } else {
                read_chain(init, target, &mut |value| call(Some(value)))?;
            }
        }

        let result = result.ok_or_else(|| self.value_mismatch::<R>())?;
        if self.discard {
            // `R` is `()` here.
            return (Box::new(()) as Box<dyn Any>)
                .downcast::<R>()
                .map(|r| *r)
                .map_err(|_| self.value_mismatch::<R>());
        }
        result
            .downcast::<R>()
            .map(|r| *r)
            .map_err(|_| self.value_mismatch::<R>())
    }

    fn value_mismatch<V: Any>(&self) -> AccessError {
        AccessError::ValueMismatch {
            member: self.steps.last().map_or("", Step::name),
            expected: core::any::type_name::<V>(),
        }
    }
}

// -----------------------------------------------------------------------------
// Typed accessors

macro_rules! path_accessor {
    ($(#[$meta:meta])* $name:ident<$($param:ident),*>) => {
        $(#[$meta])*
        pub struct $name<$($param),*> {
            plan: Arc<PathPlan>,
            _marker: PhantomData<fn($($param),*)>,
        }

        impl<$($param),*> Clone for $name<$($param),*> {
            fn clone(&self) -> Self {
                Self {
                    plan: self.plan.clone(),
                    _marker: PhantomData,
                }
            }
        }

        impl<$($param),*> fmt::Debug for $name<$($param),*> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("segments", &self.plan.steps.len())
                    .finish()
            }
        }

        impl<$($param),*> $name<$($param),*> {
            fn from_plan(plan: Arc<PathPlan>) -> Self {
                Self {
                    plan,
                    _marker: PhantomData,
                }
            }
        }
    };
}

path_accessor!(
    /// Reads a `V` at the end of a path starting at a `T`.
    PathGetter<T, V>
);
path_accessor!(
    /// Reads a `V` at the end of a path with a static root.
    StaticPathGetter<V>
);
path_accessor!(
    /// Writes a `V` at the end of a path starting at a `T`.
    PathSetter<T, V>
);
path_accessor!(
    /// Writes a `V` at the end of a path with a static root.
    StaticPathSetter<V>
);
path_accessor!(
    /// Calls the method ending a path starting at a `T`.
    PathInvoker<T, R>
);
path_accessor!(
    /// Calls the method ending a path with a static root.
    StaticPathInvoker<R>
);

impl<T: Any, V: Any + Clone> PathGetter<T, V> {
    pub fn get(&self, target: &T) -> Result<V, AccessError> {
        self.plan.get(Some(target))
    }
}

impl<V: Any + Clone> StaticPathGetter<V> {
    pub fn get(&self) -> Result<V, AccessError> {
        self.plan.get(None)
    }
}

impl<T: Any, V: Any> PathSetter<T, V> {
    pub fn set(&self, target: &mut T, value: V) -> Result<(), AccessError> {
        self.plan.set(Some(target), value)
    }
}

impl<V: Any> StaticPathSetter<V> {
    pub fn set(&self, value: V) -> Result<(), AccessError> {
        self.plan.set(None, value)
    }
}

impl<T: Any, R: Any> PathInvoker<T, R> {
    pub fn invoke(&self, target: &mut T) -> Result<R, AccessError> {
        self.plan.invoke(Some(target))
    }
}

impl<R: Any> StaticPathInvoker<R> {
    pub fn invoke(&self) -> Result<R, AccessError> {
        self.plan.invoke(None)
    }
}

// -----------------------------------------------------------------------------
// ReflectionPathFactory

/// Builds typed accessors and invokers from member paths.
///
/// Paths are resolved against the shared [`TypeRegistry`] and validated once,
/// when built; every failure is a [`PathError`]. Built paths are cached by
/// root type, path string, operation and requested type.
///
/// Members of a type's bases are reachable through the derived type.
///
/// # Examples
///
/// ```
/// use ez_reflect::access::ReflectionPathFactory;
/// use ez_reflect::derive::Reflect;
/// use ez_reflect::TypeRegistryArc;
///
/// #[derive(Reflect, Default)]
/// struct Stats {
///     hp: i32,
/// }
///
/// #[derive(Reflect, Default)]
/// struct Player {
///     stats: Stats,
/// }
///
/// let factory = ReflectionPathFactory::new(TypeRegistryArc::default());
/// let hp = factory.build_getter::<Player, i32>("stats.hp").unwrap();
/// let set_hp = factory.build_setter::<Player, i32>("stats.hp").unwrap();
///
/// let mut player = Player::default();
/// set_hp.set(&mut player, 30).unwrap();
/// assert_eq!(hp.get(&player), Ok(30));
///
/// assert!(factory.build_getter::<Player, i32>("stats.mana").is_err());
/// ```
pub struct ReflectionPathFactory {
    registry: TypeRegistryArc,
    cache: ReadThroughCache<PlanKey, Arc<PathPlan>>,
}

impl ReflectionPathFactory {
    pub fn new(registry: TypeRegistryArc) -> Self {
        Self {
            registry,
            cache: ReadThroughCache::new(),
        }
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        &self.registry
    }

    /// Returns the number of cached paths.
    #[inline]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn plan(&self, path: &str, instance: Option<Type>, op: PathOp, output: Type) -> Result<Arc<PathPlan>, PathError> {
        let key = (instance.map(|t| t.id()), Box::from(path), op, output.id());
        self.cache.get_or_try_insert_with(key, || {
            let plan = resolve_plan(&self.registry.read(), path, instance, op, output)?;
            log::debug!("built path {op} `{path}` -> `{output}`");
            Ok(Arc::new(plan))
        })
    }

    /// Builds a getter for the member or non-void shared method at the end of
    /// `path`, starting at a `T`.
    pub fn build_getter<T: GetTypeMeta, V: Any + Clone>(&self, path: &str) -> Result<PathGetter<T, V>, PathError> {
        self.registry.ensure_registered::<T>();
        self.plan(path, Some(Type::of::<T>()), PathOp::Get, Type::of::<V>())
            .map(PathGetter::from_plan)
    }

    /// Builds a getter for a path with a `-t:` static root.
    pub fn build_static_getter<V: Any + Clone>(&self, path: &str) -> Result<StaticPathGetter<V>, PathError> {
        self.plan(path, None, PathOp::Get, Type::of::<V>())
            .map(StaticPathGetter::from_plan)
    }

    /// Builds a setter for the writable member at the end of `path`.
    ///
    /// Intermediate properties and static members are written back after the
    /// nested value changed.
    pub fn build_setter<T: GetTypeMeta, V: Any>(&self, path: &str) -> Result<PathSetter<T, V>, PathError> {
        self.registry.ensure_registered::<T>();
        self.plan(path, Some(Type::of::<T>()), PathOp::Set, Type::of::<V>())
            .map(PathSetter::from_plan)
    }

    pub fn build_static_setter<V: Any>(&self, path: &str) -> Result<StaticPathSetter<V>, PathError> {
        self.plan(path, None, PathOp::Set, Type::of::<V>())
            .map(StaticPathSetter::from_plan)
    }

    /// Builds an invoker for the method call ending `path`.
    ///
    /// With `R = ()` the result of a non-void method is dropped.
    pub fn build_invoker<T: GetTypeMeta, R: Any>(&self, path: &str) -> Result<PathInvoker<T, R>, PathError> {
        self.registry.ensure_registered::<T>();
        self.plan(path, Some(Type::of::<T>()), PathOp::Invoke, Type::of::<R>())
            .map(PathInvoker::from_plan)
    }

    pub fn build_static_invoker<R: Any>(&self, path: &str) -> Result<StaticPathInvoker<R>, PathError> {
        self.plan(path, None, PathOp::Invoke, Type::of::<R>())
            .map(StaticPathInvoker::from_plan)
    }
}

impl fmt::Debug for ReflectionPathFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionPathFactory")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
