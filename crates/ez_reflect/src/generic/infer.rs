use alloc::string::ToString;
use alloc::vec::Vec;

use crate::generic::{ConstraintError, GenericTypeDefinition, SpecialConstraints, TypeExpr};
use crate::info::{Type, TypeFlags};
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// Unification

type Slots = Vec<Option<Type>>;

/// Unifies `expr` with the closed type `ty`, binding open slots.
///
/// Returns `false` on any mismatch; `slots` may then be partially bound.
fn unify(def: &GenericTypeDefinition, registry: &TypeRegistry, expr: &TypeExpr, ty: Type, slots: &mut Slots) -> bool {
    match expr {
        TypeExpr::Param(name) => {
            let Some(param) = def.param(name) else {
                return false;
            };
            match slots[param.position()] {
                Some(bound) => bound == ty,
                None => {
                    slots[param.position()] = Some(ty);
                    true
                }
            }
        }
        TypeExpr::Concrete(concrete) => *concrete == ty,
        TypeExpr::Generic { definition, args } => {
            if !TypeExpr::same_definition(definition, &ty) {
                return false;
            }
            let Some(meta) = registry.get(ty.id()) else {
                return false;
            };
            let generics = meta.generics();
            generics.len() == args.len()
                && args
                    .iter()
                    .zip(generics.types())
                    .all(|(arg, actual)| unify(def, registry, arg, actual, slots))
        }
    }
}

/// Returns `ty`, its base types and every interface they implement.
fn assignable_candidates(registry: &TypeRegistry, ty: Type) -> Vec<Type> {
    let mut candidates = alloc::vec![ty];
    candidates.extend(registry.base_chain(ty.id()));
    let mut index = 0;
    while index < candidates.len() {
        if let Some(meta) = registry.get(candidates[index].id()) {
            for interface in meta.interfaces() {
                if !candidates.contains(interface) {
                    candidates.push(*interface);
                }
            }
        }
        index += 1;
    }
    candidates
}

/// Matches `constraint` against every candidate `ty` is assignable to.
///
/// Succeeds only if all matching candidates agree on the bindings.
fn satisfy(
    def: &GenericTypeDefinition,
    registry: &TypeRegistry,
    constraint: &TypeExpr,
    ty: Type,
    slots: &Slots,
) -> Option<Slots> {
    let mut found: Option<Slots> = None;
    for candidate in assignable_candidates(registry, ty) {
        let mut attempt = slots.clone();
        if !unify(def, registry, constraint, candidate, &mut attempt) {
            continue;
        }
        match &found {
            Some(previous) if *previous != attempt => return None,
            Some(_) => {}
            None => found = Some(attempt),
        }
    }
    found
}

// -----------------------------------------------------------------------------
// Inference and validation

impl GenericTypeDefinition {
    /// Fills open argument slots from the closed ones and their constraints.
    ///
    /// An open parameter is inferred by structurally matching the constraint
    /// of a closed parameter that depends on it, e.g. `T: Vec<U>` with
    /// `T = Vec<i32>` gives `U = i32`. Matching repeats until nothing changes,
    /// so chains resolve in any order.
    ///
    /// Returns `true` if every slot ends up closed. Otherwise, including on
    /// conflicting evidence or a cyclic definition, returns `false` and leaves
    /// `args` untouched. Nothing is guessed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ez_reflect::generic::{GenericTypeDefinition, SpecialConstraints, TypeExpr};
    /// use ez_reflect::info::Type;
    /// use ez_reflect::TypeRegistry;
    ///
    /// let def = GenericTypeDefinition::builder("Holder")
    ///     .param("T", SpecialConstraints::empty(), [TypeExpr::generic("Vec", [TypeExpr::param("U")])])
    ///     .param("U", SpecialConstraints::empty(), [])
    ///     .build()
    ///     .unwrap();
    ///
    /// let mut registry = TypeRegistry::new();
    /// registry.register::<Vec<i32>>();
    ///
    /// let mut args = [Some(Type::of::<Vec<i32>>()), None];
    /// assert!(def.try_infer_type_arguments(&registry, &mut args));
    /// assert_eq!(args[1], Some(Type::of::<i32>()));
    ///
    /// // Knowing `U` says nothing about `T`.
    /// let mut args = [None, Some(Type::of::<i32>())];
    /// assert!(!def.try_infer_type_arguments(&registry, &mut args));
    /// assert_eq!(args[0], None);
    /// ```
    pub fn try_infer_type_arguments(&self, registry: &TypeRegistry, args: &mut [Option<Type>]) -> bool {
        if args.len() != self.arity() {
            return false;
        }
        if args.iter().all(Option::is_some) {
            return true;
        }
        if self.is_cyclic() {
            log::trace!("`{}` has cyclic parameters, not inferring", self.path());
            return false;
        }

        let mut slots: Slots = args.to_vec();
        loop {
            let mut changed = false;
            for param in self.params() {
                let Some(ty) = slots[param.position()] else {
                    continue;
                };
                for constraint in param.constraints() {
                    let open = param.depends_on().iter().any(|&dep| slots[dep].is_none());
                    if !open {
                        continue;
                    }
                    let Some(next) = satisfy(self, registry, constraint, ty, &slots) else {
                        log::trace!("`{}`: `{}` does not determine `{constraint}`", self.path(), ty.path());
                        return false;
                    };
                    changed |= next != slots;
                    slots = next;
                }
            }
            if !changed {
                break;
            }
        }

        if slots.iter().all(Option::is_some) {
            args.copy_from_slice(&slots);
            true
        } else {
            false
        }
    }

    /// Returns `true` if `args` satisfy every constraint.
    #[inline]
    pub fn validate_type_arguments(&self, registry: &TypeRegistry, args: &[Type]) -> bool {
        self.check_type_arguments(registry, args).is_ok()
    }

    /// Checks `args` against special constraints and constraint types.
    ///
    /// A type satisfies a constraint type if it, a base type or an interface
    /// matches it structurally with parameters replaced by `args`.
    pub fn check_type_arguments(&self, registry: &TypeRegistry, args: &[Type]) -> Result<(), ConstraintError> {
        if args.len() != self.arity() {
            return Err(ConstraintError::ArgumentCount {
                definition: self.path(),
                expected: self.arity(),
                actual: args.len(),
            });
        }

        let slots: Slots = args.iter().copied().map(Some).collect();
        for (param, &ty) in self.params().iter().zip(args) {
            let special = param.special_constraints();
            if !special.is_empty() {
                let Some(meta) = registry.get(ty.id()) else {
                    return Err(ConstraintError::Unregistered {
                        param: param.name(),
                        ty: ty.path(),
                    });
                };
                if special.contains(SpecialConstraints::REFERENCE_TYPE)
                    && !meta.flags().contains(TypeFlags::REFERENCE_TYPE)
                {
                    return Err(ConstraintError::NotReferenceType {
                        param: param.name(),
                        ty: ty.path(),
                    });
                }
                if special.contains(SpecialConstraints::VALUE_TYPE) && !meta.flags().contains(TypeFlags::VALUE_TYPE) {
                    return Err(ConstraintError::NotValueType {
                        param: param.name(),
                        ty: ty.path(),
                    });
                }
                if special.contains(SpecialConstraints::DEFAULT_CONSTRUCTOR) && meta.default_constructor().is_none() {
                    return Err(ConstraintError::NoDefaultConstructor {
                        param: param.name(),
                        ty: ty.path(),
                    });
                }
            }

            for constraint in param.constraints() {
                if satisfy(self, registry, constraint, ty, &slots).is_none() {
                    return Err(ConstraintError::Unsatisfied {
                        param: param.name(),
                        ty: ty.path(),
                        constraint: constraint.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::generic::{ConstraintError, GenericTypeDefinition, SpecialConstraints, TypeExpr};
    use crate::info::{Type, TypeInfo};
    use crate::member::ConstructorDescriptor;
    use crate::registry::{BaseInfo, GetTypeMeta, TypeMeta, TypeRegistry};

    fn none() -> SpecialConstraints {
        SpecialConstraints::empty()
    }

    fn vec_of(name: &'static str) -> TypeExpr {
        TypeExpr::generic_like::<Vec<()>>([TypeExpr::param(name)])
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Vec<i32>>();
        registry.register::<Vec<Vec<u8>>>();
        registry.register::<Scores>();
        registry
    }

    /// Derives from `Vec<u32>`.
    #[derive(Default)]
    struct Scores {
        inner: Vec<u32>,
    }

    impl GetTypeMeta for Scores {
        fn get_type_meta() -> TypeMeta {
            let mut meta = TypeMeta::new::<Self>(TypeInfo::Struct);
            meta.set_base(BaseInfo::new::<Self, Vec<u32>>(|s| &s.inner, |s| &mut s.inner));
            meta.push_constructor(ConstructorDescriptor::default_of::<Self>());
            meta
        }

        fn register_dependencies(registry: &mut TypeRegistry) {
            registry.register::<Vec<u32>>();
        }
    }

    #[test]
    fn infers_forward() {
        // Holder<T: Vec<U>, U>
        let def = GenericTypeDefinition::builder("Holder")
            .param("T", none(), [vec_of("U")])
            .param("U", none(), [])
            .build()
            .unwrap();
        let registry = registry();

        let mut args = [Some(Type::of::<Vec<i32>>()), None];
        assert!(def.try_infer_type_arguments(&registry, &mut args));
        assert_eq!(args, [Some(Type::of::<Vec<i32>>()), Some(Type::of::<i32>())]);

        let mut reverse = [None, Some(Type::of::<i32>())];
        assert!(!def.try_infer_type_arguments(&registry, &mut reverse));
        assert_eq!(reverse, [None, Some(Type::of::<i32>())]);
    }

    #[test]
    fn infers_chains_and_nesting() {
        // Chain<T: Vec<U>, U: Vec<V>, V>
        let def = GenericTypeDefinition::builder("Chain")
            .param("V", none(), [])
            .param("U", none(), [vec_of("V")])
            .param("T", none(), [vec_of("U")])
            .build()
            .unwrap();
        let registry = registry();

        let mut args = [None, None, Some(Type::of::<Vec<Vec<u8>>>())];
        assert!(def.try_infer_type_arguments(&registry, &mut args));
        assert_eq!(args[1], Some(Type::of::<Vec<u8>>()));
        assert_eq!(args[0], Some(Type::of::<u8>()));
    }

    #[test]
    fn infers_through_base_types() {
        let def = GenericTypeDefinition::builder("Holder")
            .param("T", none(), [vec_of("U")])
            .param("U", none(), [])
            .build()
            .unwrap();
        let registry = registry();

        let mut args = [Some(Type::of::<Scores>()), None];
        assert!(def.try_infer_type_arguments(&registry, &mut args));
        assert_eq!(args[1], Some(Type::of::<u32>()));
    }

    #[test]
    fn conflicts_and_cycles_infer_nothing() {
        // Mismatched shape.
        let def = GenericTypeDefinition::builder("Holder")
            .param("T", none(), [TypeExpr::generic("Option", [TypeExpr::param("U")])])
            .param("U", none(), [])
            .build()
            .unwrap();
        let registry = registry();
        let mut args = [Some(Type::of::<Vec<i32>>()), None];
        assert!(!def.try_infer_type_arguments(&registry, &mut args));
        assert_eq!(args[1], None);

        let cyclic = GenericTypeDefinition::builder("Pair")
            .param("A", none(), [vec_of("B")])
            .param("B", none(), [vec_of("A")])
            .build()
            .unwrap();
        let mut args = [Some(Type::of::<Vec<i32>>()), None];
        assert!(!cyclic.try_infer_type_arguments(&registry, &mut args));
        assert_eq!(args[1], None);
    }

    #[test]
    fn checks_constraints() {
        let def = GenericTypeDefinition::builder("Holder")
            .param("T", SpecialConstraints::DEFAULT_CONSTRUCTOR, [vec_of("U")])
            .param("U", SpecialConstraints::VALUE_TYPE, [])
            .build()
            .unwrap();
        let registry = registry();

        assert!(def.validate_type_arguments(&registry, &[Type::of::<Vec<i32>>(), Type::of::<i32>()]));
        assert!(def.validate_type_arguments(&registry, &[Type::of::<Scores>(), Type::of::<u32>()]));

        let err = def
            .check_type_arguments(&registry, &[Type::of::<Vec<i32>>(), Type::of::<u8>()])
            .unwrap_err();
        assert!(matches!(err, ConstraintError::Unsatisfied { param: "T", .. }));

        let err = def
            .check_type_arguments(&registry, &[Type::of::<Vec<Vec<u8>>>(), Type::of::<Vec<u8>>()])
            .unwrap_err();
        assert!(matches!(err, ConstraintError::NotValueType { param: "U", .. }));

        let err = def.check_type_arguments(&registry, &[Type::of::<i32>()]).unwrap_err();
        assert!(matches!(err, ConstraintError::ArgumentCount { expected: 2, actual: 1, .. }));
    }
}
