use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use bitflags::bitflags;

use crate::generic::{GenericDefinitionError, TypeExpr};

// -----------------------------------------------------------------------------
// SpecialConstraints

bitflags! {
    /// Constraints on a type argument that are not expressed as types.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpecialConstraints: u8 {
        /// The argument must be flagged [`REFERENCE_TYPE`](crate::info::TypeFlags::REFERENCE_TYPE).
        const REFERENCE_TYPE = 1 << 0;
        /// The argument must be flagged [`VALUE_TYPE`](crate::info::TypeFlags::VALUE_TYPE).
        const VALUE_TYPE = 1 << 1;
        /// The argument must register a parameterless constructor.
        const DEFAULT_CONSTRUCTOR = 1 << 2;
    }
}

// -----------------------------------------------------------------------------
// GenericParameterInfo

/// One parameter of a [`GenericTypeDefinition`] and its dependency edges.
///
/// A parameter depends on every sibling mentioned by its constraints, at any
/// nesting depth. Self references such as `T: Ord<T>` add no edge.
#[derive(Clone)]
pub struct GenericParameterInfo {
    name: &'static str,
    position: usize,
    special: SpecialConstraints,
    constraints: Box<[TypeExpr]>,
    depends_on: Box<[usize]>,
    dependents: Box<[usize]>,
}

impl GenericParameterInfo {
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub const fn special_constraints(&self) -> SpecialConstraints {
        self.special
    }

    #[inline]
    pub fn constraints(&self) -> &[TypeExpr] {
        &self.constraints
    }

    /// Positions of the parameters this one's constraints mention.
    #[inline]
    pub fn depends_on(&self) -> &[usize] {
        &self.depends_on
    }

    /// Positions of the parameters whose constraints mention this one.
    #[inline]
    pub fn dependents(&self) -> &[usize] {
        &self.dependents
    }
}

impl fmt::Debug for GenericParameterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericParameterInfo")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("special", &self.special)
            .field("constraints", &self.constraints)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// GenericTypeDefinition

/// An open generic type definition: its parameters and their constraints.
///
/// Built once with [`GenericTypeDefinition::builder`] and immutable after.
///
/// # Examples
///
/// ```
/// use ez_reflect::generic::{GenericTypeDefinition, SpecialConstraints, TypeExpr};
///
/// // struct Holder<T: List<U>, U>
/// let holder = GenericTypeDefinition::builder("Holder")
///     .param("T", SpecialConstraints::empty(), [TypeExpr::generic("Vec", [TypeExpr::param("U")])])
///     .param("U", SpecialConstraints::empty(), [])
///     .build()
///     .unwrap();
///
/// assert_eq!(holder.param("T").unwrap().depends_on(), &[1]);
/// assert_eq!(holder.param("U").unwrap().dependents(), &[0]);
/// assert!(!holder.is_cyclic());
/// ```
#[derive(Debug, Clone)]
pub struct GenericTypeDefinition {
    path: &'static str,
    params: Box<[GenericParameterInfo]>,
    cyclic: bool,
}

impl GenericTypeDefinition {
    #[inline]
    pub fn builder(path: &'static str) -> GenericDefinitionBuilder {
        GenericDefinitionBuilder {
            path,
            params: Vec::new(),
        }
    }

    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[inline]
    pub fn params(&self) -> &[GenericParameterInfo] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&GenericParameterInfo> {
        self.params.iter().find(|param| param.name == name)
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if some parameters depend on each other in a cycle.
    #[inline]
    pub const fn is_cyclic(&self) -> bool {
        self.cyclic
    }
}

// -----------------------------------------------------------------------------
// Builder

/// Collects parameters for a [`GenericTypeDefinition`].
#[derive(Debug)]
pub struct GenericDefinitionBuilder {
    path: &'static str,
    params: Vec<(&'static str, SpecialConstraints, Vec<TypeExpr>)>,
}

impl GenericDefinitionBuilder {
    /// Appends a parameter; declaration order gives its position.
    pub fn param(
        mut self,
        name: &'static str,
        special: SpecialConstraints,
        constraints: impl IntoIterator<Item = TypeExpr>,
    ) -> Self {
        self.params.push((name, special, constraints.into_iter().collect()));
        self
    }

    /// Resolves dependency edges and checks the parameter list.
    pub fn build(self) -> Result<GenericTypeDefinition, GenericDefinitionError> {
        let path = self.path;
        let position_of = |name: &str| self.params.iter().position(|(param, ..)| *param == name);

        let mut edges: Vec<Vec<usize>> = Vec::with_capacity(self.params.len());
        for (index, &(name, special, ref constraints)) in self.params.iter().enumerate() {
            if position_of(name) != Some(index) {
                return Err(GenericDefinitionError::DuplicateParameter { definition: path, param: name });
            }
            if special.contains(SpecialConstraints::REFERENCE_TYPE | SpecialConstraints::VALUE_TYPE) {
                return Err(GenericDefinitionError::ConflictingSpecialConstraints { definition: path, param: name });
            }

            let mut unknown = None;
            let mut depends_on = Vec::new();
            for constraint in constraints {
                constraint.for_each_param(&mut |mention| match position_of(mention) {
                    Some(at) if at != index && !depends_on.contains(&at) => depends_on.push(at),
                    Some(_) => {}
                    None => unknown = unknown.or(Some(mention)),
                });
            }
            if let Some(unknown) = unknown {
                return Err(GenericDefinitionError::UnknownParameter {
                    definition: path,
                    param: name,
                    unknown,
                });
            }
            edges.push(depends_on);
        }

        let cyclic = has_cycle(&edges);
        let params = self
            .params
            .into_iter()
            .enumerate()
            .map(|(position, (name, special, constraints))| {
                let dependents = (0..edges.len()).filter(|&from| edges[from].contains(&position)).collect::<Vec<_>>();
                GenericParameterInfo {
                    name,
                    position,
                    special,
                    constraints: constraints.into_boxed_slice(),
                    depends_on: edges[position].clone().into_boxed_slice(),
                    dependents: dependents.into_boxed_slice(),
                }
            })
            .collect::<Vec<_>>();

        log::trace!("built generic definition `{path}`, cyclic: {cyclic}");
        Ok(GenericTypeDefinition {
            path,
            params: params.into_boxed_slice(),
            cyclic,
        })
    }
}

fn has_cycle(edges: &[Vec<usize>]) -> bool {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    fn visit(node: usize, edges: &[Vec<usize>], marks: &mut [Mark]) -> bool {
        match marks[node] {
            Mark::Active => return true,
            Mark::Done => return false,
            Mark::New => {}
        }
        marks[node] = Mark::Active;
        if edges[node].iter().any(|&next| visit(next, edges, marks)) {
            return true;
        }
        marks[node] = Mark::Done;
        false
    }

    let mut marks = alloc::vec![Mark::New; edges.len()];
    (0..edges.len()).any(|node| visit(node, edges, &mut marks))
}

#[cfg(test)]
mod tests {
    use super::{GenericTypeDefinition, SpecialConstraints};
    use crate::generic::{GenericDefinitionError, TypeExpr};

    fn none() -> SpecialConstraints {
        SpecialConstraints::empty()
    }

    #[test]
    fn nested_constraints_add_edges() {
        // T: Map<U, Vec<V>>
        let def = GenericTypeDefinition::builder("Table")
            .param(
                "T",
                none(),
                [TypeExpr::generic("Map", [TypeExpr::param("U"), TypeExpr::generic("Vec", [TypeExpr::param("V")])])],
            )
            .param("U", none(), [])
            .param("V", none(), [])
            .build()
            .unwrap();

        assert_eq!(def.params()[0].depends_on(), &[1, 2]);
        assert_eq!(def.params()[2].dependents(), &[0]);
        assert!(def.params()[1].depends_on().is_empty());
        assert!(!def.is_cyclic());
    }

    #[test]
    fn self_reference_is_not_a_cycle() {
        let def = GenericTypeDefinition::builder("Sorted")
            .param("T", none(), [TypeExpr::generic("Ord", [TypeExpr::param("T")])])
            .build()
            .unwrap();
        assert!(def.params()[0].depends_on().is_empty());
        assert!(!def.is_cyclic());
    }

    #[test]
    fn mutual_dependency_is_cyclic() {
        let def = GenericTypeDefinition::builder("Pair")
            .param("A", none(), [TypeExpr::generic("Vec", [TypeExpr::param("B")])])
            .param("B", none(), [TypeExpr::generic("Vec", [TypeExpr::param("A")])])
            .build()
            .unwrap();
        assert!(def.is_cyclic());
    }

    #[test]
    fn malformed_definitions() {
        let err = GenericTypeDefinition::builder("Bad")
            .param("T", none(), [TypeExpr::param("X")])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GenericDefinitionError::UnknownParameter {
                definition: "Bad",
                param: "T",
                unknown: "X"
            }
        );

        let err = GenericTypeDefinition::builder("Bad").param("T", none(), []).param("T", none(), []).build();
        assert!(matches!(err, Err(GenericDefinitionError::DuplicateParameter { param: "T", .. })));

        let both = SpecialConstraints::VALUE_TYPE | SpecialConstraints::REFERENCE_TYPE;
        let err = GenericTypeDefinition::builder("Bad").param("T", both, []).build();
        assert!(matches!(err, Err(GenericDefinitionError::ConflictingSpecialConstraints { .. })));
    }
}
