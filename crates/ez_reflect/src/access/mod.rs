//! Provide member paths and the accessors built from them.
//!
//! A member path names a chain of members starting at an instance, or at a
//! static root selected with `-t:`. The last segment may call a method with
//! literal arguments.
//!
//! - [`MemberPath`]: the parsed path, see its docs for the syntax.
//! - [`ReflectionPathFactory`]: validates a path against the type registry
//!   once and returns a cached typed accessor ([`PathGetter`],
//!   [`PathSetter`], [`PathInvoker`] and their static counterparts).
//! - [`MemberExpression`]: a string that is either a literal or a path,
//!   disambiguated by the [`EXPRESSION_SIGIL`].
//! - [`AccessError`]: erased access failures; [`PathError`]: build failures.
//!
//! # Examples
//!
//! ```
//! use ez_reflect::access::{PathError, ReflectionPathFactory};
//! use ez_reflect::derive::Reflect;
//! use ez_reflect::TypeRegistryArc;
//!
//! #[derive(Reflect, Default)]
//! struct Weapon {
//!     damage: i32,
//! }
//!
//! #[derive(Reflect, Default)]
//! #[reflect(extend = weapon_methods)]
//! struct Hero {
//!     weapon: Weapon,
//! }
//!
//! fn weapon_methods(meta: &mut ez_reflect::TypeMeta) {
//!     use ez_reflect::member::{MethodDescriptor, Visibility};
//!     meta.push_method(MethodDescriptor::shared::<Hero, (i32,), i32>(
//!         "hit",
//!         Visibility::Public,
//!         |hero, (times,)| hero.weapon.damage * times,
//!     ));
//! }
//!
//! let factory = ReflectionPathFactory::new(TypeRegistryArc::default());
//! let mut hero = Hero { weapon: Weapon { damage: 4 } };
//!
//! let hit = factory.build_invoker::<Hero, i32>("hit(3)").unwrap();
//! assert_eq!(hit.invoke(&mut hero), Ok(12));
//!
//! // Methods may only end a path.
//! let err = factory.build_getter::<Hero, i32>("hit(1).damage").unwrap_err();
//! assert!(matches!(err, PathError::MethodNotTerminal { .. }));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod error;
mod expression;
mod factory;
mod literal;
mod path;

// -----------------------------------------------------------------------------
// Exports

pub use error::{AccessError, PathError};
pub use expression::{EXPRESSION_SIGIL, ExpressionValue, MemberExpression};
pub use factory::{PathGetter, PathInvoker, PathSetter, ReflectionPathFactory};
pub use factory::{StaticPathGetter, StaticPathInvoker, StaticPathSetter};
pub use path::{MemberPath, ParseError, PathArg, Segment};
