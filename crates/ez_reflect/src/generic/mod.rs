//! Provide generic-parameter dependency analysis.
//!
//! ## Menu
//!
//! - [`GenericTypeDefinition`]: an open generic type, built once from its
//!   parameters, with dependency edges between them.
//! - [`GenericParameterInfo`]: name, position, [`SpecialConstraints`],
//!   constraint [`TypeExpr`]s and edges of one parameter.
//! - [`GenericTypeDefinition::try_infer_type_arguments`]: fills open type
//!   arguments from closed ones, never guessing.
//! - [`GenericTypeDefinition::check_type_arguments`]: validates a closed
//!   argument list, failing with a [`ConstraintError`].

// -----------------------------------------------------------------------------
// Modules

mod definition;
mod error;
mod expr;
mod infer;

// -----------------------------------------------------------------------------
// Exports

pub use definition::{GenericDefinitionBuilder, GenericParameterInfo, GenericTypeDefinition, SpecialConstraints};
pub use error::{ConstraintError, GenericDefinitionError};
pub use expr::TypeExpr;
