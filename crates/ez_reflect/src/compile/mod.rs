//! Provide typed closures compiled from reflected descriptors.
//!
//! ## Menu
//!
//! - [`ReflectionCompiler`]: validates a descriptor against the requested
//!   static types and returns a cached closure.
//! - Getters and setters: [`InstanceGetter`], [`InstanceSetter`],
//!   [`StaticGetter`], [`StaticSetter`].
//! - Invokers: [`InstanceInvoker`], [`StaticInvoker`], [`ConstructorInvoker`].
//! - [`CompileError`]: the first failed check.

// -----------------------------------------------------------------------------
// Modules

mod accessors;
mod compiler;
mod error;

// -----------------------------------------------------------------------------
// Exports

pub use accessors::{ConstructorInvoker, InstanceGetter, InstanceInvoker, InstanceSetter};
pub use accessors::{StaticGetter, StaticInvoker, StaticSetter};
pub use compiler::ReflectionCompiler;
pub use error::CompileError;
