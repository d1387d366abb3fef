//! Java source synthesis for busgen.
//!
//! Generation is split into two stages:
//!
//! ```text
//! TypeDescriptor
//!     ↓
//!  [proxy / observes synthesis]
//!     ↓
//!    AST (CompilationUnit)
//!     ↓
//!  [render]  → validated, escaped Java source
//! ```
//!
//! Synthesis never formats text, and rendering never decides what to emit,
//! so generated trees can be inspected directly in tests (see [`simulate`]).
//!
//! # Strategies
//!
//! - [`proxy`]: one loader class registering a bus proxy per remote interface
//! - [`observes`]: one subscription class per observer bean, with one
//!   statement per injection point chosen through the [`DecoratorRegistry`]

pub mod ast;
mod context;
pub mod dispatch;
pub mod jvm_types;
pub mod naming;
pub mod observes;
pub mod proxy;
pub mod render;
pub mod simulate;

pub use context::SynthesisContext;
pub use dispatch::{Decorator, DecoratorRegistry, InjectionPoint};
pub use observes::generate_observer;
pub use proxy::generate_loader;
pub use render::{escape_string, render_unit};
