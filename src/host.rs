//! # Host ABI
//!
//! The two seams through which Rust code outside the bytecode pipeline talks
//! to it: [`HostFn`] backs an [`crate::vm::class::InternalMethod`] (a method
//! implemented by a callback instead of bytecode), and [`ContextProvider`]
//! resolves the small, fixed context vocabulary (`player`, `room`, `item`)
//! that scripts reach via `PUCX`.
//!
//! Grounded on the original's `MethodHandler func([]Value) []Value` and the
//! `ExecutionContext.objectContext` map lookup in `execution_stack.go`.

use std::sync::Arc;

use crate::error::RuntimeError;
use crate::vm::class::Object;
use crate::vm::value::Value;

pub type HostFn = Box<dyn Fn(&[Value]) -> Result<Vec<Value>, RuntimeError> + Send + Sync>;

/// Supplied with every VM command; resolves a context name to the object a
/// script's `player.Send(...)`-style calls should dispatch against.
pub trait ContextProvider: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Arc<Object>>;
}
