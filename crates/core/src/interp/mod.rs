//! Operator preprocessing engine.

pub mod hooks;
pub mod optable;
pub mod preprocessor;

pub use hooks::{BaseHook, ColorAwareHook, StateHook};
pub use optable::{Arity, Lookup, MAX_OPERANDS, OpCode, OperatorSpec, lookup};
pub use preprocessor::{Operation, Preprocessor};
