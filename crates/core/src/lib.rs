//! opstream - PDF content stream operator preprocessing.
//!
//! Turns the operator stream of a PDF content stream into a sequence of
//! well-formed, arity-correct [`Operation`](interp::Operation) records,
//! tolerating the malformed and interleaved operand runs that real-world
//! producers emit. A minimal graphics-state hook (save/restore nesting,
//! coordinate transform) runs as operators are processed; a color-aware
//! hook variant additionally tracks fill color and text rendering mode.

pub mod error;
pub mod interp;
pub mod model;
pub mod parser;
pub mod utils;

pub use error::{PdfError, Result};
pub use interp::{
    Arity, BaseHook, ColorAwareHook, OpCode, Operation, OperatorSpec, Preprocessor, StateHook,
};
pub use model::{ColorSpace, GraphicsState, NoResolve, ObjRef, PdfObject, Resolve, StateManager};
pub use parser::{ContentLexer, ContentToken, TokenSource};
