//! Value and state model for content stream processing.

pub mod color;
pub mod objects;
pub mod state;

pub use color::{ColorSpace, NoResolve, Resolve, resolve_color_space};
pub use objects::{ObjRef, PdfObject};
pub use state::{GraphicsState, StateManager, TEXT_RENDER_FILL};
