//! Graphics state subset maintained during preprocessing.

use crate::model::color::ColorSpace;
use crate::utils::{MATRIX_IDENTITY, Matrix, mult_matrix};

/// Text rendering mode "fill" (the PDF default).
pub const TEXT_RENDER_FILL: i32 = 0;

/// The graphics state fields the preprocessor owns.
///
/// Downstream consumers need save-stack depth and the accumulated
/// transform regardless of backend; the color fields are only mutated by
/// the color-aware hook and otherwise stay at their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    /// Current transformation matrix.
    pub ctm: Matrix,
    /// Non-stroking (fill) color space.
    pub fill_color_space: ColorSpace,
    /// Non-stroking (fill) color as an RGB triple, components in 0..=1.
    pub fill_color: [f64; 3],
    /// Text rendering mode (0-7).
    pub text_render: i32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: MATRIX_IDENTITY,
            fill_color_space: ColorSpace::DeviceGray,
            fill_color: [0.0, 0.0, 0.0],
            text_render: TEXT_RENDER_FILL,
        }
    }
}

/// Save/restore stack of graphics state snapshots.
#[derive(Debug, Default)]
pub struct StateManager {
    /// State currently in effect.
    pub state: GraphicsState,
    /// Snapshots pushed by `q`, popped by `Q`.
    pub stack: Vec<GraphicsState>,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current save-stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Push a snapshot of the current state (the `q` operator).
    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Restore the previous snapshot (the `Q` operator).
    ///
    /// Restoring with an empty stack is a no-op; underflow protection is
    /// the caller's responsibility, not reconciled here.
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    /// Compose `m` onto the current transform (the `cm` operator).
    pub fn transform(&mut self, m: Matrix) {
        self.state.ctm = mult_matrix(m, self.state.ctm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_round_trip() {
        let mut states = StateManager::new();
        states.transform((2.0, 0.0, 0.0, 2.0, 0.0, 0.0));
        states.save();
        states.transform((1.0, 0.0, 0.0, 1.0, 5.0, 5.0));
        assert_eq!(states.depth(), 1);
        states.restore();
        assert_eq!(states.depth(), 0);
        assert_eq!(states.state.ctm, (2.0, 0.0, 0.0, 2.0, 0.0, 0.0));
    }

    #[test]
    fn restore_on_empty_stack_is_noop() {
        let mut states = StateManager::new();
        states.restore();
        assert_eq!(states.depth(), 0);
        assert_eq!(states.state, GraphicsState::default());
    }
}
