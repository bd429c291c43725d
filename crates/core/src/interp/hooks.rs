//! State hooks run after arity reconciliation, before an operation is
//! emitted.
//!
//! A hook is a side-effect step keyed on the opcode; it must never alter
//! arity reconciliation. [`BaseHook`] maintains the save/restore nesting
//! and the accumulated transform every consumer needs. [`ColorAwareHook`]
//! composes it by explicit delegation and additionally tracks the fill
//! color and text rendering mode.

use std::collections::HashMap;

use log::warn;

use crate::interp::optable::OpCode;
use crate::model::color::{ColorSpace, Resolve, resolve_color_space};
use crate::model::objects::PdfObject;
use crate::model::state::StateManager;
use crate::utils::Matrix;

/// Pluggable per-operation side-effect step.
pub trait StateHook {
    /// Process one reconciled operation against the mutable state.
    fn process(&mut self, op: OpCode, operands: &[PdfObject]);

    /// The graphics state this hook maintains.
    fn states(&self) -> &StateManager;

    fn states_mut(&mut self) -> &mut StateManager;
}

/// Mandatory save/restore/transform bookkeeping.
#[derive(Debug, Default)]
pub struct BaseHook {
    pub states: StateManager,
}

impl BaseHook {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateHook for BaseHook {
    fn process(&mut self, op: OpCode, operands: &[PdfObject]) {
        match op {
            OpCode::Save => self.states.save(),
            OpCode::Restore => self.states.restore(),
            OpCode::Transform => match matrix_operands(operands) {
                Some(m) => self.states.transform(m),
                None => warn!("cm with non-numeric operands, transform unchanged"),
            },
            _ => {}
        }
    }

    fn states(&self) -> &StateManager {
        &self.states
    }

    fn states_mut(&mut self) -> &mut StateManager {
        &mut self.states
    }
}

fn matrix_operands(operands: &[PdfObject]) -> Option<Matrix> {
    // Arity reconciliation guarantees six operands here.
    let mut nums = [0.0; 6];
    for (slot, obj) in nums.iter_mut().zip(operands) {
        *slot = obj.as_num().ok()?;
    }
    Some((nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]))
}

/// Base bookkeeping plus fill color-space/color and text-rendering-mode
/// tracking.
///
/// Resolution of `cs` descriptors goes through the supplied resource
/// dictionary and object resolver. A freshly constructed hook reports
/// fill mode, DeviceGray, black.
pub struct ColorAwareHook<X: Resolve> {
    base: BaseHook,
    resources: HashMap<String, PdfObject>,
    xref: X,
}

impl<X: Resolve> ColorAwareHook<X> {
    pub fn new(resources: HashMap<String, PdfObject>, xref: X) -> Self {
        Self {
            base: BaseHook::new(),
            resources,
            xref,
        }
    }

    fn set_fill_color(&mut self, space: ColorSpace, operands: &[PdfObject]) {
        let comps: Vec<f64> = operands.iter().filter_map(|o| o.as_num().ok()).collect();
        let state = &mut self.base.states.state;
        state.fill_color = space.to_rgb(&comps);
        state.fill_color_space = space;
    }
}

impl<X: Resolve> StateHook for ColorAwareHook<X> {
    fn process(&mut self, op: OpCode, operands: &[PdfObject]) {
        // The base hook's behavior is preserved unconditionally.
        self.base.process(op, operands);

        match op {
            OpCode::SetFillColorSpace => {
                // Arity reconciliation guarantees the descriptor operand.
                if let Some(desc) = operands.first() {
                    match resolve_color_space(desc, &self.resources, &self.xref) {
                        Ok(space) => self.base.states.state.fill_color_space = space,
                        Err(e) => warn!("cs: cannot resolve color space: {e}"),
                    }
                }
            }
            OpCode::SetFillColor | OpCode::SetFillColorN => {
                let space = self.base.states.state.fill_color_space.clone();
                self.set_fill_color(space, operands);
            }
            OpCode::SetFillGray => self.set_fill_color(ColorSpace::DeviceGray, operands),
            OpCode::SetFillRgbColor => self.set_fill_color(ColorSpace::DeviceRgb, operands),
            OpCode::SetFillCmykColor => self.set_fill_color(ColorSpace::DeviceCmyk, operands),
            OpCode::SetTextRenderingMode => match operands.first().map(PdfObject::as_num) {
                Some(Ok(mode)) => self.base.states.state.text_render = mode as i32,
                _ => warn!("Tr with non-numeric operand, mode unchanged"),
            },
            _ => {}
        }
    }

    fn states(&self) -> &StateManager {
        &self.base.states
    }

    fn states_mut(&mut self) -> &mut StateManager {
        &mut self.base.states
    }
}
