//! Operand accumulation and arity reconciliation.
//!
//! The read loop pulls tokens, accumulates operands, and reconciles them
//! against each operator's arity contract. Producers sometimes interleave
//! operands around operators (`/F2 /GS2 gs 5.711 Tf` is the classic case:
//! `gs` takes one operand, the leftover `/F2` belongs to `Tf`), so excess
//! leading operands of a fixed-arity operator are parked in a carryover
//! buffer and re-injected into the next operator's deficit.

use log::{debug, info, warn};

use crate::error::{PdfError, Result};
use crate::interp::hooks::StateHook;
use crate::interp::optable::{self, Arity, Lookup, MAX_OPERANDS, OpCode};
use crate::model::objects::PdfObject;
use crate::parser::{ContentToken, TokenSource};

/// One normalized content stream operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub op: OpCode,
    pub operands: Vec<PdfObject>,
}

/// Preprocessing engine over one content stream.
///
/// Owns the operand and carryover buffers and the active state hook;
/// independent streams need independent instances. Two read conventions
/// are offered: [`read`](Self::read) returns an owned [`Operation`]
/// (allocating an operand list only when operands exist), while
/// [`read_into`](Self::read_into) fills a caller-reused buffer so hot
/// callers pay no per-operation allocation.
pub struct Preprocessor<T, H> {
    source: T,
    hook: H,
    /// Operands displaced during reconciliation, used LIFO. Empty between
    /// unrelated streams; only bridges adjacent operators.
    carryover: Vec<PdfObject>,
}

impl<T: TokenSource, H: StateHook> Preprocessor<T, H> {
    pub fn new(source: T, hook: H) -> Self {
        Self {
            source,
            hook,
            carryover: Vec::new(),
        }
    }

    /// Read the next operation, allocating a fresh operand list.
    ///
    /// Returns `Ok(None)` once the stream ends.
    pub fn read(&mut self) -> Result<Option<Operation>> {
        let mut operands = Vec::new();
        Ok(self
            .read_into(&mut operands)?
            .map(|op| Operation { op, operands }))
    }

    /// Read the next operation into a caller-supplied operand buffer.
    ///
    /// The buffer is cleared on entry and holds the reconciled operand
    /// list when `Ok(Some(op))` is returned.
    pub fn read_into(&mut self, operands: &mut Vec<PdfObject>) -> Result<Option<OpCode>> {
        operands.clear();

        loop {
            let token = match self.source.next_token()? {
                Some(token) => token,
                None => return Ok(None),
            };

            let tok = match token {
                ContentToken::Operand(obj) => {
                    operands.push(obj);
                    if operands.len() > MAX_OPERANDS {
                        return Err(PdfError::TooManyOperands);
                    }
                    continue;
                }
                ContentToken::Operator(tok) => tok,
            };

            let spec = match optable::lookup(&tok) {
                Lookup::Operator(spec) => spec,
                Lookup::Reserved => {
                    debug!("ignoring reserved token {:?}", tok);
                    continue;
                }
                Lookup::Unknown => {
                    warn!("unknown operator {:?}", tok);
                    continue;
                }
            };

            match spec.arity {
                Arity::Fixed(k) => {
                    let k = usize::from(k);
                    if operands.len() > k {
                        // Park the earliest-pulled excess, preserving order.
                        let excess = operands.len() - k;
                        self.carryover.extend(operands.drain(..excess));
                    }
                    while operands.len() < k {
                        match self.carryover.pop() {
                            Some(obj) => operands.insert(0, obj),
                            None => break,
                        }
                    }
                    if operands.len() < k {
                        // Too few operands even after carryover exchange:
                        // the operator cannot be executed, so skip it.
                        warn!(
                            "skipping {:?}: expected {} operands, received {}",
                            spec.op,
                            k,
                            operands.len()
                        );
                        operands.clear();
                        continue;
                    }
                }
                Arity::Variable(max) => {
                    if operands.len() > usize::from(max) {
                        // Dispatched untruncated; tolerated by convention.
                        info!(
                            "{:?}: expected [0, {}] operands, received {}",
                            spec.op,
                            max,
                            operands.len()
                        );
                    }
                }
            }

            self.hook.process(spec.op, operands);
            return Ok(Some(spec.op));
        }
    }

    /// Current save-stack depth of the hook's graphics state.
    pub fn saved_states_depth(&self) -> usize {
        self.hook.states().depth()
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    pub fn hook_mut(&mut self) -> &mut H {
        &mut self.hook
    }

    /// Consume the engine, yielding the hook and its final state.
    pub fn into_hook(self) -> H {
        self.hook
    }
}
