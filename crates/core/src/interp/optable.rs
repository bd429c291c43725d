//! Operator table: token -> opcode and arity contract.
//!
//! Built once, lazily, and shared read-only for the process lifetime.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// Maximum operand count of the generic color-set operators (`SCN`/`scn`),
/// and therefore the hard cap on pending operands: no operator in the
/// language takes more.
pub const MAX_OPERANDS: usize = 33;

/// Opcode for every recognized content stream operator.
///
/// Closed and dense so downstream dispatch can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    // Graphics state
    SetLineWidth,
    SetLineCap,
    SetLineJoin,
    SetMiterLimit,
    SetDash,
    SetRenderingIntent,
    SetFlatness,
    SetGState,
    Save,
    Restore,
    Transform,
    // Path construction
    MoveTo,
    LineTo,
    CurveTo,
    CurveTo2,
    CurveTo3,
    ClosePath,
    Rectangle,
    // Path painting
    Stroke,
    CloseStroke,
    Fill,
    EoFill,
    FillStroke,
    EoFillStroke,
    CloseFillStroke,
    CloseEoFillStroke,
    EndPath,
    // Clipping
    Clip,
    EoClip,
    // Text objects and state
    BeginText,
    EndText,
    SetCharSpacing,
    SetWordSpacing,
    SetHScale,
    SetLeading,
    SetFont,
    SetTextRenderingMode,
    SetTextRise,
    // Text positioning and showing
    MoveText,
    SetLeadingMoveText,
    SetTextMatrix,
    NextLine,
    ShowText,
    ShowSpacedText,
    NextLineShowText,
    NextLineSetSpacingShowText,
    // Type 3 glyph metrics
    SetCharWidth,
    SetCharWidthAndBounds,
    // Color
    SetStrokeColorSpace,
    SetFillColorSpace,
    SetStrokeColor,
    SetStrokeColorN,
    SetFillColor,
    SetFillColorN,
    SetStrokeGray,
    SetFillGray,
    SetStrokeRgbColor,
    SetFillRgbColor,
    SetStrokeCmykColor,
    SetFillCmykColor,
    // Shading
    ShadingFill,
    // Inline images
    BeginInlineImage,
    BeginImageData,
    EndInlineImage,
    // XObjects and marked content
    PaintXObject,
    MarkPoint,
    MarkPointProps,
    BeginMarkedContent,
    BeginMarkedContentProps,
    EndMarkedContent,
    // Compatibility
    BeginCompat,
    EndCompat,
}

/// Arity contract of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many operands; reconciled strictly.
    Fixed(u8),
    /// 0 up to this many operands. Over-supplied counts are dispatched
    /// untruncated with a diagnostic; producers in the wild rely on that
    /// leniency for the generic color-set forms.
    Variable(u8),
}

/// Opcode and arity contract for one operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorSpec {
    pub op: OpCode,
    pub arity: Arity,
}

/// Result of an operator table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// A recognized operator.
    Operator(&'a OperatorSpec),
    /// Recognized as a reserved non-operator token (partial keyword).
    Reserved,
    /// Not present in the table at all.
    Unknown,
}

/// Look up an operator token.
pub fn lookup(token: &str) -> Lookup<'_> {
    match OP_TABLE.get(token) {
        Some(Some(spec)) => Lookup::Operator(spec),
        Some(None) => Lookup::Reserved,
        None => Lookup::Unknown,
    }
}

static OP_TABLE: LazyLock<FxHashMap<&'static str, Option<OperatorSpec>>> = LazyLock::new(|| {
    use Arity::{Fixed, Variable};
    use OpCode::*;

    const OPS: &[(&str, OpCode, Arity)] = &[
        // Graphics state
        ("w", SetLineWidth, Fixed(1)),
        ("J", SetLineCap, Fixed(1)),
        ("j", SetLineJoin, Fixed(1)),
        ("M", SetMiterLimit, Fixed(1)),
        ("d", SetDash, Fixed(2)),
        ("ri", SetRenderingIntent, Fixed(1)),
        ("i", SetFlatness, Fixed(1)),
        ("gs", SetGState, Fixed(1)),
        ("q", Save, Fixed(0)),
        ("Q", Restore, Fixed(0)),
        ("cm", Transform, Fixed(6)),
        // Path
        ("m", MoveTo, Fixed(2)),
        ("l", LineTo, Fixed(2)),
        ("c", CurveTo, Fixed(6)),
        ("v", CurveTo2, Fixed(4)),
        ("y", CurveTo3, Fixed(4)),
        ("h", ClosePath, Fixed(0)),
        ("re", Rectangle, Fixed(4)),
        ("S", Stroke, Fixed(0)),
        ("s", CloseStroke, Fixed(0)),
        ("f", Fill, Fixed(0)),
        ("F", Fill, Fixed(0)),
        ("f*", EoFill, Fixed(0)),
        ("B", FillStroke, Fixed(0)),
        ("B*", EoFillStroke, Fixed(0)),
        ("b", CloseFillStroke, Fixed(0)),
        ("b*", CloseEoFillStroke, Fixed(0)),
        ("n", EndPath, Fixed(0)),
        // Clipping
        ("W", Clip, Fixed(0)),
        ("W*", EoClip, Fixed(0)),
        // Text
        ("BT", BeginText, Fixed(0)),
        ("ET", EndText, Fixed(0)),
        ("Tc", SetCharSpacing, Fixed(1)),
        ("Tw", SetWordSpacing, Fixed(1)),
        ("Tz", SetHScale, Fixed(1)),
        ("TL", SetLeading, Fixed(1)),
        ("Tf", SetFont, Fixed(2)),
        ("Tr", SetTextRenderingMode, Fixed(1)),
        ("Ts", SetTextRise, Fixed(1)),
        ("Td", MoveText, Fixed(2)),
        ("TD", SetLeadingMoveText, Fixed(2)),
        ("Tm", SetTextMatrix, Fixed(6)),
        ("T*", NextLine, Fixed(0)),
        ("Tj", ShowText, Fixed(1)),
        ("TJ", ShowSpacedText, Fixed(1)),
        ("'", NextLineShowText, Fixed(1)),
        ("\"", NextLineSetSpacingShowText, Fixed(3)),
        // Type 3 fonts
        ("d0", SetCharWidth, Fixed(2)),
        ("d1", SetCharWidthAndBounds, Fixed(6)),
        // Color
        ("CS", SetStrokeColorSpace, Fixed(1)),
        ("cs", SetFillColorSpace, Fixed(1)),
        ("SC", SetStrokeColor, Variable(4)),
        ("SCN", SetStrokeColorN, Variable(MAX_OPERANDS as u8)),
        ("sc", SetFillColor, Variable(4)),
        ("scn", SetFillColorN, Variable(MAX_OPERANDS as u8)),
        ("G", SetStrokeGray, Fixed(1)),
        ("g", SetFillGray, Fixed(1)),
        ("RG", SetStrokeRgbColor, Fixed(3)),
        ("rg", SetFillRgbColor, Fixed(3)),
        ("K", SetStrokeCmykColor, Fixed(4)),
        ("k", SetFillCmykColor, Fixed(4)),
        // Shading
        ("sh", ShadingFill, Fixed(1)),
        // Inline images
        ("BI", BeginInlineImage, Fixed(0)),
        ("ID", BeginImageData, Fixed(0)),
        ("EI", EndInlineImage, Fixed(1)),
        // XObjects and marked content
        ("Do", PaintXObject, Fixed(1)),
        ("MP", MarkPoint, Fixed(1)),
        ("DP", MarkPointProps, Fixed(2)),
        ("BMC", BeginMarkedContent, Fixed(1)),
        ("BDC", BeginMarkedContentProps, Fixed(2)),
        ("EMC", EndMarkedContent, Fixed(0)),
        // Compatibility
        ("BX", BeginCompat, Fixed(0)),
        ("EX", EndCompat, Fixed(0)),
    ];

    // Partial keywords the tokenizer can produce: recognized, but not
    // operators. Keeping them in the table lets the read loop distinguish
    // them from wholly unknown tokens.
    const RESERVED: &[&str] = &[
        "BM", "BD", "true", "fa", "fal", "fals", "false", "nu", "nul", "null",
    ];

    let mut table = FxHashMap::default();
    for &(token, op, arity) in OPS {
        table.insert(token, Some(OperatorSpec { op, arity }));
    }
    for &token in RESERVED {
        table.insert(token, None);
    }
    table
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_arities_match_catalogue() {
        for (token, op, k) in [
            ("cm", OpCode::Transform, 6),
            ("Td", OpCode::MoveText, 2),
            ("q", OpCode::Save, 0),
            ("\"", OpCode::NextLineSetSpacingShowText, 3),
            ("d1", OpCode::SetCharWidthAndBounds, 6),
            ("EI", OpCode::EndInlineImage, 1),
        ] {
            match lookup(token) {
                Lookup::Operator(spec) => {
                    assert_eq!(spec.op, op);
                    assert_eq!(spec.arity, Arity::Fixed(k));
                }
                other => panic!("{token}: expected operator, got {other:?}"),
            }
        }
    }

    #[test]
    fn generic_color_forms_are_variable() {
        for (token, max) in [("SC", 4), ("sc", 4), ("SCN", 33), ("scn", 33)] {
            match lookup(token) {
                Lookup::Operator(spec) => assert_eq!(spec.arity, Arity::Variable(max)),
                other => panic!("{token}: expected operator, got {other:?}"),
            }
        }
    }

    #[test]
    fn obsolete_fill_alias() {
        let (Lookup::Operator(f), Lookup::Operator(upper_f)) = (lookup("f"), lookup("F")) else {
            panic!("fill operators missing");
        };
        assert_eq!(f.op, OpCode::Fill);
        assert_eq!(upper_f.op, OpCode::Fill);
    }

    #[test]
    fn reserved_tokens_are_not_operators() {
        for token in ["true", "fals", "nu", "BM"] {
            assert_eq!(lookup(token), Lookup::Reserved);
        }
        assert_eq!(lookup("ZZ"), Lookup::Unknown);
    }
}
