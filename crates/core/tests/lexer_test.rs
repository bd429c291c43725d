//! Tests for the content stream tokenizer.

use opstream_core::{ContentLexer, ContentToken, PdfObject, TokenSource};

fn tokens(stream: &[u8]) -> Vec<ContentToken> {
    let mut lexer = ContentLexer::new(stream);
    let mut out = Vec::new();
    while let Some(tok) = lexer.next_token().unwrap() {
        out.push(tok);
    }
    out
}

fn operators(stream: &[u8]) -> Vec<String> {
    tokens(stream)
        .into_iter()
        .filter_map(|t| match t {
            ContentToken::Operator(op) => Some(op.to_string()),
            ContentToken::Operand(_) => None,
        })
        .collect()
}

#[test]
fn numbers_and_operators() {
    let toks = tokens(b"100 -5 +3 .5 -0.7 2. m");

    assert_eq!(
        toks,
        vec![
            ContentToken::Operand(PdfObject::Int(100)),
            ContentToken::Operand(PdfObject::Int(-5)),
            ContentToken::Operand(PdfObject::Int(3)),
            ContentToken::Operand(PdfObject::Real(0.5)),
            ContentToken::Operand(PdfObject::Real(-0.7)),
            ContentToken::Operand(PdfObject::Real(2.0)),
            ContentToken::Operator("m".into()),
        ]
    );
}

#[test]
fn empty_stream_yields_nothing() {
    assert!(tokens(b"\n\n  \n\n").is_empty());
}

#[test]
fn comments_are_skipped() {
    let toks = tokens(b"1 % operand count is in flux\n2 Td");
    assert_eq!(toks.len(), 3);
}

#[test]
fn names_with_hex_escapes() {
    let toks = tokens(b"/Name /A#42C /With#20Space");

    assert_eq!(
        toks,
        vec![
            ContentToken::Operand(PdfObject::Name("Name".into())),
            ContentToken::Operand(PdfObject::Name("ABC".into())),
            ContentToken::Operand(PdfObject::Name("With Space".into())),
        ]
    );
}

#[test]
fn literal_string_escapes() {
    let toks = tokens(b"(simple) (with (nested) parens) (esc\\t\\)\\\\) (\\101)");

    let strings: Vec<Vec<u8>> = toks
        .into_iter()
        .map(|t| match t {
            ContentToken::Operand(PdfObject::String(s)) => s,
            other => panic!("expected string, got {:?}", other),
        })
        .collect();
    assert_eq!(strings[0], b"simple");
    assert_eq!(strings[1], b"with (nested) parens");
    assert_eq!(strings[2], b"esc\t)\\");
    assert_eq!(strings[3], b"A");
}

#[test]
fn hex_strings_pad_odd_digits() {
    let toks = tokens(b"<48 65 6C> <7>");

    assert_eq!(
        toks,
        vec![
            ContentToken::Operand(PdfObject::String(b"Hel".to_vec())),
            ContentToken::Operand(PdfObject::String(vec![0x70])),
        ]
    );
}

#[test]
fn arrays_collapse_into_one_operand() {
    let toks = tokens(b"[(A) -120 (B)] TJ");

    assert_eq!(toks.len(), 2);
    assert_eq!(
        toks[0],
        ContentToken::Operand(PdfObject::Array(vec![
            PdfObject::String(b"A".to_vec()),
            PdfObject::Int(-120),
            PdfObject::String(b"B".to_vec()),
        ]))
    );
    assert_eq!(toks[1], ContentToken::Operator("TJ".into()));
}

#[test]
fn nested_dicts() {
    let toks = tokens(b"/MC0 << /MCID 5 /Extra << /Deep true >> >> BDC");

    assert_eq!(toks.len(), 3);
    let ContentToken::Operand(PdfObject::Dict(dict)) = &toks[1] else {
        panic!("expected dict, got {:?}", toks[1]);
    };
    assert_eq!(dict.get("MCID"), Some(&PdfObject::Int(5)));
    let Some(PdfObject::Dict(inner)) = dict.get("Extra") else {
        panic!("expected nested dict");
    };
    assert_eq!(inner.get("Deep"), Some(&PdfObject::Bool(true)));
}

#[test]
fn true_false_null_are_values_not_operators() {
    let toks = tokens(b"true false null");

    assert_eq!(
        toks,
        vec![
            ContentToken::Operand(PdfObject::Bool(true)),
            ContentToken::Operand(PdfObject::Bool(false)),
            ContentToken::Operand(PdfObject::Null),
        ]
    );
}

#[test]
fn star_and_quote_operators() {
    assert_eq!(operators(b"b*RG"), vec!["b*", "RG"]);
    assert_eq!(operators(b"W* n T*"), vec!["W*", "n", "T*"]);
    assert_eq!(operators(b"( )'\""), vec!["'", "\""]);
}

#[test]
fn rg_after_numbers_is_an_operator() {
    let toks = tokens(b"1 1 1 RG");

    assert_eq!(
        toks,
        vec![
            ContentToken::Operand(PdfObject::Int(1)),
            ContentToken::Operand(PdfObject::Int(1)),
            ContentToken::Operand(PdfObject::Int(1)),
            ContentToken::Operator("RG".into()),
        ]
    );
}

#[test]
fn inline_image_becomes_the_ei_operand() {
    let toks = tokens(b"BI /W 2 /H 2 ID \x00\x01\xfe\xff EI Q");

    assert_eq!(toks.len(), 5);
    assert_eq!(toks[0], ContentToken::Operator("BI".into()));
    assert_eq!(toks[1], ContentToken::Operator("ID".into()));
    let ContentToken::Operand(PdfObject::Dict(image)) = &toks[2] else {
        panic!("expected the packaged image dictionary, got {:?}", toks[2]);
    };
    assert_eq!(image.get("W"), Some(&PdfObject::Int(2)));
    assert_eq!(image.get("H"), Some(&PdfObject::Int(2)));
    assert_eq!(
        image.get("Data"),
        Some(&PdfObject::String(vec![0x00, 0x01, 0xfe, 0xff]))
    );
    assert_eq!(toks[3], ContentToken::Operator("EI".into()));
    assert_eq!(toks[4], ContentToken::Operator("Q".into()));
}

#[test]
fn inline_image_data_may_contain_letters() {
    // "EI" inside the data only terminates at a whitespace boundary.
    let toks = tokens(b"ID xEIx zz EI");

    assert_eq!(
        toks,
        vec![
            ContentToken::Operator("ID".into()),
            ContentToken::Operand(PdfObject::String(b"xEIx zz".to_vec())),
            ContentToken::Operator("EI".into()),
        ]
    );
}
