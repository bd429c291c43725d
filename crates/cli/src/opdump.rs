//! opdump - Dump the operations of a PDF content stream.
//!
//! Runs the preprocessor over a raw content stream file and prints one
//! JSON object per emitted operation.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use opstream_core::{
    BaseHook, ColorAwareHook, ContentLexer, NoResolve, Operation, PdfObject, Preprocessor, Result,
    StateHook, TokenSource,
};
use serde_json::{Value, json};

/// Dump the normalized operation sequence of a content stream.
#[derive(Parser, Debug)]
#[command(name = "opdump")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a raw (already decoded) content stream
    file: PathBuf,

    /// Track fill color and text rendering mode while dumping
    #[arg(short = 'c', long, action = ArgAction::SetTrue)]
    color: bool,

    /// Append the final graphics state as a trailing JSON object
    #[arg(short = 's', long = "final-state", action = ArgAction::SetTrue)]
    final_state: bool,
}

fn operand_to_json(obj: &PdfObject) -> Value {
    match obj {
        PdfObject::Null => Value::Null,
        PdfObject::Bool(b) => json!(b),
        PdfObject::Int(n) => json!(n),
        PdfObject::Real(n) => json!(n),
        PdfObject::Name(name) => json!(format!("/{}", name)),
        PdfObject::String(bytes) => json!(String::from_utf8_lossy(bytes)),
        PdfObject::Array(items) => Value::Array(items.iter().map(operand_to_json).collect()),
        PdfObject::Dict(dict) => Value::Object(
            dict.iter()
                .map(|(k, v)| (k.clone(), operand_to_json(v)))
                .collect(),
        ),
        PdfObject::Ref(r) => json!(format!("{} {} R", r.objid, r.genno)),
    }
}

fn dump<T: TokenSource, H: StateHook>(
    mut pre: Preprocessor<T, H>,
    args: &Args,
    out: &mut impl Write,
) -> Result<usize> {
    let mut count = 0usize;
    loop {
        let Some(Operation { op, operands }) = pre.read()? else {
            break;
        };
        let operands: Vec<Value> = operands.iter().map(operand_to_json).collect();
        writeln!(out, "{}", json!({ "op": format!("{:?}", op), "operands": operands }))?;
        count += 1;
    }

    if args.final_state {
        let state = &pre.hook().states().state;
        let (a, b, c, d, e, f) = state.ctm;
        writeln!(
            out,
            "{}",
            json!({
                "ctm": [a, b, c, d, e, f],
                "stackDepth": pre.saved_states_depth(),
                "fillColor": state.fill_color,
                "fillColorSpace": format!("{:?}", state.fill_color_space),
                "textRender": state.text_render,
            })
        )?;
    }
    Ok(count)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let data = match fs::read(&args.file) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.file.display(), e);
            std::process::exit(1);
        }
    };

    let mut out = BufWriter::new(io::stdout());
    let lexer = ContentLexer::new(&data);
    let result = if args.color {
        dump(
            Preprocessor::new(lexer, ColorAwareHook::new(HashMap::new(), NoResolve)),
            &args,
            &mut out,
        )
    } else {
        dump(Preprocessor::new(lexer, BaseHook::new()), &args, &mut out)
    };

    match result.and_then(|count| out.flush().map(|()| count).map_err(Into::into)) {
        Ok(count) => eprintln!("{} operations", count),
        Err(e) => {
            eprintln!("Error processing {}: {}", args.file.display(), e);
            std::process::exit(1);
        }
    }
}
