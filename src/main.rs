//! Reads a decoded bytecode code object from a JSON file and prints the
//! translated register/SSA IR in a `dis`-style dump.
//!
//! example usage:
//! $ cargo run --release -- --debug demo.json

#[macro_use]
extern crate log;

use std::fs;
use std::path::PathBuf;

use lexopt::ValueExt;
use pybc_compiler::{CodeObject, TranslateOpts};

fn main() -> Result<(), lexopt::Error> {
    env_logger::init();

    let mut inputs = vec![];
    let mut debug = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        use lexopt::Arg::*;
        match arg {
            Long("help") | Short('h') => {
                let bin_name = parser.bin_name().unwrap_or("pybc2ir");
                println!("usage: {bin_name} <code-object.json...> [--debug]");
                println!(
                    "Translates decoded bytecode code objects (JSON) into register/SSA IR and prints the result."
                );
                return Ok(());
            }
            Value(x) => inputs.push(PathBuf::from(x)),
            Long("debug") => debug = true,
            _ => return Err(arg.unexpected()),
        }
    }

    if inputs.is_empty() {
        return Err("expected at least one code-object JSON file".into());
    }

    let opts = TranslateOpts { debug };

    for path in &inputs {
        if let Err(e) = translate_one(path, opts) {
            error!("error while translating {}: {e}", path.display());
        }
    }

    Ok(())
}

fn translate_one(path: &std::path::Path, opts: TranslateOpts) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let code: CodeObject = serde_json::from_str(&text)?;
    println!("{}:", path.display());
    let object = pybc_compiler::translate_code_object(&code, opts)?;
    println!("{}", pybc_compiler::display_object(&object));
    Ok(())
}
