//! A `dis`-style textual dump of a translated `Object` tree, the way
//! RustPython's own `CodeObject` implements `Display`.

use std::fmt::{self, Write as _};

use pybc_ir_core::{Node, Object, Terminator};

/// Render `object` and every nested object beneath it as indented text.
pub fn display_object(object: &Object) -> String {
    let mut out = String::new();
    write_object(&mut out, object, 0).expect("writing to a String never fails");
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn write_object(out: &mut String, object: &Object, depth: usize) -> fmt::Result {
    indent(out, depth);
    writeln!(out, "object {}:", object.name)?;
    for node in &object.toplevel {
        write_node(out, node, depth + 1)?;
    }
    if !object.classes.is_empty() {
        indent(out, depth + 1);
        writeln!(out, "classes: {:?}", object.classes)?;
    }
    if !object.functions.is_empty() {
        indent(out, depth + 1);
        writeln!(out, "functions: {:?}", object.functions.keys().collect::<Vec<_>>())?;
    }
    for (loc, nested) in &object.objects {
        indent(out, depth + 1);
        writeln!(out, "nested at {loc}:")?;
        write_object(out, nested, depth + 2)?;
    }
    Ok(())
}

fn write_node(out: &mut String, node: &Node, depth: usize) -> fmt::Result {
    indent(out, depth);
    writeln!(out, "{}:", node.label)?;
    for (loc, stmt) in &node.stmts {
        indent(out, depth + 1);
        writeln!(out, "{loc}: {stmt:?}")?;
    }
    indent(out, depth + 1);
    write_terminator(out, &node.last)?;
    writeln!(out)
}

fn write_terminator(out: &mut String, term: &Terminator) -> fmt::Result {
    match term {
        Terminator::Return(exp) => write!(out, "return {exp}"),
        Terminator::Jump(calls) => {
            write!(out, "jump ")?;
            for (i, call) in calls.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }
                write!(out, "{}({})", call.label, call.ssa_args.len())?;
            }
            Ok(())
        }
        Terminator::If { cond, then, or_else } => {
            write!(out, "if {cond} then ")?;
            write_terminator(out, then)?;
            write!(out, " else ")?;
            write_terminator(out, or_else)
        }
    }
}
