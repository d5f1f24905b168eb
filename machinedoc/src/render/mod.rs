//! Reference page rendering.
//!
//! Produces the `machine/<target>.md` page listing the exported API of a
//! machine package: constants, variables, free functions, then each type
//! followed by its methods. Maps are ordered, so the page is stable across
//! runs.

pub mod format;

use crate::classify::{PackageDoc, TypeDoc};
use crate::package::FuncDecl;

pub use format::{code_block, format_func, format_gen_decl, format_receiver, format_type_spec};

pub fn render_reference(doc: &PackageDoc<'_>) -> String {
    let mut out = format!("---\ntitle: {}\n---\n", doc.target);

    if !doc.constants.is_empty() {
        out.push_str("\n## Constants\n");
        for decl in &doc.constants {
            push_block(&mut out, &format_gen_decl(decl), decl.doc.as_deref());
        }
    }

    if !doc.variables.is_empty() {
        out.push_str("\n## Variables\n");
        for decl in &doc.variables {
            push_block(&mut out, &format_gen_decl(decl), decl.doc.as_deref());
        }
    }

    for (name, func) in &doc.funcs {
        out.push_str(&format!("\n### func {}\n", name));
        push_func(&mut out, func);
    }

    for (name, ty) in &doc.types {
        push_type(&mut out, name, ty);
    }

    out
}

fn push_type(out: &mut String, name: &str, ty: &TypeDoc<'_>) {
    out.push_str(&format!("\n## type {}\n", name));
    push_block(out, &format_type_spec(ty.spec), ty.doc);

    for (method, func) in &ty.methods {
        let receiver = func.recv.as_ref().map(format_receiver).unwrap_or_default();
        out.push_str(&format!("\n### func ({}) {}\n", receiver, method));
        push_func(out, func);
    }
}

fn push_func(out: &mut String, func: &FuncDecl) {
    push_block(out, &format_func(func), func.doc.as_deref());
}

fn push_block(out: &mut String, source: &str, doc: Option<&str>) {
    out.push('\n');
    out.push_str(&code_block(source));
    if let Some(doc) = doc.map(str::trim_end).filter(|d| !d.is_empty()) {
        out.push_str(doc);
        out.push('\n');
    }
}
