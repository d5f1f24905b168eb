//! Printing declarations back as Go source.
//!
//! Only signatures and declarations are printed; function bodies are not
//! part of the model. Groups are indented with tabs like gofmt output,
//! without gofmt's column alignment.

use crate::package::{Field, FuncDecl, GenDecl, Spec, TypeSpec, ValueSpec};

/// Wrap source text in a fenced `go` block.
pub fn code_block(source: &str) -> String {
    format!("```go\n{}\n```\n", source)
}

pub fn format_gen_decl(decl: &GenDecl) -> String {
    let keyword = decl.token.keyword();
    let specs: Vec<&Spec> = decl
        .specs
        .iter()
        .filter(|spec| !matches!(spec, Spec::Import(_)))
        .collect();

    if !decl.grouped && specs.len() == 1 {
        return format!("{} {}", keyword, format_spec(specs[0]));
    }

    let mut out = format!("{} (\n", keyword);
    for spec in specs {
        if let Some(doc) = spec_doc(spec) {
            for line in doc.trim_end().lines() {
                if line.is_empty() {
                    out.push_str("\t//\n");
                } else {
                    out.push_str(&format!("\t// {}\n", line));
                }
            }
        }
        for line in format_spec(spec).lines() {
            out.push('\t');
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push(')');
    out
}

pub fn format_type_spec(spec: &TypeSpec) -> String {
    format!("type {}", format_spec_type(spec))
}

/// `func (recv) Name(params) results`, without a body.
pub fn format_func(func: &FuncDecl) -> String {
    let mut out = String::from("func ");
    if let Some(recv) = &func.recv {
        out.push_str(&format!("({}) ", format_field(recv)));
    }
    out.push_str(&func.name);
    out.push('(');
    out.push_str(&format_fields(&func.params));
    out.push(')');

    match func.results.as_slice() {
        [] => {}
        [single] if single.names.is_empty() => {
            out.push(' ');
            out.push_str(&single.ty.to_string());
        }
        results => {
            out.push_str(&format!(" ({})", format_fields(results)));
        }
    }
    out
}

/// Receiver type as written, e.g. `*UART`.
pub fn format_receiver(recv: &Field) -> String {
    recv.ty.to_string()
}

fn spec_doc(spec: &Spec) -> Option<&str> {
    match spec {
        Spec::Value(value) => value.doc.as_deref(),
        Spec::Type(ty) => ty.doc.as_deref(),
        Spec::Import(_) => None,
    }
}

fn format_spec(spec: &Spec) -> String {
    let (text, comment) = match spec {
        Spec::Value(value) => (format_value_spec(value), value.comment.as_deref()),
        Spec::Type(ty) => (format_spec_type(ty), ty.comment.as_deref()),
        Spec::Import(import) => (format!("{:?}", import.path), None),
    };
    match comment {
        Some(comment) => format!("{} // {}", text, comment.trim()),
        None => text,
    }
}

fn format_value_spec(spec: &ValueSpec) -> String {
    let mut out = spec.names.join(", ");
    if let Some(ty) = &spec.ty {
        out.push(' ');
        out.push_str(&ty.to_string());
    }
    if !spec.values.is_empty() {
        let values: Vec<String> = spec.values.iter().map(|v| v.to_string()).collect();
        out.push_str(" = ");
        out.push_str(&values.join(", "));
    }
    out
}

fn format_spec_type(spec: &TypeSpec) -> String {
    if spec.alias {
        format!("{} = {}", spec.name, spec.ty)
    } else {
        format!("{} {}", spec.name, spec.ty)
    }
}

fn format_field(field: &Field) -> String {
    if field.names.is_empty() {
        field.ty.to_string()
    } else {
        format!("{} {}", field.names.join(", "), field.ty)
    }
}

fn format_fields(fields: &[Field]) -> String {
    fields.iter().map(format_field).collect::<Vec<_>>().join(", ")
}
