//! Top-level declaration model of a loaded machine package.
//!
//! Mirrors the shape of Go source declarations closely enough to classify
//! them, inspect constant initializers, and print them back as Go source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an identifier is visible outside its package (first character is
/// an upper-case letter).
pub fn is_exported(name: &str) -> bool {
    name.chars().next().map_or(false, char::is_uppercase)
}

/// One source file of the package, declarations in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    #[serde(default)]
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

/// Keyword that introduced a general declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclToken {
    Const,
    Var,
    Type,
    Import,
}

impl DeclToken {
    pub fn keyword(&self) -> &'static str {
        match self {
            DeclToken::Const => "const",
            DeclToken::Var => "var",
            DeclToken::Type => "type",
            DeclToken::Import => "import",
        }
    }
}

/// A `const`, `var`, `type` or `import` declaration, possibly grouped in
/// parentheses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenDecl {
    pub token: DeclToken,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub grouped: bool,
    #[serde(default)]
    pub specs: Vec<Spec>,
}

impl GenDecl {
    pub fn value_specs(&self) -> impl Iterator<Item = &ValueSpec> {
        self.specs.iter().filter_map(|spec| match spec {
            Spec::Value(value) => Some(value),
            _ => None,
        })
    }

    pub fn type_specs(&self) -> impl Iterator<Item = &TypeSpec> {
        self.specs.iter().filter_map(|spec| match spec {
            Spec::Type(ty) => Some(ty),
            _ => None,
        })
    }

    /// True if any name declared by a value spec of this group is exported.
    pub fn has_exported_names(&self) -> bool {
        self.value_specs()
            .flat_map(|spec| spec.names.iter())
            .any(|name| is_exported(name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Spec {
    Value(ValueSpec),
    Type(TypeSpec),
    Import(ImportSpec),
}

/// One line of a `const` or `var` declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub names: Vec<String>,
    #[serde(default, rename = "type")]
    pub ty: Option<Expr>,
    #[serde(default)]
    pub values: Vec<Expr>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ValueSpec {
    /// First declared name. Specs always declare at least one name.
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }

    /// Shape of the first initializer expression.
    pub fn initializer(&self) -> Initializer<'_> {
        match self.values.first() {
            None => Initializer::Implicit,
            Some(Expr::BasicLit { .. }) => Initializer::Literal,
            Some(Expr::Binary { .. }) => Initializer::Binary,
            Some(Expr::Ident { name }) if name == "iota" => Initializer::Iota,
            Some(Expr::Ident { name }) => Initializer::Reference(name),
            Some(other) => Initializer::Unrecognized(other),
        }
    }
}

/// How a constant obtained its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Initializer<'a> {
    /// No initializer: repeats the previous expression of an enumerated group.
    Implicit,
    /// `GPIO5 Pin = 5`
    Literal,
    /// `PB02 = portB + 2`
    Binary,
    /// `GPIO0 Pin = iota`
    Iota,
    /// `D13 = PB5`
    Reference(&'a str),
    Unrecognized(&'a Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: String,
    /// `type A = B` rather than `type A B`.
    #[serde(default)]
    pub alias: bool,
    #[serde(rename = "type")]
    pub ty: Expr,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub path: String,
}

/// A function or method declaration; bodies are not modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: String,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub recv: Option<Field>,
    #[serde(default)]
    pub params: Vec<Field>,
    #[serde(default)]
    pub results: Vec<Field>,
}

impl FuncDecl {
    pub fn is_method(&self) -> bool {
        self.recv.is_some()
    }
}

/// A parameter, result or receiver: zero or more names sharing one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(rename = "type")]
    pub ty: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    BasicLit { value: String },
    Ident { name: String },
    Binary { op: String, lhs: Box<Expr>, rhs: Box<Expr> },
    Unary { op: String, operand: Box<Expr> },
    Star { inner: Box<Expr> },
    Paren { inner: Box<Expr> },
    Call { func: Box<Expr>, #[serde(default)] args: Vec<Expr> },
    Selector { base: Box<Expr>, sel: String },
    Index { base: Box<Expr>, indices: Vec<Expr> },
    /// Anything else, kept as source text.
    Raw { text: String },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident { name: name.into() }
    }

    pub fn lit(value: impl Into<String>) -> Self {
        Expr::BasicLit { value: value.into() }
    }

    pub fn binary(lhs: Expr, op: impl Into<String>, rhs: Expr) -> Self {
        Expr::Binary {
            op: op.into(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn star(inner: Expr) -> Self {
        Expr::Star { inner: Box::new(inner) }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Expr::Raw { text: text.into() }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::BasicLit { value } => write!(f, "{}", value),
            Expr::Ident { name } => write!(f, "{}", name),
            Expr::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            Expr::Unary { op, operand } => write!(f, "{}{}", op, operand),
            Expr::Star { inner } => write!(f, "*{}", inner),
            Expr::Paren { inner } => write!(f, "({})", inner),
            Expr::Call { func, args } => {
                write!(f, "{}(", func)?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Expr::Selector { base, sel } => write!(f, "{}.{}", base, sel),
            Expr::Index { base, indices } => {
                write!(f, "{}[", base)?;
                write_list(f, indices)?;
                write!(f, "]")
            }
            Expr::Raw { text } => write!(f, "{}", text),
        }
    }
}
