//! Type information of a loaded package and the read-only query interface
//! used by capability detection and pin resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A type as seen by the type checker. Equality is type identity: named
/// types are identical iff they come from the same package and have the
/// same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Named { package: String, name: String },
    Pointer { elem: Box<TypeRef> },
    Basic { name: String },
    Other { text: String },
}

impl TypeRef {
    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef::Named {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn pointer(elem: TypeRef) -> Self {
        TypeRef::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn basic(name: impl Into<String>) -> Self {
        TypeRef::Basic { name: name.into() }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named { package, name } if package.is_empty() => write!(f, "{}", name),
            TypeRef::Named { package, name } => write!(f, "{}.{}", package, name),
            TypeRef::Pointer { elem } => write!(f, "*{}", elem),
            TypeRef::Basic { name } => write!(f, "{}", name),
            TypeRef::Other { text } => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Const,
    Var,
    TypeName,
    Func,
}

/// Value of a typed or untyped constant. Integers are kept as decimal text
/// since constants have arbitrary precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConstValue {
    Int(String),
    Float(String),
    String(String),
    Bool(bool),
}

impl ConstValue {
    /// The value as an unsigned 64-bit integer, if it is an integer that fits.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ConstValue::Int(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(text) | ConstValue::Float(text) => write!(f, "{}", text),
            ConstValue::String(text) => write!(f, "{:?}", text),
            ConstValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A package-level object: constant, variable, type name or function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub kind: ObjectKind,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub value: Option<ConstValue>,
}

/// A method declared on a named type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub pointer_receiver: bool,
    #[serde(default)]
    pub params: Vec<TypeRef>,
    #[serde(default)]
    pub results: Vec<TypeRef>,
}

/// Narrow view on package type information. Detection rules are written
/// against this trait only.
pub trait TypeQuery {
    /// Resolve a package-level name.
    fn lookup(&self, name: &str) -> Option<&Object>;

    /// The method set of `ty`: value-receiver methods of a named type, or
    /// all methods of its named element when `ty` is a pointer.
    fn method_set(&self, ty: &TypeRef) -> Vec<&Method>;

    fn lookup_method(&self, ty: &TypeRef, name: &str) -> Option<&Method> {
        self.method_set(ty).into_iter().find(|m| m.name == name)
    }
}

/// Package scope: every package-level object plus the methods declared on
/// each named type of the package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    pub package: String,
    #[serde(default)]
    pub objects: BTreeMap<String, Object>,
    #[serde(default)]
    pub methods: BTreeMap<String, Vec<Method>>,
}

impl Scope {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, object: Object) {
        self.objects.insert(name.into(), object);
    }

    pub fn add_method(&mut self, type_name: impl Into<String>, method: Method) {
        self.methods.entry(type_name.into()).or_default().push(method);
    }

    fn declared_methods(&self, package: &str, name: &str) -> &[Method] {
        if package != self.package {
            return &[];
        }
        self.methods.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl TypeQuery for Scope {
    fn lookup(&self, name: &str) -> Option<&Object> {
        self.objects.get(name)
    }

    fn method_set(&self, ty: &TypeRef) -> Vec<&Method> {
        match ty {
            TypeRef::Named { package, name } => self
                .declared_methods(package, name)
                .iter()
                .filter(|m| !m.pointer_receiver)
                .collect(),
            TypeRef::Pointer { elem } => match elem.as_ref() {
                TypeRef::Named { package, name } => {
                    self.declared_methods(package, name).iter().collect()
                }
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}
