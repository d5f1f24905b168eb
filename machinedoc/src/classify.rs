//! Declaration classifier.
//!
//! Splits the top-level declarations of a package into the units that get
//! documented: exported constant and variable groups, exported types with
//! their methods, and exported free functions.

use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::package::{is_exported, Decl, DeclToken, Expr, FuncDecl, GenDecl, Package, TypeSpec};

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("unknown receiver for {method}: {receiver}")]
    UnknownReceiver { method: String, receiver: String },

    #[error("receiver type {receiver} of method {method} is not a declared exported type")]
    UnregisteredReceiver { method: String, receiver: String },
}

/// An exported type together with the exported methods declared on it.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDoc<'a> {
    pub spec: &'a TypeSpec,
    pub doc: Option<&'a str>,
    pub methods: BTreeMap<String, &'a FuncDecl>,
}

/// Everything needed to render the reference page of one package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDoc<'a> {
    pub target: String,
    pub types: BTreeMap<String, TypeDoc<'a>>,
    pub funcs: BTreeMap<String, &'a FuncDecl>,
    pub constants: Vec<&'a GenDecl>,
    pub variables: Vec<&'a GenDecl>,
}

impl<'a> PackageDoc<'a> {
    pub fn classify(target: &str, package: &'a Package) -> Result<Self, ClassifyError> {
        let mut doc = PackageDoc {
            target: target.to_string(),
            types: BTreeMap::new(),
            funcs: BTreeMap::new(),
            constants: Vec::new(),
            variables: Vec::new(),
        };

        // Everything except functions first, so methods can find their type.
        for decl in package.decls() {
            let Decl::Gen(decl) = decl else {
                continue;
            };
            match decl.token {
                DeclToken::Const | DeclToken::Var => {
                    if !decl.has_exported_names() {
                        continue;
                    }
                    if decl.token == DeclToken::Const {
                        doc.constants.push(decl);
                    } else {
                        doc.variables.push(decl);
                    }
                }
                DeclToken::Type => {
                    for spec in decl.type_specs().filter(|s| is_exported(&s.name)) {
                        doc.types.insert(
                            spec.name.clone(),
                            TypeDoc {
                                spec,
                                doc: decl.doc.as_deref(),
                                methods: BTreeMap::new(),
                            },
                        );
                    }
                }
                DeclToken::Import => {}
            }
        }

        for decl in package.decls() {
            let Decl::Func(func) = decl else {
                continue;
            };
            if !is_exported(&func.name) {
                continue;
            }
            let Some(recv) = &func.recv else {
                doc.funcs.insert(func.name.clone(), func);
                continue;
            };
            let receiver = receiver_type_name(&recv.ty).ok_or_else(|| {
                ClassifyError::UnknownReceiver {
                    method: func.name.clone(),
                    receiver: recv.ty.to_string(),
                }
            })?;
            if !is_exported(receiver) {
                debug!("Skipping {}.{}: receiver type is not exported", receiver, func.name);
                continue;
            }
            let ty = doc.types.get_mut(receiver).ok_or_else(|| {
                ClassifyError::UnregisteredReceiver {
                    method: func.name.clone(),
                    receiver: receiver.to_string(),
                }
            })?;
            ty.methods.insert(func.name.clone(), func);
        }

        debug!(
            "Classified {}: {} types, {} functions, {} constant groups, {} variable groups",
            target,
            doc.types.len(),
            doc.funcs.len(),
            doc.constants.len(),
            doc.variables.len()
        );
        Ok(doc)
    }
}

/// Name of a receiver type `T` or `*T`. Anything else (generic
/// instantiations, qualified or nested pointers) is not a receiver shape
/// this package uses.
fn receiver_type_name(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Ident { name } => Some(name),
        Expr::Star { inner } => match inner.as_ref() {
            Expr::Ident { name } => Some(name),
            _ => None,
        },
        _ => None,
    }
}
