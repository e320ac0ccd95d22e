//! The target graph: the shadow type system under construction.
//!
//! Discovery creates a skeleton for every type (module, name, generic
//! arity). Generic parameters and base types are filled in by the finalize
//! pass; everything else is written by passes outside this workspace.
//!
//! # Imports
//!
//! A reference from one module to anything outside it goes through an
//! import request ([`TargetGraph::import_type`], [`TargetGraph::import_external`],
//! [`TargetGraph::import_method`]). The request returns the handle to embed
//! in signatures and records a [`ModuleReference`] on the importing module.
//! Recording only needs `&self`, so imports can be issued while the graph
//! is shared with the rewrite engine.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::{GenericParamAttrs, ModuleId, NewMethodId, NewTypeId};
use crate::well_known::{SYSTEM_ENUM, SYSTEM_VALUE_TYPE};

/// Library that defines an external type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExternalScope {
    /// The output runtime's standard library.
    Corlib,
    /// The interop support library.
    Runtime,
}

/// A type defined outside the target graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExternalRef {
    pub scope: ExternalScope,
    pub full_name: String,
    pub is_value_type: bool,
}

impl ExternalRef {
    pub fn corlib(full_name: impl Into<String>, is_value_type: bool) -> Self {
        Self {
            scope: ExternalScope::Corlib,
            full_name: full_name.into(),
            is_value_type,
        }
    }

    pub fn runtime(full_name: impl Into<String>) -> Self {
        Self {
            scope: ExternalScope::Runtime,
            full_name: full_name.into(),
            is_value_type: false,
        }
    }
}

/// The declaration that owns a generic parameter in the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NewGenericOwner {
    Type(NewTypeId),
    Method(NewMethodId),
}

/// A type reference in the output, as returned by import requests.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NewSig {
    /// A type defined in the target graph.
    Defined(NewTypeId),
    /// A type from the output corlib or the support library.
    External(ExternalRef),
    GenericInstance {
        generic: Box<NewSig>,
        args: Vec<NewSig>,
    },
    ByRef(Box<NewSig>),
    Pointer(Box<NewSig>),
    /// Parameter `position` of `owner`; identity is positional.
    GenericParam {
        owner: NewGenericOwner,
        position: u16,
    },
}

impl NewSig {
    pub fn instance(generic: NewSig, args: Vec<NewSig>) -> Self {
        NewSig::GenericInstance {
            generic: Box::new(generic),
            args,
        }
    }

    /// The definition at the head of this signature, if it is a defined type
    /// or an instantiation of one.
    pub fn head_type(&self) -> Option<NewTypeId> {
        match self {
            NewSig::Defined(id) => Some(*id),
            NewSig::GenericInstance { generic, .. } => generic.head_type(),
            _ => None,
        }
    }
}

/// A materialized generic parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewGenericParam {
    pub name: String,
    pub attrs: GenericParamAttrs,
    /// Explicit `unmanaged` marker.
    pub is_unmanaged: bool,
    pub constraints: Vec<NewSig>,
}

/// A type in the target graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewType {
    pub module: ModuleId,
    pub namespace: String,
    pub name: String,
    pub generic_arity: usize,
    /// Empty until finalized.
    pub generic_params: Vec<NewGenericParam>,
    /// `None` until finalized.
    pub base_type: Option<NewSig>,
}

impl NewType {
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Whether this type is a value type in the output runtime.
    ///
    /// Decided by the base type, so it only becomes `true` once the base has
    /// been set to the value-type or enum base.
    pub fn is_value_type(&self) -> bool {
        match &self.base_type {
            Some(NewSig::External(ext)) => {
                ext.scope == ExternalScope::Corlib
                    && (ext.full_name == SYSTEM_VALUE_TYPE || ext.full_name == SYSTEM_ENUM)
            }
            _ => false,
        }
    }
}

/// A method in the target graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMethod {
    pub declaring_type: NewTypeId,
    pub name: String,
    pub generic_params: Vec<NewGenericParam>,
}

/// An importable call target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NewMethodRef {
    pub declaring_type: NewTypeId,
    pub method: NewMethodId,
}

/// Something a module refers to outside itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleReference {
    Module(ModuleId),
    External(ExternalScope),
}

/// An output module.
#[derive(Debug)]
pub struct TargetModule {
    name: String,
    references: RefCell<BTreeSet<ModuleReference>>,
}

impl TargetModule {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of every reference recorded so far, in sorted order.
    pub fn references(&self) -> Vec<ModuleReference> {
        self.references.borrow().iter().copied().collect()
    }

    pub fn references_module(&self, module: ModuleId) -> bool {
        self.references
            .borrow()
            .contains(&ModuleReference::Module(module))
    }

    fn record(&self, reference: ModuleReference) {
        self.references.borrow_mut().insert(reference);
    }
}

/// The shadow type system.
#[derive(Debug, Default)]
pub struct TargetGraph {
    modules: Vec<TargetModule>,
    types: Vec<NewType>,
    methods: Vec<NewMethod>,
}

impl TargetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, name: impl Into<String>) -> ModuleId {
        let id = ModuleId::from_index(self.modules.len());
        self.modules.push(TargetModule {
            name: name.into(),
            references: RefCell::new(BTreeSet::new()),
        });
        id
    }

    /// Add a type skeleton.
    pub fn add_type(
        &mut self,
        module: ModuleId,
        namespace: impl Into<String>,
        name: impl Into<String>,
        generic_arity: usize,
    ) -> NewTypeId {
        let id = NewTypeId::from_index(self.types.len());
        self.types.push(NewType {
            module,
            namespace: namespace.into(),
            name: name.into(),
            generic_arity,
            generic_params: Vec::new(),
            base_type: None,
        });
        id
    }

    pub fn add_method(&mut self, declaring_type: NewTypeId, name: impl Into<String>) -> NewMethodId {
        let id = NewMethodId::from_index(self.methods.len());
        self.methods.push(NewMethod {
            declaring_type,
            name: name.into(),
            generic_params: Vec::new(),
        });
        id
    }

    #[inline]
    pub fn module(&self, id: ModuleId) -> &TargetModule {
        &self.modules[id.index()]
    }

    #[inline]
    pub fn ty(&self, id: NewTypeId) -> &NewType {
        &self.types[id.index()]
    }

    #[inline]
    pub fn ty_mut(&mut self, id: NewTypeId) -> &mut NewType {
        &mut self.types[id.index()]
    }

    #[inline]
    pub fn method(&self, id: NewMethodId) -> &NewMethod {
        &self.methods[id.index()]
    }

    #[inline]
    pub fn method_mut(&mut self, id: NewMethodId) -> &mut NewMethod {
        &mut self.methods[id.index()]
    }

    /// Reference `ty` from module `into`.
    pub fn import_type(&self, into: ModuleId, ty: NewTypeId) -> NewSig {
        let owner = self.ty(ty).module;
        if owner != into {
            self.module(into).record(ModuleReference::Module(owner));
        }
        NewSig::Defined(ty)
    }

    /// Reference an external type from module `into`.
    pub fn import_external(&self, into: ModuleId, external: ExternalRef) -> NewSig {
        self.module(into)
            .record(ModuleReference::External(external.scope));
        NewSig::External(external)
    }

    /// Reference `method` from module `into`.
    pub fn import_method(&self, into: ModuleId, method: NewMethodId) -> NewMethodRef {
        let declaring_type = self.method(method).declaring_type;
        self.import_type(into, declaring_type);
        NewMethodRef {
            declaring_type,
            method,
        }
    }

    /// The materialized generic parameter a projection points at, if the
    /// owner has been finalized.
    pub fn generic_param(&self, owner: NewGenericOwner, position: u16) -> Option<&NewGenericParam> {
        let params = match owner {
            NewGenericOwner::Type(id) => &self.ty(id).generic_params,
            NewGenericOwner::Method(id) => &self.method(id).generic_params,
        };
        params.get(usize::from(position))
    }

    /// Whether `sig` denotes a value type in the output.
    pub fn is_value_type(&self, sig: &NewSig) -> bool {
        match sig {
            NewSig::Defined(id) => self.ty(*id).is_value_type(),
            NewSig::External(ext) => ext.is_value_type,
            NewSig::GenericInstance { generic, .. } => self.is_value_type(generic),
            NewSig::ByRef(_) | NewSig::Pointer(_) | NewSig::GenericParam { .. } => false,
        }
    }

    /// Render a signature for diagnostics.
    pub fn display_sig(&self, sig: &NewSig) -> String {
        let mut out = String::new();
        self.write_sig(&mut out, sig);
        out
    }

    fn write_sig(&self, out: &mut String, sig: &NewSig) {
        match sig {
            NewSig::Defined(id) => out.push_str(&self.ty(*id).full_name()),
            NewSig::External(ext) => out.push_str(&ext.full_name),
            NewSig::GenericInstance { generic, args } => {
                self.write_sig(out, generic);
                out.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_sig(out, arg);
                }
                out.push('>');
            }
            NewSig::ByRef(inner) => {
                self.write_sig(out, inner);
                out.push('&');
            }
            NewSig::Pointer(inner) => {
                self.write_sig(out, inner);
                out.push('*');
            }
            NewSig::GenericParam { owner, position } => {
                match self.generic_param(*owner, *position) {
                    Some(param) => out.push_str(&param.name),
                    None => {
                        let _ = write!(out, "!{position}");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
