//! Per-assembly rewrite engine.
//!
//! An [`AssemblyContext`] owns the lookup tables for the types of one
//! original assembly and rewrites original type and method references into
//! its output module.
//!
//! # Reference rewriting
//!
//! [`rewrite_type_ref`](AssemblyContext::rewrite_type_ref) walks a
//! [`TypeSig`] and applies the first matching rule:
//!
//! 1. absent or unresolved reference -> object base
//! 2. single-dimension array -> one of the four array wrappers; any other
//!    rank -> object base
//! 3. generic parameter -> same position on the rewritten owner
//! 4. by-ref / pointer -> rewritten pointee, same indirection
//! 5. generic instantiation -> rewritten arguments on the rewritten
//!    definition, or on its boxed counterpart when the definition is a
//!    generic blittable struct and the arguments are not provably unmanaged
//! 6. primitives and `System.TypedReference` -> output corlib, unchanged
//! 7. `System.Void`, `System.String`, `System.Object`, `System.Attribute`
//!    -> fixed targets
//! 8. anything else -> the registered rewritten type, or its boxed
//!    counterpart when the caller asks for the boxed form

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use shade_meta::well_known::{self, SYSTEM_ATTRIBUTE, SYSTEM_OBJECT, SYSTEM_STRING, SYSTEM_VOID};
use shade_meta::{
    AssemblyId, GenericOwner, MethodDefId, ModuleId, NewGenericOwner, NewMethodRef, NewSig,
    NewTypeId, SourceGraph, TypeDefId, TypeSig,
};

use crate::stack::ensure_sufficient_stack;
use crate::{
    Classification, GlobalRegistry, ResolutionError, RuntimeImports, TypeContext, TypeCtxId,
};

shade_meta::define_id! {
    /// Handle of an [`AssemblyContext`] in the [`GlobalRegistry`].
    pub struct AsmCtxId;
}

/// Rewrite state for one original assembly.
pub struct AssemblyContext {
    id: AsmCtxId,
    name: String,
    original: AssemblyId,
    module: ModuleId,
    imports: Rc<RuntimeImports>,

    /// Original type -> context. First registration wins.
    by_original: FxHashMap<TypeDefId, TypeCtxId>,
    /// New type -> context. Every registration lands here; ordered so that
    /// [`types`](Self::types) is deterministic.
    by_new: BTreeMap<NewTypeId, TypeCtxId>,
    /// Full name -> context. First registration wins.
    by_name: FxHashMap<String, TypeCtxId>,
}

impl AssemblyContext {
    pub(crate) fn new(
        id: AsmCtxId,
        name: String,
        original: AssemblyId,
        module: ModuleId,
        imports: Rc<RuntimeImports>,
    ) -> Self {
        Self {
            id,
            name,
            original,
            module,
            imports,
            by_original: FxHashMap::default(),
            by_new: BTreeMap::new(),
            by_name: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> AsmCtxId {
        self.id
    }

    /// Name of the original assembly.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn original_assembly(&self) -> AssemblyId {
        self.original
    }

    /// The output module references are imported into.
    #[inline]
    pub fn module(&self) -> ModuleId {
        self.module
    }

    #[inline]
    pub fn imports(&self) -> &RuntimeImports {
        &self.imports
    }

    /// Every registered context, ordered by new type.
    pub fn types(&self) -> impl Iterator<Item = TypeCtxId> + '_ {
        self.by_new.values().copied()
    }

    // === Registration ===

    /// Register `context` under handle `id`.
    ///
    /// The original-type and name tables keep the first context registered
    /// for an original type; the new-type table always takes the latest.
    /// `full_name` is the original type's full name, or the new type's when
    /// there is no original.
    pub fn register_type_rewrite(&mut self, id: TypeCtxId, context: &TypeContext, full_name: &str) {
        let exists = context
            .original_type()
            .is_some_and(|original| self.by_original.contains_key(&original));

        if let Some(original) = context.original_type() {
            if !exists {
                self.by_original.insert(original, id);
            }
        }
        self.by_new.insert(context.new_type(), id);
        if !exists {
            self.by_name.insert(full_name.to_owned(), id);
        }
    }

    // === Lookup ===

    /// The context of an original type declared in this assembly.
    pub fn lookup_by_original(
        &self,
        source: &SourceGraph,
        original: TypeDefId,
    ) -> Result<TypeCtxId, ResolutionError> {
        self.try_lookup_by_original(original)
            .ok_or_else(|| ResolutionError::UnregisteredType {
                name: source.ty(original).full_name(),
            })
    }

    pub fn try_lookup_by_original(&self, original: TypeDefId) -> Option<TypeCtxId> {
        self.by_original.get(&original).copied()
    }

    pub fn lookup_by_new(&self, new_type: NewTypeId) -> Option<TypeCtxId> {
        self.by_new.get(&new_type).copied()
    }

    /// The context registered under a full type name.
    pub fn type_by_name(&self, full_name: &str) -> Result<TypeCtxId, ResolutionError> {
        self.try_type_by_name(full_name)
            .ok_or_else(|| ResolutionError::UnknownTypeName {
                assembly: self.name.clone(),
                type_name: full_name.to_owned(),
            })
    }

    pub fn try_type_by_name(&self, full_name: &str) -> Option<TypeCtxId> {
        self.by_name.get(full_name).copied()
    }

    // === Rewriting ===

    /// Rewrite an original method reference into an importable call target.
    pub fn rewrite_method_ref(
        &self,
        registry: &GlobalRegistry,
        method: MethodDefId,
    ) -> Result<NewMethodRef, ResolutionError> {
        let source = registry.source();
        let declaring_type = source.method(method).declaring_type;
        let context = registry.context(registry.context_for_original(declaring_type)?);

        let new_method = context.method_for_original(method).ok_or_else(|| {
            ResolutionError::UnregisteredMethod {
                declaring_type: source.ty(declaring_type).full_name(),
                method: source.method(method).name.clone(),
            }
        })?;

        Ok(registry.target().import_method(self.module, new_method))
    }

    /// Rewrite an original type reference into this assembly's module.
    ///
    /// `boxed` marks a position that needs the reference form of value types.
    pub fn rewrite_type_ref(
        &self,
        registry: &GlobalRegistry,
        sig: Option<&TypeSig>,
        boxed: bool,
    ) -> Result<NewSig, ResolutionError> {
        let Some(sig) = sig else {
            return Ok(self.imports.object_base.clone());
        };
        ensure_sufficient_stack(|| self.rewrite_sig(registry, sig, boxed))
    }

    fn rewrite_sig(
        &self,
        registry: &GlobalRegistry,
        sig: &TypeSig,
        boxed: bool,
    ) -> Result<NewSig, ResolutionError> {
        match sig {
            TypeSig::Unresolved(name) => {
                tracing::trace!(%name, "unresolved reference rewritten to object base");
                Ok(self.imports.object_base.clone())
            }
            TypeSig::Array { elem, rank } => self.rewrite_array(registry, elem, *rank, boxed),
            TypeSig::GenericParam { owner, position } => {
                self.rewrite_generic_param(registry, *owner, *position, boxed)
            }
            TypeSig::ByRef(inner) => Ok(NewSig::ByRef(Box::new(
                self.rewrite_type_ref(registry, Some(inner), boxed)?,
            ))),
            TypeSig::Pointer(inner) => Ok(NewSig::Pointer(Box::new(
                self.rewrite_type_ref(registry, Some(inner), boxed)?,
            ))),
            TypeSig::GenericInstance { generic, args } => {
                self.rewrite_generic_instance(registry, sig, *generic, args, boxed)
            }
            TypeSig::Named(def) => self.rewrite_named(registry, *def, boxed),
        }
    }

    fn rewrite_array(
        &self,
        registry: &GlobalRegistry,
        elem: &TypeSig,
        rank: u32,
        boxed: bool,
    ) -> Result<NewSig, ResolutionError> {
        if rank != 1 {
            tracing::trace!(rank, "multi-dimensional array rewritten to object base");
            return Ok(self.imports.object_base.clone());
        }

        if let TypeSig::Named(def) = elem {
            if registry.source().ty(*def).full_name() == SYSTEM_STRING {
                return Ok(self.imports.string_array.clone());
            }
        }

        let converted = self.rewrite_type_ref(registry, Some(elem), boxed)?;
        let wrapper = if matches!(elem, TypeSig::GenericParam { .. }) {
            &self.imports.array_base
        } else if registry.target().is_value_type(&converted) {
            &self.imports.struct_array
        } else {
            &self.imports.reference_array
        };

        Ok(NewSig::instance(wrapper.clone(), vec![converted]))
    }

    fn rewrite_generic_param(
        &self,
        registry: &GlobalRegistry,
        owner: GenericOwner,
        position: u16,
        boxed: bool,
    ) -> Result<NewSig, ResolutionError> {
        let owner = match owner {
            GenericOwner::Type(def) => {
                let context = select_context(registry, registry.context_for_original(def)?, boxed);
                let new_type = registry.context(context).new_type();
                registry.target().import_type(self.module, new_type);
                NewGenericOwner::Type(new_type)
            }
            GenericOwner::Method(method) => {
                NewGenericOwner::Method(self.rewrite_method_ref(registry, method)?.method)
            }
        };
        Ok(NewSig::GenericParam { owner, position })
    }

    fn rewrite_generic_instance(
        &self,
        registry: &GlobalRegistry,
        sig: &TypeSig,
        generic: TypeDefId,
        args: &[TypeSig],
        boxed: bool,
    ) -> Result<NewSig, ResolutionError> {
        let new_args = args
            .iter()
            .map(|arg| self.rewrite_type_ref(registry, Some(arg), boxed))
            .collect::<Result<Vec<_>, _>>()?;

        let context = registry.context_for_original(generic)?;
        let late_boxed = registry.classification(context)
            == Classification::GenericBlittableStruct
            && !self.is_unmanaged(registry, sig, boxed)?;

        let new_generic = if late_boxed {
            let boxed_context = registry.context(context).boxed_counterpart().ok_or_else(|| {
                ResolutionError::MissingBoxedCounterpart {
                    name: registry.source().ty(generic).full_name(),
                }
            })?;
            tracing::debug!(
                ty = %registry.source().display_sig(sig),
                "arguments not provably unmanaged, using boxed counterpart"
            );
            registry
                .target()
                .import_type(self.module, registry.context(boxed_context).new_type())
        } else {
            self.rewrite_named(registry, generic, boxed)?
        };

        Ok(NewSig::instance(new_generic, new_args))
    }

    fn rewrite_named(
        &self,
        registry: &GlobalRegistry,
        def: TypeDefId,
        boxed: bool,
    ) -> Result<NewSig, ResolutionError> {
        let target = registry.target();
        let full_name = registry.source().ty(def).full_name();

        if well_known::is_corlib_passthrough(&full_name) {
            return Ok(self.imports.corlib_value_type(target, &full_name));
        }

        match full_name.as_str() {
            SYSTEM_VOID => return Ok(self.imports.void.clone()),
            SYSTEM_STRING => return Ok(self.imports.string.clone()),
            SYSTEM_OBJECT | SYSTEM_ATTRIBUTE => {
                let context = registry.context(registry.corlib_type(&full_name)?);
                return Ok(target.import_type(self.module, context.new_type()));
            }
            _ => {}
        }

        let context = select_context(registry, registry.context_for_original(def)?, boxed);
        Ok(target.import_type(self.module, registry.context(context).new_type()))
    }

    /// Whether a reference is provably unmanaged at this use site.
    ///
    /// - generic parameter: its rewritten form carries the unmanaged marker
    /// - instantiation: every argument is unmanaged (stopping at the first
    ///   that is not) and the definition is blittable
    /// - pointer: always
    /// - named type: its classification is blittable
    pub fn is_unmanaged(
        &self,
        registry: &GlobalRegistry,
        sig: &TypeSig,
        boxed: bool,
    ) -> Result<bool, ResolutionError> {
        ensure_sufficient_stack(|| match sig {
            TypeSig::GenericParam { .. } => {
                let projected = self.rewrite_type_ref(registry, Some(sig), boxed)?;
                Ok(match projected {
                    NewSig::GenericParam { owner, position } => registry
                        .target()
                        .generic_param(owner, position)
                        .is_some_and(|param| param.is_unmanaged),
                    _ => false,
                })
            }
            TypeSig::GenericInstance { generic, args } => {
                for arg in args {
                    if !self.is_unmanaged(registry, arg, boxed)? {
                        return Ok(false);
                    }
                }
                let context = registry.context_for_original(*generic)?;
                Ok(registry.classification(context).is_blittable())
            }
            TypeSig::Named(def) => {
                let context = registry.context_for_original(*def)?;
                Ok(registry.classification(context).is_blittable())
            }
            TypeSig::Pointer(_) => Ok(true),
            TypeSig::Unresolved(_) | TypeSig::Array { .. } | TypeSig::ByRef(_) => Ok(false),
        })
    }
}

/// Swap in the boxed counterpart when the boxed form is requested.
fn select_context(registry: &GlobalRegistry, context: TypeCtxId, boxed: bool) -> TypeCtxId {
    if boxed {
        if let Some(counterpart) = registry.context(context).boxed_counterpart() {
            return counterpart;
        }
    }
    context
}

impl fmt::Display for AssemblyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for AssemblyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssemblyContext")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("original", &self.original)
            .field("module", &self.module)
            .field("types", &self.by_new.len())
            .finish_non_exhaustive()
    }
}
