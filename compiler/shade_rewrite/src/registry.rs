//! The global registry: every assembly and type context of a run.
//!
//! # Design
//!
//! - Contexts live in one arena and are referenced by [`TypeCtxId`]; each
//!   [`AssemblyContext`] only holds lookup tables into it.
//! - Output module resolution goes through the original assembly of a type
//!   (`TypeDef::assembly`), so any original reference can be routed to the
//!   assembly context that owns it.
//! - Import tables are memoized per output module and shared via `Rc`.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use shade_meta::{
    AssemblyId, MethodDefId, ModuleId, NewMethodId, NewTypeId, SourceGraph, TargetGraph,
    TypeDefId,
};

use crate::classify::classify;
use crate::{
    AsmCtxId, AssemblyContext, Classification, ResolutionError, RewriteOptions, RuntimeImports,
    TypeContext, TypeCtxId,
};

/// Owns both graphs and every rewrite context of a run.
#[derive(Debug)]
pub struct GlobalRegistry {
    options: RewriteOptions,
    source: SourceGraph,
    target: TargetGraph,

    assemblies: Vec<AssemblyContext>,
    contexts: Vec<TypeContext>,

    /// Original assembly -> owning assembly context.
    by_original_assembly: FxHashMap<AssemblyId, AsmCtxId>,
    /// Original assembly name -> assembly context.
    by_name: FxHashMap<String, AsmCtxId>,

    imports: FxHashMap<ModuleId, Rc<RuntimeImports>>,

    /// Contexts currently being classified, for cycle detection.
    classifying: RefCell<FxHashSet<TypeCtxId>>,
}

impl GlobalRegistry {
    pub fn new(source: SourceGraph, target: TargetGraph, options: RewriteOptions) -> Self {
        Self {
            options,
            source,
            target,
            assemblies: Vec::new(),
            contexts: Vec::new(),
            by_original_assembly: FxHashMap::default(),
            by_name: FxHashMap::default(),
            imports: FxHashMap::default(),
            classifying: RefCell::new(FxHashSet::default()),
        }
    }

    // === Discovery ===

    /// Create the assembly context that rewrites `original` into `module`.
    pub fn add_assembly(&mut self, original: AssemblyId, module: ModuleId) -> AsmCtxId {
        let id = AsmCtxId::from_index(self.assemblies.len());
        let imports = self.imports_for(module);
        let name = self.source.assembly(original).name.clone();
        self.by_original_assembly.insert(original, id);
        self.by_name.insert(name.clone(), id);
        self.assemblies
            .push(AssemblyContext::new(id, name, original, module, imports));
        id
    }

    /// The import table of `module`, created on first request.
    pub fn imports_for(&mut self, module: ModuleId) -> Rc<RuntimeImports> {
        let target = &self.target;
        Rc::clone(
            self.imports
                .entry(module)
                .or_insert_with(|| Rc::new(RuntimeImports::new(target, module))),
        )
    }

    /// Create and register a type context.
    pub fn add_type(
        &mut self,
        assembly: AsmCtxId,
        original: Option<TypeDefId>,
        new_type: NewTypeId,
    ) -> TypeCtxId {
        self.push_context(TypeContext::new(assembly, original, new_type))
    }

    /// Create and register a boxed counterpart context.
    ///
    /// Boxed counterparts are always [`Classification::ReferenceType`]. They
    /// share the original type of the value type they stand in for, so only
    /// the new-type table of the assembly learns about them.
    pub fn add_boxed_type(
        &mut self,
        assembly: AsmCtxId,
        original: Option<TypeDefId>,
        new_type: NewTypeId,
    ) -> TypeCtxId {
        self.push_context(TypeContext::boxed(assembly, original, new_type))
    }

    fn push_context(&mut self, context: TypeContext) -> TypeCtxId {
        let id = TypeCtxId::from_index(self.contexts.len());
        let full_name = match context.original_type() {
            Some(original) => self.source.ty(original).full_name(),
            None => self.target.ty(context.new_type()).full_name(),
        };
        self.assemblies[context.assembly().index()].register_type_rewrite(
            id,
            &context,
            &full_name,
        );
        self.contexts.push(context);
        id
    }

    /// Link `context` to the context used where its reference form is needed.
    pub fn set_boxed_counterpart(&mut self, context: TypeCtxId, boxed: TypeCtxId) {
        self.contexts[context.index()].set_boxed_counterpart(boxed);
    }

    /// Record that `original` was rewritten to `new` on `context`'s type.
    pub fn register_method(&mut self, context: TypeCtxId, original: MethodDefId, new: NewMethodId) {
        self.contexts[context.index()].register_method(original, new);
    }

    // === Accessors ===

    #[inline]
    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    #[inline]
    pub fn source(&self) -> &SourceGraph {
        &self.source
    }

    #[inline]
    pub fn target(&self) -> &TargetGraph {
        &self.target
    }

    #[inline]
    pub fn target_mut(&mut self) -> &mut TargetGraph {
        &mut self.target
    }

    #[inline]
    pub fn assembly(&self, id: AsmCtxId) -> &AssemblyContext {
        &self.assemblies[id.index()]
    }

    pub fn assemblies(&self) -> impl Iterator<Item = &AssemblyContext> {
        self.assemblies.iter()
    }

    #[inline]
    pub fn context(&self, id: TypeCtxId) -> &TypeContext {
        &self.contexts[id.index()]
    }

    // === Resolution ===

    /// The assembly context that owns types of the original assembly.
    pub fn assembly_for_original(
        &self,
        original: AssemblyId,
    ) -> Result<&AssemblyContext, ResolutionError> {
        self.by_original_assembly
            .get(&original)
            .map(|&id| self.assembly(id))
            .ok_or_else(|| ResolutionError::UnregisteredAssembly {
                name: self.source.assembly(original).name.clone(),
            })
    }

    /// The assembly context for an original assembly name.
    pub fn assembly_by_name(&self, name: &str) -> Result<&AssemblyContext, ResolutionError> {
        self.try_assembly_by_name(name)
            .ok_or_else(|| ResolutionError::UnknownAssembly {
                name: name.to_owned(),
            })
    }

    pub fn try_assembly_by_name(&self, name: &str) -> Option<&AssemblyContext> {
        self.by_name.get(name).map(|&id| self.assembly(id))
    }

    /// The context of an original type, via its owning assembly.
    pub fn context_for_original(&self, original: TypeDefId) -> Result<TypeCtxId, ResolutionError> {
        let assembly = self.assembly_for_original(self.source.ty(original).assembly)?;
        assembly.lookup_by_original(&self.source, original)
    }

    /// Like [`context_for_original`](Self::context_for_original), but `None`
    /// for anything unregistered.
    pub fn try_context_for_original(&self, original: TypeDefId) -> Option<TypeCtxId> {
        let assembly = self
            .by_original_assembly
            .get(&self.source.ty(original).assembly)?;
        self.assembly(*assembly).try_lookup_by_original(original)
    }

    /// The rewritten type of an original type.
    pub fn new_type_for_original(&self, original: TypeDefId) -> Result<NewTypeId, ResolutionError> {
        Ok(self.context(self.context_for_original(original)?).new_type())
    }

    /// The rewritten context of a well-known type of the original corlib,
    /// such as `System.Object`.
    pub fn corlib_type(&self, full_name: &str) -> Result<TypeCtxId, ResolutionError> {
        self.assembly_by_name(&self.options.source_corlib)?
            .type_by_name(full_name)
    }

    /// The classification of a context, computed and memoized on first use.
    pub fn classification(&self, id: TypeCtxId) -> Classification {
        classify(self, id)
    }

    #[inline]
    pub(crate) fn classifying(&self) -> &RefCell<FxHashSet<TypeCtxId>> {
        &self.classifying
    }
}
