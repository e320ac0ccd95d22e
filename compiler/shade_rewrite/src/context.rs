//! Per-type rewrite records.

use std::cell::OnceCell;

use rustc_hash::FxHashMap;
use shade_meta::{MethodDefId, NewMethodId, NewTypeId, TypeDefId};

use crate::{AsmCtxId, Classification};

shade_meta::define_id! {
    /// Handle of a [`TypeContext`] in the [`GlobalRegistry`](crate::GlobalRegistry).
    pub struct TypeCtxId;
}

/// Pairs an original type with its rewritten counterpart.
///
/// Created during discovery. The classification is computed on first read
/// and never changes afterwards.
#[derive(Debug)]
pub struct TypeContext {
    assembly: AsmCtxId,
    original: Option<TypeDefId>,
    new_type: NewTypeId,
    classification: OnceCell<Classification>,
    boxed: Option<TypeCtxId>,
    methods: FxHashMap<MethodDefId, NewMethodId>,
}

impl TypeContext {
    pub(crate) fn new(assembly: AsmCtxId, original: Option<TypeDefId>, new_type: NewTypeId) -> Self {
        Self {
            assembly,
            original,
            new_type,
            classification: OnceCell::new(),
            boxed: None,
            methods: FxHashMap::default(),
        }
    }

    /// A boxed counterpart: a reference-type stand-in for a value type.
    pub(crate) fn boxed(assembly: AsmCtxId, original: Option<TypeDefId>, new_type: NewTypeId) -> Self {
        Self {
            classification: OnceCell::from(Classification::ReferenceType),
            ..Self::new(assembly, original, new_type)
        }
    }

    /// The assembly context this type was registered in.
    #[inline]
    pub fn assembly(&self) -> AsmCtxId {
        self.assembly
    }

    /// The original type, absent for types synthesized by the generator.
    #[inline]
    pub fn original_type(&self) -> Option<TypeDefId> {
        self.original
    }

    #[inline]
    pub fn new_type(&self) -> NewTypeId {
        self.new_type
    }

    /// The context to use where the reference form is required.
    ///
    /// Itself for ordinary value types, a distinct context for generic
    /// value types, `None` for everything else.
    #[inline]
    pub fn boxed_counterpart(&self) -> Option<TypeCtxId> {
        self.boxed
    }

    /// The classification, if it has been computed.
    ///
    /// Use [`GlobalRegistry::classification`](crate::GlobalRegistry::classification)
    /// to compute it.
    #[inline]
    pub fn cached_classification(&self) -> Option<Classification> {
        self.classification.get().copied()
    }

    #[inline]
    pub(crate) fn classification_cell(&self) -> &OnceCell<Classification> {
        &self.classification
    }

    pub(crate) fn set_boxed_counterpart(&mut self, boxed: TypeCtxId) {
        self.boxed = Some(boxed);
    }

    pub(crate) fn register_method(&mut self, original: MethodDefId, new: NewMethodId) {
        self.methods.insert(original, new);
    }

    /// The rewritten method for an original method of this type.
    pub fn method_for_original(&self, original: MethodDefId) -> Option<NewMethodId> {
        self.methods.get(&original).copied()
    }
}
