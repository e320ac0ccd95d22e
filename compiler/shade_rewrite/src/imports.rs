//! Per-module import table of the fixed interop surface.

use shade_meta::well_known::{
    ARRAY_BASE, OBJECT_BASE, REFERENCE_ARRAY, STRING_ARRAY, STRUCT_ARRAY, SYSTEM_ENUM,
    SYSTEM_STRING, SYSTEM_VALUE_TYPE, SYSTEM_VOID,
};
use shade_meta::{ExternalRef, ModuleId, NewSig, TargetGraph};

/// References to the well-known support-library and corlib types, imported
/// into one output module.
///
/// Created once per module and shared by every assembly context that writes
/// into it (see [`GlobalRegistry::imports_for`](crate::GlobalRegistry::imports_for)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeImports {
    /// The module these references were imported into.
    pub module: ModuleId,

    /// Base of all wrapped reference types; also the fallback for
    /// references that cannot be represented.
    pub object_base: NewSig,
    /// Non-generic array of strings.
    pub string_array: NewSig,
    /// Open generic array wrapper for unbound element types.
    pub array_base: NewSig,
    /// Open generic array wrapper for value-type elements.
    pub struct_array: NewSig,
    /// Open generic array wrapper for reference-type elements.
    pub reference_array: NewSig,

    pub enum_base: NewSig,
    pub value_type_base: NewSig,
    pub void: NewSig,
    pub string: NewSig,
}

impl RuntimeImports {
    /// Import the fixed surface into `module`.
    pub fn new(target: &TargetGraph, module: ModuleId) -> Self {
        let runtime = |name: &str| target.import_external(module, ExternalRef::runtime(name));
        let corlib = |name: &str, is_value_type: bool| {
            target.import_external(module, ExternalRef::corlib(name, is_value_type))
        };

        Self {
            module,
            object_base: runtime(OBJECT_BASE),
            string_array: runtime(STRING_ARRAY),
            array_base: runtime(ARRAY_BASE),
            struct_array: runtime(STRUCT_ARRAY),
            reference_array: runtime(REFERENCE_ARRAY),
            enum_base: corlib(SYSTEM_ENUM, false),
            value_type_base: corlib(SYSTEM_VALUE_TYPE, false),
            void: corlib(SYSTEM_VOID, true),
            string: corlib(SYSTEM_STRING, false),
        }
    }

    /// Import a value type from the output corlib by full name.
    pub fn corlib_value_type(&self, target: &TargetGraph, full_name: &str) -> NewSig {
        target.import_external(self.module, ExternalRef::corlib(full_name, true))
    }
}
