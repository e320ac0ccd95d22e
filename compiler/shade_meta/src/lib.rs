//! Type graphs for the shade interop generator.
//!
//! This crate holds the two collaborator graphs the rewrite core works
//! between:
//!
//! - **Source graph** ([`SourceGraph`]): the original managed type system
//!   as extracted from the foreign runtime's reflection metadata. Immutable
//!   once discovery has finished. Type references are [`TypeSig`] values.
//!
//! - **Target graph** ([`TargetGraph`]): the shadow type system being
//!   generated. Every original type already has a skeleton here (name and
//!   generic arity); generic parameters and base types are filled in later.
//!   Type references are [`NewSig`] values, produced by import requests
//!   that record cross-module references on the importing module.
//!
//! # Design
//!
//! Both graphs are arenas indexed by 32-bit handles ([`TypeDefId`],
//! [`NewTypeId`], ...). Base-type and field-type back-references are plain
//! handles, so cyclic type graphs need no shared ownership.

mod attrs;
mod ids;
mod names;
mod source;
mod target;
pub mod well_known;

pub use attrs::GenericParamAttrs;
pub use ids::{AssemblyId, MethodDefId, ModuleId, NewMethodId, NewTypeId, TypeDefId};
pub use names::sanitize_identifier;
pub use source::{
    FieldDef, GenericOwner, GenericParamDef, MethodDef, SourceAssembly, SourceGraph, TypeDef,
    TypeKind, TypeSig,
};
pub use target::{
    ExternalRef, ExternalScope, ModuleReference, NewGenericOwner, NewGenericParam, NewMethod,
    NewMethodRef, NewSig, NewType, TargetGraph, TargetModule,
};
