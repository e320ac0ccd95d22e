//! Typedef finalization: generic parameters and base types.
//!
//! Runs as two sweeps over every type of every assembly:
//!
//! 1. Materialize generic parameters on each new type and set the fixed
//!    bases (enum base for enums, value-type base for blittable structs).
//! 2. For every remaining type, set the base to the rewritten original base.
//!
//! Sweep 2 starts only after sweep 1 has finished for the whole graph:
//! rewriting a base such as `A<T>` consults `A`'s classification, its
//! value-typeness, and the unmanaged markers on generic parameters, all of
//! which sweep 1 settles.

use shade_meta::{sanitize_identifier, NewGenericParam, NewSig, NewTypeId};

use crate::{GlobalRegistry, ResolutionError, TypeCtxId};

/// Counts of what a finalize run wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FinalizeSummary {
    /// Generic parameters materialized on new types.
    pub generic_params: usize,
    /// Of those, parameters marked unmanaged.
    pub unmanaged_params: usize,
    /// Enums given the enum base.
    pub enum_bases: usize,
    /// Blittable structs given the value-type base.
    pub value_type_bases: usize,
    /// Types whose base was rewritten from the original.
    pub rewritten_bases: usize,
}

/// Sweep-1 output for one type.
struct TypeShape {
    new_type: NewTypeId,
    generic_params: Vec<NewGenericParam>,
    base: FixedBase,
}

enum FixedBase {
    Enum(NewSig),
    ValueType(NewSig),
    /// Left for sweep 2.
    Deferred,
}

/// Finalize generic parameters and base types of every registered type.
#[tracing::instrument(level = "debug", skip_all)]
pub fn finalize_typedefs(registry: &mut GlobalRegistry) -> Result<FinalizeSummary, ResolutionError> {
    let contexts: Vec<TypeCtxId> = registry
        .assemblies()
        .flat_map(|assembly| assembly.types())
        .collect();

    let mut summary = FinalizeSummary::default();

    for &id in &contexts {
        let Some(shape) = shape_type(registry, id) else {
            continue;
        };
        apply_shape(registry, shape, &mut summary);
    }

    for &id in &contexts {
        let Some((new_type, base)) = rewrite_base(registry, id)? else {
            continue;
        };
        registry.target_mut().ty_mut(new_type).base_type = Some(base);
        summary.rewritten_bases += 1;
    }

    tracing::debug!(
        types = contexts.len(),
        generic_params = summary.generic_params,
        unmanaged_params = summary.unmanaged_params,
        enum_bases = summary.enum_bases,
        value_type_bases = summary.value_type_bases,
        rewritten_bases = summary.rewritten_bases,
        "finalized typedefs"
    );

    Ok(summary)
}

/// Sweep 1 for one context. `None` for synthesized types, which have no
/// original to copy from.
fn shape_type(registry: &GlobalRegistry, id: TypeCtxId) -> Option<TypeShape> {
    let context = registry.context(id);
    let original = registry.source().ty(context.original_type()?);
    let imports = registry.assembly(context.assembly()).imports();
    let blittable = registry.classification(id).is_blittable();

    let generic_params = original
        .generic_params
        .iter()
        .map(|param| {
            if blittable {
                NewGenericParam {
                    name: sanitize_identifier(&param.name),
                    attrs: param.attrs,
                    is_unmanaged: true,
                    constraints: vec![imports.value_type_base.clone()],
                }
            } else {
                NewGenericParam {
                    name: sanitize_identifier(&param.name),
                    attrs: param.attrs.strip_value_type_constraint(),
                    is_unmanaged: false,
                    constraints: Vec::new(),
                }
            }
        })
        .collect();

    let base = if original.is_enum() {
        FixedBase::Enum(imports.enum_base.clone())
    } else if blittable {
        FixedBase::ValueType(imports.value_type_base.clone())
    } else {
        FixedBase::Deferred
    };

    Some(TypeShape {
        new_type: context.new_type(),
        generic_params,
        base,
    })
}

fn apply_shape(registry: &mut GlobalRegistry, shape: TypeShape, summary: &mut FinalizeSummary) {
    summary.generic_params += shape.generic_params.len();
    summary.unmanaged_params += shape
        .generic_params
        .iter()
        .filter(|param| param.is_unmanaged)
        .count();

    let ty = registry.target_mut().ty_mut(shape.new_type);
    ty.generic_params = shape.generic_params;
    match shape.base {
        FixedBase::Enum(base) => {
            ty.base_type = Some(base);
            summary.enum_bases += 1;
        }
        FixedBase::ValueType(base) => {
            ty.base_type = Some(base);
            summary.value_type_bases += 1;
        }
        FixedBase::Deferred => {}
    }
}

/// Sweep 2 for one context: the rewritten base of a non-enum, non-blittable
/// type.
fn rewrite_base(
    registry: &GlobalRegistry,
    id: TypeCtxId,
) -> Result<Option<(NewTypeId, NewSig)>, ResolutionError> {
    let context = registry.context(id);
    let Some(original) = context.original_type() else {
        return Ok(None);
    };
    let original = registry.source().ty(original);
    if original.is_enum() || registry.classification(id).is_blittable() {
        return Ok(None);
    }

    let base = registry
        .assembly(context.assembly())
        .rewrite_type_ref(registry, original.base.as_ref(), false)?;
    Ok(Some((context.new_type(), base)))
}
