//! Type classifier.
//!
//! Decides, per type context, whether the type crosses the interop boundary
//! as an unmanaged value or has to be wrapped. Results are memoized on the
//! context; an in-progress set on the registry catches recursive layouts.

use shade_meta::{well_known, GenericOwner, TypeDef, TypeDefId, TypeKind, TypeSig};

use crate::stack::ensure_sufficient_stack;
use crate::{Classification, GlobalRegistry, TypeCtxId};

/// Classify a context, using its cached result when present.
pub(crate) fn classify(registry: &GlobalRegistry, id: TypeCtxId) -> Classification {
    let context = registry.context(id);

    if let Some(cached) = context.cached_classification() {
        return cached;
    }

    // Synthesized types have no layout to inspect.
    let Some(original) = context.original_type() else {
        return *context
            .classification_cell()
            .get_or_init(|| Classification::ReferenceType);
    };

    // A struct that (transitively) contains itself has no finite layout.
    if !registry.classifying().borrow_mut().insert(id) {
        return Classification::NonBlittableStruct;
    }

    let result = ensure_sufficient_stack(|| classify_def(registry, registry.source().ty(original)));

    registry.classifying().borrow_mut().remove(&id);
    *context.classification_cell().get_or_init(|| result)
}

fn classify_def(registry: &GlobalRegistry, def: &TypeDef) -> Classification {
    match def.kind {
        TypeKind::Class | TypeKind::Interface | TypeKind::Enum => Classification::ReferenceType,
        TypeKind::Struct => classify_struct(registry, def),
    }
}

fn classify_struct(registry: &GlobalRegistry, def: &TypeDef) -> Classification {
    if well_known::is_primitive(&def.full_name()) {
        return Classification::BlittableStruct;
    }

    if matches!(def.base, None | Some(TypeSig::Unresolved(_))) {
        tracing::debug!(
            ty = %def.full_name(),
            "value type has no reachable base, classifying as reference type"
        );
        return Classification::ReferenceType;
    }

    let blittable = def
        .instance_fields()
        .all(|field| is_blittable_field(registry, &field.ty));

    if !blittable {
        Classification::NonBlittableStruct
    } else if def.generic_params.is_empty() {
        Classification::BlittableStruct
    } else {
        Classification::GenericBlittableStruct
    }
}

/// Whether a field of this type keeps its declaring struct blittable.
///
/// Generic parameters are accepted here; whether they are actually unmanaged
/// is decided per instantiation.
fn is_blittable_field(registry: &GlobalRegistry, ty: &TypeSig) -> bool {
    match ty {
        TypeSig::GenericParam { .. } | TypeSig::Pointer(_) => true,

        TypeSig::Named(def) => {
            registry.source().ty(*def).kind == TypeKind::Struct
                && registry
                    .try_context_for_original(*def)
                    .is_some_and(|ctx| classify(registry, ctx) == Classification::BlittableStruct)
        }

        TypeSig::GenericInstance { generic, args } => {
            let definition_blittable = registry
                .try_context_for_original(*generic)
                .is_some_and(|ctx| classify(registry, ctx).is_blittable());
            if !definition_blittable {
                return false;
            }

            // An argument the definition only stores behind a pointer does not
            // contribute to its layout, so `Node { UnsafeList<Node> }` stays
            // finite.
            let def = registry.source().ty(*generic);
            (0u16..).zip(args).all(|(position, arg)| {
                !stores_inline(def, *generic, position) || is_blittable_field(registry, arg)
            })
        }

        TypeSig::Unresolved(_) | TypeSig::Array { .. } | TypeSig::ByRef(_) => false,
    }
}

/// Whether `def` (handle `owner`) stores its generic parameter `position`
/// in its own layout rather than only behind pointers.
fn stores_inline(def: &TypeDef, owner: TypeDefId, position: u16) -> bool {
    def.instance_fields()
        .any(|field| sig_stores_inline(&field.ty, owner, position))
}

fn sig_stores_inline(sig: &TypeSig, owner: TypeDefId, position: u16) -> bool {
    match sig {
        TypeSig::GenericParam {
            owner: GenericOwner::Type(declaring),
            position: p,
        } => *declaring == owner && *p == position,
        TypeSig::Array { elem: inner, .. } | TypeSig::ByRef(inner) => {
            sig_stores_inline(inner, owner, position)
        }
        TypeSig::GenericInstance { args, .. } => args
            .iter()
            .any(|arg| sig_stores_inline(arg, owner, position)),
        TypeSig::Pointer(_)
        | TypeSig::Named(_)
        | TypeSig::Unresolved(_)
        | TypeSig::GenericParam { .. } => false,
    }
}
