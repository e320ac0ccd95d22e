//! Type-reference rewriting for the shade interop generator.
//!
//! Given the original type system ([`shade_meta::SourceGraph`]) and the
//! skeleton of its shadow ([`shade_meta::TargetGraph`]), this crate:
//!
//! - **Classifies** every type ([`Classification`]) by how it can cross the
//!   interop boundary: as a plain unmanaged value, as a value that is only
//!   unmanaged for some generic arguments, or wrapped as a reference.
//!
//! - **Rewrites type references** ([`AssemblyContext::rewrite_type_ref`]) from
//!   the original graph into the new one, choosing array wrappers, projecting
//!   generic parameters by position, and falling back to a boxed counterpart
//!   when a generic value type cannot be proven unmanaged at the use site.
//!
//! - **Finalizes typedefs** ([`finalize_typedefs`]) in two whole-graph
//!   sweeps: generic parameters and fixed bases first, then every base type
//!   that has to be rewritten.
//!
//! # Lifecycle
//!
//! Discovery (outside this crate) creates a [`GlobalRegistry`], adds one
//! [`AssemblyContext`] per original assembly and one [`TypeContext`] per
//! type. After that the registry is only read, except for the memoized
//! classification and the generic-parameter/base-type slots written by the
//! finalize pass.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod assembly;
mod classify;
mod context;
mod error;
mod finalize;
mod imports;
mod options;
mod registry;
mod stack;

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Fixtures panic on misuse")]
mod test_helpers;

pub use assembly::{AsmCtxId, AssemblyContext};
pub use context::{TypeContext, TypeCtxId};
pub use error::ResolutionError;
pub use finalize::{finalize_typedefs, FinalizeSummary};
pub use imports::RuntimeImports;
pub use options::RewriteOptions;
pub use registry::GlobalRegistry;

/// How a type is represented across the interop boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Wrapped as a reference. Classes, interfaces, enums, and anything whose
    /// shape could not be established.
    ReferenceType,

    /// A struct whose layout crosses the boundary unchanged.
    BlittableStruct,

    /// A generic struct that is blittable for unmanaged arguments only.
    ///
    /// Needs a boxed counterpart for use sites where the arguments cannot be
    /// proven unmanaged.
    GenericBlittableStruct,

    /// A struct with at least one field that is not blittable. Wrapped like a
    /// reference type.
    NonBlittableStruct,
}

impl Classification {
    /// Returns `true` for the two blittable classifications.
    #[inline]
    pub fn is_blittable(self) -> bool {
        matches!(
            self,
            Classification::BlittableStruct | Classification::GenericBlittableStruct
        )
    }
}

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset or unparsable, or when another
/// global subscriber is already installed. Later calls are no-ops. Use
/// `RUST_LOG=shade_rewrite=debug` for late-boxing and finalize decisions,
/// `=trace` for every degraded reference.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let Ok(filter) = EnvFilter::try_from_default_env() else {
            return;
        };
        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .try_init();
        if let Err(err) = installed {
            tracing::debug!(%err, "global subscriber already installed");
        }
    });
}

#[cfg(test)]
mod tests;
