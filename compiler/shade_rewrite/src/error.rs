//! Resolution failures.
//!
//! Every variant means the input graph is inconsistent: discovery produced
//! a reference this core cannot map. None of them are retryable, and the
//! orchestrating pass aborts generation when one surfaces.

/// An original reference that cannot be mapped to a registered context.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("no rewrite context registered for original type `{name}`")]
    UnregisteredType { name: String },

    #[error("original assembly `{name}` has no output module")]
    UnregisteredAssembly { name: String },

    #[error("no assembly named `{name}`")]
    UnknownAssembly { name: String },

    #[error("no type named `{type_name}` in assembly `{assembly}`")]
    UnknownTypeName { assembly: String, type_name: String },

    #[error("no rewritten method for `{declaring_type}::{method}`")]
    UnregisteredMethod {
        declaring_type: String,
        method: String,
    },

    #[error("generic value type `{name}` has no boxed counterpart")]
    MissingBoxedCounterpart { name: String },
}
