//! Rewrite configuration.

/// Options for a rewrite run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Name of the original corlib assembly. `System.Object` and
    /// `System.Attribute` references resolve to the rewritten types of this
    /// assembly.
    pub source_corlib: String,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            source_corlib: "mscorlib".to_owned(),
        }
    }
}

impl RewriteOptions {
    #[must_use]
    pub fn with_source_corlib(mut self, name: impl Into<String>) -> Self {
        self.source_corlib = name.into();
        self
    }
}
