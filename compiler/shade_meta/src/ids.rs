//! Arena handles for both type graphs.

/// Define a 32-bit arena handle.
///
/// Handles are allocated sequentially by the owning arena and are only
/// meaningful for that arena.
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        $vis struct $name(u32);

        impl $name {
            /// Create a handle from a raw index.
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Create the handle for the next slot of an arena of length `len`.
            #[inline]
            #[expect(
                clippy::cast_possible_truncation,
                reason = "type graphs stay far below u32::MAX entries"
            )]
            pub const fn from_index(len: usize) -> Self {
                Self(len as u32)
            }

            /// Get the raw `u32` value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Get the index as `usize` (for indexing into `Vec`s).
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id! {
    /// An assembly of the original type system.
    pub struct AssemblyId;
}

define_id! {
    /// A type definition in the source graph.
    pub struct TypeDefId;
}

define_id! {
    /// A method definition in the source graph.
    pub struct MethodDefId;
}

define_id! {
    /// An output module in the target graph.
    pub struct ModuleId;
}

define_id! {
    /// A type in the target graph.
    pub struct NewTypeId;
}

define_id! {
    /// A method in the target graph.
    pub struct NewMethodId;
}
