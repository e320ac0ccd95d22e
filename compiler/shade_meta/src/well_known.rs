//! Well-known type names.
//!
//! The interop names below must match the support library that backs the
//! generated output exactly, or rewritten modules will not link.

/// `System.Void`.
pub const SYSTEM_VOID: &str = "System.Void";
/// `System.String`.
pub const SYSTEM_STRING: &str = "System.String";
/// `System.Object`.
pub const SYSTEM_OBJECT: &str = "System.Object";
/// `System.Attribute`.
pub const SYSTEM_ATTRIBUTE: &str = "System.Attribute";
/// `System.TypedReference`.
pub const SYSTEM_TYPED_REFERENCE: &str = "System.TypedReference";
/// `System.ValueType`, base of every value type in the output.
pub const SYSTEM_VALUE_TYPE: &str = "System.ValueType";
/// `System.Enum`, base of every enum in the output.
pub const SYSTEM_ENUM: &str = "System.Enum";

/// Base of every wrapped reference type.
pub const OBJECT_BASE: &str = "Il2CppInterop.Runtime.InteropTypes.Il2CppObjectBase";
/// Array of strings.
pub const STRING_ARRAY: &str = "Il2CppInterop.Runtime.InteropTypes.Arrays.Il2CppStringArray";
/// Array whose element type is an unbound generic parameter.
pub const ARRAY_BASE: &str = "Il2CppInterop.Runtime.InteropTypes.Arrays.Il2CppArrayBase`1";
/// Array of value-type elements.
pub const STRUCT_ARRAY: &str = "Il2CppInterop.Runtime.InteropTypes.Arrays.Il2CppStructArray`1";
/// Array of reference-type elements.
pub const REFERENCE_ARRAY: &str =
    "Il2CppInterop.Runtime.InteropTypes.Arrays.Il2CppReferenceArray`1";

/// Primitive numeric (and pointer-sized) types passed through unchanged.
pub const PRIMITIVES: [&str; 14] = [
    "System.Boolean",
    "System.Char",
    "System.SByte",
    "System.Byte",
    "System.Int16",
    "System.UInt16",
    "System.Int32",
    "System.UInt32",
    "System.Int64",
    "System.UInt64",
    "System.IntPtr",
    "System.UIntPtr",
    "System.Single",
    "System.Double",
];

/// Returns `true` if `full_name` names a primitive.
pub fn is_primitive(full_name: &str) -> bool {
    PRIMITIVES.contains(&full_name)
}

/// Returns `true` for names imported verbatim from the output's corlib.
pub fn is_corlib_passthrough(full_name: &str) -> bool {
    is_primitive(full_name) || full_name == SYSTEM_TYPED_REFERENCE
}
