//! The source graph: the original type system as discovered.
//!
//! Built once by discovery and read-only afterwards. All references between
//! definitions are arena handles; a type reference in a field, base type, or
//! generic argument is a [`TypeSig`].

use std::fmt::Write as _;

use crate::{AssemblyId, GenericParamAttrs, MethodDefId, TypeDefId};

/// The kind of an original type definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Enum,
    Interface,
}

/// The definition that declares a generic parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenericOwner {
    Type(TypeDefId),
    Method(MethodDefId),
}

/// A reference to an original type, as it appears in signatures.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeSig {
    /// A resolved reference to a type definition.
    Named(TypeDefId),

    /// A reference whose definition could not be found by discovery.
    Unresolved(String),

    /// An array. Only `rank == 1` (single-dimension, zero-based) is
    /// representable in the output.
    Array { elem: Box<TypeSig>, rank: u32 },

    /// A managed by-reference (`ref T`).
    ByRef(Box<TypeSig>),

    /// An unmanaged pointer (`T*`).
    Pointer(Box<TypeSig>),

    /// A generic instantiation `G<T1..Tn>`.
    GenericInstance { generic: TypeDefId, args: Vec<TypeSig> },

    /// A generic parameter, identified by owner and ordinal position.
    GenericParam { owner: GenericOwner, position: u16 },
}

impl TypeSig {
    /// Single-dimension array of `elem`.
    pub fn array(elem: TypeSig) -> Self {
        TypeSig::Array {
            elem: Box::new(elem),
            rank: 1,
        }
    }

    /// `ref inner`.
    pub fn by_ref(inner: TypeSig) -> Self {
        TypeSig::ByRef(Box::new(inner))
    }

    /// `inner*`.
    pub fn pointer(inner: TypeSig) -> Self {
        TypeSig::Pointer(Box::new(inner))
    }

    /// `generic<args..>`.
    pub fn instance(generic: TypeDefId, args: Vec<TypeSig>) -> Self {
        TypeSig::GenericInstance { generic, args }
    }

    /// Generic parameter `position` of type `owner`.
    pub fn type_param(owner: TypeDefId, position: u16) -> Self {
        TypeSig::GenericParam {
            owner: GenericOwner::Type(owner),
            position,
        }
    }

    /// Generic parameter `position` of method `owner`.
    pub fn method_param(owner: MethodDefId, position: u16) -> Self {
        TypeSig::GenericParam {
            owner: GenericOwner::Method(owner),
            position,
        }
    }
}

/// A generic parameter declared by a type or method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericParamDef {
    pub name: String,
    pub attrs: GenericParamAttrs,
    pub constraints: Vec<TypeSig>,
}

impl GenericParamDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: GenericParamAttrs::empty(),
            constraints: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: GenericParamAttrs) -> Self {
        self.attrs = attrs;
        self
    }
}

/// A field of an original type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeSig,
    pub is_static: bool,
}

/// An original type definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDef {
    /// Declaring assembly.
    pub assembly: AssemblyId,
    pub namespace: String,
    pub name: String,
    pub kind: TypeKind,
    /// Base type reference. `None` for `System.Object`, interfaces, and
    /// types whose base could not be reached.
    pub base: Option<TypeSig>,
    pub generic_params: Vec<GenericParamDef>,
    pub fields: Vec<FieldDef>,
    /// Methods declared on this type, filled in by
    /// [`SourceGraph::add_method`].
    pub methods: Vec<MethodDefId>,
}

impl TypeDef {
    /// A definition with no base, fields, or generic parameters.
    pub fn new(
        assembly: AssemblyId,
        namespace: impl Into<String>,
        name: impl Into<String>,
        kind: TypeKind,
    ) -> Self {
        Self {
            assembly,
            namespace: namespace.into(),
            name: name.into(),
            kind,
            base: None,
            generic_params: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_base(mut self, base: TypeSig) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn with_generic_param(mut self, param: GenericParamDef) -> Self {
        self.generic_params.push(param);
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, ty: TypeSig) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            is_static: false,
        });
        self
    }

    #[must_use]
    pub fn with_static_field(mut self, name: impl Into<String>, ty: TypeSig) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            is_static: true,
        });
        self
    }

    /// `Namespace.Name`, or just `Name` in the global namespace.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// Instance fields, in declaration order.
    pub fn instance_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|field| !field.is_static)
    }
}

/// An original method definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDef {
    pub declaring_type: TypeDefId,
    pub name: String,
    pub generic_params: Vec<GenericParamDef>,
}

/// An original assembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceAssembly {
    pub name: String,
}

/// The original type system.
#[derive(Clone, Debug, Default)]
pub struct SourceGraph {
    assemblies: Vec<SourceAssembly>,
    types: Vec<TypeDef>,
    methods: Vec<MethodDef>,
}

impl SourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_assembly(&mut self, name: impl Into<String>) -> AssemblyId {
        let id = AssemblyId::from_index(self.assemblies.len());
        self.assemblies.push(SourceAssembly { name: name.into() });
        id
    }

    pub fn add_type(&mut self, def: TypeDef) -> TypeDefId {
        let id = TypeDefId::from_index(self.types.len());
        self.types.push(def);
        id
    }

    /// Add a method and attach it to its declaring type.
    pub fn add_method(&mut self, def: MethodDef) -> MethodDefId {
        let id = MethodDefId::from_index(self.methods.len());
        self.types[def.declaring_type.index()].methods.push(id);
        self.methods.push(def);
        id
    }

    #[inline]
    pub fn assembly(&self, id: AssemblyId) -> &SourceAssembly {
        &self.assemblies[id.index()]
    }

    #[inline]
    pub fn ty(&self, id: TypeDefId) -> &TypeDef {
        &self.types[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodDefId) -> &MethodDef {
        &self.methods[id.index()]
    }

    /// All type definitions with their handles.
    pub fn types(&self) -> impl Iterator<Item = (TypeDefId, &TypeDef)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, def)| (TypeDefId::from_index(i), def))
    }

    /// Find a type by full name within one assembly.
    pub fn find_type(&self, assembly: AssemblyId, full_name: &str) -> Option<TypeDefId> {
        self.types()
            .find(|(_, def)| def.assembly == assembly && def.full_name() == full_name)
            .map(|(id, _)| id)
    }

    /// Render a signature for diagnostics, e.g. `List<System.Int32>[]`.
    pub fn display_sig(&self, sig: &TypeSig) -> String {
        let mut out = String::new();
        self.write_sig(&mut out, sig);
        out
    }

    fn write_sig(&self, out: &mut String, sig: &TypeSig) {
        match sig {
            TypeSig::Named(id) => out.push_str(&self.ty(*id).full_name()),
            TypeSig::Unresolved(name) => {
                let _ = write!(out, "?{name}");
            }
            TypeSig::Array { elem, rank } => {
                self.write_sig(out, elem);
                out.push('[');
                for _ in 1..*rank {
                    out.push(',');
                }
                out.push(']');
            }
            TypeSig::ByRef(inner) => {
                self.write_sig(out, inner);
                out.push('&');
            }
            TypeSig::Pointer(inner) => {
                self.write_sig(out, inner);
                out.push('*');
            }
            TypeSig::GenericInstance { generic, args } => {
                out.push_str(&self.ty(*generic).full_name());
                out.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_sig(out, arg);
                }
                out.push('>');
            }
            TypeSig::GenericParam { owner, position } => {
                let params = match owner {
                    GenericOwner::Type(id) => &self.ty(*id).generic_params,
                    GenericOwner::Method(id) => &self.method(*id).generic_params,
                };
                match params.get(usize::from(*position)) {
                    Some(param) => out.push_str(&param.name),
                    None => {
                        let _ = write!(out, "!{position}");
                    }
                }
            }
        }
    }
}
