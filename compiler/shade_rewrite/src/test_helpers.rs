//! Shared fixtures for rewrite tests.
//!
//! [`Fixture`] builds a small original corlib plus a `Game` assembly, a
//! matching target graph, and registers everything in definition order.
//! Only compiled in test builds.

use shade_meta::{
    AssemblyId, GenericParamDef, MethodDef, MethodDefId, ModuleId, NewTypeId, SourceGraph,
    TargetGraph, TypeDef, TypeDefId, TypeKind, TypeSig,
};

use crate::{GlobalRegistry, RewriteOptions, TypeCtxId};

enum Boxing {
    None,
    Itself,
    Distinct(NewTypeId),
}

struct PendingType {
    def: TypeDefId,
    new_type: NewTypeId,
    boxing: Boxing,
    registered: bool,
}

/// Builder for a registry with a few well-known corlib types.
pub(crate) struct Fixture {
    source: SourceGraph,
    target: TargetGraph,
    modules: Vec<(AssemblyId, ModuleId)>,
    types: Vec<PendingType>,
    methods: Vec<(TypeDefId, MethodDefId, shade_meta::NewMethodId)>,

    pub corlib: AssemblyId,
    pub game: AssemblyId,

    pub object: TypeDefId,
    pub value_type: TypeDefId,
    pub enum_base: TypeDefId,
    pub string: TypeDefId,
    pub void: TypeDefId,
    pub attribute: TypeDefId,
    pub typed_reference: TypeDefId,
    pub int32: TypeDefId,
    pub single: TypeDefId,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let mut source = SourceGraph::new();
        let mut target = TargetGraph::new();
        let corlib = source.add_assembly("mscorlib");
        let game = source.add_assembly("Game");
        let modules = vec![
            (corlib, target.add_module("Il2Cppmscorlib")),
            (game, target.add_module("Game")),
        ];

        let placeholder = TypeDefId::from_raw(0);
        let mut fx = Self {
            source,
            target,
            modules,
            types: Vec::new(),
            methods: Vec::new(),
            corlib,
            game,
            object: placeholder,
            value_type: placeholder,
            enum_base: placeholder,
            string: placeholder,
            void: placeholder,
            attribute: placeholder,
            typed_reference: placeholder,
            int32: placeholder,
            single: placeholder,
        };

        fx.object = fx.define(TypeDef::new(corlib, "System", "Object", TypeKind::Class));
        let object = TypeSig::Named(fx.object);
        fx.value_type = fx.define(
            TypeDef::new(corlib, "System", "ValueType", TypeKind::Class).with_base(object.clone()),
        );
        let value_type = TypeSig::Named(fx.value_type);
        fx.enum_base = fx.define(
            TypeDef::new(corlib, "System", "Enum", TypeKind::Class).with_base(value_type.clone()),
        );
        fx.string = fx.define(
            TypeDef::new(corlib, "System", "String", TypeKind::Class).with_base(object.clone()),
        );
        fx.void = fx.define(
            TypeDef::new(corlib, "System", "Void", TypeKind::Struct).with_base(value_type.clone()),
        );
        fx.attribute = fx.define(
            TypeDef::new(corlib, "System", "Attribute", TypeKind::Class).with_base(object),
        );
        fx.typed_reference = fx.define(
            TypeDef::new(corlib, "System", "TypedReference", TypeKind::Struct)
                .with_base(value_type.clone())
                .with_field("Value", TypeSig::pointer(TypeSig::Named(fx.void)))
                .with_field("Type", TypeSig::Unresolved("System.IntPtr".into())),
        );
        let next = fx.next_type_id(0);
        fx.int32 = fx.define(
            TypeDef::new(corlib, "System", "Int32", TypeKind::Struct)
                .with_base(value_type.clone())
                .with_field("m_value", TypeSig::Named(next)),
        );
        let next = fx.next_type_id(0);
        fx.single = fx.define(
            TypeDef::new(corlib, "System", "Single", TypeKind::Struct)
                .with_base(value_type)
                .with_field("m_value", TypeSig::Named(next)),
        );
        fx
    }

    /// The handle the `offset`-th next definition will get.
    pub(crate) fn next_type_id(&self, offset: usize) -> TypeDefId {
        TypeDefId::from_index(self.source.types().count() + offset)
    }

    fn module_of(&self, assembly: AssemblyId) -> ModuleId {
        self.modules
            .iter()
            .find(|(asm, _)| *asm == assembly)
            .map(|(_, module)| *module)
            .expect("fixture assembly has a module")
    }

    /// Add an original type and its new-type skeleton; registered on build.
    pub(crate) fn define(&mut self, def: TypeDef) -> TypeDefId {
        let module = self.module_of(def.assembly);
        let new_type = self.target.add_type(
            module,
            def.namespace.clone(),
            def.name.clone(),
            def.generic_params.len(),
        );
        let id = self.source.add_type(def);
        self.types.push(PendingType {
            def: id,
            new_type,
            boxing: Boxing::None,
            registered: true,
        });
        id
    }

    /// Add an original type that discovery never registered.
    pub(crate) fn define_unregistered(&mut self, def: TypeDef) -> TypeDefId {
        let id = self.define(def);
        if let Some(pending) = self.types.last_mut() {
            pending.registered = false;
        }
        id
    }

    /// A `Game` class deriving from `System.Object`.
    pub(crate) fn class(&mut self, name: &str) -> TypeDefId {
        let object = TypeSig::Named(self.object);
        self.define(TypeDef::new(self.game, "Game", name, TypeKind::Class).with_base(object))
    }

    /// A `Game` struct with one instance field per entry of `fields`.
    pub(crate) fn strukt(&mut self, name: &str, fields: Vec<TypeSig>) -> TypeDefId {
        let mut def = TypeDef::new(self.game, "Game", name, TypeKind::Struct)
            .with_base(TypeSig::Named(self.value_type));
        for (i, ty) in fields.into_iter().enumerate() {
            def = def.with_field(format!("f{i}"), ty);
        }
        self.define(def)
    }

    /// A `Game` enum.
    pub(crate) fn enumeration(&mut self, name: &str) -> TypeDefId {
        let int32 = TypeSig::Named(self.int32);
        self.define(
            TypeDef::new(self.game, "Game", name, TypeKind::Enum)
                .with_base(TypeSig::Named(self.enum_base))
                .with_field("value__", int32),
        )
    }

    /// A generic `Game` struct with one field per parameter, typed by that
    /// parameter, and a distinct boxed counterpart.
    pub(crate) fn generic_struct(&mut self, name: &str, params: &[&str]) -> TypeDefId {
        let id = self.next_type_id(0);
        let mut def = TypeDef::new(self.game, "Game", name, TypeKind::Struct)
            .with_base(TypeSig::Named(self.value_type));
        for (position, param) in (0u16..).zip(params) {
            def = def
                .with_generic_param(GenericParamDef::new(*param))
                .with_field(format!("f{position}"), TypeSig::type_param(id, position));
        }
        let id = self.define(def);
        self.box_distinct(id);
        id
    }

    /// Give `def` a distinct boxed counterpart type.
    pub(crate) fn box_distinct(&mut self, def: TypeDefId) {
        let (module, name, arity) = {
            let original = self.source.ty(def);
            (
                self.module_of(original.assembly),
                format!("{}Boxed", original.name),
                original.generic_params.len(),
            )
        };
        let boxed = self.target.add_type(module, "Game", name, arity);
        self.pending_mut(def).boxing = Boxing::Distinct(boxed);
    }

    /// Make `def` its own boxed counterpart.
    pub(crate) fn box_itself(&mut self, def: TypeDefId) {
        self.pending_mut(def).boxing = Boxing::Itself;
    }

    fn pending_mut(&mut self, def: TypeDefId) -> &mut PendingType {
        self.types
            .iter_mut()
            .find(|pending| pending.def == def)
            .expect("type defined by this fixture")
    }

    /// Add a method to `declaring` and its rewritten counterpart.
    pub(crate) fn method(&mut self, declaring: TypeDefId, name: &str, params: &[&str]) -> MethodDefId {
        let new_declaring = self.pending_mut(declaring).new_type;
        let new_method = self.target.add_method(new_declaring, name);
        let method = self.source.add_method(MethodDef {
            declaring_type: declaring,
            name: name.to_owned(),
            generic_params: params.iter().map(|p| GenericParamDef::new(*p)).collect(),
        });
        self.methods.push((declaring, method, new_method));
        method
    }

    /// Add an original method that was never rewritten.
    pub(crate) fn method_unregistered(&mut self, declaring: TypeDefId, name: &str) -> MethodDefId {
        self.source.add_method(MethodDef {
            declaring_type: declaring,
            name: name.to_owned(),
            generic_params: Vec::new(),
        })
    }

    /// Register everything, in definition order.
    pub(crate) fn build(self) -> GlobalRegistry {
        let mut registry = GlobalRegistry::new(self.source, self.target, RewriteOptions::default());

        let assemblies: Vec<_> = self
            .modules
            .iter()
            .map(|&(original, module)| (original, registry.add_assembly(original, module)))
            .collect();
        let assembly_of = |registry: &GlobalRegistry, def: TypeDefId| {
            let original = registry.source().ty(def).assembly;
            assemblies
                .iter()
                .find(|(asm, _)| *asm == original)
                .map(|(_, ctx)| *ctx)
                .expect("fixture assembly registered")
        };

        for pending in self.types.iter().filter(|pending| pending.registered) {
            let assembly = assembly_of(&registry, pending.def);
            let ctx = registry.add_type(assembly, Some(pending.def), pending.new_type);
            match pending.boxing {
                Boxing::None => {}
                Boxing::Itself => registry.set_boxed_counterpart(ctx, ctx),
                Boxing::Distinct(new_type) => {
                    let boxed = registry.add_boxed_type(assembly, Some(pending.def), new_type);
                    registry.set_boxed_counterpart(ctx, boxed);
                }
            }
        }

        for (declaring, method, new_method) in self.methods {
            let ctx = registry
                .context_for_original(declaring)
                .expect("declaring type registered");
            registry.register_method(ctx, method, new_method);
        }

        registry
    }
}

/// Context of `def`, panicking if unregistered.
pub(crate) fn ctx(registry: &GlobalRegistry, def: TypeDefId) -> TypeCtxId {
    registry
        .context_for_original(def)
        .expect("type registered by fixture")
}

/// New type of `def`, panicking if unregistered.
pub(crate) fn new_ty(registry: &GlobalRegistry, def: TypeDefId) -> NewTypeId {
    registry.context(ctx(registry, def)).new_type()
}

/// New type of `def`'s boxed counterpart.
pub(crate) fn boxed_ty(registry: &GlobalRegistry, def: TypeDefId) -> NewTypeId {
    let boxed = registry
        .context(ctx(registry, def))
        .boxed_counterpart()
        .expect("type has a boxed counterpart");
    registry.context(boxed).new_type()
}
