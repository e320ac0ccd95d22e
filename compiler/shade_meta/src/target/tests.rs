use pretty_assertions::assert_eq;

use super::*;

#[test]
fn import_within_module_records_nothing() {
    let mut graph = TargetGraph::new();
    let game = graph.add_module("Game");
    let player = graph.add_type(game, "Game", "Player", 0);

    assert_eq!(graph.import_type(game, player), NewSig::Defined(player));
    assert!(graph.module(game).references().is_empty());
}

#[test]
fn cross_module_import_records_reference() {
    let mut graph = TargetGraph::new();
    let corlib = graph.add_module("Il2Cppmscorlib");
    let game = graph.add_module("Game");
    let object = graph.add_type(corlib, "Il2CppSystem", "Object", 0);

    graph.import_type(game, object);
    graph.import_type(game, object);
    graph.import_external(game, ExternalRef::runtime("Support.Thing"));

    assert!(graph.module(game).references_module(corlib));
    assert_eq!(
        graph.module(game).references(),
        vec![
            ModuleReference::Module(corlib),
            ModuleReference::External(ExternalScope::Runtime),
        ]
    );
}

#[test]
fn import_method_imports_declaring_type() {
    let mut graph = TargetGraph::new();
    let lib = graph.add_module("Lib");
    let game = graph.add_module("Game");
    let util = graph.add_type(lib, "Lib", "Util", 0);
    let run = graph.add_method(util, "Run");

    let handle = graph.import_method(game, run);

    assert_eq!(
        handle,
        NewMethodRef {
            declaring_type: util,
            method: run,
        }
    );
    assert!(graph.module(game).references_module(lib));
}

#[test]
fn value_type_follows_base() {
    let mut graph = TargetGraph::new();
    let game = graph.add_module("Game");
    let point = graph.add_type(game, "Game", "Point", 0);
    assert!(!graph.is_value_type(&NewSig::Defined(point)));

    graph.ty_mut(point).base_type = Some(NewSig::External(ExternalRef::corlib(
        SYSTEM_VALUE_TYPE,
        false,
    )));
    assert!(graph.is_value_type(&NewSig::Defined(point)));

    let wrapped = NewSig::instance(NewSig::Defined(point), vec![]);
    assert!(graph.is_value_type(&wrapped));
    assert!(!graph.is_value_type(&NewSig::ByRef(Box::new(NewSig::Defined(point)))));
}

#[test]
fn generic_param_projection_needs_materialized_params() {
    let mut graph = TargetGraph::new();
    let game = graph.add_module("Game");
    let bag = graph.add_type(game, "Game", "Bag`1", 1);
    let owner = NewGenericOwner::Type(bag);

    assert_eq!(graph.generic_param(owner, 0), None);
    assert_eq!(
        graph.display_sig(&NewSig::GenericParam { owner, position: 0 }),
        "!0"
    );

    graph.ty_mut(bag).generic_params.push(NewGenericParam {
        name: "T".into(),
        attrs: GenericParamAttrs::empty(),
        is_unmanaged: false,
        constraints: Vec::new(),
    });
    assert_eq!(
        graph.display_sig(&NewSig::instance(
            NewSig::Defined(bag),
            vec![NewSig::GenericParam { owner, position: 0 }],
        )),
        "Game.Bag`1<T>"
    );
}

#[test]
fn head_type_sees_through_instances() {
    let mut graph = TargetGraph::new();
    let game = graph.add_module("Game");
    let bag = graph.add_type(game, "Game", "Bag`1", 1);

    let sig = NewSig::instance(
        NewSig::Defined(bag),
        vec![NewSig::External(ExternalRef::corlib("System.Int32", true))],
    );
    assert_eq!(sig.head_type(), Some(bag));
    assert_eq!(NewSig::Pointer(Box::new(sig)).head_type(), None);
}
