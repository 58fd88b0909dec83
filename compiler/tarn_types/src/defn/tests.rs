#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use tarn_ir::StringInterner;

use super::*;
use crate::{TypeKind, TypeStore};

#[test]
fn symbol_table_keeps_overloads_in_order() {
    let names = StringInterner::new();
    let f = names.intern("f");
    let g = names.intern("g");
    let mut table = SymbolTable::new();

    table.insert(g, DefnId::from_raw(3));
    table.insert(f, DefnId::from_raw(1));
    table.insert(f, DefnId::from_raw(2));
    table.insert(f, DefnId::from_raw(1));

    assert_eq!(table.get(f), &[DefnId::from_raw(1), DefnId::from_raw(2)]);
    assert_eq!(table.names().collect::<Vec<_>>(), vec![g, f]);
    assert_eq!(table.len(), 2);
    assert!(table.get(names.intern("h")).is_empty());
}

#[test]
fn members_are_declared_in_their_scope() {
    let names = StringInterner::new();
    let mut store = TypeStore::new();
    let mut defns = DefnGraph::new();

    let module = defns.add_module(DefnHeader::new(names.intern("M")));
    let class = defns.add_type(
        &mut store,
        DefnHeader::new(names.intern("C")).in_scope(module),
        NominalKind::Class,
    );
    let field = defns.add_value(
        DefnHeader::new(names.intern("x")).in_scope(class),
        DefnKind::Let,
        Some(Idx::I32),
    );
    let method = defns.add_function(
        DefnHeader::new(names.intern("run")).in_scope(class),
        None,
    );
    let local = defns.add_value(
        DefnHeader::new(names.intern("tmp")).in_scope(method),
        DefnKind::Var,
        None,
    );

    let module_symbols = defns.get(module).symbols().unwrap();
    assert_eq!(module_symbols.get(names.intern("C")), &[class]);

    let class_defn = defns.get(class).as_type().unwrap();
    assert_eq!(class_defn.members, vec![field, method]);
    assert_eq!(class_defn.symbols.get(names.intern("x")), &[field]);
    assert!(class_defn.symbols.get(names.intern("tmp")).is_empty());
    assert_eq!(defns.get(local).scope, Some(method));
}

#[test]
fn type_declarations_intern_their_nominal_type() {
    let names = StringInterner::new();
    let mut store = TypeStore::new();
    let mut defns = DefnGraph::new();

    let iface = defns.add_type(
        &mut store,
        DefnHeader::new(names.intern("Shape")),
        NominalKind::Interface,
    );
    let ty = defns.get(iface).declared_type().unwrap();
    assert_eq!(
        *store.kind(ty),
        TypeKind::Nominal {
            kind: NominalKind::Interface,
            defn: iface,
        }
    );
    assert_eq!(defns.get(iface).category(), Some(NominalKind::Interface));
}

#[test]
fn aliases_record_their_target() {
    let names = StringInterner::new();
    let mut store = TypeStore::new();
    let mut defns = DefnGraph::new();

    let alias = defns.add_alias(&mut store, DefnHeader::new(names.intern("Int")), None);
    assert!(defns.get(alias).as_type().unwrap().is_alias());
    assert_eq!(defns.get(alias).as_type().unwrap().aliased, None);

    defns.set_alias_target(alias, Idx::I64);
    assert_eq!(defns.get(alias).as_type().unwrap().aliased, Some(Idx::I64));
    assert_eq!(*store.kind(defns.get(alias).declared_type().unwrap()), TypeKind::Alias(alias));
}

#[test]
fn type_params_of_nested_scopes_come_outermost_first() {
    let names = StringInterner::new();
    let mut store = TypeStore::new();
    let mut defns = DefnGraph::new();

    let outer = defns.add_type(
        &mut store,
        DefnHeader::new(names.intern("Outer")),
        NominalKind::Class,
    );
    let t = defns.add_type_param(&mut store, outer, names.intern("T"), &[]);
    let inner = defns.add_type(
        &mut store,
        DefnHeader::new(names.intern("Inner")).in_scope(outer),
        NominalKind::Class,
    );
    let u = defns.add_type_param(&mut store, inner, names.intern("U"), &[]);
    let method = defns.add_function(
        DefnHeader::new(names.intern("map")).in_scope(inner),
        None,
    );
    let v = defns.add_type_param(&mut store, method, names.intern("V"), &[]);

    assert_eq!(defns.all_type_params(outer), vec![t]);
    assert_eq!(defns.all_type_params(inner), vec![t, u]);
    assert_eq!(defns.all_type_params(method), vec![t, u, v]);
    assert!(defns.get(method).is_generic());

    let param = defns.get(u).as_type_param().unwrap();
    assert_eq!(param.owner, inner);
    assert_eq!(param.index, 0);
    assert_eq!(*store.kind(param.var), TypeKind::TypeVar(u));
    // Type parameters are not members of their owner.
    assert!(defns.get(inner).as_type().unwrap().symbols.get(names.intern("U")).is_empty());
}

#[test]
fn bounds_and_edges_are_appended() {
    let names = StringInterner::new();
    let mut store = TypeStore::new();
    let mut defns = DefnGraph::new();

    let base = defns.add_type(
        &mut store,
        DefnHeader::new(names.intern("Base")),
        NominalKind::Class,
    );
    let iface = defns.add_type(
        &mut store,
        DefnHeader::new(names.intern("Show")),
        NominalKind::Trait,
    );
    let derived = defns.add_type(
        &mut store,
        DefnHeader::new(names.intern("Derived")),
        NominalKind::Class,
    );
    let base_ty = defns.get(base).declared_type().unwrap();
    let iface_ty = defns.get(iface).declared_type().unwrap();
    defns.add_extends(derived, base_ty);
    defns.add_implements(derived, iface_ty);

    let t = defns.add_type_param(&mut store, derived, names.intern("T"), &[base_ty]);
    defns.add_bound(t, iface_ty);

    let derived_defn = defns.get(derived).as_type().unwrap();
    assert_eq!(derived_defn.extends, vec![base_ty]);
    assert_eq!(derived_defn.implements, vec![iface_ty]);
    assert_eq!(defns.get(t).as_type_param().unwrap().bounds, vec![base_ty, iface_ty]);
}

#[test]
fn function_type_is_write_once() {
    let names = StringInterner::new();
    let mut store = TypeStore::new();
    let mut defns = DefnGraph::new();

    let func = defns.add_function(DefnHeader::new(names.intern("f")), None);
    let p = defns.add_param(func, names.intern("a"), Some(Idx::I32));
    let ty = store.function(Idx::VOID, &[Idx::I32]);

    let function = defns.get(func).as_function().unwrap();
    assert_eq!(function.params, vec![p]);
    assert_eq!(function.ty(), None);
    assert!(function.set_ty(ty));
    assert!(!function.set_ty(Idx::VOID));
    assert_eq!(defns.get(func).declared_type(), Some(ty));
}

#[test]
fn header_builders_apply_modifiers() {
    let names = StringInterner::new();
    let mut defns = DefnGraph::new();
    let c = defns.add_value(
        DefnHeader::new(names.intern("LIMIT"))
            .at(Span::new(3, 8))
            .with_modifiers(Modifiers::STATIC)
            .with_modifiers(Modifiers::READONLY)
            .with_visibility(Visibility::Private),
        DefnKind::Const,
        Some(Idx::U32),
    );

    let defn = defns.get(c);
    assert!(defn.is_static());
    assert!(defn.modifiers.contains(Modifiers::READONLY));
    assert_eq!(defn.visibility, Visibility::Private);
    assert_eq!(defn.span, Span::new(3, 8));
    assert_eq!(defns.ids().count(), 1);
}
