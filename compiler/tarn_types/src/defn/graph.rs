//! Declaration arena and its construction API.
//!
//! Upstream passes build the graph through the `add_*` methods. Each new
//! declaration is registered in its owning scope's symbol table, so the
//! graph is immediately searchable by [`NameLookup`](crate::NameLookup).
//! Once construction finishes the graph is only read; the sole later write
//! is filling a function's write-once type cell.

use tarn_ir::{Name, Span};

use crate::{DefnId, Idx, Modifiers, NominalKind, TypeStore};

use super::{
    Defn, DefnBody, DefnKind, FunctionDefn, ModuleDefn, TypeDefn, TypeParamDefn, ValueDefn,
    Visibility,
};

/// Header fields shared by every declaration.
#[derive(Clone, Debug)]
pub struct DefnHeader {
    pub name: Name,
    pub span: Span,
    pub visibility: Visibility,
    pub modifiers: Modifiers,
    pub scope: Option<DefnId>,
}

impl DefnHeader {
    /// Public, unmodified, top-level declaration named `name`.
    pub fn new(name: Name) -> Self {
        DefnHeader {
            name,
            span: Span::DUMMY,
            visibility: Visibility::Public,
            modifiers: Modifiers::empty(),
            scope: None,
        }
    }

    #[must_use]
    pub fn in_scope(mut self, scope: DefnId) -> Self {
        self.scope = Some(scope);
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }
}

/// Arena of all declarations of one compilation.
#[derive(Clone, Debug, Default)]
pub struct DefnGraph {
    defns: Vec<Defn>,
}

impl DefnGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The declaration behind `id`.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this graph.
    #[inline]
    pub fn get(&self, id: DefnId) -> &Defn {
        &self.defns[id.index()]
    }

    #[inline]
    pub fn try_get(&self, id: DefnId) -> Option<&Defn> {
        self.defns.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.defns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defns.is_empty()
    }

    /// Every declaration id, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = DefnId> {
        (0..self.defns.len()).map(|i| DefnId::from_raw(raw_index(i)))
    }

    fn next_id(&self) -> DefnId {
        DefnId::from_raw(raw_index(self.defns.len()))
    }

    fn push(&mut self, header: DefnHeader, kind: DefnKind, body: DefnBody) -> DefnId {
        let id = self.next_id();
        let DefnHeader {
            name,
            span,
            visibility,
            modifiers,
            scope,
        } = header;
        self.defns.push(Defn {
            name,
            kind,
            span,
            visibility,
            modifiers,
            scope,
            type_params: Vec::new(),
            body,
        });
        if let Some(scope) = scope {
            self.declare(scope, name, id);
        }
        id
    }

    /// Register `id` in the member scope of `scope`. Declarations owned by
    /// functions (locals) are not members and stay out of every table.
    fn declare(&mut self, scope: DefnId, name: Name, id: DefnId) {
        match &mut self.defns[scope.index()].body {
            DefnBody::Module(m) => m.symbols.insert(name, id),
            DefnBody::Type(t) => {
                t.members.push(id);
                t.symbols.insert(name, id);
            }
            DefnBody::Function(_) | DefnBody::Value(_) | DefnBody::TypeParam(_) => {}
        }
    }

    // === Construction ===

    pub fn add_module(&mut self, header: DefnHeader) -> DefnId {
        self.push(
            header,
            DefnKind::Module,
            DefnBody::Module(ModuleDefn::default()),
        )
    }

    /// Add a class, struct, interface, trait, enum or extension declaration
    /// and intern its nominal type.
    pub fn add_type(
        &mut self,
        store: &mut TypeStore,
        header: DefnHeader,
        category: NominalKind,
    ) -> DefnId {
        let ty = store.nominal(category, self.next_id());
        self.push(
            header,
            DefnKind::Type,
            DefnBody::Type(TypeDefn {
                ty,
                category: Some(category),
                members: Vec::new(),
                symbols: super::SymbolTable::new(),
                extends: Vec::new(),
                implements: Vec::new(),
                aliased: None,
            }),
        )
    }

    /// Add an alias declaration. The target may be supplied later through
    /// [`set_alias_target`](Self::set_alias_target).
    pub fn add_alias(
        &mut self,
        store: &mut TypeStore,
        header: DefnHeader,
        target: Option<Idx>,
    ) -> DefnId {
        let ty = store.alias(self.next_id());
        self.push(
            header,
            DefnKind::Type,
            DefnBody::Type(TypeDefn {
                ty,
                category: None,
                members: Vec::new(),
                symbols: super::SymbolTable::new(),
                extends: Vec::new(),
                implements: Vec::new(),
                aliased: target,
            }),
        )
    }

    pub fn set_alias_target(&mut self, alias: DefnId, target: Idx) {
        if let DefnBody::Type(t) = &mut self.defns[alias.index()].body {
            t.aliased = Some(target);
        }
    }

    /// Add a function. `ty` may be left `None` for on-demand resolution.
    pub fn add_function(&mut self, header: DefnHeader, ty: Option<Idx>) -> DefnId {
        self.push(
            header,
            DefnKind::Function,
            DefnBody::Function(FunctionDefn::new(ty)),
        )
    }

    /// Add a parameter to `func`.
    pub fn add_param(&mut self, func: DefnId, name: Name, ty: Option<Idx>) -> DefnId {
        let id = self.push(
            DefnHeader::new(name).in_scope(func),
            DefnKind::Parameter,
            DefnBody::Value(ValueDefn { ty }),
        );
        if let DefnBody::Function(f) = &mut self.defns[func.index()].body {
            f.params.push(id);
        }
        id
    }

    /// Add a let, var, const or enum-value declaration.
    pub fn add_value(&mut self, header: DefnHeader, kind: DefnKind, ty: Option<Idx>) -> DefnId {
        debug_assert!(kind.is_value(), "{kind:?} is not a value declaration");
        self.push(header, kind, DefnBody::Value(ValueDefn { ty }))
    }

    /// Append a type parameter to `owner` and intern its type variable.
    pub fn add_type_param(
        &mut self,
        store: &mut TypeStore,
        owner: DefnId,
        name: Name,
        bounds: &[Idx],
    ) -> DefnId {
        let id = self.next_id();
        let var = store.type_var(id);
        let index = u32::try_from(self.defns[owner.index()].type_params.len()).unwrap_or(u32::MAX);
        self.defns.push(Defn {
            name,
            kind: DefnKind::TypeParam,
            span: Span::DUMMY,
            visibility: Visibility::Public,
            modifiers: Modifiers::empty(),
            scope: Some(owner),
            type_params: Vec::new(),
            body: DefnBody::TypeParam(TypeParamDefn {
                owner,
                index,
                bounds: bounds.to_vec(),
                var,
            }),
        });
        self.defns[owner.index()].type_params.push(id);
        id
    }

    /// Add a subtype constraint to an existing type parameter.
    pub fn add_bound(&mut self, param: DefnId, bound: Idx) {
        if let DefnBody::TypeParam(p) = &mut self.defns[param.index()].body {
            p.bounds.push(bound);
        }
    }

    /// Add an `extends` edge. `base` is a `Nominal` or `Specialized` type.
    pub fn add_extends(&mut self, defn: DefnId, base: Idx) {
        if let DefnBody::Type(t) = &mut self.defns[defn.index()].body {
            t.extends.push(base);
        }
    }

    /// Add an `implements` edge. `base` is a `Nominal` or `Specialized` type.
    pub fn add_implements(&mut self, defn: DefnId, base: Idx) {
        if let DefnBody::Type(t) = &mut self.defns[defn.index()].body {
            t.implements.push(base);
        }
    }

    // === Queries ===

    /// Type parameters of every enclosing generic scope, outermost first,
    /// followed by the declaration's own. This is the argument list a
    /// specialization of `defn` must supply.
    pub fn all_type_params(&self, defn: DefnId) -> Vec<DefnId> {
        let mut chain = Vec::new();
        let mut current = Some(defn);
        while let Some(id) = current {
            let d = self.get(id);
            if d.kind == DefnKind::TypeParam {
                break;
            }
            chain.push(id);
            current = d.scope;
        }
        chain
            .iter()
            .rev()
            .flat_map(|&id| self.get(id).type_params.iter().copied())
            .collect()
    }

    /// The type variable standing for a type parameter.
    pub fn param_var(&self, param: DefnId) -> Option<Idx> {
        self.get(param).as_type_param().map(|p| p.var)
    }
}

fn raw_index(i: usize) -> u32 {
    u32::try_from(i).unwrap_or_else(|_| panic!("declaration graph exceeded u32::MAX nodes"))
}
