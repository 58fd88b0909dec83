//! Declaration graph.
//!
//! Declarations live in one arena ([`DefnGraph`]) and reference each other
//! by [`DefnId`]. Every declaration shares a common header (name, location,
//! visibility, modifiers, owning scope, type parameters); the kind-specific
//! part is a [`DefnBody`].
//!
//! Inheritance edges (`extends` / `implements`) are stored as types, either
//! `Nominal` (plain base) or `Specialized` (generic base applied to
//! arguments), so walking an edge yields both the base declaration and the
//! environment it is seen through.

mod graph;
mod symbols;

use std::cell::OnceCell;

use tarn_ir::{Name, Span};

use crate::{DefnId, Idx, Modifiers, NominalKind};

pub use graph::{DefnGraph, DefnHeader};
pub use symbols::SymbolTable;

/// Declaration kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DefnKind {
    Module,
    Type,
    Function,
    Let,
    Var,
    Const,
    Parameter,
    EnumValue,
    TypeParam,
}

impl DefnKind {
    /// Let, var, const, parameter and enum-value declarations.
    pub const fn is_value(self) -> bool {
        matches!(
            self,
            Self::Let | Self::Var | Self::Const | Self::Parameter | Self::EnumValue
        )
    }
}

/// Visibility of a declaration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A declaration node.
#[derive(Clone, Debug)]
pub struct Defn {
    pub name: Name,
    pub kind: DefnKind,
    pub span: Span,
    pub visibility: Visibility,
    pub modifiers: Modifiers,
    /// Enclosing module, type or function.
    pub scope: Option<DefnId>,
    /// Own type parameters, in slot order. Empty for non-generic declarations.
    pub type_params: Vec<DefnId>,
    pub body: DefnBody,
}

/// Kind-specific part of a declaration.
#[derive(Clone, Debug)]
pub enum DefnBody {
    Module(ModuleDefn),
    Type(TypeDefn),
    Function(FunctionDefn),
    Value(ValueDefn),
    TypeParam(TypeParamDefn),
}

#[derive(Clone, Debug, Default)]
pub struct ModuleDefn {
    pub symbols: SymbolTable,
}

/// Class, struct, interface, trait, enum, extension or alias declaration.
#[derive(Clone, Debug)]
pub struct TypeDefn {
    /// The `Nominal` type of this declaration, or its `Alias` type.
    pub ty: Idx,
    /// `None` for aliases.
    pub category: Option<NominalKind>,
    /// Members in declaration order.
    pub members: Vec<DefnId>,
    pub symbols: SymbolTable,
    pub extends: Vec<Idx>,
    pub implements: Vec<Idx>,
    /// Target of an alias declaration.
    pub aliased: Option<Idx>,
}

impl TypeDefn {
    pub fn is_alias(&self) -> bool {
        self.category.is_none()
    }
}

/// Function or method declaration.
///
/// The function type is write-once: upstream passes either set it at
/// construction or leave it for an on-demand resolution pass.
#[derive(Clone, Debug, Default)]
pub struct FunctionDefn {
    pub params: Vec<DefnId>,
    ty: OnceCell<Idx>,
}

impl FunctionDefn {
    pub fn new(ty: Option<Idx>) -> Self {
        let cell = OnceCell::new();
        if let Some(ty) = ty {
            let _ = cell.set(ty);
        }
        FunctionDefn {
            params: Vec::new(),
            ty: cell,
        }
    }

    /// The resolved function type, if any.
    #[inline]
    pub fn ty(&self) -> Option<Idx> {
        self.ty.get().copied()
    }

    /// Record the resolved type. Returns `false` if one was already set.
    pub fn set_ty(&self, ty: Idx) -> bool {
        self.ty.set(ty).is_ok()
    }
}

/// Let, var, const, parameter or enum-value declaration.
#[derive(Clone, Debug, Default)]
pub struct ValueDefn {
    pub ty: Option<Idx>,
}

/// Generic parameter declaration.
#[derive(Clone, Debug)]
pub struct TypeParamDefn {
    /// The declaration this parameter belongs to.
    pub owner: DefnId,
    /// Slot index within the owner's own parameter list.
    pub index: u32,
    /// Subtype constraints.
    pub bounds: Vec<Idx>,
    /// The `TypeVar` type standing for this parameter.
    pub var: Idx,
}

impl Defn {
    #[inline]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn as_module(&self) -> Option<&ModuleDefn> {
        match &self.body {
            DefnBody::Module(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeDefn> {
        match &self.body {
            DefnBody::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDefn> {
        match &self.body {
            DefnBody::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&ValueDefn> {
        match &self.body {
            DefnBody::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_type_param(&self) -> Option<&TypeParamDefn> {
        match &self.body {
            DefnBody::TypeParam(p) => Some(p),
            _ => None,
        }
    }

    /// Member scope of a module or type declaration.
    pub fn symbols(&self) -> Option<&SymbolTable> {
        match &self.body {
            DefnBody::Module(m) => Some(&m.symbols),
            DefnBody::Type(t) => Some(&t.symbols),
            DefnBody::Function(_) | DefnBody::Value(_) | DefnBody::TypeParam(_) => None,
        }
    }

    /// Nominal category of a type declaration.
    pub fn category(&self) -> Option<NominalKind> {
        self.as_type().and_then(|t| t.category)
    }

    /// Declared type of a function or value declaration.
    pub fn declared_type(&self) -> Option<Idx> {
        match &self.body {
            DefnBody::Function(f) => f.ty(),
            DefnBody::Value(v) => v.ty,
            DefnBody::Type(t) => Some(t.ty),
            DefnBody::TypeParam(p) => Some(p.var),
            DefnBody::Module(_) => None,
        }
    }
}

#[cfg(test)]
mod tests;
