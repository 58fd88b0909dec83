//! Type formatting for tracing output and caller diagnostics.

use tarn_ir::StringLookup;

use crate::{DefnGraph, DefnId, Idx, NominalKind, TypeKind, TypeStore};

impl TypeStore {
    /// Format a type as a human-readable string.
    pub fn format_type(&self, idx: Idx, defns: &DefnGraph, names: &dyn StringLookup) -> String {
        let mut buf = String::new();
        self.format_type_into(idx, defns, names, &mut buf);
        buf
    }

    /// Format a type into an existing string buffer.
    pub fn format_type_into(
        &self,
        idx: Idx,
        defns: &DefnGraph,
        names: &dyn StringLookup,
        buf: &mut String,
    ) {
        match self.kind(idx) {
            TypeKind::Void => buf.push_str("void"),
            TypeKind::Bool => buf.push_str("bool"),
            TypeKind::Int { bits, signed } => {
                buf.push(if *signed { 'i' } else { 'u' });
                buf.push_str(&bits.to_string());
            }
            TypeKind::Float { bits } => {
                buf.push('f');
                buf.push_str(&bits.to_string());
            }
            TypeKind::Tuple(members) => {
                buf.push('(');
                self.format_list(members, ", ", defns, names, buf);
                buf.push(')');
            }
            TypeKind::Union(members) => self.format_list(members, " | ", defns, names, buf),
            TypeKind::Function { ret, params } => {
                buf.push_str("fn(");
                self.format_list(params, ", ", defns, names, buf);
                buf.push_str(") -> ");
                self.format_type_into(*ret, defns, names, buf);
            }
            TypeKind::Nominal { kind, defn } => {
                if *kind == NominalKind::Extension {
                    buf.push_str("extend ");
                }
                push_defn_name(*defn, defns, names, buf);
            }
            TypeKind::Alias(defn) | TypeKind::TypeVar(defn) => {
                push_defn_name(*defn, defns, names, buf);
            }
            TypeKind::Specialized(spec) => {
                let spec = self.spec(*spec);
                push_defn_name(spec.generic, defns, names, buf);
                buf.push('[');
                self.format_list(&spec.args, ", ", defns, names, buf);
                buf.push(']');
            }
            TypeKind::Modified { base, quals } => {
                if quals.is_provisional() {
                    buf.push('?');
                }
                if quals.is_const() {
                    buf.push_str("const ");
                }
                self.format_type_into(*base, defns, names, buf);
            }
            TypeKind::Contingent(members) => {
                buf.push_str("contingent{");
                self.format_list(members, ", ", defns, names, buf);
                buf.push('}');
            }
            TypeKind::Inferred(var) => {
                buf.push('?');
                buf.push_str(&var.raw().to_string());
            }
        }
    }

    fn format_list(
        &self,
        members: &[Idx],
        sep: &str,
        defns: &DefnGraph,
        names: &dyn StringLookup,
        buf: &mut String,
    ) {
        for (i, &member) in members.iter().enumerate() {
            if i > 0 {
                buf.push_str(sep);
            }
            self.format_type_into(member, defns, names, buf);
        }
    }
}

fn push_defn_name(defn: DefnId, defns: &DefnGraph, names: &dyn StringLookup, buf: &mut String) {
    match defns.try_get(defn) {
        Some(d) => buf.push_str(names.lookup(d.name)),
        None => buf.push_str("<unknown>"),
    }
}
