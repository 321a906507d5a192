//! Pass 1 — type resolution (spec.md §4.4 `updateStructType`). Rewrites
//! every Variable/FunctionPointer/Function/Block symbol's declared type
//! string to a canonical `"<name>#<id>"` form wherever it names a
//! known Struct or Enum, leaving anything else (primitives, arrays of
//! them, still-unresolved names) alone for pass 2 to report.

use orangec_par::{SymId, SymKind, SymbolTree};
use orangec_util::Symbol;

pub(crate) const PRIMITIVES: &[&str] = &["int", "char", "boolean", "void", "real", "byte"];

pub(crate) fn array_base(ty: &str) -> (&str, usize) {
    let mut base = ty;
    let mut count = 0;
    while let Some(stripped) = base.strip_suffix(" array") {
        base = stripped;
        count += 1;
    }
    (base, count)
}

pub(crate) fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name) || name == "None" || name == "Any"
}

/// Runs pass 1 over the whole tree, starting at the program root.
pub fn resolve_types(tree: &mut SymbolTree) {
    resolve_node(tree, tree.root);
}

fn resolve_node(tree: &mut SymbolTree, id: SymId) {
    if matches!(
        tree.get(id).kind,
        SymKind::Variable | SymKind::FunctionPointer | SymKind::Function | SymKind::Block
    ) {
        resolve_type_string(tree, id);
    }
    let children: Vec<SymId> = tree.get(id).children.values().copied().collect();
    for child in children {
        resolve_node(tree, child);
    }
}

fn resolve_type_string(tree: &mut SymbolTree, id: SymId) {
    let ty = tree.get(id).ty.clone();
    if ty.is_empty() {
        return;
    }
    let scope = tree.get(id).parent.unwrap_or(tree.root);

    if let Some((module_part, member_part)) = ty.split_once('$') {
        let module_sym = Symbol::intern(module_part);
        let member_sym = Symbol::intern(member_part);
        if let Ok(member_id) = tree.explicit_lookup(module_sym, member_sym, scope) {
            tree.get_mut(id).ty = tree.canonical_type_of(member_id);
        }
        return;
    }

    let (base, array_depth) = array_base(&ty);
    if is_primitive(base) {
        return;
    }
    if let Some(found) = tree.scoped_lookup(scope, Symbol::intern(base)) {
        if matches!(tree.get(found).kind, SymKind::Struct | SymKind::Enum) {
            let mut rebuilt = tree.canonical_type_of(found);
            for _ in 0..array_depth {
                rebuilt.push_str(" array");
            }
            tree.get_mut(id).ty = rebuilt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(source: &str) -> SymbolTree {
        let tokens = orangec_lex::lex(source, orangec_util::FileId(0));
        let mut tree = orangec_par::parse(tokens).unwrap();
        resolve_types(&mut tree);
        tree
    }

    #[test]
    fn qualified_type_resolves_to_canonical_form() {
        let tree = resolve("A { struct Pt(int x) } B { A:Pt p; }");
        let b = tree.get(tree.root).children.get(&Symbol::intern("B")).copied().unwrap();
        let p = tree.get(b).children.get(&Symbol::intern("p")).copied().unwrap();
        let a = tree.get(tree.root).children.get(&Symbol::intern("A")).copied().unwrap();
        let pt = tree.get(a).children.get(&Symbol::intern("Pt")).copied().unwrap();
        assert_eq!(tree.get(p).ty, tree.canonical_type_of(pt));
    }

    #[test]
    fn local_struct_type_resolves_via_scoped_lookup() {
        let tree = resolve("A { struct Pt(int x) Pt make() { Pt p; return p; } }");
        let a = tree.get(tree.root).children.get(&Symbol::intern("A")).copied().unwrap();
        let pt = tree.get(a).children.get(&Symbol::intern("Pt")).copied().unwrap();
        let make = tree.get(a).children.get(&Symbol::intern("make")).copied().unwrap();
        assert_eq!(tree.get(make).ty, tree.canonical_type_of(pt));
    }

    #[test]
    fn primitive_types_are_left_untouched() {
        let tree = resolve("A { int f() { return 0; } }");
        let a = tree.get(tree.root).children.get(&Symbol::intern("A")).copied().unwrap();
        let f = tree.get(a).children.get(&Symbol::intern("f")).copied().unwrap();
        assert_eq!(tree.get(f).ty, "int");
    }

    #[test]
    fn pass_one_is_idempotent() {
        let mut tree = {
            let tokens = orangec_lex::lex("A { struct Pt(int x) } B { A:Pt p; }", orangec_util::FileId(0));
            orangec_par::parse(tokens).unwrap()
        };
        resolve_types(&mut tree);
        let b = tree.get(tree.root).children.get(&Symbol::intern("B")).copied().unwrap();
        let p = tree.get(b).children.get(&Symbol::intern("p")).copied().unwrap();
        let once = tree.get(p).ty.clone();
        resolve_types(&mut tree);
        assert_eq!(tree.get(p).ty, once);
    }
}
