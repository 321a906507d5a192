//! The symbol tree (spec.md §3.2): modules, structs, enums, variables,
//! functions, function pointers, and blocks, in one arena indexed by
//! [`SymId`].

use crate::ast::AstTree;
use indexmap::IndexMap;
use orangec_util::{define_idx, IndexVec, Span, Symbol};

define_idx!(SymId);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymKind {
    Program,
    Module,
    Struct,
    Enum,
    Variable,
    FunctionPointer,
    Function,
    Block,
}

/// One node of the symbol tree. `children` is an insertion-ordered map —
/// parameter order and enum-variant order are both observable (spec.md
/// §3.2).
#[derive(Clone, Debug)]
pub struct SymNode {
    pub kind: SymKind,
    pub name: Symbol,
    /// Type string (spec.md §3.4): primitive name, `" array"`-suffixed,
    /// `Mod$Type` before resolution, or `Name#<id>` once resolved.
    pub ty: String,
    pub id: SymId,
    pub parent: Option<SymId>,
    pub children: IndexMap<Symbol, SymId>,
    pub is_private: bool,
    pub is_static: bool,
    pub is_constant: bool,
    pub is_declared: bool,
    pub code: Option<AstTree>,
    pub span: Span,
}

impl SymNode {
    pub fn is_scope(&self) -> bool {
        matches!(
            self.kind,
            SymKind::Program | SymKind::Module | SymKind::Function | SymKind::Block
        )
    }
}

/// The whole program: one arena of symbols plus the process-wide type map
/// spec.md §3.2 calls out as a side index (`"<name>#<id>" → Symbol`).
pub struct SymbolTree {
    nodes: IndexVec<SymId, SymNode>,
    pub type_map: IndexMap<String, SymId>,
    pub root: SymId,
}

impl SymbolTree {
    pub fn new() -> Self {
        let mut nodes = IndexVec::new();
        let root = nodes.push(SymNode {
            kind: SymKind::Program,
            name: Symbol::intern("<program>"),
            ty: String::new(),
            id: SymId(0),
            parent: None,
            children: IndexMap::new(),
            is_private: false,
            is_static: false,
            is_constant: false,
            is_declared: true,
            code: None,
            span: Span::DUMMY,
        });
        SymbolTree {
            nodes,
            type_map: IndexMap::new(),
            root,
        }
    }

    /// Allocates a new symbol and links it as a child of `parent`, failing
    /// if the name is already taken among its siblings (spec.md §3.2's
    /// uniqueness invariant; spec.md §7's "duplicate name").
    #[allow(clippy::too_many_arguments)]
    pub fn insert(
        &mut self,
        parent: SymId,
        kind: SymKind,
        name: Symbol,
        ty: String,
        is_private: bool,
        is_static: bool,
        is_constant: bool,
        span: Span,
    ) -> Result<SymId, Symbol> {
        if self.nodes[parent].children.contains_key(&name) {
            return Err(name);
        }
        let id = self.nodes.push(SymNode {
            kind,
            name,
            ty: ty.clone(),
            id: SymId(0), // patched below
            parent: Some(parent),
            children: IndexMap::new(),
            is_private,
            is_static,
            is_constant,
            is_declared: false,
            code: None,
            span,
        });
        self.nodes[id].id = id;
        self.nodes[parent].children.insert(name, id);

        if matches!(kind, SymKind::Struct | SymKind::Enum) {
            let canonical = format!("{}#{}", name.as_str(), orangec_util::base36::encode(id.0 as u64));
            self.nodes[id].ty = canonical.clone();
            self.type_map.insert(canonical, id);
        }
        Ok(id)
    }

    pub fn get(&self, id: SymId) -> &SymNode {
        &self.nodes[id]
    }

    pub fn get_mut(&mut self, id: SymId) -> &mut SymNode {
        &mut self.nodes[id]
    }

    pub fn canonical_type_of(&self, id: SymId) -> String {
        format!(
            "{}#{}",
            self.nodes[id].name.as_str(),
            orangec_util::base36::encode(id.0 as u64)
        )
    }

    pub fn emitted_name(&self, id: SymId) -> String {
        format!("_{}", orangec_util::base36::encode(id.0 as u64))
    }

    /// Scoped lookup (spec.md §4.4.2): walk from `scope` upward through
    /// `parent`, first hit wins.
    pub fn scoped_lookup(&self, scope: SymId, name: Symbol) -> Option<SymId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let node = &self.nodes[id];
            if let Some(&found) = node.children.get(&name) {
                return Some(found);
            }
            current = node.parent;
        }
        None
    }

    /// Explicit/qualified lookup (spec.md §4.4.3): `module_name:member_name`.
    /// Returns `Err(true)` when the module exists but the member is private
    /// or missing, `Err(false)` when the module itself doesn't exist.
    pub fn explicit_lookup(
        &self,
        module_name: Symbol,
        member_name: Symbol,
        caller_scope: SymId,
    ) -> Result<SymId, &'static str> {
        let module_id = self.nodes[self.root]
            .children
            .get(&module_name)
            .copied()
            .ok_or("unknown module")?;
        let module = &self.nodes[module_id];
        if module.is_static {
            let caller_is_static = self.enclosing_module_is_static(caller_scope);
            if !caller_is_static {
                return Err("static module may not be accessed from a non-static scope");
            }
        }
        let member_id = module
            .children
            .get(&member_name)
            .copied()
            .ok_or("unknown member")?;
        if self.nodes[member_id].is_private {
            return Err("member is private");
        }
        Ok(member_id)
    }

    fn enclosing_module_is_static(&self, scope: SymId) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            let node = &self.nodes[id];
            if node.kind == SymKind::Module {
                return node.is_static;
            }
            current = node.parent;
        }
        false
    }

    /// Nearest enclosing [`SymKind::Module`] of a scope, used for
    /// static/non-static access checks.
    pub fn enclosing_module(&self, scope: SymId) -> Option<SymId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if self.nodes[id].kind == SymKind::Module {
                return Some(id);
            }
            current = self.nodes[id].parent;
        }
        None
    }
}

impl Default for SymbolTree {
    fn default() -> Self {
        Self::new()
    }
}
