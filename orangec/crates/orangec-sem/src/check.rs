//! Pass 2 — checking (spec.md §4.4 `validate`). Walks the symbol tree top
//! down, dispatching by [`SymKind`], and walks each symbol's own AST
//! (spec.md §4.4.4, §4.4.5) to confirm every expression and statement
//! typechecks. Reports the first error encountered; spec.md does not ask
//! for error recovery.

use crate::error::{SemaError, SemaResult};
use crate::resolve::{array_base, is_primitive};
use orangec_par::{AstKind, AstTree, Payload, SymId, SymKind, SymbolTree};
use orangec_util::Symbol;

/// Runs pass 2 over the whole tree and confirms a `start` function exists
/// (spec.md §4.4.6).
pub fn check_program(tree: &mut SymbolTree) -> SemaResult<()> {
    let mut found_start = false;
    check_symbol(tree, tree.root, &mut found_start)?;
    if !found_start {
        return Err(SemaError::MissingStart);
    }
    Ok(())
}

fn children_of(tree: &SymbolTree, id: SymId) -> Vec<SymId> {
    tree.get(id).children.values().copied().collect()
}

fn check_symbol(tree: &mut SymbolTree, id: SymId, found_start: &mut bool) -> SemaResult<()> {
    match tree.get(id).kind {
        SymKind::Program => {
            for child in children_of(tree, id) {
                if tree.get(child).kind != SymKind::Module {
                    return Err(SemaError::UnknownSymbol {
                        name: tree.get(child).name.as_str().to_string(),
                        span: tree.get(child).span,
                    });
                }
                check_symbol(tree, child, found_start)?;
            }
        }
        SymKind::Module => {
            for child in children_of(tree, id) {
                if tree.get(child).kind == SymKind::Block {
                    return Err(SemaError::UnknownSymbol {
                        name: tree.get(child).name.as_str().to_string(),
                        span: tree.get(child).span,
                    });
                }
                check_symbol(tree, child, found_start)?;
            }
        }
        SymKind::Variable | SymKind::FunctionPointer => {
            validate_variable(tree, id)?;
            for child in children_of(tree, id) {
                check_symbol(tree, child, found_start)?;
            }
        }
        SymKind::Function => {
            check_declared_type(tree, id)?;
            for child in children_of(tree, id) {
                check_symbol(tree, child, found_start)?;
            }
            if tree.get(id).name.as_str() == "start" {
                *found_start = true;
            }
            let code = tree.get_mut(id).code.take();
            if let Some(mut body) = code {
                if let Some(root) = body.root {
                    let return_ty = tree.get(id).ty.clone();
                    let result = check_stmt(tree, &mut body, root, &return_ty);
                    tree.get_mut(id).code = Some(body);
                    result?;
                } else {
                    tree.get_mut(id).code = Some(body);
                }
            }
        }
        SymKind::Enum | SymKind::Struct => {
            for child in children_of(tree, id) {
                check_symbol(tree, child, found_start)?;
            }
        }
        // Block symbols are pure scope-holders; their locals are validated
        // lazily, one SymbolDefine statement at a time, as the enclosing
        // function's (or block's) AST is walked below.
        SymKind::Block => {}
    }
    Ok(())
}

/// Shared by top-level Variable/FunctionPointer symbols and by
/// `SymbolDefine` statements reached mid-body (spec.md §4.4 Variable rule).
fn validate_variable(tree: &mut SymbolTree, id: SymId) -> SemaResult<()> {
    check_declared_type(tree, id)?;
    let code = tree.get_mut(id).code.take();
    if let Some(mut init) = code {
        if let Some(root) = init.root {
            let declared_ty = tree.get(id).ty.clone();
            let span = init.get(root).span;
            let result = check_expr(tree, &mut init, root);
            tree.get_mut(id).code = Some(init);
            let actual_ty = result?;
            if !types_match(tree, &declared_ty, &actual_ty) {
                return Err(SemaError::TypeMismatch {
                    expected: declared_ty,
                    actual: actual_ty,
                    span,
                });
            }
        } else {
            tree.get_mut(id).code = Some(init);
        }
    }
    tree.get_mut(id).is_declared = true;
    Ok(())
}

fn check_declared_type(tree: &SymbolTree, id: SymId) -> SemaResult<()> {
    let ty = tree.get(id).ty.clone();
    if ty.is_empty() {
        return Ok(());
    }
    let (base, _) = array_base(&ty);
    if is_primitive(base) {
        return Ok(());
    }
    if tree.type_map.contains_key(base) {
        return Ok(());
    }
    let scope = tree.get(id).parent.unwrap_or(tree.root);
    if function_pointer_target(tree, scope, base).is_some() {
        return Ok(());
    }
    Err(SemaError::UnknownType {
        name: ty,
        span: tree.get(id).span,
    })
}

fn is_numeric(ty: &str) -> bool {
    ty == "int" || ty == "real"
}

fn is_enum_type(tree: &SymbolTree, ty: &str) -> bool {
    tree.type_map
        .get(ty)
        .map(|&id| tree.get(id).kind == SymKind::Enum)
        .unwrap_or(false)
}

fn is_valid_type_name(tree: &SymbolTree, scope: SymId, text: &str) -> bool {
    if is_primitive(text) {
        return true;
    }
    tree.scoped_lookup(scope, Symbol::intern(text))
        .map(|found| matches!(tree.get(found).kind, SymKind::Struct | SymKind::Enum))
        .unwrap_or(false)
}

/// Resolves a raw type-name string embedded in a `Cast` payload (never
/// touched by pass 1, which only walks symbol `ty` fields) to canonical
/// form on demand.
fn resolve_bare_type(tree: &SymbolTree, scope: SymId, raw: &str) -> String {
    if let Some((module_part, member_part)) = raw.split_once('$') {
        if let Ok(found) =
            tree.explicit_lookup(Symbol::intern(module_part), Symbol::intern(member_part), scope)
        {
            return tree.canonical_type_of(found);
        }
        return raw.to_string();
    }
    let (base, depth) = array_base(raw);
    if is_primitive(base) {
        return raw.to_string();
    }
    if let Some(found) = tree.scoped_lookup(scope, Symbol::intern(base)) {
        if matches!(tree.get(found).kind, SymKind::Struct | SymKind::Enum) {
            let mut rebuilt = tree.canonical_type_of(found);
            for _ in 0..depth {
                rebuilt.push_str(" array");
            }
            return rebuilt;
        }
    }
    raw.to_string()
}

/// `typesMatch` (spec.md §4.4.1). Struct/enum comparison is a plain string
/// compare against the already-canonical types `check_expr` produces —
/// there is no further lookup to perform since every struct/enum-valued
/// expression result already passed through canonicalization on its way
/// out of `check_expr`.
pub fn types_match(_tree: &SymbolTree, expected: &str, actual: &str) -> bool {
    let bare = |s: &str| crate::resolve::PRIMITIVES.contains(&s);
    if bare(expected) || bare(actual) {
        return expected == actual;
    }
    if actual == "None" {
        return true;
    }
    if expected == "Any" {
        return true;
    }
    if let Some(exp_base) = expected.strip_suffix(" array") {
        return match actual.strip_suffix(" array") {
            Some(act_base) => types_match(_tree, exp_base, act_base),
            None => false,
        };
    }
    expected == actual
}

fn check_stmt(tree: &mut SymbolTree, ast: &mut AstTree, id: orangec_par::AstId, return_ty: &str) -> SemaResult<()> {
    let node = ast.get(id).clone();
    match node.kind {
        AstKind::Block => {
            for child in node.children {
                check_stmt(tree, ast, child, return_ty)?;
            }
            Ok(())
        }
        AstKind::If => {
            let cond_ty = check_expr(tree, ast, node.children[0])?;
            if cond_ty != "boolean" {
                return Err(SemaError::TypeMismatch {
                    expected: "boolean".to_string(),
                    actual: cond_ty,
                    span: node.span,
                });
            }
            check_stmt(tree, ast, node.children[1], return_ty)
        }
        AstKind::IfElse => {
            let cond_ty = check_expr(tree, ast, node.children[0])?;
            if cond_ty != "boolean" {
                return Err(SemaError::TypeMismatch {
                    expected: "boolean".to_string(),
                    actual: cond_ty,
                    span: node.span,
                });
            }
            check_stmt(tree, ast, node.children[1], return_ty)?;
            check_stmt(tree, ast, node.children[2], return_ty)
        }
        AstKind::While => {
            let cond_ty = check_expr(tree, ast, node.children[0])?;
            if cond_ty != "boolean" {
                return Err(SemaError::TypeMismatch {
                    expected: "boolean".to_string(),
                    actual: cond_ty,
                    span: node.span,
                });
            }
            check_stmt(tree, ast, node.children[1], return_ty)
        }
        AstKind::Return => {
            let value = node.children[0];
            if ast.get(value).kind == AstKind::Nop {
                if return_ty != "void" {
                    return Err(SemaError::TypeMismatch {
                        expected: return_ty.to_string(),
                        actual: "void".to_string(),
                        span: node.span,
                    });
                }
                return Ok(());
            }
            let value_ty = check_expr(tree, ast, value)?;
            if !types_match(tree, return_ty, &value_ty) {
                return Err(SemaError::TypeMismatch {
                    expected: return_ty.to_string(),
                    actual: value_ty,
                    span: node.span,
                });
            }
            Ok(())
        }
        AstKind::SymbolDefine => {
            let sym = match node.payload {
                Payload::Sym(s) => s,
                _ => unreachable!("SymbolDefine always carries the declared symbol's name"),
            };
            let scope = node.scope.expect("SymbolDefine is always parsed inside a scope");
            let var_id = tree
                .scoped_lookup(scope, sym)
                .expect("the parser inserts the symbol before emitting its SymbolDefine");
            validate_variable(tree, var_id)
        }
        _ => {
            check_expr(tree, ast, id)?;
            Ok(())
        }
    }
}

/// Expression checking (spec.md §4.4.4). Returns the expression's type
/// string on success.
fn check_expr(tree: &mut SymbolTree, ast: &mut AstTree, id: orangec_par::AstId) -> SemaResult<String> {
    let node = ast.get(id).clone();
    let span = node.span;
    match node.kind {
        AstKind::IntLiteral => Ok("int".to_string()),
        AstKind::RealLiteral => Ok("real".to_string()),
        AstKind::CharLiteral => Ok("char".to_string()),
        AstKind::StringLiteral => Ok("char array".to_string()),
        AstKind::True | AstKind::False => Ok("boolean".to_string()),
        AstKind::Null => Ok("None".to_string()),
        AstKind::Nop => Ok("void".to_string()),

        AstKind::Var => {
            let sym = match node.payload {
                Payload::Sym(s) => s,
                _ => unreachable!("Var always carries a Symbol payload"),
            };
            let scope = node.scope.expect("every Var is parsed inside a scope");
            let target = tree
                .scoped_lookup(scope, sym)
                .ok_or_else(|| SemaError::UnknownSymbol { name: sym.as_str().to_string(), span })?;
            if !tree.get(target).is_declared {
                return Err(SemaError::NotDeclared { name: sym.as_str().to_string(), span });
            }
            Ok(tree.get(target).ty.clone())
        }

        AstKind::Add | AstKind::Sub | AstKind::Mul | AstKind::Div => {
            let right_ty = check_expr(tree, ast, node.children[0])?;
            let left_ty = check_expr(tree, ast, node.children[1])?;
            if !is_numeric(&right_ty) || !is_numeric(&left_ty) {
                return Err(SemaError::TypeMismatch {
                    expected: "int or real".to_string(),
                    actual: format!("{} and {}", left_ty, right_ty),
                    span,
                });
            }
            if left_ty == "real" || right_ty == "real" {
                Ok("real".to_string())
            } else {
                Ok("int".to_string())
            }
        }

        AstKind::Greater | AstKind::Lesser | AstKind::GreaterEqual | AstKind::LesserEqual => {
            let right_ty = check_expr(tree, ast, node.children[0])?;
            let left_ty = check_expr(tree, ast, node.children[1])?;
            if !is_numeric(&right_ty) || !is_numeric(&left_ty) {
                return Err(SemaError::TypeMismatch {
                    expected: "int or real".to_string(),
                    actual: format!("{} and {}", left_ty, right_ty),
                    span,
                });
            }
            Ok("boolean".to_string())
        }

        AstKind::Is | AstKind::Isnt => {
            check_expr(tree, ast, node.children[0])?;
            check_expr(tree, ast, node.children[1])?;
            Ok("boolean".to_string())
        }

        AstKind::And | AstKind::Or => {
            let right_ty = check_expr(tree, ast, node.children[0])?;
            let left_ty = check_expr(tree, ast, node.children[1])?;
            if right_ty != "boolean" || left_ty != "boolean" {
                return Err(SemaError::TypeMismatch {
                    expected: "boolean".to_string(),
                    actual: format!("{} and {}", left_ty, right_ty),
                    span,
                });
            }
            Ok("boolean".to_string())
        }

        AstKind::Assign => {
            let (value_id, target_id) = (node.children[0], node.children[1]);
            if !matches!(
                ast.get(target_id).kind,
                AstKind::Var | AstKind::Dot | AstKind::Index | AstKind::ModuleAccess
            ) {
                return Err(SemaError::AssignNonLocation { span });
            }
            if ast.get(target_id).kind == AstKind::Var {
                if let Payload::Sym(sym) = ast.get(target_id).payload {
                    let scope = ast.get(target_id).scope.unwrap();
                    if let Some(target_sym) = tree.scoped_lookup(scope, sym) {
                        if !tree.get(target_sym).is_declared {
                            return Err(SemaError::NotDeclared {
                                name: sym.as_str().to_string(),
                                span,
                            });
                        }
                        if tree.get(target_sym).is_constant {
                            return Err(SemaError::AssignConstant {
                                name: sym.as_str().to_string(),
                                span,
                            });
                        }
                        tree.get_mut(target_sym).is_declared = true;
                    }
                }
            }
            let target_ty = check_expr(tree, ast, target_id)?;
            let value_ty = check_expr(tree, ast, value_id)?;
            if !types_match(tree, &target_ty, &value_ty) {
                return Err(SemaError::TypeMismatch {
                    expected: target_ty,
                    actual: value_ty,
                    span,
                });
            }
            Ok(target_ty)
        }

        AstKind::Dot => {
            let (field_id, base_id) = (node.children[0], node.children[1]);
            let base_ty = check_expr(tree, ast, base_id)?;
            let field_name = match ast.get(field_id).payload {
                Payload::Sym(s) => s,
                _ => unreachable!("the right side of Dot always carries a field name"),
            };
            if let Some(_elem) = base_ty.strip_suffix(" array") {
                if field_name.as_str() == "length" {
                    return Ok("int".to_string());
                }
                return Err(SemaError::UnknownField {
                    ty: base_ty,
                    field: field_name.as_str().to_string(),
                    span,
                });
            }
            let struct_id = tree
                .type_map
                .get(&base_ty)
                .copied()
                .ok_or_else(|| SemaError::UnknownType { name: base_ty.clone(), span })?;
            let field_id_resolved = tree
                .get(struct_id)
                .children
                .get(&field_name)
                .copied()
                .ok_or_else(|| SemaError::UnknownField {
                    ty: base_ty.clone(),
                    field: field_name.as_str().to_string(),
                    span,
                })?;
            Ok(tree.get(field_id_resolved).ty.clone())
        }

        AstKind::Index => check_index(tree, ast, id, false),

        AstKind::ModuleAccess => {
            let (member_id, module_id) = (node.children[0], node.children[1]);
            let module_name = match ast.get(module_id).payload {
                Payload::Sym(s) => s,
                _ => unreachable!("the left side of ModuleAccess always carries a module name"),
            };
            let scope = node.scope.expect("every ModuleAccess is parsed inside a scope");
            match ast.get(member_id).kind {
                AstKind::Call => {
                    let target_module = tree
                        .get(tree.root)
                        .children
                        .get(&module_name)
                        .copied()
                        .ok_or_else(|| SemaError::UnknownSymbol {
                            name: module_name.as_str().to_string(),
                            span,
                        })?;
                    let saved_scope = ast.get(member_id).scope;
                    ast.get_mut(member_id).scope = Some(target_module);
                    let result = check_expr(tree, ast, member_id);
                    ast.get_mut(member_id).scope = saved_scope;
                    result
                }
                AstKind::Var => {
                    let member_name = match ast.get(member_id).payload {
                        Payload::Sym(s) => s,
                        _ => unreachable!("the right side of ModuleAccess always carries a member name"),
                    };
                    tree.explicit_lookup(module_name, member_name, scope)
                        .map(|found| tree.get(found).ty.clone())
                        .map_err(|detail| SemaError::AccessViolation { detail: detail.to_string(), span })
                }
                _ => Err(SemaError::UnknownSymbol { name: module_name.as_str().to_string(), span }),
            }
        }

        AstKind::Cast => {
            let target_raw = match &node.payload {
                Payload::Str(s) => s.clone(),
                _ => unreachable!("Cast always carries its target type as text"),
            };
            let operand_ty = check_expr(tree, ast, node.children[0])?;
            let scope = node.scope.expect("every Cast is parsed inside a scope");
            let target_ty = resolve_bare_type(tree, scope, &target_raw);
            if target_ty == operand_ty || target_ty == "Any" || operand_ty == "Any" {
                return Ok(target_ty);
            }
            let enum_int = (is_enum_type(tree, &target_ty) && operand_ty == "int")
                || (is_enum_type(tree, &operand_ty) && target_ty == "int");
            let numeric_cast = (target_ty == "real" && operand_ty == "int")
                || (target_ty == "int" && operand_ty == "real");
            if enum_int || numeric_cast {
                return Ok(target_ty);
            }
            Err(SemaError::TypeMismatch { expected: target_ty, actual: operand_ty, span })
        }

        AstKind::New => {
            let operand = node.children[0];
            match ast.get(operand).kind {
                AstKind::Call => check_call(tree, ast, operand, true),
                AstKind::Index => check_index(tree, ast, operand, true),
                AstKind::ModuleAccess => check_expr(tree, ast, operand),
                other => Err(SemaError::TypeMismatch {
                    expected: "Call, Index, or ModuleAccess".to_string(),
                    actual: format!("{:?}", other),
                    span,
                }),
            }
        }

        AstKind::Free => {
            check_expr(tree, ast, node.children[0])?;
            Ok("None".to_string())
        }

        AstKind::Call => check_call(tree, ast, id, false),

        AstKind::Verbatim => {
            for child in node.children {
                check_expr(tree, ast, child)?;
            }
            Ok("Any".to_string())
        }

        AstKind::Block | AstKind::If | AstKind::IfElse | AstKind::While | AstKind::Return | AstKind::SymbolDefine => {
            unreachable!("statement kinds never appear where an expression is expected")
        }
    }
}

/// `via_new` gates the array-size-allocation reading of an `Index` node
/// (`new int[5]`): spec.md §4.4.4's Index bullet requires the base to be a
/// bare type name AND the node to be the direct operand of `new`. Without
/// `via_new`, a base that resolves to a type name rather than a value is
/// simply not a legal array-size expression and falls through to ordinary
/// element indexing, which then fails because a type name has no array type.
fn check_index(tree: &mut SymbolTree, ast: &mut AstTree, id: orangec_par::AstId, via_new: bool) -> SemaResult<String> {
    let node = ast.get(id).clone();
    let span = node.span;
    let (index_id, base_id) = (node.children[0], node.children[1]);
    let index_ty = check_expr(tree, ast, index_id)?;
    if index_ty != "int" {
        return Err(SemaError::TypeMismatch {
            expected: "int".to_string(),
            actual: index_ty,
            span,
        });
    }
    let base_scope = ast.get(base_id).scope;
    if via_new && ast.get(base_id).kind == AstKind::Var {
        if let Payload::Sym(sym) = ast.get(base_id).payload {
            if let Some(scope) = base_scope {
                if is_valid_type_name(tree, scope, sym.as_str()) && tree.scoped_lookup(scope, sym).is_none() {
                    return Ok(format!("{} array", sym.as_str()));
                }
            }
        }
    }
    let base_ty = check_expr(tree, ast, base_id)?;
    base_ty.strip_suffix(" array").map(|b| b.to_string()).ok_or_else(|| SemaError::TypeMismatch {
        expected: "array type".to_string(),
        actual: base_ty.clone(),
        span,
    })
}

/// `via_new` gates the two construction-shaped targets (array literal,
/// struct initialization): spec.md §4.4.4 requires both to appear only as
/// the direct operand of `new`. A plain function/pointer call never needs
/// that gate.
fn check_call(tree: &mut SymbolTree, ast: &mut AstTree, id: orangec_par::AstId, via_new: bool) -> SemaResult<String> {
    let node = ast.get(id).clone();
    let span = node.span;
    let name_sym = match node.payload {
        Payload::Sym(s) => s,
        _ => unreachable!("Call always carries a Symbol payload"),
    };
    let name = name_sym.as_str();
    let scope = node.scope.expect("every Call is parsed inside a scope");

    if name.ends_with(" array") {
        if !via_new {
            return Err(SemaError::TypeMismatch {
                expected: "new <type> array(...)".to_string(),
                actual: "array literal used outside new".to_string(),
                span,
            });
        }
        let elem_ty = name.trim_end_matches(" array").to_string();
        for &arg in &node.children {
            let arg_ty = check_expr(tree, ast, arg)?;
            if !types_match(tree, &elem_ty, &arg_ty) {
                return Err(SemaError::TypeMismatch { expected: elem_ty.clone(), actual: arg_ty, span });
            }
        }
        return Ok(format!("{} array", elem_ty));
    }

    let target = tree
        .scoped_lookup(scope, name_sym)
        .ok_or_else(|| SemaError::UnknownSymbol { name: name.to_string(), span })?;

    match tree.get(target).kind {
        SymKind::Struct => {
            if !via_new {
                return Err(SemaError::TypeMismatch {
                    expected: format!("new {}(...)", name),
                    actual: "struct initialization used outside new".to_string(),
                    span,
                });
            }
            let fields: Vec<SymId> = tree.get(target).children.values().copied().collect();
            if !node.children.is_empty() && node.children.len() != fields.len() {
                return Err(SemaError::ArityMismatch {
                    name: name.to_string(),
                    expected: fields.len(),
                    found: node.children.len(),
                    span,
                });
            }
            if node.children.len() == fields.len() {
                for (i, &arg) in node.children.iter().enumerate() {
                    let arg_ty = check_expr(tree, ast, arg)?;
                    let field_ty = tree.get(fields[i]).ty.clone();
                    if !types_match(tree, &field_ty, &arg_ty) {
                        return Err(SemaError::TypeMismatch { expected: field_ty, actual: arg_ty, span });
                    }
                }
            }
            Ok(tree.canonical_type_of(target))
        }
        SymKind::Function | SymKind::FunctionPointer => {
            let caller_static = tree
                .enclosing_module(scope)
                .map(|m| tree.get(m).is_static)
                .unwrap_or(false);
            if tree.get(target).is_static && !caller_static {
                return Err(SemaError::AccessViolation {
                    detail: format!("non-static scope may not call static function '{}'", name),
                    span,
                });
            }
            let params: Vec<SymId> = tree
                .get(target)
                .children
                .values()
                .copied()
                .filter(|&c| !tree.get(c).name.as_str().starts_with("_block"))
                .collect();
            if node.children.len() != params.len() {
                return Err(SemaError::ArityMismatch {
                    name: name.to_string(),
                    expected: params.len(),
                    found: node.children.len(),
                    span,
                });
            }
            for (i, &arg) in node.children.iter().enumerate() {
                let arg_ty = check_expr(tree, ast, arg)?;
                let param_ty = tree.get(params[i]).ty.clone();
                let param_scope = tree.get(params[i]).parent.unwrap_or(tree.root);
                if let Some(expected_target) = function_pointer_target(tree, param_scope, &param_ty) {
                    if !function_pointer_arg_matches(tree, ast, expected_target, arg) {
                        return Err(SemaError::TypeMismatch { expected: param_ty, actual: arg_ty, span });
                    }
                    continue;
                }
                if !types_match(tree, &param_ty, &arg_ty) {
                    return Err(SemaError::TypeMismatch { expected: param_ty, actual: arg_ty, span });
                }
            }
            Ok(tree.get(target).ty.clone())
        }
        _ => Err(SemaError::UnknownSymbol { name: name.to_string(), span }),
    }
}

/// Resolves a raw, never-canonicalized type name (Function/FunctionPointer
/// symbols never enter the type map) to the callable it names, for a
/// parameter whose declared type is itself a FunctionPointer's name.
fn function_pointer_target(tree: &SymbolTree, scope: SymId, name: &str) -> Option<SymId> {
    let found = tree.scoped_lookup(scope, Symbol::intern(name))?;
    match tree.get(found).kind {
        SymKind::Function | SymKind::FunctionPointer => Some(found),
        _ => None,
    }
}

/// Structural compatibility for a FunctionPointer-typed parameter (spec.md
/// §4.4.4 Call bullet): the argument must itself name a Function or
/// FunctionPointer whose parameter types and return type match
/// `expected_target`'s element-by-element, not just a type-string compare.
fn function_pointer_arg_matches(
    tree: &SymbolTree,
    ast: &AstTree,
    expected_target: SymId,
    arg: orangec_par::AstId,
) -> bool {
    let arg_node = ast.get(arg);
    let arg_target = match (arg_node.kind, &arg_node.payload, arg_node.scope) {
        (AstKind::Var, Payload::Sym(sym), Some(scope)) => tree.scoped_lookup(scope, *sym),
        _ => None,
    };
    let Some(arg_target) = arg_target else {
        return false;
    };
    if !matches!(tree.get(arg_target).kind, SymKind::Function | SymKind::FunctionPointer) {
        return false;
    }
    if tree.get(arg_target).ty != tree.get(expected_target).ty {
        return false;
    }
    let params_of = |sym: SymId| -> Vec<SymId> {
        tree.get(sym)
            .children
            .values()
            .copied()
            .filter(|&c| !tree.get(c).name.as_str().starts_with("_block"))
            .collect()
    };
    let expected_params = params_of(expected_target);
    let actual_params = params_of(arg_target);
    if expected_params.len() != actual_params.len() {
        return false;
    }
    expected_params
        .iter()
        .zip(actual_params.iter())
        .all(|(&e, &a)| tree.get(e).ty == tree.get(a).ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_types;

    fn check(source: &str) -> SemaResult<()> {
        let tokens = orangec_lex::lex(source, orangec_util::FileId(0));
        let mut tree = orangec_par::parse(tokens).unwrap();
        resolve_types(&mut tree);
        check_program(&mut tree)
    }

    #[test]
    fn simple_program_with_start_passes() {
        assert!(check("Main { void start() { int x; x = 1; } }").is_ok());
    }

    #[test]
    fn missing_start_is_reported() {
        assert!(matches!(check("Main { void run() { } }"), Err(SemaError::MissingStart)));
    }

    #[test]
    fn return_type_mismatch_is_reported() {
        let result = check("Main { int bad() { return true; } void start() { } }");
        assert!(matches!(result, Err(SemaError::TypeMismatch { .. })));
    }

    #[test]
    fn using_a_variable_before_its_declaration_is_reported() {
        let result = check("Main { void start() { x = 1; int x; } }");
        assert!(matches!(result, Err(SemaError::NotDeclared { .. })));
    }

    #[test]
    fn calling_with_too_few_arguments_is_reported() {
        let result = check("Main { void f(int a, int b) { } void start() { f(1); } }");
        assert!(matches!(result, Err(SemaError::ArityMismatch { .. })));
    }

    #[test]
    fn assigning_to_a_constant_is_reported() {
        let result = check("Main { const int x = 1; void start() { x = 2; } }");
        assert!(matches!(result, Err(SemaError::AssignConstant { .. })));
    }

    #[test]
    fn struct_field_access_resolves_field_type() {
        assert!(check(
            "Main { struct Pt(int x, int y) void start() { Pt p; p = new Pt(1, 2); int v; v = p.x; } }"
        )
        .is_ok());
    }

    #[test]
    fn array_size_allocation_outside_new_is_rejected() {
        let result = check("Main { void start() { int y; y = int[5]; } }");
        assert!(result.is_err());
    }

    #[test]
    fn array_size_allocation_under_new_is_accepted() {
        assert!(check("Main { void start() { int[] a; a = new int[5]; } }").is_ok());
    }

    #[test]
    fn structurally_compatible_function_passed_to_a_function_pointer_param_is_accepted() {
        assert!(check(
            "Main { void cb(int a); void good(int a) { return; } void invoke(cb handler) { } void start() { invoke(good); } }"
        )
        .is_ok());
    }

    #[test]
    fn structurally_incompatible_function_passed_to_a_function_pointer_param_is_rejected() {
        let result = check(
            "Main { void cb(int a); void bad(real a) { return; } void invoke(cb handler) { } void start() { invoke(bad); } }"
        );
        assert!(matches!(result, Err(SemaError::TypeMismatch { .. })));
    }
}
