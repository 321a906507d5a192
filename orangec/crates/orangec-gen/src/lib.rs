//! The generator (spec.md §4.5): walks a validated symbol tree and renders
//! it as a single JavaScript source string, renaming every user symbol to
//! `_<base36-id>` so independently compiled modules never collide.
//!
//! Assumes the tree already passed [`orangec_sem::validate`]; any reference
//! this module can't resolve is an internal error (spec.md §4.5 "Failure"),
//! not a diagnostic — there is nothing left for a user to fix at this point.

pub mod error;

pub use error::{GenError, GenResult};

use orangec_par::{AstId, AstKind, AstTree, Payload, SymId, SymKind, SymbolTree};
use orangec_util::Symbol;
use std::fmt::Write as _;

#[derive(Default)]
struct Collected {
    enums: Vec<SymId>,
    structs: Vec<SymId>,
    globals: Vec<SymId>,
    functions: Vec<SymId>,
    start: Option<SymId>,
}

/// Discovery-order walk (spec.md §4.5): recurses through Program/Module
/// nesting only, since enums/structs/globals/functions are all declared
/// directly inside a module.
fn collect(tree: &SymbolTree) -> Collected {
    let mut out = Collected::default();
    walk(tree, tree.root, &mut out);
    out
}

fn walk(tree: &SymbolTree, id: SymId, out: &mut Collected) {
    let is_module = tree.get(id).kind == SymKind::Module;
    let children: Vec<SymId> = tree.get(id).children.values().copied().collect();
    for child in children {
        match tree.get(child).kind {
            SymKind::Module => walk(tree, child, out),
            SymKind::Enum => out.enums.push(child),
            SymKind::Struct => out.structs.push(child),
            SymKind::Variable if is_module => out.globals.push(child),
            SymKind::Function if tree.get(child).code.is_some() => {
                if tree.get(child).name.as_str() == "start" {
                    out.start = Some(child);
                }
                out.functions.push(child);
            }
            _ => {}
        }
    }
}

/// Renders the whole program as one JavaScript source string.
pub fn generate(tree: &SymbolTree) -> GenResult<String> {
    let collected = collect(tree);
    let mut out = String::new();
    out.push_str("// generated by orangec — do not edit\n");

    for &id in &collected.enums {
        emit_enum(tree, id, &mut out);
    }
    for &id in &collected.structs {
        emit_struct(tree, id, &mut out);
    }
    for &id in &collected.globals {
        emit_global(tree, id, &mut out)?;
    }
    for &id in &collected.functions {
        emit_function(tree, id, &mut out)?;
    }
    if let Some(start) = collected.start {
        let _ = write!(out, "{}();", tree.emitted_name(start));
    }
    Ok(out)
}

fn emit_enum(tree: &SymbolTree, id: SymId, out: &mut String) {
    let _ = write!(out, "let {}={{", tree.emitted_name(id));
    for (i, name) in tree.get(id).children.keys().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}:{}", name.as_str(), i);
    }
    out.push_str("};\n");
}

fn emit_struct(tree: &SymbolTree, id: SymId, out: &mut String) {
    let fields: Vec<Symbol> = tree.get(id).children.keys().copied().collect();
    let _ = write!(out, "class {} {{ constructor(", tree.emitted_name(id));
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(field.as_str());
    }
    out.push_str("){");
    for field in &fields {
        let text = field.as_str();
        let _ = write!(out, "this.{}={};", text, text);
    }
    out.push_str("} }\n");
}

fn emit_global(tree: &SymbolTree, id: SymId, out: &mut String) -> GenResult<()> {
    match &tree.get(id).code {
        Some(init) => {
            let root = init
                .root
                .ok_or_else(|| GenError::new("global initializer AST has no root", tree.get(id).span))?;
            let mut rendered = String::new();
            emit_expr(tree, init, root, &mut rendered)?;
            let _ = write!(out, "let {}={};\n", tree.emitted_name(id), rendered);
        }
        None => {
            let _ = write!(out, "let {};\n", tree.emitted_name(id));
        }
    }
    Ok(())
}

fn emit_function(tree: &SymbolTree, id: SymId, out: &mut String) -> GenResult<()> {
    let params: Vec<SymId> = tree
        .get(id)
        .children
        .values()
        .copied()
        .filter(|&c| !tree.get(c).name.as_str().starts_with("_block"))
        .collect();
    let _ = write!(out, "function {}(", tree.emitted_name(id));
    for (i, &p) in params.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(tree.get(p).name.as_str());
    }
    out.push_str("){");
    let body = tree
        .get(id)
        .code
        .as_ref()
        .ok_or_else(|| GenError::new("function reached the generator with no body", tree.get(id).span))?;
    let root = body
        .root
        .ok_or_else(|| GenError::new("function body AST has no root", tree.get(id).span))?;
    emit_stmt(tree, body, root, out)?;
    out.push_str("}\n");
    Ok(())
}

fn sym_payload(ast: &AstTree, id: AstId) -> Symbol {
    match &ast.get(id).payload {
        Payload::Sym(s) => *s,
        _ => unreachable!("this node kind always carries a Symbol payload"),
    }
}

fn emit_stmt(tree: &SymbolTree, ast: &AstTree, id: AstId, out: &mut String) -> GenResult<()> {
    let node = ast.get(id);
    match node.kind {
        AstKind::Block => {
            let children = node.children.clone();
            for child in children {
                emit_stmt(tree, ast, child, out)?;
            }
            Ok(())
        }
        AstKind::If => {
            let cond = node.children[0];
            let then_branch = node.children[1];
            out.push_str("if(");
            emit_expr(tree, ast, cond, out)?;
            out.push_str("){");
            emit_stmt(tree, ast, then_branch, out)?;
            out.push('}');
            Ok(())
        }
        AstKind::IfElse => {
            let (cond, then_branch, else_branch) = (node.children[0], node.children[1], node.children[2]);
            out.push_str("if(");
            emit_expr(tree, ast, cond, out)?;
            out.push_str("){");
            emit_stmt(tree, ast, then_branch, out)?;
            out.push_str("}else{");
            emit_stmt(tree, ast, else_branch, out)?;
            out.push('}');
            Ok(())
        }
        AstKind::While => {
            let (cond, body) = (node.children[0], node.children[1]);
            out.push_str("while(");
            emit_expr(tree, ast, cond, out)?;
            out.push_str("){");
            emit_stmt(tree, ast, body, out)?;
            out.push('}');
            Ok(())
        }
        AstKind::Return => {
            let value = node.children[0];
            if ast.get(value).kind == AstKind::Nop {
                out.push_str("return;");
            } else {
                out.push_str("return ");
                emit_expr(tree, ast, value, out)?;
                out.push(';');
            }
            Ok(())
        }
        AstKind::SymbolDefine => {
            let sym = sym_payload(ast, id);
            let scope = node.scope.expect("SymbolDefine is always parsed inside a scope");
            let var_id = tree
                .scoped_lookup(scope, sym)
                .ok_or_else(|| GenError::new(format!("unresolved local '{}'", sym.as_str()), node.span))?;
            match &tree.get(var_id).code {
                Some(init) => {
                    let root = init
                        .root
                        .ok_or_else(|| GenError::new("local initializer AST has no root", node.span))?;
                    let mut rendered = String::new();
                    emit_expr(tree, init, root, &mut rendered)?;
                    let _ = write!(out, "let {}={};", tree.emitted_name(var_id), rendered);
                }
                None => {
                    let _ = write!(out, "let {};", tree.emitted_name(var_id));
                }
            }
            Ok(())
        }
        _ => {
            emit_expr(tree, ast, id, out)?;
            out.push(';');
            Ok(())
        }
    }
}

fn emit_binary(tree: &SymbolTree, ast: &AstTree, op: &str, id: AstId, out: &mut String) -> GenResult<()> {
    let node = ast.get(id);
    let (right, left) = (node.children[0], node.children[1]);
    emit_expr(tree, ast, right, out)?;
    out.push_str(op);
    emit_expr(tree, ast, left, out)?;
    Ok(())
}

/// Expression emission (spec.md §4.5 "Expression emission").
fn emit_expr(tree: &SymbolTree, ast: &AstTree, id: AstId, out: &mut String) -> GenResult<()> {
    let node = ast.get(id);
    let span = node.span;
    match node.kind {
        AstKind::IntLiteral => {
            let _ = match &node.payload {
                Payload::Int(n) => write!(out, "{}", n),
                _ => unreachable!("IntLiteral always carries Payload::Int"),
            };
            Ok(())
        }
        AstKind::RealLiteral => {
            let _ = match &node.payload {
                Payload::Float(f) => write!(out, "{}", f),
                _ => unreachable!("RealLiteral always carries Payload::Float"),
            };
            Ok(())
        }
        AstKind::CharLiteral => {
            if let Payload::Str(s) = &node.payload {
                let _ = write!(out, "'{}'", s);
            }
            Ok(())
        }
        AstKind::StringLiteral => {
            if let Payload::Str(s) = &node.payload {
                let _ = write!(out, "\"{}\"", s);
            }
            Ok(())
        }
        AstKind::True => {
            out.push_str("true");
            Ok(())
        }
        AstKind::False => {
            out.push_str("false");
            Ok(())
        }
        AstKind::Null => {
            out.push_str("null");
            Ok(())
        }
        AstKind::Nop => Ok(()),

        AstKind::Var => {
            let sym = sym_payload(ast, id);
            let scope = node.scope.expect("every Var is parsed inside a scope");
            match tree.scoped_lookup(scope, sym) {
                Some(target) => out.push_str(&tree.emitted_name(target)),
                None => out.push_str(sym.as_str()),
            }
            Ok(())
        }

        AstKind::Add => emit_binary(tree, ast, "+", id, out),
        AstKind::Sub => emit_binary(tree, ast, "-", id, out),
        AstKind::Mul => emit_binary(tree, ast, "*", id, out),
        AstKind::Div => emit_binary(tree, ast, "/", id, out),
        AstKind::And => emit_binary(tree, ast, "&&", id, out),
        AstKind::Or => emit_binary(tree, ast, "||", id, out),
        AstKind::Is => emit_binary(tree, ast, "===", id, out),
        AstKind::Isnt => emit_binary(tree, ast, "!==", id, out),
        AstKind::Greater => emit_binary(tree, ast, ">", id, out),
        AstKind::Lesser => emit_binary(tree, ast, "<", id, out),
        AstKind::GreaterEqual => emit_binary(tree, ast, ">=", id, out),
        AstKind::LesserEqual => emit_binary(tree, ast, "<=", id, out),
        AstKind::Assign => emit_binary(tree, ast, "=", id, out),

        AstKind::Dot => {
            let (field_id, base_id) = (node.children[0], node.children[1]);
            emit_expr(tree, ast, base_id, out)?;
            out.push('.');
            out.push_str(sym_payload(ast, field_id).as_str());
            Ok(())
        }

        AstKind::Index => {
            let (index_id, base_id) = (node.children[0], node.children[1]);
            emit_expr(tree, ast, base_id, out)?;
            out.push('[');
            emit_expr(tree, ast, index_id, out)?;
            out.push(']');
            Ok(())
        }

        AstKind::ModuleAccess => {
            let (member_id, module_id) = (node.children[0], node.children[1]);
            let module_name = sym_payload(ast, module_id);
            let scope = node.scope.expect("every ModuleAccess is parsed inside a scope");
            match ast.get(member_id).kind {
                AstKind::Call => emit_call(tree, ast, member_id, Some(module_name), scope, out),
                AstKind::Var => {
                    let member_name = sym_payload(ast, member_id);
                    let target = tree
                        .explicit_lookup(module_name, member_name, scope)
                        .map_err(|detail| GenError::new(detail, span))?;
                    out.push_str(&tree.emitted_name(target));
                    Ok(())
                }
                other => Err(GenError::new(format!("unsupported ModuleAccess right-hand kind {:?}", other), span)),
            }
        }

        AstKind::Cast => emit_expr(tree, ast, node.children[0], out),

        AstKind::New => {
            let operand = node.children[0];
            match ast.get(operand).kind {
                // Allocation form (`new int[5]`): the size is the literal
                // under the Index's index child; rendered as `new Array(n)`.
                AstKind::Index => {
                    let size_id = ast.get(operand).children[0];
                    let size = match &ast.get(size_id).payload {
                        Payload::Int(n) => *n,
                        _ => {
                            return Err(GenError::new(
                                "array allocation size must be a literal integer",
                                span,
                            ))
                        }
                    };
                    let _ = write!(out, "new Array({})", size);
                    Ok(())
                }
                // Array literal form (`new int array(1, 2, 3)`): renders as
                // a bare JS array literal, which never takes `new`.
                AstKind::Call if sym_payload(ast, operand).as_str().ends_with(" array") => {
                    emit_expr(tree, ast, operand, out)
                }
                _ => {
                    out.push_str("new ");
                    emit_expr(tree, ast, operand, out)
                }
            }
        }

        AstKind::Free => Ok(()),

        AstKind::Call => {
            let scope = node.scope.expect("every Call is parsed inside a scope");
            emit_call(tree, ast, id, None, scope, out)
        }

        AstKind::Verbatim => {
            for &child in &node.children {
                if let AstKind::StringLiteral = ast.get(child).kind {
                    if let Payload::Str(s) = &ast.get(child).payload {
                        out.push_str(s);
                    }
                } else {
                    emit_expr(tree, ast, child, out)?;
                }
            }
            Ok(())
        }

        AstKind::Block | AstKind::If | AstKind::IfElse | AstKind::While | AstKind::Return | AstKind::SymbolDefine => {
            Err(GenError::new("statement kind reached expression emission", span))
        }
    }
}

/// Shared by a plain `Call` and the `Call` on the right of a `ModuleAccess`
/// (spec.md's scope-rebinding note applies only to validation — by
/// generation time the callee is just resolved by name, either in the
/// enclosing scope or, for a qualified call, via `explicit_lookup`).
fn emit_call(
    tree: &SymbolTree,
    ast: &AstTree,
    id: AstId,
    module_name: Option<Symbol>,
    scope: SymId,
    out: &mut String,
) -> GenResult<()> {
    let node = ast.get(id);
    let span = node.span;
    let name_sym = sym_payload(ast, id);
    let name = name_sym.as_str();

    if name.ends_with(" array") {
        out.push('[');
        for (i, &arg) in node.children.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            emit_expr(tree, ast, arg, out)?;
        }
        out.push(']');
        return Ok(());
    }

    let target = match module_name {
        Some(module) => tree
            .explicit_lookup(module, name_sym, scope)
            .map_err(|detail| GenError::new(detail, span))?,
        None => tree
            .scoped_lookup(scope, name_sym)
            .ok_or_else(|| GenError::new(format!("unresolved call target '{}'", name), span))?,
    };

    let args = node.children.clone();
    let _ = write!(out, "{}(", tree.emitted_name(target));
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        emit_expr(tree, ast, *arg, out)?;
    }
    out.push(')');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use orangec_sem::validate;

    fn emit(source: &str) -> String {
        let tokens = orangec_lex::lex(source, orangec_util::FileId(0));
        let mut tree = orangec_par::parse(tokens).unwrap();
        validate(&mut tree).expect("source should validate");
        generate(&tree).expect("validated tree should generate")
    }

    fn start_id(source: &str) -> SymId {
        let tokens = orangec_lex::lex(source, orangec_util::FileId(0));
        let mut tree = orangec_par::parse(tokens).unwrap();
        validate(&mut tree).unwrap();
        collect(&tree).start.unwrap()
    }

    #[test]
    fn simple_arithmetic_emits_and_calls_start() {
        let source = "Main { void start() { int x; x = 1 + 2 * 3; } }";
        let js = emit(source);
        let sid = start_id(source);
        let sid_name = format!("_{}", orangec_util::base36::encode(sid.0 as u64));
        assert!(js.contains(&format!("function {}(){{", sid_name)));
        assert!(js.contains("let _"));
        assert!(js.trim_end().ends_with(&format!("{}();", sid_name)));
    }

    #[test]
    fn empty_start_function_generates_empty_body_and_trailing_call() {
        let source = "Main { void start() { } }";
        let js = emit(source);
        let sid = start_id(source);
        let sid_name = format!("_{}", orangec_util::base36::encode(sid.0 as u64));
        assert!(js.contains(&format!("function {}(){{}}", sid_name)));
        assert!(js.trim_end().ends_with(&format!("{}();", sid_name)));
    }

    #[test]
    fn struct_emits_as_a_class_with_a_field_constructor() {
        let js = emit("Main { struct Pt(int x, int y) void start() { Pt p; p = new Pt(1, 2); } }");
        assert!(js.contains("class _"));
        assert!(js.contains("constructor(x,y){this.x=x;this.y=y;}"));
        assert!(js.contains("new _"));
    }

    #[test]
    fn enum_emits_as_an_ordinal_object_literal() {
        let js = emit("Main { enum Color(Red, Green, Blue) void start() { } }");
        assert!(js.contains("let _"));
        assert!(js.contains("Red:0"));
        assert!(js.contains("Green:1"));
        assert!(js.contains("Blue:2"));
    }

    #[test]
    fn array_literal_under_new_renders_as_a_bracket_literal() {
        let js = emit("Main { void start() { int[] a; a = new int[](1, 2, 3); } }");
        assert!(js.contains("=[1,2,3];"));
        assert!(!js.contains("new [1"));
    }

    #[test]
    fn array_allocation_renders_as_new_array_call() {
        let js = emit("Main { void start() { int[] a; a = new int[5]; } }");
        assert!(js.contains("new Array(5)"));
    }

    #[test]
    fn if_else_and_while_emit_braced_js_control_flow() {
        let js = emit(
            "Main { void start() { int x; x = 0; if (x is 0) { x = 1; } else { x = 2; } while (x is 0) { x = 1; } } }",
        );
        assert!(js.contains("if("));
        assert!(js.contains("}else{"));
        assert!(js.contains("while("));
    }

    #[test]
    fn qualified_module_access_resolves_to_the_target_function() {
        let js = emit("A { int f() { return 1; } } Main { void start() { int x; x = A:f(); } } ");
        assert!(js.contains("let _"));
        let calls_a_f = js.matches('(').count() >= 2;
        assert!(calls_a_f);
    }
}
