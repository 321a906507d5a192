//! The CLI driver: argument parsing, file I/O, multi-file orchestration,
//! and wiring the four library phases together. Everything in this crate
//! is glue — the "external collaborator" spec.md §1 keeps out of the core
//! (lex/parse/validate/generate never touch a filesystem or a process exit
//! code; this crate is the only place that does either).

use std::fmt;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use orangec_util::diagnostic::{Diagnostic, Handler};
use orangec_util::{FileId, SourceMap};

/// Returned by `run()` once a diagnostic has already been rendered to
/// stderr in spec.md §7's `file:line error: …` wire format (via `report()`).
/// `main` checks for this marker so it prints nothing further — only a
/// genuine I/O error (which never goes through `report()`) gets `main`'s
/// own bare `error: …` line.
#[derive(Debug)]
pub struct AlreadyReported;

impl fmt::Display for AlreadyReported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "")
    }
}

impl std::error::Error for AlreadyReported {}

/// `orangec <input-file>... [-o <output>] [-t <target>]` (spec.md §6.4).
#[derive(Parser, Debug)]
#[command(name = "orangec", about = "The Orange compiler")]
pub struct Cli {
    /// Source files to compile, concatenated into one program in order.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file for the generated JavaScript. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Target triple, accepted and stored but not yet used for anything
    /// (spec.md §6.4: "target currently unused beyond being stored").
    #[arg(short = 't', long = "target")]
    pub target: Option<String>,

    /// Print the token stream for each input file and stop.
    #[arg(long = "emit-tokens")]
    pub emit_tokens: bool,

    /// Print the parsed symbol tree for each input file and stop.
    #[arg(long = "emit-ast")]
    pub emit_ast: bool,
}

/// Runs the whole pipeline for one invocation. Returns `Ok(())` on success;
/// on the first diagnostic it renders the error to stderr itself (so the
/// caller only needs to translate `Err` into exit code 1) and returns `Err`.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut sources = SourceMap::new();
    let mut tokens = Vec::new();

    for path in &cli.inputs {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        let file_id = sources.add_file(path.display().to_string(), content.clone());
        let mut file_tokens = orangec_lex::lex(&content, file_id);
        // Drop every Eof but the last so the combined stream parses as one
        // program (spec.md's grammar has no notion of a compilation unit
        // boundary narrower than the whole program).
        if file_tokens.last().map(|t| t.kind) == Some(orangec_lex::TokenKind::Eof) {
            file_tokens.pop();
        }
        tokens.extend(file_tokens);
    }
    tokens.push(eof_token(&tokens));

    if cli.emit_tokens {
        for tok in &tokens {
            println!("{:?}", tok);
        }
        return Ok(());
    }

    let mut tree = match orangec_par::parse(tokens) {
        Ok(tree) => tree,
        Err(err) => return Err(report(&sources, err.span(), err.code(), &err.to_string())),
    };

    if cli.emit_ast {
        dump_symbol(&tree, tree.root, 0);
        return Ok(());
    }

    if let Err(err) = orangec_sem::validate(&mut tree) {
        return Err(report(&sources, err.span(), err.code(), &err.to_string()));
    }

    let js = match orangec_gen::generate(&tree) {
        Ok(js) => js,
        Err(err) => return Err(report(&sources, err.span(), err.code(), &err.to_string())),
    };

    match &cli.output {
        Some(path) => fs::write(path, js)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?,
        None => print!("{}", js),
    }

    Ok(())
}

/// Debug dump of a symbol tree for `--emit-ast`. The tree's own arena is
/// private, so this walks it through the public `get`/`children` API
/// rather than printing the arena directly.
fn dump_symbol(tree: &orangec_par::SymbolTree, id: orangec_par::SymId, depth: usize) {
    let node = tree.get(id);
    println!(
        "{}{:?} {} : {}",
        "  ".repeat(depth),
        node.kind,
        node.name.as_str(),
        if node.ty.is_empty() { "<none>" } else { &node.ty }
    );
    let children: Vec<orangec_par::SymId> = node.children.values().copied().collect();
    for child in children {
        dump_symbol(tree, child, depth + 1);
    }
}

fn eof_token(tokens: &[orangec_lex::Token]) -> orangec_lex::Token {
    let (file_id, line) = tokens.last().map(|t| (t.file, t.line)).unwrap_or((FileId::DUMMY, 0));
    orangec_lex::Token::new(orangec_lex::TokenKind::Eof, "", file_id, line)
}

fn report(sources: &SourceMap, span: orangec_util::Span, code: orangec_util::DiagnosticCode, message: &str) -> anyhow::Error {
    let handler = Handler::new(sources);
    let diag = Diagnostic::error(code, message.to_string(), span);
    handler.emit(&diag);
    anyhow::Error::new(AlreadyReported)
}
