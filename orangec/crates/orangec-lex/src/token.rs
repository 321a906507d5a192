//! Token kinds and the [`Token`] value type (spec.md §3.1, §6.1).

use orangec_util::Symbol;

/// All token kinds the lexer can produce, plus two synthetic kinds
/// (`Call`, `Index`) the parser's expression simplifier introduces after
/// lexing — they never come out of [`crate::lex`] itself, but live on this
/// enum because the parser's postfix queue is a queue of `Token`s of mixed
/// provenance (spec.md §4.3 step 2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Delimiters
    LParen,
    RParen,
    LSquare,
    RSquare,
    LBrace,
    RBrace,

    // Punctuation
    Comma,
    Dot,
    Semicolon,
    Tilde,
    Colon,

    // Literals
    Identifier,
    IntLiteral,
    RealLiteral,
    CharLiteral,
    StringLiteral,
    True,
    False,
    Null,
    Verbatim,

    // Math
    Plus,
    Minus,
    Star,
    Slash,
    Equals,

    // Comparison
    Is,
    Isnt,
    Greater,
    Lesser,
    GreaterEqual,
    LesserEqual,

    // Boolean
    And,
    Or,

    // Type operators
    Cast,
    New,
    Free,

    // Structural keywords
    Module,
    Struct,
    Enum,

    // Modifiers
    Array,
    Static,
    Const,
    Private,

    // Control
    If,
    Else,
    While,
    Return,

    // Synthetic (never produced by the raw lexer)
    Eof,
    Call,
    Index,

    // Comment delimiters, consumed by the pre-processor (spec.md §4.2)
    LBlock,
    RBlock,
    DSlash,

    /// A character the grammar has no meaning for (a lone `&`, `|`, `!`, or
    /// any other unrecognized byte). The lexer never fails outright
    /// (spec.md §4.1); it defers to the parser, which rejects this kind the
    /// same way it rejects any other out-of-place token.
    Unknown,
}

/// A single lexical unit (spec.md §3.1). `text` holds the literal spelling
/// for identifiers/literals and is otherwise the canonical spelling of the
/// punctuation/keyword (kept for error messages).
///
/// `line` is 0-based, matching spec.md §3.1 exactly; error rendering
/// (spec.md §7) adds 1 when it builds a [`orangec_util::Span`].
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub file: orangec_util::FileId,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, file: orangec_util::FileId, line: u32) -> Self {
        Token {
            kind,
            text: text.into(),
            file,
            line,
        }
    }

    /// The interned identifier/keyword name. Only meaningful for
    /// `Identifier`-kind tokens; callers elsewhere just read `text`.
    pub fn symbol(&self) -> Symbol {
        Symbol::intern(&self.text)
    }

    /// Build an [`orangec_util::Span`] pointing at this token's source
    /// line, converting the 0-based lexer line to the 1-based line
    /// `Span`/error rendering expects.
    pub fn span(&self) -> orangec_util::Span {
        orangec_util::Span::with_file(0, 0, self.file, self.line + 1, 1)
    }
}
