//! Parse-time errors (spec.md §7: "unexpected token, unterminated
//! parameter list, missing block after control keyword, operator stack
//! corruption").

use orangec_util::{DiagnosticCode, Span};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected token '{found}'")]
    UnexpectedToken { found: String, span: Span },

    #[error("unterminated parameter list")]
    UnterminatedParams { span: Span },

    #[error("expected a block after '{keyword}'")]
    ExpectedBlock { keyword: String, span: Span },

    #[error("duplicate parameter name '{name}'")]
    DuplicateParam { name: String, span: Span },

    #[error("duplicate name '{name}' in this scope")]
    DuplicateName { name: String, span: Span },

    #[error("operator stack corruption: {detail}")]
    OperatorStack { detail: String, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnterminatedParams { span }
            | ParseError::ExpectedBlock { span, .. }
            | ParseError::DuplicateParam { span, .. }
            | ParseError::DuplicateName { span, .. }
            | ParseError::OperatorStack { span, .. } => *span,
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self {
            ParseError::UnexpectedToken { .. } => DiagnosticCode::E_PARSE_UNEXPECTED_TOKEN,
            ParseError::UnterminatedParams { .. } => DiagnosticCode::E_PARSE_UNTERMINATED_PARAMS,
            ParseError::ExpectedBlock { .. } => DiagnosticCode::E_PARSE_EXPECTED_BLOCK,
            ParseError::DuplicateParam { .. } => DiagnosticCode::E_PARSE_DUPLICATE_PARAM,
            ParseError::DuplicateName { .. } => DiagnosticCode::E_PARSE_DUPLICATE_NAME,
            ParseError::OperatorStack { .. } => DiagnosticCode::E_PARSE_OPERATOR_STACK,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
