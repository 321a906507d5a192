//! Semantic errors (spec.md §7: "unknown type, unknown symbol, unknown
//! struct field, value-type mismatch, duplicate name, too many/too few
//! arguments, private/static access violation, assignment to constant,
//! assignment to non-location, missing `start`").

use orangec_util::{DiagnosticCode, Span};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SemaError {
    #[error("unknown type '{name}'")]
    UnknownType { name: String, span: Span },

    #[error("unknown symbol '{name}'")]
    UnknownSymbol { name: String, span: Span },

    #[error("'{ty}' has no field '{field}'")]
    UnknownField { ty: String, field: String, span: Span },

    #[error("expected type '{expected}', found '{actual}'")]
    TypeMismatch {
        expected: String,
        actual: String,
        span: Span,
    },

    #[error("'{name}' expects {expected} argument(s), found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("access violation: {detail}")]
    AccessViolation { detail: String, span: Span },

    #[error("cannot assign to constant '{name}'")]
    AssignConstant { name: String, span: Span },

    #[error("left-hand side of assignment is not a location")]
    AssignNonLocation { span: Span },

    #[error("no 'start' function found")]
    MissingStart,

    #[error("'{name}' is used before it is declared")]
    NotDeclared { name: String, span: Span },
}

impl SemaError {
    pub fn span(&self) -> Span {
        match self {
            SemaError::UnknownType { span, .. }
            | SemaError::UnknownSymbol { span, .. }
            | SemaError::UnknownField { span, .. }
            | SemaError::TypeMismatch { span, .. }
            | SemaError::ArityMismatch { span, .. }
            | SemaError::AccessViolation { span, .. }
            | SemaError::AssignConstant { span, .. }
            | SemaError::AssignNonLocation { span }
            | SemaError::NotDeclared { span, .. } => *span,
            SemaError::MissingStart => Span::DUMMY,
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self {
            SemaError::UnknownType { .. } => DiagnosticCode::E_SEMA_UNKNOWN_TYPE,
            SemaError::UnknownSymbol { .. } => DiagnosticCode::E_SEMA_UNKNOWN_SYMBOL,
            SemaError::UnknownField { .. } => DiagnosticCode::E_SEMA_UNKNOWN_FIELD,
            SemaError::TypeMismatch { .. } => DiagnosticCode::E_SEMA_TYPE_MISMATCH,
            SemaError::ArityMismatch { .. } => DiagnosticCode::E_SEMA_ARITY_MISMATCH,
            SemaError::AccessViolation { .. } => DiagnosticCode::E_SEMA_ACCESS_VIOLATION,
            SemaError::AssignConstant { .. } => DiagnosticCode::E_SEMA_ASSIGN_CONSTANT,
            SemaError::AssignNonLocation { .. } => DiagnosticCode::E_SEMA_ASSIGN_NON_LOCATION,
            SemaError::MissingStart => DiagnosticCode::E_SEMA_MISSING_START,
            SemaError::NotDeclared { .. } => DiagnosticCode::E_SEMA_NOT_DECLARED,
        }
    }
}

pub type SemaResult<T> = Result<T, SemaError>;
