//! Generator errors (spec.md §4.5: "the generator assumes a validated tree;
//! any unresolved reference at this stage is an internal error"). There is
//! exactly one variant because a validated tree never legitimately reaches
//! the generator with a dangling reference — this is the compiler's own
//! ASSERT, not a user-facing diagnostic category.

use orangec_util::{DiagnosticCode, Span};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("internal error: {detail}")]
pub struct GenError {
    pub detail: String,
    pub span: Span,
}

impl GenError {
    pub fn new(detail: impl Into<String>, span: Span) -> Self {
        GenError {
            detail: detail.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn code(&self) -> DiagnosticCode {
        DiagnosticCode::E_GEN_INTERNAL
    }
}

pub type GenResult<T> = Result<T, GenError>;
