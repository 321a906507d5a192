//! Diagnostic codes, grouped by the error categories spec.md §7 names:
//! I/O, parse, and semantic. (Lex has no codes of its own — spec.md §4.1
//! states malformed tokens surface as parse errors, not lex errors.)

/// A stable code identifying a class of diagnostic, `{prefix}{number}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DiagnosticCode {
    pub prefix: &'static str,
    pub number: u32,
}

impl DiagnosticCode {
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        DiagnosticCode { prefix, number }
    }

    pub fn as_string(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // I/O
    pub const E_IO_READ_FAILED: DiagnosticCode = DiagnosticCode::new("E", 1);
    pub const E_IO_WRITE_FAILED: DiagnosticCode = DiagnosticCode::new("E", 2);

    // Parse (spec.md §7: unexpected token, unterminated parameter list,
    // missing block after control keyword, operator stack corruption)
    pub const E_PARSE_UNEXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::new("E", 100);
    pub const E_PARSE_UNTERMINATED_PARAMS: DiagnosticCode = DiagnosticCode::new("E", 101);
    pub const E_PARSE_EXPECTED_BLOCK: DiagnosticCode = DiagnosticCode::new("E", 102);
    pub const E_PARSE_DUPLICATE_PARAM: DiagnosticCode = DiagnosticCode::new("E", 103);
    pub const E_PARSE_OPERATOR_STACK: DiagnosticCode = DiagnosticCode::new("E", 104);
    pub const E_PARSE_DUPLICATE_NAME: DiagnosticCode = DiagnosticCode::new("E", 105);

    // Semantic (spec.md §7: unknown type, unknown symbol, unknown struct
    // field, value-type mismatch, duplicate name, arity mismatch,
    // private/static access violation, assignment to constant, assignment
    // to non-location, missing `start`)
    pub const E_SEMA_UNKNOWN_TYPE: DiagnosticCode = DiagnosticCode::new("E", 200);
    pub const E_SEMA_UNKNOWN_SYMBOL: DiagnosticCode = DiagnosticCode::new("E", 201);
    pub const E_SEMA_UNKNOWN_FIELD: DiagnosticCode = DiagnosticCode::new("E", 202);
    pub const E_SEMA_TYPE_MISMATCH: DiagnosticCode = DiagnosticCode::new("E", 203);
    pub const E_SEMA_ARITY_MISMATCH: DiagnosticCode = DiagnosticCode::new("E", 204);
    pub const E_SEMA_ACCESS_VIOLATION: DiagnosticCode = DiagnosticCode::new("E", 205);
    pub const E_SEMA_ASSIGN_CONSTANT: DiagnosticCode = DiagnosticCode::new("E", 206);
    pub const E_SEMA_ASSIGN_NON_LOCATION: DiagnosticCode = DiagnosticCode::new("E", 207);
    pub const E_SEMA_MISSING_START: DiagnosticCode = DiagnosticCode::new("E", 208);
    pub const E_SEMA_NOT_DECLARED: DiagnosticCode = DiagnosticCode::new("E", 209);

    // Generator (spec.md §4.5, §7: an unresolved reference at this stage is
    // an internal invariant violation, not a user-facing diagnostic)
    pub const E_GEN_INTERNAL: DiagnosticCode = DiagnosticCode::new("E", 300);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_as_prefix_and_padded_number() {
        assert_eq!(DiagnosticCode::E_SEMA_TYPE_MISMATCH.as_string(), "E0203");
    }
}
