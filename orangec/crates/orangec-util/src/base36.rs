//! Base-36 rendering for symbol ids.
//!
//! The generator renames every user symbol to `_<id>` and the validator
//! rewrites user type names to `<name>#<id>` (spec.md §3.2, §3.4). Both use
//! the same base-36 digit alphabet (`0-9a-z`) so ids stay short in the
//! emitted JavaScript without colliding with the `_` JS allows in
//! identifiers.

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Render `n` as a base-36 string. `encode(0) == "0"`.
pub fn encode(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).expect("base36 alphabet is ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_zero() {
        assert_eq!(encode(0), "0");
    }

    #[test]
    fn small_values_match_ascii_digits() {
        assert_eq!(encode(9), "9");
        assert_eq!(encode(35), "z");
        assert_eq!(encode(36), "10");
    }

    #[test]
    fn monotonic_ids_produce_distinct_strings() {
        let rendered: Vec<String> = (0..100).map(encode).collect();
        let mut sorted = rendered.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), rendered.len());
    }
}
