//! Parameter list reconstruction.
//!
//! Parameters come either from the `Parameters` metadata field (a full
//! signature such as `(x:long, y:string = "a")`) or, when that field is
//! empty, from a best-effort scan of the function body. Neither path is a
//! tokenizing parser: the body scan stops at the first `)` and will
//! mis-fire on parenthesized defaults, which is the expected behavior.

use crate::reporter::Reporter;
use regex::Regex;
use std::sync::OnceLock;

fn leading_comments() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^(\s*//.*\n)*\s*").expect("Invalid leading comment pattern")
    })
}

fn first_group() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^\s*[^(]*\(([^)]*)\)").expect("Invalid parenthesized group pattern")
    })
}

fn comma_spacing() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s*,\s*").expect("Invalid comma pattern"))
}

fn whitespace_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace pattern"))
}

/// Extracts the parameter list from a `Parameters` field.
///
/// Returns the text between the first `(` and its matching `)`, tracking
/// nesting depth so that nested type expressions and defaults survive.
/// A field without `(` is assumed to already be a bare list. An unclosed
/// list yields everything after the opening parenthesis.
///
/// ```rust
/// use kqlexport_core::reconstruct::parse_parameters_field;
///
/// let params = parse_parameters_field("foo(a: string, b: long = tolong('(x)'))");
/// assert_eq!(params, "a: string, b: long = tolong('(x)')");
/// ```
pub fn parse_parameters_field(field: &str) -> String {
    let Some(start) = field.find('(') else {
        return field.trim().to_string();
    };

    let mut depth = 0usize;
    for (offset, ch) in field[start..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return field[start + 1..start + offset].trim().to_string();
                }
            }
            _ => {}
        }
    }

    field[start + 1..].trim().to_string()
}

/// Recovers the parameter list from the function body.
///
/// Leading comment lines and indentation are removed first. The function
/// name followed by a parenthesized group is preferred; failing that, the
/// first parenthesized group at the start of a line is used; failing that,
/// the list is empty.
pub fn extract_signature_from_body(body: &str, name: &str, reporter: &dyn Reporter) -> String {
    let cleaned = leading_comments().replace_all(body, "");

    let named = format!(r"{}\s*\(([^)]*)\)", regex::escape(name));
    match Regex::new(&named) {
        Ok(pattern) => {
            if let Some(params) = pattern.captures(&cleaned).and_then(|caps| caps.get(1)) {
                return params.as_str().trim().to_string();
            }
            reporter.detail(&format!(
                "'{}' is not followed by a parameter list in the body, trying the first parenthesized group",
                name
            ));
        }
        Err(e) => {
            reporter.warning(&format!("Cannot search body for '{}': {}", name, e));
        }
    }

    if let Some(params) = first_group().captures(&cleaned).and_then(|caps| caps.get(1)) {
        return params.as_str().trim().to_string();
    }

    reporter.detail("No parenthesized group found in body, using an empty parameter list");
    String::new()
}

/// Collapses whitespace and removes the spacing around commas.
///
/// ```rust
/// use kqlexport_core::reconstruct::normalize_parameters;
///
/// assert_eq!(normalize_parameters("  x:long ,\n   y:string "), "x:long,y:string");
/// ```
pub fn normalize_parameters(params: &str) -> String {
    let trimmed = params.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let commas = comma_spacing().replace_all(trimmed, ",");
    whitespace_run().replace_all(&commas, " ").into_owned()
}

/// Resolves the final, normalized parameter list for a function.
///
/// Never fails: every extraction problem degrades through the fallback
/// chain down to an empty list.
pub fn reconstruct_parameters(
    parameters_field: Option<&str>,
    body: &str,
    name: &str,
    reporter: &dyn Reporter,
) -> String {
    let raw = match parameters_field.filter(|field| !field.is_empty()) {
        Some(field) => {
            let parsed = parse_parameters_field(field);
            reporter.detail(&format!("Found Parameters field: {}", field));
            reporter.detail(&format!("Parsed parameters: {}", parsed));
            parsed
        }
        None => {
            reporter.detail("No Parameters field found, extracting from body...");
            let extracted = extract_signature_from_body(body, name, reporter);
            reporter.detail(&format!("Extracted from body: {}", extracted));
            extracted
        }
    };

    normalize_parameters(&raw)
}
