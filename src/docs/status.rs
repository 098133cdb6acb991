//! Status code phrases: the one-line descriptions auto-filled into `:statuscode` lines
//! and the reason phrases of example status lines.

use axum::http::StatusCode;

/// Placeholder inside a status description that is replaced by the canonical description.
pub const ORIGINAL_PLACEHOLDER: &str = "{{ original }}";

/// Canonical description for codes the service documents routinely. Other codes keep
/// whatever the descriptor author wrote, including an empty string.
pub fn canonical_description(code: u16) -> Option<&'static str> {
    Some(match code {
        200 | 201 | 204 => "no error",
        400 => "malformed request body",
        401 => "authentication required",
        403 => "permission denied",
        404 => "there is no item",
        405 => "method not allowed on this resource",
        409 => "conflict with the current state",
        413 => "request body too large",
        422 => "there is wrong type / missing field",
        500 => "internal server error",
        503 => "service unavailable",
        _ => return None,
    })
}

/// Fill an empty description and expand the placeholder, for codes with a canonical description.
pub fn describe(code: u16, description: &str) -> String {
    match canonical_description(code) {
        Some(canonical) if description.is_empty() => canonical.to_string(),
        Some(canonical) => description.replace(ORIGINAL_PLACEHOLDER, canonical),
        None => description.to_string(),
    }
}

/// Upper-cased HTTP reason phrase, e.g. `201` -> `CREATED`.
pub fn reason_phrase(code: u16) -> String {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("UNKNOWN")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_known_codes_are_filled() {
        assert_eq!(describe(200, ""), "no error");
        assert_eq!(describe(201, ""), "no error");
        assert_eq!(describe(404, "something is missing"), "something is missing");
    }

    #[test]
    fn unknown_codes_keep_what_was_written() {
        assert_eq!(describe(418, ""), "");
        assert_eq!(describe(418, "teapot"), "teapot");
        assert_eq!(describe(418, "{{ original }} / x"), "{{ original }} / x");
    }

    #[test]
    fn placeholder_expands_to_canonical_text() {
        assert_eq!(
            describe(422, "{{ original }} / customer already exists"),
            "there is wrong type / missing field / customer already exists"
        );
    }

    #[test]
    fn reason_phrases_are_upper_case() {
        assert_eq!(reason_phrase(200), "OK");
        assert_eq!(reason_phrase(201), "CREATED");
        assert_eq!(reason_phrase(404), "NOT FOUND");
        assert_eq!(reason_phrase(422), "UNPROCESSABLE ENTITY");
        assert_eq!(reason_phrase(299), "UNKNOWN");
    }
}
