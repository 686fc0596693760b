// src/inspect/login.rs
// =============================================================================
// Guesses whether a page contains a login form.
//
// A form counts as a login form when it has:
// 1. an <input type="password">, or
// 2. an input whose name contains "password" (any case)
//
// This is only a heuristic. Login UIs built entirely in JavaScript, or forms
// that use unusual field names, are NOT detected.
// =============================================================================

use super::markup::{Form, FormInput};

/// True as soon as one form looks like a login form.
///
/// Forms are checked in document order and the search stops at the first hit.
pub fn has_login(forms: &[Form]) -> bool {
    forms.iter().any(|form| {
        form.inputs.iter().any(is_password_field) || form.inputs.iter().any(has_password_name)
    })
}

fn is_password_field(input: &FormInput) -> bool {
    input
        .kind
        .as_deref()
        .is_some_and(|kind| kind.trim().eq_ignore_ascii_case("password"))
}

fn has_password_name(input: &FormInput) -> bool {
    input
        .name
        .as_deref()
        .is_some_and(|name| name.to_lowercase().contains("password"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(kind: Option<&str>, name: Option<&str>) -> FormInput {
        FormInput {
            kind: kind.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    fn form(inputs: Vec<FormInput>) -> Form {
        Form { inputs }
    }

    #[test]
    fn test_password_type_is_login() {
        let forms = vec![form(vec![
            input(Some("text"), Some("user")),
            input(Some("PASSWORD"), Some("pwd")),
        ])];
        assert!(has_login(&forms));
    }

    #[test]
    fn test_password_name_is_login() {
        let forms = vec![form(vec![
            input(Some("text"), Some("username")),
            input(Some("text"), Some("user_Password")),
        ])];
        assert!(has_login(&forms));
    }

    #[test]
    fn test_search_form_is_not_login() {
        let forms = vec![form(vec![input(Some("search"), Some("q")), input(None, None)])];
        assert!(!has_login(&forms));
    }

    #[test]
    fn test_no_forms_is_not_login() {
        assert!(!has_login(&[]));
    }

    #[test]
    fn test_any_form_on_the_page_counts() {
        let forms = vec![
            form(vec![input(Some("search"), Some("q"))]),
            form(vec![input(Some("password"), None)]),
        ];
        assert!(has_login(&forms));
    }
}
