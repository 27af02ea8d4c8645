//! `{{name}}` placeholder rendering.

use crate::core::error::DomainError;

/// Placeholder the model uses for the target base URL.
pub const API_URL_PLACEHOLDER: &str = "API_URL";
/// Placeholder the model uses for the credential.
pub const API_KEY_PLACEHOLDER: &str = "API_KEY";

/// Substitute `{{ name }}` tokens in `template`.
///
/// The innermost `{{ ... }}` pair wins, so `{{{API_URL}}}` renders as
/// `{<url>}`. Whitespace inside the braces is ignored. Tokens whose name is
/// not in `vars` are kept verbatim, so a prompt can carry placeholders meant
/// for a later stage, and stray braces (JSON bodies) pass through unchanged.
/// Substituted values are not scanned again.
///
/// A known name opened with `{{` but never closed is an error.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> Result<String, DomainError> {
    check_unterminated(template, vars)?;

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(close) = rest.find("}}") {
        match rest[..close].rfind("{{") {
            Some(open) => {
                out.push_str(&rest[..open]);
                let name = rest[open + 2..close].trim();
                match lookup(vars, name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[open..close + 2]),
                }
            }
            None => out.push_str(&rest[..close + 2]),
        }
        rest = &rest[close + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

fn lookup<'a>(vars: &[(&str, &'a str)], name: &str) -> Option<&'a str> {
    vars.iter().find(|(key, _)| *key == name).map(|(_, value)| *value)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Reject `{{ KNOWN` that is not followed by `}}`.
fn check_unterminated(template: &str, vars: &[(&str, &str)]) -> Result<(), DomainError> {
    for (pos, _) in template.match_indices("{{") {
        let after = template[pos + 2..].trim_start();
        for (name, _) in vars {
            let Some(tail) = after.strip_prefix(name) else {
                continue;
            };
            if tail.starts_with(is_name_char) {
                continue;
            }
            if !tail.trim_start().starts_with("}}") {
                return Err(DomainError::TemplateRender(format!(
                    "unterminated placeholder at `{}`",
                    crate::util::truncate_str(&template[pos..], 40)
                )));
            }
        }
    }
    Ok(())
}

/// Render a proposed command against the target URL and credential.
pub fn render_command(command: &str, api_url: &str, api_key: &str) -> Result<String, DomainError> {
    render_template(
        command,
        &[(API_URL_PLACEHOLDER, api_url), (API_KEY_PLACEHOLDER, api_key)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_command() {
        let rendered = render_command(
            "curl -H 'Authorization: Bearer {{API_KEY}}' {{API_URL}}/users",
            "https://api.example.com",
            "secret",
        )
        .unwrap();
        assert_eq!(
            rendered,
            "curl -H 'Authorization: Bearer secret' https://api.example.com/users"
        );
    }

    #[test]
    fn test_render_tolerates_inner_whitespace() {
        let rendered = render_command("curl {{ API_URL }}/a", "http://h", "").unwrap();
        assert_eq!(rendered, "curl http://h/a");
    }

    #[test]
    fn test_render_is_deterministic() {
        let cmd = "curl -X POST {{API_URL}}/items -H 'x-api-key: {{API_KEY}}' -d '{}'";
        let first = render_command(cmd, "http://localhost:3000", "k1").unwrap();
        let second = render_command(cmd, "http://localhost:3000", "k1").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        let rendered = render_command("curl {{API_URL}}/{{USER_ID}}", "http://h", "k").unwrap();
        assert_eq!(rendered, "curl http://h/{{USER_ID}}");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let rendered = render_template("{{a}}", &[("a", "{{b}}"), ("b", "nope")]).unwrap();
        assert_eq!(rendered, "{{b}}");
    }

    #[test]
    fn test_unterminated_placeholder_is_error() {
        let err = render_command("curl {{API_URL/users", "http://h", "k").unwrap_err();
        assert!(matches!(err, DomainError::TemplateRender(_)));
    }

    #[test]
    fn test_triple_braces_use_innermost_pair() {
        let rendered = render_command("echo {{{API_URL}}}", "http://h", "k").unwrap();
        assert_eq!(rendered, "echo {http://h}");
    }

    #[test]
    fn test_stray_braces_in_body_pass_through() {
        let cmd = r#"curl {{API_URL}}/q -d '{"q":"{{"}'"#;
        let rendered = render_command(cmd, "http://h", "k").unwrap();
        assert_eq!(rendered, r#"curl http://h/q -d '{"q":"{{"}'"#);
    }

    #[test]
    fn test_nested_json_before_placeholder() {
        let cmd = r#"curl -d '{"a":{"b":1}}' {{API_URL}}/items"#;
        let rendered = render_command(cmd, "http://h", "k").unwrap();
        assert_eq!(rendered, r#"curl -d '{"a":{"b":1}}' http://h/items"#);
    }

    #[test]
    fn test_longer_name_is_not_an_unterminated_known_one() {
        let rendered = render_command("curl {{API_URLS}}", "http://h", "k").unwrap();
        assert_eq!(rendered, "curl {{API_URLS}}");
    }

    #[test]
    fn test_no_placeholders() {
        assert_eq!(render_command("curl http://x", "u", "k").unwrap(), "curl http://x");
    }
}
