use thiserror::Error;

const ACTION_OPEN: &str = "{{";
const ACTION_CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error(
        "template references unknown field '{name}' at offset {offset} (available fields: Team, Account)"
    )]
    UnknownField { name: String, offset: usize },

    #[error("template syntax error at offset {offset}: {reason}")]
    Syntax { offset: usize, reason: String },
}

/// Location of a team account's credentials in the secret store.
///
/// Holds borrowed inputs only; the path is computed on every call to
/// [`SecretPath::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretPath<'a> {
    team: &'a str,
    account: &'a str,
    template: &'a str,
}

impl<'a> SecretPath<'a> {
    pub fn new(team: &'a str, account: &'a str, template: &'a str) -> Self {
        Self {
            team,
            account,
            template,
        }
    }

    /// Render the template, substituting `{{.Team}}` and `{{.Account}}`.
    ///
    /// The whole template is parsed before any output is produced, so an
    /// error never comes with a partially rendered path.
    pub fn render(&self) -> Result<String, TemplateError> {
        let segments = parse(self.template)?;

        let mut path = String::with_capacity(self.template.len());
        for segment in segments {
            match segment {
                Segment::Text(text) => path.push_str(text),
                Segment::Field(Field::Team) => path.push_str(self.team),
                Segment::Field(Field::Account) => path.push_str(self.account),
            }
        }

        Ok(path)
    }
}

/// Check a template without rendering it
pub fn validate_template(template: &str) -> Result<(), TemplateError> {
    parse(template).map(|_| ())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Team,
    Account,
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'t> {
    Text(&'t str),
    Field(Field),
}

fn parse(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut segments = Vec::new();
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find(ACTION_OPEN) {
        if start > 0 {
            segments.push(Segment::Text(&rest[..start]));
        }

        let action_offset = offset + start;
        let body_start = start + ACTION_OPEN.len();
        let body_len = rest[body_start..]
            .find(ACTION_CLOSE)
            .ok_or_else(|| TemplateError::Syntax {
                offset: action_offset,
                reason: "unclosed action".to_string(),
            })?;

        let body = &rest[body_start..body_start + body_len];
        segments.push(Segment::Field(parse_action(body, action_offset)?));

        let consumed = body_start + body_len + ACTION_CLOSE.len();
        rest = &rest[consumed..];
        offset += consumed;
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }

    Ok(segments)
}

fn parse_action(body: &str, offset: usize) -> Result<Field, TemplateError> {
    let action = body.trim();
    if action.is_empty() {
        return Err(TemplateError::Syntax {
            offset,
            reason: "empty action".to_string(),
        });
    }

    let name = action
        .strip_prefix('.')
        .ok_or_else(|| TemplateError::Syntax {
            offset,
            reason: format!("expected a field reference like .Team, found '{action}'"),
        })?;

    if !is_identifier(name) {
        return Err(TemplateError::Syntax {
            offset,
            reason: format!("invalid field name '{name}'"),
        });
    }

    match name {
        "Team" => Ok(Field::Team),
        "Account" => Ok(Field::Account),
        _ => Err(TemplateError::UnknownField {
            name: name.to_string(),
            offset,
        }),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "/concourse/{{.Team}}/{{.Account}}";

    #[test]
    fn test_render_team_and_account() {
        let path = SecretPath::new("TEAM", "ACCOUNT", TEMPLATE).render().unwrap();
        assert_eq!(path, "/concourse/TEAM/ACCOUNT");
    }

    #[test]
    fn test_render_fails_on_extra_field() {
        let result =
            SecretPath::new("TEAM", "ACCOUNT", "/concourse/{{.Team}}/{{.Account}}/{{.Something}}")
                .render();

        assert_eq!(
            result,
            Err(TemplateError::UnknownField {
                name: "Something".to_string(),
                offset: 34,
            })
        );
    }

    #[test]
    fn test_render_without_placeholders() {
        let path = SecretPath::new("a", "b", "/static/path/").render().unwrap();
        assert_eq!(path, "/static/path/");

        let path = SecretPath::new("a", "b", "").render().unwrap();
        assert_eq!(path, "");
    }

    #[test]
    fn test_render_repeated_and_adjacent_fields() {
        let path = SecretPath::new("t", "a", "{{.Team}}{{.Account}}-{{.Team}}")
            .render()
            .unwrap();
        assert_eq!(path, "ta-t");
    }

    #[test]
    fn test_render_allows_whitespace_in_action() {
        let path = SecretPath::new("t", "a", "/x/{{ .Team }}/{{   .Account}}")
            .render()
            .unwrap();
        assert_eq!(path, "/x/t/a");
    }

    #[test]
    fn test_render_is_verbatim() {
        let path = SecretPath::new("my team/", "../acct", "//{{.Team}}//{{.Account}}/")
            .render()
            .unwrap();
        assert_eq!(path, "//my team///../acct/");
    }

    #[test]
    fn test_stray_close_is_literal() {
        let path = SecretPath::new("t", "a", "a}}b/{{.Team}}}").render().unwrap();
        assert_eq!(path, "a}}b/t}");
    }

    #[test]
    fn test_field_names_are_case_sensitive() {
        let err = SecretPath::new("t", "a", "{{.team}}").render().unwrap_err();
        assert!(matches!(err, TemplateError::UnknownField { ref name, .. } if name == "team"));
    }

    #[test]
    fn test_syntax_errors() {
        let cases = [
            ("/x/{{.Team", 3, "unclosed action"),
            ("{{}}", 0, "empty action"),
            ("a{{  }}", 1, "empty action"),
            ("{{Team}}", 0, "expected a field reference"),
            ("{{.}}", 0, "invalid field name"),
            ("{{.Team.Name}}", 0, "invalid field name"),
            ("{{.1abc}}", 0, "invalid field name"),
        ];

        for (template, expected_offset, expected_reason) in cases {
            match SecretPath::new("t", "a", template).render() {
                Err(TemplateError::Syntax { offset, reason }) => {
                    assert_eq!(offset, expected_offset, "offset for {template:?}");
                    assert!(
                        reason.contains(expected_reason),
                        "reason for {template:?} was {reason:?}"
                    );
                }
                other => panic!("expected syntax error for {template:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_error_messages() {
        let err = SecretPath::new("t", "a", "{{.Other}}").render().unwrap_err();
        assert_eq!(
            err.to_string(),
            "template references unknown field 'Other' at offset 0 (available fields: Team, Account)"
        );

        let err = SecretPath::new("t", "a", "{{.Team").render().unwrap_err();
        assert_eq!(
            err.to_string(),
            "template syntax error at offset 0: unclosed action"
        );
    }

    #[test]
    fn test_validate_template() {
        assert!(validate_template(TEMPLATE).is_ok());
        assert!(validate_template("/plain").is_ok());
        assert!(validate_template("{{.Nope}}").is_err());
        assert!(validate_template("{{.Team").is_err());
    }
}
