//! Interpreter literals.

use playground_protocol::{OptionKind, OptionValue};

/// A value as the interpreter spells it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Str(String),
    Int(i64),
    /// A non-integer number, spelled exactly as it arrived.
    Number(String),
    Bool(bool),
}

impl Literal {
    /// Normalize an option value for an option of the given kind.
    ///
    /// Flags accept booleans and boolean-like text. Integer options accept
    /// numeric text; anything else is handed over as a string so the
    /// formatter rejects it the same way it would reject a bad file setting.
    /// Booleans given to an integer option are handed over as text too.
    pub fn for_option(kind: OptionKind, value: &OptionValue) -> Self {
        match (kind, value) {
            (_, OptionValue::Number(n)) => Self::Number(n.to_string()),
            (OptionKind::Flag, OptionValue::Bool(b)) => Self::Bool(*b),
            (OptionKind::Flag, OptionValue::Integer(n)) => Self::Bool(*n != 0),
            (OptionKind::Flag, OptionValue::String(s)) => match parse_flag(s) {
                Some(b) => Self::Bool(b),
                None => Self::Str(s.clone()),
            },
            (OptionKind::Integer, OptionValue::String(s)) => match s.trim().parse() {
                Ok(n) => Self::Int(n),
                Err(_) => Self::Str(s.clone()),
            },
            (OptionKind::Integer, OptionValue::Bool(b)) => Self::Str(b.to_string()),
            (_, OptionValue::Integer(n)) => Self::Int(*n),
            (_, OptionValue::Bool(b)) => Self::Bool(*b),
            (OptionKind::Text, OptionValue::String(s)) => Self::Str(s.clone()),
        }
    }

    /// Source text for this literal.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    pub(crate) fn render_into(&self, out: &mut String) {
        match self {
            Self::Bool(true) => out.push_str("True"),
            Self::Bool(false) => out.push_str("False"),
            Self::Int(n) => out.push_str(&n.to_string()),
            Self::Number(n) => out.push_str(n),
            Self::Str(s) => quote_into(s, out),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn quote_into(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_use_title_case() {
        assert_eq!(Literal::Bool(true).render(), "True");
        assert_eq!(Literal::Bool(false).render(), "False");
    }

    #[test]
    fn strings_escape_quotes_and_control_characters() {
        let literal = Literal::Str("a\"b\\c\nd\u{1}".into());
        assert_eq!(literal.render(), r#""a\"b\\c\nd\x01""#);
    }

    #[test]
    fn triple_quotes_cannot_break_out() {
        let literal = Literal::Str(r#"""")\nimport os"#.into());
        let rendered = literal.render();
        assert!(rendered.starts_with('"') && rendered.ends_with('"'));
        assert!(!rendered[1..rendered.len() - 1].contains(r#"""""#));
    }

    #[test]
    fn unicode_passes_through() {
        assert_eq!(Literal::Str("héllo ✓".into()).render(), "\"héllo ✓\"");
    }

    #[test]
    fn flags_normalize_boolean_like_text() {
        let kind = OptionKind::Flag;
        assert_eq!(
            Literal::for_option(kind, &OptionValue::from("true")),
            Literal::Bool(true)
        );
        assert_eq!(
            Literal::for_option(kind, &OptionValue::from("FALSE")),
            Literal::Bool(false)
        );
        assert_eq!(
            Literal::for_option(kind, &OptionValue::Integer(1)),
            Literal::Bool(true)
        );
        assert_eq!(
            Literal::for_option(kind, &OptionValue::from("maybe")),
            Literal::Str("maybe".into())
        );
    }

    #[test]
    fn integers_parse_numeric_text() {
        let kind = OptionKind::Integer;
        assert_eq!(
            Literal::for_option(kind, &OptionValue::from(" 4 ")),
            Literal::Int(4)
        );
        assert_eq!(
            Literal::for_option(kind, &OptionValue::from("wide")),
            Literal::Str("wide".into())
        );
    }

    #[test]
    fn integer_options_do_not_coerce_booleans() {
        assert_eq!(
            Literal::for_option(OptionKind::Integer, &OptionValue::Bool(true)),
            Literal::Str("true".into())
        );
    }

    #[test]
    fn fractional_numbers_render_verbatim() {
        let value: OptionValue = serde_json::from_str("4.5").unwrap();
        let literal = Literal::for_option(OptionKind::Integer, &value);
        assert_eq!(literal, Literal::Number("4.5".into()));
        assert_eq!(literal.render(), "4.5");
    }

    #[test]
    fn text_stays_text() {
        assert_eq!(
            Literal::for_option(OptionKind::Text, &OptionValue::from("django")),
            Literal::Str("django".into())
        );
    }
}
