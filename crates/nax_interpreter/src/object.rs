use std::fmt::Display;

use nax_parser::ast::LiteralValue;

/// A runtime value. The whole language runs on these four kinds.
///
/// Equality is by value: nil equals only itself, and values of different
/// kinds are never equal.
#[derive(Debug, PartialEq)]
pub enum Object {
    Number(f64),
    Boolean(bool),
    String(String),
    Nil,
}

impl Object {
    /// nil and false are falsy; everything else is truthy, including zero
    /// and the empty string.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Nil | Object::Boolean(false))
    }
}

impl From<&LiteralValue> for Object {
    fn from(value: &LiteralValue) -> Object {
        match value {
            LiteralValue::Number(value) => Object::Number(*value),
            LiteralValue::String(value) => Object::String(value.clone()),
            LiteralValue::Boolean(value) => Object::Boolean(*value),
            LiteralValue::Nil => Object::Nil,
        }
    }
}

impl Display for Object {
    /// The form `print` writes
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Object::*;

        match self {
            Number(value) => {
                let mut buffer = ryu::Buffer::new();
                let text = buffer.format(*value);
                // Integral numbers print without the fractional part
                write!(f, "{}", text.strip_suffix(".0").unwrap_or(text))
            }
            Boolean(value) => write!(f, "{}", value),
            String(value) => write!(f, "{}", value),
            Nil => write!(f, "nil"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::object::Object;

    #[test]
    fn number_formatting() {
        let tests = vec![
            (3.0, "3"),
            (0.0, "0"),
            (-2.0, "-2"),
            (2.5, "2.5"),
            (-0.125, "-0.125"),
            (1.0 / 3.0, "0.3333333333333333"),
            (12345.0, "12345"),
        ];

        for (value, expected) in tests {
            assert_eq!(format!("{}", Object::Number(value)), expected);
        }
    }

    #[test]
    fn display_forms() {
        assert_eq!(format!("{}", Object::Boolean(true)), "true");
        assert_eq!(format!("{}", Object::Boolean(false)), "false");
        assert_eq!(format!("{}", Object::String("hi".to_owned())), "hi");
        assert_eq!(format!("{}", Object::Nil), "nil");
    }

    #[test]
    fn truthiness() {
        assert!(!Object::Nil.is_truthy());
        assert!(!Object::Boolean(false).is_truthy());

        assert!(Object::Boolean(true).is_truthy());
        assert!(Object::Number(0.0).is_truthy());
        assert!(Object::Number(-1.5).is_truthy());
        assert!(Object::String(String::new()).is_truthy());
    }

    #[test]
    fn equality_is_by_kind_and_value() {
        assert_eq!(Object::Nil, Object::Nil);
        assert_eq!(Object::Number(1.0), Object::Number(1.0));
        assert_eq!(Object::String("a".to_owned()), Object::String("a".to_owned()));

        assert_ne!(Object::Number(1.0), Object::Number(2.0));
        assert_ne!(Object::Number(1.0), Object::String("1".to_owned()));
        assert_ne!(Object::Boolean(false), Object::Nil);
        assert_ne!(Object::Boolean(true), Object::Number(1.0));
    }
}
