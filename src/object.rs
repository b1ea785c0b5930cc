//! Token values produced by the lexer.
//!
//! Each call to `Lexer::get_obj` yields exactly one [`Object`]. Composite
//! values (arrays, dictionaries) are not assembled here; their delimiters are
//! returned as individual tokens for the object-graph builder to consume.

/// One lexical unit of PDF syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// `null` keyword
    Null,
    /// `true` / `false` keywords
    Boolean(bool),
    /// Integer number
    Integer(i64),
    /// Real (floating-point) number
    Real(f64),
    /// Name with `#xx` escapes decoded (without the leading /)
    Name(String),
    /// Literal or hex string, escapes decoded
    String(Vec<u8>),
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `<<`
    DictStart,
    /// `>>`
    DictEnd,
    /// Indirect object reference (`12 0 R`)
    Reference(ObjectRef),
    /// Any other keyword or content-stream operator, by its literal spelling
    Command(String),
    /// Input the lexer could not classify
    Error,
    /// End of the last underlying stream
    Eof,
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Get the type name of this token (without data).
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::Name(_) => "Name",
            Object::String(_) => "String",
            Object::ArrayStart => "ArrayStart",
            Object::ArrayEnd => "ArrayEnd",
            Object::DictStart => "DictStart",
            Object::DictEnd => "DictEnd",
            Object::Reference(_) => "Reference",
            Object::Command(_) => "Command",
            Object::Error => "Error",
            Object::Eof => "EOF",
        }
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to real number.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Integer or real, widened to `f64`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to string (bytes).
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Spelling of a command token.
    pub fn as_command(&self) -> Option<&str> {
        match self {
            Object::Command(c) => Some(c),
            _ => None,
        }
    }

    /// Check if this is the command `cmd`.
    pub fn is_command(&self, cmd: &str) -> bool {
        matches!(self, Object::Command(c) if c == cmd)
    }

    /// Check if object is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    /// Check if this is the malformed-input marker.
    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error)
    }

    /// Check if this is the end-of-file token.
    pub fn is_eof(&self) -> bool {
        matches!(self, Object::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_integer() {
        let obj = Object::Integer(42);
        assert_eq!(obj.as_integer(), Some(42));
        assert_eq!(obj.as_number(), Some(42.0));
        assert_eq!(obj.as_name(), None);
        assert_eq!(obj.type_name(), "Integer");
    }

    #[test]
    fn test_object_command() {
        let obj = Object::Command("endobj".to_string());
        assert!(obj.is_command("endobj"));
        assert!(!obj.is_command("obj"));
        assert_eq!(obj.as_command(), Some("endobj"));
    }

    #[test]
    fn test_object_reference() {
        let obj = Object::Reference(ObjectRef::new(12, 0));
        assert_eq!(obj.as_reference(), Some(ObjectRef { id: 12, gen: 0 }));
        assert_eq!(format!("{}", ObjectRef::new(12, 0)), "12 0 R");
    }

    #[test]
    fn test_object_markers() {
        assert!(Object::Error.is_error());
        assert!(Object::Eof.is_eof());
        assert!(Object::Null.is_null());
        assert_eq!(Object::Eof.type_name(), "EOF");
    }
}
