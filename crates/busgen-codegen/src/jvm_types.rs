//! JVM type mappings for generated code.
//!
//! Proxies need two things from a declared type: the boxed class used in
//! class literals (`respondTo(java.lang.Integer.class, ...)`) and the default
//! value returned from a proxied method.
//!
//! # Type Mappings
//!
//! | Declared | Boxed | Default |
//! |----------|-------|---------|
//! | `boolean` | `java.lang.Boolean` | `false` |
//! | `int` | `java.lang.Integer` | `0` |
//! | `long` | `java.lang.Long` | `0L` |
//! | `double` | `java.lang.Double` | `0.0d` |
//! | `void` | `java.lang.Void` | (none) |
//! | `java.util.List<T>` | `java.util.List` | `null` |

use crate::ast::{Expr, Literal};
use busgen_core::JavaType;

/// Represents a JVM type with both its declared and boxed forms.
#[derive(Debug, Clone, PartialEq)]
pub struct JvmType {
    /// The type as declared (e.g., "int", "java.util.List<String>").
    pub declared: String,
    /// The erased, boxed class name usable in a class literal.
    pub boxed: String,
    /// Whether the declared type is a primitive (or `void`).
    pub is_primitive: bool,
}

impl JvmType {
    /// A reference type; its boxed form is its erasure. Both are in source
    /// form.
    pub fn reference(ty: &JavaType) -> Self {
        Self {
            declared: ty.source_name(),
            boxed: ty.source_erasure(),
            is_primitive: false,
        }
    }

    /// A primitive type with its wrapper class.
    pub fn primitive(primitive: &str, boxed: &str) -> Self {
        Self {
            declared: primitive.to_string(),
            boxed: boxed.to_string(),
            is_primitive: true,
        }
    }

    /// The value a generated method returns before the bus answers.
    ///
    /// `None` for `void`.
    pub fn default_value(&self) -> Option<Expr> {
        let literal = match self.declared.as_str() {
            "void" => return None,
            "boolean" => Literal::Bool(false),
            "char" => Literal::Char('\0'),
            "int" => Literal::Int(0),
            "long" => Literal::Long(0),
            "float" => Literal::Float(0.0),
            "double" => Literal::Double(0.0),
            // byte and short have no literal form; narrow an int
            "byte" | "short" => {
                return Some(Expr::cast(self.declared.as_str(), Expr::Literal(Literal::Int(0))));
            }
            _ => return Some(Expr::Null),
        };
        Some(Expr::Literal(literal))
    }
}

/// Map a declared Java type to a JVM type.
pub fn map_java_type(ty: &JavaType) -> JvmType {
    match ty.name() {
        "void" => JvmType::primitive("void", "java.lang.Void"),
        "boolean" => JvmType::primitive("boolean", "java.lang.Boolean"),
        "byte" => JvmType::primitive("byte", "java.lang.Byte"),
        "short" => JvmType::primitive("short", "java.lang.Short"),
        "char" => JvmType::primitive("char", "java.lang.Character"),
        "int" => JvmType::primitive("int", "java.lang.Integer"),
        "long" => JvmType::primitive("long", "java.lang.Long"),
        "float" => JvmType::primitive("float", "java.lang.Float"),
        "double" => JvmType::primitive("double", "java.lang.Double"),
        _ => JvmType::reference(ty),
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    fn jvm(name: &str) -> JvmType {
        map_java_type(&JavaType::new(name))
    }

    #[test]
    fn jvm_type___primitive___different_declared_and_boxed() {
        let ty = JvmType::primitive("int", "java.lang.Integer");

        assert_eq!(ty.declared, "int");
        assert_eq!(ty.boxed, "java.lang.Integer");
        assert!(ty.is_primitive);
    }

    #[test]
    fn map_java_type___handles_primitives() {
        assert_eq!(jvm("boolean").boxed, "java.lang.Boolean");
        assert_eq!(jvm("int").boxed, "java.lang.Integer");
        assert_eq!(jvm("char").boxed, "java.lang.Character");
        assert_eq!(jvm("void").boxed, "java.lang.Void");
    }

    #[test]
    fn map_java_type___reference___boxed_is_erasure() {
        let ty = jvm("java.util.Map<java.lang.String, java.util.List<Integer>>");

        assert_eq!(ty.boxed, "java.util.Map");
        assert!(!ty.is_primitive);
    }

    #[test]
    fn map_java_type___nested_type___source_form() {
        let ty = jvm("java.util.List<com.example.Outer$Event>");

        assert_eq!(ty.declared, "java.util.List<com.example.Outer.Event>");
        assert_eq!(ty.boxed, "java.util.List");
        assert_eq!(jvm("com.example.Outer$Event[]").boxed, "com.example.Outer.Event[]");
    }

    #[test]
    fn map_java_type___arrays_are_references() {
        let ty = jvm("int[]");

        assert_eq!(ty.boxed, "int[]");
        assert_eq!(ty.default_value(), Some(Expr::Null));
    }

    #[test]
    fn default_value___void_has_none() {
        assert_eq!(jvm("void").default_value(), None);
    }

    #[test]
    fn default_value___handles_primitives() {
        assert_eq!(jvm("boolean").default_value(), Some(Expr::Literal(Literal::Bool(false))));
        assert_eq!(jvm("int").default_value(), Some(Expr::Literal(Literal::Int(0))));
        assert_eq!(jvm("long").default_value(), Some(Expr::Literal(Literal::Long(0))));
    }

    #[test]
    fn default_value___narrow_primitives_are_cast() {
        assert_eq!(
            jvm("byte").default_value(),
            Some(Expr::cast("byte", Expr::Literal(Literal::Int(0))))
        );
    }

    #[test]
    fn default_value___references_are_null() {
        assert_eq!(jvm("java.lang.String").default_value(), Some(Expr::Null));
    }
}
