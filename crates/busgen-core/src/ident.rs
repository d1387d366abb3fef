//! Java identifier and name validation.
//!
//! Generated source must compile, so every name that ends up in an
//! identifier position is checked against these rules first.

/// Reserved words and literals that can never be used as identifiers.
const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null", "_",
];

/// Check whether `name` is a reserved Java word.
pub fn is_reserved(name: &str) -> bool {
    JAVA_RESERVED.contains(&name)
}

/// Check whether `name` is a legal simple Java identifier.
///
/// # Examples
///
/// ```
/// use busgen_core::ident::is_identifier;
///
/// assert!(is_identifier("loadProxies"));
/// assert!(is_identifier("$proxy"));
/// assert!(!is_identifier("9lives"));
/// assert!(!is_identifier("class"));
/// ```
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') && !is_reserved(name)
}

/// Check whether `name` is a dotted sequence of identifiers (`com.example.Foo`).
pub fn is_qualified_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_identifier)
}

/// Explain why `prefix` is not a usable package prefix, or `None` if it is.
pub fn package_prefix_problem(prefix: &str) -> Option<String> {
    if prefix.is_empty() {
        return Some("prefix is empty".to_string());
    }
    if prefix.starts_with('.') || prefix.ends_with('.') {
        return Some("prefix starts or ends with '.'".to_string());
    }
    for segment in prefix.split('.') {
        if segment.is_empty() {
            return Some("prefix contains an empty segment".to_string());
        }
        if !is_identifier(segment) {
            return Some(format!("'{segment}' is not a valid package segment"));
        }
    }
    None
}

const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "short", "int", "long", "char", "float", "double",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeToken<'a> {
    Name(&'a str),
    Symbol(char),
}

fn tokenize_type(ty: &str) -> Result<Vec<TypeToken<'_>>, String> {
    let is_name_char = |c: char| c.is_alphanumeric() || c == '_' || c == '$' || c == '.';
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in ty.char_indices() {
        if is_name_char(c) {
            start.get_or_insert(i);
            continue;
        }
        if let Some(s) = start.take() {
            tokens.push(TypeToken::Name(&ty[s..i]));
        }
        match c {
            '<' | '>' | ',' | '[' | ']' | '?' => tokens.push(TypeToken::Symbol(c)),
            _ if c.is_whitespace() => {}
            _ => return Err(format!("unexpected character '{c}'")),
        }
    }
    if let Some(s) = start {
        tokens.push(TypeToken::Name(&ty[s..]));
    }
    Ok(tokens)
}

/// Recursive-descent reader for `Name<Args>[]...` type references.
struct TypeParser<'a> {
    tokens: Vec<TypeToken<'a>>,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn peek(&self) -> Option<TypeToken<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn eat(&mut self, symbol: char) -> bool {
        if self.peek() == Some(TypeToken::Symbol(symbol)) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn unexpected(&self) -> String {
        match self.peek() {
            Some(TypeToken::Name(name)) => format!("unexpected name '{name}'"),
            Some(TypeToken::Symbol(c)) => format!("unexpected '{c}'"),
            None => "unexpected end of type".to_string(),
        }
    }

    /// Returns whether the reference was a bare primitive.
    fn reference(&mut self) -> Result<bool, String> {
        let Some(TypeToken::Name(name)) = self.peek() else {
            return Err(self.unexpected());
        };
        self.pos += 1;

        let primitive = PRIMITIVE_TYPES.contains(&name);
        if !primitive {
            if !is_qualified_name(name) {
                return Err(format!("'{name}' is not a valid type name"));
            }
            if self.eat('<') {
                self.arguments()?;
            }
        }

        let mut dimensions = 0;
        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.unexpected());
            }
            dimensions += 1;
        }
        Ok(primitive && dimensions == 0)
    }

    fn arguments(&mut self) -> Result<(), String> {
        loop {
            self.argument()?;
            if self.eat('>') {
                return Ok(());
            }
            if !self.eat(',') {
                return Err(match self.peek() {
                    None => "unclosed '<'".to_string(),
                    Some(_) => self.unexpected(),
                });
            }
        }
    }

    fn argument(&mut self) -> Result<(), String> {
        if self.eat('?') {
            if let Some(TypeToken::Name("extends" | "super")) = self.peek() {
                self.pos += 1;
                return self.type_argument();
            }
            return Ok(());
        }
        self.type_argument()
    }

    fn type_argument(&mut self) -> Result<(), String> {
        if self.reference()? {
            return Err("primitive types cannot be type arguments".to_string());
        }
        Ok(())
    }
}

/// Explain why `ty` is not a well-formed Java type reference, or `None` if it is.
///
/// Accepts primitives, `void`, (possibly qualified) names with balanced
/// generic arguments and wildcards, and trailing `[]` pairs.
///
/// # Examples
///
/// ```
/// use busgen_core::ident::type_reference_problem;
///
/// assert_eq!(type_reference_problem("java.util.Map<String, int[]>[]"), None);
/// assert!(type_reference_problem("java.util.List<String").is_some());
/// assert!(type_reference_problem("java.lang String").is_some());
/// ```
pub fn type_reference_problem(ty: &str) -> Option<String> {
    let tokens = match tokenize_type(ty) {
        Ok(tokens) => tokens,
        Err(problem) => return Some(problem),
    };
    if tokens == [TypeToken::Name("void")] {
        return None;
    }

    let mut parser = TypeParser { tokens, pos: 0 };
    if let Err(problem) = parser.reference() {
        return Some(problem);
    }
    if parser.peek().is_some() {
        return Some(parser.unexpected());
    }
    None
}
