//! Syntax tree for the subset of Java the generators emit.
//!
//! Synthesis builds these nodes; [`render`](crate::render) turns them into
//! text. Nothing here knows about formatting or escaping.
//!
//! # Structure
//!
//! - [`CompilationUnit`]: one generated `.java` file
//! - [`ClassDecl`]: a top-level or local class
//! - [`MethodDecl`]: a method with its body
//! - [`Stmt`] and [`Expr`]: statements and expressions, including anonymous
//!   classes used for callbacks

use busgen_core::JavaType;

/// A type as written in source (`int`, `java.util.Set<String>`, `Foo[]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn void() -> Self {
        Self::new("void")
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_void(&self) -> bool {
        self.0 == "void"
    }
}

/// Declared types are emitted in source form (`Outer.Inner`, not `Outer$Inner`)
impl From<&JavaType> for TypeRef {
    fn from(ty: &JavaType) -> Self {
        Self::new(ty.source_name())
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declaration modifiers, rendered in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Private,
    Static,
    Final,
}

impl Modifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
        }
    }
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    /// Package name; empty for the default package
    pub package: String,
    pub types: Vec<ClassDecl>,
}

impl CompilationUnit {
    pub fn new(package: impl Into<String>, class: ClassDecl) -> Self {
        Self {
            package: package.into(),
            types: vec![class],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub implements: Vec<TypeRef>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
}

impl ClassDecl {
    /// A class with no modifiers (the form used for local classes)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            modifiers: Vec::new(),
            name: name.into(),
            implements: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn public(name: impl Into<String>) -> Self {
        Self::new(name).with_modifier(Modifier::Public)
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn implementing(mut self, ty: impl Into<TypeRef>) -> Self {
        self.implements.push(ty.into());
        self
    }

    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub modifiers: Vec<Modifier>,
    pub ty: TypeRef,
    pub name: String,
}

impl FieldDecl {
    pub fn private(ty: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        Self {
            modifiers: vec![Modifier::Private],
            ty: ty.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub is_final: bool,
    pub ty: TypeRef,
    pub name: String,
}

impl Param {
    pub fn new(ty: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        Self {
            is_final: false,
            ty: ty.into(),
            name: name.into(),
        }
    }

    pub fn final_(ty: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        Self {
            is_final: true,
            ..Self::new(ty, name)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    /// Annotation simple names, without `@`
    pub annotations: Vec<String>,
    pub modifiers: Vec<Modifier>,
    pub return_type: TypeRef,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

impl MethodDecl {
    pub fn public(return_type: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            modifiers: vec![Modifier::Public],
            return_type: return_type.into(),
            name: name.into(),
            params: Vec::new(),
            body: Vec::new(),
        }
    }

    /// A public method marked `@Override`
    pub fn overriding(return_type: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        let mut method = Self::public(return_type, name);
        method.annotations.push("Override".to_string());
        method
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_body(mut self, body: Vec<Stmt>) -> Self {
        self.body = body;
        self
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.body.push(stmt);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression statement
    Expr(Expr),
    /// Local variable declaration with initializer
    Local {
        is_final: bool,
        ty: TypeRef,
        name: String,
        init: Expr,
    },
    /// Assignment to a variable or field
    Assign { target: Expr, value: Expr },
    If { cond: Expr, then: Vec<Stmt> },
    Return(Option<Expr>),
    /// Class declared inside a method body
    LocalClass(ClassDecl),
}

impl Stmt {
    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    pub fn final_local(ty: impl Into<TypeRef>, name: impl Into<String>, init: Expr) -> Self {
        Stmt::Local {
            is_final: true,
            ty: ty.into(),
            name: name.into(),
            init,
        }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign { target, value }
    }

    pub fn if_(cond: Expr, then: Vec<Stmt>) -> Self {
        Stmt::If { cond, then }
    }

    pub fn ret(value: Expr) -> Self {
        Stmt::Return(Some(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Eq => "==",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Char(char),
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Null,
    This,
    Literal(Literal),
    Var(String),
    Field {
        target: Box<Expr>,
        name: String,
    },
    StaticField {
        class: TypeRef,
        name: String,
    },
    Call {
        target: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    StaticCall {
        class: TypeRef,
        method: String,
        args: Vec<Expr>,
    },
    New {
        ty: TypeRef,
        args: Vec<Expr>,
    },
    /// `new T() { methods }`
    Anonymous {
        ty: TypeRef,
        methods: Vec<MethodDecl>,
    },
    ClassLit(TypeRef),
    /// `new T[] { items }`
    NewArray {
        element: TypeRef,
        items: Vec<Expr>,
    },
    Cast {
        ty: TypeRef,
        expr: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::Str(value.into()))
    }

    pub fn class_lit(ty: impl Into<TypeRef>) -> Self {
        Expr::ClassLit(ty.into())
    }

    pub fn new_instance(ty: impl Into<TypeRef>, args: Vec<Expr>) -> Self {
        Expr::New {
            ty: ty.into(),
            args,
        }
    }

    pub fn static_call(class: impl Into<TypeRef>, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::StaticCall {
            class: class.into(),
            method: method.into(),
            args,
        }
    }

    pub fn static_field(class: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        Expr::StaticField {
            class: class.into(),
            name: name.into(),
        }
    }

    pub fn cast(ty: impl Into<TypeRef>, expr: Expr) -> Self {
        Expr::Cast {
            ty: ty.into(),
            expr: Box::new(expr),
        }
    }

    /// `self.method(args)`
    pub fn call(self, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: Box::new(self),
            method: method.into(),
            args,
        }
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        Expr::Field {
            target: Box::new(self),
            name: name.into(),
        }
    }

    fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn eq_to(self, rhs: Expr) -> Self {
        Self::binary(BinOp::Eq, self, rhs)
    }

    pub fn and(self, rhs: Expr) -> Self {
        Self::binary(BinOp::And, self, rhs)
    }

    pub fn or(self, rhs: Expr) -> Self {
        Self::binary(BinOp::Or, self, rhs)
    }
}
