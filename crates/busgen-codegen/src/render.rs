//! Java source rendering.
//!
//! The renderer is the only place that produces text. It validates every name
//! in an identifier position and escapes every literal, so a tree that renders
//! without error is syntactically valid Java.

use crate::ast::{BinOp, ClassDecl, CompilationUnit, Expr, Literal, MethodDecl, Modifier, Stmt, TypeRef};
use busgen_core::SynthesisError;
use busgen_core::ident::{is_identifier, is_qualified_name, type_reference_problem};
use std::fmt::Write;

const INDENT: &str = "    ";

/// Render a compilation unit generated for `owner`.
///
/// `owner` is the type the unit was generated from; it is named in every
/// error so failures can be traced back to their source type.
pub fn render_unit(unit: &CompilationUnit, owner: &str) -> Result<String, SynthesisError> {
    let mut renderer = Renderer::new(owner);
    renderer.unit(unit)?;
    Ok(renderer.out)
}

/// Render a single statement at indentation level zero.
pub fn render_stmt(stmt: &Stmt, owner: &str) -> Result<String, SynthesisError> {
    let mut renderer = Renderer::new(owner);
    renderer.stmt(stmt)?;
    Ok(renderer.out)
}

/// Escape `value` for use inside a Java string literal (without the quotes).
///
/// Control characters become octal escapes and everything outside ASCII
/// becomes `\uXXXX` (surrogate pairs above the BMP). Control characters must
/// not use `\u`: the compiler translates unicode escapes before lexing, so
/// `\u000a` would end the literal.
pub fn escape_string(value: &str) -> String {
    escape(value, '"')
}

/// Escape `value` for use inside a Java char literal (without the quotes).
pub fn escape_char(value: char) -> String {
    let mut buf = [0u8; 4];
    escape(value.encode_utf8(&mut buf), '\'')
}

fn escape(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
        }
    }
    out
}

struct Renderer<'a> {
    owner: &'a str,
    out: String,
    depth: usize,
}

impl<'a> Renderer<'a> {
    fn new(owner: &'a str) -> Self {
        Self {
            owner,
            out: String::new(),
            depth: 0,
        }
    }

    fn invalid(&self, identifier: &str) -> SynthesisError {
        SynthesisError::InvalidIdentifier {
            type_name: self.owner.to_string(),
            identifier: identifier.to_string(),
        }
    }

    fn ident(&mut self, name: &str) -> Result<(), SynthesisError> {
        if !is_identifier(name) {
            return Err(self.invalid(name));
        }
        self.out.push_str(name);
        Ok(())
    }

    /// Types must parse as a complete reference: balanced generic arguments,
    /// names separated by punctuation, and `[]` only as a suffix.
    fn ty(&mut self, ty: &TypeRef) -> Result<(), SynthesisError> {
        let name = ty.name();
        if type_reference_problem(name).is_some() {
            return Err(self.invalid(name));
        }
        self.out.push_str(name);
        Ok(())
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn modifiers(&mut self, modifiers: &[Modifier]) {
        for modifier in modifiers {
            self.out.push_str(modifier.keyword());
            self.out.push(' ');
        }
    }

    fn unit(&mut self, unit: &CompilationUnit) -> Result<(), SynthesisError> {
        if !unit.package.is_empty() {
            if !is_qualified_name(&unit.package) {
                return Err(self.invalid(&unit.package));
            }
            let _ = writeln!(self.out, "package {};\n", unit.package);
        }
        for (i, class) in unit.types.iter().enumerate() {
            if i > 0 {
                self.out.push('\n');
            }
            self.class(class)?;
            self.out.push('\n');
        }
        Ok(())
    }

    fn class(&mut self, class: &ClassDecl) -> Result<(), SynthesisError> {
        self.modifiers(&class.modifiers);
        self.out.push_str("class ");
        self.ident(&class.name)?;
        for (i, ty) in class.implements.iter().enumerate() {
            self.out.push_str(if i == 0 { " implements " } else { ", " });
            self.ty(ty)?;
        }
        self.out.push_str(" {");
        self.depth += 1;
        for field in &class.fields {
            self.newline();
            self.modifiers(&field.modifiers);
            self.ty(&field.ty)?;
            self.out.push(' ');
            self.ident(&field.name)?;
            self.out.push(';');
        }
        self.methods(&class.methods, !class.fields.is_empty())?;
        self.depth -= 1;
        self.newline();
        self.out.push('}');
        Ok(())
    }

    fn methods(&mut self, methods: &[MethodDecl], separate_first: bool) -> Result<(), SynthesisError> {
        for (i, method) in methods.iter().enumerate() {
            if i > 0 || separate_first {
                self.out.push('\n');
            }
            self.method(method)?;
        }
        Ok(())
    }

    fn method(&mut self, method: &MethodDecl) -> Result<(), SynthesisError> {
        for annotation in &method.annotations {
            self.newline();
            self.out.push('@');
            self.ident(annotation)?;
        }
        self.newline();
        self.modifiers(&method.modifiers);
        self.ty(&method.return_type)?;
        self.out.push(' ');
        self.ident(&method.name)?;
        self.out.push('(');
        for (i, param) in method.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            if param.is_final {
                self.out.push_str("final ");
            }
            self.ty(&param.ty)?;
            self.out.push(' ');
            self.ident(&param.name)?;
        }
        self.out.push_str(") ");
        self.block(&method.body)
    }

    fn block(&mut self, body: &[Stmt]) -> Result<(), SynthesisError> {
        self.out.push('{');
        self.depth += 1;
        for stmt in body {
            self.newline();
            self.stmt(stmt)?;
        }
        self.depth -= 1;
        self.newline();
        self.out.push('}');
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<(), SynthesisError> {
        match stmt {
            Stmt::Expr(expr) => {
                self.expr(expr)?;
                self.out.push(';');
            }
            Stmt::Local {
                is_final,
                ty,
                name,
                init,
            } => {
                if *is_final {
                    self.out.push_str("final ");
                }
                self.ty(ty)?;
                self.out.push(' ');
                self.ident(name)?;
                self.out.push_str(" = ");
                self.expr(init)?;
                self.out.push(';');
            }
            Stmt::Assign { target, value } => {
                self.expr(target)?;
                self.out.push_str(" = ");
                self.expr(value)?;
                self.out.push(';');
            }
            Stmt::If { cond, then } => {
                self.out.push_str("if (");
                self.expr(cond)?;
                self.out.push_str(") ");
                self.block(then)?;
            }
            Stmt::Return(value) => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.expr(value)?;
                }
                self.out.push(';');
            }
            Stmt::LocalClass(class) => self.class(class)?,
        }
        Ok(())
    }

    fn args(&mut self, args: &[Expr]) -> Result<(), SynthesisError> {
        self.out.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(arg)?;
        }
        self.out.push(')');
        Ok(())
    }

    fn literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Str(value) => {
                let _ = write!(self.out, "\"{}\"", escape_string(value));
            }
            Literal::Char(value) => {
                let _ = write!(self.out, "'{}'", escape_char(*value));
            }
            Literal::Bool(value) => {
                let _ = write!(self.out, "{value}");
            }
            Literal::Int(value) => {
                let _ = write!(self.out, "{value}");
            }
            Literal::Long(value) => {
                let _ = write!(self.out, "{value}L");
            }
            Literal::Float(value) => {
                let _ = write!(self.out, "{value:?}f");
            }
            Literal::Double(value) => {
                let _ = write!(self.out, "{value:?}d");
            }
        }
    }

    /// Render `expr` as the target of a member access.
    fn receiver(&mut self, expr: &Expr) -> Result<(), SynthesisError> {
        let needs_parens = matches!(
            expr,
            Expr::Cast { .. } | Expr::Binary { .. } | Expr::New { .. } | Expr::Anonymous { .. }
        );
        if needs_parens {
            self.out.push('(');
        }
        self.expr(expr)?;
        if needs_parens {
            self.out.push(')');
        }
        Ok(())
    }

    /// Render a binary operand. Mixed `&&`/`||` operands are always
    /// parenthesized; `==` binds tighter than both and never is.
    fn operand(&mut self, op: BinOp, expr: &Expr) -> Result<(), SynthesisError> {
        let needs_parens =
            matches!(expr, Expr::Binary { op: inner, .. } if *inner != op && *inner != BinOp::Eq);
        if needs_parens {
            self.out.push('(');
        }
        self.expr(expr)?;
        if needs_parens {
            self.out.push(')');
        }
        Ok(())
    }

    fn expr(&mut self, expr: &Expr) -> Result<(), SynthesisError> {
        match expr {
            Expr::Null => self.out.push_str("null"),
            Expr::This => self.out.push_str("this"),
            Expr::Literal(literal) => self.literal(literal),
            Expr::Var(name) => self.ident(name)?,
            Expr::Field { target, name } => {
                self.receiver(target)?;
                self.out.push('.');
                self.ident(name)?;
            }
            Expr::StaticField { class, name } => {
                self.ty(class)?;
                self.out.push('.');
                self.ident(name)?;
            }
            Expr::Call {
                target,
                method,
                args,
            } => {
                self.receiver(target)?;
                self.out.push('.');
                self.ident(method)?;
                self.args(args)?;
            }
            Expr::StaticCall {
                class,
                method,
                args,
            } => {
                self.ty(class)?;
                self.out.push('.');
                self.ident(method)?;
                self.args(args)?;
            }
            Expr::New { ty, args } => {
                self.out.push_str("new ");
                self.ty(ty)?;
                self.args(args)?;
            }
            Expr::Anonymous { ty, methods } => {
                self.out.push_str("new ");
                self.ty(ty)?;
                self.out.push_str("() {");
                self.depth += 1;
                self.methods(methods, false)?;
                self.depth -= 1;
                self.newline();
                self.out.push('}');
            }
            Expr::ClassLit(ty) => {
                self.ty(ty)?;
                self.out.push_str(".class");
            }
            Expr::NewArray { element, items } => {
                self.out.push_str("new ");
                self.ty(element)?;
                self.out.push_str("[] {");
                for (i, item) in items.iter().enumerate() {
                    self.out.push_str(if i == 0 { " " } else { ", " });
                    self.expr(item)?;
                }
                self.out.push_str(if items.is_empty() { "}" } else { " }" });
            }
            Expr::Cast { ty, expr } => {
                self.out.push('(');
                self.ty(ty)?;
                self.out.push_str(") ");
                self.receiver(expr)?;
            }
            Expr::Binary { op, lhs, rhs } => {
                self.operand(*op, lhs)?;
                let _ = write!(self.out, " {} ", op.symbol());
                self.operand(*op, rhs)?;
            }
        }
        Ok(())
    }
}
