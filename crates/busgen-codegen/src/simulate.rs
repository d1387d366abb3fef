//! Interpreter for generated subscription statements.
//!
//! Runs the callback of a `bus.subscribe(...)` statement against a simulated
//! message and reports which bean methods it would invoke. Only the
//! constructs the observer decorator emits are understood; anything else is
//! [`SimulationError::Unsupported`].

use crate::ast::{BinOp, Expr, Literal, MethodDecl, Stmt};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("statement is not a bus subscription: {0}")]
    NotASubscription(String),

    #[error("unsupported construct in callback: {0}")]
    Unsupported(String),

    #[error("payload of type {actual} requested as {requested}")]
    PayloadType { requested: String, actual: String },
}

/// An inbound message envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedMessage {
    /// `None` when the envelope carries no qualifier entry at all
    pub qualifiers: Option<BTreeSet<String>>,
    /// Class name the payload is an instance of
    pub payload_type: String,
    pub payload: serde_json::Value,
}

impl SimulatedMessage {
    pub fn new(payload_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            qualifiers: None,
            payload_type: payload_type.into(),
            payload,
        }
    }

    pub fn with_qualifiers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.qualifiers = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// One method call on a variable captured from outside the callback.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub target: String,
    pub method: String,
    pub args: Vec<serde_json::Value>,
}

/// A decoded subscription statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription<'a> {
    pub subject: String,
    /// Whether `subscribeLocal` was used
    pub local: bool,
    callback: &'a MethodDecl,
}

/// Decode a `bus.subscribe(subject, new Callback() { ... })` statement.
pub fn subscription(stmt: &Stmt) -> Result<Subscription<'_>, SimulationError> {
    let not_subscription = |why: &str| SimulationError::NotASubscription(why.to_string());

    let Stmt::Expr(Expr::Call { method, args, .. }) = stmt else {
        return Err(not_subscription("expected a call statement"));
    };
    let local = match method.as_str() {
        "subscribe" => false,
        "subscribeLocal" => true,
        other => return Err(not_subscription(&format!("unexpected method '{other}'"))),
    };
    let [Expr::Literal(Literal::Str(subject)), Expr::Anonymous { methods, .. }] = args.as_slice() else {
        return Err(not_subscription("expected (subject, callback) arguments"));
    };
    let callback = methods
        .iter()
        .find(|m| m.name == "callback" && m.params.len() == 1)
        .ok_or_else(|| not_subscription("callback has no callback(message) method"))?;

    Ok(Subscription {
        subject: subject.clone(),
        local,
        callback,
    })
}

/// Decode `stmt` and deliver `message` to its callback.
pub fn run_callback(stmt: &Stmt, message: &SimulatedMessage) -> Result<Vec<Invocation>, SimulationError> {
    subscription(stmt)?.deliver(message)
}

impl Subscription<'_> {
    /// Run the callback once for `message`.
    pub fn deliver(&self, message: &SimulatedMessage) -> Result<Vec<Invocation>, SimulationError> {
        let mut frame = Frame {
            message,
            message_var: &self.callback.params[0].name,
            vars: HashMap::new(),
            invocations: Vec::new(),
        };
        frame.block(&self.callback.body)?;
        Ok(frame.invocations)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Null,
    Bool(bool),
    Str(String),
    Set(BTreeSet<String>),
    Payload(serde_json::Value),
    Class(String),
    Key(String),
    Message,
}

impl Value {
    fn into_json(self) -> Result<serde_json::Value, SimulationError> {
        match self {
            Value::Null => Ok(serde_json::Value::Null),
            Value::Bool(b) => Ok(serde_json::Value::Bool(b)),
            Value::Str(s) => Ok(serde_json::Value::String(s)),
            Value::Payload(v) => Ok(v),
            other => Err(SimulationError::Unsupported(format!(
                "passing {other:?} to a bean method"
            ))),
        }
    }
}

struct Frame<'a> {
    message: &'a SimulatedMessage,
    message_var: &'a str,
    vars: HashMap<String, Value>,
    invocations: Vec<Invocation>,
}

impl Frame<'_> {
    /// Returns `true` when the block executed a `return`.
    fn block(&mut self, body: &[Stmt]) -> Result<bool, SimulationError> {
        for stmt in body {
            if self.stmt(stmt)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<bool, SimulationError> {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval(expr)?;
            }
            Stmt::Local { name, init, .. } => {
                let value = self.eval(init)?;
                self.vars.insert(name.clone(), value);
            }
            Stmt::If { cond, then } => {
                if self.eval(cond)? == Value::Bool(true) {
                    return self.block(then);
                }
            }
            Stmt::Return(None) => return Ok(true),
            other => return Err(SimulationError::Unsupported(format!("{other:?}"))),
        }
        Ok(false)
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, SimulationError> {
        match expr {
            Expr::Null => Ok(Value::Null),
            Expr::Literal(Literal::Str(s)) => Ok(Value::Str(s.clone())),
            Expr::Literal(Literal::Bool(b)) => Ok(Value::Bool(*b)),
            Expr::Var(name) if name == self.message_var => Ok(Value::Message),
            Expr::Var(name) => self
                .vars
                .get(name)
                .cloned()
                .ok_or_else(|| SimulationError::Unsupported(format!("unbound variable '{name}'"))),
            Expr::StaticField { name, .. } => Ok(Value::Key(name.clone())),
            Expr::ClassLit(ty) => Ok(Value::Class(ty.name().to_string())),
            Expr::New { ty, args } if args.is_empty() && ty.name().starts_with("java.util.HashSet") => {
                Ok(Value::Set(BTreeSet::new()))
            }
            Expr::Cast { expr, .. } => self.eval(expr),
            Expr::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs),
            Expr::Call {
                target,
                method,
                args,
            } => self.call(target, method, args),
            other => Err(SimulationError::Unsupported(format!("{other:?}"))),
        }
    }

    fn binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr) -> Result<Value, SimulationError> {
        let lhs = self.eval(lhs)?;
        match op {
            BinOp::Eq => Ok(Value::Bool(lhs == self.eval(rhs)?)),
            BinOp::And if lhs != Value::Bool(true) => Ok(Value::Bool(false)),
            BinOp::Or if lhs == Value::Bool(true) => Ok(Value::Bool(true)),
            BinOp::And | BinOp::Or => Ok(Value::Bool(self.eval(rhs)? == Value::Bool(true))),
        }
    }

    fn call(&mut self, target: &Expr, method: &str, args: &[Expr]) -> Result<Value, SimulationError> {
        let args = args
            .iter()
            .map(|arg| self.eval(arg))
            .collect::<Result<Vec<_>, _>>()?;

        if let Expr::Var(name) = target
            && name != self.message_var
            && !self.vars.contains_key(name)
        {
            let args = args
                .into_iter()
                .map(Value::into_json)
                .collect::<Result<Vec<_>, _>>()?;
            self.invocations.push(Invocation {
                target: name.clone(),
                method: method.to_string(),
                args,
            });
            return Ok(Value::Null);
        }

        if let (Expr::Var(name), "add", [Value::Str(item)]) = (target, method, args.as_slice())
            && let Some(Value::Set(set)) = self.vars.get_mut(name)
        {
            return Ok(Value::Bool(set.insert(item.clone())));
        }

        match (self.eval(target)?, method, args.as_slice()) {
            (Value::Message, "get", [Value::Class(_), Value::Key(key)]) if key == "QUALIFIERS" => {
                Ok(match &self.message.qualifiers {
                    Some(set) => Value::Set(set.clone()),
                    None => Value::Null,
                })
            }
            (Value::Message, "get", [Value::Class(class), Value::Key(key)]) if key == "OBJECT_REF" => {
                if *class != self.message.payload_type {
                    return Err(SimulationError::PayloadType {
                        requested: class.clone(),
                        actual: self.message.payload_type.clone(),
                    });
                }
                Ok(Value::Payload(self.message.payload.clone()))
            }
            (Value::Set(set), "equals", [other]) => {
                Ok(Value::Bool(matches!(other, Value::Set(o) if *o == set)))
            }
            (Value::Set(set), "isEmpty", []) => Ok(Value::Bool(set.is_empty())),
            (receiver, method, _) => Err(SimulationError::Unsupported(format!(
                "{receiver:?}.{method}(...)"
            ))),
        }
    }
}
