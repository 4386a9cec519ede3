//! Tree-walking evaluator.
//!
//! Reduces an AST [`Node`] to a [`Value`] against the variable bags of an
//! [`EvalContext`], resolving calls through a [`FunctionRegistry`].

pub mod operators;
pub mod state;
pub mod trace;

pub use state::{CAPTURE_SLOTS, EvalContext, capture_key};
pub use trace::{TraceEvent, Tracer, summarize};

use crate::api::{Error, ErrorKind};
use crate::parser::{Expr, LogicalOp, Node, Position, RelationalOp, SelectStep};
use crate::registry::FunctionRegistry;
use crate::values::coerce::{stringify, to_regexp, truthy};
use crate::values::{Map, Value};

use smallvec::SmallVec;
use std::sync::Arc;

pub struct Evaluator<'a, 't> {
    source: Arc<str>,
    ctx: EvalContext<'a>,
    functions: &'a FunctionRegistry,
    tracer: Option<&'t mut dyn Tracer>,
}

impl<'a, 't> Evaluator<'a, 't> {
    pub fn new(
        source: Arc<str>,
        ctx: EvalContext<'a>,
        functions: &'a FunctionRegistry,
        tracer: Option<&'t mut dyn Tracer>,
    ) -> Self {
        Self {
            source,
            ctx,
            functions,
            tracer,
        }
    }

    pub fn evaluate(&mut self, node: &Node) -> Result<Value, Error> {
        self.eval(node, 0)
    }

    fn error(
        &self,
        kind: ErrorKind,
        origin: &'static str,
        position: Position,
        message: impl Into<String>,
    ) -> Error {
        Error::new(kind, message)
            .with_origin(origin)
            .with_position(position)
            .with_source(Arc::clone(&self.source))
    }

    fn enter(&mut self, node: &Node, depth: usize) {
        let event = TraceEvent::Enter {
            kind: node.kind(),
            depth,
            position: node.position,
        };
        match self.tracer.as_deref_mut() {
            Some(tracer) => tracer.trace(&event),
            None => tracing::trace!("{event}"),
        }
    }

    fn exit(&mut self, node: &Node, depth: usize, value: &Value) {
        let event = TraceEvent::Exit {
            kind: node.kind(),
            depth,
            summary: summarize(value),
        };
        match self.tracer.as_deref_mut() {
            Some(tracer) => tracer.trace(&event),
            None => tracing::trace!("{event}"),
        }
    }

    fn eval(&mut self, node: &Node, depth: usize) -> Result<Value, Error> {
        self.enter(node, depth);
        let value = self.dispatch(node, depth)?;
        self.exit(node, depth, &value);
        Ok(value)
    }

    fn dispatch(&mut self, node: &Node, depth: usize) -> Result<Value, Error> {
        let child = depth + 1;
        match &node.expr {
            Expr::Sequence(statements) => {
                let mut last = Value::Undefined;
                for statement in statements {
                    last = self.eval(statement, child)?;
                }
                Ok(last)
            }
            Expr::Assignment { target, value } => {
                let Value::String(name) = self.eval(target, child)? else {
                    return Err(self.error(
                        ErrorKind::Internal,
                        "assignment",
                        target.position,
                        "assignment target must be a name",
                    ));
                };
                let value = self.eval(value, child)?;
                self.ctx.assign(name, value.clone());
                Ok(value)
            }
            Expr::ConditionalBinary { value, fallback } => {
                let value = self.eval(value, child)?;
                if truthy(&value) {
                    Ok(value)
                } else {
                    self.eval(fallback, child)
                }
            }
            Expr::ConditionalTernary {
                cond,
                then_branch,
                else_branch,
            } => {
                if truthy(&self.eval(cond, child)?) {
                    self.eval(then_branch, child)
                } else {
                    self.eval(else_branch, child)
                }
            }
            Expr::Logical { op, left, right } => {
                let left = truthy(&self.eval(left, child)?);
                let result = match op {
                    LogicalOp::And => left && truthy(&self.eval(right, child)?),
                    LogicalOp::Or => left || truthy(&self.eval(right, child)?),
                };
                Ok(Value::Boolean(result))
            }
            Expr::Bitwise { op, left, right } => {
                let left = self.eval(left, child)?;
                let right = self.eval(right, child)?;
                Ok(operators::bitwise(*op, &left, &right))
            }
            Expr::Relational { op, left, right } => {
                let left = self.eval(left, child)?;
                let right = self.eval(right, child)?;
                match op {
                    RelationalOp::Match | RelationalOp::NoMatch => {
                        self.regexp_match(node, *op, &left, &right)
                    }
                    _ => Ok(Value::Boolean(operators::relational(*op, &left, &right))),
                }
            }
            Expr::Arithmetical { op, left, right } => {
                let left = self.eval(left, child)?;
                let right = self.eval(right, child)?;
                Ok(operators::arithmetic(*op, &left, &right))
            }
            Expr::Unary { op, operand } => {
                let operand = self.eval(operand, child)?;
                Ok(operators::unary(*op, &operand))
            }
            Expr::Select { base, steps } => {
                let (_, value) = self.select(base, steps, child)?;
                Ok(value)
            }
            Expr::FuncCall {
                callee,
                args,
                optional,
            } => self.call(node, callee, args, *optional, child),
            Expr::Identifier(name) => Ok(Value::String(name.clone())),
            Expr::Variable(name) => self.ctx.lookup(name).cloned().ok_or_else(|| {
                self.error(
                    ErrorKind::UnknownVariable,
                    "variable",
                    node.position,
                    format!("unknown variable \"{name}\""),
                )
            }),
            Expr::LiteralArray(items) => items
                .iter()
                .map(|item| self.eval(item, child))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Expr::LiteralObject(items) => {
                let mut map = Map::new();
                for item in items {
                    if !matches!(item.expr, Expr::LiteralObjectItem { .. }) {
                        return Err(self.error(
                            ErrorKind::Internal,
                            "object",
                            item.position,
                            format!("unexpected {} in object literal", item.kind()),
                        ));
                    }
                    if let Value::Map(entry) = self.eval(item, child)? {
                        map.extend(entry);
                    }
                }
                Ok(Value::Map(map))
            }
            Expr::LiteralObjectItem { key, value } => {
                let key = stringify(&self.eval(key, child)?);
                let value = self.eval(value, child)?;
                Ok(Value::Map(Map::from([(key, value)])))
            }
            Expr::LiteralTemplate(parts) => {
                let mut text = String::new();
                for part in parts {
                    text.push_str(&stringify(&self.eval(part, child)?));
                }
                Ok(Value::String(text))
            }
            Expr::LiteralString(s) => Ok(Value::String(s.clone())),
            Expr::LiteralRegExp(re) => Ok(Value::RegExp(re.clone())),
            Expr::LiteralNumber(n) => Ok(Value::Number(*n)),
            Expr::LiteralValue(value) => Ok(value.clone()),
        }
    }

    /// Walks a selection chain, returning `(parent, value)` where `parent` is
    /// the container the final step was read from.
    fn select(
        &mut self,
        base: &Node,
        steps: &[SelectStep],
        depth: usize,
    ) -> Result<(Value, Value), Error> {
        let mut parent = Value::Undefined;
        let mut current = self.eval(base, depth)?;
        for step in steps {
            if step.optional && current.is_nullish() {
                return Ok((Value::Undefined, Value::Undefined));
            }
            if !matches!(current, Value::Map(_) | Value::Array(_)) {
                let message = match &step.key.expr {
                    Expr::Identifier(name) => {
                        format!("cannot read property \"{name}\" of {}", current.type_name())
                    }
                    _ => format!("cannot index into {}", current.type_name()),
                };
                return Err(self.error(
                    ErrorKind::PropertyAccess,
                    "select",
                    step.position,
                    message,
                ));
            }
            let key = stringify(&self.eval(&step.key, depth)?);
            let next = current.property(&key).unwrap_or_default();
            parent = std::mem::replace(&mut current, next);
        }
        Ok((parent, current))
    }

    fn call(
        &mut self,
        node: &Node,
        callee: &Node,
        args: &[Node],
        optional: bool,
        depth: usize,
    ) -> Result<Value, Error> {
        let (receiver, function) = match &callee.expr {
            Expr::Select { base, steps } => {
                self.enter(callee, depth);
                let (receiver, function) = self.select(base, steps, depth + 1)?;
                self.exit(callee, depth, &function);
                (receiver, function)
            }
            Expr::Variable(name) => {
                self.enter(callee, depth);
                let resolved = self
                    .ctx
                    .lookup(name)
                    .cloned()
                    .or_else(|| self.functions.resolve(name).map(Value::Function));
                match resolved {
                    Some(function) => {
                        self.exit(callee, depth, &function);
                        (Value::Undefined, function)
                    }
                    None if optional => {
                        self.exit(callee, depth, &Value::Undefined);
                        return Ok(Value::Undefined);
                    }
                    None => {
                        return Err(self.error(
                            ErrorKind::UnknownVariable,
                            "call",
                            callee.position,
                            format!("unknown function \"{name}\""),
                        ));
                    }
                }
            }
            _ => (Value::Undefined, self.eval(callee, depth)?),
        };

        let function = match function {
            Value::Function(function) => function,
            value if optional && value.is_nullish() => return Ok(Value::Undefined),
            value => {
                return Err(self.error(
                    ErrorKind::NotCallable,
                    "call",
                    node.position,
                    format!("{} is not a function", value.type_name()),
                ));
            }
        };

        let mut values: SmallVec<[Value; 4]> = SmallVec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, depth)?);
        }
        function.call(&receiver, &values).map_err(|err| {
            self.error(ErrorKind::Function, "call", node.position, err.to_string())
        })
    }

    /// `=~` and `!~`: matches the left operand's string form against the
    /// right operand as a regexp and publishes the capture groups.
    fn regexp_match(
        &mut self,
        node: &Node,
        op: RelationalOp,
        left: &Value,
        right: &Value,
    ) -> Result<Value, Error> {
        let regexp = to_regexp(right).map_err(|err| {
            self.error(ErrorKind::Coercion, "match", node.position, err.to_string())
        })?;
        let captures = regexp.captures(&stringify(left));
        self.ctx.record_captures(captures.as_deref());
        let matched = captures.is_some();
        Ok(Value::Boolean(matched == (op == RelationalOp::Match)))
    }
}
