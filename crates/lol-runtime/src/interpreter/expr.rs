//! Expression evaluation

use crate::ast::*;
use crate::interpreter::{Interpreter, GLOBAL_SCOPE};
use crate::span::Span;
use crate::value::{Callable, Instance, RuntimeError, Value, ValueArray};
use std::rc::Rc;
use tracing::trace;

impl Interpreter {
    /// Evaluate an expression, invoking the result if it is a zero-parameter callable
    pub(super) fn eval_value(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match self.eval_expr(expr)? {
            Value::Callable(callable) if callable.arity() == 0 => {
                self.call(&callable, Vec::new(), expr.span())
            }
            value => Ok(value),
        }
    }

    /// Evaluate an expression without auto-invocation
    pub(super) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit, _) => Ok(self.eval_literal(lit)),
            Expr::Identifier(id) => self.eval_identifier(id),
            Expr::Binary(bin) => self.eval_binary(bin),
            Expr::Call(call) => self.eval_call(call),
            Expr::New(new) => self.eval_new(new),
            Expr::Member(member) => self.eval_member(member),
            Expr::Me(span) => self
                .current_instance
                .clone()
                .map(Value::Instance)
                .ok_or(RuntimeError::SelfOutsideMethod { span: *span }),
            Expr::Bukkit(_) => Ok(Value::Bukkit(ValueArray::new())),
            Expr::Index(index) => self.eval_index(index),
            Expr::Maek(maek) => self.eval_maek(maek),
        }
    }

    /// Evaluate a literal
    pub(super) fn eval_literal(&self, lit: &Literal) -> Value {
        match lit {
            Literal::Numbr(n) => Value::Numbr(*n),
            Literal::Numbar(f) => Value::Numbar(*f),
            Literal::Yarn(s) => Value::yarn(s),
            Literal::Troof(b) => Value::Troof(*b),
        }
    }

    /// Resolve a name; stored function definitions become unbound callables
    fn eval_identifier(&self, id: &Identifier) -> Result<Value, RuntimeError> {
        match self.lookup(&id.name) {
            Some(Value::FuncDef(def)) => Ok(Value::Callable(Callable::free(def))),
            Some(value) => Ok(value),
            None => Err(RuntimeError::UndeclaredVariable {
                name: id.name.clone(),
                span: id.span,
            }),
        }
    }

    /// Evaluate a binary expression
    fn eval_binary(&mut self, bin: &BinaryExpr) -> Result<Value, RuntimeError> {
        let left = self.eval_value(&bin.left)?;
        let right = self.eval_value(&bin.right)?;
        binary_op(bin.op, &left, &right, bin.span)
    }

    /// Evaluate a function or method call
    ///
    /// Arguments are evaluated in the caller's scope and instance before the
    /// call frame is pushed.
    fn eval_call(&mut self, call: &CallExpr) -> Result<Value, RuntimeError> {
        let callable = match self.eval_expr(&call.callee)? {
            Value::Callable(callable) => callable,
            other => {
                return Err(RuntimeError::NotAFunction {
                    found: other.type_name(),
                    span: call.callee.span(),
                })
            }
        };

        if call.args.len() != callable.arity() {
            return Err(RuntimeError::ArityMismatch {
                name: callable.name().to_string(),
                expected: callable.arity(),
                found: call.args.len(),
                span: call.span,
            });
        }

        let args = call
            .args
            .iter()
            .map(|arg| self.eval_value(arg))
            .collect::<Result<Vec<_>, _>>()?;

        self.call(&callable, args, call.span)
    }

    /// Create an instance and initialize its properties in declaration order
    fn eval_new(&mut self, new: &NewExpr) -> Result<Value, RuntimeError> {
        let class = match self.lookup(&new.class.name) {
            Some(Value::Class(class)) => class,
            _ => {
                return Err(RuntimeError::NotAClass {
                    name: new.class.name.clone(),
                    span: new.class.span,
                })
            }
        };

        // An initializer may construct further instances, so construction
        // counts against the call-depth limit
        if self.call_depth >= self.max_call_depth {
            return Err(RuntimeError::StackOverflow {
                limit: self.max_call_depth,
                span: new.span,
            });
        }

        let instance = Rc::new(Instance::new(Rc::clone(&class)));

        trace!(class = %new.class.name, depth = self.call_depth + 1, "new");
        self.call_depth += 1;
        // Initializers only see globals, never the creating scope or ME
        let result = self.with_frame(GLOBAL_SCOPE, None, |interp| {
            for prop in &class.properties {
                let value = match &prop.init {
                    Some(init) => interp.eval_value(init)?,
                    None => Value::Noob,
                };
                instance.set_field(prop.name.name.clone(), value);
            }
            Ok(())
        });
        self.call_depth -= 1;
        result?;

        Ok(Value::Instance(instance))
    }

    /// Access a method or field. Methods shadow fields of the same name.
    fn eval_member(&mut self, member: &MemberExpr) -> Result<Value, RuntimeError> {
        let instance = self.eval_instance(&member.object)?;
        let name = &member.member.name;

        if let Some(method) = instance.class.method(name) {
            return Ok(Value::Callable(Callable::bound(
                Rc::clone(method),
                Rc::clone(&instance),
            )));
        }

        instance
            .get_field(name)
            .ok_or_else(|| RuntimeError::NoSuchMember {
                class: instance.class_name().to_string(),
                member: name.clone(),
                span: member.member.span,
            })
    }

    /// Evaluate the object of a member access or member assignment
    pub(super) fn eval_instance(&mut self, object: &Expr) -> Result<Rc<Instance>, RuntimeError> {
        match self.eval_expr(object)? {
            Value::Instance(instance) => Ok(instance),
            other => Err(RuntimeError::NotAnInstance {
                found: other.type_name(),
                span: object.span(),
            }),
        }
    }

    /// Read an array element. Out-of-range reads, negative included, yield NOOB.
    fn eval_index(&mut self, index: &IndexExpr) -> Result<Value, RuntimeError> {
        let (array, position) = self.eval_array_and_index(index)?;

        Ok(usize::try_from(position)
            .ok()
            .and_then(|i| array.get(i))
            .unwrap_or(Value::Noob))
    }

    /// Evaluate the base and index of an array access
    pub(super) fn eval_array_and_index(
        &mut self,
        index: &IndexExpr,
    ) -> Result<(ValueArray, i64), RuntimeError> {
        let array = match self.eval_value(&index.target)? {
            Value::Bukkit(array) => array,
            other => {
                return Err(RuntimeError::NotAnArray {
                    found: other.type_name(),
                    span: index.target.span(),
                })
            }
        };

        match self.eval_value(&index.index)? {
            Value::Numbr(position) => Ok((array, position)),
            other => Err(RuntimeError::IndexNotInteger {
                found: other.type_name(),
                span: index.index.span(),
            }),
        }
    }

    /// `MAEK`: only BUKKIT to NUMBR (its length) is defined
    fn eval_maek(&mut self, maek: &MaekExpr) -> Result<Value, RuntimeError> {
        let value = self.eval_value(&maek.expr)?;

        match (&value, maek.target_type) {
            (Value::Bukkit(array), TypeName::Numbr) => Ok(Value::Numbr(array.len() as i64)),
            _ => Err(RuntimeError::UnsupportedCoercion {
                from: value.type_name(),
                to: maek.target_type,
                span: maek.span,
            }),
        }
    }
}

/// Apply a binary operator to two evaluated operands
pub(super) fn binary_op(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    span: Span,
) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::BothSaem => return Ok(Value::Troof(left == right)),
        BinaryOp::Diffrint => return Ok(Value::Troof(left != right)),
        _ => {}
    }

    let (Some(l), Some(r)) = (left.as_number(), right.as_number()) else {
        let culprit = if left.as_number().is_none() { left } else { right };
        return Err(RuntimeError::TypeError {
            msg: format!(
                "{} expects NUMBR or NUMBAR operands, found {}",
                op,
                culprit.type_name()
            ),
            span,
        });
    };

    if op == BinaryOp::Quoshunt {
        if r == 0.0 {
            return Err(RuntimeError::DivisionByZero { span });
        }
        return Ok(Value::Numbar(l / r));
    }

    if let (Value::Numbr(a), Value::Numbr(b)) = (left, right) {
        let result = match op {
            BinaryOp::Sum => a.checked_add(*b),
            BinaryOp::Diff => a.checked_sub(*b),
            _ => a.checked_mul(*b),
        };
        return result
            .map(Value::Numbr)
            .ok_or(RuntimeError::IntegerOverflow {
                op: op.as_str(),
                span,
            });
    }

    Ok(Value::Numbar(match op {
        BinaryOp::Sum => l + r,
        BinaryOp::Diff => l - r,
        _ => l * r,
    }))
}
