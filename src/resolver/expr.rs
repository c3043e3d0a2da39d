//! Expression evaluation with unit algebra
//!
//! `+` and `-` need matching units, or one side unitless. `*` and `/` need
//! at least one unitless side. The result carries whichever unit was present.

use std::collections::HashMap;

use crate::parser::ast::{BinaryOp, Expr, Span};
use crate::value::{Unit, Value};

use super::error::ResolveError;

/// Variable bindings visible to an expression
pub type Scope = HashMap<String, Value>;

/// Evaluate `expr` in `scope`. `span` is attached to any error.
pub fn evaluate(expr: &Expr, scope: &Scope, span: &Span) -> Result<Value, ResolveError> {
    match expr {
        Expr::Literal(value) => Ok(*value),
        Expr::Var(name) => scope
            .get(name)
            .copied()
            .ok_or_else(|| ResolveError::UndefinedVariable {
                name: name.clone(),
                span: span.clone(),
            }),
        Expr::Negate(operand) => {
            let v = evaluate(operand, scope, span)?;
            Ok(Value::new(-v.number, v.unit))
        }
        Expr::Binary { op, left, right } => {
            let l = evaluate(left, scope, span)?;
            let r = evaluate(right, scope, span)?;
            binary(*op, l, r, span)
        }
    }
}

fn binary(op: BinaryOp, l: Value, r: Value, span: &Span) -> Result<Value, ResolveError> {
    match op {
        BinaryOp::Add => Ok(Value::new(l.number + r.number, additive_unit(l, r, span)?)),
        BinaryOp::Sub => Ok(Value::new(l.number - r.number, additive_unit(l, r, span)?)),
        BinaryOp::Mul => Ok(Value::new(
            l.number * r.number,
            multiplicative_unit(l, r, span)?,
        )),
        BinaryOp::Div => {
            if r.number == 0.0 {
                return Err(ResolveError::DivisionByZero { span: span.clone() });
            }
            Ok(Value::new(
                l.number / r.number,
                multiplicative_unit(l, r, span)?,
            ))
        }
    }
}

fn additive_unit(l: Value, r: Value, span: &Span) -> Result<Option<Unit>, ResolveError> {
    match (l.unit, r.unit) {
        (None, u) | (u, None) => Ok(u),
        (Some(a), Some(b)) if a == b => Ok(Some(a)),
        (Some(left), Some(right)) => Err(ResolveError::AdditiveUnits {
            left,
            right,
            span: span.clone(),
        }),
    }
}

fn multiplicative_unit(l: Value, r: Value, span: &Span) -> Result<Option<Unit>, ResolveError> {
    match (l.unit, r.unit) {
        (None, u) | (u, None) => Ok(u),
        (Some(left), Some(right)) => Err(ResolveError::MultiplicativeUnits {
            left,
            right,
            span: span.clone(),
        }),
    }
}
