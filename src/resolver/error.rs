//! Error types for the resolver

use thiserror::Error;

use crate::error::render_report;
use crate::parser::ast::Span;
use crate::value::Unit;

/// Maximum nesting of `for` loops
pub const MAX_LOOP_DEPTH: usize = 5;

/// Maximum iterations a single `for` loop may unroll to
pub const MAX_LOOP_ITERATIONS: usize = 10_000;

/// Errors raised while resolving variables, templates and loops
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("Unknown template '{name}'")]
    UnknownTemplate { name: String, span: Span },

    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String, span: Span },

    #[error("Undefined color variable '{name}'")]
    UndefinedColor { name: String, span: Span },

    #[error("Division by zero")]
    DivisionByZero { span: Span },

    #[error("Cannot add/subtract values with different units: '{left}' and '{right}'")]
    AdditiveUnits { left: Unit, right: Unit, span: Span },

    #[error("Cannot multiply/divide values with units on both sides: '{left}' and '{right}'")]
    MultiplicativeUnits { left: Unit, right: Unit, span: Span },

    #[error("Maximum loop nesting depth ({}) exceeded", MAX_LOOP_DEPTH)]
    LoopDepth { span: Span },

    /// `bound` is one of `from`, `to` or `step`
    #[error("For loop '{bound}' value must be unitless")]
    LoopBoundUnit { bound: &'static str, span: Span },

    #[error("For loop step cannot be zero")]
    ZeroStep { span: Span },

    #[error("For loop step direction does not match range (positive step, end < start)")]
    PositiveStepBackwards { span: Span },

    #[error("For loop step direction does not match range (negative step, end > start)")]
    NegativeStepForwards { span: Span },

    #[error("For loop would produce {count} iterations (max {})", MAX_LOOP_ITERATIONS)]
    TooManyIterations { count: usize, span: Span },
}

impl ResolveError {
    /// Source span of the statement or element that failed
    pub fn span(&self) -> Span {
        match self {
            ResolveError::UnknownTemplate { span, .. }
            | ResolveError::UndefinedVariable { span, .. }
            | ResolveError::UndefinedColor { span, .. }
            | ResolveError::DivisionByZero { span }
            | ResolveError::AdditiveUnits { span, .. }
            | ResolveError::MultiplicativeUnits { span, .. }
            | ResolveError::LoopDepth { span }
            | ResolveError::LoopBoundUnit { span, .. }
            | ResolveError::ZeroStep { span }
            | ResolveError::PositiveStepBackwards { span }
            | ResolveError::NegativeStepForwards { span }
            | ResolveError::TooManyIterations { span, .. } => span.clone(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let message = self.to_string();
        render_report(source, filename, self.span(), &message, &message)
    }
}
