//! Parser for the StagScribe scene language

pub mod ast;
mod builder;
mod grammar;
pub mod indent;
pub mod lexer;

pub use ast::*;
pub use grammar::parse;
