use crate::values::AttributeKind;
use thiserror::Error;

/// Errors returned while registering attribute domains on a
/// [`Config`](crate::Config).
#[derive(Error, PartialEq, Debug)]
pub enum ConfigError {
    #[error("attribute {0} has already been defined")]
    AlreadyPresent(String),
}

/// Errors returned while building an [`Event`](crate::Event).
#[derive(Error, PartialEq, Debug)]
pub enum EventError {
    #[error("attribute {0} was already added to the event")]
    AlreadyPresent(String),
    #[error("attribute {0} does not exist")]
    NonExisting(String),
    #[error("{name:?}: mismatching types => expected: {expected:?}, found: {actual:?}")]
    MismatchingTypes {
        name: String,
        expected: AttributeKind,
        actual: AttributeKind,
    },
}

/// Errors returned by the expression constructors.
#[derive(Error, PartialEq, Debug)]
pub enum ExpressionError {
    #[error("a set expression requires exactly one variable side")]
    InvalidSetExpression,
}

/// Errors produced by the lexer and by the semantic checks embedded in the
/// grammar actions.
#[derive(Error, Clone, PartialEq, Debug)]
pub enum ParserError {
    #[error("invalid token at position {position}")]
    InvalidToken { position: usize },
    #[error("unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },
    #[error("invalid number literal at position {position}")]
    InvalidNumber { position: usize },
    #[error("unknown frequency cap type {0:?}")]
    InvalidFrequencyType(String),
}
