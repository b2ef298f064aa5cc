use crate::pos::Pos;
use thiserror::Error;

/// Everything a primitive can fail with. Each variant keeps the position
/// of the expression that was being evaluated and a short description of
/// where evaluation was at.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("expected {expected} but got {got} {ctx}, at {pos}")]
    Type {
        expected: &'static str,
        got: &'static str,
        ctx: String,
        pos: Pos,
    },

    #[error("cannot coerce {got} to a string {ctx}, at {pos}")]
    Coercion {
        got: &'static str,
        ctx: String,
        pos: Pos,
    },

    #[error("context key '{key}' is not a store path, at {pos}")]
    NotAStorePath { key: String, pos: Pos },

    #[error("tried to add {kind} context of '{path}', which is not a derivation, to a string, at {pos}")]
    NotADerivation {
        kind: &'static str,
        path: String,
        pos: Pos,
    },

    #[error("the string '{text}' is not allowed to refer to a store path {ctx}, at {pos}")]
    UnexpectedContext { text: String, ctx: String, pos: Pos },

    #[error("{name} expects {expected} arguments but got {got}")]
    Arity {
        name: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("builtin '{0}' is not registered")]
    UnknownBuiltin(String),

    #[error("{source}, at {pos}")]
    Store {
        #[source]
        source: anyhow::Error,
        pos: Pos,
    },
}
