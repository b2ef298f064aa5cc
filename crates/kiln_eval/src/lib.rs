pub mod builtins;
pub mod error;
pub mod eval;
pub mod pos;
pub mod value;

pub use error::EvalError;
pub use eval::Evaluator;
pub use pos::Pos;
pub use value::{Attrs, KilnString, Value};

#[cfg(test)]
pub(crate) mod testing;
