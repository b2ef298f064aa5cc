mod context;

pub use context::context_builtins;

use crate::error::EvalError;
use crate::eval::Evaluator;
use crate::pos::Pos;
use crate::value::Value;
use kiln_core::store::EvalStore;

type BuiltinFn<S> = fn(&Evaluator<S>, &[Value], Pos) -> Result<Value, EvalError>;

/// A named primitive of the language.
///
/// `doc` is the user facing documentation, present only for primitives
/// meant to show up in generated manuals.
pub struct Builtin<S> {
    pub name: &'static str,
    pub arity: usize,
    pub doc: Option<&'static str>,
    fun: BuiltinFn<S>,
}

impl<S> Builtin<S>
where
    S: EvalStore,
{
    pub(crate) fn new(
        name: &'static str,
        arity: usize,
        doc: Option<&'static str>,
        fun: BuiltinFn<S>,
    ) -> Self {
        Self {
            name,
            arity,
            doc,
            fun,
        }
    }

    pub fn call(
        &self,
        eval: &Evaluator<S>,
        args: &[Value],
        pos: Pos,
    ) -> Result<Value, EvalError> {
        if args.len() != self.arity {
            return Err(EvalError::Arity {
                name: self.name,
                expected: self.arity,
                got: args.len(),
            });
        }
        (self.fun)(eval, args, pos)
    }
}
