use crate::builtins::{self, Builtin};
use crate::error::EvalError;
use crate::pos::Pos;
use crate::value::{Attrs, KilnString, Value};
use kiln_core::store::EvalStore;
use kiln_core::store::config::{CONFIG, Config};
use std::collections::BTreeMap;

/// the attribute through which an attribute set, typically a derivation
/// result, exposes the store path it stands for
pub const OUT_PATH_ATTR: &str = "outPath";

/// Ties a store to the primitives and carries evaluation wide settings.
///
/// The store type is a parameter so the primitives stay oblivious to
/// whether paths are checked against a real store, a remote one or a
/// fake used in tests.
pub struct Evaluator<S> {
    store: S,
    read_only: bool,
    builtins: BTreeMap<&'static str, Builtin<S>>,
}

impl<S> Evaluator<S>
where
    S: EvalStore,
{
    /// an evaluator configured by the process wide [`CONFIG`]
    pub fn new(store: S) -> Self {
        Self::from_config(store, &CONFIG)
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        Self {
            store,
            read_only: config.read_only,
            builtins: builtins::context_builtins()
                .into_iter()
                .map(|b| (b.name, b))
                .collect(),
        }
    }

    /// in read only mode primitives never touch the store,
    /// they only look at the shape of store paths
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn call_builtin(&self, name: &str, args: &[Value], pos: Pos) -> Result<Value, EvalError> {
        let Some(builtin) = self.builtins.get(name) else {
            return Err(EvalError::UnknownBuiltin(name.to_string()));
        };
        builtin.call(self, args, pos)
    }

    /// the registered primitives in name order
    pub fn builtins(&self) -> impl Iterator<Item = &Builtin<S>> {
        self.builtins.values()
    }

    pub fn force_bool(&self, v: &Value, pos: Pos, ctx: &str) -> Result<bool, EvalError> {
        match v {
            Value::Bool(b) => Ok(*b),
            v => Err(self.type_error("a boolean", v, pos, ctx)),
        }
    }

    pub fn force_string(&self, v: &Value, pos: Pos, ctx: &str) -> Result<KilnString, EvalError> {
        match v {
            Value::Str(s) => Ok(s.clone()),
            v => Err(self.type_error("a string", v, pos, ctx)),
        }
    }

    /// force a string that must not carry context, e.g. an output name
    pub fn force_string_no_context(
        &self,
        v: &Value,
        pos: Pos,
        ctx: &str,
    ) -> Result<String, EvalError> {
        let s = self.force_string(v, pos, ctx)?;
        if s.has_context() {
            return Err(EvalError::UnexpectedContext {
                text: s.text().to_string(),
                ctx: ctx.to_string(),
                pos,
            });
        }
        Ok(s.text().to_string())
    }

    pub fn force_list<'v>(
        &self,
        v: &'v Value,
        pos: Pos,
        ctx: &str,
    ) -> Result<&'v [Value], EvalError> {
        match v {
            Value::List(items) => Ok(items),
            v => Err(self.type_error("a list", v, pos, ctx)),
        }
    }

    pub fn force_attrs<'v>(
        &self,
        v: &'v Value,
        pos: Pos,
        ctx: &str,
    ) -> Result<&'v Attrs, EvalError> {
        match v {
            Value::Attrs(attrs) => Ok(attrs),
            v => Err(self.type_error("an attribute set", v, pos, ctx)),
        }
    }

    /// Coerce a value to a string, keeping whatever context it carries.
    ///
    /// Strings coerce to themselves. An attribute set with an `outPath`
    /// attribute coerces to whatever that attribute coerces to, the way
    /// derivation results turn into their output path when spliced into
    /// a string. Everything else is rejected.
    pub fn coerce_to_string(
        &self,
        v: &Value,
        pos: Pos,
        ctx: &str,
    ) -> Result<KilnString, EvalError> {
        match v {
            Value::Str(s) => Ok(s.clone()),
            Value::Attrs(attrs) => match attrs.get(OUT_PATH_ATTR) {
                Some(out) => self.coerce_to_string(out, pos, ctx),
                None => Err(EvalError::Coercion {
                    got: "an attribute set without an outPath attribute",
                    ctx: ctx.to_string(),
                    pos,
                }),
            },
            v => Err(EvalError::Coercion {
                got: v.type_name(),
                ctx: ctx.to_string(),
                pos,
            }),
        }
    }

    fn type_error(&self, expected: &'static str, got: &Value, pos: Pos, ctx: &str) -> EvalError {
        EvalError::Type {
            expected,
            got: got.type_name(),
            ctx: ctx.to_string(),
            pos,
        }
    }
}
