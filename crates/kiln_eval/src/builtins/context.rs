use crate::builtins::Builtin;
use crate::error::EvalError;
use crate::eval::Evaluator;
use crate::pos::Pos;
use crate::value::{Attrs, KilnString, Value};
use kiln_core::context::{ContextElement, StringContext};
use kiln_core::store::{EvalStore, StorePath};
use std::collections::BTreeMap;

const PATH_ATTR: &str = "path";
const ALL_OUTPUTS_ATTR: &str = "allOutputs";
const OUTPUTS_ATTR: &str = "outputs";

/// the context primitives, in registration order
pub fn context_builtins<S>() -> Vec<Builtin<S>>
where
    S: EvalStore,
{
    vec![
        Builtin::new(
            "unsafeDiscardStringContext",
            1,
            None,
            unsafe_discard_string_context,
        ),
        Builtin::new(
            "hasContext",
            1,
            Some(
                "Return `true` if the string has a non-empty context.\n\
                 The context can be inspected with `getContext`.",
            ),
            has_context,
        ),
        Builtin::new(
            "unsafeDiscardOutputDependency",
            1,
            None,
            unsafe_discard_output_dependency,
        ),
        Builtin::new(
            "getContext",
            1,
            Some(
                "Return the context of the string as an attribute set keyed\n\
                 by printed store path. Every entry carries up to three\n\
                 attributes: `path` (boolean), `allOutputs` (boolean) and\n\
                 `outputs` (list of output names); attributes that do not\n\
                 apply are omitted. The result of `getContext` can be fed\n\
                 back to a string with `appendContext`.",
            ),
            get_context,
        ),
        Builtin::new("appendContext", 2, None, append_context),
    ]
}

fn unsafe_discard_string_context<S>(
    eval: &Evaluator<S>,
    args: &[Value],
    pos: Pos,
) -> Result<Value, EvalError>
where
    S: EvalStore,
{
    let s = eval.coerce_to_string(
        &args[0],
        pos,
        "while evaluating the argument passed to unsafeDiscardStringContext",
    )?;
    Ok(Value::Str(s.without_context()))
}

fn has_context<S>(eval: &Evaluator<S>, args: &[Value], pos: Pos) -> Result<Value, EvalError>
where
    S: EvalStore,
{
    let s = eval.force_string(
        &args[0],
        pos,
        "while evaluating the argument passed to hasContext",
    )?;
    Ok(Value::Bool(s.has_context()))
}

// Passing a derivation file to another derivation as a plain source input
// instead of a build dependency: every whole-derivation element is
// downgraded to an opaque reference to the derivation file itself.
fn unsafe_discard_output_dependency<S>(
    eval: &Evaluator<S>,
    args: &[Value],
    pos: Pos,
) -> Result<Value, EvalError>
where
    S: EvalStore,
{
    let s = eval.coerce_to_string(
        &args[0],
        pos,
        "while evaluating the argument passed to unsafeDiscardOutputDependency",
    )?;
    let context = s
        .iter_context()
        .map(|element| match element {
            ContextElement::DrvDeep { drv_path } => ContextElement::Opaque {
                path: drv_path.clone(),
            },
            other => other.clone(),
        })
        .collect();
    Ok(Value::Str(s.with_context(context)))
}

fn get_context<S>(eval: &Evaluator<S>, args: &[Value], pos: Pos) -> Result<Value, EvalError>
where
    S: EvalStore,
{
    #[derive(Default)]
    struct ContextInfo<'c> {
        path: bool,
        all_outputs: bool,
        outputs: Vec<&'c str>,
    }

    let s = eval.force_string(
        &args[0],
        pos,
        "while evaluating the argument passed to getContext",
    )?;

    let mut infos: BTreeMap<&StorePath, ContextInfo<'_>> = BTreeMap::new();
    for element in s.iter_context() {
        match element {
            ContextElement::Opaque { path } => infos.entry(path).or_default().path = true,
            ContextElement::DrvDeep { drv_path } => {
                infos.entry(drv_path).or_default().all_outputs = true;
            }
            ContextElement::Built { drv_path, output } => {
                infos.entry(drv_path).or_default().outputs.push(output);
            }
        }
    }

    let mut out = Attrs::new();
    for (path, info) in infos {
        let mut record = Attrs::new();
        if info.path {
            record.insert(PATH_ATTR.to_string(), Value::Bool(true));
        }
        if info.all_outputs {
            record.insert(ALL_OUTPUTS_ATTR.to_string(), Value::Bool(true));
        }
        if !info.outputs.is_empty() {
            record.insert(
                OUTPUTS_ATTR.to_string(),
                Value::list(info.outputs.into_iter().map(Value::from)),
            );
        }
        out.insert(eval.store().print_store_path(path), Value::attrs(record));
    }
    Ok(Value::attrs(out))
}

// The only primitive that lets context back in from user supplied data,
// so every key is parsed, ensured in the store unless evaluation is read
// only, and checked against the element flavor it is admitted as.
fn append_context<S>(eval: &Evaluator<S>, args: &[Value], pos: Pos) -> Result<Value, EvalError>
where
    S: EvalStore,
{
    let orig = eval.coerce_to_string(
        &args[0],
        pos,
        "while evaluating the first argument passed to appendContext",
    )?;
    let added = eval.force_attrs(
        &args[1],
        pos,
        "while evaluating the second argument passed to appendContext",
    )?;

    let mut context = orig.context().cloned().unwrap_or_default();
    for (key, value) in added {
        let Ok(path) = eval.store().parse_store_path(key) else {
            return Err(EvalError::NotAStorePath {
                key: key.clone(),
                pos,
            });
        };
        if !eval.is_read_only() {
            eval.store()
                .ensure_path(&path)
                .map_err(|source| EvalError::Store { source, pos })?;
        }
        let entry = eval.force_attrs(
            value,
            pos,
            "while evaluating a string context entry in appendContext",
        )?;

        if let Some(v) = entry.get(PATH_ATTR) {
            if eval.force_bool(
                v,
                pos,
                "while evaluating the `path` attribute of a string context",
            )? {
                context.insert(ContextElement::Opaque { path: path.clone() });
            }
        }

        if let Some(v) = entry.get(ALL_OUTPUTS_ATTR) {
            if eval.force_bool(
                v,
                pos,
                "while evaluating the `allOutputs` attribute of a string context",
            )? {
                if !path.is_derivation() {
                    return Err(EvalError::NotADerivation {
                        kind: "all-outputs",
                        path: eval.store().print_store_path(&path),
                        pos,
                    });
                }
                context.insert(ContextElement::DrvDeep {
                    drv_path: path.clone(),
                });
            }
        }

        if let Some(v) = entry.get(OUTPUTS_ATTR) {
            let outputs = eval.force_list(
                v,
                pos,
                "while evaluating the `outputs` attribute of a string context",
            )?;
            if !outputs.is_empty() && !path.is_derivation() {
                return Err(EvalError::NotADerivation {
                    kind: "derivation output",
                    path: eval.store().print_store_path(&path),
                    pos,
                });
            }
            for name in outputs {
                let output = eval.force_string_no_context(
                    name,
                    pos,
                    "while evaluating an output name within a string context",
                )?;
                context.insert(ContextElement::Built {
                    drv_path: path.clone(),
                    output,
                });
            }
        }
    }

    Ok(Value::Str(orig.with_context(context)))
}
