use kiln_core::context::{ContextElement, StringContext};
use kiln_core::hash::BASE32_CHARS;
use kiln_core::store::{EvalStore, StorePath};
use kiln_eval::{Evaluator, KilnString, Pos, Value};
use proptest::prelude::*;

/// a store where every path exists already
struct AnyStore;

impl EvalStore for AnyStore {
    fn store_dir(&self) -> &str {
        "/kiln/store"
    }

    fn ensure_path(&self, _path: &StorePath) -> anyhow::Result<()> {
        Ok(())
    }
}

fn string_with(text: &str, context: StringContext) -> Value {
    Value::Str(KilnString::from_parts(text, context))
}

fn context_of(v: &Value) -> StringContext {
    match v {
        Value::Str(s) => s.context().cloned().unwrap_or_default(),
        v => panic!("expected a string, got {v:?}"),
    }
}

fn text_of(v: &Value) -> &str {
    match v {
        Value::Str(s) => s.text(),
        v => panic!("expected a string, got {v:?}"),
    }
}

#[test]
fn inspect_discard_reappend() {
    let eval = Evaluator::new(AnyStore);
    let drv_path = StorePath::from_base("arhvjaf6zmlyn8vh8fgn55rpwnxq0n7l-a.drv").unwrap();
    let context: StringContext = [
        ContextElement::DrvDeep {
            drv_path: drv_path.clone(),
        },
        ContextElement::Built {
            drv_path,
            output: "out".to_string(),
        },
    ]
    .into_iter()
    .collect();
    let s = string_with("/kiln/store/arhvjaf6zmlyn8vh8fgn55rpwnxq0n7l-a.drv", context.clone());

    let has = eval
        .call_builtin("hasContext", std::slice::from_ref(&s), Pos::NONE)
        .unwrap();
    assert_eq!(has, Value::Bool(true));

    // structured view, then reconstruction on a fresh string of the same text
    let mapping = eval
        .call_builtin("getContext", std::slice::from_ref(&s), Pos::NONE)
        .unwrap();
    let rebuilt = eval
        .call_builtin(
            "appendContext",
            &[Value::from(text_of(&s)), mapping],
            Pos::NONE,
        )
        .unwrap();
    assert_eq!(rebuilt, s);

    // the discarded variant has the same text and no context at all
    let bare = eval
        .call_builtin("unsafeDiscardStringContext", &[s.clone()], Pos::NONE)
        .unwrap();
    assert_eq!(text_of(&bare), text_of(&s));
    assert!(context_of(&bare).is_empty());
    let has = eval
        .call_builtin("hasContext", &[bare], Pos::NONE)
        .unwrap();
    assert_eq!(has, Value::Bool(false));
}

#[test]
fn concat_then_inspect() {
    let eval = Evaluator::new(AnyStore);
    let a = KilnString::from_parts(
        "a",
        [ContextElement::Opaque {
            path: StorePath::from_base(&format!("{}-a", "0".repeat(32))).unwrap(),
        }]
        .into_iter()
        .collect(),
    );
    let b = KilnString::from_parts(
        "b",
        [ContextElement::DrvDeep {
            drv_path: StorePath::from_base(&format!("{}-b.drv", "1".repeat(32))).unwrap(),
        }]
        .into_iter()
        .collect(),
    );
    let joined = Value::Str(a.concat(&b));
    assert_eq!(text_of(&joined), "ab");

    let mapping = eval.call_builtin("getContext", &[joined], Pos::NONE).unwrap();
    let Value::Attrs(map) = mapping else {
        panic!("expected an attribute set");
    };
    assert_eq!(map.len(), 2);
}

fn hash_part() -> impl Strategy<Value = String> {
    let alphabet: Vec<char> = BASE32_CHARS.iter().map(|b| *b as char).collect();
    prop::collection::vec(prop::sample::select(alphabet), 32)
        .prop_map(|chars| chars.into_iter().collect())
}

// never ends in .drv, there is no '.' in the alphabet
fn plain_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}"
}

fn plain_path() -> impl Strategy<Value = StorePath> {
    (hash_part(), plain_name())
        .prop_map(|(hash, name)| StorePath::from_base(&format!("{hash}-{name}")).unwrap())
}

fn drv_path() -> impl Strategy<Value = StorePath> {
    (hash_part(), plain_name())
        .prop_map(|(hash, name)| StorePath::from_base(&format!("{hash}-{name}.drv")).unwrap())
}

// admissible through appendContext: Built and DrvDeep only for derivations
fn element() -> impl Strategy<Value = ContextElement> {
    prop_oneof![
        plain_path().prop_map(|path| ContextElement::Opaque { path }),
        drv_path().prop_map(|path| ContextElement::Opaque { path }),
        drv_path().prop_map(|drv_path| ContextElement::DrvDeep { drv_path }),
        (drv_path(), "[a-z]{1,6}").prop_map(|(drv_path, output)| ContextElement::Built {
            drv_path,
            output,
        }),
    ]
}

fn context() -> impl Strategy<Value = StringContext> {
    prop::collection::btree_set(element(), 0..6)
        .prop_map(|elements| elements.into_iter().collect())
}

proptest! {
    #[test]
    fn get_append_round_trips(context in context(), text in "[ -~]{0,12}") {
        let eval = Evaluator::new(AnyStore);
        let s = string_with(&text, context.clone());
        let mapping = eval.call_builtin("getContext", &[s], Pos::NONE).unwrap();
        let rebuilt = eval
            .call_builtin("appendContext", &[Value::from(text.as_str()), mapping], Pos::NONE)
            .unwrap();
        prop_assert_eq!(context_of(&rebuilt), context);
        prop_assert_eq!(text_of(&rebuilt), text.as_str());
    }

    #[test]
    fn discard_output_dependency_leaves_no_drv_deep(context in context(), text in "[ -~]{0,12}") {
        let eval = Evaluator::new(AnyStore);
        let s = string_with(&text, context.clone());
        let out = eval
            .call_builtin("unsafeDiscardOutputDependency", &[s], Pos::NONE)
            .unwrap();
        let ctx = context_of(&out);
        for element in ctx.iter() {
            prop_assert!(
                !matches!(element, ContextElement::DrvDeep { .. }),
                "unexpected DrvDeep element: {:?}",
                element
            );
        }
        // every deep element survives as an opaque one
        for element in context.iter() {
            if let ContextElement::DrvDeep { drv_path } = element {
                prop_assert!(
                    ctx.contains(&ContextElement::Opaque { path: drv_path.clone() }),
                    "missing opaque element for {:?}",
                    drv_path
                );
            } else {
                prop_assert!(ctx.contains(element));
            }
        }
        prop_assert_eq!(text_of(&out), text.as_str());
    }

    #[test]
    fn has_context_matches_emptiness(context in context()) {
        let eval = Evaluator::new(AnyStore);
        let s = string_with("x", context.clone());
        let has = eval.call_builtin("hasContext", &[s], Pos::NONE).unwrap();
        prop_assert_eq!(has, Value::Bool(!context.is_empty()));
    }
}
