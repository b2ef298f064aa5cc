use kiln_eval::builtins::context_builtins;
use kiln_store::stores::bridge::BlockingStore;
use kiln_store::stores::local::LocalStore;

type S = BlockingStore<LocalStore>;

/// print the builtin registry, in registration order
pub fn builtins_cli() {
    for builtin in context_builtins::<S>() {
        match builtin.doc.and_then(|doc| doc.lines().next()) {
            Some(summary) => println!("{} /{}  {summary}", builtin.name, builtin.arity),
            None => println!("{} /{}", builtin.name, builtin.arity),
        }
    }
}
