mod args;
pub use args::*;

use anyhow::{Result, anyhow};
use kiln_store::api::{Opt, Store};
use kiln_store::stores::local::{LocalStore, LocalStoreConfig};
use std::path::Path;

type S = LocalStore;

pub async fn add_cli(args: AddArgs) -> Result<()> {
    let store = S::open(LocalStoreConfig::default()).await?;
    let name = match args.name {
        Some(name) => name,
        None => Path::new(&args.path)
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToString::to_string)
            .ok_or_else(|| anyhow!("cannot derive a store name from '{}'", args.path))?,
    };
    let mut refs = Vec::new();
    for r in &args.refs {
        refs.push(store.parse_store_path(r)?);
    }
    let path = store
        .add_to_store(&args.path, Opt::new(&name).refs(refs))
        .await?;
    println!("{}", store.print_store_path(&path));
    Ok(())
}
