mod args;
pub use args::*;

use anyhow::Result;
use kiln_store::api::Store;
use kiln_store::stores::local::{LocalStore, LocalStoreConfig};

type S = LocalStore;

pub async fn ensure_cli(args: EnsureArgs) -> Result<()> {
    let store = S::open(LocalStoreConfig::default()).await?;
    let path = store.parse_store_path(&args.path)?;
    store.ensure_path(&path).await?;
    println!("{}", store.print_store_path(&path));
    Ok(())
}
