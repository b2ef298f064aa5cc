mod opt;
pub use opt::*;

use anyhow::Result;
use kiln_core::store::{InvalidStorePath, StorePath};
use std::path::Path;

/// The full store surface: adding objects, reference edges and path
/// validity. The evaluator only sees the narrow [`EvalStore`] slice of
/// this, through the blocking bridge.
///
/// [`EvalStore`]: kiln_core::store::EvalStore
#[allow(async_fn_in_trait)]
pub trait Store {
    fn store_dir(&self) -> &str;

    /// Add the file at `path` to the store, registering it together with
    /// its references. Returns the store path the content hashed to.
    async fn add_to_store<P>(&self, path: P, opt: Opt) -> Result<StorePath>
    where
        P: AsRef<Path>;

    async fn is_valid_path(&self, path: &StorePath) -> Result<bool>;

    /// Make `path` available, building or substituting it if this store
    /// knows how to. Fails if the path cannot be made valid.
    async fn ensure_path(&self, path: &StorePath) -> Result<()>;

    /// the paths `path` references, in path order
    async fn references(&self, path: &StorePath) -> Result<Vec<StorePath>>;

    fn print_store_path(&self, path: &StorePath) -> String {
        format!("{}/{path}", self.store_dir())
    }

    fn parse_store_path(&self, s: &str) -> Result<StorePath, InvalidStorePath> {
        StorePath::parse(self.store_dir(), s)
    }
}
