use crate::api::Store;
use anyhow::Result;
use kiln_core::store::{EvalStore, StorePath};
use tokio::runtime::Handle;
use tokio::task;

/// Adapter that lets the synchronous evaluator call an async store.
///
/// Ensuring a path blocks the calling evaluation thread until the store
/// is done, which is exactly the contract the primitives expect. Needs a
/// multi thread runtime, `block_in_place` panics on the current thread
/// flavor.
pub struct BlockingStore<S> {
    store: S,
    handle: Handle,
}

impl<S> BlockingStore<S>
where
    S: Store,
{
    pub fn new(store: S, handle: Handle) -> Self {
        Self { store, handle }
    }

    /// bridge onto the runtime of the calling task
    pub fn current(store: S) -> Self {
        Self::new(store, Handle::current())
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> EvalStore for BlockingStore<S>
where
    S: Store,
{
    fn store_dir(&self) -> &str {
        self.store.store_dir()
    }

    fn ensure_path(&self, path: &StorePath) -> Result<()> {
        task::block_in_place(|| self.handle.block_on(self.store.ensure_path(path)))
    }
}
