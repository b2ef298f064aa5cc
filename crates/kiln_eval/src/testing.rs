//! A store fake for the unit tests: a set of paths that exist, everything
//! else fails to ensure. Records which paths were ensured.

use anyhow::{Result, bail};
use kiln_core::hash::{self, PATH_DIGEST_LEN};
use kiln_core::store::{EvalStore, StorePath};
use std::cell::RefCell;
use std::collections::BTreeSet;

pub const TEST_STORE_DIR: &str = "/kiln/store";

#[derive(Default)]
pub struct TestStore {
    valid: BTreeSet<StorePath>,
    ensured: RefCell<Vec<StorePath>>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paths(names: &[&str]) -> Self {
        Self {
            valid: names.iter().map(|name| Self::path(name)).collect(),
            ensured: RefCell::new(Vec::new()),
        }
    }

    /// a store path whose hash part is derived from the name alone
    pub fn path(name: &str) -> StorePath {
        let mut digest = [0; PATH_DIGEST_LEN];
        for (i, b) in name.bytes().enumerate() {
            digest[i % PATH_DIGEST_LEN] ^= b;
        }
        StorePath::from_base(&format!("{}-{name}", hash::base32(&digest))).unwrap()
    }

    /// the printed form of [`TestStore::path`]
    pub fn printed(name: &str) -> String {
        format!("{TEST_STORE_DIR}/{}", Self::path(name))
    }

    pub fn ensured(&self) -> Vec<StorePath> {
        self.ensured.borrow().clone()
    }
}

impl EvalStore for TestStore {
    fn store_dir(&self) -> &str {
        TEST_STORE_DIR
    }

    fn ensure_path(&self, path: &StorePath) -> Result<()> {
        self.ensured.borrow_mut().push(path.clone());
        if self.valid.contains(path) {
            Ok(())
        } else {
            bail!(
                "path '{}' is not valid and cannot be realized",
                self.print_store_path(path)
            )
        }
    }
}
