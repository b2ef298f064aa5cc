use kiln_core::hash::Hash;
use kiln_core::store::StorePath;

/// Database ID
pub type ID = u32;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreObj {
    pub path: StorePath,
    pub hash: Hash,
}
