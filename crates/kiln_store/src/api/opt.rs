use kiln_core::hash::HashAlgo;
use kiln_core::store::StorePath;

/// Options for [`Store::add_to_store`](crate::api::Store::add_to_store).
pub struct Opt {
    /// algorithm used to hash the content
    pub algo: HashAlgo,
    /// name part of the resulting store path
    pub name: String,
    /// store paths the new object references; they must already be valid
    pub refs: Vec<StorePath>,
}

impl Opt {
    pub fn new(name: &str) -> Self {
        Self {
            algo: HashAlgo::Sha256,
            name: name.to_string(),
            refs: Vec::new(),
        }
    }

    pub fn refs(mut self, refs: Vec<StorePath>) -> Self {
        self.refs = refs;
        self
    }
}
