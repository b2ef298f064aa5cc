use crate::store::StorePath;
use std::collections::{BTreeSet, btree_set};

/// One dependency a string carries in its context.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContextElement {
    /// a store path referenced as-is, nothing has to be built for it
    Opaque { path: StorePath },
    /// a single output of a derivation that has to be built
    Built { drv_path: StorePath, output: String },
    /// a derivation file itself together with all of its outputs
    DrvDeep { drv_path: StorePath },
}

impl ContextElement {
    /// the store path the element refers to, whatever its flavor
    pub fn store_path(&self) -> &StorePath {
        match self {
            ContextElement::Opaque { path } => path,
            ContextElement::Built { drv_path, .. } | ContextElement::DrvDeep { drv_path } => {
                drv_path
            }
        }
    }
}

/// The set of dependencies attached to a string value.
///
/// Elements are deduplicated and iterated in a stable order, so two
/// strings built from the same dependencies compare equal no matter
/// in which order the dependencies were collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringContext(BTreeSet<ContextElement>);

impl StringContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn insert(&mut self, element: ContextElement) -> bool {
        self.0.insert(element)
    }

    pub fn contains(&self, element: &ContextElement) -> bool {
        self.0.contains(element)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, ContextElement> {
        self.0.iter()
    }

    pub fn union(&self, other: &StringContext) -> StringContext {
        let mut out = self.clone();
        out.0.extend(other.iter().cloned());
        out
    }
}

impl FromIterator<ContextElement> for StringContext {
    fn from_iter<I: IntoIterator<Item = ContextElement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<ContextElement> for StringContext {
    fn extend<I: IntoIterator<Item = ContextElement>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for StringContext {
    type Item = ContextElement;
    type IntoIter = btree_set::IntoIter<ContextElement>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a StringContext {
    type Item = &'a ContextElement;
    type IntoIter = btree_set::Iter<'a, ContextElement>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drv() -> StorePath {
        StorePath::from_base(&format!("{}-a.drv", "0".repeat(32))).unwrap()
    }

    fn out() -> StorePath {
        StorePath::from_base(&format!("{}-a", "1".repeat(32))).unwrap()
    }

    #[test]
    fn deduplicates() {
        let mut ctx = StringContext::new();
        assert!(ctx.insert(ContextElement::Opaque { path: out() }));
        assert!(!ctx.insert(ContextElement::Opaque { path: out() }));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn same_path_different_flavors_are_distinct() {
        let mut ctx = StringContext::new();
        ctx.insert(ContextElement::DrvDeep { drv_path: drv() });
        ctx.insert(ContextElement::Built {
            drv_path: drv(),
            output: "dev".to_string(),
        });
        ctx.insert(ContextElement::Built {
            drv_path: drv(),
            output: "bin".to_string(),
        });
        assert_eq!(ctx.len(), 3);
    }

    #[test]
    fn union_merges_without_duplicates() {
        let a: StringContext = [ContextElement::Opaque { path: out() }].into_iter().collect();
        let b: StringContext = [
            ContextElement::Opaque { path: out() },
            ContextElement::DrvDeep { drv_path: drv() },
        ]
        .into_iter()
        .collect();
        let u = a.union(&b);
        assert_eq!(u.len(), 2);
        assert!(u.contains(&ContextElement::Opaque { path: out() }));
        assert!(u.contains(&ContextElement::DrvDeep { drv_path: drv() }));
    }

    #[test]
    fn iteration_order_is_stable() {
        let forward: StringContext = [
            ContextElement::Opaque { path: out() },
            ContextElement::DrvDeep { drv_path: drv() },
        ]
        .into_iter()
        .collect();
        let backward: StringContext = [
            ContextElement::DrvDeep { drv_path: drv() },
            ContextElement::Opaque { path: out() },
        ]
        .into_iter()
        .collect();
        assert_eq!(forward, backward);
        let a: Vec<_> = forward.iter().collect();
        let b: Vec<_> = backward.iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn store_path_accessor() {
        assert_eq!(ContextElement::Opaque { path: out() }.store_path(), &out());
        assert_eq!(
            ContextElement::DrvDeep { drv_path: drv() }.store_path(),
            &drv()
        );
        assert_eq!(
            ContextElement::Built {
                drv_path: drv(),
                output: "bin".to_string(),
            }
            .store_path(),
            &drv()
        );
    }
}
