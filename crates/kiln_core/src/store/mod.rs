pub mod config;

use crate::hash::{self, Hash};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, ops::Deref};
use thiserror::Error;

/// LENGTH of the base32 encoded hash part of a store path
pub const HASH_PART_LEN: usize = 32;

/// name suffix that marks a store path as a derivation
pub const DRV_EXT: &str = ".drv";

#[derive(Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
/// A path inside of the store, kept in its base form `<hash>-<name>`
/// without the store directory prefix
// to be more general we could have used OsString
// but for our purposes it is useful to be able to
// serialize the data into utf-8 strings
pub struct StorePath(String);

impl StorePath {
    pub fn new(hash: &Hash, name: &str) -> Self {
        Self(format!("{}-{name}", hash::base32(&hash.to_path_digest())))
    }

    /// parse the base form `<hash>-<name>`
    pub fn from_base(s: &str) -> Result<Self, InvalidStorePath> {
        // every byte up to and including the separator must be ascii,
        // so the name part always starts at a char boundary
        if s.len() < HASH_PART_LEN + 2 {
            return Err(InvalidStorePath::TooShort(s.to_string()));
        }
        let bytes = s.as_bytes();
        if !bytes[..HASH_PART_LEN].iter().all(|b| hash::is_base32_char(*b)) {
            return Err(InvalidStorePath::BadHashPart(s.to_string()));
        }
        if bytes[HASH_PART_LEN] != b'-' {
            return Err(InvalidStorePath::MissingSeparator(s.to_string()));
        }
        if !is_valid_name(&s[HASH_PART_LEN + 1..]) {
            return Err(InvalidStorePath::BadName(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// parse the printed form `<store_dir>/<hash>-<name>`
    pub fn parse(store_dir: &str, s: &str) -> Result<Self, InvalidStorePath> {
        let base = s
            .strip_prefix(store_dir)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| InvalidStorePath::NotInStore {
                path: s.to_string(),
                store_dir: store_dir.to_string(),
            })?;
        Self::from_base(base)
    }

    pub fn hash_part(&self) -> &str {
        &self.0[..HASH_PART_LEN]
    }

    pub fn name_part(&self) -> &str {
        &self.0[HASH_PART_LEN + 1..]
    }

    pub fn is_derivation(&self) -> bool {
        self.name_part().ends_with(DRV_EXT)
    }
}

// deserialization goes through the same validation as parsing, a string
// that is not in base form never becomes a StorePath
impl<'de> Deserialize<'de> for StorePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StorePath::from_base(&s).map_err(serde::de::Error::custom)
    }
}

impl Display for StorePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for StorePath {
    type Target = String;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStorePath {
    #[error("path '{path}' is not in the store directory '{store_dir}'")]
    NotInStore { path: String, store_dir: String },
    #[error("store path '{0}' is too short")]
    TooShort(String),
    #[error("store path '{0}' does not have a base32 hash part")]
    BadHashPart(String),
    #[error("store path '{0}' is missing the '-' after the hash part")]
    MissingSeparator(String),
    #[error("store path '{0}' has an invalid name part")]
    BadName(String),
}

pub fn is_valid_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+')
}

pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_valid_name_char)
}

/// The store surface the evaluator needs. Implementations decide what
/// ensuring a path means: a local store can only check that the path
/// is already valid, smarter stores may substitute or build it.
pub trait EvalStore {
    fn store_dir(&self) -> &str;

    fn ensure_path(&self, path: &StorePath) -> Result<()>;

    fn print_store_path(&self, path: &StorePath) -> String {
        format!("{}/{path}", self.store_dir())
    }

    fn parse_store_path(&self, s: &str) -> Result<StorePath, InvalidStorePath> {
        StorePath::parse(self.store_dir(), s)
    }

    fn is_store_path(&self, s: &str) -> bool {
        self.parse_store_path(s).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "arhvjaf6zmlyn8vh8fgn55rpwnxq0n7l";

    #[test]
    fn base_form_round_trips() {
        let path = StorePath::from_base(&format!("{HASH}-a.drv")).unwrap();
        assert_eq!(path.hash_part(), HASH);
        assert_eq!(path.name_part(), "a.drv");
        assert_eq!(path.to_string(), format!("{HASH}-a.drv"));
    }

    #[test]
    fn derivation_detection() {
        let drv = StorePath::from_base(&format!("{HASH}-hello-1.0.drv")).unwrap();
        assert!(drv.is_derivation());
        let plain = StorePath::from_base(&format!("{HASH}-hello-1.0")).unwrap();
        assert!(!plain.is_derivation());
        // .drv must be a suffix of the name, not a substring
        let tricky = StorePath::from_base(&format!("{HASH}-hello.drv.patch")).unwrap();
        assert!(!tricky.is_derivation());
    }

    #[test]
    fn rejects_bad_hash_part() {
        // 'e' is not in the alphabet
        let mut s = String::from(HASH);
        s.replace_range(0..1, "e");
        let err = StorePath::from_base(&format!("{s}-name")).unwrap_err();
        assert_eq!(err, InvalidStorePath::BadHashPart(format!("{s}-name")));
    }

    #[test]
    fn rejects_short_and_unseparated() {
        assert_eq!(
            StorePath::from_base("abc").unwrap_err(),
            InvalidStorePath::TooShort("abc".to_string())
        );
        let s = format!("{HASH}xname");
        assert_eq!(
            StorePath::from_base(&s).unwrap_err(),
            InvalidStorePath::MissingSeparator(s)
        );
    }

    #[test]
    fn accepts_plus_in_names() {
        let path = StorePath::from_base(&format!("{HASH}-gtk+-2.24")).unwrap();
        assert_eq!(path.name_part(), "gtk+-2.24");
    }

    #[test]
    fn rejects_bad_name() {
        let s = format!("{HASH}-na me");
        assert_eq!(
            StorePath::from_base(&s).unwrap_err(),
            InvalidStorePath::BadName(s)
        );
        let s = format!("{HASH}-");
        assert!(StorePath::from_base(&s).is_err());
    }

    #[test]
    fn parse_strips_store_dir() {
        let s = format!("/kiln/store/{HASH}-a.drv");
        let path = StorePath::parse("/kiln/store", &s).unwrap();
        assert_eq!(path.name_part(), "a.drv");

        let err = StorePath::parse("/kiln/store", "/elsewhere/x").unwrap_err();
        assert!(matches!(err, InvalidStorePath::NotInStore { .. }));
    }

    #[test]
    fn parse_rejects_paths_below_a_store_path() {
        let s = format!("/kiln/store/{HASH}-a.drv/output");
        assert!(StorePath::parse("/kiln/store", &s).is_err());
    }

    #[test]
    fn new_renders_folded_digest() {
        let path = StorePath::new(&Hash::Sha256([0; 32]), "empty");
        assert_eq!(path.hash_part(), "0".repeat(32));
        assert_eq!(path.name_part(), "empty");
    }

    #[test]
    fn serde_round_trips_through_validation() {
        #[derive(Serialize, Deserialize)]
        struct Doc {
            path: StorePath,
        }

        let doc: Doc = toml::from_str(&format!("path = \"{HASH}-a.drv\"")).unwrap();
        assert!(doc.path.is_derivation());
        assert_eq!(
            toml::to_string(&doc).unwrap().trim(),
            format!("path = \"{HASH}-a.drv\"")
        );
        // malformed paths are rejected at the boundary, not on first use
        assert!(toml::from_str::<Doc>("path = \"abc\"").is_err());
        assert!(toml::from_str::<Doc>(&format!("path = \"{HASH}x\"")).is_err());
    }

    #[test]
    fn non_ascii_input_does_not_panic() {
        assert!(StorePath::from_base("é").is_err());
        assert!(StorePath::from_base(&"é".repeat(40)).is_err());
    }
}
