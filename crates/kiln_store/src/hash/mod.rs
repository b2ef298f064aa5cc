use anyhow::Result;
use kiln_core::hash::{Hash, HashAlgo};
use kiln_core::store::StorePath;
use sha2::{Digest, Sha256, Sha512};
use std::path::Path;
use tokio::fs;

pub async fn hash_file<P>(path: P, algo: HashAlgo) -> Result<Hash>
where
    P: AsRef<Path>,
{
    let buff = fs::read(path).await?;
    Ok(hash_bytes(&buff, algo))
}

pub fn hash_bytes(buff: &[u8], algo: HashAlgo) -> Hash {
    match algo {
        HashAlgo::Sha256 => Hash::Sha256(Sha256::digest(buff).into()),
        HashAlgo::Sha512 => Hash::Sha512(Box::new(Sha512::digest(buff).into())),
    }
}

/// Derive the store path of an object from its content hash and name.
/// The fingerprint `<algo>:<base64 digest>:<name>` is hashed once more so
/// that the path depends on both, whatever the content hash algorithm.
pub fn make_path(hash: &Hash, name: &str) -> StorePath {
    let mut hasher = Sha512::new();
    hasher.update(format!("{hash}:{name}"));
    let hash = Hash::Sha512(Box::new(hasher.finalize().into()));
    StorePath::new(&hash, name)
}
