use base64::{Engine, engine::GeneralPurpose, prelude::BASE64_URL_SAFE_NO_PAD};
use std::fmt::Display;

pub const BASE64: GeneralPurpose = BASE64_URL_SAFE_NO_PAD;

/// LENGTH of the digest a hash is folded down to before rendering
/// as the hash part of a store path
pub const PATH_DIGEST_LEN: usize = 20;

/// base32 alphabet of the rendered hash part
/// like base32 but without the characters e o u t
pub const BASE32_CHARS: &[u8; 32] = b"0123456789abcdfghijklmnpqrsvwxyz";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashAlgo {
    Sha256,
    Sha512,
}

impl Display for HashAlgo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgo::Sha256 => write!(f, "sha256"),
            HashAlgo::Sha512 => write!(f, "sha512"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Hash {
    Sha256([u8; 32]),
    Sha512(Box<[u8; 64]>),
}

impl Hash {
    pub fn algo(&self) -> HashAlgo {
        match self {
            Hash::Sha256(_) => HashAlgo::Sha256,
            Hash::Sha512(_) => HashAlgo::Sha512,
        }
    }

    pub fn digest_as_bytes(&self) -> &[u8] {
        match self {
            Hash::Sha256(digest) => digest,
            Hash::Sha512(digest) => digest.as_ref(),
        }
    }

    pub fn base64(&self) -> String {
        BASE64.encode(self.digest_as_bytes())
    }

    pub fn base64_with_algo(&self) -> String {
        format!("{}:{}", self.algo(), self.base64())
    }

    /// fold the digest down to [`PATH_DIGEST_LEN`] bytes by xor-ing
    /// it onto itself, so that every digest byte still contributes
    pub fn to_path_digest(&self) -> [u8; PATH_DIGEST_LEN] {
        let mut folded = [0; PATH_DIGEST_LEN];
        for (i, b) in self.digest_as_bytes().iter().enumerate() {
            folded[i % PATH_DIGEST_LEN] ^= b;
        }
        folded
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{}", self.base64_with_algo())
    }
}

/// render bytes in the store path alphabet, 5 bits per character,
/// most significant bits first
pub fn base32(bytes: &[u8]) -> String {
    let nbits = bytes.len() * 8;
    let mut out = String::with_capacity(nbits.div_ceil(5));
    let mut acc: u32 = 0;
    let mut pending = 0;
    for &b in bytes {
        acc = (acc << 8) | u32::from(b);
        pending += 8;
        while pending >= 5 {
            pending -= 5;
            out.push(BASE32_CHARS[(acc >> pending) as usize & 0x1f] as char);
        }
    }
    if pending > 0 {
        out.push(BASE32_CHARS[(acc << (5 - pending)) as usize & 0x1f] as char);
    }
    out
}

pub fn is_base32_char(c: u8) -> bool {
    BASE32_CHARS.contains(&c)
}
