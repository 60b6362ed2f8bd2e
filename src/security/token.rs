//! Anti-forgery secret and token derivation.
//!
//! A session secret lives in the HTTP-only cookie. Tokens handed to client code are
//! `salt-digest`, where `digest = base64url(SHA-256("salt-secret"))`. A fresh salt
//! per issuance means every token is distinct, yet all of them verify against the
//! same secret.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SECRET_BYTES: usize = 18;
const SALT_LEN: usize = 8;

/// Per-session secret bound to the HTTP-only cookie.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn generate() -> Self {
        let bytes: [u8; SECRET_BYTES] = rand::random();
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Accept a cookie value only if it decodes to a secret of the expected size.
    pub fn parse(raw: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(raw).ok()?;
        (bytes.len() == SECRET_BYTES).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive a new token for this secret.
    pub fn issue(&self) -> String {
        let salt: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LEN)
            .map(char::from)
            .collect();
        format!("{}-{}", salt, self.digest(&salt))
    }

    /// Check a client-supplied token against this secret in constant time.
    pub fn verify(&self, token: &str) -> bool {
        let Some((salt, digest)) = token.split_once('-') else {
            return false;
        };
        if salt.len() != SALT_LEN {
            return false;
        }
        let expected = self.digest(salt);
        expected.as_bytes().ct_eq(digest.as_bytes()).into()
    }

    fn digest(&self, salt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(b"-");
        hasher.update(self.0.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}
