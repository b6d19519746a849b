//! Signing key material on the local filesystem.

mod file_key_store;
mod fingerprint;

pub use file_key_store::{
    DEFAULT_PRIVATE_KEY_FILE, DEFAULT_PUBLIC_KEY_FILE, FileKeyStore, KeyPairPem, KeyStoreError,
    LoadedKeys, RSA_KEY_BITS, generate_key_pair,
};
pub use fingerprint::public_key_fingerprint;
