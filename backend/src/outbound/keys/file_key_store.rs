//! RSA key pair persisted as PEM files in a directory.
//!
//! The private key is written as PKCS#1 PEM with mode `0600`; the public key
//! as SPKI PEM. When either file is missing a fresh 2048-bit pair replaces
//! both.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cap_std::fs::{Dir, OpenOptions};
use cap_std::ambient_authority;
use rand::rngs::OsRng;
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::pkcs8::EncodePublicKey;
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::{SigningKeys, TokenError};

use super::fingerprint::public_key_fingerprint;

/// RSA modulus size for generated keys.
pub const RSA_KEY_BITS: usize = 2048;
/// Default private key file name.
pub const DEFAULT_PRIVATE_KEY_FILE: &str = "app.rsa";
/// Default public key file name.
pub const DEFAULT_PUBLIC_KEY_FILE: &str = "app.rsa.pub";

/// Failures while loading or generating key material.
#[derive(Debug, thiserror::Error)]
pub enum KeyStoreError {
    #[error("key file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to generate key pair: {message}")]
    Generate { message: String },
    #[error(transparent)]
    Invalid(#[from] TokenError),
}

impl KeyStoreError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// PEM-encoded key pair.
pub struct KeyPairPem {
    /// PKCS#1 PEM.
    pub private_pem: Zeroizing<String>,
    /// SPKI PEM.
    pub public_pem: String,
}

/// Generate a fresh RSA key pair.
pub fn generate_key_pair() -> Result<KeyPairPem, KeyStoreError> {
    let generate = |message: String| KeyStoreError::Generate { message };
    let private = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS).map_err(|e| generate(e.to_string()))?;
    let private_pem = private
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(|e| generate(e.to_string()))?;
    let public_pem = RsaPublicKey::from(&private)
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| generate(e.to_string()))?;
    Ok(KeyPairPem {
        private_pem: Zeroizing::new(private_pem.as_str().to_owned()),
        public_pem,
    })
}

/// Keys ready for the token service.
#[derive(Debug)]
pub struct LoadedKeys {
    pub signing: SigningKeys,
    /// Truncated SHA-256 of the public key PEM.
    pub fingerprint: String,
    /// Whether this call created the files.
    pub generated: bool,
}

/// Loads the key pair from `dir`, generating it on first use.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    dir: PathBuf,
    private_file: String,
    public_file: String,
}

impl FileKeyStore {
    pub fn new(
        dir: impl Into<PathBuf>,
        private_file: impl Into<String>,
        public_file: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            private_file: private_file.into(),
            public_file: public_file.into(),
        }
    }

    /// Store using `app.rsa` and `app.rsa.pub` inside `dir`.
    pub fn with_default_names(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, DEFAULT_PRIVATE_KEY_FILE, DEFAULT_PUBLIC_KEY_FILE)
    }

    pub fn private_key_path(&self) -> PathBuf {
        self.dir.join(&self.private_file)
    }

    pub fn public_key_path(&self) -> PathBuf {
        self.dir.join(&self.public_file)
    }

    /// Load both PEM files, or generate and persist a new pair when either
    /// is missing.
    pub fn load_or_generate(&self) -> Result<LoadedKeys, KeyStoreError> {
        Dir::create_ambient_dir_all(&self.dir, ambient_authority())
            .map_err(|err| KeyStoreError::io(&self.dir, err))?;
        let dir = Dir::open_ambient_dir(&self.dir, ambient_authority())
            .map_err(|err| KeyStoreError::io(&self.dir, err))?;

        let both_present =
            dir.exists(Path::new(&self.private_file)) && dir.exists(Path::new(&self.public_file));
        let (pem, generated) = if both_present {
            (self.read_pair(&dir)?, false)
        } else {
            let pem = generate_key_pair()?;
            self.write_pair(&dir, &pem)?;
            info!(
                private_key = %self.private_key_path().display(),
                public_key = %self.public_key_path().display(),
                "generated signing key pair"
            );
            (pem, true)
        };

        let signing = SigningKeys::from_pem(pem.private_pem.as_bytes(), pem.public_pem.as_bytes())?;
        Ok(LoadedKeys {
            signing,
            fingerprint: public_key_fingerprint(&pem.public_pem),
            generated,
        })
    }

    fn read_pair(&self, dir: &Dir) -> Result<KeyPairPem, KeyStoreError> {
        let private_pem = dir
            .read_to_string(Path::new(&self.private_file))
            .map_err(|err| KeyStoreError::io(self.private_key_path(), err))?;
        let public_pem = dir
            .read_to_string(Path::new(&self.public_file))
            .map_err(|err| KeyStoreError::io(self.public_key_path(), err))?;
        Ok(KeyPairPem {
            private_pem: Zeroizing::new(private_pem),
            public_pem,
        })
    }

    fn write_pair(&self, dir: &Dir, pem: &KeyPairPem) -> Result<(), KeyStoreError> {
        write_replacing(dir, &self.private_file, pem.private_pem.as_bytes(), 0o600)
            .map_err(|err| KeyStoreError::io(self.private_key_path(), err))?;
        write_replacing(dir, &self.public_file, pem.public_pem.as_bytes(), 0o644)
            .map_err(|err| KeyStoreError::io(self.public_key_path(), err))
    }
}

/// Replace `name` with `contents`, creating it with `mode` on Unix.
fn write_replacing(dir: &Dir, name: &str, contents: &[u8], mode: u32) -> io::Result<()> {
    match dir.remove_file(Path::new(name)) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use cap_std::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = dir.open_with(Path::new(name), &options)?;
    file.write_all(contents)?;
    file.sync_all()
}
