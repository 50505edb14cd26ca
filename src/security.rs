//! Password guard
//!
//! The wallet password is never stored; only its double SHA-256 fingerprint
//! is. An empty fingerprint means protection is disabled, in which case every
//! candidate verifies, including the empty string.

use crate::error::WalletError;
use crate::storage::VaultRepository;
use sha2::{Digest, Sha256};

/// Double SHA-256 fingerprint of a password: the second hash runs over the
/// lowercase hex encoding of the first.
pub fn fingerprint(password: &str) -> String {
    let first = hex::encode(Sha256::digest(password.as_bytes()));
    hex::encode(Sha256::digest(first.as_bytes()))
}

/// Set or clear the wallet password. An empty password clears the
/// fingerprint, disabling protection.
pub fn set_password(repo: &dyn VaultRepository, new_password: &str) -> Result<(), WalletError> {
    let mut settings = repo.load_security();
    if new_password.is_empty() {
        log::info!("Wallet password protection disabled");
        settings.password_fingerprint.clear();
    } else {
        settings.password_fingerprint = fingerprint(new_password);
    }
    repo.save_security(&settings)?;
    Ok(())
}

/// Check a candidate password against the stored fingerprint.
///
/// With no fingerprint stored this is always true: the unset password is a
/// deliberate "protection disabled" state. Otherwise the candidate must be
/// non-empty and its fingerprint must match exactly.
pub fn verify(repo: &dyn VaultRepository, candidate: &str) -> bool {
    let settings = repo.load_security();
    if settings.password_fingerprint.is_empty() {
        return true;
    }
    if candidate.is_empty() {
        return false;
    }
    fingerprint(candidate) == settings.password_fingerprint
}

/// Whether a password is currently configured.
pub fn password_set(repo: &dyn VaultRepository) -> bool {
    !repo.load_security().password_fingerprint.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStore;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::with_base_dir(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn test_no_fingerprint_verifies_everything() {
        let (_dir, store) = store();
        assert!(verify(&store, ""));
        assert!(verify(&store, "anything"));
        assert!(!password_set(&store));
    }

    #[test]
    fn test_set_password_then_verify() {
        let (_dir, store) = store();
        set_password(&store, "abc").unwrap();

        assert!(password_set(&store));
        assert!(verify(&store, "abc"));
        assert!(!verify(&store, ""));
        assert!(!verify(&store, "wrong"));
        assert!(!verify(&store, "ABC"));
    }

    #[test]
    fn test_clearing_password_disables_protection() {
        let (_dir, store) = store();
        set_password(&store, "abc").unwrap();
        set_password(&store, "").unwrap();

        assert!(!password_set(&store));
        assert!(verify(&store, "whatever"));
        assert!(verify(&store, ""));
    }

    #[test]
    fn test_fingerprint_is_double_hash_of_hex() {
        // sha256("abc") has a well-known digest; the fingerprint must hash
        // its hex encoding, not the raw bytes
        let first = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        let expected = hex::encode(sha2::Sha256::digest(first.as_bytes()));
        assert_eq!(fingerprint("abc"), expected);
    }
}
