//! Address checksum validation
//!
//! The sole source of truth for whether a string is a well-formed address and
//! which network it belongs to. Everything that accepts an address into the
//! vault goes through `classify`.

use crate::error::WalletError;
use crate::network::NetworkId;
use bitcoin::base58;
use sha2::{Digest, Sha256};

/// Length of a decoded base58check address: 1 version byte, 20 payload
/// bytes, 4 checksum bytes.
const DECODED_LEN: usize = 25;
const CHECKSUM_LEN: usize = 4;

/// Decode and checksum-verify an address, returning its version byte.
pub fn classify(address: &str) -> Result<u8, WalletError> {
    let decoded =
        base58::decode(address).map_err(|_| WalletError::InvalidAddress(address.to_string()))?;

    if decoded.len() != DECODED_LEN {
        return Err(WalletError::InvalidAddress(address.to_string()));
    }

    let (payload, checksum) = decoded.split_at(DECODED_LEN - CHECKSUM_LEN);
    let digest = Sha256::digest(Sha256::digest(payload));
    if digest[..CHECKSUM_LEN] != *checksum {
        return Err(WalletError::InvalidAddress(address.to_string()));
    }

    Ok(payload[0])
}

/// `classify` plus the requirement that the version byte maps to a
/// registered network.
pub fn network_of(address: &str) -> Result<NetworkId, WalletError> {
    let version = classify(address)?;
    NetworkId::from_version_byte(version).ok_or(WalletError::UnsupportedNetwork(version))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BURN_ADDRESS: &str = "1BitcoinEaterAddressDontSendf59kuE";

    #[test]
    fn test_classify_known_bitcoin_address() {
        assert_eq!(classify(BURN_ADDRESS).unwrap(), 0x00);
        assert_eq!(network_of(BURN_ADDRESS).unwrap(), NetworkId::Bitcoin);
    }

    #[test]
    fn test_corrupted_checksum_rejected() {
        // Flip the last character
        let mut corrupted = BURN_ADDRESS.to_string();
        corrupted.pop();
        corrupted.push('F');
        assert!(matches!(
            classify(&corrupted),
            Err(WalletError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_non_base58_rejected() {
        assert!(classify("not+base58!").is_err());
        assert!(classify("").is_err());
    }

    #[test]
    fn test_wrong_length_rejected() {
        // Valid base58 but decodes to fewer than 25 bytes
        let short = base58::encode(&[0u8; 10]);
        assert!(matches!(
            classify(&short),
            Err(WalletError::InvalidAddress(_))
        ));
        let long = base58::encode(&[0u8; 30]);
        assert!(classify(&long).is_err());
    }

    #[test]
    fn test_constructed_address_any_version() {
        // Build a syntactically valid address for an arbitrary version byte
        let mut decoded = vec![0x42u8];
        decoded.extend_from_slice(&[7u8; 20]);
        let digest = Sha256::digest(Sha256::digest(&decoded));
        decoded.extend_from_slice(&digest[..4]);
        let address = base58::encode(&decoded);

        assert_eq!(classify(&address).unwrap(), 0x42);
        // 0x42 is not a registered network
        assert!(matches!(
            network_of(&address),
            Err(WalletError::UnsupportedNetwork(0x42))
        ));
    }

    #[test]
    fn test_single_bit_payload_corruption_rejected() {
        let mut decoded = vec![0x00u8];
        decoded.extend_from_slice(&[9u8; 20]);
        let digest = Sha256::digest(Sha256::digest(&decoded));
        decoded.extend_from_slice(&digest[..4]);

        // Corrupt one payload bit after the checksum was computed
        decoded[5] ^= 0x01;
        let address = base58::encode(&decoded);
        assert!(classify(&address).is_err());
    }
}
