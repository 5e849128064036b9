//! Address format checks for the request boundary
//!
//! Scoring never looks at addresses. These checks run before metrics are
//! accepted, the same place fetchers validate their input.

use base32::Alphabet;
use thiserror::Error;

/// Address validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid Stellar address format: {0}")]
    InvalidStellarFormat(String),

    #[error("Invalid Stellar address checksum")]
    InvalidStellarChecksum,

    #[error("Invalid Polkadot address format: {0}")]
    InvalidPolkadotFormat(String),
}

/// StrKey version byte of an ed25519 account id ('G')
const ACCOUNT_ID_VERSION_BYTE: u8 = 6 << 3;

const STELLAR_ADDRESS_LEN: usize = 56;

const SS58_BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Check a Stellar account id: `G` + 55 base32 chars, with a valid StrKey
/// version byte and CRC16-XModem checksum.
pub fn validate_stellar_address(address: &str) -> Result<(), AddressError> {
    if !address.starts_with('G') {
        return Err(AddressError::InvalidStellarFormat(
            "must start with 'G'".to_string(),
        ));
    }
    if address.len() != STELLAR_ADDRESS_LEN {
        return Err(AddressError::InvalidStellarFormat(format!(
            "expected {} characters, got {}",
            STELLAR_ADDRESS_LEN,
            address.len()
        )));
    }
    if !address
        .chars()
        .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c))
    {
        return Err(AddressError::InvalidStellarFormat(
            "contains characters outside the base32 alphabet".to_string(),
        ));
    }

    let decoded = base32::decode(Alphabet::Rfc4648 { padding: false }, address)
        .ok_or_else(|| AddressError::InvalidStellarFormat("invalid base32 encoding".to_string()))?;

    // 1 version byte + 32 key bytes + 2 checksum bytes
    if decoded.len() != 35 || decoded[0] != ACCOUNT_ID_VERSION_BYTE {
        return Err(AddressError::InvalidStellarFormat(
            "not an account id".to_string(),
        ));
    }

    if decoded[33..35] != crc16_xmodem(&decoded[..33]) {
        return Err(AddressError::InvalidStellarChecksum);
    }

    Ok(())
}

/// Check an SS58 address: 47 or 48 characters of the base58 alphabet
pub fn validate_polkadot_address(address: &str) -> Result<(), AddressError> {
    if !(47..=48).contains(&address.len()) {
        return Err(AddressError::InvalidPolkadotFormat(format!(
            "expected 47 or 48 characters, got {}",
            address.len()
        )));
    }
    if !address.chars().all(|c| SS58_BASE58_ALPHABET.contains(c)) {
        return Err(AddressError::InvalidPolkadotFormat(
            "contains characters outside the base58 alphabet".to_string(),
        ));
    }
    Ok(())
}

pub fn is_valid_stellar_address(address: &str) -> bool {
    validate_stellar_address(address).is_ok()
}

pub fn is_valid_polkadot_address(address: &str) -> bool {
    validate_polkadot_address(address).is_ok()
}

/// CRC16-XModem, little-endian as StrKey stores it
fn crc16_xmodem(data: &[u8]) -> [u8; 2] {
    let mut crc: u16 = 0;

    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }

    [(crc & 0xff) as u8, (crc >> 8) as u8]
}
