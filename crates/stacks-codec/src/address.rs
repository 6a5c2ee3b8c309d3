//! Stacks Addresses - c32check encoding
//!
//! A Stacks address is `S` + version character + c32(hash160 || checksum),
//! where the checksum is the first 4 bytes of SHA256(SHA256(version || hash160)).

use ripemd::Ripemd160;
use secp256k1::PublicKey;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Mainnet single-sig address version (addresses start with `SP`)
pub const ADDRESS_VERSION_MAINNET_SINGLESIG: u8 = 22;
/// Testnet single-sig address version (addresses start with `ST`)
pub const ADDRESS_VERSION_TESTNET_SINGLESIG: u8 = 26;

const C32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const CHECKSUM_LEN: usize = 4;

/// Address encoding/decoding errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must start with 'S'")]
    MissingPrefix,

    #[error("invalid c32 character '{0}'")]
    InvalidCharacter(char),

    #[error("address payload has wrong length")]
    BadLength,

    #[error("address checksum mismatch")]
    BadChecksum,
}

/// A decoded Stacks address: version byte plus hash160 of the public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StacksAddress {
    pub version: u8,
    pub hash160: [u8; 20],
}

impl StacksAddress {
    /// Derive an address from a compressed public key
    pub fn from_public_key(version: u8, key: &PublicKey) -> Self {
        Self {
            version,
            hash160: hash160(&key.serialize()),
        }
    }

    /// Encode to the canonical c32check string form
    pub fn encode(&self) -> String {
        let check = checksum(self.version, &self.hash160);
        let mut payload = [0u8; 20 + CHECKSUM_LEN];
        payload[..20].copy_from_slice(&self.hash160);
        payload[20..].copy_from_slice(&check);

        let mut out = String::with_capacity(41);
        out.push('S');
        // version bytes are always < 32
        out.push(C32_ALPHABET[self.version as usize & 0x1f] as char);
        out.push_str(&c32_encode(&payload));
        out
    }

    /// Decode and checksum-verify a c32check address string
    pub fn decode(s: &str) -> Result<Self, AddressError> {
        let rest = s.strip_prefix('S').ok_or(AddressError::MissingPrefix)?;
        let mut chars = rest.bytes();
        let version_char = chars.next().ok_or(AddressError::BadLength)?;
        let version = c32_digit(version_char)?;

        let payload = c32_decode(&rest[1..], 20 + CHECKSUM_LEN)?;
        let mut hash160 = [0u8; 20];
        hash160.copy_from_slice(&payload[..20]);

        if payload[20..] != checksum(version, &hash160) {
            return Err(AddressError::BadChecksum);
        }
        Ok(Self { version, hash160 })
    }

    pub fn is_mainnet(&self) -> bool {
        self.version == ADDRESS_VERSION_MAINNET_SINGLESIG
    }
}

impl fmt::Display for StacksAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for StacksAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// RIPEMD160(SHA256(data))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

fn checksum(version: u8, hash160: &[u8; 20]) -> [u8; CHECKSUM_LEN] {
    let mut inner = Sha256::new();
    inner.update([version]);
    inner.update(hash160);
    let once = inner.finalize();
    let twice = Sha256::digest(once);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&twice[..CHECKSUM_LEN]);
    out
}

fn c32_digit(ch: u8) -> Result<u8, AddressError> {
    let upper = ch.to_ascii_uppercase();
    C32_ALPHABET
        .iter()
        .position(|&c| c == upper)
        .map(|i| i as u8)
        .ok_or(AddressError::InvalidCharacter(ch as char))
}

/// Base-32 big-integer encoding; leading zero bytes become leading '0' chars
fn c32_encode(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|b| **b == 0).count();

    // little-endian base-32 digits of the remaining big-endian integer
    let mut digits: Vec<u8> = Vec::new();
    let mut num = data[zeros..].to_vec();
    while !num.is_empty() {
        let mut rem = 0u32;
        let mut next = Vec::with_capacity(num.len());
        for &b in &num {
            let acc = (rem << 8) | b as u32;
            let q = (acc / 32) as u8;
            rem = acc % 32;
            if !next.is_empty() || q != 0 {
                next.push(q);
            }
        }
        digits.push(rem as u8);
        num = next;
    }

    let mut out = String::with_capacity(zeros + digits.len());
    for _ in 0..zeros {
        out.push('0');
    }
    for &d in digits.iter().rev() {
        out.push(C32_ALPHABET[d as usize] as char);
    }
    out
}

/// Inverse of [`c32_encode`], checked against an exact output length
fn c32_decode(s: &str, expected_len: usize) -> Result<Vec<u8>, AddressError> {
    let zeros = s.bytes().take_while(|b| *b == b'0').count();

    let mut num: Vec<u8> = Vec::new();
    for ch in s[zeros..].bytes() {
        let mut carry = c32_digit(ch)? as u32;
        for b in num.iter_mut().rev() {
            let acc = (*b as u32) * 32 + carry;
            *b = (acc & 0xff) as u8;
            carry = acc >> 8;
        }
        while carry > 0 {
            num.insert(0, (carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend(num);
    if out.len() != expected_len {
        return Err(AddressError::BadLength);
    }
    Ok(out)
}
