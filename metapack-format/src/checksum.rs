//! Additive checksum and keyed byte obfuscation
//!
//! Neither primitive is cryptographic. The checksum catches casual corruption,
//! the obfuscation hides payload bytes from a casual reader.

use crate::constants::CHECKSUM_MODULUS;
use crate::error::{MetaPackError, Result};

/// Compute the additive checksum: sum of all bytes modulo 32000
pub fn compute_checksum(data: &[u8]) -> u16 {
    let sum = data
        .iter()
        .fold(0u32, |acc, &b| (acc + b as u32) % CHECKSUM_MODULUS);
    sum as u16
}

/// Verify the additive checksum for data
pub fn verify_checksum(data: &[u8], expected: u16) -> Result<()> {
    let computed = compute_checksum(data);
    if computed == expected {
        Ok(())
    } else {
        Err(MetaPackError::DataMismatch {
            computed,
            stored: expected,
        })
    }
}

/// Reduce a secret to the byte offset it contributes
fn secret_byte(secret: i64) -> u8 {
    secret.rem_euclid(256) as u8
}

/// Obfuscate in place: `byte[i] = (byte[i] + i + secret) mod 256`
pub fn obfuscate(data: &mut [u8], secret: i64) {
    let key = secret_byte(secret);
    for (i, b) in data.iter_mut().enumerate() {
        *b = b.wrapping_add(i as u8).wrapping_add(key);
    }
}

/// Reverse [`obfuscate`]: `byte[i] = (byte[i] - i - secret) mod 256`
pub fn deobfuscate(data: &mut [u8], secret: i64) {
    let key = secret_byte(secret);
    for (i, b) in data.iter_mut().enumerate() {
        *b = b.wrapping_sub(i as u8).wrapping_sub(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_byte_sum() {
        assert_eq!(compute_checksum(&[]), 0);
        assert_eq!(compute_checksum(&[1, 2, 3]), 6);
        assert_eq!(compute_checksum(&[255; 4]), 1020);
    }

    #[test]
    fn test_checksum_wraps_at_modulus() {
        // 126 * 255 = 32130 -> 130
        let data = vec![255u8; 126];
        assert_eq!(compute_checksum(&data), 130);
    }

    #[test]
    fn test_verify_checksum_mismatch() {
        match verify_checksum(&[1, 2, 3], 7) {
            Err(MetaPackError::DataMismatch { computed, stored }) => {
                assert_eq!(computed, 6);
                assert_eq!(stored, 7);
            }
            other => panic!("expected DataMismatch, got {:?}", other),
        }
        assert!(verify_checksum(&[1, 2, 3], 6).is_ok());
    }

    #[test]
    fn test_obfuscate_known_bytes() {
        // secret 1210 mod 256 == 186
        let mut data = vec![0u8, 0, 100];
        obfuscate(&mut data, 1210);
        assert_eq!(data, vec![186, 187, 32]);
        deobfuscate(&mut data, 1210);
        assert_eq!(data, vec![0, 0, 100]);
    }

    #[test]
    fn test_position_index_wraps_past_256() {
        let mut data = vec![7u8; 600];
        obfuscate(&mut data, 0);
        assert_eq!(data[0], 7);
        assert_eq!(data[256], 7);
        assert_eq!(data[257], 8);
        deobfuscate(&mut data, 0);
        assert!(data.iter().all(|&b| b == 7));
    }

    #[test]
    fn test_negative_secret_is_modular() {
        let mut a = vec![10u8, 20, 30];
        let mut b = a.clone();
        obfuscate(&mut a, -1);
        obfuscate(&mut b, 255);
        assert_eq!(a, b);
    }
}
