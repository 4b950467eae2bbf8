//! RevocationList2020 bitstring codec.
//!
//! The wire form is `base64url(gzip(bitstring))` with one bit per list
//! position, least-significant bit first within each byte.

use std::io::{Read, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bitvec::prelude::{BitVec, Lsb0};
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use attesta_core::VcError;

/// A decoded revocation list: one bit per issued-credential slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationList {
    bits: BitVec<u8, Lsb0>,
}

impl RevocationList {
    /// A zero-initialized list of exactly `list_size` bits.
    pub fn new(list_size: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, list_size),
        }
    }

    /// Decode the `encodedList` wire form. Corrupt or incompatible input
    /// fails with a generic decode error.
    pub fn decode(encoded: &str) -> Result<Self, VcError> {
        let compressed = URL_SAFE_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(|e| {
                VcError::CredentialLoad(format!("could not decode revocation list: {}", e))
            })?;
        let mut bytes = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut bytes)
            .map_err(|e| {
                VcError::CredentialLoad(format!("could not decode revocation list: {}", e))
            })?;
        Ok(Self {
            bits: BitVec::from_vec(bytes),
        })
    }

    /// Encode to the `encodedList` wire form.
    pub fn encode(&self) -> Result<String, VcError> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(self.bits.as_raw_slice())
            .and_then(|_| encoder.finish())
            .map(|compressed| URL_SAFE_NO_PAD.encode(compressed))
            .map_err(|e| VcError::Api(format!("could not encode revocation list: {}", e)))
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Flip the revoked bit at `index`.
    pub fn set(&mut self, index: usize, revoked: bool) -> Result<(), VcError> {
        let len = self.bits.len();
        let mut bit = self.bits.get_mut(index).ok_or_else(|| {
            VcError::InvalidRequest(format!(
                "revocation list index {} is out of range for list of size {}",
                index, len
            ))
        })?;
        *bit = revoked;
        Ok(())
    }

    /// Read the revoked bit at `index`.
    pub fn get(&self, index: usize) -> Result<bool, VcError> {
        self.bits
            .get(index)
            .map(|bit| *bit)
            .ok_or_else(|| {
                VcError::InvalidRequest(format!(
                    "revocation list index {} is out of range for list of size {}",
                    index,
                    self.bits.len()
                ))
            })
    }
}
