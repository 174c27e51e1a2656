use serde::Serialize;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use super::digest::DigestValue;

/// How many nonces `Block::mine_until` tries between checks of its cancel flag
pub const CANCEL_CHECK_INTERVAL: u64 = 1 << 16;

/// Represents one transfer sealed into the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Position of the block in the chain (0 for genesis)
    index: u32,

    /// Amount moved from Bob to Alice; negative values move it the other way
    amount: i32,

    /// Digest of the preceding block, absent only for genesis
    previous_digest: Option<DigestValue>,

    /// Proof of work found by the nonce search
    nonce: u64,

    /// Digest of {index, amount, previous reference, nonce}
    digest: DigestValue,
}

/// Byte buffer fed to the hash function, with the nonce as its trailing field.
///
/// Layout (big-endian):
/// - genesis: `index(4) || amount(4) || nonce(8)`
/// - others:  `index(4) || amount(4) || previous_reference(8) || nonce(8)`
struct Preimage {
    buf: Vec<u8>,
    nonce_offset: usize,
}

impl Preimage {
    fn new(index: u32, amount: i32, previous: Option<&DigestValue>) -> Self {
        let mut buf = Vec::with_capacity(24);
        buf.extend_from_slice(&index.to_be_bytes());
        buf.extend_from_slice(&amount.to_be_bytes());

        if index != 0 {
            // A non-genesis block without a predecessor mixes in a zero reference
            let reference = previous.map_or(0, DigestValue::reference_reduction);
            buf.extend_from_slice(&reference.to_be_bytes());
        }

        let nonce_offset = buf.len();
        buf.extend_from_slice(&[0u8; 8]);

        Preimage { buf, nonce_offset }
    }

    fn digest(&mut self, nonce: u64) -> DigestValue {
        self.buf[self.nonce_offset..].copy_from_slice(&nonce.to_be_bytes());
        DigestValue::compute(&self.buf)
    }
}

impl Block {
    /// Mines a new block
    ///
    /// Tries nonces 0, 1, 2, ... until the resulting digest meets the
    /// difficulty target. There is no attempt limit.
    ///
    /// # Arguments
    ///
    /// * `index` - The index of the block in the chain
    /// * `amount` - The transferred amount
    /// * `previous` - The digest of the previous block (`None` for genesis)
    ///
    /// # Returns
    ///
    /// The mined block
    pub fn mine(index: u32, amount: i32, previous: Option<DigestValue>) -> Self {
        let mut preimage = Preimage::new(index, amount, previous.as_ref());
        let mut nonce: u64 = 0;

        loop {
            let digest = preimage.digest(nonce);
            if digest.is_valid() {
                return Block {
                    index,
                    amount,
                    previous_digest: previous,
                    nonce,
                    digest,
                };
            }

            nonce = nonce.wrapping_add(1);
        }
    }

    /// Same search as `mine`, but gives up once `cancel` is set.
    ///
    /// The flag is read every `CANCEL_CHECK_INTERVAL` nonces, starting before
    /// the first attempt.
    ///
    /// # Returns
    ///
    /// The mined block, or `None` if the search was cancelled
    pub fn mine_until(
        index: u32,
        amount: i32,
        previous: Option<DigestValue>,
        cancel: &AtomicBool,
    ) -> Option<Self> {
        let mut preimage = Preimage::new(index, amount, previous.as_ref());
        let mut nonce: u64 = 0;

        loop {
            if nonce % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
                return None;
            }

            let digest = preimage.digest(nonce);
            if digest.is_valid() {
                return Some(Block {
                    index,
                    amount,
                    previous_digest: previous,
                    nonce,
                    digest,
                });
            }

            nonce = nonce.wrapping_add(1);
        }
    }

    /// Rebuilds a block from a known nonce without searching.
    ///
    /// The resulting digest is not checked against the difficulty target.
    pub fn reconstruct(index: u32, amount: i32, previous: Option<DigestValue>, nonce: u64) -> Self {
        let digest = Preimage::new(index, amount, previous.as_ref()).digest(nonce);

        Block {
            index,
            amount,
            previous_digest: previous,
            nonce,
            digest,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn previous_digest(&self) -> Option<&DigestValue> {
        self.previous_digest.as_ref()
    }

    pub fn digest(&self) -> &DigestValue {
        &self.digest
    }

    /// Number of digests the nonce search computed to reach this nonce
    pub fn attempts(&self) -> u64 {
        self.nonce.saturating_add(1)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let previous = match &self.previous_digest {
            Some(digest) => digest.to_hex(),
            None => "null".to_string(),
        };

        write!(
            f,
            "Amount: {}, Nonce: {}, prevHash: {}, hash: {}",
            self.amount, self.nonce, previous, self.digest
        )
    }
}
