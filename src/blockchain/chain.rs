use thiserror::Error;

use super::balance::{within_genesis_bounds, Balances};
use super::block::Block;
use super::digest::DigestValue;

/// Errors that can occur during chain operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("Invalid block: {0}")]
    InvalidBlock(String),

    #[error("Invalid genesis block: {0}")]
    InvalidGenesis(String),

    #[error("Initial amount must not be negative: {0}")]
    NegativeInitialAmount(i32),
}

/// Ledger of hash-linked blocks, genesis first
#[derive(Debug, Clone)]
pub struct Chain {
    /// Never empty: the genesis block is always at position 0
    blocks: Vec<Block>,
}

impl Chain {
    /// Creates a new chain by mining a genesis block
    ///
    /// # Arguments
    ///
    /// * `initial_amount` - Alice's opening balance
    ///
    /// # Returns
    ///
    /// The new chain, or `NegativeInitialAmount`
    pub fn new(initial_amount: i32) -> Result<Self, ChainError> {
        if initial_amount < 0 {
            return Err(ChainError::NegativeInitialAmount(initial_amount));
        }

        let genesis = Block::mine(0, initial_amount, None);

        Ok(Chain {
            blocks: vec![genesis],
        })
    }

    /// Starts a chain from a genesis block that was mined earlier
    ///
    /// # Arguments
    ///
    /// * `genesis` - Block with index 0, no previous digest and a valid digest
    ///
    /// # Returns
    ///
    /// The new chain, or an error describing why the block cannot be genesis
    pub fn from_genesis(genesis: Block) -> Result<Self, ChainError> {
        if genesis.index() != 0 {
            return Err(ChainError::InvalidGenesis(format!(
                "expected index 0, got {}",
                genesis.index()
            )));
        }

        if genesis.previous_digest().is_some() {
            return Err(ChainError::InvalidGenesis(
                "genesis must not reference a previous digest".to_string(),
            ));
        }

        if genesis.amount() < 0 {
            return Err(ChainError::NegativeInitialAmount(genesis.amount()));
        }

        if !genesis.digest().is_valid() {
            return Err(ChainError::InvalidGenesis(format!(
                "digest {} does not meet the difficulty target",
                genesis.digest()
            )));
        }

        Ok(Chain {
            blocks: vec![genesis],
        })
    }

    /// Number of blocks, genesis included
    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// The most recently appended block
    pub fn tail(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn tail_digest(&self) -> &DigestValue {
        self.tail().digest()
    }

    /// Blocks in order, genesis first
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Index the next appended block must carry
    pub fn next_index(&self) -> u32 {
        self.blocks.len() as u32
    }

    /// Mines a candidate block on top of the current tail. The chain is not modified.
    pub fn mine_next(&self, amount: i32) -> Block {
        Block::mine(self.next_index(), amount, Some(self.tail_digest().clone()))
    }

    /// Rebuilds a candidate block on top of the current tail from a known nonce
    pub fn candidate(&self, amount: i32, nonce: u64) -> Block {
        Block::reconstruct(self.next_index(), amount, Some(self.tail_digest().clone()), nonce)
    }

    /// Appends a block to the chain
    ///
    /// The block's digest must meet the difficulty target and its previous
    /// digest must equal the current tail's digest. On error the chain is
    /// left untouched.
    pub fn append(&mut self, block: Block) -> Result<(), ChainError> {
        if !block.digest().is_valid() {
            return Err(ChainError::InvalidBlock(format!(
                "digest {} does not meet the difficulty target",
                block.digest()
            )));
        }

        if block.previous_digest() != Some(self.tail_digest()) {
            return Err(ChainError::InvalidBlock(
                "previous digest does not match the chain tail".to_string(),
            ));
        }

        self.blocks.push(block);
        Ok(())
    }

    /// Removes the tail block
    ///
    /// # Returns
    ///
    /// false, without changing anything, when only the genesis block remains
    pub fn remove_last(&mut self) -> bool {
        if self.blocks.len() == 1 {
            return false;
        }

        self.blocks.pop().is_some()
    }

    /// Validates the blockchain
    ///
    /// Stored digests are trusted, not recomputed. Every block after genesis
    /// must sit at its own index, meet the difficulty target and link to its
    /// predecessor, and the running balance must stay within the genesis bounds.
    ///
    /// # Returns
    ///
    /// true if the blockchain is valid, false otherwise
    pub fn validate(&self) -> bool {
        let genesis = self.genesis();
        if genesis.index() != 0 {
            return false;
        }

        let mut running = Balances::opening(genesis.amount());

        for (position, window) in self.blocks.windows(2).enumerate() {
            let previous_block = &window[0];
            let current_block = &window[1];

            if current_block.index() as usize != position + 1 {
                return false;
            }

            if !current_block.digest().is_valid() {
                return false;
            }

            if current_block.previous_digest() != Some(previous_block.digest()) {
                return false;
            }

            running.apply(current_block.amount());
            if !within_genesis_bounds(running.alice, genesis.amount()) {
                return false;
            }
        }

        true
    }

    /// Alice's and Bob's balances after every transfer in the chain
    pub fn balances(&self) -> Balances {
        let mut balances = Balances::opening(self.genesis().amount());

        for block in self.blocks().skip(1) {
            balances.apply(block.amount());
        }

        balances
    }

    /// One line per block, genesis first
    pub fn render(&self) -> String {
        self.blocks()
            .map(|block| format!("Block {} ({})", block.index(), block))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Structured export of every block
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.blocks)
    }
}
