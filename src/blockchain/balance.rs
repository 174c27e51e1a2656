use serde::Serialize;

use std::fmt;

/// Alice's and Bob's holdings after replaying some prefix of the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balances {
    /// Alice starts with the genesis amount
    pub alice: i64,

    /// Bob starts with nothing
    pub bob: i64,
}

impl Balances {
    /// Opening balances for a chain whose genesis block carries `genesis_amount`
    pub fn opening(genesis_amount: i32) -> Self {
        Balances {
            alice: i64::from(genesis_amount),
            bob: 0,
        }
    }

    /// Applies one transfer: a positive amount moves funds from Bob to Alice,
    /// a negative one from Alice to Bob
    pub fn apply(&mut self, amount: i32) {
        let amount = i64::from(amount);
        self.alice += amount;
        self.bob -= amount;
    }

    /// Sum of both balances, always the genesis amount
    pub fn total(&self) -> i64 {
        self.alice + self.bob
    }
}

impl From<Balances> for (i64, i64) {
    fn from(balances: Balances) -> Self {
        (balances.alice, balances.bob)
    }
}

impl fmt::Display for Balances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alice: {}, Bob: {}", self.alice, self.bob)
    }
}

/// Bound enforced on the running balance during chain validation.
///
/// The balance may neither go negative nor exceed what genesis created.
pub fn within_genesis_bounds(running_balance: i64, genesis_amount: i32) -> bool {
    (0..=i64::from(genesis_amount)).contains(&running_balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_balances() {
        let balances = Balances::opening(300);

        assert_eq!(balances.alice, 300);
        assert_eq!(balances.bob, 0);
        assert_eq!(balances.to_string(), "Alice: 300, Bob: 0");
    }

    #[test]
    fn test_apply_conserves_total() {
        let mut balances = Balances::opening(300);

        for amount in [-50, 20, -270, 100, i32::MIN, i32::MAX] {
            balances.apply(amount);
            assert_eq!(balances.total(), 300);
        }
    }

    #[test]
    fn test_negative_amount_moves_funds_to_bob() {
        let mut balances = Balances::opening(300);
        balances.apply(-50);

        assert_eq!(<(i64, i64)>::from(balances), (250, 50));
    }

    #[test]
    fn test_within_genesis_bounds() {
        assert!(within_genesis_bounds(0, 300));
        assert!(within_genesis_bounds(300, 300));
        assert!(within_genesis_bounds(150, 300));
        assert!(!within_genesis_bounds(-1, 300));
        assert!(!within_genesis_bounds(301, 300));
        assert!(within_genesis_bounds(0, 0));
    }
}
