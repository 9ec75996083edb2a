use alloy::primitives::keccak256;

use airdrop_core::core::bits::Hash;

/// Longest proof accepted, i.e. deepest supported tree
///
/// A tree of depth 32 holds over four billion leaves, far beyond any airdrop.
pub const MAX_PROOF_DEPTH: usize = 32;

/// Hash two nodes in ascending order
///
/// Sorting the pair makes the proof independent of the leaf position, and
/// matches OpenZeppelin `MerkleProof` (commutative keccak-256).
pub fn hash_pair(a: &Hash, b: &Hash) -> Hash {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buffer = [0u8; 64];
    buffer[..32].copy_from_slice(lo.as_slice());
    buffer[32..].copy_from_slice(hi.as_slice());
    keccak256(buffer)
}

/// Recompute the root from leaf and ordered siblings (leaf to root)
pub fn process_proof(leaf: Hash, proof: &[Hash]) -> Hash {
    proof
        .iter()
        .fold(leaf, |computed, sibling| hash_pair(&computed, sibling))
}

/// Tell whether leaf belongs to tree committed to by root
///
/// Empty proof verifies only when leaf is the root itself (single-leaf tree).
pub fn verify_proof(proof: &[Hash], root: &Hash, leaf: Hash) -> bool {
    process_proof(leaf, proof) == *root
}

#[cfg(test)]
mod test {
    use alloy::primitives::{keccak256, Address, B256, U256};

    use crate::merkle::leaf::plain_leaf;

    use super::{hash_pair, process_proof, verify_proof};

    fn concat(a: &B256, b: &B256) -> B256 {
        let mut buffer = Vec::with_capacity(64);
        buffer.extend_from_slice(a.as_slice());
        buffer.extend_from_slice(b.as_slice());
        keccak256(buffer)
    }

    #[test]
    fn test_hash_pair_is_commutative() {
        let a = B256::repeat_byte(0x01);
        let b = B256::repeat_byte(0x02);

        assert_eq!(hash_pair(&a, &b), hash_pair(&b, &a));
        assert_eq!(hash_pair(&a, &b), concat(&a, &b));
        assert_ne!(hash_pair(&a, &b), concat(&b, &a));
    }

    #[test]
    fn test_two_leaf_tree() {
        let leaf_a = plain_leaf(Address::repeat_byte(0xAA), U256::from(100));
        let leaf_b = plain_leaf(Address::repeat_byte(0xBB), U256::from(200));
        let root = hash_pair(&leaf_a, &leaf_b);

        assert!(verify_proof(&[leaf_b], &root, leaf_a));
        assert!(verify_proof(&[leaf_a], &root, leaf_b));

        let wrong = plain_leaf(Address::repeat_byte(0xAA), U256::from(101));
        assert!(!verify_proof(&[leaf_b], &root, wrong));
    }

    #[test]
    fn test_unsorted_root_is_rejected() {
        let leaf_a = plain_leaf(Address::repeat_byte(0xAA), U256::from(100));
        let leaf_b = plain_leaf(Address::repeat_byte(0xBB), U256::from(200));
        let (lo, hi) = if leaf_a <= leaf_b {
            (leaf_a, leaf_b)
        } else {
            (leaf_b, leaf_a)
        };

        // Root built by a generator that hashes pairs in descending order
        let swapped_root = concat(&hi, &lo);

        assert!(!verify_proof(&[hi], &swapped_root, lo));
        assert!(!verify_proof(&[lo], &swapped_root, hi));
        assert!(verify_proof(&[hi], &concat(&lo, &hi), lo));
    }

    #[test]
    fn test_empty_proof() {
        let leaf = plain_leaf(Address::repeat_byte(0xAA), U256::from(100));
        let other = plain_leaf(Address::repeat_byte(0xBB), U256::from(200));

        assert_eq!(process_proof(leaf, &[]), leaf);
        assert!(verify_proof(&[], &leaf, leaf));
        assert!(!verify_proof(&[], &hash_pair(&leaf, &other), leaf));
    }
}
