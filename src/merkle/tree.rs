use ethers::types::Bytes as EBytes;
use merkle_tree_rs::core::{get_proof, make_merkle_tree};
use thiserror::Error;

use airdrop_core::core::bits::Hash;

use super::proof::MAX_PROOF_DEPTH;

/// Errors that can occur while generating a tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    #[error("Cannot build tree without leaves")]
    EmptyTree,

    #[error("Leaf {0} appears more than once")]
    DuplicateLeaf(Hash),

    #[error("Leaf {0} is not part of the tree")]
    LeafNotFound(Hash),

    #[error("Tree of {leaf_count} leaves exceeds maximum depth {max_depth}")]
    TooLarge { leaf_count: usize, max_depth: usize },
}

/// Off-chain merkle tree over sorted leaves
///
/// Built with `merkle_tree_rs` as flat binary-heap: root at index 0, leaves
/// in the last `n` slots in reverse sorted order. Pairs are hashed sorted,
/// so root and proofs match what [`super::proof::verify_proof`] and
/// OpenZeppelin `StandardMerkleTree` expect for the same leaves.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    tree: Vec<EBytes>,
    sorted_leaves: Vec<Hash>,
}

impl MerkleTree {
    pub fn from_leaves(mut leaves: Vec<Hash>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }

        leaves.sort();

        if let Some(pair) = leaves.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(MerkleError::DuplicateLeaf(pair[0]));
        }

        let leaf_count = leaves.len();
        let max_leaves = 1usize
            .checked_shl(MAX_PROOF_DEPTH as u32)
            .unwrap_or(usize::MAX);
        if leaf_count > max_leaves {
            return Err(MerkleError::TooLarge {
                leaf_count,
                max_depth: MAX_PROOF_DEPTH,
            });
        }

        let tree = make_merkle_tree(
            leaves
                .iter()
                .map(|leaf| EBytes::from(leaf.to_vec()))
                .collect(),
        );

        Ok(Self {
            tree,
            sorted_leaves: leaves,
        })
    }

    pub fn root(&self) -> Hash {
        Hash::from_slice(&self.tree[0])
    }

    pub fn leaf_count(&self) -> usize {
        self.sorted_leaves.len()
    }

    /// Leaves in sorted order
    pub fn leaves(&self) -> impl Iterator<Item = &Hash> {
        self.sorted_leaves.iter()
    }

    /// Siblings from leaf up to (excluding) the root
    pub fn proof(&self, leaf: &Hash) -> Result<Vec<Hash>, MerkleError> {
        let sorted_position = self
            .sorted_leaves
            .binary_search(leaf)
            .map_err(|_| MerkleError::LeafNotFound(*leaf))?;

        let tree_index = self.tree.len() - 1 - sorted_position;
        let proof = get_proof(self.tree.clone(), tree_index);

        Ok(proof
            .iter()
            .map(|node| Hash::from_slice(node))
            .collect())
    }
}

#[cfg(test)]
mod test {
    use alloy::primitives::{Address, B256, U256};
    use test_case::test_case;

    use crate::merkle::{
        leaf::plain_leaf,
        proof::{hash_pair, verify_proof},
    };

    use super::{MerkleError, MerkleTree};

    fn make_leaves(count: u8) -> Vec<B256> {
        (1..=count)
            .map(|i| plain_leaf(Address::repeat_byte(i), U256::from(i as u64 * 100)))
            .collect()
    }

    #[test]
    fn test_two_leaves_root() {
        let leaf_a = plain_leaf(Address::repeat_byte(0xAA), U256::from(100));
        let leaf_b = plain_leaf(Address::repeat_byte(0xBB), U256::from(200));

        let tree = MerkleTree::from_leaves(vec![leaf_a, leaf_b]).unwrap();

        assert_eq!(tree.root(), hash_pair(&leaf_a, &leaf_b));
        assert_eq!(tree.proof(&leaf_a).unwrap(), vec![leaf_b]);
        assert_eq!(tree.proof(&leaf_b).unwrap(), vec![leaf_a]);
    }

    #[test]
    fn test_single_leaf_tree() {
        let leaf = plain_leaf(Address::repeat_byte(0xAA), U256::from(100));
        let tree = MerkleTree::from_leaves(vec![leaf]).unwrap();

        assert_eq!(tree.root(), leaf);
        assert!(tree.proof(&leaf).unwrap().is_empty());
        assert!(verify_proof(&[], &tree.root(), leaf));
    }

    #[test]
    fn test_three_leaves_layout() {
        let mut leaves = make_leaves(3);
        leaves.sort();
        let tree = MerkleTree::from_leaves(leaves.clone()).unwrap();

        // Leaves stored in reverse sorted order at the tail of the heap:
        // nodes[4] = l0, nodes[3] = l1, nodes[2] = l2
        let node_1 = hash_pair(&leaves[1], &leaves[0]);
        let expected_root = hash_pair(&node_1, &leaves[2]);
        assert_eq!(tree.root(), expected_root);

        assert_eq!(tree.proof(&leaves[2]).unwrap(), vec![node_1]);
        assert_eq!(tree.proof(&leaves[0]).unwrap(), vec![leaves[1], leaves[2]]);
    }

    #[test_case(1; "one leaf")]
    #[test_case(2; "two leaves")]
    #[test_case(5; "five leaves")]
    #[test_case(8; "eight leaves")]
    #[test_case(33; "thirty three leaves")]
    fn test_every_leaf_verifies(count: u8) {
        let leaves = make_leaves(count);
        let tree = MerkleTree::from_leaves(leaves.clone()).unwrap();

        assert_eq!(tree.leaf_count(), count as usize);
        assert_eq!(tree.leaves().count(), count as usize);

        for leaf in &leaves {
            let proof = tree.proof(leaf).unwrap();
            assert!(verify_proof(&proof, &tree.root(), *leaf));
        }
    }

    /// Heap layout computed directly: leaves reversed at the tail
    fn make_heap(mut leaves: Vec<B256>) -> Vec<B256> {
        leaves.sort();
        let node_count = 2 * leaves.len() - 1;
        let mut nodes = vec![B256::ZERO; node_count];
        for (i, leaf) in leaves.into_iter().enumerate() {
            nodes[node_count - 1 - i] = leaf;
        }
        for i in (0..node_count / 2).rev() {
            nodes[i] = hash_pair(&nodes[2 * i + 1], &nodes[2 * i + 2]);
        }
        nodes
    }

    #[test_case(1; "one leaf")]
    #[test_case(2; "two leaves")]
    #[test_case(3; "three leaves")]
    #[test_case(5; "five leaves")]
    #[test_case(8; "eight leaves")]
    #[test_case(33; "thirty three leaves")]
    fn test_heap_layout(count: u8) {
        let leaves = make_leaves(count);
        let tree = MerkleTree::from_leaves(leaves.clone()).unwrap();
        let nodes = make_heap(leaves.clone());

        assert_eq!(tree.root(), nodes[0]);

        for leaf in &leaves {
            let mut index = nodes.iter().rposition(|node| node == leaf).unwrap();
            let mut expected = Vec::new();
            while index > 0 {
                let sibling = if index % 2 == 1 { index + 1 } else { index - 1 };
                expected.push(nodes[sibling]);
                index = (index - 1) / 2;
            }
            assert_eq!(tree.proof(leaf).unwrap(), expected);
        }
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let leaves = make_leaves(6);
        let mut reversed = leaves.clone();
        reversed.reverse();

        assert_eq!(
            MerkleTree::from_leaves(leaves).unwrap().root(),
            MerkleTree::from_leaves(reversed).unwrap().root()
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            MerkleTree::from_leaves(vec![]).unwrap_err(),
            MerkleError::EmptyTree
        );

        let leaf = plain_leaf(Address::repeat_byte(0xAA), U256::from(100));
        assert_eq!(
            MerkleTree::from_leaves(vec![leaf, leaf]).unwrap_err(),
            MerkleError::DuplicateLeaf(leaf)
        );

        let tree = MerkleTree::from_leaves(make_leaves(4)).unwrap();
        assert_eq!(
            tree.proof(&leaf).unwrap_err(),
            MerkleError::LeafNotFound(leaf)
        );

        // Internal node is not a leaf
        assert!(tree.proof(&tree.root()).is_err());
    }
}
