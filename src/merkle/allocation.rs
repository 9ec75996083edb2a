use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use airdrop_core::core::bits::{Address, Amount, Hash};

use super::{
    leaf::LeafEncoding,
    tree::{MerkleError, MerkleTree},
};

/// One eligible entry of the airdrop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AirdropAllocation {
    pub user: Address,
    pub amount: Amount,

    /// Lock duration in seconds, only meaningful with [`LeafEncoding::WithLockTime`]
    #[serde(default)]
    pub lock_time: Amount,
}

impl AirdropAllocation {
    pub fn new(user: Address, amount: Amount) -> Self {
        Self {
            user,
            amount,
            lock_time: Amount::ZERO,
        }
    }

    pub fn with_lock_time(user: Address, amount: Amount, lock_time: Amount) -> Self {
        Self {
            user,
            amount,
            lock_time,
        }
    }

    pub fn leaf(&self, encoding: LeafEncoding) -> Hash {
        encoding.leaf(self.user, self.amount, self.lock_time)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("User {0} is allocated more than once")]
    DuplicateUser(Address),

    #[error("User {0} has no allocation")]
    UnknownUser(Address),

    #[error(transparent)]
    Merkle(#[from] MerkleError),
}

/// Tree generated from the list of allocations
///
/// Claims are keyed by user, and so every user may appear only once.
#[derive(Debug, Clone)]
pub struct AllocationTree {
    encoding: LeafEncoding,
    allocations: Vec<AirdropAllocation>,
    user_index: HashMap<Address, usize>,
    tree: MerkleTree,
}

impl AllocationTree {
    pub fn build(
        encoding: LeafEncoding,
        allocations: Vec<AirdropAllocation>,
    ) -> Result<Self, AllocationError> {
        let mut user_index = HashMap::with_capacity(allocations.len());
        for (index, allocation) in allocations.iter().enumerate() {
            if user_index.insert(allocation.user, index).is_some() {
                return Err(AllocationError::DuplicateUser(allocation.user));
            }
        }

        let leaves = allocations.iter().map(|a| a.leaf(encoding)).collect();
        let tree = MerkleTree::from_leaves(leaves)?;

        tracing::debug!(
            %encoding,
            leaf_count = tree.leaf_count(),
            root = %tree.root(),
            "Built allocation tree"
        );

        Ok(Self {
            encoding,
            allocations,
            user_index,
            tree,
        })
    }

    pub fn root(&self) -> Hash {
        self.tree.root()
    }

    pub fn encoding(&self) -> LeafEncoding {
        self.encoding
    }

    pub fn allocations(&self) -> &[AirdropAllocation] {
        &self.allocations
    }

    pub fn allocation(&self, user: &Address) -> Option<&AirdropAllocation> {
        self.user_index
            .get(user)
            .map(|&index| &self.allocations[index])
    }

    /// Allocation of the user together with its proof
    pub fn proof_for(
        &self,
        user: &Address,
    ) -> Result<(&AirdropAllocation, Vec<Hash>), AllocationError> {
        let allocation = self
            .allocation(user)
            .ok_or(AllocationError::UnknownUser(*user))?;
        let proof = self.tree.proof(&allocation.leaf(self.encoding))?;
        Ok((allocation, proof))
    }
}
