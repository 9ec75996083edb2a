use std::path::Path;

use serde::{Deserialize, Serialize};

use airdrop_core::core::{
    bits::{Address, Amount, Hash},
    json_file_async::{read_from_json_file_async, write_json_to_file_async},
};

use crate::merkle::{
    allocation::{AirdropAllocation, AllocationError, AllocationTree},
    leaf::LeafEncoding,
    proof::verify_proof,
};

/// Input of `build-tree`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationFile {
    pub allocations: Vec<AirdropAllocation>,
}

/// Claim of single user as published to claimants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeFileClaim {
    pub user: Address,
    pub amount: Amount,
    pub lock_time: Amount,
    pub proof: Vec<Hash>,
}

impl TreeFileClaim {
    pub fn leaf(&self, encoding: LeafEncoding) -> Hash {
        encoding.leaf(self.user, self.amount, self.lock_time)
    }
}

/// Output of `build-tree`: root, and proof for every allocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeFile {
    pub root: Hash,
    pub encoding: LeafEncoding,
    pub claims: Vec<TreeFileClaim>,
}

impl TreeFile {
    pub fn from_tree(tree: &AllocationTree) -> Result<Self, AllocationError> {
        let claims = tree
            .allocations()
            .iter()
            .map(|allocation| {
                let (_, proof) = tree.proof_for(&allocation.user)?;
                Ok(TreeFileClaim {
                    user: allocation.user,
                    amount: allocation.amount,
                    lock_time: allocation.lock_time,
                    proof,
                })
            })
            .collect::<Result<Vec<_>, AllocationError>>()?;

        Ok(Self {
            root: tree.root(),
            encoding: tree.encoding(),
            claims,
        })
    }

    pub fn find_claim(&self, user: &Address) -> Option<&TreeFileClaim> {
        self.claims.iter().find(|claim| claim.user == *user)
    }

    /// Users whose proof does not lead to the root
    pub fn find_invalid_claims(&self) -> Vec<Address> {
        self.claims
            .iter()
            .filter(|claim| !verify_proof(&claim.proof, &self.root, claim.leaf(self.encoding)))
            .map(|claim| claim.user)
            .collect()
    }

    pub async fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        read_from_json_file_async(path).await
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> eyre::Result<()> {
        write_json_to_file_async(path, self).await
    }
}
