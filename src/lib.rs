pub mod app {
    pub mod commands;
    pub mod config;
    pub mod distributor_config;
    pub mod tree_file;
}

pub mod cli;

pub mod distributor {
    pub mod claim_ledger;
    pub mod distributor;
    pub mod error;
}

pub mod governance {
    pub mod governance_policy;
}

pub mod merkle {
    pub mod allocation;
    pub mod leaf;
    pub mod proof;
    pub mod tree;
}

pub mod token {
    pub mod simulated_token;
    pub mod token_locker;
    pub mod token_transfer;
}
