use airdrop_core::core::bits::Address;

/// Tells whether caller holds the governor role
///
/// Privileged operations take the caller explicitly and ask the policy,
/// instead of the component owning an access-control base.
pub trait GovernancePolicy: Send + Sync {
    fn is_governor(&self, caller: &Address) -> bool;
}

impl<F> GovernancePolicy for F
where
    F: Fn(&Address) -> bool + Send + Sync,
{
    fn is_governor(&self, caller: &Address) -> bool {
        (self)(caller)
    }
}

/// Policy with exactly one governor address
#[derive(Debug, Clone)]
pub struct SingleGovernor {
    governor: Address,
}

impl SingleGovernor {
    pub fn new(governor: Address) -> Self {
        Self { governor }
    }

    pub fn governor(&self) -> Address {
        self.governor
    }
}

impl GovernancePolicy for SingleGovernor {
    fn is_governor(&self, caller: &Address) -> bool {
        *caller == self.governor
    }
}

#[cfg(test)]
mod test {
    use airdrop_core::core::{
        bits::Address,
        test_util::{get_mock_address_1, get_mock_governor_address},
    };

    use super::{GovernancePolicy, SingleGovernor};

    #[test]
    fn test_single_governor() {
        let policy = SingleGovernor::new(get_mock_governor_address());
        assert!(policy.is_governor(&get_mock_governor_address()));
        assert!(!policy.is_governor(&get_mock_address_1()));
        assert_eq!(policy.governor(), get_mock_governor_address());
    }

    #[test]
    fn test_closure_policy() {
        let policy = |_: &Address| false;
        assert!(!policy.is_governor(&get_mock_governor_address()));
    }
}
