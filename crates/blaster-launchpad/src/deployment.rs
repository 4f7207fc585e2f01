use serde::{Deserialize, Serialize};
use tracing::info;

use blaster_amm::{AmmFactory, AmmRouter, ConstantProductRouter};
use blaster_core::error::BlasterError;
use blaster_core::types::Address;
use blaster_state::Ledger;

use crate::config::LaunchpadConfig;
use crate::orchestrator::{launchpad_address, Launchpad};

/// Addresses of the contracts a node runs, persisted next to the state so a
/// restarted node can tell the operator where everything lives.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deployment {
    pub launchpad: Address,
    pub vault: Address,
    pub router: Address,
    pub factory: Address,
    pub wrapped_native: Address,
}

impl Deployment {
    /// Deploy the AMM on a fresh ledger and describe the result.
    pub fn bootstrap(ledger: &mut Ledger) -> Result<Self, BlasterError> {
        let router = ConstantProductRouter::deploy(ledger)
            .map_err(|e| BlasterError::ExternalDependencyFailure(e.to_string()))?;
        let deployment = Self::describe(ledger, &router);
        info!(
            launchpad = %deployment.launchpad,
            vault = %deployment.vault,
            router = %deployment.router,
            wrapped_native = %deployment.wrapped_native,
            "deployment bootstrapped"
        );
        Ok(deployment)
    }

    pub fn describe(ledger: &Ledger, router: &ConstantProductRouter) -> Self {
        Self {
            launchpad: launchpad_address(),
            vault: ledger.vault_address(),
            router: router.address(),
            factory: router.factory().address(),
            wrapped_native: router.wrapped_native(),
        }
    }

    /// Launchpad over the reference router of an already bootstrapped
    /// ledger.
    pub fn launchpad(ledger: &Ledger, config: LaunchpadConfig) -> Launchpad<ConstantProductRouter> {
        Launchpad::new(ledger, ConstantProductRouter::new(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_registers_wrapped_native_once() {
        let mut ledger = Ledger::default();
        let d = Deployment::bootstrap(&mut ledger).unwrap();
        assert!(ledger.has_coin(&d.wrapped_native));
        assert_eq!(d.vault, ledger.vault_address());
        assert_ne!(d.launchpad, d.vault);
        assert!(Deployment::bootstrap(&mut ledger).is_err());
    }

    #[test]
    fn serializes_as_hex_addresses() {
        let mut ledger = Ledger::default();
        let d = Deployment::bootstrap(&mut ledger).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains(&d.router.to_hex()));
        let back: Deployment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
