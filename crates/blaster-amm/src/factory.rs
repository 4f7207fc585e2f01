use tracing::info;

use blaster_core::constants::{PAIR_ADDRESS_DOMAIN, ROUTER_ADDRESS_DOMAIN};
use blaster_core::error::BlasterError;
use blaster_core::event::Event;
use blaster_core::types::{Address, Balance, Timestamp};
use blaster_state::{Ledger, PairRecord, PairRegistry};

use crate::error::AmmError;
use crate::pair;
use crate::traits::AmmFactory;

/// Factory of constant-product pairs. Stateless: the pair index lives in the
/// ledger so it rolls back with everything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantProductFactory {
    address: Address,
}

impl ConstantProductFactory {
    pub fn new() -> Self {
        Self { address: Address::derive(ROUTER_ADDRESS_DOMAIN, &[b"factory"]) }
    }

    /// Deterministic pair address of two tokens (order-independent).
    pub fn pair_address(&self, token_a: &Address, token_b: &Address) -> Address {
        let (t0, t1) = PairRegistry::sort_tokens(*token_a, *token_b);
        Address::derive(PAIR_ADDRESS_DOMAIN, &[self.address.as_bytes(), t0.as_bytes(), t1.as_bytes()])
    }
}

impl Default for ConstantProductFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl AmmFactory for ConstantProductFactory {
    fn address(&self) -> Address {
        self.address
    }

    fn all_pairs_length(&self, ledger: &Ledger) -> u64 {
        ledger.pairs().len()
    }

    fn all_pairs(&self, ledger: &Ledger, index: u64) -> Option<Address> {
        ledger.pairs().at(index)
    }

    fn get_pair(&self, ledger: &Ledger, token_a: &Address, token_b: &Address) -> Option<Address> {
        ledger.pairs().find(token_a, token_b)
    }

    fn create_pair(&self, ledger: &mut Ledger, token_a: Address, token_b: Address) -> Result<Address, AmmError> {
        if token_a == token_b {
            return Err(AmmError::IdenticalAddresses);
        }
        let (token0, token1) = PairRegistry::sort_tokens(token_a, token_b);
        if token0.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        if let Some(existing) = ledger.pairs().find(&token0, &token1) {
            return Err(AmmError::PairExists(existing));
        }
        for token in [&token0, &token1] {
            if !ledger.has_coin(token) {
                return Err(BlasterError::UnknownAsset(*token).into());
            }
        }

        let address = self.pair_address(&token0, &token1);
        ledger.atomic(|l| {
            l.deploy_mintable(address, "Blaster LP", "BLP", address)?;
            let now = l.now();
            let index = l.pairs_mut().insert(PairRecord {
                address,
                token0,
                token1,
                reserve0: 0,
                reserve1: 0,
                block_timestamp_last: now,
            });
            l.emit(Event::PairCreated { token0, token1, pair: address, index });
            info!(pair = %address, %token0, %token1, index, "pair created");
            Ok::<_, AmmError>(address)
        })
    }

    fn get_reserves(&self, ledger: &Ledger, pair: &Address) -> Result<(Balance, Balance, Timestamp), AmmError> {
        pair::get_reserves(ledger, pair)
    }

    fn token0(&self, ledger: &Ledger, pair: &Address) -> Result<Address, AmmError> {
        pair::token0(ledger, pair)
    }
}
