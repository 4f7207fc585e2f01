//! blaster-amm
//!
//! The automated market maker the launchpad seeds pools on. Callers see it
//! only through the `AmmFactory` and `AmmRouter` traits; the constant-product
//! implementation here (x·y = k, 0.3% fee, permanently locked minimum
//! liquidity) keeps its pair index and reserves inside the ledger, so a
//! reverted operation takes its AMM effects with it.

pub mod error;
pub mod factory;
pub mod library;
pub mod pair;
pub mod router;
pub mod traits;

pub use error::AmmError;
pub use factory::ConstantProductFactory;
pub use library::{get_amount_in, get_amount_out, quote};
pub use router::ConstantProductRouter;
pub use traits::{AddLiquidity, AddLiquidityNative, AmmFactory, AmmRouter, LiquidityReceipt, SwapExactIn};
