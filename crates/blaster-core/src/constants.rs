/// ─── Blaster Launchpad Constants ────────────────────────────────────────────
///
/// Rates are basis points (1/10000). All arithmetic on them is integer
/// floor division; no floating point anywhere in the protocol.

// ── Rates ────────────────────────────────────────────────────────────────────

/// Denominator for basis-point rates.
pub const BASIS_POINTS_DENOMINATOR: u128 = 10_000;

/// Largest admissible rate, and the cap on tax + burn per side.
pub const MAX_BASIS_POINTS: u16 = 10_000;

// ── Asset defaults ───────────────────────────────────────────────────────────

/// Decimals reported by every launched asset.
pub const COIN_DECIMALS: u8 = 18;

/// Allowance value treated as infinite by `transfer_from`.
pub const INFINITE_ALLOWANCE: u128 = u128::MAX;

// ── Vault ────────────────────────────────────────────────────────────────────

/// First key handed out by the vault. Key 0 never resolves.
pub const FIRST_LOCK_KEY: u64 = 1;

/// Longest admissible lock or vesting period: 100 years.
pub const MAX_LOCK_DURATION_SECS: u64 = 100 * 365 * 24 * 3600;

// ── AMM (constant-product reference) ─────────────────────────────────────────

/// Pool shares permanently locked on the first mint of a pair.
pub const MINIMUM_LIQUIDITY: u128 = 1_000;

/// Swap fee: amount_in × 997 / 1000 reaches the curve (0.3% fee).
pub const AMM_FEE_NUMERATOR: u128 = 997;
pub const AMM_FEE_DENOMINATOR: u128 = 1_000;

/// Deadline window the launchpad grants the liquidity call.
pub const DEFAULT_LIQUIDITY_DEADLINE_SECS: u64 = 300;

// ── Address derivation domains ───────────────────────────────────────────────

pub const COIN_ADDRESS_DOMAIN: &[u8] = b"blaster/coin";
pub const PAIR_ADDRESS_DOMAIN: &[u8] = b"blaster/pair";
pub const ROUTER_ADDRESS_DOMAIN: &[u8] = b"blaster/router";
pub const WRAPPED_NATIVE_DOMAIN: &[u8] = b"blaster/wrapped-native";
pub const LAUNCHPAD_ADDRESS_DOMAIN: &[u8] = b"blaster/launchpad";
