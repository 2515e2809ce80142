//! Default configuration values
//!
//! Constants used when no configuration file overrides them.

/// Transaction fees in microcredits
///
/// Submissions fail on chain when the fee is too low; the client does not
/// check sufficiency itself.
pub mod fees {
    /// `token_registry.aleo/approve_public`
    pub const APPROVE: u64 = 35_000;

    /// `credits.aleo` transfers
    pub const TRANSFER: u64 = 35_000;

    /// `swap_exact_tokens_for_tokens`
    pub const SWAP: u64 = 500_000;

    /// `add_liquidity` and `remove_liquidity`
    pub const LIQUIDITY: u64 = 750_000;
}

/// Deployed programs the client talks to
pub mod programs {
    pub const DEX: &str = "test_swap_15.aleo";

    /// Program account of the DEX; spender for token approvals
    pub const DEX_ADDRESS: &str = "aleo1789vf4eq3dnm236j4us7w7aqqkgxxly7xf2hxvpqwxx3zzef35zq4t30xl";

    pub const TOKEN_REGISTRY: &str = "token_registry.aleo";

    pub const CREDITS: &str = "credits.aleo";
}

/// Mapping names
pub mod mappings {
    /// `token_registry.aleo` approvals, keyed by hash(owner, spender, token)
    pub const ALLOWANCES: &str = "allowances";

    /// `token_registry.aleo` balances, keyed by hash(owner, token)
    pub const AUTHORIZED_BALANCES: &str = "authorized_balances";

    /// `token_registry.aleo` token metadata including supply
    pub const REGISTERED_TOKENS: &str = "registered_tokens";

    /// DEX pair reserves, keyed by pair id
    pub const PAIRS: &str = "pairs";
}

/// Network API defaults
pub mod network {
    pub const ENDPOINT: &str = "https://api.explorer.provable.com/v1";

    /// Path segment of the explorer API
    pub const NETWORK: &str = "testnet";

    /// Request timeout (milliseconds)
    pub const REQUEST_TIMEOUT_MS: u64 = 30_000;
}

/// Client behaviour defaults
pub mod client {
    /// Quiet period before a form refetches after an edit (milliseconds)
    pub const DEBOUNCE_MS: u64 = 1_000;
}
