//! Ledger configuration
//!
//! Holds the accounting constants and the identities the engine treats
//! specially (the administrator and the custody pool).

use crate::types::{Amount, Identity};

/// Minimum amount accepted when opening an account or depositing
pub const MIN_DEPOSIT: Amount = 1_000_000;

/// Annual interest rate in percent, applied to deposits and new loans
pub const INTEREST_RATE: u64 = 5;

/// Minimum collateral as a percentage of loan principal
pub const COLLATERAL_RATIO: u64 = 150;

/// Length of an accrual year in clock units
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Upper bound accepted by `update_interest_rate`
pub const MAX_INTEREST_RATE: u64 = 20;

/// How administrative operations behave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminMode {
    /// Validate the caller (and rate bound) and echo success without
    /// touching any state.
    #[default]
    Inert,

    /// `emergency_pause` blocks every mutating operation until `resume`;
    /// `update_interest_rate` changes the rate snapshotted by loans issued
    /// afterwards.
    Enforced,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub min_deposit: Amount,
    pub interest_rate: u64,
    pub collateral_ratio: u64,
    pub max_interest_rate: u64,

    /// Only identity allowed to run administrative operations
    pub admin: Identity,

    /// Custody pool identity on the other side of every ledger transfer
    pub pool: Identity,

    pub admin_mode: AdminMode,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            min_deposit: MIN_DEPOSIT,
            interest_rate: INTEREST_RATE,
            collateral_ratio: COLLATERAL_RATIO,
            max_interest_rate: MAX_INTEREST_RATE,
            admin: Identity::from("admin"),
            pool: Identity::from("custody-pool"),
            admin_mode: AdminMode::Inert,
        }
    }
}

impl LedgerConfig {
    /// Create a configuration with the default constants and the given
    /// admin and pool identities
    pub fn new(admin: impl Into<Identity>, pool: impl Into<Identity>) -> Self {
        Self {
            admin: admin.into(),
            pool: pool.into(),
            ..Self::default()
        }
    }

    pub fn with_admin_mode(mut self, admin_mode: AdminMode) -> Self {
        self.admin_mode = admin_mode;
        self
    }
}
