//! Sale protocol error definitions.

use odra::prelude::*;

/// Sale round and sale token errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SaleError {
    // Purchase errors (1xx)
    ZeroAmount = 100,
    MinMaxContribution = 101,
    ExceedingMaxSold = 102,
    InvalidCurrency = 103,

    // Token errors (2xx)
    InsufficientBalance = 200,
    InsufficientAllowance = 201,
    AccountAlreadyExcluded = 202,
    AccountNotExcluded = 203,

    // Access control errors (4xx)
    Unauthorized = 400,
    MissingRole = 401,

    // Configuration errors (9xx)
    InvalidConfig = 900,
}

impl SaleError {
    pub const fn message(&self) -> &'static str {
        match self {
            // Purchase
            SaleError::ZeroAmount => "Zero amount: nothing to buy or claim",
            SaleError::MinMaxContribution => "Payment outside min/max contribution bounds",
            SaleError::ExceedingMaxSold => "Purchase would exceed the total reward",
            SaleError::InvalidCurrency => "Payment asset is not accepted",

            // Token
            SaleError::InsufficientBalance => "Insufficient token balance",
            SaleError::InsufficientAllowance => "Insufficient allowance",
            SaleError::AccountAlreadyExcluded => "Account is already excluded",
            SaleError::AccountNotExcluded => "Account is not excluded",

            // Access control
            SaleError::Unauthorized => "Unauthorized: caller is not the owner",
            SaleError::MissingRole => "Unauthorized: caller is missing the required role",

            // Config
            SaleError::InvalidConfig => "Invalid configuration parameter",
        }
    }
}

impl core::fmt::Display for SaleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<SaleError> for OdraError {
    fn from(error: SaleError) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            OdraError::user(error as u16)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            OdraError::user(error as u16, error.message())
        }
    }
}
