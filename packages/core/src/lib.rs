// ABOUTME: Core types and utilities for Catima Sync
// ABOUTME: Loyalty card record, barcode formats, balances and the RGB color codec

pub mod balance;
pub mod card;
pub mod color;
pub mod constants;

// Re-export main types
pub use balance::{Balance, BalanceError};
pub use card::{BarcodeFormat, CardError, LoyaltyCard};
pub use color::{ColorError, RGBColor};

// Re-export constants
pub use constants::{catima_dir, default_database_path};
