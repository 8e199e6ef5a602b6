//! Error catalog and definitions for stdhook
//!
//! # Error Code Ranges
//!
//! | Range      | Category    | Description                            |
//! |------------|-------------|----------------------------------------|
//! | E001-E099  | Config      | Configuration file and environment     |
//! | E100-E199  | Scope       | Installation scope and state detection |
//! | E200-E299  | Assets      | Asset bundle location and staging      |
//! | E300-E399  | Settings    | Settings document merge and write      |
//! | E400-E499  | Network     | Release metadata lookup                |
//! | E500-E599  | Verify      | Post-install hook verification         |

pub mod catalog;

pub use catalog::{ErrorCategory, ErrorCode, ErrorEntry};
