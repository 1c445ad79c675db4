//! # Wire and Data Types
//!
//! Types exchanged with Credential Issuers and authorization servers
//! during issuance.

mod credential;
mod metadata;
mod offer;
mod token;

pub use self::credential::*;
pub use self::metadata::*;
pub use self::offer::*;
pub use self::token::*;
