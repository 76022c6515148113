//! External collaborator interfaces

pub mod token_face;

pub use token_face::{MemoryTokenLedger, TokenLedger};
