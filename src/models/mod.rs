pub mod contact;
pub mod patch;

pub use contact::*;
pub use patch::*;
