/**
* filename : mod
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

pub mod aggregate;
pub mod classifier;
pub mod signal_types;

pub use aggregate::*;
pub use classifier::*;
pub use signal_types::*;
