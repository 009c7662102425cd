//! Client-side interface of a program that locks SOL in an account until an unlock time
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod instruction;
mod pack_utils;
pub mod state;
