//! Command handlers for the neighbors CLI.

pub mod lookup;

pub use lookup::LookupCommand;
