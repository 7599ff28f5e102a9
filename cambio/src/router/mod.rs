//! Request routing for the two proxy domains.

pub mod forex;
mod quotes;
