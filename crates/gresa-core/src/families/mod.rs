//! Formula bodies, one module per calculator family. Each function reads its
//! operands, computes every intermediate once and returns the [`Workings`].
//!
//! [`Workings`]: crate::evaluator::Workings

pub mod annuity;
pub mod bonds;
pub mod compound;
pub mod loans;
pub mod simple_interest;
pub mod stocks;
