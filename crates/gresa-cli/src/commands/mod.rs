pub mod catalogue;
pub mod evaluate;
pub mod format;
pub mod stocks;
