pub mod kraken;
pub mod qryptos;
