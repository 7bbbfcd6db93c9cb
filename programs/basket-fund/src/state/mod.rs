pub mod auction;
pub mod bid;
pub mod fund;
pub mod investment;
pub mod stake;
