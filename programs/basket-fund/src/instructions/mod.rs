pub mod add_investment;
pub mod close_bid;
pub mod collect_unstaked;
pub mod create_bid;
pub mod initialize_fund;
pub mod mint;
pub mod process_investments;
pub mod process_stakes;
pub mod redeem;
pub mod redeem_for_tokens;
pub mod set_immutable;
pub mod stake;
pub mod unstake;
pub mod update_investment;

pub use add_investment::*;
pub use close_bid::*;
pub use collect_unstaked::*;
pub use create_bid::*;
pub use initialize_fund::*;
pub use mint::*;
pub use process_investments::*;
pub use process_stakes::*;
pub use redeem::*;
pub use redeem_for_tokens::*;
pub use set_immutable::*;
pub use stake::*;
pub use unstake::*;
pub use update_investment::*;
