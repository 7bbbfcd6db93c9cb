use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Auction delay must be greater than zero epochs.")]
    InvalidAuctionDelay,
    #[msg("Fee percent must be <= 100.")]
    InvalidFeePercent,
    #[msg("Target weight must be <= 10000 bps.")]
    InvalidWeight,
    #[msg("Fund is no longer mutable.")]
    FundImmutable,
    #[msg("Unauthorized.")]
    Unauthorized,
    #[msg("Math overflow.")]
    MathOverflow,
    #[msg("Input amount must be greater than zero.")]
    InsufficientInput,
    #[msg("Caller holds fewer claim tokens than requested.")]
    InsufficientBalance,
    #[msg("Pool lacks the liquidity to cover the redemption.")]
    InsufficientLiquidity,
    #[msg("Deposit results in zero claim tokens.")]
    ZeroClaims,
    #[msg("Invalid NAV.")]
    InvalidNav,
    #[msg("Invalid remaining accounts layout.")]
    InvalidRemainingAccounts,
    #[msg("Investment does not belong to this fund.")]
    InvalidInvestment,
    #[msg("Pool reserve accounts do not pair the asset with the denominator.")]
    InvalidPool,
    #[msg("Pool has no liquidity to price against.")]
    EmptyPool,
    #[msg("Invalid token vault.")]
    InvalidTokenVault,
    #[msg("Bid amount must be greater than zero.")]
    InvalidBidAmount,
    #[msg("Bid price must be greater than zero.")]
    InvalidBidPrice,
    #[msg("Auction is not open for bidding.")]
    AuctionNotOpen,
    #[msg("Auction pair is in mismatched states.")]
    AuctionPairMismatch,
    #[msg("Bid does not belong to this auction.")]
    InvalidBidReceipt,
    #[msg("Stake receipt is not in the Staked state.")]
    ReceiptNotStaked,
    #[msg("Stake receipt is not yet unstaked.")]
    NotYetUnstaked,
    #[msg("Invalid stake receipt.")]
    InvalidStakeReceipt,
}
