#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{Expense, MemberBalances, Money, Settlement, ShareMap, SplitPolicy, Transfer};
pub use services::{
    AllocationError, BalanceAccumulator, SettlementInconsistency, SettlementSolver,
    SplitCalculator, accumulate, infer_percentages, infer_share_weights,
    suggest_equal_percentages,
};
