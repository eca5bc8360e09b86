pub mod eligibility;
pub mod filter;
