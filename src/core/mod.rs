pub mod auth;
pub mod client;
pub mod ee;
pub mod expression;
pub mod queries;
