pub mod account;
pub mod credit_card;
