//! Plain HTTP routes outside GraphQL

pub mod health;
