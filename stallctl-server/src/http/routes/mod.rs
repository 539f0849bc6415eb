//! Route handlers organized by resource

pub mod calendar;
pub mod dashboard;
pub mod days;
pub mod health;
pub mod ingredients;
pub mod items;
pub mod recipes;
pub mod sales;
pub mod timers;
