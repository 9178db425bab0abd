pub mod analyzers;
pub mod calendar;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod pager;
pub mod session;
pub mod trip;
