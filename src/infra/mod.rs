pub mod catalog;
pub mod retry;
pub mod subsource;
