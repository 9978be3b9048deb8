pub mod bundle;
pub mod core;
pub mod form;
pub mod schedule;
