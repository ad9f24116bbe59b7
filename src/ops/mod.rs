pub mod cache;
pub mod route;
pub mod scope;
pub mod workflow;
