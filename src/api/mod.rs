pub mod client;
pub mod remote;

pub use client::{ApiClient, ApiError, FetchedRows};
pub use remote::{NetEvent, Remote};
