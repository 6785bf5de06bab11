pub mod appview;
pub mod batcher;

pub use appview::{AppViewClient, ProfileSource};
pub use batcher::{FetchError, ProfileBatchFetcher, ProfileResult};
