pub mod client;
pub mod types;

pub use client::{GhCli, PlatformClient};
pub use types::{NewPullRequest, NewRelease, PrDetails, PrMergeInfo, PrState, ReleaseSummary};
