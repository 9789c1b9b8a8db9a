pub mod commit_analyzer;
pub mod pr_fetcher;
pub mod resolver;

pub use commit_analyzer::{CommitAnalyzer, CommitInfo};
pub use pr_fetcher::fetch_pr_details;
pub use resolver::{ChangeResolver, ChangeSet};
