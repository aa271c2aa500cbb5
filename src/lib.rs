pub mod aggregate;
pub mod config;
pub mod error;
pub mod locator;
pub mod logging;
pub mod orchestrator;
pub mod page;
pub mod reconcile;
pub mod record;
pub mod render;
pub mod time_value;
pub mod tracker;

pub use aggregate::{aggregate, Aggregation, GroupSummary};
pub use config::Config;
pub use error::ReportError;
pub use orchestrator::{Orchestrator, Phase, ScanOutcome};
pub use page::{HostPage, MemoryPage};
pub use tracker::{IssueSource, JiraClient};
