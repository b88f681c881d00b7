//! Infrastructure adapters: everything that talks to the outside world.
//!
//! Every external call is routed through the `CommandRunner` port so tests
//! can inject canned output without spawning processes.

pub mod aws;
pub mod command_runner;
pub mod store;

pub use aws::AwsCliCompute;
pub use command_runner::TokioCommandRunner;
pub use store::DynamoCliStore;
