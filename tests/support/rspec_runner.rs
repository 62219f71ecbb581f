//! Drives `rspec` scenarios from `#[test]` functions.
//!
//! rspec catches panics inside examples and only reports them, so the
//! runner checks the suite report and fails the surrounding test itself.

use std::fmt::Debug;
use std::io;
use std::sync::Arc;

use rspec::block::Suite;
use rspec::report::Report;
use rspec::{ConfigurationBuilder, Logger, Runner};

/// Runs `suite` on one thread in declaration order and panics if any
/// example failed.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + Debug,
{
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("invalid rspec configuration: {e}"));
    let runner = Runner::new(config, vec![Arc::new(Logger::new(io::stdout()))]);
    let report = runner.run(suite);
    assert!(
        report.is_success(),
        "{} of {} rspec examples failed",
        report.get_failed(),
        report.get_passed() + report.get_failed()
    );
}
