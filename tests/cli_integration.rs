/// End-to-end CLI integration tests
///
/// Runs the slashdeck binary against temporary config files and plugin
/// directories, and against a local HTTP server standing in for the
/// platform API.
#[path = "cli/common.rs"]
mod common;

#[path = "cli/help_tests.rs"]
mod help_tests;

#[path = "cli/list_tests.rs"]
mod list_tests;
