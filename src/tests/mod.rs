// Test modules for Outreach Hub
// Each module covers the corresponding source module; `fixtures` and
// `mock_server` are shared helpers.

mod mock_server;

mod config_tests;
mod lib_tests;
mod reconcile_tests;
