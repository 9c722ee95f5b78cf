mod config_tests;
mod contracts_tests;
mod error_tests;
mod session_tests;
mod units_tests;
