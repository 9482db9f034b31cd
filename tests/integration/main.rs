//! Integration test harness. Tests hit a running server; see api_tests.rs.

mod api_tests;
