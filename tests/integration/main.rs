//! Integration test entry point.

mod helpers;

mod health_test;
mod notification_test;
mod ws_test;
