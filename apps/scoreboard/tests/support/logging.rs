//! Logging for integration test binaries.
//!
//! Same filter precedence as the unit-test bootstrap: `TEST_LOG`, then
//! `RUST_LOG`, then `"warn"`.
//!
//! ```bash
//! TEST_LOG=debug cargo test -p scoreboard --test session_service_tests
//! ```

#[ctor::ctor]
fn _auto_init_for_integration_tests() {
    test_support::logging::init();
}
