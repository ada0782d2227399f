//! Integration tests against the in-memory REST stub.
//!
//! 1. Table access probes
//! 2. Test record creation and deletion
//! 3. Seeding
//! 4. Complete run and report verdicts
//! 5. Extended verification

pub mod create_delete_tests;
pub mod end_to_end_tests;
pub mod helpers;
pub mod probe_tests;
