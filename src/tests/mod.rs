// Test modules for petfriends-contract crate
//
// Each source file has a corresponding test file that focuses on
// behaviour verification. HTTP-level tests against a fake service live in
// the crate's tests/ directory.

// Test helper utilities
pub mod helpers;
