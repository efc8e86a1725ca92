//! Tests for data records
//!
//! Column lookups, value population and time/position derivation live in
//! `lookup_tests`; message attachment and flag propagation in `message_tests`.
