//! Tests for the eddy-engine crate.

mod helpers;

mod basic;
