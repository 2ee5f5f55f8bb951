// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! This module contains property-based tests using proptest to verify the
//! algebraic laws of the deferred computation containers.

mod maybe_laws;
mod outcome_algebra;
