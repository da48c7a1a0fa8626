//! Shared helpers for git-cleanup integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod fake_prs;
pub mod fixtures;
pub mod git_helpers;
