// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod error;
pub mod installer;
pub mod kubernetes;
pub mod provision;
pub mod rbac;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;
