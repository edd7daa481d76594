// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client resolution and namespace management.

pub mod client;
pub mod namespaces;

pub use client::{ClientProvider, KubeconfigProvider};
pub use namespaces::ensure_namespace_exists;
