// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Values exchanged with the host application.

pub mod report;
pub mod request;
pub mod response;

pub use report::{CreationOutcome, PreInstallReport};
pub use request::InstallRequest;
pub use response::Response;
