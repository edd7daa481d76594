// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use serde::Serialize;

/// Result of a single create call during pre-install
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "message")]
pub enum CreationOutcome {
    Created,
    AlreadyExists,
    Failed(String),
}

/// Per-object outcomes of pre-install, in creation order
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PreInstallReport {
    pub objects: Vec<(String, CreationOutcome)>,
}

impl PreInstallReport {
    pub fn record(&mut self, object: impl Into<String>, outcome: CreationOutcome) {
        self.objects.push((object.into(), outcome));
    }

    /// Objects whose creation failed for a reason other than already existing
    pub fn failed(&self) -> Vec<String> {
        self.objects
            .iter()
            .filter(|(_, outcome)| matches!(outcome, CreationOutcome::Failed(_)))
            .map(|(object, _)| object.clone())
            .collect()
    }

    pub fn outcome(&self, object: &str) -> Option<&CreationOutcome> {
        self.objects
            .iter()
            .find(|(name, _)| name == object)
            .map(|(_, outcome)| outcome)
    }
}
