// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON descriptors returned by the CI server's `api/json` endpoints.

use serde::{Deserialize, Deserializer};

/// `GET /job/{name}/api/json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// `GET /job/{name}/{build}/api/json`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDescriptor {
    #[serde(default)]
    pub number: Option<i64>,
    /// Build start, milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default, deserialize_with = "skip_nulls")]
    pub actions: Vec<BuildAction>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub artifacts: Vec<Artifact>,
    #[serde(default, deserialize_with = "skip_nulls")]
    pub sub_builds: Vec<SubBuild>,
    /// Multi-job builds nest their children under `build.subBuilds`.
    #[serde(default)]
    pub build: Option<NestedBuild>,
}

impl BuildDescriptor {
    /// Value of the first build parameter whose name contains `needle`.
    pub fn parameter_containing(&self, needle: &str) -> Option<String> {
        self.actions
            .iter()
            .flat_map(|a| a.parameters.iter())
            .find(|p| p.name.as_deref().is_some_and(|n| n.contains(needle)))
            .map(|p| match &p.value {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            })
    }

    /// Children of a multi-job build, wherever the server put them.
    pub fn nested_sub_builds(&self) -> &[SubBuild] {
        self.build.as_ref().map(|b| b.sub_builds.as_slice()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildAction {
    #[serde(default, deserialize_with = "skip_nulls")]
    pub parameters: Vec<BuildParameter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildParameter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub relative_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubBuild {
    #[serde(default)]
    pub job_name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedBuild {
    #[serde(default, deserialize_with = "skip_nulls")]
    pub sub_builds: Vec<SubBuild>,
}

/// Zero, one, or many of `T`, as the server may send any of the three.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<Option<T>>),
    One(T),
}

/// Normalise a null, single object, or array into one ordered sequence.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(item)) => vec![item],
        Some(OneOrMany::Many(items)) => items.into_iter().flatten().collect(),
    })
}

fn skip_nulls<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
