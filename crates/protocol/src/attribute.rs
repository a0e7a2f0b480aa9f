// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Attribute lists and status records

use serde::{Deserialize, Serialize};

/// Operation applied by an attribute entry.
///
/// `Set`/`Unset`/`Incr`/`Decr` are used when altering objects; the comparison
/// operators are used by selection criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOp {
    #[default]
    Set,
    Unset,
    Incr,
    Decr,
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
    Dflt,
}

/// One `(name, resource, op, value)` entry of an attribute list.
///
/// The list is ordered; name + resource uniqueness is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub op: BatchOp,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource: None,
            value: value.into(),
            op: BatchOp::Set,
        }
    }

    /// Attribute naming a resource, e.g. `Resource_List.ncpus`.
    pub fn resource(
        name: impl Into<String>,
        resource: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            resource: Some(resource.into()),
            value: value.into(),
            op: BatchOp::Set,
        }
    }

    /// Attribute name only, used to restrict which attributes a stat returns.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }

    pub fn with_op(mut self, op: BatchOp) -> Self {
        self.op = op;
        self
    }
}

/// Status of one server-side object (job, queue, node, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatus {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl BatchStatus {
    /// Look up the first attribute value with the given name and resource.
    pub fn get(&self, name: &str, resource: Option<&str>) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name && a.resource.as_deref() == resource)
            .map(|a| a.value.as_str())
    }
}
