//! Access control keyed by `(service, entity, operation)` triples.

use std::{borrow::Cow, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Matches every entity of a service.
pub const ANY_ENTITY: &str = "*";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessService {
    Project,
    Platform,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessOperation {
    Create,
    Read,
    Update,
    Delete,
}

impl AccessService {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Platform => "platform",
        }
    }
}

impl AccessOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for AccessService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for AccessOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessService {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Self::Project),
            "platform" => Ok(Self::Platform),
            _ => Err(Error::UnknownAccessValue("service", s.to_string())),
        }
    }
}

impl FromStr for AccessOperation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(Error::UnknownAccessValue("operation", s.to_string())),
        }
    }
}

/// The access a page or route needs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessRequest {
    pub service: AccessService,
    pub entity: Cow<'static, str>,
    pub operation: AccessOperation,
}

impl AccessRequest {
    pub fn new(
        service: AccessService,
        entity: impl Into<Cow<'static, str>>,
        operation: AccessOperation,
    ) -> Self {
        AccessRequest {
            service,
            entity: entity.into(),
            operation,
        }
    }

    pub fn project(entity: impl Into<Cow<'static, str>>, operation: AccessOperation) -> Self {
        Self::new(AccessService::Project, entity, operation)
    }
}

impl std::fmt::Display for AccessRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.service, self.entity, self.operation)
    }
}

/// One permitted triple. The entity may be [ANY_ENTITY].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    pub service: AccessService,
    pub entity: String,
    pub operation: AccessOperation,
}

impl Grant {
    pub fn new(
        service: AccessService,
        entity: impl Into<String>,
        operation: AccessOperation,
    ) -> Self {
        Grant {
            service,
            entity: entity.into(),
            operation,
        }
    }

    pub fn matches(&self, request: &AccessRequest) -> bool {
        self.service == request.service
            && self.operation == request.operation
            && (self.entity == ANY_ENTITY || self.entity == request.entity)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    grants: Vec<Grant>,
}

impl PermissionSet {
    pub fn new(grants: Vec<Grant>) -> Self {
        PermissionSet { grants }
    }

    /// Every operation on every entity of the service.
    pub fn full_access(service: AccessService) -> Self {
        [
            AccessOperation::Create,
            AccessOperation::Read,
            AccessOperation::Update,
            AccessOperation::Delete,
        ]
        .into_iter()
        .map(|op| Grant::new(service, ANY_ENTITY, op))
        .collect()
    }

    pub fn allows(&self, request: &AccessRequest) -> bool {
        self.grants.iter().any(|g| g.matches(request))
    }

    pub fn grant(&mut self, grant: Grant) {
        if !self.grants.contains(&grant) {
            self.grants.push(grant);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Grant> {
        self.grants.iter()
    }
}

impl FromIterator<Grant> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Grant>>(iter: T) -> Self {
        let mut set = PermissionSet::default();
        for grant in iter {
            set.grant(grant);
        }
        set
    }
}
