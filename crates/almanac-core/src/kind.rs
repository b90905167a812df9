//! The closed set of catalog entity kinds.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Error returned when a string does not name a known [`Kind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown kind `{0}`")]
pub struct UnknownKind(pub String);

/// Kind of a catalog entity.
///
/// Reference strings use the lowercase names (`component:checkout`), catalog
/// documents use the document names (`kind: Component`, `kind: API`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Domain,
    System,
    Component,
    Resource,
    Api,
    Group,
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 6] = [
        Kind::Domain,
        Kind::System,
        Kind::Component,
        Kind::Resource,
        Kind::Api,
        Kind::Group,
    ];

    /// Returns the lowercase name used in reference strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Domain => "domain",
            Kind::System => "system",
            Kind::Component => "component",
            Kind::Resource => "resource",
            Kind::Api => "api",
            Kind::Group => "group",
        }
    }

    /// Returns the name used in the `kind` field of catalog documents.
    pub fn document_name(&self) -> &'static str {
        match self {
            Kind::Domain => "Domain",
            Kind::System => "System",
            Kind::Component => "Component",
            Kind::Resource => "Resource",
            Kind::Api => "API",
            Kind::Group => "Group",
        }
    }

    /// Returns `true` if entities of this kind may be the target of a
    /// `dependsOn` edge.
    pub fn is_dependency_target(&self) -> bool {
        matches!(self, Kind::Component | Kind::Resource)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = UnknownKind;

    /// Parses a lowercase kind name as it appears in reference strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("component".parse::<Kind>(), Ok(Kind::Component));
        assert_eq!("api".parse::<Kind>(), Ok(Kind::Api));
        assert_eq!(
            "API".parse::<Kind>(),
            Err(UnknownKind("API".to_string())),
            "reference strings use lowercase kinds only"
        );
        assert!("service".parse::<Kind>().is_err());
    }

    #[test]
    fn test_kind_display_roundtrip() {
        for kind in Kind::ALL {
            assert_eq!(kind.to_string().parse::<Kind>(), Ok(kind));
        }
    }

    #[test]
    fn test_document_names() {
        assert_eq!(Kind::Api.document_name(), "API");
        assert_eq!(Kind::Group.document_name(), "Group");
    }

    #[test]
    fn test_dependency_targets() {
        let targets: Vec<_> = Kind::ALL
            .into_iter()
            .filter(Kind::is_dependency_target)
            .collect();
        assert_eq!(targets, vec![Kind::Component, Kind::Resource]);
    }
}
