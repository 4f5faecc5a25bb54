//! Enum types for the Arc domain model.
//!
//! Each enum has:
//! - Custom Serialize (as snake_case/kebab-case string)
//! - Custom Deserialize (known variants + catch-all Custom/Other(String))
//! - `as_str()`, `is_default()`, `Display` impl

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Macro: defines an enum with known string variants + a Custom(String) fallback.
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident, custom_variant = $custom_variant:ident,
        variants: [
            $( ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            $custom_variant(String),
        }

        impl $name {
            /// Returns the string representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $str, )+
                    Self::$custom_variant(s) => s.as_str(),
                }
            }

            /// Returns `true` if this is the default variant.
            pub fn is_default(&self) -> bool {
                *self == Self::$default
            }

            /// Returns `true` if this is a well-known (non-custom) variant.
            pub fn is_builtin(&self) -> bool {
                !matches!(self, Self::$custom_variant(_))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s.as_str()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $( $str => Self::$variant, )+
                    other => Self::$custom_variant(other.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $( $str => Self::$variant, )+
                    _ => Self::$custom_variant(s),
                }
            }
        }
    };
}

// ===========================================================================
// Status
// ===========================================================================

define_enum! {
    /// Current state of an issue.
    Status, default = Open, custom_variant = Custom,
    variants: [
        (Open, "open"),
        (InProgress, "in_progress"),
        (Blocked, "blocked"),
        (Deferred, "deferred"),
        (Closed, "closed"),
    ]
}

// ===========================================================================
// IssueType
// ===========================================================================

define_enum! {
    /// Categorises the kind of work.
    IssueType, default = Task, custom_variant = Custom,
    variants: [
        (Bug, "bug"),
        (Feature, "feature"),
        (Task, "task"),
        (Epic, "epic"),
        (Chore, "chore"),
    ]
}

// ===========================================================================
// DependencyType
// ===========================================================================

define_enum! {
    /// Relationship type between issues.
    DependencyType, default = Blocks, custom_variant = Custom,
    variants: [
        (Blocks, "blocks"),
        (ParentChild, "parent-child"),
        (Related, "related"),
        (DiscoveredFrom, "discovered-from"),
    ]
}

impl DependencyType {
    /// Returns `true` if this dependency type blocks work (affects ready
    /// calculation): `blocks` and `parent-child` only, per the ready-work
    /// contract (§4.1).
    pub fn affects_ready_work(&self) -> bool {
        matches!(self, Self::Blocks | Self::ParentChild)
    }
}

// ===========================================================================
// CommentType
// ===========================================================================

define_enum! {
    /// Distinguishes a plain comment from a plan-history entry.
    CommentType, default = Comment, custom_variant = Custom,
    variants: [
        (Comment, "comment"),
        (Plan, "plan"),
    ]
}

// ===========================================================================
// SortPolicy
// ===========================================================================

define_enum! {
    /// Determines how ready work is ordered.
    SortPolicy, default = Hybrid, custom_variant = Custom,
    variants: [
        (Hybrid, "hybrid"),
        (Priority, "priority"),
        (Oldest, "oldest"),
    ]
}

// ===========================================================================
// EventType
// ===========================================================================

/// Categorises audit trail events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Created,
    Updated,
    StatusChanged,
    Closed,
    Reopened,
    Commented,
    DependencyAdded,
    DependencyRemoved,
    LabelAdded,
    LabelRemoved,
    /// Catch-all for unanticipated event types.
    Other(String),
}

impl EventType {
    /// Returns the string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
            Self::Commented => "commented",
            Self::DependencyAdded => "dependency_added",
            Self::DependencyRemoved => "dependency_removed",
            Self::LabelAdded => "label_added",
            Self::LabelRemoved => "label_removed",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl Default for EventType {
    fn default() -> Self {
        Self::Created
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            "created" => Self::Created,
            "updated" => Self::Updated,
            "status_changed" => Self::StatusChanged,
            "closed" => Self::Closed,
            "reopened" => Self::Reopened,
            "commented" => Self::Commented,
            "dependency_added" => Self::DependencyAdded,
            "dependency_removed" => Self::DependencyRemoved,
            "label_added" => Self::LabelAdded,
            "label_removed" => Self::LabelRemoved,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_default_is_open() {
        assert_eq!(Status::default(), Status::Open);
        assert!(Status::Open.is_default());
    }

    #[test]
    fn status_serde_roundtrip() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Status::InProgress);
    }

    #[test]
    fn status_unknown_becomes_custom() {
        let s: Status = "frobnicated".into();
        assert_eq!(s, Status::Custom("frobnicated".into()));
        assert!(!s.is_builtin());
    }

    #[test]
    fn dependency_type_affects_ready_work() {
        assert!(DependencyType::Blocks.affects_ready_work());
        assert!(DependencyType::ParentChild.affects_ready_work());
        assert!(!DependencyType::Related.affects_ready_work());
        assert!(!DependencyType::DiscoveredFrom.affects_ready_work());
    }

    #[test]
    fn sort_policy_default_is_hybrid() {
        assert_eq!(SortPolicy::default(), SortPolicy::Hybrid);
    }

    #[test]
    fn event_type_other_roundtrip() {
        let json = "\"compacted\"";
        let e: EventType = serde_json::from_str(json).unwrap();
        assert_eq!(e, EventType::Other("compacted".into()));
        assert_eq!(e.as_str(), "compacted");
    }

    #[test]
    fn comment_type_default_is_comment() {
        assert_eq!(CommentType::default(), CommentType::Comment);
    }
}
