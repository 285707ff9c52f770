//! Permission group model
//!
//! Plain data: a named group with its permission tokens and member players.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from group name to group. Iteration order is unspecified.
pub type GroupMap = HashMap<String, Group>;

/// A named bundle of permission tokens and member player identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group name, unique key within a store
    pub name: String,

    /// Permission tokens in declaration order (duplicates allowed)
    pub permissions: Vec<String>,

    /// Player identifiers in insertion order
    pub players: Vec<String>,
}

impl Group {
    /// Create a group with the given permissions and no players
    pub fn new<I, S>(name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
            players: Vec::new(),
        }
    }

    /// Check whether this group holds at least one of the given permissions
    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        permissions
            .iter()
            .any(|p| self.permissions.iter().any(|own| own == p.as_ref()))
    }

    pub fn contains_player(&self, player: &str) -> bool {
        self.players.iter().any(|p| p == player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_has_no_players() {
        let group = Group::new("VIP", ["vip", "special"]);
        assert_eq!(group.name, "VIP");
        assert_eq!(group.permissions, vec!["vip", "special"]);
        assert!(group.players.is_empty());
    }

    #[test]
    fn test_has_any_permission() {
        let group = Group::new("STAFF", ["staff", "vip"]);
        assert!(group.has_any_permission(&["vip"]));
        assert!(group.has_any_permission(&["nope", "staff"]));
        assert!(!group.has_any_permission(&["admin"]));
        assert!(!group.has_any_permission::<&str>(&[]));
    }

    #[test]
    fn test_permission_match_is_exact() {
        let group = Group::new("VIP", ["vip"]);
        assert!(!group.has_any_permission(&["VIP"]));
        assert!(!group.has_any_permission(&["vip "]));
    }

    #[test]
    fn test_contains_player() {
        let mut group = Group::new("VIP", ["vip"]);
        group.players.push("Alice".to_string());
        assert!(group.contains_player("Alice"));
        assert!(!group.contains_player("alice"));
    }
}
