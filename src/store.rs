//! Permission store
//!
//! Owns the group mapping, loads it from permission file text, and exposes the
//! query and mutation API. A store starts [`StoreState::Uninitialized`]; the
//! first successful load moves it to [`StoreState::Initialized`], and only an
//! overwriting load may replace an initialized store.

use crate::error::{StoreError, StoreResult};
use crate::model::{Group, GroupMap};
use crate::parser::parse;
use std::collections::HashSet;
use tracing::debug;

/// Lifecycle state of a [`PermissionStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoreState {
    /// No data loaded; every query and mutation fails
    #[default]
    Uninitialized,
    /// Data loaded; holds the live group mapping
    Initialized(GroupMap),
}

/// In-memory permission group store
#[derive(Debug, Clone, Default)]
pub struct PermissionStore {
    state: StoreState,
}

impl PermissionStore {
    /// Create an uninitialized store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded from permission file text
    pub fn from_text(text: &str) -> Self {
        Self::from_groups(parse(text).into_values())
    }

    /// Create a store pre-loaded from already parsed groups
    ///
    /// Groups are keyed by their own name; groups with an empty name are dropped.
    pub fn from_groups<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = Group>,
    {
        let groups: GroupMap = groups
            .into_iter()
            .filter(|g| !g.name.is_empty())
            .map(|g| (g.name.clone(), g))
            .collect();

        debug!(groups = groups.len(), "Permission store initialized");
        Self {
            state: StoreState::Initialized(groups),
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, StoreState::Initialized(_))
    }

    /// Load permission file text into an uninitialized store
    pub fn load(&mut self, text: &str) -> StoreResult<()> {
        self.load_with(text, false)
    }

    /// Load permission file text, replacing existing data when `overwrite` is set
    pub fn load_with(&mut self, text: &str, overwrite: bool) -> StoreResult<()> {
        if self.is_initialized() && !overwrite {
            return Err(StoreError::AlreadyInitialized);
        }

        let groups = parse(text);
        debug!(groups = groups.len(), overwrite, "Loaded permission data");
        self.state = StoreState::Initialized(groups);
        Ok(())
    }

    fn groups_map(&self) -> StoreResult<&GroupMap> {
        match &self.state {
            StoreState::Initialized(groups) => Ok(groups),
            StoreState::Uninitialized => Err(StoreError::NotInitialized),
        }
    }

    fn groups_map_mut(&mut self) -> StoreResult<&mut GroupMap> {
        match &mut self.state {
            StoreState::Initialized(groups) => Ok(groups),
            StoreState::Uninitialized => Err(StoreError::NotInitialized),
        }
    }

    fn group_mut(&mut self, name: &str) -> StoreResult<&mut Group> {
        self.groups_map_mut()?
            .get_mut(name)
            .ok_or_else(|| StoreError::group_not_found(name))
    }

    /// All group names, in no particular order
    pub fn group_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.groups_map()?.keys().cloned().collect())
    }

    /// All groups, in no particular order
    pub fn groups(&self) -> StoreResult<impl Iterator<Item = &Group>> {
        Ok(self.groups_map()?.values())
    }

    pub fn group(&self, name: &str) -> StoreResult<&Group> {
        self.groups_map()?
            .get(name)
            .ok_or_else(|| StoreError::group_not_found(name))
    }

    /// Players of a single group, in insertion order
    pub fn players_in_group(&self, name: &str) -> StoreResult<&[String]> {
        Ok(&self.group(name)?.players)
    }

    /// Distinct players of every group holding at least one of `permissions`
    ///
    /// Each player appears once, at its first occurrence.
    pub fn players_with_permissions<I, S>(&self, permissions: I) -> StoreResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let groups = self.groups_map()?;
        let wanted: Vec<S> = permissions.into_iter().collect();

        let mut seen = HashSet::new();
        let mut players = Vec::new();
        for group in groups.values().filter(|g| g.has_any_permission(&wanted)) {
            for player in &group.players {
                if seen.insert(player.as_str()) {
                    players.push(player.clone());
                }
            }
        }

        Ok(players)
    }

    /// Create a new group with no players
    ///
    /// Blank names are rejected with [`StoreError::EmptyGroupName`].
    ///
    /// Every other group sharing a permission with the new group receives the
    /// new group's players. New groups start empty, so this currently appends
    /// nothing.
    pub fn add_group<I, S>(&mut self, name: &str, permissions: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups = self.groups_map_mut()?;
        if name.trim().is_empty() {
            return Err(StoreError::EmptyGroupName);
        }
        if groups.contains_key(name) {
            return Err(StoreError::group_already_exists(name));
        }

        let group = Group::new(name, permissions);
        for existing in groups.values_mut() {
            if existing.has_any_permission(&group.permissions) {
                existing.players.extend(group.players.iter().cloned());
            }
        }

        debug!(group = name, permissions = ?group.permissions, "Added group");
        groups.insert(name.to_string(), group);
        Ok(())
    }

    /// Remove a group, returning it
    ///
    /// Players propagated into other groups by [`add_group`](Self::add_group)
    /// stay where they are.
    pub fn remove_group(&mut self, name: &str) -> StoreResult<Group> {
        let removed = self
            .groups_map_mut()?
            .remove(name)
            .ok_or_else(|| StoreError::group_not_found(name))?;

        debug!(group = name, "Removed group");
        Ok(removed)
    }

    /// Add a player to a group
    ///
    /// Returns `false` without modifying the group if the player is already a member.
    pub fn add_player(&mut self, player: &str, group: &str) -> StoreResult<bool> {
        let target = self.group_mut(group)?;
        if target.contains_player(player) {
            return Ok(false);
        }

        target.players.push(player.to_string());
        debug!(player, group, "Added player");
        Ok(true)
    }

    /// Remove the first occurrence of a player from a group
    pub fn remove_player(&mut self, player: &str, group: &str) -> StoreResult<()> {
        let target = self.group_mut(group)?;
        let index = target
            .players
            .iter()
            .position(|p| p == player)
            .ok_or_else(|| StoreError::player_not_found(player, group))?;

        target.players.remove(index);
        debug!(player, group, "Removed player");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = ">> VIP > vip+special\nAlice\nBob\n>> STAFF > staff\nCarol\n";

    #[test]
    fn test_new_store_is_uninitialized() {
        let store = PermissionStore::new();
        assert!(!store.is_initialized());
        assert_eq!(store.state(), &StoreState::Uninitialized);
    }

    #[test]
    fn test_from_text_is_initialized() {
        let store = PermissionStore::from_text(SAMPLE);
        assert!(store.is_initialized());
        assert_eq!(store.players_in_group("VIP").unwrap(), ["Alice", "Bob"]);
    }

    #[test]
    fn test_from_groups_keys_by_name_and_skips_unnamed() {
        let store = PermissionStore::from_groups([
            Group::new("VIP", ["vip"]),
            Group::new("", ["ghost"]),
        ]);
        assert_eq!(store.group_names().unwrap(), vec!["VIP".to_string()]);
    }

    #[test]
    fn test_from_text_rejects_plain_load() {
        let mut store = PermissionStore::from_text(SAMPLE);
        assert_eq!(store.load(SAMPLE), Err(StoreError::AlreadyInitialized));
    }

    #[test]
    fn test_failed_load_leaves_state_untouched() {
        let mut store = PermissionStore::from_text(SAMPLE);
        assert_eq!(
            store.load(">> OTHER > other\n"),
            Err(StoreError::AlreadyInitialized)
        );
        assert!(store.group("VIP").is_ok());
        assert!(store.group("OTHER").is_err());
    }

    #[test]
    fn test_add_group_does_not_touch_sharing_groups() {
        let mut store = PermissionStore::from_text(SAMPLE);
        store.add_group("ELITE", ["vip"]).unwrap();

        assert_eq!(store.players_in_group("VIP").unwrap(), ["Alice", "Bob"]);
        assert!(store.players_in_group("ELITE").unwrap().is_empty());
    }

    #[test]
    fn test_remove_player_removes_first_occurrence_only() {
        let mut store = PermissionStore::from_text(">> G > g\nx\ny\nx\n");
        store.remove_player("x", "G").unwrap();
        assert_eq!(store.players_in_group("G").unwrap(), ["y", "x"]);
    }

    #[test]
    fn test_remove_group_returns_removed_group() {
        let mut store = PermissionStore::from_text(SAMPLE);
        let removed = store.remove_group("STAFF").unwrap();
        assert_eq!(removed.players, vec!["Carol"]);
        assert_eq!(
            store.group("STAFF"),
            Err(StoreError::group_not_found("STAFF"))
        );
    }
}
