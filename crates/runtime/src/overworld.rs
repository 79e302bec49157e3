//! Overworld node graph between battles.
//!
//! Nodes are linked by undirected roads. A node's completion is stored in
//! the [`SaveFlags`] store, so progress survives as long as the flags do.
//! Reachability is a breadth-first search from the start node that only
//! travels onward from completed nodes: the frontier of the campaign is
//! every uncompleted node next to completed ground.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::info;

use tactics_core::BattleDescriptor;

use crate::context::SaveFlags;
use crate::error::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverworldNode {
    pub id: String,
    pub name: String,
    pub battle: Option<BattleDescriptor>,
    links: BTreeSet<String>,
}

impl OverworldNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            battle: None,
            links: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_battle(mut self, battle: BattleDescriptor) -> Self {
        self.battle = Some(battle);
        self
    }

    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overworld {
    start: String,
    nodes: BTreeMap<String, OverworldNode>,
}

impl Overworld {
    pub fn new(start: OverworldNode) -> Self {
        let id = start.id.clone();
        Self {
            start: id.clone(),
            nodes: BTreeMap::from([(id, start)]),
        }
    }

    #[must_use]
    pub fn with_node(mut self, node: OverworldNode) -> Self {
        self.nodes.insert(node.id.clone(), node);
        self
    }

    /// Adds a road between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::UnknownNode`] when either end is missing.
    pub fn link(&mut self, a: &str, b: &str) -> Result<()> {
        for id in [a, b] {
            if !self.nodes.contains_key(id) {
                return Err(RuntimeError::UnknownNode(id.to_string()));
            }
        }
        if let Some(node) = self.nodes.get_mut(a) {
            node.links.insert(b.to_string());
        }
        if let Some(node) = self.nodes.get_mut(b) {
            node.links.insert(a.to_string());
        }
        Ok(())
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn node(&self, id: &str) -> Option<&OverworldNode> {
        self.nodes.get(id)
    }

    pub fn completion_flag(id: &str) -> String {
        format!("node.{id}.complete")
    }

    pub fn is_completed(&self, id: &str, flags: &SaveFlags) -> bool {
        flags.is_set(&Self::completion_flag(id))
    }

    /// Every node the player can travel to with the current progress.
    pub fn reachable(&self, flags: &SaveFlags) -> BTreeSet<String> {
        let mut reached = BTreeSet::from([self.start.clone()]);
        let mut queue = VecDeque::from([self.start.as_str()]);
        while let Some(current) = queue.pop_front() {
            if !self.is_completed(current, flags) {
                continue;
            }
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            for next in node.links() {
                if reached.insert(next.to_string()) {
                    queue.push_back(next);
                }
            }
        }
        reached
    }

    pub fn can_enter(&self, id: &str, flags: &SaveFlags) -> bool {
        self.reachable(flags).contains(id)
    }

    /// Battle to fight on entering `id`.
    ///
    /// # Errors
    ///
    /// Fails for unknown or unreachable nodes and for nodes without a
    /// battle.
    pub fn enter(&self, id: &str, flags: &SaveFlags) -> Result<&BattleDescriptor> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| RuntimeError::UnknownNode(id.to_string()))?;
        if !self.can_enter(id, flags) {
            return Err(RuntimeError::NodeLocked(id.to_string()));
        }
        node.battle
            .as_ref()
            .ok_or_else(|| RuntimeError::NoBattle(id.to_string()))
    }

    /// Marks `id` completed, opening the roads leaving it.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::UnknownNode`] for unknown nodes.
    pub fn complete(&self, id: &str, flags: &mut SaveFlags) -> Result<()> {
        if !self.nodes.contains_key(id) {
            return Err(RuntimeError::UnknownNode(id.to_string()));
        }
        flags.set(Self::completion_flag(id));
        info!(node = id, "overworld node completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// camp ── bridge ── keep
    ///    └──── marsh
    fn campaign() -> Overworld {
        let mut world = Overworld::new(OverworldNode::new("camp", "Camp"))
            .with_node(
                OverworldNode::new("bridge", "Bridge").with_battle(BattleDescriptor::new(6, 6)),
            )
            .with_node(OverworldNode::new("keep", "Keep").with_battle(BattleDescriptor::new(9, 9)))
            .with_node(OverworldNode::new("marsh", "Marsh"));
        world.link("camp", "bridge").expect("nodes exist");
        world.link("bridge", "keep").expect("nodes exist");
        world.link("camp", "marsh").expect("nodes exist");
        world
    }

    fn ids(set: BTreeSet<String>) -> Vec<String> {
        set.into_iter().collect()
    }

    #[test]
    fn only_start_is_open_before_progress() {
        let world = campaign();
        assert_eq!(ids(world.reachable(&SaveFlags::new())), ["camp"]);
    }

    #[test]
    fn completed_nodes_open_their_roads() {
        let world = campaign();
        let mut flags = SaveFlags::new();
        world.complete("camp", &mut flags).expect("known node");
        assert_eq!(ids(world.reachable(&flags)), ["bridge", "camp", "marsh"]);
        assert!(!world.can_enter("keep", &flags));

        world.complete("bridge", &mut flags).expect("known node");
        assert!(world.can_enter("keep", &flags));
    }

    #[test]
    fn completion_behind_a_locked_node_does_not_leak() {
        let world = campaign();
        let mut flags = SaveFlags::new();
        world.complete("keep", &mut flags).expect("known node");
        assert_eq!(ids(world.reachable(&flags)), ["camp"]);
    }

    #[test]
    fn enter_reports_why_it_failed() {
        let world = campaign();
        let mut flags = SaveFlags::new();
        assert!(matches!(world.enter("atlantis", &flags), Err(RuntimeError::UnknownNode(_))));
        assert!(matches!(world.enter("bridge", &flags), Err(RuntimeError::NodeLocked(_))));
        world.complete("camp", &mut flags).expect("known node");
        assert!(matches!(world.enter("marsh", &flags), Err(RuntimeError::NoBattle(_))));
        assert_eq!(world.enter("bridge", &flags).map(|b| b.width).ok(), Some(6));
    }

    #[test]
    fn link_rejects_unknown_nodes() {
        let mut world = campaign();
        assert!(world.link("camp", "nowhere").is_err());
    }
}
