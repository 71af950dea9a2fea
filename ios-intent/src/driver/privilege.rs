//! Privilege level tracking and navigation.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use regex::bytes::Regex;

use crate::error::{DriverError, Result};
use crate::platform::PrivilegeLevel;

/// Tracks the current CLI mode and plans moves between modes.
///
/// Levels are nodes of an undirected graph whose edges come from each
/// level's `parent`; a move between two levels is the shortest path.
#[derive(Debug)]
pub struct PrivilegeManager {
    levels: IndexMap<String, PrivilegeLevel>,
    graph: HashMap<String, HashSet<String>>,
    current: Option<String>,
}

/// One hop between adjacent levels.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Command to send.
    pub command: String,

    /// Password prompt that may follow the command.
    pub auth_prompt: Option<Regex>,
}

impl PrivilegeManager {
    pub fn new(levels: IndexMap<String, PrivilegeLevel>) -> Self {
        let mut graph: HashMap<String, HashSet<String>> = HashMap::new();
        for (name, level) in &levels {
            graph.entry(name.clone()).or_default();
            if let Some(parent) = &level.parent {
                graph.entry(name.clone()).or_default().insert(parent.clone());
                graph.entry(parent.clone()).or_default().insert(name.clone());
            }
        }

        Self {
            levels,
            graph,
            current: None,
        }
    }

    /// Find the level whose prompt pattern accepts `prompt`.
    pub fn determine_from_prompt(&self, prompt: &str) -> Result<&PrivilegeLevel> {
        self.levels
            .values()
            .find(|level| level.matches(prompt))
            .ok_or_else(|| {
                DriverError::UnknownPrivilege {
                    prompt: prompt.to_string(),
                }
                .into()
            })
    }

    /// Record the level shown by `prompt`, returning its name.
    pub fn update_from_prompt(&mut self, prompt: &str) -> Option<&str> {
        let name = self.determine_from_prompt(prompt).ok()?.name.clone();
        self.current = Some(name);
        self.current.as_deref()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Shortest path between two levels, both ends included.
    pub fn find_path(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let no_path = || DriverError::NoPrivilegePath {
            from: from.to_string(),
            to: to.to_string(),
        };

        if !self.levels.contains_key(from) || !self.levels.contains_key(to) {
            return Err(no_path().into());
        }

        let mut queue = VecDeque::from([from.to_string()]);
        let mut came_from: HashMap<String, String> = HashMap::new();
        let mut seen = HashSet::from([from.to_string()]);

        while let Some(node) = queue.pop_front() {
            if node == to {
                let mut path = vec![to.to_string()];
                let mut step = to;
                while let Some(prev) = came_from.get(step) {
                    path.push(prev.clone());
                    step = prev.as_str();
                }
                path.reverse();
                return Ok(path);
            }

            for next in self.graph.get(&node).into_iter().flatten() {
                if seen.insert(next.clone()) {
                    came_from.insert(next.clone(), node.clone());
                    queue.push_back(next.clone());
                }
            }
        }

        Err(no_path().into())
    }

    /// The command moving from `from` to the adjacent level `to`.
    pub fn transition(&self, from: &str, to: &str) -> Option<Transition> {
        let from_level = self.levels.get(from)?;
        let to_level = self.levels.get(to)?;

        if to_level.parent.as_deref() == Some(from) {
            return Some(Transition {
                command: to_level.escalate_command.clone()?,
                auth_prompt: to_level.auth_prompt.clone(),
            });
        }

        if from_level.parent.as_deref() == Some(to) {
            return Some(Transition {
                command: from_level.deescalate_command.clone()?,
                auth_prompt: None,
            });
        }

        None
    }
}
