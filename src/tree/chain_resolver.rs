use std::collections::{HashMap, HashSet};

use hashlink::{LinkedHashMap, LinkedHashSet};
use tracing::trace;

use crate::ext::{TreePathExt, parent_path};

/// Minimum number of single-child hops before a chain is flattened.
///
/// `src -> src/components` is one hop and stays as two rows.
pub const MIN_CHAIN_HOPS: usize = 2;

/// A run of single-child directories that renders as one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// Directory ids from chain start to endpoint, inclusive.
    pub members: Vec<String>,
    /// Slash-joined label from the chain start to the endpoint.
    pub name: String,
}

impl Chain {
    pub fn endpoint(&self) -> &str {
        self.members.last().map(String::as_str).unwrap_or_default()
    }

    /// Members that are swallowed by the chain, i.e. all but the endpoint.
    pub fn interior(&self) -> &[String] {
        &self.members[..self.members.len().saturating_sub(1)]
    }
}

/// Finds where single-child directory chains end.
///
/// Endpoints are cached for every directory walked through, so chains sharing a
/// suffix are only walked once.
pub struct ChainResolver<'a> {
    children: &'a LinkedHashMap<String, LinkedHashSet<String>>,
    directories: &'a HashSet<String>,
    endpoints: HashMap<String, String>,
}

impl<'a> ChainResolver<'a> {
    pub fn new(
        children: &'a LinkedHashMap<String, LinkedHashSet<String>>,
        directories: &'a HashSet<String>,
    ) -> Self {
        Self {
            children,
            directories,
            endpoints: HashMap::new(),
        }
    }

    /// The single child of `directory` if it has exactly one and that child is a directory.
    fn sole_directory_child(&self, directory: &str) -> Option<&'a str> {
        let children = self.children.get(directory)?;
        if children.len() != 1 {
            return None;
        }
        children
            .front()
            .map(String::as_str)
            .filter(|child| self.directories.contains(*child))
    }

    /// Follows sole directory children from `start` until the chain ends.
    pub fn endpoint(&mut self, start: &str) -> String {
        let mut walked = Vec::new();
        let mut current = start.to_string();

        let endpoint = loop {
            if let Some(cached) = self.endpoints.get(&current) {
                break cached.clone();
            }
            match self.sole_directory_child(&current) {
                Some(child) => {
                    walked.push(std::mem::replace(&mut current, child.to_string()));
                }
                None => {
                    walked.push(current.clone());
                    break current;
                }
            }
        };

        for directory in walked {
            self.endpoints.insert(directory, endpoint.clone());
        }
        endpoint
    }

    /// Returns the flattenable chain starting at `start`, if it is long enough.
    pub fn chain(&mut self, start: &str) -> Option<Chain> {
        if !self.directories.contains(start) {
            return None;
        }

        let endpoint = self.endpoint(start);
        let start_depth = start.depth();
        let hops = endpoint.depth() - start_depth;
        if hops < MIN_CHAIN_HOPS {
            return None;
        }

        let members = endpoint
            .prefixes()
            .skip(start_depth - 1)
            .map(str::to_string)
            .collect::<Vec<_>>();
        let name = match parent_path(start) {
            Some(parent) => endpoint[parent.len() + 1..].to_string(),
            None => endpoint.clone(),
        };
        trace!("Resolved chain '{}' -> '{}' ({} hops)", start, endpoint, hops);

        Some(Chain { members, name })
    }
}
