//! Name table for definition file identifiers.
//!
//! [`Names`] maps identifier strings to dense [`NameId`]s in first-seen
//! order, and proposes close matches for misspelled words.

use std::collections::HashMap;
use std::fmt;

/// An interned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameId(pub usize);

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Append-only identifier table.
#[derive(Debug, Clone, Default)]
pub struct Names {
    names: Vec<String>,
    index: HashMap<String, NameId>,
}

impl Names {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `name`, adding it if not already present.
    pub fn lookup(&mut self, name: &str) -> NameId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = NameId(self.names.len());
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        id
    }

    /// Look up every name in order, adding the missing ones.
    pub fn lookup_all<'a, I>(&mut self, names: I) -> Vec<NameId>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().map(|name| self.lookup(name)).collect()
    }

    /// Return the id for `name` without adding it.
    pub fn query(&self, name: &str) -> Option<NameId> {
        self.index.get(name).copied()
    }

    /// Return the string for `id`.
    pub fn get(&self, id: NameId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over all names in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NameId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (NameId(i), name.as_str()))
    }

    /// Names sharing the longest common prefix with `target`.
    pub fn recommend(&self, target: &str) -> Vec<&str> {
        suggest(target, self.names.iter().map(String::as_str))
    }
}

/// Length of the common prefix of two words, ignoring ASCII case.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x.eq_ignore_ascii_case(y))
        .count()
}

/// Pick the candidates closest to `target`.
///
/// Returns every candidate that shares the longest non-empty common prefix
/// with `target`, in candidate order. An exact match is never suggested.
pub fn suggest<'a, I>(target: &str, candidates: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best = 0;
    let mut matches = Vec::new();
    for candidate in candidates {
        if candidate == target {
            continue;
        }
        let len = common_prefix_len(target, candidate);
        if len == 0 || len < best {
            continue;
        }
        if len > best {
            best = len;
            matches.clear();
        }
        matches.push(candidate);
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_assigns_ids_in_order() {
        let mut names = Names::new();
        assert_eq!(names.lookup("DEVICE"), NameId(0));
        assert_eq!(names.lookup("CONNECT"), NameId(1));
        assert_eq!(names.lookup("DEVICE"), NameId(0));
        assert_eq!(
            names.lookup_all(["CLOCK", "AND", "CONNECT"]),
            vec![NameId(2), NameId(3), NameId(1)]
        );
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_query_does_not_insert() {
        let mut names = Names::new();
        names.lookup_all(["G1", "G2"]);
        assert_eq!(names.query("G2"), Some(NameId(1)));
        assert_eq!(names.query("g2"), None);
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_get() {
        let mut names = Names::new();
        let id = names.lookup("sw1");
        assert_eq!(names.get(id), Some("sw1"));
        assert_eq!(names.get(NameId(12)), None);
    }

    #[test]
    fn test_suggest_longest_prefix() {
        let candidates = ["DEVICE", "DTYPE", "CONNECT", "MONITOR"];
        assert_eq!(suggest("DEVIC", candidates), vec!["DEVICE"]);
        assert_eq!(suggest("device", candidates), vec!["DEVICE"]);
        assert_eq!(suggest("DX", candidates), vec!["DEVICE", "DTYPE"]);
        assert!(suggest("XYZ", candidates).is_empty());
        assert!(suggest("DEVICE", candidates[..1].iter().copied()).is_empty());
    }

    #[test]
    fn test_recommend() {
        let mut names = Names::new();
        names.lookup_all(["clock1", "clk", "sw1"]);
        assert_eq!(names.recommend("clock"), vec!["clock1"]);
        assert_eq!(names.recommend("s"), vec!["sw1"]);
    }
}
