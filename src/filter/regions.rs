use std::collections::HashMap;

/// Built-in region aliases: control label → substring found in article text.
///
/// Several labels intentionally share a target ("Македонија" and "Балкан"
/// both match Balkan coverage).
pub const DEFAULT_REGION_ALIASES: &[(&str, &str)] = &[
    ("Македонија", "Балкан"),
    ("Балкан", "Балкан"),
    ("Европа", "Европска"),
    ("Азија", "Азија"),
    ("Индија", "Индија"),
    ("Африка", "Африка"),
    ("Америка", "Америка"),
    ("Австралија", "Австралија"),
    ("Антарктик", "Антарктик"),
];

/// Static mapping from a user-facing region label to its match string.
///
/// Order is preserved so that [`RegionAliasTable::tag_for`] is deterministic.
/// Labels without an entry resolve to themselves.
#[derive(Debug, Clone)]
pub struct RegionAliasTable {
    entries: Vec<(String, String)>,
}

impl Default for RegionAliasTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_REGION_ALIASES
                .iter()
                .map(|(label, target)| (label.to_string(), target.to_string()))
                .collect(),
        }
    }
}

impl RegionAliasTable {
    /// Table with no entries; every label resolves to itself.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Built-in table with `overrides` applied on top.
    ///
    /// An override for an existing label replaces its target in place;
    /// new labels are appended in sorted order so the result does not depend
    /// on `HashMap` iteration order.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut table = Self::default();
        let mut extra: Vec<(&String, &String)> = Vec::new();

        for (label, target) in overrides {
            match table.entries.iter_mut().find(|(l, _)| l == label) {
                Some(entry) => entry.1 = target.clone(),
                None => extra.push((label, target)),
            }
        }

        extra.sort();
        table
            .entries
            .extend(extra.into_iter().map(|(l, t)| (l.clone(), t.clone())));
        table
    }

    /// Resolve a region label to the substring used for matching.
    pub fn resolve<'a>(&'a self, label: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, target)| target.as_str())
            .unwrap_or(label)
    }

    /// First alias target contained in `text`, used as an item's region tag.
    pub fn tag_for(&self, text: &str) -> Option<String> {
        self.entries
            .iter()
            .map(|(_, target)| target)
            .find(|target| !target.is_empty() && text.contains(target.as_str()))
            .cloned()
    }

    /// Whether `label` has its own entry.
    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
