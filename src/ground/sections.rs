//! Splitting of raw grounder output into named sections.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Marker that opens every section.
pub const SECTION_DELIMITER: &str = ";;";

/// Sections whose data starts on the line right after the header (no count line).
const SINGLE_LINE_SECTIONS: [&str; 3] = ["initial_state", "goal", "initial_abstract_task"];

/// The data lines of every section, keyed by normalized header.
#[derive(Debug, Default, Clone)]
pub struct Sections {
    sections: BTreeMap<String, Vec<String>>,
}

impl Sections {
    /// Split grounder output on [`SECTION_DELIMITER`].
    ///
    /// Text before the first delimiter is ignored. A later section with the same header
    /// replaces an earlier one.
    pub fn split(text: &str) -> Self {
        let mut sections = BTreeMap::new();
        for chunk in text.split(SECTION_DELIMITER).skip(1) {
            let mut lines = chunk.lines();
            let Some(header) = lines.next() else {
                continue;
            };
            let name = normalize_header(header);
            if !SINGLE_LINE_SECTIONS.contains(&name.as_str()) {
                // count metadata
                lines.next();
            }
            let data = lines
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect();
            sections.insert(name, data);
        }
        Self { sections }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Remove a required section.
    pub fn take(&mut self, name: &str) -> Result<Vec<String>> {
        self.sections
            .remove(name)
            .ok_or_else(|| Error::malformed(format!("missing section '{}'", name)))
    }

    /// Remove the first present section among `names` (aliases of one section).
    pub fn take_any(&mut self, names: &[&str]) -> Result<Vec<String>> {
        names
            .iter()
            .find_map(|name| self.sections.remove(*name))
            .ok_or_else(|| Error::malformed(format!("missing section '{}'", names.join("' or '"))))
    }

    /// Sections nobody took, for verbatim pass-through.
    pub fn into_remaining(self) -> BTreeMap<String, Vec<String>> {
        self.sections
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Turn a header line into a lowercase identifier.
///
/// `#tasks (primitive and abstract)` becomes `tasks__primitive_and_abstract`: interior
/// separators are kept one-for-one, leading and trailing ones are dropped.
pub fn normalize_header(header: &str) -> String {
    let spaced: String = header
        .chars()
        .map(|c| if is_word(c) { c } else { ' ' })
        .collect();
    spaced
        .trim()
        .chars()
        .map(|c| if is_word(c) { c } else { '_' })
        .collect::<String>()
        .to_lowercase()
}
