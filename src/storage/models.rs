//! In-memory model of the item configuration file.
//!
//! The file is section oriented, `key=value` per line:
//!
//! ```ini
//! [Websites]
//! News=news.example.org
//! [Programs]
//! Editor=C:\Tools\edit.exe
//! [Folders]
//! Docs=~/Documents
//! [Files]
//! [Gestures]
//! kb:d=Docs
//! [Arguments]
//! Editor=--new-window
//! [Settings]
//! verbosity=beginner
//! ```
//!
//! Type sections map item name to path, `Gestures` maps gesture to item name and
//! `Arguments` maps program name to its argument string. Parsing and writing go
//! through the `configparser` crate configured for `=` as the only delimiter and
//! case-sensitive keys.

use configparser::ini::Ini;

/// Section holding `gesture = item name` entries.
pub const GESTURES_SECTION: &str = "Gestures";

/// Section holding `program name = arguments` entries.
pub const ARGUMENTS_SECTION: &str = "Arguments";

/// Section holding launcher preferences.
pub const SETTINGS_SECTION: &str = "Settings";

/// Key of the verbosity preference inside [`SETTINGS_SECTION`].
pub const VERBOSITY_KEY: &str = "verbosity";

/// Every section a valid file contains, in file order.
pub const CONFIG_SECTIONS: [&str; 7] = [
    "Websites",
    "Programs",
    "Folders",
    "Files",
    GESTURES_SECTION,
    ARGUMENTS_SECTION,
    SETTINGS_SECTION,
];

type Entries = Vec<(String, String)>;

/// Parsed configuration file.
///
/// Sections and entries keep file order. Keys are case-sensitive; lookups are
/// linear, which is fine for a handful of entries per section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    sections: Vec<(String, Entries)>,
}

impl ConfigDocument {
    /// A document with every section of [`CONFIG_SECTIONS`] present and empty.
    #[must_use]
    pub fn empty() -> Self {
        let mut doc = Self::default();
        doc.ensure_sections();
        doc
    }

    /// Parses file contents.
    ///
    /// Besides what the INI parser rejects, the structure is held to the strict
    /// rules the file has always been written with: no entries before the first
    /// section header, every entry has an `=`, no section or key appears twice
    /// within its scope, and section headers are closed.
    ///
    /// # Errors
    ///
    /// Returns a description of the first offending line.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned = check_structure(contents)?;

        let mut ini = new_ini();
        let map = ini.read(cleaned)?;

        let mut doc = Self::default();
        for (section, entries) in &map {
            let entries = entries
                .iter()
                .map(|(key, value)| (key.clone(), value.clone().unwrap_or_default()))
                .collect();
            doc.sections.push((section.clone(), entries));
        }

        // The parser's map only keeps insertion order with its `indexmap`
        // feature; put the known sections back in file order either way.
        doc.sections.sort_by_key(|(name, _)| {
            CONFIG_SECTIONS
                .iter()
                .position(|known| known == name)
                .unwrap_or(CONFIG_SECTIONS.len())
        });
        Ok(doc)
    }

    /// Serializes the document, sections in their current order.
    #[must_use]
    pub fn render(&self) -> String {
        let mut ini = new_ini();
        for (section, entries) in &self.sections {
            ini.get_mut_map().entry(section.clone()).or_default();
            for (key, value) in entries {
                ini.set(section, key, Some(value.clone()));
            }
        }
        ini.writes()
    }

    /// Adds any missing section of [`CONFIG_SECTIONS`]. Returns whether any
    /// section was added.
    pub fn ensure_sections(&mut self) -> bool {
        let mut added = false;
        for name in CONFIG_SECTIONS {
            if !self.has_section(name) {
                self.sections.push((name.to_string(), Vec::new()));
                added = true;
            }
        }
        added
    }

    #[must_use]
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.iter().any(|(name, _)| name == section)
    }

    /// Section names in document order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }

    /// Entries of `section`, empty if the section does not exist.
    #[must_use]
    pub fn entries(&self, section: &str) -> &[(String, String)] {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .map_or(&[], |(_, entries)| entries.as_slice())
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.entries(section)
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Inserts or replaces `key`, creating the section when needed.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let entries = self.section_mut(section);
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => value.clone_into(existing),
            None => entries.push((key.to_string(), value.to_string())),
        }
    }

    /// Removes `key` from `section`. Returns whether it was present.
    pub fn remove(&mut self, section: &str, key: &str) -> bool {
        let Some((_, entries)) = self.sections.iter_mut().find(|(name, _)| name == section) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(k, _)| k != key);
        entries.len() != before
    }

    /// Removes every entry of `section` whose value equals `value`.
    pub fn remove_by_value(&mut self, section: &str, value: &str) {
        if let Some((_, entries)) = self.sections.iter_mut().find(|(name, _)| name == section) {
            entries.retain(|(_, v)| v != value);
        }
    }

    fn section_mut(&mut self, section: &str) -> &mut Entries {
        let index = match self.sections.iter().position(|(name, _)| name == section) {
            Some(index) => index,
            None => {
                self.sections.push((section.to_string(), Vec::new()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index].1
    }
}

fn new_ini() -> Ini {
    let mut defaults = Ini::new_cs().defaults();
    defaults.delimiters = vec!['='];
    // The parser writes its default section without a header. `]` can never
    // appear in a section name that passed `check_structure`, so every
    // section from the file is an ordinary one.
    defaults.default_section = "]".to_string();
    // Full-line comments are dropped by `check_structure`; values may contain
    // `#` and `;` (gestures like `kb:alt+;`).
    defaults.comment_symbols = Vec::new();
    Ini::new_from_defaults(defaults)
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with(';')
}

/// Validates the strict structure and returns the text with comment lines removed.
fn check_structure(contents: &str) -> Result<String, String> {
    let mut cleaned = String::with_capacity(contents.len());
    let mut seen_sections: Vec<&str> = Vec::new();
    let mut seen_keys: Vec<&str> = Vec::new();

    for (index, raw) in contents.lines().enumerate() {
        let number = index + 1;
        let line = raw.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }

        if line.starts_with('[') {
            let Some(close) = line.find(']') else {
                return Err(format!("line {number}: unterminated section header"));
            };
            let name = line[1..close].trim();
            if name.is_empty() {
                return Err(format!("line {number}: empty section name"));
            }
            if seen_sections.contains(&name) {
                return Err(format!("line {number}: duplicate section [{name}]"));
            }
            seen_sections.push(name);
            seen_keys.clear();
        } else {
            if seen_sections.is_empty() {
                return Err(format!("line {number}: entry outside of a section"));
            }
            let Some((key, _)) = line.split_once('=') else {
                return Err(format!("line {number}: expected key=value"));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(format!("line {number}: empty key"));
            }
            if seen_keys.contains(&key) {
                return Err(format!("line {number}: duplicate key {key}"));
            }
            seen_keys.push(key);
        }

        cleaned.push_str(line);
        cleaned.push('\n');
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_has_every_section() {
        let doc = ConfigDocument::empty();
        assert_eq!(doc.section_names().collect::<Vec<_>>(), CONFIG_SECTIONS.to_vec());
    }

    #[test]
    fn parses_gesture_keys_with_colons_and_semicolons() {
        let text = "[Folders]\nDocs=~/Documents\n[Gestures]\nkb:d=Docs\nkb:alt+;=Docs\n";
        let doc = ConfigDocument::parse(text).unwrap();
        assert_eq!(doc.get("Gestures", "kb:d"), Some("Docs"));
        assert_eq!(doc.get("Gestures", "kb:alt+;"), Some("Docs"));
        assert_eq!(doc.get("Folders", "Docs"), Some("~/Documents"));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let doc = ConfigDocument::parse("[Websites]\nNews=a.example\nnews=b.example\n").unwrap();
        assert_eq!(doc.get("Websites", "News"), Some("a.example"));
        assert_eq!(doc.get("Websites", "news"), Some("b.example"));
    }

    #[test]
    fn values_keep_everything_after_the_first_equals() {
        let doc = ConfigDocument::parse("[Websites]\nSearch=example.org/?q=a#top\n").unwrap();
        assert_eq!(doc.get("Websites", "Search"), Some("example.org/?q=a#top"));
    }

    #[test]
    fn rejects_malformed_structure() {
        for bad in [
            "orphan=1\n[Websites]\n",
            "[Websites\nNews=x\n",
            "[Websites]\njust some words\n",
            "[Websites]\n[Websites]\n",
            "[Websites]\nNews=a\nNews=b\n",
        ] {
            assert!(ConfigDocument::parse(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn comment_lines_are_ignored() {
        let doc = ConfigDocument::parse("# exported\n[Files]\n; note\nTodo=~/todo.txt\n").unwrap();
        assert_eq!(doc.entries("Files").len(), 1);
    }

    #[test]
    fn render_then_parse_preserves_entries() {
        let mut doc = ConfigDocument::empty();
        doc.set("Programs", "Editor", "/usr/bin/gedit");
        doc.set("Arguments", "Editor", "--new-window");
        doc.set("Gestures", "kb:e", "Editor");

        let reparsed = ConfigDocument::parse(&doc.render()).unwrap();
        assert_eq!(reparsed.get("Programs", "Editor"), Some("/usr/bin/gedit"));
        assert_eq!(reparsed.get("Arguments", "Editor"), Some("--new-window"));
        assert_eq!(reparsed.get("Gestures", "kb:e"), Some("Editor"));
        assert!(CONFIG_SECTIONS.iter().all(|s| reparsed.has_section(s)));
    }

    #[test]
    fn section_named_default_keeps_its_header() {
        let doc = ConfigDocument::parse("[default]\nx=1\n[Websites]\nMail=mail.example.com\n").unwrap();

        let rendered = doc.render();
        assert!(rendered.contains("[default]"), "{rendered}");
        let reparsed = ConfigDocument::parse(&rendered).unwrap();
        assert_eq!(reparsed.get("default", "x"), Some("1"));
        assert_eq!(reparsed.get("Websites", "Mail"), Some("mail.example.com"));
    }

    #[test]
    fn remove_by_value_drops_every_binding() {
        let mut doc = ConfigDocument::empty();
        doc.set("Gestures", "kb:d", "Docs");
        doc.set("Gestures", "kb:f", "Docs");
        doc.set("Gestures", "kb:m", "Music");
        doc.remove_by_value("Gestures", "Docs");
        assert_eq!(doc.entries("Gestures"), &[("kb:m".to_string(), "Music".to_string())]);
    }
}
