//! Launcher item domain model.
//!
//! An [`Item`] is a named shortcut: a website, program, folder or file bound to a
//! single key gesture. Items are persisted by the storage layer in one section per
//! [`ItemKind`]; gestures and program arguments live in their own sections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four kinds of launchable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Website,
    Program,
    Folder,
    File,
}

impl ItemKind {
    /// All kinds in the order their sections appear in the configuration file.
    pub const ALL: [Self; 4] = [Self::Website, Self::Program, Self::Folder, Self::File];

    /// Name of the configuration section holding items of this kind.
    ///
    /// ```
    /// use instant_access::domain::ItemKind;
    ///
    /// assert_eq!(ItemKind::Program.section(), "Programs");
    /// ```
    #[must_use]
    pub const fn section(self) -> &'static str {
        match self {
            Self::Website => "Websites",
            Self::Program => "Programs",
            Self::Folder => "Folders",
            Self::File => "Files",
        }
    }

    /// Inverse of [`ItemKind::section`].
    #[must_use]
    pub fn from_section(section: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.section() == section)
    }

    /// Label shown in the item list's type column.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Website => "Website",
            Self::Program => "Program",
            Self::Folder => "Folder",
            Self::File => "File",
        }
    }

    /// Only programs carry command line arguments.
    #[must_use]
    pub const fn takes_arguments(self) -> bool {
        matches!(self, Self::Program)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.label().to_lowercase() == wanted || kind.section().to_lowercase() == wanted
            })
            .ok_or_else(|| format!("unknown item type: {s}"))
    }
}

/// A named launcher shortcut.
///
/// `gestures` is a list because hand-edited or imported files may bind several
/// gestures to one name; the editor only ever writes one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arguments: String,
    #[serde(default)]
    pub gestures: Vec<String>,
}

impl Item {
    /// Creates an item with no arguments and no gestures.
    ///
    /// ```
    /// use instant_access::domain::{Item, ItemKind};
    ///
    /// let item = Item::new("Docs", ItemKind::Folder, "~/Documents");
    /// assert!(item.gestures.is_empty());
    /// assert_eq!(item.arguments, "");
    /// ```
    pub fn new(name: impl Into<String>, kind: ItemKind, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            path: path.into(),
            arguments: String::new(),
            gestures: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_gesture(mut self, gesture: impl Into<String>) -> Self {
        self.gestures.push(gesture.into());
        self
    }

    /// Sets program arguments. Ignored for every kind except [`ItemKind::Program`].
    #[must_use]
    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        if self.kind.takes_arguments() {
            self.arguments = arguments.into().trim().to_string();
        }
        self
    }

    /// The gesture the editor shows and edits.
    #[must_use]
    pub fn primary_gesture(&self) -> Option<&str> {
        self.gestures.first().map(String::as_str)
    }
}

/// How much the launcher says when it changes state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Full sentences for every state change.
    #[default]
    Beginner,
    /// Short words and tones.
    Advanced,
}

impl Verbosity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Advanced => "advanced",
        }
    }

    /// Parses a stored value, falling back to [`Verbosity::Beginner`] for anything
    /// unrecognised.
    ///
    /// ```
    /// use instant_access::domain::Verbosity;
    ///
    /// assert_eq!(Verbosity::parse_lenient(" Advanced "), Verbosity::Advanced);
    /// assert_eq!(Verbosity::parse_lenient("chatty"), Verbosity::Beginner);
    /// ```
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "advanced" => Self::Advanced,
            _ => Self::Beginner,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_labels_and_sections() {
        assert_eq!("folder".parse::<ItemKind>(), Ok(ItemKind::Folder));
        assert_eq!("Websites".parse::<ItemKind>(), Ok(ItemKind::Website));
        assert!("printer".parse::<ItemKind>().is_err());
    }

    #[test]
    fn section_round_trips() {
        for kind in ItemKind::ALL {
            assert_eq!(ItemKind::from_section(kind.section()), Some(kind));
        }
        assert_eq!(ItemKind::from_section("Gestures"), None);
    }

    #[test]
    fn arguments_only_stick_to_programs() {
        let folder = Item::new("Docs", ItemKind::Folder, "~/Documents").with_arguments("-x");
        assert_eq!(folder.arguments, "");

        let program = Item::new("Editor", ItemKind::Program, "/usr/bin/vi").with_arguments("  -R  ");
        assert_eq!(program.arguments, "-R");
    }
}
