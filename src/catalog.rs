//! Static catalog of 3D models published alongside the LFS objects.

use std::fmt;

/// A downloadable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelEntry {
    pub id: &'static str,
    pub label: &'static str,
    /// URL of the `.glb` asset.
    pub path: &'static str,
    /// Whether this model is shown when nothing else is selected.
    pub default: bool,
}

/// A named group of models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub models: &'static [ModelEntry],
}

pub const MODELS: &[Category] = &[Category {
    name: "Ground Vehicles",
    models: &[
        ModelEntry {
            id: "default",
            label: "Swervy - TRSYP 2.0 - Tunisia 2025",
            path: "https://pub-eee3ac1ff5434582868c7ea0c6208333.r2.dev/models/Swervy.glb",
            default: true,
        },
        ModelEntry {
            id: "alt1",
            label: "ROBOI - IEEE REGION 8 - Malta 2024",
            path: "https://pub-eee3ac1ff5434582868c7ea0c6208333.r2.dev/models/ROBOI.glb",
            default: false,
        },
    ],
}];

/// Iterate every model along with its category name.
pub fn models() -> impl Iterator<Item = (&'static str, &'static ModelEntry)> {
    MODELS
        .iter()
        .flat_map(|category| category.models.iter().map(move |m| (category.name, m)))
}

/// Look up a model by id.
pub fn find(id: &str) -> Option<&'static ModelEntry> {
    models().map(|(_, m)| m).find(|m| m.id == id)
}

/// The model flagged as default, falling back to the first one listed.
pub fn default_model() -> Option<&'static ModelEntry> {
    models()
        .map(|(_, m)| m)
        .find(|m| m.default)
        .or_else(|| models().map(|(_, m)| m).next())
}

impl fmt::Display for ModelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.default { " (default)" } else { "" };
        write!(f, "{:<8} {}{}  {}", self.id, self.label, marker, self.path)
    }
}
