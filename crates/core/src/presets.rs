//! Named filter-criteria bundles. Built-ins are fixed and always listed
//! first; user presets follow in creation order.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{DeckError, DeckResult};
use crate::filter::FilterCriteria;
use crate::model::{TaskPriority, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreset {
    pub id: String,
    pub name: String,
    pub criteria: FilterCriteria,
    pub is_default: bool,
}

impl FilterPreset {
    /// The criteria to install as current. A fresh copy every time.
    pub fn apply(&self) -> FilterCriteria {
        self.criteria.clone()
    }
}

pub fn builtin_presets() -> Vec<FilterPreset> {
    let builtin = |id: &str, name: &str, criteria: FilterCriteria| FilterPreset {
        id: id.to_string(),
        name: name.to_string(),
        criteria,
        is_default: true,
    };

    vec![
        builtin("builtin-all", "All tasks", FilterCriteria::new()),
        builtin(
            "builtin-overdue",
            "Overdue",
            FilterCriteria::new().with_overdue_only(true),
        ),
        builtin(
            "builtin-high-priority",
            "High priority",
            FilterCriteria::new().with_priorities([TaskPriority::High, TaskPriority::Critical]),
        ),
        builtin(
            "builtin-unassigned",
            "Unassigned",
            FilterCriteria::new().with_unassigned_only(true),
        ),
        builtin(
            "builtin-in-progress",
            "In progress",
            FilterCriteria::new().with_statuses([TaskStatus::InProgress]),
        ),
        builtin(
            "builtin-blocked",
            "Blocked",
            FilterCriteria::new().with_statuses([TaskStatus::Blocked]),
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPresets {
    presets: Vec<FilterPreset>,
}

impl Default for FilterPresets {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterPresets {
    pub fn new() -> Self {
        Self {
            presets: builtin_presets(),
        }
    }

    pub fn list(&self) -> &[FilterPreset] {
        &self.presets
    }

    pub fn get(&self, id: &str) -> Option<&FilterPreset> {
        self.presets.iter().find(|preset| preset.id == id)
    }

    /// Look a preset up by id, falling back to a case-insensitive name match.
    pub fn find(&self, key: &str) -> Option<&FilterPreset> {
        self.get(key).or_else(|| {
            let key = key.trim();
            self.presets
                .iter()
                .find(|preset| preset.name.eq_ignore_ascii_case(key))
        })
    }

    /// The first preset whose criteria equal `criteria`, for highlighting the active one.
    pub fn matching(&self, criteria: &FilterCriteria) -> Option<&FilterPreset> {
        self.presets
            .iter()
            .find(|preset| &preset.criteria == criteria)
    }

    pub fn save(&mut self, name: &str, criteria: FilterCriteria) -> DeckResult<FilterPreset> {
        let name = validate_name(name)?;
        let preset = FilterPreset {
            id: Ulid::new().to_string(),
            name,
            criteria,
            is_default: false,
        };
        tracing::debug!(id = preset.id.as_str(), name = preset.name.as_str(), "preset saved");
        self.presets.push(preset.clone());
        Ok(preset)
    }

    /// Remove a user preset. Returns `false` when no preset has that id.
    pub fn delete(&mut self, id: &str) -> DeckResult<bool> {
        let Some(index) = self.presets.iter().position(|preset| preset.id == id) else {
            return Ok(false);
        };
        if self.presets[index].is_default {
            tracing::debug!(id, "refused to delete built-in preset");
            return Err(DeckError::ProtectedPreset(id.to_string()));
        }
        self.presets.remove(index);
        tracing::debug!(id, "preset deleted");
        Ok(true)
    }

    pub fn rename(&mut self, id: &str, name: &str) -> DeckResult<FilterPreset> {
        let name = validate_name(name)?;
        let preset = self.user_preset_mut(id)?;
        preset.name = name;
        Ok(preset.clone())
    }

    pub fn update_criteria(
        &mut self,
        id: &str,
        criteria: FilterCriteria,
    ) -> DeckResult<FilterPreset> {
        let preset = self.user_preset_mut(id)?;
        preset.criteria = criteria;
        Ok(preset.clone())
    }

    fn user_preset_mut(&mut self, id: &str) -> DeckResult<&mut FilterPreset> {
        let preset = self
            .presets
            .iter_mut()
            .find(|preset| preset.id == id)
            .ok_or_else(|| DeckError::PresetNotFound(id.to_string()))?;
        if preset.is_default {
            return Err(DeckError::ProtectedPreset(id.to_string()));
        }
        Ok(preset)
    }
}

fn validate_name(name: &str) -> DeckResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DeckError::Validation(
            "Preset name cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
