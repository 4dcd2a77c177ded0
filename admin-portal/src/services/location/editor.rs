//! Cascading editor: the form-side state machine for authoring one location
//! tree, with add/remove at every depth.
//!
//! The editor owns a working copy (`CascadingForm`) that is write-local until
//! submit; the only transition whose caller talks to the directory backend is
//! the submit path. Everything else is a pure local edit, so the whole
//! machine is serializable and lives in the operator's session between form
//! interactions.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::location::{AreaNode, BuildingNode, CityNode, LocationNode, StateNode};
use crate::services::location::path;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("A primary location is required")]
    MissingPrimary,
    #[error("At least one secondary location entry must remain")]
    LastSecondary,
    #[error("At least one third location entry must remain")]
    LastThird,
    #[error("No secondary entry at position {0}")]
    SecondaryOutOfRange(usize),
    #[error("No third entry at position {1} under secondary {0}")]
    ThirdOutOfRange(usize, usize),
    #[error("The editor is not open")]
    NotEditing,
    #[error("A submission is already in flight")]
    SubmitInFlight,
}

/// Editable third-level entry: building name plus optional floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThirdEntry {
    pub third_location: String,
    pub sub_location: String,
}

/// Editable secondary entry: city name, area name, and its buildings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryEntry {
    pub secondary_location: String,
    pub sub_location: String,
    pub thirds: Vec<ThirdEntry>,
}

impl SecondaryEntry {
    fn blank() -> Self {
        Self {
            secondary_location: String::new(),
            sub_location: String::new(),
            thirds: vec![ThirdEntry::default()],
        }
    }
}

/// The in-progress working copy mirrored by the form fields.
///
/// This is a projection of one tree: the first state branch of the node under
/// edit, each city with its first area and that area's buildings. Deeper
/// branches are preserved server-side on nodes the editor never touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadingForm {
    pub primary_location: String,
    pub primary_sub_location: String,
    pub secondaries: Vec<SecondaryEntry>,
}

impl CascadingForm {
    /// One blank secondary holding one blank third.
    pub fn blank() -> Self {
        Self {
            primary_location: String::new(),
            primary_sub_location: String::new(),
            secondaries: vec![SecondaryEntry::blank()],
        }
    }

    /// Deep-copy projection of an existing node. The result is independently
    /// mutable: editing it never writes through to the cached forest.
    pub fn from_node(node: &LocationNode) -> Self {
        let state = node.sub_locations.first();

        let mut secondaries: Vec<SecondaryEntry> = state
            .map(|s| s.secondary_locations.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|city| {
                let area = city.secondary_sub_locations.first();
                let mut thirds: Vec<ThirdEntry> = area
                    .map(|a| a.third_locations.as_slice())
                    .unwrap_or_default()
                    .iter()
                    .map(|building| ThirdEntry {
                        third_location: building.third_location.clone(),
                        sub_location: building.third_sub_location.clone().unwrap_or_default(),
                    })
                    .collect();
                if thirds.is_empty() {
                    thirds.push(ThirdEntry::default());
                }
                SecondaryEntry {
                    secondary_location: city.secondary_location.clone(),
                    sub_location: area
                        .map(|a| a.secondary_sub_location.clone())
                        .unwrap_or_default(),
                    thirds,
                }
            })
            .collect();
        if secondaries.is_empty() {
            secondaries.push(SecondaryEntry::blank());
        }

        Self {
            primary_location: node.primary_location.clone(),
            primary_sub_location: state
                .map(|s| s.primary_sub_location.clone())
                .unwrap_or_default(),
            secondaries,
        }
    }

    /// Build the wire payload submitted to the directory backend. Nested
    /// entries get fresh ids; the backend owns the top-level id.
    pub fn to_node(&self) -> LocationNode {
        LocationNode {
            id: None,
            primary_location: self.primary_location.trim().to_string(),
            sub_locations: vec![StateNode {
                id: Some(Uuid::new_v4().to_string()),
                primary_sub_location: self.primary_sub_location.trim().to_string(),
                secondary_locations: self
                    .secondaries
                    .iter()
                    .map(|entry| CityNode {
                        id: Some(Uuid::new_v4().to_string()),
                        secondary_location: entry.secondary_location.trim().to_string(),
                        secondary_sub_locations: vec![AreaNode {
                            id: Some(Uuid::new_v4().to_string()),
                            secondary_sub_location: entry.sub_location.trim().to_string(),
                            third_locations: entry
                                .thirds
                                .iter()
                                .map(|third| BuildingNode {
                                    id: Some(Uuid::new_v4().to_string()),
                                    third_location: third.third_location.trim().to_string(),
                                    third_sub_location: if path::is_blank(&third.sub_location) {
                                        None
                                    } else {
                                        Some(third.sub_location.trim().to_string())
                                    },
                                })
                                .collect(),
                        }],
                    })
                    .collect(),
            }],
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorState {
    Empty,
    Editing,
    Submitting,
}

/// Outcome of a primary-location selection.
///
/// The lookup is explicit about ambiguity: `candidates` reports how many
/// forest nodes matched so the caller can warn the operator when more than
/// one did. Hydration always uses the first match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimarySelection {
    pub candidates: usize,
    pub matched_id: Option<String>,
}

impl PrimarySelection {
    pub fn hydrated(&self) -> bool {
        self.candidates > 0
    }
}

/// All level-0 nodes whose label equals `label` case-insensitively.
pub fn find_primary_candidates<'a>(
    forest: &'a [LocationNode],
    label: &str,
) -> Vec<&'a LocationNode> {
    let wanted = label.trim().to_lowercase();
    forest
        .iter()
        .filter(|node| node.primary_location.trim().to_lowercase() == wanted)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadingEditor {
    state: EditorState,
    form: CascadingForm,
    /// Backend id of the node under edit; `None` means submit creates a new
    /// top-level node.
    editing_id: Option<String>,
}

impl Default for CascadingEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl CascadingEditor {
    pub fn new() -> Self {
        Self {
            state: EditorState::Empty,
            form: CascadingForm::blank(),
            editing_id: None,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn form(&self) -> &CascadingForm {
        &self.form
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.state != EditorState::Empty
    }

    /// Open on a blank form ("add new").
    pub fn open_blank(&mut self) {
        self.state = EditorState::Editing;
        self.form = CascadingForm::blank();
        self.editing_id = None;
    }

    /// Open on a deep copy of an existing node ("edit").
    pub fn open_for(&mut self, node: &LocationNode) {
        self.state = EditorState::Editing;
        self.form = CascadingForm::from_node(node);
        self.editing_id = node.id.clone();
    }

    /// Discard the working copy.
    pub fn cancel(&mut self) {
        *self = Self::new();
    }

    fn ensure_editing(&self) -> Result<(), EditorError> {
        match self.state {
            EditorState::Editing => Ok(()),
            EditorState::Empty => Err(EditorError::NotEditing),
            EditorState::Submitting => Err(EditorError::SubmitInFlight),
        }
    }

    fn secondary_mut(&mut self, index: usize) -> Result<&mut SecondaryEntry, EditorError> {
        self.form
            .secondaries
            .get_mut(index)
            .ok_or(EditorError::SecondaryOutOfRange(index))
    }

    pub fn set_primary_location(&mut self, value: &str) -> Result<(), EditorError> {
        self.ensure_editing()?;
        self.form.primary_location = value.to_string();
        Ok(())
    }

    pub fn set_primary_sub_location(&mut self, value: &str) -> Result<(), EditorError> {
        self.ensure_editing()?;
        self.form.primary_sub_location = value.to_string();
        Ok(())
    }

    pub fn set_secondary_location(&mut self, index: usize, value: &str) -> Result<(), EditorError> {
        self.ensure_editing()?;
        self.secondary_mut(index)?.secondary_location = value.to_string();
        Ok(())
    }

    pub fn set_secondary_sub_location(
        &mut self,
        index: usize,
        value: &str,
    ) -> Result<(), EditorError> {
        self.ensure_editing()?;
        self.secondary_mut(index)?.sub_location = value.to_string();
        Ok(())
    }

    pub fn set_third_location(
        &mut self,
        secondary: usize,
        third: usize,
        value: &str,
    ) -> Result<(), EditorError> {
        self.ensure_editing()?;
        let entry = self.secondary_mut(secondary)?;
        let slot = entry
            .thirds
            .get_mut(third)
            .ok_or(EditorError::ThirdOutOfRange(secondary, third))?;
        slot.third_location = value.to_string();
        Ok(())
    }

    pub fn set_third_sub_location(
        &mut self,
        secondary: usize,
        third: usize,
        value: &str,
    ) -> Result<(), EditorError> {
        self.ensure_editing()?;
        let entry = self.secondary_mut(secondary)?;
        let slot = entry
            .thirds
            .get_mut(third)
            .ok_or(EditorError::ThirdOutOfRange(secondary, third))?;
        slot.sub_location = value.to_string();
        Ok(())
    }

    /// Append one blank secondary entry. No upper bound.
    pub fn add_secondary(&mut self) -> Result<(), EditorError> {
        self.ensure_editing()?;
        self.form.secondaries.push(SecondaryEntry::blank());
        Ok(())
    }

    /// Remove a secondary entry; refused when it is the last one so the form
    /// always keeps at least one editable row.
    pub fn remove_secondary(&mut self, index: usize) -> Result<(), EditorError> {
        self.ensure_editing()?;
        if index >= self.form.secondaries.len() {
            return Err(EditorError::SecondaryOutOfRange(index));
        }
        if self.form.secondaries.len() == 1 {
            return Err(EditorError::LastSecondary);
        }
        self.form.secondaries.remove(index);
        Ok(())
    }

    /// Append one blank third entry under the chosen secondary.
    pub fn add_third(&mut self, secondary: usize) -> Result<(), EditorError> {
        self.ensure_editing()?;
        self.secondary_mut(secondary)?
            .thirds
            .push(ThirdEntry::default());
        Ok(())
    }

    /// Remove a third entry, with the same one-row floor as secondaries.
    pub fn remove_third(&mut self, secondary: usize, third: usize) -> Result<(), EditorError> {
        self.ensure_editing()?;
        let entry = self.secondary_mut(secondary)?;
        if third >= entry.thirds.len() {
            return Err(EditorError::ThirdOutOfRange(secondary, third));
        }
        if entry.thirds.len() == 1 {
            return Err(EditorError::LastThird);
        }
        entry.thirds.remove(third);
        Ok(())
    }

    /// Select a primary location by label against the already-fetched forest.
    ///
    /// A match replaces the whole working copy with a deep copy of the first
    /// matching node and arms submit as an update of that node, so operators
    /// typing the name of an existing record continue editing it instead of
    /// creating a duplicate. No match keeps the typed label and resets the
    /// child arrays to one blank entry each.
    pub fn select_primary(
        &mut self,
        label: &str,
        forest: &[LocationNode],
    ) -> Result<PrimarySelection, EditorError> {
        self.ensure_editing()?;

        let candidates = find_primary_candidates(forest, label);
        let selection = PrimarySelection {
            candidates: candidates.len(),
            matched_id: candidates.first().and_then(|node| node.id.clone()),
        };

        match candidates.first() {
            Some(node) => {
                self.form = CascadingForm::from_node(node);
                self.editing_id = node.id.clone();
            }
            None => {
                self.form = CascadingForm {
                    primary_location: label.trim().to_string(),
                    primary_sub_location: String::new(),
                    secondaries: vec![SecondaryEntry::blank()],
                };
                self.editing_id = None;
            }
        }

        Ok(selection)
    }

    /// Validate and yield the wire payload, moving to `Submitting`.
    ///
    /// A blank primary location is rejected before any network traffic and
    /// the editor stays in `Editing`.
    pub fn begin_submit(&mut self) -> Result<LocationNode, EditorError> {
        self.ensure_editing()?;
        if path::is_blank(&self.form.primary_location) {
            return Err(EditorError::MissingPrimary);
        }
        self.state = EditorState::Submitting;
        Ok(self.form.to_node())
    }

    /// The gateway call succeeded: clear the editor. The caller re-fetches
    /// the forest, there is no optimistic local merge.
    pub fn submit_succeeded(&mut self) {
        *self = Self::new();
    }

    /// The gateway call failed: back to `Editing` with the form intact.
    pub fn submit_failed(&mut self) {
        self.state = EditorState::Editing;
    }
}
