//! Domain types for the KSA planner
//!
//! Pure data contracts: the KSA form input, mastery criteria, and the
//! generated learning plan. Every field is always present, defaulting to
//! empty string / false. No behavior lives here beyond small accessors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Observable mastery behaviors offered to the user, in display order.
///
/// This order is the canonical one: prompts list selected behaviors in this
/// sequence regardless of the order they were toggled.
pub const MASTERY_BEHAVIORS: &[&str] = &[
    "Confidence",
    "Efficiency",
    "Accuracy",
    "Consistency",
    "Goal Attainment",
    "Completion",
    "Adherence to Standards",
];

/// The four KSA form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KsaField {
    Task,
    Knowledge,
    Skills,
    Abilities,
}

impl KsaField {
    /// The fields eligible for auto-suggestion (everything but the task itself)
    pub const SUGGESTIBLE: [KsaField; 3] = [KsaField::Knowledge, KsaField::Skills, KsaField::Abilities];

    /// Lowercase name as it appears in prompts and wire JSON
    pub fn name(&self) -> &'static str {
        match self {
            KsaField::Task => "task",
            KsaField::Knowledge => "knowledge",
            KsaField::Skills => "skills",
            KsaField::Abilities => "abilities",
        }
    }

    /// Capitalized label for prompt text
    pub fn label(&self) -> &'static str {
        match self {
            KsaField::Task => "Task",
            KsaField::Knowledge => "Knowledge",
            KsaField::Skills => "Skills",
            KsaField::Abilities => "Abilities",
        }
    }
}

/// Task input under the Knowledge/Skills/Abilities framework
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KsaInput {
    pub task: String,
    pub knowledge: String,
    pub skills: String,
    pub abilities: String,
}

impl KsaInput {
    /// Read a field by name
    pub fn get(&self, field: KsaField) -> &str {
        match field {
            KsaField::Task => &self.task,
            KsaField::Knowledge => &self.knowledge,
            KsaField::Skills => &self.skills,
            KsaField::Abilities => &self.abilities,
        }
    }

    /// Write a field by name
    pub fn set(&mut self, field: KsaField, value: String) {
        match field {
            KsaField::Task => self.task = value,
            KsaField::Knowledge => self.knowledge = value,
            KsaField::Skills => self.skills = value,
            KsaField::Abilities => self.abilities = value,
        }
    }

    /// Whether a field is blank after trimming
    pub fn is_blank(&self, field: KsaField) -> bool {
        self.get(field).trim().is_empty()
    }

    /// The suggestible fields that are currently blank, in canonical order
    pub fn blank_suggestible_fields(&self) -> Vec<KsaField> {
        KsaField::SUGGESTIBLE
            .into_iter()
            .filter(|f| self.is_blank(*f))
            .collect()
    }

    /// All four fields non-blank after trimming (the plan-generation gate)
    pub fn is_complete(&self) -> bool {
        !self.is_blank(KsaField::Task)
            && !self.is_blank(KsaField::Knowledge)
            && !self.is_blank(KsaField::Skills)
            && !self.is_blank(KsaField::Abilities)
    }

    /// Any field holds non-blank content
    pub fn has_content(&self) -> bool {
        !self.is_blank(KsaField::Task)
            || !self.is_blank(KsaField::Knowledge)
            || !self.is_blank(KsaField::Skills)
            || !self.is_blank(KsaField::Abilities)
    }
}

/// Mastery criteria: fixed behavior checkboxes plus a free-text criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryInput {
    /// Behavior name -> selected. Keys are exactly `MASTERY_BEHAVIORS`.
    pub behaviors: HashMap<String, bool>,
    /// Free-text criterion appended to the selected behaviors
    pub custom: String,
}

impl Default for MasteryInput {
    fn default() -> Self {
        Self {
            behaviors: MASTERY_BEHAVIORS.iter().map(|b| (b.to_string(), false)).collect(),
            custom: String::new(),
        }
    }
}

impl MasteryInput {
    /// Selected behavior labels in canonical `MASTERY_BEHAVIORS` order
    pub fn selected_behaviors(&self) -> Vec<&'static str> {
        MASTERY_BEHAVIORS
            .iter()
            .filter(|b| self.behaviors.get(**b).copied().unwrap_or(false))
            .copied()
            .collect()
    }

    /// Whether any behavior is selected or the custom text is non-blank
    pub fn has_content(&self) -> bool {
        !self.custom.trim().is_empty() || self.behaviors.values().any(|v| *v)
    }
}

/// Per-field flags: true iff the field's current value was populated by a
/// suggestion and the user has not edited it since
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedFields {
    pub knowledge: bool,
    pub skills: bool,
    pub abilities: bool,
}

impl SuggestedFields {
    /// Read a flag; the task field never carries one
    pub fn get(&self, field: KsaField) -> bool {
        match field {
            KsaField::Task => false,
            KsaField::Knowledge => self.knowledge,
            KsaField::Skills => self.skills,
            KsaField::Abilities => self.abilities,
        }
    }

    /// Write a flag; setting the task field is a no-op
    pub fn set(&mut self, field: KsaField, value: bool) {
        match field {
            KsaField::Task => {}
            KsaField::Knowledge => self.knowledge = value,
            KsaField::Skills => self.skills = value,
            KsaField::Abilities => self.abilities = value,
        }
    }
}

/// One phase of the generated learning path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPhase {
    pub title: String,
    pub description: String,
    pub activities: Vec<String>,
}

/// The three sequential phases: foundational knowledge, procedural skills,
/// integrated application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    pub phase1: LearningPhase,
    pub phase2: LearningPhase,
    pub phase3: LearningPhase,
}

/// A complete generated learning plan
///
/// Deserialized from the service's camelCase JSON. All fields are required:
/// either a complete valid plan exists or none does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPlan {
    pub mastery_standard: String,
    pub learning_objective: String,
    pub learning_path: LearningPath,
}
