//! Session state snapshot

use serde::{Deserialize, Serialize};

use crate::domain::{KsaInput, LearningPlan, MasteryInput, SuggestedFields};

/// Where the plan-generation flow currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Generating,
}

/// The single mutable session state
///
/// Owned and mutated exclusively by the session actor; handles only ever see
/// cloned snapshots. `default()` is the canonical initial state, and
/// clear-all restores it exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub ksa: KsaInput,
    pub mastery: MasteryInput,
    pub suggested: SuggestedFields,
    pub status: GenerationStatus,
    pub plan: Option<LearningPlan>,
    pub error: Option<String>,
}

impl SessionState {
    /// Whether plan generation may be triggered right now
    pub fn can_generate(&self) -> bool {
        self.status == GenerationStatus::Idle && self.ksa.is_complete()
    }

    /// Whether the clear-all action should be offered: any field holds
    /// non-default content
    pub fn is_clearable(&self) -> bool {
        self.ksa.has_content() || self.mastery.has_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KsaField;

    #[test]
    fn test_default_state_not_clearable_or_generatable() {
        let state = SessionState::default();
        assert!(!state.is_clearable());
        assert!(!state.can_generate());
        assert_eq!(state.status, GenerationStatus::Idle);
        assert!(state.plan.is_none());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_can_generate_requires_complete_ksa_and_idle() {
        let mut state = SessionState {
            ksa: KsaInput {
                task: "t".to_string(),
                knowledge: "k".to_string(),
                skills: "s".to_string(),
                abilities: "a".to_string(),
            },
            ..Default::default()
        };
        assert!(state.can_generate());

        state.status = GenerationStatus::Generating;
        assert!(!state.can_generate());

        state.status = GenerationStatus::Idle;
        state.ksa.set(KsaField::Abilities, "  ".to_string());
        assert!(!state.can_generate());
    }

    #[test]
    fn test_clearable_on_any_content() {
        let mut state = SessionState::default();
        state.mastery.behaviors.insert("Accuracy".to_string(), true);
        assert!(state.is_clearable());

        let mut state = SessionState::default();
        state.mastery.custom = "calm".to_string();
        assert!(state.is_clearable());

        let mut state = SessionState::default();
        state.ksa.task = "t".to_string();
        assert!(state.is_clearable());
    }
}
