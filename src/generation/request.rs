//! Request builders for the generation service
//!
//! Two request shapes: a field-suggestion brainstorm for blank KSA fields,
//! and the full learning-plan synthesis. Each pairs an instructional-designer
//! prompt with a response schema in the service's dialect (uppercase type
//! names), so the service answers in constrained JSON.

use crate::domain::{KsaField, KsaInput, MasteryInput};
use crate::llm::GenerationRequest;

/// Build a suggestion request for the given blank fields
///
/// Preconditions (enforced by the orchestrator, not here): `task` is
/// non-blank after trimming and `fields` is non-empty. The service returns a
/// mapping, so field order carries no meaning.
pub fn suggestion_request(task: &str, fields: &[KsaField], temperature: f32, max_tokens: u32) -> GenerationRequest {
    let mut prompt = String::new();

    prompt.push_str(
        "As an expert instructional designer, your task is to brainstorm the components \
         of a job task using the KSA (Knowledge, Skills, Abilities) framework.\n\n",
    );
    prompt.push_str(&format!("**Task:** {}\n\n", task.trim()));
    prompt.push_str(
        "Based on this task, provide a single, concise, and highly relevant suggestion \
         for each of the following empty components. Your suggestions should be phrased \
         as if a user is filling out a form.\n\n",
    );

    prompt.push_str("**Components to Suggest:**\n");
    for field in fields {
        prompt.push_str(&format!("- {}\n", field.label()));
    }

    prompt.push_str(
        "\n**Instructions:**\n\
         - For **Knowledge**, suggest the conceptual information needed (policies, rules, the \"why\").\n\
         - For **Skills**, suggest a key step-by-step, observable action (the \"how-to\").\n\
         - For **Abilities**, suggest a measurable criterion for success (speed, accuracy, quality).\n\n\
         Provide ONLY the suggestions for the requested components in the specified JSON format. \
         Do not provide suggestions for components that were not requested.\n",
    );

    GenerationRequest {
        prompt,
        schema: suggestion_schema(),
        temperature,
        max_tokens,
    }
}

/// Response schema for field suggestions: all three fields optional text
fn suggestion_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "knowledge": {
                "type": "STRING",
                "description": "A concise suggestion for the 'Knowledge' (the 'why') component. A single, well-formed phrase or sentence."
            },
            "skills": {
                "type": "STRING",
                "description": "A concise suggestion for the 'Skills' (the 'how-to') component. A single, well-formed phrase or sentence."
            },
            "abilities": {
                "type": "STRING",
                "description": "A concise suggestion for the 'Abilities' (performance standard) component. A single, well-formed phrase or sentence."
            },
        },
    })
}

/// Build a full learning-plan request
///
/// The caller has already validated that all four KSA fields are non-blank;
/// this builder does not re-validate. Selected behaviors appear in canonical
/// `MASTERY_BEHAVIORS` order; the custom clause is appended only when
/// non-blank.
pub fn plan_request(ksa: &KsaInput, mastery: &MasteryInput, temperature: f32, max_tokens: u32) -> GenerationRequest {
    let selected = mastery.selected_behaviors().join(", ");
    let custom = mastery.custom.trim();
    let custom_clause = if custom.is_empty() {
        String::new()
    } else {
        format!(" and exhibit the following: {custom}")
    };

    let prompt = format!(
        "As an expert instructional designer, create a learning plan based on the following inputs.\n\n\
         **Task Details (KSA Framework):**\n\
         - **Task:** {task}\n\
         - **Knowledge (The 'Why'):** {knowledge}\n\
         - **Skills (The 'How-To'):** {skills}\n\
         - **Abilities (Performance Standard):** {abilities}\n\n\
         **Desired Mastery Standard:**\n\
         - A masterful employee will demonstrate: {selected}{custom_clause}.\n\n\
         **Instructions:**\n\
         1. **Mastery Standard:** Based on the desired mastery behaviors, synthesize them into a concise, \
         well-written paragraph describing the ideal performance standard.\n\
         2. **Learning Objective:** Generate a single, formal learning objective using the \
         \"Performance, Condition, Criterion\" model.\n\
         - **Performance:** The task itself.\n\
         - **Condition:** The context, tools, and circumstances (derived from 'Skills').\n\
         - **Criterion:** The standard for success (derived from 'Abilities' and 'Knowledge').\n\
         3. **Learning Path:** Generate a three-phase blended learning plan.\n\
         - **Phase 1 (Foundational Knowledge):** Suggest 3-4 activities targeting the 'Knowledge' component. \
         Examples: eLearning, reading docs, watching videos.\n\
         - **Phase 2 (Procedural Skills):** Suggest 3-4 activities targeting the 'Skills' component. \
         Examples: Demo videos, simulations, workshops.\n\
         - **Phase 3 (Integrated Application & Mastery):** Suggest 3-4 activities targeting the 'Abilities' \
         component to help the learner apply their knowledge and skills to meet the performance standard. \
         Examples: Scenario-based practice, assessments, mentoring.\n\n\
         Provide the output in the specified JSON format.\n",
        task = ksa.task.trim(),
        knowledge = ksa.knowledge.trim(),
        skills = ksa.skills.trim(),
        abilities = ksa.abilities.trim(),
    );

    GenerationRequest {
        prompt,
        schema: plan_schema(),
        temperature,
        max_tokens,
    }
}

/// Response schema for the full plan: every field required
fn plan_schema() -> serde_json::Value {
    let phase = serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "activities": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["title", "description", "activities"]
    });

    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "masteryStandard": {
                "type": "STRING",
                "description": "A summary of the selected and custom mastery behaviors, written as a cohesive standard."
            },
            "learningObjective": {
                "type": "STRING",
                "description": "A formal learning objective following the 'Performance, Condition, Criterion' model."
            },
            "learningPath": {
                "type": "OBJECT",
                "properties": {
                    "phase1": phase,
                    "phase2": phase,
                    "phase3": phase,
                },
                "required": ["phase1", "phase2", "phase3"]
            }
        },
        "required": ["masteryStandard", "learningObjective", "learningPath"]
    })
}
