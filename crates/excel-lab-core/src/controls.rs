//! Auxiliary task controls.
//!
//! Some labs offer extra selections (a stance, an email type, a tone...)
//! that replace the lab's fixed task with a parameterized one. Each
//! [`ExtraControl`] owns its option lists and its task template.
//!
//! Selections arrive as a string map keyed by field name:
//!
//! | Control | Fields |
//! |---------|--------|
//! | `stance` | `stance` |
//! | `email_type` | `email_type` |
//! | `tone_select` | `primary_tone`, `secondary_tone` (optional) |
//! | `culture_select` | `culture` |
//! | `difficult_type` | `situation` |
//! | `followup_urgency` | `urgency` |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ControlError;

/// Learner selections keyed by field name.
pub type Selections = BTreeMap<String, String>;

pub const STANCES: &[&str] = &["Agree", "Decline", "Negotiate"];

pub const EMAIL_TYPES: &[&str] = &[
    "Thank You",
    "Follow-Up",
    "Request",
    "Confirmation",
    "Introduction",
    "Update",
    "Apology",
    "Decline",
    "Invitation",
    "Reminder",
    "Inquiry",
    "Feedback",
];

pub const PRIMARY_TONES: &[&str] = &[
    "Professional",
    "Friendly",
    "Formal",
    "Casual",
    "Warm",
    "Concise",
];

/// `None` means "primary tone only".
pub const SECONDARY_TONES: &[&str] = &[
    "None",
    "Empathetic",
    "Assertive",
    "Urgent",
    "Diplomatic",
    "Apologetic",
    "Enthusiastic",
    "Cautious",
    "Confident",
];

pub const CULTURES: &[&str] = &[
    "UK / British",
    "US / American",
    "Formal European",
    "Direct Nordic",
    "Formal Asian / Japanese",
];

pub const SITUATIONS: &[&str] = &[
    "Delivering Bad News",
    "Declining a Request",
    "Chasing Payment",
    "Saying No to Boss",
    "Managing Conflict",
];

pub const URGENCIES: &[&str] = &[
    "First gentle follow-up (3 days)",
    "Second follow-up (1 week)",
    "Third/final follow-up (2+ weeks)",
    "Payment chase",
];

/// A selection control that rewrites a lab's task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraControl {
    Stance,
    EmailType,
    ToneSelect,
    CultureSelect,
    DifficultType,
    FollowupUrgency,
}

/// One selectable field of a control, for listing in the UI.
#[derive(Debug, Clone, Serialize)]
pub struct ControlField {
    pub name: &'static str,
    pub label: &'static str,
    pub options: &'static [&'static str],
    pub required: bool,
}

impl ExtraControl {
    pub const ALL: [ExtraControl; 6] = [
        ExtraControl::Stance,
        ExtraControl::EmailType,
        ExtraControl::ToneSelect,
        ExtraControl::CultureSelect,
        ExtraControl::DifficultType,
        ExtraControl::FollowupUrgency,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ExtraControl::Stance => "stance",
            ExtraControl::EmailType => "email_type",
            ExtraControl::ToneSelect => "tone_select",
            ExtraControl::CultureSelect => "culture_select",
            ExtraControl::DifficultType => "difficult_type",
            ExtraControl::FollowupUrgency => "followup_urgency",
        }
    }

    /// The fields this control asks the learner to fill.
    pub fn fields(&self) -> Vec<ControlField> {
        let field = |name, label, options| ControlField {
            name,
            label,
            options,
            required: true,
        };
        match self {
            ExtraControl::Stance => vec![field("stance", "Stance", STANCES)],
            ExtraControl::EmailType => vec![field("email_type", "Email Type", EMAIL_TYPES)],
            ExtraControl::ToneSelect => vec![
                field("primary_tone", "Primary Tone", PRIMARY_TONES),
                ControlField {
                    name: "secondary_tone",
                    label: "Secondary Tone (optional)",
                    options: SECONDARY_TONES,
                    required: false,
                },
            ],
            ExtraControl::CultureSelect => vec![field("culture", "Target Audience", CULTURES)],
            ExtraControl::DifficultType => {
                vec![field("situation", "Situation Type", SITUATIONS)]
            }
            ExtraControl::FollowupUrgency => {
                vec![field("urgency", "Follow-up Stage", URGENCIES)]
            }
        }
    }

    /// Builds the replacement task text from the learner's selections.
    pub fn apply(&self, selections: &Selections) -> Result<String, ControlError> {
        let task = match self {
            ExtraControl::Stance => {
                let stance = pick(selections, "stance", STANCES)?;
                format!(
                    "Rewrite this draft with a stance of '{}'. Priority: Maintain relationship while being {}.",
                    stance,
                    stance.to_lowercase()
                )
            }
            ExtraControl::EmailType => {
                let kind = pick(selections, "email_type", EMAIL_TYPES)?;
                format!(
                    "Generate a complete '{}' email using the details provided.",
                    kind
                )
            }
            ExtraControl::ToneSelect => {
                let primary = pick(selections, "primary_tone", PRIMARY_TONES)?;
                let secondary = match selections.get("secondary_tone") {
                    Some(_) => pick(selections, "secondary_tone", SECONDARY_TONES)?,
                    None => "None",
                };
                let tone = if secondary == "None" {
                    primary.to_string()
                } else {
                    format!("{} yet {}", primary, secondary)
                };
                format!(
                    "Rewrite this email in a '{}' tone. Keep the core message identical.",
                    tone
                )
            }
            ExtraControl::CultureSelect => {
                let culture = pick(selections, "culture", CULTURES)?;
                format!(
                    "Rewrite this email adapted for a '{}' audience. Adjust formality, directness, pleasantries, and sign-off conventions.",
                    culture
                )
            }
            ExtraControl::DifficultType => {
                let situation = pick(selections, "situation", SITUATIONS)?;
                format!(
                    "Draft a professional email for this situation: '{}'. Be honest, respectful, empathetic, and offer alternatives.",
                    situation
                )
            }
            ExtraControl::FollowupUrgency => {
                let urgency = pick(selections, "urgency", URGENCIES)?;
                format!(
                    "Draft a follow-up email at the '{}' stage. Match the appropriate level of firmness.",
                    urgency
                )
            }
        };
        Ok(task)
    }
}

/// Looks up a selection and checks it against the allowed options.
fn pick(
    selections: &Selections,
    field: &'static str,
    allowed: &'static [&'static str],
) -> Result<&'static str, ControlError> {
    let value = selections.get(field).ok_or(ControlError::Missing(field))?;
    allowed
        .iter()
        .copied()
        .find(|opt| *opt == value.as_str())
        .ok_or_else(|| ControlError::Invalid {
            field,
            value: value.clone(),
            allowed: allowed.to_vec(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(pairs: &[(&str, &str)]) -> Selections {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_stance_task() {
        let task = ExtraControl::Stance
            .apply(&sel(&[("stance", "Negotiate")]))
            .unwrap();
        assert_eq!(
            task,
            "Rewrite this draft with a stance of 'Negotiate'. Priority: Maintain relationship while being negotiate."
        );
    }

    #[test]
    fn test_tone_primary_only() {
        let task = ExtraControl::ToneSelect
            .apply(&sel(&[("primary_tone", "Warm")]))
            .unwrap();
        assert!(task.contains("'Warm' tone"));

        let task = ExtraControl::ToneSelect
            .apply(&sel(&[("primary_tone", "Warm"), ("secondary_tone", "None")]))
            .unwrap();
        assert!(task.contains("'Warm' tone"));
    }

    #[test]
    fn test_tone_with_secondary() {
        let task = ExtraControl::ToneSelect
            .apply(&sel(&[
                ("primary_tone", "Professional"),
                ("secondary_tone", "Empathetic"),
            ]))
            .unwrap();
        assert_eq!(
            task,
            "Rewrite this email in a 'Professional yet Empathetic' tone. Keep the core message identical."
        );
    }

    #[test]
    fn test_followup_urgency_task() {
        let task = ExtraControl::FollowupUrgency
            .apply(&sel(&[("urgency", "Payment chase")]))
            .unwrap();
        assert!(task.starts_with("Draft a follow-up email at the 'Payment chase' stage."));
    }

    #[test]
    fn test_missing_selection() {
        let err = ExtraControl::CultureSelect.apply(&sel(&[])).unwrap_err();
        assert_eq!(err, ControlError::Missing("culture"));
    }

    #[test]
    fn test_invalid_selection_lists_options() {
        let err = ExtraControl::EmailType
            .apply(&sel(&[("email_type", "Ransom Note")]))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Ransom Note"));
        assert!(msg.contains("Thank You"));
    }

    #[test]
    fn test_every_control_accepts_its_first_options() {
        for control in ExtraControl::ALL {
            let selections: Selections = control
                .fields()
                .iter()
                .map(|f| (f.name.to_string(), f.options[0].to_string()))
                .collect();
            let task = control.apply(&selections).unwrap();
            assert!(!task.is_empty(), "{} produced empty task", control.key());
        }
    }
}
