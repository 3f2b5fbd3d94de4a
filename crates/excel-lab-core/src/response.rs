//! Structured lab responses.
//!
//! The generation service replies with a JSON object whose fields depend on
//! the lab. [`LabResponse::from_json`] maps that object onto a closed set of
//! shapes using explicit presence checks, in this priority order:
//!
//! | Shape | Detected by | Required | Optional |
//! |-------|-------------|----------|----------|
//! | `reply` | `reply` | `reply` | |
//! | `suggestions` | `suggestions` | `suggestions` | |
//! | `tone_score` | `warmth` | `warmth`, `professionalism`, `improvement` | |
//! | `crisis` | `responseDraft` | `responseDraft` | `psychologicalInsights` |
//! | `summary` | `summary` | `summary` | `actionItems`, `urgency` |
//! | `meeting` | `proposedSlots` | `proposedSlots`, `confirmationMessage` | |
//!
//! An object carrying `error` is the service reporting a failure and maps
//! to [`LabError::Service`]. Anything else is [`LabError::UnrecognizedShape`].

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::error::LabError;

/// Urgency shown when a summary omits it.
pub const DEFAULT_URGENCY: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabResponse {
    Reply {
        reply: String,
    },
    Suggestions {
        suggestions: Vec<String>,
    },
    ToneScore {
        warmth: f64,
        professionalism: f64,
        improvement: String,
    },
    Crisis {
        response_draft: String,
        psychological_insights: Vec<String>,
    },
    Summary {
        summary: String,
        action_items: Vec<String>,
        urgency: String,
    },
    Meeting {
        proposed_slots: Vec<String>,
        confirmation_message: String,
    },
}

impl LabResponse {
    /// Classifies a parsed service reply.
    pub fn from_json(value: &Value) -> Result<Self, LabError> {
        let obj = value
            .as_object()
            .ok_or_else(|| LabError::UnrecognizedShape(vec![json_type(value).to_string()]))?;

        if let Some(err) = obj.get("error") {
            let msg = match err {
                Value::String(s) => s.clone(),
                Value::Object(o) => o
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string()),
                other => other.to_string(),
            };
            return Err(LabError::Service(msg));
        }

        if obj.contains_key("reply") {
            return Ok(LabResponse::Reply {
                reply: text(obj, "reply")?,
            });
        }
        if obj.contains_key("suggestions") {
            return Ok(LabResponse::Suggestions {
                suggestions: text_list(obj, "suggestions")?,
            });
        }
        if obj.contains_key("warmth") {
            return Ok(LabResponse::ToneScore {
                warmth: number(obj, "warmth")?,
                professionalism: number(obj, "professionalism")?,
                improvement: text(obj, "improvement")?,
            });
        }
        if obj.contains_key("responseDraft") {
            return Ok(LabResponse::Crisis {
                response_draft: text(obj, "responseDraft")?,
                psychological_insights: optional_text_list(obj, "psychologicalInsights")?,
            });
        }
        if obj.contains_key("summary") {
            let urgency = match obj.get("urgency") {
                None | Some(Value::Null) => DEFAULT_URGENCY.to_string(),
                Some(_) => text(obj, "urgency")?,
            };
            return Ok(LabResponse::Summary {
                summary: text(obj, "summary")?,
                action_items: optional_text_list(obj, "actionItems")?,
                urgency,
            });
        }
        if obj.contains_key("proposedSlots") {
            return Ok(LabResponse::Meeting {
                proposed_slots: text_list(obj, "proposedSlots")?,
                confirmation_message: text(obj, "confirmationMessage")?,
            });
        }

        Err(LabError::UnrecognizedShape(obj.keys().cloned().collect()))
    }
}

impl fmt::Display for LabResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabResponse::Reply { reply } => write!(f, "{}", reply),
            LabResponse::Suggestions { suggestions } => {
                for s in suggestions {
                    writeln!(f, "* {}", s)?;
                }
                Ok(())
            }
            LabResponse::ToneScore {
                warmth,
                professionalism,
                improvement,
            } => {
                writeln!(f, "Warmth: {}%", warmth)?;
                writeln!(f, "Professionalism: {}%", professionalism)?;
                write!(f, "Improvement: {}", improvement)
            }
            LabResponse::Crisis {
                response_draft,
                psychological_insights,
            } => {
                writeln!(f, "Crisis Response")?;
                writeln!(f, "{}", response_draft)?;
                writeln!(f, "Insights:")?;
                for i in psychological_insights {
                    writeln!(f, "* {}", i)?;
                }
                Ok(())
            }
            LabResponse::Summary {
                summary,
                action_items,
                urgency,
            } => {
                writeln!(f, "Summary")?;
                writeln!(f, "{}", summary)?;
                writeln!(f, "Action Items:")?;
                for a in action_items {
                    writeln!(f, "- {}", a)?;
                }
                write!(f, "Urgency: {}", urgency)
            }
            LabResponse::Meeting {
                proposed_slots,
                confirmation_message,
            } => {
                writeln!(f, "Proposed Times:")?;
                for t in proposed_slots {
                    writeln!(f, "- {}", t)?;
                }
                write!(f, "{}", confirmation_message)
            }
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn text(obj: &Map<String, Value>, field: &'static str) -> Result<String, LabError> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(LabError::InvalidField {
            field,
            expected: "a string",
        })
}

fn number(obj: &Map<String, Value>, field: &'static str) -> Result<f64, LabError> {
    obj.get(field)
        .and_then(Value::as_f64)
        .ok_or(LabError::InvalidField {
            field,
            expected: "a number",
        })
}

fn text_list(obj: &Map<String, Value>, field: &'static str) -> Result<Vec<String>, LabError> {
    let invalid = LabError::InvalidField {
        field,
        expected: "a list of strings",
    };
    let items = match obj.get(field).and_then(Value::as_array) {
        Some(items) => items,
        None => return Err(invalid),
    };
    items
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or(invalid)
}

fn optional_text_list(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, LabError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(_) => text_list(obj, field),
    }
}
