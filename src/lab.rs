//! Lab submissions.
//!
//! A submission retrieves reference pages for the task and the learner's
//! input, assembles the prompt, calls the generation client, and
//! classifies the reply. Failures are captured in [`LabOutcome::Error`]
//! rather than propagated, so a lab always produces something to show.

use excel_lab_core::controls::Selections;
use excel_lab_core::error::LabError;
use excel_lab_core::pages::PageCollection;
use excel_lab_core::prompt::{build_prompt, PromptBlueprint, PromptParts};
use excel_lab_core::response::LabResponse;
use excel_lab_core::retrieve::{retrieve, RetrievalParams};
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{find_section, LabDefinition};
use crate::llm::GenerationClient;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LabOutcome {
    Ok {
        response: LabResponse,
        /// Plain-text rendering of `response`.
        rendered: String,
    },
    Error {
        error: String,
    },
}

impl LabOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, LabOutcome::Ok { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LabRun {
    pub blueprint: PromptBlueprint,
    /// Characters of reference text included in the prompt.
    pub reference_chars: usize,
    pub outcome: LabOutcome,
}

/// A fully assembled prompt, before it is sent.
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    pub task: String,
    pub prompt: String,
    pub reference_chars: usize,
}

pub struct LabRunner {
    pages: Arc<PageCollection>,
    client: Arc<dyn GenerationClient>,
    params: RetrievalParams,
}

impl LabRunner {
    pub fn new(
        pages: Arc<PageCollection>,
        client: Arc<dyn GenerationClient>,
        params: RetrievalParams,
    ) -> Self {
        Self {
            pages,
            client,
            params,
        }
    }

    /// The task text after any control selections are applied.
    pub fn resolve_task(
        &self,
        lab: &LabDefinition,
        selections: &Selections,
    ) -> Result<String, LabError> {
        match lab.extra_control {
            Some(control) => Ok(control.apply(selections)?),
            None => {
                if !selections.is_empty() {
                    tracing::debug!(
                        count = selections.len(),
                        "lab has no task control; ignoring selections"
                    );
                }
                Ok(lab.task.to_string())
            }
        }
    }

    /// Resolves the task, retrieves reference pages, and renders the prompt.
    pub fn prepare(
        &self,
        lab: &LabDefinition,
        selections: &Selections,
        context: &str,
    ) -> Result<PreparedPrompt, LabError> {
        if context.trim().is_empty() {
            return Err(LabError::EmptyContext);
        }
        let task = self.resolve_task(lab, selections)?;
        let query = format!("{}\n{}", task, context);
        let reference = retrieve(&query, self.pages.pages(), &self.params);

        let prompt = build_prompt(&PromptParts {
            role: lab.role,
            task: &task,
            guidance: lab.kind.guidance(),
            context,
            reference: &reference,
            format: lab.format,
        });

        Ok(PreparedPrompt {
            task,
            prompt,
            reference_chars: reference.chars().count(),
        })
    }

    /// Runs a lab submission end to end.
    pub async fn run(&self, lab: &LabDefinition, selections: &Selections, context: &str) -> LabRun {
        let task = self
            .resolve_task(lab, selections)
            .unwrap_or_else(|_| lab.task.to_string());
        let blueprint = PromptBlueprint::new(lab.role, &task, context, lab.format);

        let prepared = match self.prepare(lab, selections, context) {
            Ok(p) => p,
            Err(e) => {
                return LabRun {
                    blueprint,
                    reference_chars: 0,
                    outcome: LabOutcome::Error {
                        error: e.to_string(),
                    },
                }
            }
        };

        tracing::info!(
            kind = lab.kind.key(),
            context_chars = context.chars().count(),
            reference_chars = prepared.reference_chars,
            model = self.client.model_name(),
            "running lab"
        );

        let outcome = match self.generate(&prepared.prompt).await {
            Ok(response) => LabOutcome::Ok {
                rendered: response.to_string(),
                response,
            },
            Err(e) => {
                tracing::warn!(kind = lab.kind.key(), error = %e, "lab failed");
                LabOutcome::Error {
                    error: e.to_string(),
                }
            }
        };

        LabRun {
            blueprint,
            reference_chars: prepared.reference_chars,
            outcome,
        }
    }

    async fn generate(&self, prompt: &str) -> Result<LabResponse, LabError> {
        let value = self.client.generate_json(prompt).await?;
        LabResponse::from_json(&value)
    }
}

/// Runs a lab from the command line (`lab lab <module> <section>`).
///
/// With `dry_run`, prints the assembled prompt instead of calling the model.
pub async fn run_lab_command(
    runner: &LabRunner,
    module_key: &str,
    section_number: usize,
    context: &str,
    selections: Vec<(String, String)>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let (module, section) = find_section(module_key, section_number)?;
    let selections: Selections = selections.into_iter().collect();

    println!("{} / {}", module.title, section.name);
    println!();

    if dry_run {
        let prepared = runner.prepare(&section.lab, &selections, context)?;
        let blueprint =
            PromptBlueprint::new(section.lab.role, &prepared.task, context, section.lab.format);
        println!("{}", blueprint.full_prompt_template);
        println!();
        println!("Reference: {} chars", prepared.reference_chars);
        println!("---");
        println!("{}", prepared.prompt);
        return Ok(());
    }

    let run = runner.run(&section.lab, &selections, context).await;
    println!("{}", run.blueprint.full_prompt_template);
    println!("---");
    match run.outcome {
        LabOutcome::Ok { rendered, .. } => {
            println!("{}", rendered);
            Ok(())
        }
        LabOutcome::Error { error } => anyhow::bail!("{}", error),
    }
}
