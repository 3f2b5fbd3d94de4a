//! Prompt assembly for lab submissions.
//!
//! Every lab sends one prompt built from a fixed template: role, task,
//! kind-specific guidance, standing instructions, the learner's input,
//! an optional reference block of retrieved PDF pages, and the output
//! format. [`PromptBlueprint`] is the compact Role/Task/Context/Format
//! view of the same prompt that is shown back to the learner.

use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &[&str] = &[
    "- Use the TRAINING PDF REFERENCE as your primary source.",
    "- Be extremely detailed and practical.",
    "- When giving formulas, include exact Excel formulas and explain each part.",
    "- When giving steps, include exact menu clicks and what the user should see.",
    "- Include edge cases (blanks, not found, wrong data types) and how to handle them.",
    "- If the user pasted sensitive data, warn them to anonymise.",
];

/// The kind of exercise a lab runs; selects the guidance paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabKind {
    ExcelPlan,
    Analysis,
    PromptImprove,
    FormulaWrite,
    FormulaPattern,
    FormulaFix,
    Cleaning,
    Transform,
    Validate,
    Insights,
    Charts,
    Automation,
}

impl LabKind {
    pub const ALL: [LabKind; 12] = [
        LabKind::ExcelPlan,
        LabKind::Analysis,
        LabKind::PromptImprove,
        LabKind::FormulaWrite,
        LabKind::FormulaPattern,
        LabKind::FormulaFix,
        LabKind::Cleaning,
        LabKind::Transform,
        LabKind::Validate,
        LabKind::Insights,
        LabKind::Charts,
        LabKind::Automation,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            LabKind::ExcelPlan => "excel_plan",
            LabKind::Analysis => "analysis",
            LabKind::PromptImprove => "prompt_improve",
            LabKind::FormulaWrite => "formula_write",
            LabKind::FormulaPattern => "formula_pattern",
            LabKind::FormulaFix => "formula_fix",
            LabKind::Cleaning => "cleaning",
            LabKind::Transform => "transform",
            LabKind::Validate => "validate",
            LabKind::Insights => "insights",
            LabKind::Charts => "charts",
            LabKind::Automation => "automation",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            LabKind::ExcelPlan => "Create a step-by-step plan for the Excel/data task, grounded in the training PDF. Include exact menu clicks, cell references, and formula patterns where relevant.",
            LabKind::Analysis => "Design an analysis workflow grounded in the training PDF. Suggest pivots, metrics, checks, and how to interpret results. Include at least one actionable recommendation.",
            LabKind::PromptImprove => "Rewrite the user's vague prompt into a precise, high-quality Excel AI prompt (goal, columns, criteria, edge cases, output). Then answer it.",
            LabKind::FormulaWrite => "Write the exact Excel formula needed, with robust blank/error handling and a clear explanation.",
            LabKind::FormulaPattern => "Identify the best formula pattern (XLOOKUP, SUMIF(S), COUNTIF(S), IF(S), INDEX/MATCH, dynamic arrays) and provide the best solution with examples.",
            LabKind::FormulaFix => "Diagnose the Excel error, explain the root cause, and provide a corrected formula plus safer alternatives (IFERROR/guards).",
            LabKind::Cleaning => "Provide a detailed cleaning approach using Excel formulas and/or Power Query. Standardise names, dates, currency, spaces, and data types.",
            LabKind::Transform => "Provide the best method to split/combine/extract (formulas, Text to Columns, Flash Fill, Power Query), with step-by-step instructions.",
            LabKind::Validate => "Create data-quality checks (duplicates, invalid formats, missing values) and show how to implement them with helper columns and conditional formatting.",
            LabKind::Insights => "Extract insights and interpret results. Recommend pivots, charts, and a short narrative summary.",
            LabKind::Charts => "Recommend the right chart type and provide exact Excel steps to build and format it so the insight is obvious.",
            LabKind::Automation => "Design an end-to-end recurring workflow: import, clean, analyse, chart, and summarise. Include Power Query steps and a reusable prompt library.",
        }
    }
}

/// Inputs to [`build_prompt`].
#[derive(Debug, Clone)]
pub struct PromptParts<'a> {
    pub role: &'a str,
    pub task: &'a str,
    pub guidance: &'a str,
    pub context: &'a str,
    /// Retrieved reference pages; omitted from the prompt when empty.
    pub reference: &'a str,
    pub format: &'a str,
}

/// Renders the full prompt sent to the generation service.
pub fn build_prompt(parts: &PromptParts<'_>) -> String {
    let reference_block = if parts.reference.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nTRAINING PDF REFERENCE (use as your primary source):\n{}\n",
            parts.reference
        )
    };
    let instructions = INSTRUCTIONS.join("\n");

    format!(
        "Role: {role}\n\n\
         Task: {task}\n\n\
         Additional guidance:\n{guidance}\n\n\
         Instructions:\n{instructions}\n\n\
         User input:\n{context}\n\n\
         {reference_block}\n\n\
         Output format: {output_format}\n\n\
         Return ONLY valid JSON.",
        role = parts.role,
        task = parts.task,
        guidance = parts.guidance,
        instructions = instructions,
        context = parts.context,
        reference_block = reference_block,
        output_format = parts.format,
    )
}

/// The Role/Task/Context/Format breakdown of a submitted prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptBlueprint {
    pub role: String,
    pub task: String,
    pub context: String,
    pub format: String,
    pub full_prompt_template: String,
}

impl PromptBlueprint {
    pub fn new(role: &str, task: &str, context: &str, format: &str) -> Self {
        Self {
            role: role.to_string(),
            task: task.to_string(),
            context: context.to_string(),
            format: format.to_string(),
            full_prompt_template: format!(
                "Role: {}\nTask: {}\nContext: {}\nFormat: {}",
                role, task, context, format
            ),
        }
    }
}
