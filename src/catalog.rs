//! The course catalog: four modules of three sections, each with a theory
//! view and an interactive lab.
//!
//! Theory text that comes from the reference PDF is stored as page ranges
//! and resolved against the loaded [`PageCollection`] on request, so the
//! catalog itself is static data.

use excel_lab_core::controls::{ControlField, ExtraControl};
use excel_lab_core::pages::{PageCollection, PageRange};
use excel_lab_core::prompt::LabKind;
use serde::Serialize;

pub const COURSE_TITLE: &str = "Excel & Data Analysis AI Power Suite";
pub const COURSE_TAGLINE: &str = "Module 4: Stop wrestling with formulas. Let AI do the Excel.";
pub const COURSE_DURATION: &str = "Total Duration: 2.5 to 3 hours | 4 Parts | 12 Exercises";
pub const COURSE_SOURCE: &str = "Based on: Excel & Data Analysis with AI";

/// Shown on every theory view.
pub const THEORY_MISTAKES: &str = "Accepting without checking | Vague prompts | Mixed data types (text vs number) | Missing blank/error handling | Not iterating to a safer formula";

pub const HOW_IT_WORKS: &[(&str, &str)] = &[
    (
        "Part 1 - Foundations",
        "why data work is a time sink, what AI can do, and how to write prompts that avoid errors.",
    ),
    (
        "Part 2 - Formulas & Functions",
        "write any formula in plain English, cover the common patterns, then fix errors fast.",
    ),
    (
        "Part 3 - Data Cleaning",
        "standardise names, dates, currency, remove mess, and transform columns safely.",
    ),
    (
        "Part 4 - Analysis, Charts & Automation",
        "pivots, insights, charts, Copilot prompts, and repeatable workflows with Power Query.",
    ),
];

pub const COMMON_MISTAKES: &[(&str, &str)] = &[
    (
        "Accepting Without Checking",
        "Test AI formulas on 2-3 rows before filling down",
    ),
    (
        "Vague Prompts",
        "Specify columns, criteria, and what to do if blank or not found",
    ),
    (
        "Mixed Data Types",
        "Numbers stored as text and extra spaces break lookups and maths",
    ),
    (
        "Not Iterating",
        "Tell AI what’s wrong and ask for a safer formula or alternative",
    ),
    (
        "Sharing Sensitive Data",
        "Anonymise personal/client info before pasting into public tools",
    ),
    (
        "Skipping a Checklist",
        "Use a repeatable clean → analyse → chart → summary workflow",
    ),
];

/// Theory text that is either fixed or pulled from the reference PDF.
#[derive(Debug, Clone, Copy)]
pub enum TheoryText {
    Static(&'static str),
    Pages(&'static [PageRange]),
}

impl TheoryText {
    pub fn resolve(&self, pages: &PageCollection) -> String {
        match self {
            TheoryText::Static(text) => text.to_string(),
            TheoryText::Pages(ranges) => pages.excerpts(ranges),
        }
    }

    /// The page ranges this text draws on, if any.
    pub fn ranges(&self) -> &'static [PageRange] {
        match self {
            TheoryText::Static(_) => &[],
            TheoryText::Pages(ranges) => ranges,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theory {
    pub title: &'static str,
    pub philosophy: TheoryText,
    pub formula: TheoryText,
    pub verb: &'static str,
    pub instruction: &'static str,
    pub constraints: &'static str,
    pub prompts: &'static [&'static str],
    pub benefit: &'static str,
    pub tip: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LabDefinition {
    pub role: &'static str,
    pub task: &'static str,
    pub placeholder: &'static str,
    pub format: &'static str,
    pub kind: LabKind,
    pub extra_control: Option<ExtraControl>,
}

#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub name: &'static str,
    pub icon: &'static str,
    pub time: &'static str,
    pub theory: Theory,
    pub lab: LabDefinition,
}

#[derive(Debug, Clone, Copy)]
pub struct CourseModule {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub time: &'static str,
    pub sections: [Section; 3],
}

const REPLY_FORMAT: &str = "JSON: { 'reply': string }";

pub static COURSE: [CourseModule; 4] = [
    CourseModule {
        key: "Foundations",
        title: "Part 1: Foundations",
        description: "Understand the real cost of spreadsheet work, the shift to plain-English prompting, and what AI can do inside Excel.",
        time: "45-60 min",
        sections: [
            Section {
                name: "1A: The Data Problem",
                icon: "📉",
                time: "15 min",
                theory: Theory {
                    title: "The Data Problem (Why This Matters)",
                    philosophy: TheoryText::Pages(&[PageRange::new(3, 6)]),
                    formula: TheoryText::Static("Describe the OUTCOME in plain English, then include: columns involved, criteria, what to return if blank/error, and where the result should go."),
                    verb: "Write / Build / Fix",
                    instruction: "Outcome first, then column details and edge cases",
                    constraints: "Always specify columns + blank/error handling",
                    prompts: &[
                        "I spend hours each week cleaning and reporting on data. Summarise where the time goes, then list the top 5 tasks AI can remove.",
                        "I have a CSV export with mixed dates and currency. What is the fastest AI-driven workflow in Excel to import, clean, and report?",
                    ],
                    benefit: "You stop wrestling Excel syntax and start describing outcomes. This cuts spreadsheet time dramatically, especially cleaning and reporting.",
                    tip: "If you only do one thing: always include what to do when cells are blank or don’t match, so you avoid #N/A and #DIV/0 errors.",
                },
                lab: LabDefinition {
                    role: "Excel & Data Analysis AI Coach",
                    task: "Use the training PDF as your main reference. Create a step-by-step plan to solve the user's Excel/data problem and include exact formulas or clicks where relevant. Be very detailed.",
                    placeholder: "Describe your spreadsheet task (and paste a few sample rows or column headers). What do you want Excel to do?",
                    format: REPLY_FORMAT,
                    kind: LabKind::ExcelPlan,
                    extra_control: None,
                },
            },
            Section {
                name: "1B: What AI Can Do in Excel",
                icon: "🤖",
                time: "15 min",
                theory: Theory {
                    title: "What AI Can Do With Your Data",
                    philosophy: TheoryText::Pages(&[PageRange::single(7)]),
                    formula: TheoryText::Static("Tell AI: (1) goal, (2) your columns, (3) constraints, (4) edge cases, (5) desired output format."),
                    verb: "Analyse / Recommend",
                    instruction: "Give AI the columns and the business question",
                    constraints: "No vague asks, provide schema and goal",
                    prompts: &[
                        "Here are my columns: Date, Client, Service, Amount, Salesperson. What analyses and pivot tables should I build to find the biggest drivers of revenue?",
                        "I need a weekly report. Suggest a reusable Excel template with formulas, conditional formatting, and a top summary box.",
                    ],
                    benefit: "AI becomes your on-demand Excel expert: formulas, cleaning, analysis, charts, and explaining what things mean.",
                    tip: "When asking for analysis, specify the exact outputs you want: trends, anomalies, top 3 insights, and one recommendation.",
                },
                lab: LabDefinition {
                    role: "Excel Copilot-Style Analyst",
                    task: "Using the PDF, generate a detailed analysis plan: what to calculate, which pivot tables to build, and which charts to use. Include exact steps and example formulas.",
                    placeholder: "Paste your column headers and tell me what question you want answered (e.g., best month, best product, anomalies).",
                    format: REPLY_FORMAT,
                    kind: LabKind::Analysis,
                    extra_control: None,
                },
            },
            Section {
                name: "1C: Good Prompts vs Bad Prompts",
                icon: "🧠",
                time: "15 min",
                theory: Theory {
                    title: "Prompting Rules That Make AI Accurate",
                    philosophy: TheoryText::Pages(&[PageRange::new(40, 45)]),
                    formula: TheoryText::Static("Use this structure: Goal → Columns → Criteria → Error/blank handling → Output cell/format → Example row."),
                    verb: "Rewrite / Improve",
                    instruction: "Turn vague prompts into precise prompts",
                    constraints: "Must mention columns + criteria + edge cases",
                    prompts: &[
                        "Rewrite my prompt to be specific: 'write me a formula to calculate commission'",
                        "Rewrite my prompt: 'analyse my data' so it asks for (1) best performer, (2) unusual drops, (3) one action to take.",
                    ],
                    benefit: "Better prompts give better formulas and fewer errors, so you spend less time debugging and redoing work.",
                    tip: "If AI gives you a formula, test it on 2-3 rows manually before filling down the whole sheet.",
                },
                lab: LabDefinition {
                    role: "Prompt Engineer for Excel Tasks",
                    task: "Take the user's rough prompt and rewrite it into a perfect Excel AI prompt using the PDF rules. Then provide the formula or steps that prompt would produce.",
                    placeholder: "Paste the rough prompt you would normally type (and optionally your columns).",
                    format: REPLY_FORMAT,
                    kind: LabKind::PromptImprove,
                    extra_control: None,
                },
            },
        ],
    },
    CourseModule {
        key: "Formulas",
        title: "Part 2: Formulas & Functions",
        description: "Write formulas in plain English, cover the 12 most common formula types, and fix errors fast.",
        time: "45-60 min",
        sections: [
            Section {
                name: "2A: The Formula Request Formula",
                icon: "🧾",
                time: "15 min",
                theory: Theory {
                    title: "The Formula Request Formula",
                    philosophy: TheoryText::Pages(&[PageRange::new(9, 10)]),
                    formula: TheoryText::Pages(&[PageRange::single(9)]),
                    verb: "Write",
                    instruction: "Describe outcome + your columns + where the result goes",
                    constraints: "Include blank/error output rules",
                    prompts: &[
                        "Write an Excel formula to calculate total revenue. Column A = guests, column B = price per person. If A is blank, show 0.",
                        "Write a formula to flag rows where Status = Pending and Booking Date is older than 90 days. Return \"Chase\" else blank.",
                    ],
                    benefit: "You get correct formulas without memorising syntax. You also build a reusable prompt library.",
                    tip: "Ask for both: the formula AND a short explanation of how it works, so you can troubleshoot later.",
                },
                lab: LabDefinition {
                    role: "Excel Formula Writer",
                    task: "Write the exact Excel formula the user needs. Include robust error handling (IF, IFERROR) and explain it step-by-step. Be very detailed.",
                    placeholder: "Describe your goal and your columns (A, B, etc). Say what to do if blank or no match.",
                    format: REPLY_FORMAT,
                    kind: LabKind::FormulaWrite,
                    extra_control: None,
                },
            },
            Section {
                name: "2B: Real-World Formula Patterns",
                icon: "🧩",
                time: "15 min",
                theory: Theory {
                    title: "12 Formula Types + Examples",
                    philosophy: TheoryText::Pages(&[PageRange::new(10, 11)]),
                    formula: TheoryText::Static("Pick the pattern (lookup, IF/IFS, SUMIF, COUNTIF, XLOOKUP, INDEX/MATCH) then specify columns, criteria, and return value."),
                    verb: "Calculate",
                    instruction: "Choose pattern then fill in your schema",
                    constraints: "Return value and criteria must be explicit",
                    prompts: &[
                        "XLOOKUP: Find booking ref in column A, return guest name in column F. If not found, show Not Found.",
                        "SUMIF: Sum Amount in column D where Property in column B is 'Loch View' and Month in column C is 'July'.",
                    ],
                    benefit: "Once you recognise the pattern, AI can generate it instantly for any dataset.",
                    tip: "If a lookup fails, check data types (text vs number) and extra spaces first. That causes most #N/A.",
                },
                lab: LabDefinition {
                    role: "Excel Pattern Coach",
                    task: "Identify which formula pattern fits the user's goal, then produce the best formula (or combo) with error handling and a worked example.",
                    placeholder: "Explain what you’re trying to calculate and paste a sample row (or column descriptions).",
                    format: REPLY_FORMAT,
                    kind: LabKind::FormulaPattern,
                    extra_control: None,
                },
            },
            Section {
                name: "2C: Fixing Errors & Advanced Functions",
                icon: "🛠️",
                time: "15 min",
                theory: Theory {
                    title: "Fix Errors Fast + Use Advanced Functions",
                    philosophy: TheoryText::Pages(&[PageRange::new(12, 15)]),
                    formula: TheoryText::Static("Paste the broken formula + say what it should do + describe the columns and the error. Ask AI to fix it and add IFERROR/IF guards."),
                    verb: "Fix",
                    instruction: "Error code + expected outcome + data schema",
                    constraints: "Must propose a corrected formula AND why the error happened",
                    prompts: &[
                        "This formula returns #N/A: =VLOOKUP(A2,Sheet2!A:C,3,FALSE). Column A has booking refs. Fix it and add IFERROR to show blank if not found.",
                        "Explain what this formula does and rewrite it using XLOOKUP: =INDEX(F:F,MATCH(H2,A:A,0))",
                    ],
                    benefit: "No more Googling #REF or #VALUE. You paste the problem and get the fix plus a safer version.",
                    tip: "Ask AI to also suggest a quick data check (TRIM, VALUE, CLEAN) when fixing #N/A or #VALUE.",
                },
                lab: LabDefinition {
                    role: "Excel Debugger",
                    task: "Diagnose the user’s Excel formula error, explain the root cause, then provide a corrected, safer formula with edge cases handled. Be very detailed.",
                    placeholder: "Paste your formula and the exact error (#N/A, #REF, #VALUE, etc). Also say what you expect the result to be.",
                    format: REPLY_FORMAT,
                    kind: LabKind::FormulaFix,
                    extra_control: None,
                },
            },
        ],
    },
    CourseModule {
        key: "Cleaning",
        title: "Part 3: Data Cleaning & Transformation",
        description: "Fix messy imports, standardise formats, and transform columns quickly with AI-driven prompts and formulas.",
        time: "45-60 min",
        sections: [
            Section {
                name: "3A: Cleaning Messy Data",
                icon: "🧼",
                time: "15 min",
                theory: Theory {
                    title: "The Messy Data Problem",
                    philosophy: TheoryText::Pages(&[PageRange::new(17, 20)]),
                    formula: TheoryText::Static("Describe the mess (spaces, case, currency symbols, date formats) and ask for formulas and steps to standardise into a clean version column."),
                    verb: "Clean",
                    instruction: "Name the exact problems and desired final format",
                    constraints: "Must include target format and where output goes",
                    prompts: &[
                        "Clean column A names: remove extra spaces and convert to Proper Case.",
                        "Convert currency text like '£1,250' into numbers. Keep negatives and blanks safe.",
                    ],
                    benefit: "Cleaning is where most spreadsheet time is lost. AI helps you standardise fast so analysis actually works.",
                    tip: "Always keep the original column and create a new cleaned column, so you can compare before vs after.",
                },
                lab: LabDefinition {
                    role: "Excel Data Cleaning Specialist",
                    task: "Create a detailed cleaning plan for the user's dataset. Provide exact formulas (TRIM, CLEAN, PROPER, SUBSTITUTE, VALUE, DATEVALUE) and step-by-step instructions.",
                    placeholder: "Paste a few messy rows and describe what’s wrong (spaces, dates, currency, duplicates).",
                    format: REPLY_FORMAT,
                    kind: LabKind::Cleaning,
                    extra_control: None,
                },
            },
            Section {
                name: "3B: Transforming Columns",
                icon: "🔀",
                time: "15 min",
                theory: Theory {
                    title: "Split, Combine, Extract",
                    philosophy: TheoryText::Pages(&[PageRange::single(21)]),
                    formula: TheoryText::Static("Tell AI whether you want to split, combine, or extract. Provide the pattern (space, comma, postcode format) and sample values."),
                    verb: "Split / Combine",
                    instruction: "Provide sample values and the delimiter/pattern",
                    constraints: "Must handle messy edge cases",
                    prompts: &[
                        "Split full name into First Name and Last Name (names may have middle initials).",
                        "Split UK address into Street, Town, Postcode. Postcode format is like IV1 1AA.",
                    ],
                    benefit: "You stop doing manual text-to-columns and get repeatable transformations you can reuse.",
                    tip: "If using Text to Columns, ask AI whether Power Query is better when you need to repeat the task weekly.",
                },
                lab: LabDefinition {
                    role: "Excel Transformation Coach",
                    task: "Design a transformation for the user: either formulas, Text to Columns, Flash Fill, or Power Query. Provide the best method and detailed steps.",
                    placeholder: "Tell me what you want to split/combine/extract and paste 5 example cells.",
                    format: REPLY_FORMAT,
                    kind: LabKind::Transform,
                    extra_control: None,
                },
            },
            Section {
                name: "3C: Duplicates, Validation, Standards",
                icon: "✅",
                time: "15 min",
                theory: Theory {
                    title: "Standardise and Validate",
                    philosophy: TheoryText::Pages(&[PageRange::single(18), PageRange::new(44, 45)]),
                    formula: TheoryText::Static("Ask AI for: dedupe rules, validation checks, and a reusable cleaning checklist you can apply every import."),
                    verb: "Validate",
                    instruction: "Define what counts as a duplicate and the expected format",
                    constraints: "Must propose checks before analysis",
                    prompts: &[
                        "Find duplicate rows where Email matches, keep the most recent Date, delete the rest. Give steps or formulas.",
                        "Flag invalid postcodes in column D and highlight them with conditional formatting.",
                    ],
                    benefit: "A standard cleaning checklist reduces hidden errors that ruin reports and decisions.",
                    tip: "Build a 'cleaning library' prompt list you reuse for every import: names, dates, currency, duplicates, and blanks.",
                },
                lab: LabDefinition {
                    role: "Data Quality Auditor",
                    task: "Create a detailed data quality checklist for the user’s dataset and provide Excel steps to implement it (conditional formatting, validation, helper columns).",
                    placeholder: "Describe your dataset and what 'clean' should look like. Mention key columns (email, dates, amounts, IDs).",
                    format: REPLY_FORMAT,
                    kind: LabKind::Validate,
                    extra_control: None,
                },
            },
        ],
    },
    CourseModule {
        key: "Advanced",
        title: "Part 4: Analysis, Visualisation & Automation",
        description: "Turn numbers into insights, build charts and pivots, use Copilot, and automate repetitive workflows with Power Query.",
        time: "45-60 min",
        sections: [
            Section {
                name: "4A: Insights & Pivot Tables",
                icon: "📊",
                time: "15 min",
                theory: Theory {
                    title: "Turning Numbers into Insights",
                    philosophy: TheoryText::Pages(&[PageRange::new(24, 25)]),
                    formula: TheoryText::Static("Ask AI: top 3 insights, best/worst performers, anomalies, and one recommendation. Then ask for a pivot table spec."),
                    verb: "Analyse",
                    instruction: "Specify the questions and desired outputs",
                    constraints: "Must include at least 1 action recommendation",
                    prompts: &[
                        "Identify trends and anomalies in this dataset, then tell me one action I should take.",
                        "Create a pivot table: total Amount by Salesperson for each month. Explain exact steps.",
                    ],
                    benefit: "You get analysis that is faster and more structured, with clear pivots and interpretations.",
                    tip: "If you paste pivot results into AI, ask it to interpret what changed month-to-month and why.",
                },
                lab: LabDefinition {
                    role: "Excel Analyst",
                    task: "Give a detailed analysis workflow: metrics to compute, pivot tables to build, and how to interpret the results. Include step-by-step Excel instructions.",
                    placeholder: "Paste a small table (or pivot output) and tell me the business question you want answered.",
                    format: REPLY_FORMAT,
                    kind: LabKind::Insights,
                    extra_control: None,
                },
            },
            Section {
                name: "4B: Charts & Visualisation",
                icon: "📈",
                time: "15 min",
                theory: Theory {
                    title: "Charts That Tell the Story",
                    philosophy: TheoryText::Pages(&[PageRange::new(26, 29)]),
                    formula: TheoryText::Static("Ask: which chart type fits my question, how to set it up, and how to label it so the insight is obvious."),
                    verb: "Visualise",
                    instruction: "Choose chart type based on question (trend, compare, composition)",
                    constraints: "Must recommend chart + setup steps",
                    prompts: &[
                        "I have monthly revenue for 12 months. Which chart should I use and how should I format it to show the trend clearly?",
                        "I want to compare sales by property. Which bar chart is best and how do I build it?",
                    ],
                    benefit: "You get faster charts that communicate insights, not just visuals.",
                    tip: "Ask AI to also suggest 1 sentence you can put above the chart as the key takeaway.",
                },
                lab: LabDefinition {
                    role: "Data Visualisation Coach",
                    task: "Recommend the best chart type for the user's data and give exact Excel steps to build it. Include formatting tips and what insight it should highlight.",
                    placeholder: "Describe your data and what you want to show (trend, comparison, share, distribution).",
                    format: REPLY_FORMAT,
                    kind: LabKind::Charts,
                    extra_control: None,
                },
            },
            Section {
                name: "4C: Copilot & Automation",
                icon: "⚙️",
                time: "15 min",
                theory: Theory {
                    title: "Copilot, Power Query, and Repeatable Workflows",
                    philosophy: TheoryText::Pages(&[PageRange::new(31, 37), PageRange::new(48, 50)]),
                    formula: TheoryText::Static("If the task repeats monthly: ask AI for a template + Power Query steps + a prompt library to reuse."),
                    verb: "Automate",
                    instruction: "Describe the recurring workflow and ask for a reusable template + automation steps",
                    constraints: "Must include verification steps and data privacy guidance",
                    prompts: &[
                        "Walk me through setting up Power Query to import and clean my weekly CSV automatically.",
                        "Help me build a reusable report template with formulas, conditional formatting, charts, and a top summary box.",
                    ],
                    benefit: "You build a system: import → clean → analyse → chart → summary, then refresh it in minutes.",
                    tip: "Do not paste sensitive personal data into public AI tools. Anonymise first, or use Copilot inside Excel if available.",
                },
                lab: LabDefinition {
                    role: "Excel Automation Specialist",
                    task: "Design an end-to-end automated workflow for the user: import, clean, analyse, chart, and summarise. Include Power Query steps where relevant. Be very detailed.",
                    placeholder: "Describe the recurring report you make (where the data comes from, how often, and what outputs you need).",
                    format: REPLY_FORMAT,
                    kind: LabKind::Automation,
                    extra_control: None,
                },
            },
        ],
    },
];

/// Errors from catalog lookups.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("module not found: {0}")]
    ModuleNotFound(String),
    #[error("section {section} not found in {module} (expected 1-3)")]
    SectionNotFound { module: &'static str, section: usize },
}

/// Finds a module by key, ignoring ASCII case.
pub fn find_module(key: &str) -> Result<&'static CourseModule, CatalogError> {
    COURSE
        .iter()
        .find(|m| m.key.eq_ignore_ascii_case(key))
        .ok_or_else(|| CatalogError::ModuleNotFound(key.to_string()))
}

/// Finds a section by module key and 1-based section number.
pub fn find_section(
    module_key: &str,
    number: usize,
) -> Result<(&'static CourseModule, &'static Section), CatalogError> {
    let module = find_module(module_key)?;
    number
        .checked_sub(1)
        .and_then(|i| module.sections.get(i))
        .map(|s| (module, s))
        .ok_or(CatalogError::SectionNotFound {
            module: module.key,
            section: number,
        })
}

// ============ Views ============

#[derive(Debug, Clone, Serialize)]
pub struct SectionSummary {
    pub number: usize,
    pub name: &'static str,
    pub icon: &'static str,
    pub time: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleView {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub time: &'static str,
    pub sections: Vec<SectionSummary>,
}

/// A heading with one line of body text.
#[derive(Debug, Clone, Serialize)]
pub struct TitledText {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: &'static str,
    pub tagline: &'static str,
    pub duration: &'static str,
    pub source: &'static str,
    pub modules: Vec<ModuleView>,
    pub how_it_works: Vec<TitledText>,
    pub common_mistakes: Vec<TitledText>,
}

/// A theory section with its PDF excerpts resolved.
#[derive(Debug, Clone, Serialize)]
pub struct TheoryView {
    pub module: &'static str,
    pub section: &'static str,
    pub icon: &'static str,
    pub time: &'static str,
    pub title: &'static str,
    pub philosophy: String,
    pub formula: String,
    pub source_pages: Vec<PageRange>,
    pub verb: &'static str,
    pub instruction: &'static str,
    pub constraints: &'static str,
    pub prompts: &'static [&'static str],
    pub benefit: &'static str,
    pub tip: &'static str,
    pub common_mistakes: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabView {
    pub module: &'static str,
    pub section: &'static str,
    #[serde(flatten)]
    pub lab: LabDefinition,
    pub controls: Vec<ControlField>,
}

impl CourseModule {
    pub fn view(&self) -> ModuleView {
        ModuleView {
            key: self.key,
            title: self.title,
            description: self.description,
            time: self.time,
            sections: self
                .sections
                .iter()
                .enumerate()
                .map(|(i, s)| SectionSummary {
                    number: i + 1,
                    name: s.name,
                    icon: s.icon,
                    time: s.time,
                })
                .collect(),
        }
    }
}

impl Section {
    pub fn theory_view(&self, module: &CourseModule, pages: &PageCollection) -> TheoryView {
        let t = &self.theory;
        let mut source_pages: Vec<PageRange> = t.philosophy.ranges().to_vec();
        source_pages.extend(t.formula.ranges().iter().copied());
        TheoryView {
            module: module.title,
            section: self.name,
            icon: self.icon,
            time: self.time,
            title: t.title,
            philosophy: t.philosophy.resolve(pages),
            formula: t.formula.resolve(pages),
            source_pages,
            verb: t.verb,
            instruction: t.instruction,
            constraints: t.constraints,
            prompts: t.prompts,
            benefit: t.benefit,
            tip: t.tip,
            common_mistakes: THEORY_MISTAKES,
        }
    }

    pub fn lab_view(&self, module: &CourseModule) -> LabView {
        LabView {
            module: module.title,
            section: self.name,
            lab: self.lab,
            controls: self
                .lab
                .extra_control
                .map(|c| c.fields())
                .unwrap_or_default(),
        }
    }
}

fn pairs(items: &[(&'static str, &'static str)]) -> Vec<TitledText> {
    items
        .iter()
        .map(|&(title, description)| TitledText { title, description })
        .collect()
}

pub fn dashboard() -> DashboardView {
    DashboardView {
        title: COURSE_TITLE,
        tagline: COURSE_TAGLINE,
        duration: COURSE_DURATION,
        source: COURSE_SOURCE,
        modules: COURSE.iter().map(CourseModule::view).collect(),
        how_it_works: pairs(HOW_IT_WORKS),
        common_mistakes: pairs(COMMON_MISTAKES),
    }
}

// ============ CLI ============

/// Prints the course outline (`lab catalog`).
pub fn run_catalog() {
    let d = dashboard();
    println!("{}", d.title);
    println!("{}", d.tagline);
    println!("{}", d.duration);
    println!();
    for m in &d.modules {
        println!("{} [{}] - {}", m.title, m.key, m.time);
        println!("  {}", m.description);
        for s in &m.sections {
            println!("  {}. {} {} - {}", s.number, s.icon, s.name, s.time);
        }
        println!();
    }
    println!("Common AI Data Mistakes to Avoid");
    for m in &d.common_mistakes {
        println!("  - {}: {}", m.title, m.description);
    }
}

/// Prints a resolved theory view (`lab theory <module> <section>`).
pub fn run_theory(module_key: &str, number: usize, pages: &PageCollection) -> anyhow::Result<()> {
    let (module, section) = find_section(module_key, number)?;
    let v = section.theory_view(module, pages);

    println!("{} {} ({})", v.icon, v.title.to_uppercase(), v.time);
    println!("{} / {}", v.module, v.section);
    println!();
    println!("Core Philosophy");
    println!("{}", v.philosophy);
    println!();
    println!("THE FORMULA");
    println!("{}", v.formula);
    println!();
    println!("Optimal verb:     \"{}\"", v.verb);
    println!("Key instruction:  {}", v.instruction);
    println!("Constraint:       {}", v.constraints);
    println!();
    println!("Example Prompts");
    for p in v.prompts {
        println!("  > {}", p);
    }
    println!();
    println!("Workplace Strategy: {}", v.benefit);
    println!("Pro Tip: {}", v.tip);
    println!("Common Mistakes: {}", v.common_mistakes);
    Ok(())
}
