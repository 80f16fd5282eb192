//! Built-in engineering document templates.
//!
//! The generic design report must stay first: it is the catalog fallback.

use std::collections::HashMap;

use super::{TemplateDefinition, TemplateSection, VoiceRules};

fn hints(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn design_report_outline() -> Vec<TemplateSection> {
    vec![
        TemplateSection::new(
            "executive_summary",
            "Executive Summary",
            false,
            Some("Summarize purpose, key findings, and recommendations in one or two paragraphs."),
        ),
        TemplateSection::new(
            "introduction",
            "Introduction",
            true,
            Some("State the project, the client, and the purpose of this report."),
        ),
        TemplateSection::new(
            "scope",
            "Scope",
            true,
            Some("Describe what the work covers and what it explicitly excludes."),
        ),
        TemplateSection::new(
            "methodology",
            "Methodology",
            true,
            Some("Describe codes, standards, software, and analysis methods used."),
        ),
        TemplateSection::new(
            "findings",
            "Findings",
            true,
            Some("Report observations and analysis outcomes with their sources."),
        ),
        TemplateSection::new(
            "results",
            "Results",
            false,
            Some("Present calculated values and design checks exactly as sourced."),
        ),
        TemplateSection::new(
            "recommendations",
            "Recommendations",
            true,
            Some("List actionable recommendations tied to findings."),
        ),
        TemplateSection::new(
            "limitations",
            "Limitations",
            false,
            Some("State assumptions, data gaps, and reliance limits."),
        ),
        TemplateSection::new("conclusion", "Conclusion", true, None),
        TemplateSection::new("appendix", "Appendix", false, None),
    ]
}

pub(super) fn definitions() -> Vec<TemplateDefinition> {
    vec![
        TemplateDefinition {
            doc_type: "design_report".to_string(),
            section_type: None,
            engineering_function: None,
            outline: design_report_outline(),
            voice: VoiceRules::default(),
            retrieval_hints: hints(&[("*", "design basis project")]),
        },
        TemplateDefinition {
            doc_type: "design_report".to_string(),
            section_type: Some("introduction".to_string()),
            engineering_function: None,
            outline: vec![TemplateSection::new(
                "introduction",
                "Introduction",
                true,
                Some(
                    "Open with the project name and location, then the purpose of the report. \
                     Keep it to one or two short paragraphs.",
                ),
            )],
            voice: VoiceRules::default(),
            retrieval_hints: hints(&[("introduction", "project background purpose client")]),
        },
        TemplateDefinition {
            doc_type: "design_report".to_string(),
            section_type: Some("methodology".to_string()),
            engineering_function: Some("structural".to_string()),
            outline: vec![TemplateSection::new(
                "methodology",
                "Structural Design Methodology",
                true,
                Some(
                    "Cover design codes, load combinations, analysis software, and material \
                     properties. Cite each value to its source.",
                ),
            )],
            voice: VoiceRules {
                avoid: vec![
                    "marketing language".to_string(),
                    "load values without a cited source".to_string(),
                ],
                ..VoiceRules::default()
            },
            retrieval_hints: hints(&[(
                "methodology",
                "design code load combination analysis model",
            )]),
        },
        TemplateDefinition {
            doc_type: "design_report".to_string(),
            section_type: Some("findings".to_string()),
            engineering_function: None,
            outline: vec![TemplateSection::new(
                "findings",
                "Findings",
                true,
                Some("One paragraph per finding. Lead with the observation, then its basis."),
            )],
            voice: VoiceRules::default(),
            retrieval_hints: hints(&[("findings", "observed condition assessment")]),
        },
        TemplateDefinition {
            doc_type: "calculation_narrative".to_string(),
            section_type: None,
            engineering_function: None,
            outline: vec![
                TemplateSection::new(
                    "introduction",
                    "Purpose",
                    true,
                    Some("State what element is being calculated and why."),
                ),
                TemplateSection::new(
                    "methodology",
                    "Method and Assumptions",
                    true,
                    Some("List governing code clauses and each assumption."),
                ),
                TemplateSection::new(
                    "results",
                    "Results",
                    true,
                    Some("Report governing values and utilization ratios as sourced."),
                ),
                TemplateSection::new("conclusion", "Conclusion", true, None),
            ],
            voice: VoiceRules {
                tone: "concise, technical".to_string(),
                ..VoiceRules::default()
            },
            retrieval_hints: hints(&[("*", "calculation assumption load capacity")]),
        },
        TemplateDefinition {
            doc_type: "proposal".to_string(),
            section_type: None,
            engineering_function: None,
            outline: vec![
                TemplateSection::new(
                    "executive_summary",
                    "Executive Summary",
                    true,
                    Some("Restate the client need and the proposed response."),
                ),
                TemplateSection::new("introduction", "Introduction", true, None),
                TemplateSection::new(
                    "scope",
                    "Scope of Services",
                    true,
                    Some("Enumerate services and deliverables; list exclusions."),
                ),
                TemplateSection::new("methodology", "Approach", true, None),
                TemplateSection::new("conclusion", "Closing", false, None),
            ],
            voice: VoiceRules {
                tone: "professional, client-facing".to_string(),
                person: "first person plural".to_string(),
                ..VoiceRules::default()
            },
            retrieval_hints: hints(&[("*", "client requirements deliverables")]),
        },
        TemplateDefinition {
            doc_type: "proposal".to_string(),
            section_type: Some("scope".to_string()),
            engineering_function: None,
            outline: vec![TemplateSection::new(
                "scope",
                "Scope of Services",
                true,
                Some("Bullet each service with its deliverable. Close with exclusions."),
            )],
            voice: VoiceRules {
                tone: "professional, client-facing".to_string(),
                person: "first person plural".to_string(),
                ..VoiceRules::default()
            },
            retrieval_hints: hints(&[("scope", "scope of services deliverables exclusions")]),
        },
    ]
}
