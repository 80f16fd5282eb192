//! Prompt text for section drafting.

use crate::ai::PromptBuilder;
use crate::constants::drafting::{MAX_CHUNK_CHARS_IN_PROMPT, TBD_MARKER};
use crate::profile::LengthTarget;
use crate::templates::TemplateDefinition;
use crate::types::RetrievedChunk;

pub const GROUNDED_SYSTEM_PROMPT: &str = "You are an engineering technical writer drafting one \
section of a company document. Use only the facts in the provided source excerpts. Do not \
invent facts, numbers, names, dates, or references. Where a required value is missing from the \
sources, write [TBD] in its place. Style excerpts show the company voice only and are never a \
source of facts.";

pub const TEMPLATE_SYSTEM_PROMPT: &str = "You are an engineering technical writer drafting a \
short placeholder section with no source material. Write neutral framing prose only. Do not \
state any facts, numbers, quantities, dates, or names. Use [TBD] for every project-specific \
detail. Style excerpts show the company voice only.";

pub const REWRITE_SYSTEM_PROMPT: &str = "You revise engineering prose to a target length. \
Preserve tone, style, and facts. Never add new facts.";

/// Subject of a section draft
pub struct SectionContext<'a> {
    pub doc_type: Option<&'a str>,
    pub section_type: &'a str,
    pub engineering_function: Option<&'a str>,
    pub user_request: &'a str,
    pub length_target: &'a LengthTarget,
    pub template: &'a TemplateDefinition,
}

fn excerpt_items(chunks: &[RetrievedChunk]) -> Vec<(String, String)> {
    chunks
        .iter()
        .map(|c| {
            let text: String = c.text.trim().chars().take(MAX_CHUNK_CHARS_IN_PROMPT).collect();
            (c.label().to_string(), text)
        })
        .collect()
}

fn length_guidance(target: &LengthTarget) -> Option<String> {
    let (min, max) = target.bounds()?;
    let mut guidance = format!("Aim for {}-{} characters.", min, max);
    if let Some(sentences) = target.avg_sentences {
        guidance.push_str(&format!(" Typical sections run about {} sentences", sentences));
        match target.avg_paragraphs {
            Some(paragraphs) => guidance.push_str(&format!(" in {} paragraphs.", paragraphs)),
            None => guidance.push('.'),
        }
    }
    Some(guidance)
}

fn voice_line(template: &TemplateDefinition) -> String {
    let voice = &template.voice;
    let mut line = format!(
        "Tone: {}. Person: {}. Tense: {}.",
        voice.tone, voice.person, voice.tense
    );
    if !voice.avoid.is_empty() {
        line.push_str(&format!(" Avoid: {}.", voice.avoid.join(", ")));
    }
    line
}

fn base_builder(ctx: &SectionContext<'_>) -> PromptBuilder {
    let outline = ctx.template.section(ctx.section_type);
    let length = length_guidance(ctx.length_target);

    PromptBuilder::new()
        .context_opt("Document type", ctx.doc_type)
        .context_item("Section", ctx.section_type)
        .context_opt("Engineering function", ctx.engineering_function)
        .context_opt("Section title", outline.map(|s| s.title.as_str()))
        .context_opt("Length", length.as_deref())
        .section("Request", ctx.user_request)
        .context_opt("Guidance", outline.and_then(|s| s.guidance.as_deref()))
        .section("Voice", &voice_line(ctx.template))
}

/// User prompt for a section grounded in content chunks
pub fn grounded_prompt(
    ctx: &SectionContext<'_>,
    content: &[RetrievedChunk],
    style: &[RetrievedChunk],
) -> String {
    base_builder(ctx)
        .excerpts("Style excerpts (voice only)", excerpt_items(style))
        .excerpts("Source excerpts", excerpt_items(content))
        .rules(vec![
            "Use only facts stated in the source excerpts",
            &format!("Write {} for any missing value", TBD_MARKER),
            "Return only the section body, without a heading",
        ])
        .build()
}

/// User prompt for a fact-free template-safe section
pub fn template_prompt(ctx: &SectionContext<'_>, style: &[RetrievedChunk]) -> String {
    base_builder(ctx)
        .excerpts("Style excerpts (voice only)", excerpt_items(style))
        .rules(vec![
            "No source content is available for this section",
            &format!("Use {} for every specific", TBD_MARKER),
            "Do not invent numbers, quantities, names, or dates",
            "Return only the section body, without a heading",
        ])
        .build()
}

/// Single-shot length correction request
pub fn rewrite_prompt(text: &str, min_chars: usize, max_chars: usize) -> String {
    format!(
        "Rewrite the following section to be between {} and {} characters. \
         Preserve tone, style, and facts. No new facts.\n\n{}",
        min_chars, max_chars, text
    )
}
