//! Prompt Builder
//!
//! Assembles drafting prompts from labelled blocks. Blocks render in
//! insertion order so identical inputs give identical prompts.

/// One block of a prompt
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// `**key**: value` lines; all context items share a single block
    Context(Vec<(String, String)>),
    /// Headed free text
    Text { header: String, content: String },
    /// Numbered source excerpts with a label each
    Excerpts {
        header: String,
        items: Vec<(String, String)>,
    },
    /// Hard restrictions the model must follow
    Rules(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a context item, appending to the existing context block if any
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        let entry = (key.to_string(), value.to_string());
        match self
            .sections
            .iter_mut()
            .find_map(|s| match s {
                PromptSection::Context(ctx) => Some(ctx),
                _ => None,
            }) {
            Some(ctx) => ctx.push(entry),
            None => self.sections.push(PromptSection::Context(vec![entry])),
        }
        self
    }

    /// Add a context item only when a value is present
    pub fn context_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.context_item(key, v),
            None => self,
        }
    }

    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: header.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Add numbered excerpts. Empty lists are skipped.
    pub fn excerpts(mut self, header: &str, items: Vec<(String, String)>) -> Self {
        if !items.is_empty() {
            self.sections.push(PromptSection::Excerpts {
                header: header.to_string(),
                items,
            });
        }
        self
    }

    pub fn rules(mut self, rules: Vec<&str>) -> Self {
        self.sections
            .push(PromptSection::Rules(rules.into_iter().map(String::from).collect()));
        self
    }

    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Context(ctx) => {
                    prompt.push_str("# Context\n\n");
                    for (key, value) in ctx {
                        prompt.push_str(&format!("**{}**: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    prompt.push_str(&format!("# {}\n\n{}\n\n", header, content));
                }
                PromptSection::Excerpts { header, items } => {
                    prompt.push_str(&format!("# {}\n\n", header));
                    for (i, (label, text)) in items.iter().enumerate() {
                        prompt.push_str(&format!("[{}] {}\n{}\n\n", i + 1, label, text));
                    }
                }
                PromptSection::Rules(rules) => {
                    prompt.push_str("<RULES>\n");
                    for rule in rules {
                        prompt.push_str(&format!("- {}\n", rule));
                    }
                    prompt.push_str("</RULES>\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headed_section() {
        let prompt = PromptBuilder::new()
            .section("Request", "draft the scope")
            .build();
        assert_eq!(prompt, "# Request\n\ndraft the scope");
    }

    #[test]
    fn test_context_items_keep_order() {
        let prompt = PromptBuilder::new()
            .context_item("Document type", "design_report")
            .context_opt("Engineering function", None)
            .context_item("Section", "scope")
            .build();

        let doc = prompt.find("**Document type**").unwrap();
        let section = prompt.find("**Section**").unwrap();
        assert!(doc < section);
        assert!(!prompt.contains("Engineering function"));
    }

    #[test]
    fn test_excerpts_numbered_and_empty_skipped() {
        let prompt = PromptBuilder::new()
            .excerpts("Style", vec![])
            .excerpts(
                "Sources",
                vec![
                    ("Loads".to_string(), "Dead load 2.4 kPa".to_string()),
                    ("Wind".to_string(), "Basic wind speed 45 m/s".to_string()),
                ],
            )
            .build();

        assert!(!prompt.contains("# Style"));
        assert!(prompt.contains("[1] Loads\nDead load 2.4 kPa"));
        assert!(prompt.contains("[2] Wind"));
    }

    #[test]
    fn test_rules() {
        let prompt = PromptBuilder::new()
            .rules(vec!["Do not invent facts"])
            .build();
        assert!(prompt.contains("<RULES>\n- Do not invent facts\n</RULES>"));
    }
}
