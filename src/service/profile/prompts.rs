//! Prompts for company profile generation

use crate::model::{AccountContext, Source, UNSOURCED_CONFIDENCE_CEILING};
use crate::service::profile::normalize::{PROMPT_CHARS_PER_SOURCE, normalize};

/// Numbered source blocks so the model can attribute each claim to a URL
pub fn build_source_context<'a>(sources: impl IntoIterator<Item = &'a Source>) -> String {
    let mut context = String::new();
    for (i, source) in sources.into_iter().enumerate() {
        context.push_str(&format!("\n--- Source {}: {} ---\n", i + 1, source.url()));
        context.push_str(&format!("Title: {}\n", source.title()));
        context.push_str(&format!(
            "Content: {}\n",
            normalize(source.text(), PROMPT_CHARS_PER_SOURCE)
        ));
    }
    context
}

/// Build the profile generation prompt
pub fn build_profile_prompt(account: &AccountContext, source_context: &str) -> String {
    format!(
        r#"You are a B2B sales researcher. Analyze the provided source content and generate a detailed company profile.

CRITICAL REQUIREMENTS:
1. Every factual claim MUST be backed by evidence from the provided sources
2. If you cannot find evidence in sources, mark source_url as null and set confidence ≤ {ceiling}
3. Include direct quotes as evidence_quote for each sourced claim
4. source_url must be the URL of the numbered source the quote comes from
5. Confidence scores: 0.8-1.0 (clear evidence), 0.5-0.7 (implied), 0.1-0.3 (unsourced/inferred)

Company: {name}
Domain: {domain}

Source Content:
{source_context}

Generate a JSON response with this exact structure:
{{
  "company_name": "{name}",
  "industry": "specific industry category",
  "size_hint": "employee count range or revenue",
  "products": ["specific product 1", "product 2"],
  "pain_points": ["specific challenge 1", "challenge 2"],
  "recent_events": ["recent development 1", "event 2"],
  "claims": [
    {{
      "text": "Factual claim about the company",
      "source_url": "https://source-url-if-available" or null,
      "evidence_quote": "Direct quote supporting this claim" or null,
      "confidence": 0.85
    }}
  ]
}}

Ensure all claims are specific and actionable for sales purposes.
Return only the JSON object."#,
        ceiling = UNSOURCED_CONFIDENCE_CEILING,
        name = account.name,
        domain = account.domain,
        source_context = source_context,
    )
}
