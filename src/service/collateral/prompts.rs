//! Prompts for sales collateral generation

use crate::model::{AccountContext, Claim, CompanyProfile, Persona};

/// Company header followed by the selected claims as bullet points
pub fn build_claim_context(
    account: &AccountContext,
    profile: Option<&CompanyProfile>,
    claims: &[&Claim],
) -> String {
    let industry = profile.and_then(|p| p.industry.as_deref()).unwrap_or("Unknown");
    let size = profile.and_then(|p| p.size_hint.as_deref()).unwrap_or("Unknown");

    let mut context = format!(
        "Company: {}\nIndustry: {}\nSize: {}\n\nKey insights:\n",
        account.name, industry, size
    );
    for claim in claims {
        context.push_str(&format!("- {}\n", claim.text));
    }
    context
}

pub fn build_email_prompt(persona: Persona, context: &str) -> String {
    format!(
        r#"Write a personalized sales email for {persona} persona.

{instructions}

Context:
{context}

Requirements:
- Subject line that captures attention
- Body: 120-180 words maximum
- Professional but conversational tone
- One clear call-to-action
- Reference specific company insights
- No placeholder text or brackets

Return JSON format:
{{
  "persona": "{persona}",
  "subject": "Compelling subject line",
  "body": "Email body content (120-180 words)",
  "cta": "Specific call to action"
}}"#,
        persona = persona,
        instructions = persona.instructions(),
        context = context,
    )
}

pub fn build_pitch_prompt(account: &AccountContext, context: &str) -> String {
    format!(
        r#"Create a sales pitch outline for this prospect:

{context}

Generate exactly 6-8 agenda points and exactly 2 objections with responses.

Return JSON format:
{{
  "agenda": [
    "Opening & rapport building",
    "Discovery of current challenges",
    "Solution overview tailored to {name}",
    "ROI and business case",
    "Implementation approach",
    "Next steps and timeline"
  ],
  "objections": [
    {{
      "objection": "Common objection like budget/timing/priority",
      "response": "Specific response addressing their situation"
    }},
    {{
      "objection": "Technical or integration concern",
      "response": "Detailed response with proof points"
    }}
  ]
}}"#,
        context = context,
        name = account.name,
    )
}

pub fn build_meeting_summary_prompt(transcript: &str) -> String {
    format!(
        r#"Analyze this meeting transcript and extract key information:

{transcript}

Return JSON format:
{{
  "summary": "High-level summary of the meeting",
  "next_steps": [
    {{
      "owner": "Person responsible",
      "task": "Specific task description",
      "due_date": "YYYY-MM-DD or null"
    }}
  ],
  "blockers": ["Identified blocker or concern"],
  "objections": ["Objection raised during meeting"]
}}

Focus on actionable items and explicit concerns mentioned."#
    )
}
