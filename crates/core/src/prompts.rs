//! Prompt templates for every generation route.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::CatalogEntry;

/// Context line used when no embedding matrix is available.
pub const NO_CATALOG_CONTEXT: &str = "No career database available.";

/// The startup journey, in order.
pub const STARTUP_STEPS: [&str; 8] = [
  "Idea Validation & Market Research",
  "Business Plan & Strategy",
  "Legal & Regulatory Setup",
  "Funding & Investment",
  "Product Development",
  "Marketing & Branding",
  "Team Building & Operations",
  "Launch & Growth",
];

/// Structured student profile used instead of a résumé.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct Profile {
  pub name: String,
  pub education: String,
  pub interests: Vec<String>,
  pub skills: Vec<String>,
  pub constraints: String,
}

impl Profile {
  /// Text that is both embedded for retrieval and quoted in the prompt.
  #[must_use]
  pub fn to_prompt_text(&self) -> String {
    format!(
      "Name: {}\nEducation: {}\nInterests: {}\nSkills: {}\nConstraints: {}\n",
      self.name,
      self.education,
      self.interests.join(", "),
      self.skills.join(", "),
      self.constraints
    )
  }
}

/// Founder-supplied description of their project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectDetails {
  pub project_name: Option<String>,
  pub description: Option<String>,
  pub challenges: Option<String>,
  pub goals: Option<String>,
}

/// Render retrieved catalog entries as prompt context.
#[must_use]
pub fn retrieved_context<'a>(entries: impl IntoIterator<Item = &'a CatalogEntry>) -> String {
  let mut out = String::new();
  for entry in entries {
    let _ = writeln!(out, "- {}: {}", entry.title, entry.summary);
    let _ = writeln!(out, "  Skills: {}", entry.skills.join(", "));
  }
  if out.is_empty() {
    NO_CATALOG_CONTEXT.to_owned()
  } else {
    out
  }
}

#[must_use]
pub fn resume_prompt(resume: &str) -> String {
  format!(
    r#"Analyze this resume and suggest exactly 5 career paths.
Return STRICTLY valid JSON in this format:
[
  {{
    "title": "Career Title",
    "rank": 1,
    "why_fit": [
      "Reason 1",
      "Reason 2",
      "Reason 3"
    ]
  }},
  ...
]
Resume: {resume}
"#
  )
}

#[must_use]
pub fn recommendation_prompt(profile_text: &str, context: &str) -> String {
  format!(
    "You are an empathetic career advisor for students in India.
Given the USER PROFILE and RETRIEVED CAREER CONTEXT, return a JSON object with key 'recommendations' (up to 3 careers).

Each career must include:
 - title
 - rank (1 = best)
 - why_fit (2 short bullets)
 - required_skills (beginner→intermediate, each with 1 practical task)
 - resources (3 items: title + url)
 - 90_day_plan (weekly milestones for 12 weeks)

USER PROFILE:
{profile_text}

RETRIEVED CAREER CONTEXT:
{context}

Return ONLY valid JSON.
"
  )
}

#[must_use]
pub fn assessment_prompt(career: &str) -> String {
  format!(
    r#"Create a short AI-generated assessment to evaluate a user's proficiency and interest in {career}.
Return STRICTLY valid JSON in this format with 5-10 questions:
{{
  "questions": [
    {{
      "type": "mcq",
      "question": "Question text here",
      "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
      "answer": 0,
      "points": 1
    }},
    {{
      "type": "fill",
      "question": "Fill in the blank question text",
      "answer": "Correct answer",
      "points": 2
    }}
  ],
  "roadmap": "A brief, one-paragraph overview of the career progression."
}}
For "mcq" questions, "answer" is the index of the correct option.
The output must be only the JSON object. Do not include any other text.
"#
  )
}

#[must_use]
pub fn evaluation_prompt(score: i64, career: &str, language: &str) -> String {
  // Escape quotes so the inlined sample stays valid JSON.
  let career_json = Value::from(career).to_string();
  let language_json = Value::from(language).to_string();

  format!(
    r#"You are an expert technical mentor. Produce STRICTLY valid JSON (no commentary) describing a learning roadmap for someone aiming to become a pro {career}, who scored {score}/10 on a baseline test. The roadmap should have at least 2 phases. Each topic within a phase must include three sections: video resources, book resources, and a quiz.

The JSON MUST have this exact structure:
{{
  "score": {score},
  "career": {career_json},
  "language": {language_json},
  "roadmap": [
    {{
      "phase": "Phase name",
      "topics": [
        {{
          "title": "Topic name",
          "video_resources": [
            {{ "name": "Video title", "link": "YouTube URL" }},
            {{ "name": "Video title 2", "link": "YouTube URL 2" }},
            {{ "name": "Video title 3", "link": "YouTube URL 3" }},
            {{ "name": "Video title 4", "link": "YouTube URL 4" }},
            {{ "name": "Video title 5", "link": "YouTube URL 5" }}
          ],
          "book_resources": [
            {{ "name": "Book/Article title", "link": "URL" }},
            {{ "name": "Book/Article title 2", "link": "URL 2" }}
          ],
          "quiz": [
            {{ "type": "mcq", "question": "...", "options": ["a","b","c"], "answer": "correct", "points": 1 }},
            {{ "type": "fill", "question": "...", "answer": "correct", "points": 1 }},
            {{ "type": "code", "question": "Write code for ...", "answer": "expected output", "points": 3 }}
          ]
        }}
      ]
    }}
  ]
}}

Constraints:
- Include exactly 5 video resources per topic.
- Include exactly 2 book/article resources per topic.
- Each topic must have 10-15 quiz questions.
- Quiz questions should be a mix of "mcq", "fill", and "code" types.
- All YouTube links should be genuine and active.
- All book/article links should be genuine.
- The output must be only the JSON object. No explanations or extra text.
"#
  )
}

#[must_use]
pub fn startup_guidance_prompt(
  details: &ProjectDetails,
  completed_steps: &[Value],
  current_stage: &str,
) -> String {
  let field = |value: &Option<String>| {
    value
      .as_deref()
      .filter(|v| !v.trim().is_empty())
      .unwrap_or("Not specified")
      .to_owned()
  };
  let completed = Value::from(completed_steps.to_vec());

  let mut journey = String::new();
  for (number, step) in STARTUP_STEPS.iter().enumerate() {
    let _ = writeln!(journey, "{}. {step}", number + 1);
  }

  let context = format!(
    "Project Information:
- Name: {}
- Description: {}
- Current Stage: {current_stage}
- Challenges: {}
- Goals: {}

Completed Steps: {completed}
Total Steps Completed: {}/{}

Startup Journey Steps:
{journey}",
    field(&details.project_name),
    field(&details.description),
    field(&details.challenges),
    field(&details.goals),
    completed_steps.len(),
    STARTUP_STEPS.len(),
  );

  format!(
    "You are an expert startup advisor and mentor. Based on the following project information and progress, provide comprehensive, actionable guidance.

{context}
Please provide guidance in the following format:

1. **Current Status Assessment**: Analyze where they are in their startup journey
2. **Immediate Next Steps**: 3-5 specific, actionable next steps they should take
3. **Priority Focus Areas**: What they should focus on most right now
4. **Common Pitfalls to Avoid**: Based on their current stage
5. **Resource Recommendations**: Specific tools, platforms, or resources they should use
6. **Timeline Suggestions**: Realistic timeline for their next milestones

Make the guidance practical, specific, and tailored to their current situation. Use bullet points and be encouraging but realistic. Format the response in HTML for better presentation."
  )
}

#[must_use]
pub fn role_roadmap_prompt(role: &str) -> String {
  format!(
    r#"Given the role "{role}", return a JSON object with:
1. Key technical and soft skills required.
2. A step-by-step roadmap of skills to learn (Beginner → Intermediate → Advanced).
Keep response structured in JSON only.
"#
  )
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use serde_json::{Map, json};

  use super::*;

  fn entry(title: &str, summary: &str, skills: &[&str]) -> CatalogEntry {
    let mut fields = Map::new();
    fields.insert("title".into(), json!(title));
    fields.insert("summary".into(), json!(summary));
    fields.insert("skills".into(), json!(skills));
    CatalogEntry::from_fields(fields)
  }

  #[test]
  fn profile_text_lists_every_field() {
    let profile = Profile {
      name: "Asha".into(),
      education: "B.Tech".into(),
      interests: vec!["AI".into(), "Music".into()],
      skills: vec!["Python".into()],
      constraints: "Remote only".into(),
    };
    assert_eq!(
      profile.to_prompt_text(),
      "Name: Asha\nEducation: B.Tech\nInterests: AI, Music\nSkills: Python\nConstraints: Remote only\n"
    );
  }

  #[test]
  fn retrieved_context_falls_back_without_entries() {
    assert_eq!(retrieved_context(Vec::<&CatalogEntry>::new()), NO_CATALOG_CONTEXT);

    let entries = [entry("Data Analyst", "Finds insights.", &["SQL", "Excel"])];
    assert_eq!(
      retrieved_context(&entries),
      "- Data Analyst: Finds insights.\n  Skills: SQL, Excel\n"
    );
  }

  #[test]
  fn evaluation_sample_is_valid_json_template() {
    let prompt = evaluation_prompt(7, "Data \"Wizard\"", "Rust");
    assert!(prompt.contains("\"career\": \"Data \\\"Wizard\\\"\""));
    assert!(prompt.contains("\"score\": 7"));
    assert!(prompt.contains("scored 7/10"));
  }

  #[test]
  fn startup_context_defaults_missing_details() {
    let details = ProjectDetails {
      project_name: Some("Farmly".into()),
      ..ProjectDetails::default()
    };
    let prompt = startup_guidance_prompt(&details, &[json!(1), json!(2)], "Early Stage");
    assert!(prompt.contains("- Name: Farmly"));
    assert!(prompt.contains("- Description: Not specified"));
    assert!(prompt.contains("Completed Steps: [1,2]"));
    assert!(prompt.contains("Total Steps Completed: 2/8"));
    assert!(prompt.contains("8. Launch & Growth"));
  }

  #[test]
  fn role_prompt_quotes_role() {
    assert!(role_roadmap_prompt("DevOps Engineer").contains("Given the role \"DevOps Engineer\""));
  }
}
