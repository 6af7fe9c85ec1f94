// Resume extraction LLM prompt templates.
// All prompts for the extraction module are defined here.

pub const PROFILE_EXTRACT_SYSTEM: &str = "\
You are a meticulous technical recruiting analyst. \
Turn raw resume text into structured JSON for a screening database. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Distinguish demonstrated skills from merely claimed ones: a skill is \
high-confidence ONLY when a work-experience description shows it in use \
('Built X using Y', 'Migrated Z to W'). Everything else is low-confidence.";

pub const PROFILE_EXTRACT_PROMPT: &str = r#"Extract a candidate profile from the resume text below.

RESUME TEXT:
{resume_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "name": "string",
  "age": number | null,
  "skillset": "comma-separated list of every skill mentioned anywhere in the resume",
  "high_confidence_skills": "comma-separated skills demonstrated with concrete evidence in work experience",
  "low_confidence_skills": "comma-separated skills listed without proof or context",
  "general_proficiency": "string, e.g. 'Junior Frontend Developer', 'Senior Backend Engineer', 'Lead'",
  "ai_summary": "2-3 sentence narrative summary of the candidate",
  "work_experience": [
    {
      "company": "string",
      "role": "string",
      "months_of_service": number,
      "skillset": "comma-separated skills used in this role",
      "tech_stack": "comma-separated technologies used in this role",
      "projects": ["string"],
      "is_internship": boolean,
      "has_overlap": boolean,
      "start_date": "string, e.g. '2020-03'",
      "end_date": "string, 'Present' if current",
      "description": "string"
    }
  ]
}

RULES:
1. A skill belongs in high_confidence_skills ONLY with evidence of actual usage; never copy a skills section wholesale.
2. months_of_service must be a non-negative integer; estimate from the dates when not stated.
3. has_overlap is true when an entry's dates overlap another entry's.
4. Set age to null unless the resume states or clearly implies it.
5. List work_experience newest first.
6. Return ONLY the JSON object — nothing else, no code fences."#;
