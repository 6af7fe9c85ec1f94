use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `candidates` table: the aggregated profile for a processed
/// resume. Every descriptive field is optional — resumes are messy and the
/// extractor is allowed to leave gaps. Consumers default to empty/zero rather
/// than treating a gap as an error.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: i64,
    /// Source document name. Unique — the idempotency key for re-processing.
    pub filename: String,
    pub name: Option<String>,
    pub age: Option<i64>,
    /// Sum of `months_of_service` over the work-experience children.
    pub total_months_experience: i64,
    /// Count of distinct employers over the work-experience children.
    pub total_companies: i64,
    /// Comma-joined distinct job titles held.
    pub roles_served: Option<String>,
    /// Comma-joined union of all skills mentioned anywhere (superset).
    pub skillset: Option<String>,
    /// Skills with demonstrated evidence in a work-experience description.
    pub high_confidence_skills: Option<String>,
    /// Skills only claimed, with no demonstrated evidence.
    pub low_confidence_skills: Option<String>,
    /// Comma-joined union of technologies across work-experience entries.
    pub tech_stack: Option<String>,
    /// Free-text seniority/role label, e.g. "Senior Backend Engineer".
    pub general_proficiency: Option<String>,
    pub ai_summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One row of the `work_experience` table as stored. `projects` is kept as the
/// raw JSON string here; `WorkExperience` is the deserialized shape callers see.
#[derive(Debug, Clone, FromRow)]
pub struct WorkExperienceRow {
    pub id: i64,
    pub candidate_id: i64,
    pub company_name: String,
    pub role: String,
    pub months_of_service: i64,
    pub skillset: String,
    pub tech_stack: String,
    pub projects: String,
    pub is_internship: bool,
    pub has_overlap: bool,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

/// A single employment entry, scoped to one role at one company.
/// Dates are loosely formatted strings ("Present" is a valid end_date) and are
/// used only for display ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkExperience {
    pub company_name: String,
    pub role: String,
    pub months_of_service: i64,
    pub skillset: String,
    pub tech_stack: String,
    pub projects: Vec<String>,
    pub is_internship: bool,
    pub has_overlap: bool,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

impl From<WorkExperienceRow> for WorkExperience {
    fn from(row: WorkExperienceRow) -> Self {
        // Malformed stored JSON degrades to an empty project list, never an error.
        let projects = serde_json::from_str(&row.projects).unwrap_or_default();
        WorkExperience {
            company_name: row.company_name,
            role: row.role,
            months_of_service: row.months_of_service,
            skillset: row.skillset,
            tech_stack: row.tech_stack,
            projects,
            is_internship: row.is_internship,
            has_overlap: row.has_overlap,
            start_date: row.start_date,
            end_date: row.end_date,
            description: row.description,
        }
    }
}

/// The full candidate shape served to callers and consumed by the screening
/// engine: the aggregated profile plus its ordered work-experience entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub profile: CandidateRow,
    pub work_experience: Vec<WorkExperience>,
}

/// Insert shape for a new candidate, before the store assigns an id.
/// The aggregate fields must already be consistent with `work_experience`
/// (the extraction pipeline derives them from the entry list).
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub filename: String,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub total_months_experience: i64,
    pub total_companies: i64,
    pub roles_served: String,
    pub skillset: String,
    pub high_confidence_skills: String,
    pub low_confidence_skills: String,
    pub tech_stack: String,
    pub general_proficiency: String,
    pub ai_summary: String,
    pub work_experience: Vec<WorkExperience>,
}

/// Structured output contract of the LLM extractor. Field-level gaps are
/// expected — everything defaults so a sparse response still deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub skillset: String,
    #[serde(default)]
    pub high_confidence_skills: String,
    #[serde(default)]
    pub low_confidence_skills: String,
    #[serde(default)]
    pub general_proficiency: String,
    #[serde(default)]
    pub ai_summary: String,
    #[serde(default)]
    pub work_experience: Vec<ExtractedExperience>,
}

/// One work-experience entry as extracted by the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedExperience {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub months_of_service: i64,
    #[serde(default)]
    pub skillset: String,
    #[serde(default)]
    pub tech_stack: String,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub is_internship: bool,
    #[serde(default)]
    pub has_overlap: bool,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
}

impl From<ExtractedExperience> for WorkExperience {
    fn from(entry: ExtractedExperience) -> Self {
        WorkExperience {
            company_name: entry.company,
            role: entry.role,
            months_of_service: entry.months_of_service.max(0),
            skillset: entry.skillset,
            tech_stack: entry.tech_stack,
            projects: entry.projects,
            is_internship: entry.is_internship,
            has_overlap: entry.has_overlap,
            start_date: entry.start_date,
            end_date: entry.end_date,
            description: entry.description,
        }
    }
}
