//! Extraction pipeline — turns resume files into stored candidate records.
//!
//! Directory scan → text extraction → LLM profile extraction → aggregate
//! derivation → idempotent insert keyed on filename. One bad file never
//! aborts a batch; only a store failure does.

pub mod handlers;
pub mod prompts;
pub mod text;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::candidate::{CandidateProfile, NewCandidate, WorkExperience};
use crate::store;

/// The resume profile extractor. Implement this to swap backends without
/// touching the processor or handler code.
///
/// Carried in `AppState` as `Arc<dyn ProfileExtractor>`.
#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    async fn extract(&self, resume_text: &str) -> Result<CandidateProfile, AppError>;
}

/// Default extractor: one Gemini call per resume, strict-JSON prompt.
pub struct LlmProfileExtractor {
    llm: LlmClient,
}

impl LlmProfileExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ProfileExtractor for LlmProfileExtractor {
    async fn extract(&self, resume_text: &str) -> Result<CandidateProfile, AppError> {
        let prompt = prompts::PROFILE_EXTRACT_PROMPT.replace("{resume_text}", resume_text);
        self.llm
            .call_json::<CandidateProfile>(&prompt, prompts::PROFILE_EXTRACT_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Failed to extract candidate profile: {e}")))
    }
}

/// Outcome of one directory scan.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessReport {
    pub processed: u32,
    pub skipped: u32,
    pub failed: u32,
}

/// Scans `dir` (non-recursive) and stores a candidate for every new resume.
///
/// Files whose filename is already stored are skipped — re-running over the
/// same directory is idempotent. Per-file failures (unreadable document,
/// extraction error) are logged and counted, and the scan moves on.
pub async fn process_resumes(
    pool: &SqlitePool,
    extractor: &dyn ProfileExtractor,
    dir: &Path,
) -> Result<ProcessReport, AppError> {
    let mut report = ProcessReport::default();

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::Internal(e.into()))?
    {
        let path = entry.path();
        if !path.is_file() || !text::is_resume_file(&path) {
            continue;
        }
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        if store::get_candidate_by_filename(pool, &filename).await?.is_some() {
            debug!("Skipping {filename}, already processed");
            report.skipped += 1;
            continue;
        }

        info!("Processing {filename}...");
        let resume_text = match text::extract_text(&path) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("No text layer in {filename}, skipping");
                report.failed += 1;
                continue;
            }
            Err(e) => {
                warn!("Failed to read {filename}: {e}");
                report.failed += 1;
                continue;
            }
        };

        let profile = match extractor.extract(&resume_text).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Failed to extract a profile from {filename}: {e}");
                report.failed += 1;
                continue;
            }
        };

        let candidate = build_candidate(profile, &filename);
        match store::insert_candidate(pool, &candidate).await? {
            Some(id) => {
                info!("Added {filename} as candidate {id}");
                report.processed += 1;
            }
            None => {
                debug!("{filename} was stored concurrently, skipping");
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

/// Builds the insert shape from an extracted profile, deriving the aggregate
/// fields from the work-experience entries so they are consistent with the
/// children by construction.
fn build_candidate(profile: CandidateProfile, filename: &str) -> NewCandidate {
    let mut companies: Vec<String> = Vec::new();
    let mut roles: Vec<String> = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut skills: Vec<String> = Vec::new();
    let mut total_months: i64 = 0;

    for token in split_listing(&profile.skillset) {
        push_distinct(&mut skills, token);
    }

    for entry in &profile.work_experience {
        total_months += entry.months_of_service.max(0);
        let company = entry.company.trim();
        if !company.is_empty() {
            push_distinct(&mut companies, company.to_string());
        }
        let role = entry.role.trim();
        if !role.is_empty() {
            push_distinct(&mut roles, role.to_string());
        }
        for token in split_listing(&entry.tech_stack) {
            push_distinct(&mut stack, token);
        }
        for token in split_listing(&entry.skillset) {
            push_distinct(&mut skills, token);
        }
    }

    NewCandidate {
        filename: filename.to_string(),
        name: profile.name.filter(|n| !n.trim().is_empty()),
        age: profile.age,
        total_months_experience: total_months,
        total_companies: companies.len() as i64,
        roles_served: roles.join(", "),
        skillset: skills.join(", "),
        high_confidence_skills: profile.high_confidence_skills,
        low_confidence_skills: profile.low_confidence_skills,
        tech_stack: stack.join(", "),
        general_proficiency: profile.general_proficiency,
        ai_summary: profile.ai_summary,
        work_experience: profile
            .work_experience
            .into_iter()
            .map(WorkExperience::from)
            .collect(),
    }
}

fn split_listing(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
}

/// Appends `value` unless an existing entry matches it case-insensitively.
fn push_distinct(list: &mut Vec<String>, value: String) {
    if !list.iter().any(|v| v.eq_ignore_ascii_case(&value)) {
        list.push(value);
    }
}
