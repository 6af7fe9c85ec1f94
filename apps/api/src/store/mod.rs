//! Candidate store — all SQLite access for candidates and their work experience.
//!
//! Candidates are written exactly once per unique filename and never updated in
//! place; the screening engine treats everything read from here as an immutable
//! snapshot. Any error from this module is a hard failure for the request — no
//! partial results, no retries.

pub mod handlers;

use sqlx::SqlitePool;

use crate::models::candidate::{Candidate, CandidateRow, NewCandidate, WorkExperience, WorkExperienceRow};

/// Inserts a candidate and its work-experience children in one transaction.
/// Returns `None` when the filename is already stored (the unique violation is
/// absorbed and the transaction rolled back) — re-processing is idempotent.
pub async fn insert_candidate(
    pool: &SqlitePool,
    candidate: &NewCandidate,
) -> Result<Option<i64>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO candidates
            (filename, name, age, total_months_experience, total_companies, roles_served,
             skillset, high_confidence_skills, low_confidence_skills, tech_stack,
             general_proficiency, ai_summary)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&candidate.filename)
    .bind(&candidate.name)
    .bind(candidate.age)
    .bind(candidate.total_months_experience)
    .bind(candidate.total_companies)
    .bind(&candidate.roles_served)
    .bind(&candidate.skillset)
    .bind(&candidate.high_confidence_skills)
    .bind(&candidate.low_confidence_skills)
    .bind(&candidate.tech_stack)
    .bind(&candidate.general_proficiency)
    .bind(&candidate.ai_summary)
    .execute(&mut *tx)
    .await;

    let candidate_id = match result {
        Ok(done) => done.last_insert_rowid(),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            tx.rollback().await?;
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    for exp in &candidate.work_experience {
        sqlx::query(
            r#"
            INSERT INTO work_experience
                (candidate_id, company_name, role, months_of_service, skillset, tech_stack,
                 projects, is_internship, has_overlap, start_date, end_date, description)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(candidate_id)
        .bind(&exp.company_name)
        .bind(&exp.role)
        .bind(exp.months_of_service)
        .bind(&exp.skillset)
        .bind(&exp.tech_stack)
        .bind(sqlx::types::Json(&exp.projects))
        .bind(exp.is_internship)
        .bind(exp.has_overlap)
        .bind(&exp.start_date)
        .bind(&exp.end_date)
        .bind(&exp.description)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(Some(candidate_id))
}

/// Returns every candidate with work experience populated, in insertion order.
/// Ranking stability downstream keys on this order.
pub async fn get_all_candidates(pool: &SqlitePool) -> Result<Vec<Candidate>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates ORDER BY id")
        .fetch_all(pool)
        .await?;
    attach_work_experience(pool, rows).await
}

/// Returns the candidates matching the given ids. Empty input yields an empty
/// result, never an error.
pub async fn get_candidates_by_ids(
    pool: &SqlitePool,
    ids: &[i64],
) -> Result<Vec<Candidate>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT * FROM candidates WHERE id IN ({placeholders}) ORDER BY id");

    let mut query = sqlx::query_as::<_, CandidateRow>(&sql);
    for id in ids {
        query = query.bind(id);
    }

    let rows = query.fetch_all(pool).await?;
    attach_work_experience(pool, rows).await
}

/// Idempotency probe used by the extraction pipeline before re-processing a file.
pub async fn get_candidate_by_filename(
    pool: &SqlitePool,
    filename: &str,
) -> Result<Option<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE filename = ?")
        .bind(filename)
        .fetch_optional(pool)
        .await
}

/// Case-insensitive substring search on the candidate name.
pub async fn search_candidates_by_name(
    pool: &SqlitePool,
    name: &str,
) -> Result<Vec<Candidate>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CandidateRow>(
        "SELECT * FROM candidates WHERE name LIKE ? ORDER BY id",
    )
    .bind(format!("%{name}%"))
    .fetch_all(pool)
    .await?;
    attach_work_experience(pool, rows).await
}

/// Loads work-experience children for each candidate row, newest role first.
async fn attach_work_experience(
    pool: &SqlitePool,
    rows: Vec<CandidateRow>,
) -> Result<Vec<Candidate>, sqlx::Error> {
    let mut candidates = Vec::with_capacity(rows.len());
    for row in rows {
        let experience = sqlx::query_as::<_, WorkExperienceRow>(
            "SELECT * FROM work_experience WHERE candidate_id = ? ORDER BY start_date DESC",
        )
        .bind(row.id)
        .fetch_all(pool)
        .await?;

        candidates.push(Candidate {
            profile: row,
            work_experience: experience.into_iter().map(WorkExperience::from).collect(),
        });
    }
    Ok(candidates)
}
