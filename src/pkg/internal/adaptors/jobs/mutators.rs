use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::{
    pkg::internal::adaptors::jobs::spec::{JOB_COLUMNS, JobEntry, NewJob},
    prelude::Result,
};

pub struct JobMutator<'a> {
    pool: &'a mut SqliteConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&mut self, job: &NewJob, image: Option<&str>, posted_on: DateTime<Utc>) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            INSERT INTO jobs (category, company_name, job_role, website_link, state, city,
                experience, qualification, batch, salary_package, job_description,
                key_responsibility, about_company, selection_process, image, posted_on)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(job.category.as_str())
        .bind(&job.company_name)
        .bind(&job.job_role)
        .bind(&job.website_link)
        .bind(&job.state)
        .bind(&job.city)
        .bind(&job.experience)
        .bind(&job.qualification)
        .bind(&job.batch)
        .bind(&job.salary_package)
        .bind(&job.job_description)
        .bind(&job.key_responsibility)
        .bind(&job.about_company)
        .bind(&job.selection_process)
        .bind(image)
        .bind(posted_on)
        .fetch_one(&mut *self.pool)
        .await?;
        tracing::debug!("created posting {} for {}", row.id, &row.company_name);
        Ok(row)
    }

    /// Overwrites every field of the posting, keeping `id` and `posted_on`.
    pub async fn update(&mut self, id: i64, job: &NewJob, image: Option<&str>) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            UPDATE jobs SET category = ?, company_name = ?, job_role = ?, website_link = ?,
                state = ?, city = ?, experience = ?, qualification = ?, batch = ?,
                salary_package = ?, job_description = ?, key_responsibility = ?,
                about_company = ?, selection_process = ?, image = ?
            WHERE id = ?
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(job.category.as_str())
        .bind(&job.company_name)
        .bind(&job.job_role)
        .bind(&job.website_link)
        .bind(&job.state)
        .bind(&job.city)
        .bind(&job.experience)
        .bind(&job.qualification)
        .bind(&job.batch)
        .bind(&job.salary_package)
        .bind(&job.job_description)
        .bind(&job.key_responsibility)
        .bind(&job.about_company)
        .bind(&job.selection_process)
        .bind(image)
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i64) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            "DELETE FROM jobs WHERE id = ? RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete_posted_before(&mut self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM jobs WHERE posted_on < ?")
            .bind(cutoff)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
