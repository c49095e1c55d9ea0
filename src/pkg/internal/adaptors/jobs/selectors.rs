use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    pkg::internal::adaptors::jobs::spec::{Category, JOB_COLUMNS, JobEntry, JobFilter, PageRequest},
    prelude::Result,
};

pub struct JobSelector<'a> {
    pool: &'a mut SqliteConnection,
}

fn push_filter<'q>(qb: &mut QueryBuilder<'q, Sqlite>, filter: &'q JobFilter, pattern: &'q Option<String>) {
    qb.push(" WHERE 1 = 1");
    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(pattern) = pattern {
        qb.push(" AND (");
        for (i, column) in ["company_name", "job_role", "city", "state"].iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*column)
                .push(" LIKE ")
                .push_bind(pattern.as_str())
                .push(" ESCAPE '\\'");
        }
        qb.push(")");
    }
}

fn like_pattern(search: &Option<String>) -> Option<String> {
    let term = search.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{}%", escaped))
}

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        JobSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {} FROM jobs WHERE id = ?",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Returns one page of postings matching `filter`, newest first, with the
    /// total number of matches.
    pub async fn list(&mut self, filter: &JobFilter, page: PageRequest) -> Result<(Vec<JobEntry>, i64)> {
        let pattern = like_pattern(&filter.search);

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM jobs");
        push_filter(&mut count, filter, &pattern);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&mut *self.pool)
            .await?;

        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM jobs", JOB_COLUMNS));
        push_filter(&mut qb, filter, &pattern);
        qb.push(" ORDER BY posted_on DESC, id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = qb
            .build_query_as::<JobEntry>()
            .fetch_all(&mut *self.pool)
            .await?;
        tracing::debug!("page {} of {} matching postings: {} rows", page.page, total, rows.len());
        Ok((rows, total))
    }

    pub async fn latest_by_category(&mut self, category: Category, limit: i64) -> Result<Vec<JobEntry>> {
        let rows = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {} FROM jobs WHERE category = ? ORDER BY posted_on DESC, id DESC LIMIT ?",
            JOB_COLUMNS
        ))
        .bind(category.as_str())
        .bind(limit)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn posted_before(&mut self, cutoff: DateTime<Utc>) -> Result<Vec<JobEntry>> {
        let rows = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {} FROM jobs WHERE posted_on < ? ORDER BY id",
            JOB_COLUMNS
        ))
        .bind(cutoff)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(&mut self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(total)
    }

    pub async fn count_by_category(&mut self) -> Result<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT category, COUNT(*) FROM jobs GROUP BY category ORDER BY category",
        )
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn posted_on_range(&mut self) -> Result<(Option<String>, Option<String>)> {
        let range = sqlx::query_as::<_, (Option<String>, Option<String>)>(
            "SELECT MIN(posted_on), MAX(posted_on) FROM jobs",
        )
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(range)
    }
}
