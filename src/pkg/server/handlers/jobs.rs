use std::collections::HashMap;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;
use standard_error::StandardError;
use validator::Validate;

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::{
                mutators::JobMutator,
                selectors::JobSelector,
                spec::{
                    Category, JobFilter, JobPage, JobResponse, NewJob, PageRequest,
                    TOP_JOBS_PER_CATEGORY, TopJobs,
                },
            },
            images::UploadedImage,
        },
        server::state::{AppState, GetTxn},
    },
    prelude::{Result, bad_request, not_found},
};

#[derive(Debug, Default, Validate)]
pub struct JobInput {
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub category: String,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub job_role: String,
    pub website_link: Option<String>,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub state: String,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub city: String,
    pub experience: Option<String>,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub qualification: String,
    pub batch: Option<String>,
    pub salary_package: Option<String>,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub job_description: String,
    pub key_responsibility: Option<String>,
    pub about_company: Option<String>,
    pub selection_process: Option<String>,
}

fn required(fields: &mut HashMap<String, String>, name: &str) -> String {
    fields
        .remove(name)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn optional(fields: &mut HashMap<String, String>, name: &str) -> Option<String> {
    Some(required(fields, name)).filter(|v| !v.is_empty())
}

impl JobInput {
    pub fn from_fields(mut fields: HashMap<String, String>) -> Self {
        // older clients post the misspelt field name
        let key_responsibility =
            optional(&mut fields, "key_responsibility").or_else(|| optional(&mut fields, "key_responsibilty"));
        JobInput {
            category: required(&mut fields, "category"),
            company_name: required(&mut fields, "company_name"),
            job_role: required(&mut fields, "job_role"),
            website_link: optional(&mut fields, "website_link"),
            state: required(&mut fields, "state"),
            city: required(&mut fields, "city"),
            experience: optional(&mut fields, "experience"),
            qualification: required(&mut fields, "qualification"),
            batch: optional(&mut fields, "batch"),
            salary_package: optional(&mut fields, "salary_package"),
            job_description: required(&mut fields, "job_description"),
            key_responsibility,
            about_company: optional(&mut fields, "about_company"),
            selection_process: optional(&mut fields, "selection_process"),
        }
    }

    pub fn into_new_job(self) -> Result<NewJob> {
        self.validate().map_err(|e| bad_request("ERR-JOB-001", e))?;
        Ok(NewJob {
            category: self.category.parse()?,
            company_name: self.company_name,
            job_role: self.job_role,
            website_link: self.website_link,
            state: self.state,
            city: self.city,
            experience: self.experience,
            qualification: self.qualification,
            batch: self.batch,
            salary_package: self.salary_package,
            job_description: self.job_description,
            key_responsibility: self.key_responsibility,
            about_company: self.about_company,
            selection_process: self.selection_process,
        })
    }
}

pub struct JobSubmission {
    pub input: JobInput,
    pub image: Option<UploadedImage>,
    pub remove_image: bool,
}

pub async fn read_submission(mut multipart: Multipart, max_image_bytes: usize) -> Result<JobSubmission> {
    let mut fields = HashMap::new();
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request("ERR-FORM-001", e))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request("ERR-FORM-001", e))?;
                if file_name.is_empty() || data.is_empty() {
                    tracing::debug!("empty image part ignored");
                    continue;
                }
                let upload = UploadedImage {
                    file_name,
                    data: data.to_vec(),
                };
                upload.validate(max_image_bytes)?;
                image = Some(upload);
            }
            "" => {
                let _ = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request("ERR-FORM-001", e))?;
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| bad_request("ERR-FORM-001", e))?;
                fields.insert(field_name, value);
            }
        }
    }
    let remove_image = fields
        .remove("remove_image")
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "on"))
        .unwrap_or(false);
    Ok(JobSubmission {
        input: JobInput::from_fields(fields),
        image,
        remove_image,
    })
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

#[derive(Deserialize, Debug)]
pub struct ListQuery {
    #[serde(rename = "currentPage", alias = "page", default = "default_page")]
    pub current_page: u32,
    #[serde(rename = "pageSize", alias = "page_size", default = "default_page_size")]
    pub page_size: u32,
    pub search: Option<String>,
}

async fn page_of(state: &AppState, category: Option<Category>, query: ListQuery) -> Result<JobPage> {
    let page = PageRequest::new(query.current_page, query.page_size)?;
    let filter = JobFilter {
        category,
        search: query.search,
    };
    let mut tx = state.db_pool.begin_txn().await?;
    let (rows, total_count) = JobSelector::new(&mut tx).list(&filter, page).await?;
    Ok(JobPage {
        jobs: rows
            .into_iter()
            .map(|job| JobResponse::new(job, &state.base_url))
            .collect(),
        total_count,
    })
}

pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<Json<JobPage>> {
    Ok(Json(page_of(&state, None, query).await?))
}

pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<JobPage>> {
    let category: Category = category.parse()?;
    Ok(Json(page_of(&state, Some(category), query).await?))
}

pub async fn top(State(state): State<AppState>) -> Result<Json<TopJobs>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let mut top = TopJobs::new();
    for category in Category::ALL {
        let rows = JobSelector::new(&mut tx)
            .latest_by_category(category, TOP_JOBS_PER_CATEGORY)
            .await?;
        top.insert(
            category.key(),
            rows.into_iter()
                .map(|job| JobResponse::new(job, &state.base_url))
                .collect(),
        );
    }
    Ok(Json(top))
}

pub async fn retrieve(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<JobResponse>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let job = JobSelector::new(&mut tx)
        .get_by_id(id)
        .await?
        .ok_or_else(|| not_found("ERR-JOB-002"))?;
    Ok(Json(JobResponse::new(job, &state.base_url)))
}

pub async fn create(State(state): State<AppState>, multipart: Multipart) -> Result<Json<JobResponse>> {
    let submission = read_submission(multipart, state.max_image_bytes).await?;
    let job = submission.input.into_new_job()?;
    let image = match submission.image {
        Some(upload) => Some(state.images.put(&job.company_name, upload).await?),
        None => None,
    };

    let stored = async {
        let mut tx = state.db_pool.begin_write_txn().await?;
        let row = JobMutator::new(&mut tx)
            .create(&job, image.as_deref(), Utc::now())
            .await?;
        tx.commit().await?;
        Ok::<_, StandardError>(row)
    }
    .await;
    let created = match stored {
        Ok(row) => row,
        Err(e) => {
            if let Some(key) = &image {
                state.images.discard(key).await;
            }
            return Err(e);
        }
    };
    tracing::info!("posted job {} ({} at {})", created.id, &created.job_role, &created.company_name);
    Ok(Json(JobResponse::new(created, &state.base_url)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<JobResponse>> {
    let submission = read_submission(multipart, state.max_image_bytes).await?;
    let job = submission.input.into_new_job()?;
    let remove_image = submission.remove_image;
    let uploaded = match submission.image {
        Some(upload) => Some(state.images.put(&job.company_name, upload).await?),
        None => None,
    };

    let stored = async {
        let mut tx = state.db_pool.begin_write_txn().await?;
        let previous = JobSelector::new(&mut tx)
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found("ERR-JOB-002"))?
            .image;
        let image = if uploaded.is_some() {
            uploaded.clone()
        } else if remove_image {
            None
        } else {
            previous.clone()
        };
        let row = JobMutator::new(&mut tx)
            .update(id, &job, image.as_deref())
            .await?
            .ok_or_else(|| not_found("ERR-JOB-002"))?;
        tx.commit().await?;
        Ok::<_, StandardError>((row, previous))
    }
    .await;
    let (updated, previous) = match stored {
        Ok(stored) => stored,
        Err(e) => {
            if let Some(key) = &uploaded {
                state.images.discard(key).await;
            }
            return Err(e);
        }
    };
    if let Some(old) = previous.as_deref() {
        if updated.image.as_deref() != Some(old) {
            state.images.discard(old).await;
        }
    }
    tracing::info!("updated job {}", updated.id);
    Ok(Json(JobResponse::new(updated, &state.base_url)))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<JobResponse>> {
    let mut tx = state.db_pool.begin_write_txn().await?;
    let removed = JobMutator::new(&mut tx)
        .delete(id)
        .await?
        .ok_or_else(|| not_found("ERR-JOB-002"))?;
    tx.commit().await?;
    if let Some(key) = removed.image.as_deref() {
        state.images.discard(key).await;
    }
    tracing::info!("deleted job {}", removed.id);
    Ok(Json(JobResponse::new(removed, &state.base_url)))
}
