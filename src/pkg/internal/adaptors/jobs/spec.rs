use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use standard_error::StandardError;

use crate::prelude::{Result, bad_request};

pub const JOB_COLUMNS: &str = "id, category, company_name, job_role, website_link, state, city, \
    experience, qualification, batch, salary_package, job_description, key_responsibility, \
    about_company, selection_process, image, posted_on";

pub const MAX_PAGE_SIZE: u32 = 100;
pub const TOP_JOBS_PER_CATEGORY: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Fresher,
    Internship,
    Remote,
    #[serde(rename = "Part_time")]
    PartTime,
    Experienced,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Fresher,
        Category::Internship,
        Category::Remote,
        Category::PartTime,
        Category::Experienced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fresher => "Fresher",
            Category::Internship => "Internship",
            Category::Remote => "Remote",
            Category::PartTime => "Part_time",
            Category::Experienced => "Experienced",
        }
    }

    /// Key used for this category in the top jobs listing.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Fresher => "fresher",
            Category::Internship => "internship",
            Category::Remote => "remote",
            Category::PartTime => "part_time",
            Category::Experienced => "experienced",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = StandardError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "fresher" => Ok(Category::Fresher),
            "internship" => Ok(Category::Internship),
            "remote" => Ok(Category::Remote),
            "part_time" | "parttime" => Ok(Category::PartTime),
            "experienced" => Ok(Category::Experienced),
            _ => Err(bad_request("ERR-JOB-003", s)),
        }
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
pub struct JobEntry {
    pub id: i64,
    pub category: String,
    pub company_name: String,
    pub job_role: String,
    pub website_link: Option<String>,
    pub state: String,
    pub city: String,
    pub experience: Option<String>,
    pub qualification: String,
    pub batch: Option<String>,
    pub salary_package: Option<String>,
    pub job_description: String,
    pub key_responsibility: Option<String>,
    pub about_company: Option<String>,
    pub selection_process: Option<String>,
    pub image: Option<String>,
    pub posted_on: DateTime<Utc>,
}

/// Validated field set of a posting, as written by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub category: Category,
    pub company_name: String,
    pub job_role: String,
    pub website_link: Option<String>,
    pub state: String,
    pub city: String,
    pub experience: Option<String>,
    pub qualification: String,
    pub batch: Option<String>,
    pub salary_package: Option<String>,
    pub job_description: String,
    pub key_responsibility: Option<String>,
    pub about_company: Option<String>,
    pub selection_process: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct JobResponse {
    #[serde(flatten)]
    pub job: JobEntry,
    pub image_url: Option<String>,
}

impl JobResponse {
    pub fn new(job: JobEntry, base_url: &str) -> Self {
        let image_url = job
            .image
            .as_ref()
            .map(|key| format!("{}/images/{}", base_url.trim_end_matches('/'), key));
        JobResponse { job, image_url }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Result<Self> {
        if page == 0 {
            return Err(bad_request("ERR-JOB-004", "currentPage starts at 1"));
        }
        if page_size == 0 {
            return Err(bad_request("ERR-JOB-004", "pageSize must be at least 1"));
        }
        Ok(PageRequest {
            page,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub category: Option<Category>,
    pub search: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct JobPage {
    pub jobs: Vec<JobResponse>,
    #[serde(rename = "totalCount")]
    pub total_count: i64,
}

pub type TopJobs = BTreeMap<&'static str, Vec<JobResponse>>;
