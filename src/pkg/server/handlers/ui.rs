use askama::Template;
use axum::response::Html;

use crate::{
    conf::settings,
    pkg::{
        internal::adaptors::jobs::spec::Category,
        server::uispec::{AddJob, Cms},
    },
    prelude::Result,
};

pub const EXPERIENCE_LEVELS: [&str; 4] = ["Fresher", "1-3 years", "3-5 years", "5+ years"];

fn categories() -> Vec<&'static str> {
    Category::ALL.iter().map(|c| c.as_str()).collect()
}

pub async fn cms() -> Result<Html<String>> {
    let template = Cms {
        service_name: &settings.service_name,
        categories: categories(),
        experience_levels: EXPERIENCE_LEVELS.to_vec(),
        page_size: 10,
    };
    Ok(Html(template.render()?))
}

pub async fn add_job() -> Result<Html<String>> {
    let template = AddJob {
        service_name: &settings.service_name,
        categories: categories(),
        experience_levels: EXPERIENCE_LEVELS.to_vec(),
    };
    Ok(Html(template.render()?))
}
