use askama::Template;

#[derive(Template)]
#[template(path = "cms.html")]
pub struct Cms<'a> {
    pub service_name: &'a str,
    pub categories: Vec<&'static str>,
    pub experience_levels: Vec<&'static str>,
    pub page_size: u32,
}

#[derive(Template)]
#[template(path = "add_job.html")]
pub struct AddJob<'a> {
    pub service_name: &'a str,
    pub categories: Vec<&'static str>,
    pub experience_levels: Vec<&'static str>,
}
