pub mod images;
pub mod jobs;
pub mod probes;
pub mod ui;
