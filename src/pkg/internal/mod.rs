pub mod adaptors;
pub mod images;
pub mod minio;
pub mod retention;

#[cfg(test)]
pub mod testing;
