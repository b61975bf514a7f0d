//! Storage services: the provider-agnostic seam and its S3 implementation.

pub mod s3;
pub mod storage;
