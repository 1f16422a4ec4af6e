//! Data Transfer Objects for REST request/response serialization.
//!
//! Every read and write answers with a [`DataResponse`] that names where
//! the data came from, so clients can flag offline data.

pub mod calendar_dto;
pub mod common_dto;
pub mod notice_dto;

pub use calendar_dto::*;
pub use common_dto::*;
pub use notice_dto::*;
