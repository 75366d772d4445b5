use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Page;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub total: Option<u64>,
}

impl Meta {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            page_size: None,
            total: None,
        }
    }

    pub fn for_page<T>(page: &Page<T>) -> Self {
        Self::new(page.page, page.page_size, page.total)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
