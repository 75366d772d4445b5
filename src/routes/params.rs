//! Query strings accepted by list routes. Fields stay flat: nested
//! `#[serde(flatten)]` breaks numeric parsing in `Query`.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    dto::products::{CategoryRequest, DealTypeRequest, SearchProductsRequest},
    error::AppError,
    store::PageRequest,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Text matched against name and description
    pub q: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl TryFrom<SearchQuery> for SearchProductsRequest {
    type Error = AppError;

    fn try_from(query: SearchQuery) -> Result<Self, Self::Error> {
        Ok(SearchProductsRequest {
            query: required(query.q, "search query is required")?,
            page: PageRequest {
                page: query.page,
                page_size: query.page_size,
            },
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    pub category: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl TryFrom<CategoryQuery> for CategoryRequest {
    type Error = AppError;

    fn try_from(query: CategoryQuery) -> Result<Self, Self::Error> {
        Ok(CategoryRequest {
            category: required(query.category, "category is required")?,
            page: PageRequest {
                page: query.page,
                page_size: query.page_size,
            },
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DealTypeQuery {
    pub deal_type: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl TryFrom<DealTypeQuery> for DealTypeRequest {
    type Error = AppError;

    fn try_from(query: DealTypeQuery) -> Result<Self, Self::Error> {
        Ok(DealTypeRequest {
            deal_type: required(query.deal_type, "deal_type is required")?,
            page: PageRequest {
                page: query.page,
                page_size: query.page_size,
            },
        })
    }
}

fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(message.into()))
}
