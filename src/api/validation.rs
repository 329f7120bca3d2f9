use super::ApiError;
use super::types::ListParams;
use crate::config::CatalogConfig;
use crate::pagination::PageRequest;

pub fn validate_page(page: i64) -> Result<u64, ApiError> {
    u64::try_from(page)
        .ok()
        .filter(|p| *p >= 1)
        .ok_or_else(|| ApiError::invalid_input(format!("Invalid page: {page}. Must be >= 1")))
}

pub fn validate_per_page(per_page: i64, max: u64) -> Result<u64, ApiError> {
    u64::try_from(per_page)
        .ok()
        .filter(|p| (1..=max).contains(p))
        .ok_or_else(|| {
            ApiError::invalid_input(format!(
                "Invalid per_page: {per_page}. Must be between 1 and {max}"
            ))
        })
}

/// Applies the catalog defaults to missing query parameters.
pub fn page_request(params: &ListParams, catalog: &CatalogConfig) -> Result<PageRequest, ApiError> {
    let page = params.page.map_or(Ok(1), validate_page)?;
    let per_page = params.per_page.map_or(Ok(catalog.default_per_page), |pp| {
        validate_per_page(pp, catalog.max_per_page)
    })?;

    Ok(PageRequest::new(page, per_page))
}
