use super::types::PageRequest;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Normalise caller-supplied limit/offset. A missing or zero limit falls
/// back to `default_limit`; limits are capped at [`MAX_PAGE_SIZE`].
pub fn validate_pagination(limit: Option<u64>, offset: Option<u64>, default_limit: u64) -> PageRequest {
    let limit = match limit {
        Some(0) | None => default_limit,
        Some(l) => l,
    }
    .clamp(1, MAX_PAGE_SIZE);
    PageRequest {
        limit,
        offset: offset.unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_limit_uses_default() {
        let page = validate_pagination(None, None, DEFAULT_PAGE_SIZE);
        assert_eq!(page, PageRequest { limit: 10, offset: 0 });
    }

    #[test]
    fn zero_limit_uses_default() {
        let page = validate_pagination(Some(0), Some(20), 25);
        assert_eq!(page, PageRequest { limit: 25, offset: 20 });
    }

    #[test]
    fn limit_is_capped() {
        let page = validate_pagination(Some(5000), None, DEFAULT_PAGE_SIZE);
        assert_eq!(page.limit, MAX_PAGE_SIZE);
    }
}
