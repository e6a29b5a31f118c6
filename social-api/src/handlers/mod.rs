pub mod accounts;
pub mod comments;
pub mod notifications;
pub mod posts;

use crate::config::PaginationConfig;
use serde::Deserialize;

/// Page-number pagination query parameters shared by the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageQuery {
    /// Resolve to a (limit, offset) pair within the configured bounds.
    pub fn limit_offset(&self, cfg: &PaginationConfig) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let size = self
            .page_size
            .unwrap_or(cfg.default_page_size)
            .clamp(1, cfg.max_page_size);
        (size, (page - 1) * size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PaginationConfig {
        PaginationConfig {
            default_page_size: 10,
            max_page_size: 100,
        }
    }

    #[test]
    fn test_defaults_to_first_page() {
        let q = PageQuery::default();
        assert_eq!(q.limit_offset(&cfg()), (10, 0));
    }

    #[test]
    fn test_later_pages_offset() {
        let q = PageQuery {
            page: Some(3),
            page_size: Some(20),
        };
        assert_eq!(q.limit_offset(&cfg()), (20, 40));
    }

    #[test]
    fn test_page_size_is_clamped() {
        let q = PageQuery {
            page: Some(1),
            page_size: Some(5000),
        };
        assert_eq!(q.limit_offset(&cfg()), (100, 0));

        let q = PageQuery {
            page: Some(0),
            page_size: Some(0),
        };
        assert_eq!(q.limit_offset(&cfg()), (1, 0));
    }
}
