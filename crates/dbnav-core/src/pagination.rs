//! Page arithmetic shared by every dialect

use crate::{DialectError, OperationRequest, RequestField, Result};

/// A validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_size: u64,
    pub page_index: u64,
    pub offset: u64,
}

impl Pagination {
    /// Build a window, checking `page_size > 0`, `page_index >= 0` and that
    /// `page_index * page_size` does not overflow.
    ///
    /// ```
    /// use dbnav_core::Pagination;
    ///
    /// let page = Pagination::new(20, 2).unwrap();
    /// assert_eq!(page.offset, 40);
    /// assert!(Pagination::new(0, 0).is_err());
    /// ```
    pub fn new(page_size: i64, page_index: i64) -> Result<Self> {
        if page_size <= 0 {
            return Err(DialectError::invalid(
                RequestField::PageSize,
                format!("must be greater than zero, got {page_size}"),
            ));
        }
        if page_index < 0 {
            return Err(DialectError::invalid(
                RequestField::PageIndex,
                format!("must not be negative, got {page_index}"),
            ));
        }

        let page_size = page_size.unsigned_abs();
        let page_index = page_index.unsigned_abs();
        let offset = page_index
            .checked_mul(page_size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| {
                DialectError::invalid(RequestField::PageIndex, "page offset overflows")
            })?;

        Ok(Self {
            page_size,
            page_index,
            offset,
        })
    }

    /// Window for a request, falling back to `default_page_size`
    pub fn from_request(request: &OperationRequest, default_page_size: u64) -> Result<Self> {
        let page_size = match request.page_size() {
            Some(size) => size,
            None => match i64::try_from(default_page_size) {
                Ok(size) if size > 0 => size,
                Ok(_) => {
                    return Err(DialectError::Config(
                        "default_page_size must be greater than zero".to_string(),
                    ));
                }
                Err(_) => {
                    return Err(DialectError::Config(format!(
                        "default_page_size {default_page_size} is too large"
                    )));
                }
            },
        };
        Self::new(page_size, request.page_index().unwrap_or(0))
    }

    pub fn is_first_page(&self) -> bool {
        self.page_index == 0
    }

    /// `LIMIT p OFFSET o`
    pub fn limit_offset(&self) -> String {
        format!("LIMIT {} OFFSET {}", self.page_size, self.offset)
    }

    /// `OFFSET o ROWS FETCH NEXT p ROWS ONLY`
    pub fn offset_fetch(&self) -> String {
        format!(
            "OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
            self.offset, self.page_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Operation;

    #[test]
    fn test_offset_is_index_times_size() {
        let page = Pagination::new(25, 3).unwrap();
        assert_eq!(page.offset, 75);
        assert!(!page.is_first_page());
    }

    #[test]
    fn test_first_page() {
        let page = Pagination::new(10, 0).unwrap();
        assert_eq!(page.offset, 0);
        assert!(page.is_first_page());
    }

    #[test]
    fn test_rejects_non_positive_size() {
        for size in [0, -1, i64::MIN] {
            let err = Pagination::new(size, 0).unwrap_err();
            assert_eq!(err.invalid_field(), Some(RequestField::PageSize));
        }
    }

    #[test]
    fn test_rejects_negative_index() {
        let err = Pagination::new(10, -3).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::PageIndex));
    }

    #[test]
    fn test_rejects_overflow() {
        let err = Pagination::new(i64::MAX, 2).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::PageIndex));
    }

    #[test]
    fn test_largest_offset_fits() {
        let page = Pagination::new(1, i64::MAX).unwrap();
        assert_eq!(page.offset, i64::MAX as u64);
    }

    #[test]
    fn test_from_request_uses_default() {
        let request = OperationRequest::new(Operation::BuildPage).with_page_index(4);
        let page = Pagination::from_request(&request, 50).unwrap();
        assert_eq!(page.page_size, 50);
        assert_eq!(page.offset, 200);
    }

    #[test]
    fn test_zero_default_page_size_is_a_config_error() {
        let request = OperationRequest::new(Operation::BuildPage);
        let err = Pagination::from_request(&request, 0).unwrap_err();
        assert!(matches!(err, DialectError::Config(_)), "{err}");
    }

    #[test]
    fn test_clauses() {
        let page = Pagination::new(20, 2).unwrap();
        assert_eq!(page.limit_offset(), "LIMIT 20 OFFSET 40");
        assert_eq!(page.offset_fetch(), "OFFSET 40 ROWS FETCH NEXT 20 ROWS ONLY");
    }
}
