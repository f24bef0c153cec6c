use serde::Deserialize;
use utoipa::IntoParams;

pub const DEFAULT_LIMIT: u32 = 20;
pub const DEFAULT_PAGE_SIZE: u32 = 30;
pub const MAX_BATCH: u32 = 500;

/// Raw query string of `GET /api/datos`.
///
/// Kept as strings so that non-numeric values fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Return the N most recent readings (1..=500, default 20). Takes precedence over paging.
    pub limit: Option<String>,
    /// 1-based page number (default 1).
    pub page: Option<String>,
    /// Readings per page (1..=500, default 30).
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// The `limit` newest readings; the response total is the batch size.
    Recent { limit: u32 },
    /// One page of the newest-first sequence; the response total is the global count.
    Paged { page: u64, page_size: u32 },
}

impl ListMode {
    /// Number of readings to skip before this batch starts.
    pub fn skip(&self) -> u64 {
        match *self {
            ListMode::Recent { .. } => 0,
            ListMode::Paged { page, page_size } => {
                page.saturating_sub(1).saturating_mul(u64::from(page_size))
            }
        }
    }
}

impl From<&ListParams> for ListMode {
    fn from(params: &ListParams) -> Self {
        if let Some(limit) = params.limit.as_deref().filter(|s| !s.is_empty()) {
            // A zero limit is treated like a missing one.
            let limit = parse_leading_int(limit)
                .filter(|n| *n != 0)
                .unwrap_or(i64::from(DEFAULT_LIMIT));
            return ListMode::Recent {
                limit: clamp_batch(limit),
            };
        }

        let page = params
            .page
            .as_deref()
            .and_then(parse_leading_int)
            .map_or(1, |p| p.max(1));
        let page_size = params
            .page_size
            .as_deref()
            .and_then(parse_leading_int)
            .unwrap_or(i64::from(DEFAULT_PAGE_SIZE));

        ListMode::Paged {
            page: page as u64,
            page_size: clamp_batch(page_size),
        }
    }
}

fn clamp_batch(n: i64) -> u32 {
    n.clamp(1, i64::from(MAX_BATCH)) as u32
}

/// Base-10 integer prefix of `raw`: leading whitespace and an optional sign are
/// allowed, anything after the digits is ignored (`"12abc"` → 12, `"7.9"` → 7).
///
/// Returns `None` when no digit follows the sign. Saturates instead of overflowing.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(b - b'0'));
    }

    seen_digit.then_some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<&str>, page: Option<&str>, page_size: Option<&str>) -> ListParams {
        ListParams {
            limit: limit.map(str::to_owned),
            page: page.map(str::to_owned),
            page_size: page_size.map(str::to_owned),
        }
    }

    fn mode(limit: Option<&str>, page: Option<&str>, page_size: Option<&str>) -> ListMode {
        ListMode::from(&params(limit, page, page_size))
    }

    #[test]
    fn leading_int_matches_integer_prefix() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  12abc"), Some(12));
        assert_eq!(parse_leading_int("7.9"), Some(7));
        assert_eq!(parse_leading_int("-5"), Some(-5));
        assert_eq!(parse_leading_int("+8"), Some(8));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn no_params_is_first_default_page() {
        assert_eq!(
            mode(None, None, None),
            ListMode::Paged { page: 1, page_size: DEFAULT_PAGE_SIZE }
        );
    }

    #[test]
    fn limit_takes_precedence_over_paging() {
        assert_eq!(
            mode(Some("5"), Some("3"), Some("10")),
            ListMode::Recent { limit: 5 }
        );
    }

    #[test]
    fn empty_limit_falls_back_to_paging() {
        assert!(matches!(mode(Some(""), None, None), ListMode::Paged { .. }));
    }

    #[test]
    fn limit_is_clamped_and_defaulted() {
        assert_eq!(mode(Some("1000"), None, None), ListMode::Recent { limit: 500 });
        assert_eq!(mode(Some("0"), None, None), ListMode::Recent { limit: 20 });
        assert_eq!(mode(Some("abc"), None, None), ListMode::Recent { limit: 20 });
        assert_eq!(mode(Some("-5"), None, None), ListMode::Recent { limit: 1 });
    }

    #[test]
    fn page_is_at_least_one() {
        assert_eq!(
            mode(None, Some("0"), None),
            ListMode::Paged { page: 1, page_size: 30 }
        );
        assert_eq!(
            mode(None, Some("-4"), None),
            ListMode::Paged { page: 1, page_size: 30 }
        );
        assert_eq!(
            mode(None, Some("x"), None),
            ListMode::Paged { page: 1, page_size: 30 }
        );
    }

    #[test]
    fn page_size_is_clamped_and_defaulted() {
        assert_eq!(
            mode(None, Some("2"), Some("900")),
            ListMode::Paged { page: 2, page_size: 500 }
        );
        assert_eq!(
            mode(None, Some("2"), Some("0")),
            ListMode::Paged { page: 2, page_size: 1 }
        );
        assert_eq!(
            mode(None, Some("2"), Some("many")),
            ListMode::Paged { page: 2, page_size: 30 }
        );
    }

    #[test]
    fn skip_is_offset_of_page_start() {
        assert_eq!(mode(None, Some("2"), Some("10")).skip(), 10);
        assert_eq!(mode(None, None, None).skip(), 0);
        assert_eq!(mode(Some("50"), None, None).skip(), 0);
    }

    #[test]
    fn skip_saturates_for_huge_pages() {
        let m = ListMode::Paged { page: u64::MAX, page_size: 500 };
        assert_eq!(m.skip(), u64::MAX);
    }
}
