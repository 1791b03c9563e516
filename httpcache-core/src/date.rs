//! HTTP date parsing.
//!
//! Only the fixed calendar format used by HTTP date headers is accepted:
//!
//! ```text
//! Sun, 06 Nov 1994 08:49:37 GMT
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use http::HeaderMap;

use crate::DateError;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parses an HTTP date header value.
///
/// # Examples
///
/// ```
/// use httpcache_core::parse_http_date;
///
/// let date = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
/// assert_eq!(date.timestamp(), 784111777);
///
/// assert!(parse_http_date("1994-11-06T08:49:37Z").is_err());
/// ```
pub fn parse_http_date(value: &str) -> Result<DateTime<Utc>, DateError> {
    NaiveDateTime::parse_from_str(value.trim(), HTTP_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| DateError::Malformed(value.to_owned()))
}

/// Formats a timestamp in the fixed HTTP date format.
pub fn format_http_date(date: DateTime<Utc>) -> String {
    date.format(HTTP_DATE_FORMAT).to_string()
}

/// Reads and parses the header `name`, distinguishing a missing header from
/// a malformed one.
pub(crate) fn header_date(
    headers: &HeaderMap,
    name: http::header::HeaderName,
) -> Result<DateTime<Utc>, DateError> {
    let raw = headers.get(name).ok_or(DateError::Missing)?;
    let value = raw.to_str().map_err(|_| {
        DateError::Malformed(String::from_utf8_lossy(raw.as_bytes()).into_owned())
    })?;
    if value.is_empty() {
        return Err(DateError::Missing);
    }
    parse_http_date(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_then_parse_is_stable() {
        let date = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 1).unwrap();
        let formatted = format_http_date(date);
        assert_eq!(formatted, "Thu, 29 Feb 2024 23:59:01 GMT");
        assert_eq!(parse_http_date(&formatted).unwrap(), date);
    }

    #[test]
    fn test_rejects_other_formats() {
        for value in [
            "Sunday, 06-Nov-94 08:49:37 GMT",
            "Sun Nov  6 08:49:37 1994",
            "Sun, 06 Nov 1994 08:49:37 +0000",
            "",
        ] {
            assert_eq!(
                parse_http_date(value),
                Err(DateError::Malformed(value.to_owned())),
                "{value:?} must be rejected"
            );
        }
    }

    #[test]
    fn test_missing_header_is_distinct() {
        let headers = HeaderMap::new();
        assert_eq!(
            header_date(&headers, http::header::DATE),
            Err(DateError::Missing)
        );
    }
}
