//! Accept header negotiation and the CSV output format

use super::dto::CompanyDto;
use super::error::Problem;
use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const JSON_MEDIA_TYPE: &str = "application/json";
pub const CSV_MEDIA_TYPE: &str = "text/csv";
pub const HATEOAS_MEDIA_TYPE: &str = "application/vnd.companyemployees.hateoas+json";
pub const API_ROOT_MEDIA_TYPE: &str = "application/vnd.companyemployees.apiroot+json";

/// Representation selected for a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Json,
    Csv,
    Hateoas,
}

impl MediaKind {
    fn accepts(self, media_type: &str) -> bool {
        match self {
            Self::Json => matches!(media_type, "*/*" | "application/*" | JSON_MEDIA_TYPE),
            Self::Csv => matches!(media_type, "text/*" | CSV_MEDIA_TYPE),
            Self::Hateoas => media_type == HATEOAS_MEDIA_TYPE,
        }
    }
}

/// False for an entry whose `q` weight is zero (`q=0`, `q=0.0`, ...).
/// Unparsable weights are treated as acceptable.
fn accepted_weight(entry: &str) -> bool {
    entry
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
        .filter_map(|(_, value)| value.trim().parse::<f32>().ok())
        .all(|weight| weight > 0.0)
}

/// Pick the first representation in `offered` the client accepts.
///
/// No `Accept` header selects the first offer. Entries weighted `q=0` are
/// skipped; otherwise the client's order wins.
pub fn negotiate(headers: &HeaderMap, offered: &[MediaKind]) -> Result<MediaKind, Problem> {
    let accept: Vec<String> = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter(|entry| accepted_weight(entry))
        .filter_map(|entry| entry.split(';').next())
        .map(|media| media.trim().to_ascii_lowercase())
        .filter(|media| !media.is_empty())
        .collect();

    if accept.is_empty() {
        return offered
            .first()
            .copied()
            .ok_or_else(|| Problem::new(StatusCode::NOT_ACCEPTABLE, "Not Acceptable"));
    }

    accept
        .iter()
        .find_map(|media| offered.iter().copied().find(|kind| kind.accepts(media)))
        .ok_or_else(|| {
            tracing::debug!(accept = ?accept, "no acceptable representation");
            Problem::new(StatusCode::NOT_ACCEPTABLE, "Not Acceptable").with_detail(format!(
                "None of the requested media types are supported: {}.",
                accept.join(", ")
            ))
        })
}

/// A record that can be written as one CSV line
pub trait CsvRecord {
    fn csv_line(&self) -> String;
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

impl CsvRecord for CompanyDto {
    fn csv_line(&self) -> String {
        format!("{},{},{}", self.id, quoted(&self.name), quoted(&self.full_address))
    }
}

fn csv_response<'a, T: CsvRecord + 'a>(
    status: StatusCode,
    records: impl IntoIterator<Item = &'a T>,
) -> Response {
    let body: String = records
        .into_iter()
        .map(|record| format!("{}\n", record.csv_line()))
        .collect();
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(CSV_MEDIA_TYPE))],
        body,
    )
        .into_response()
}

/// Write a list in the negotiated representation
pub fn render_list<T: Serialize + CsvRecord>(
    status: StatusCode,
    media: MediaKind,
    items: &[T],
) -> Response {
    match media {
        MediaKind::Csv => csv_response(status, items),
        _ => (status, Json(items)).into_response(),
    }
}

/// Write a single item in the negotiated representation
pub fn render_one<T: Serialize + CsvRecord>(
    status: StatusCode,
    media: MediaKind,
    item: &T,
) -> Response {
    match media {
        MediaKind::Csv => csv_response(status, std::iter::once(item)),
        _ => (status, Json(item)).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn missing_accept_defaults_to_first_offer() {
        let media = negotiate(&HeaderMap::new(), &[MediaKind::Json, MediaKind::Csv]);
        assert_eq!(media.ok(), Some(MediaKind::Json));
    }

    #[test]
    fn client_order_wins() {
        let offered = [MediaKind::Json, MediaKind::Csv];
        assert_eq!(
            negotiate(&accept("text/csv, application/json"), &offered).ok(),
            Some(MediaKind::Csv)
        );
        assert_eq!(
            negotiate(&accept("text/csv;q=0, */*"), &offered).ok(),
            Some(MediaKind::Json)
        );
    }

    #[test]
    fn zero_weight_is_refused_in_any_spelling() {
        let offered = [MediaKind::Json, MediaKind::Csv];
        for refused in ["text/csv;q=0.0, */*", "text/csv; q=0.00, */*", "text/csv;Q=0, */*"] {
            assert_eq!(
                negotiate(&accept(refused), &offered).ok(),
                Some(MediaKind::Json),
                "{refused}"
            );
        }
        assert_eq!(
            negotiate(&accept("text/csv;q=0.5, */*"), &offered).ok(),
            Some(MediaKind::Csv)
        );
    }

    #[test]
    fn unsupported_media_is_not_acceptable() {
        let problem = negotiate(&accept("application/xml"), &[MediaKind::Json])
            .expect_err("xml is not offered");
        assert_eq!(problem.status, 406);
    }

    #[test]
    fn vendor_types_are_matched_exactly() {
        let offered = [MediaKind::Json, MediaKind::Hateoas];
        assert_eq!(
            negotiate(&accept(HATEOAS_MEDIA_TYPE), &offered).ok(),
            Some(MediaKind::Hateoas)
        );
    }

    #[test]
    fn csv_line_quotes_text_fields() {
        let dto = CompanyDto {
            id: Uuid::nil(),
            name: "Say \"hi\" Ltd".to_string(),
            full_address: "1 Road USA".to_string(),
        };
        assert_eq!(
            dto.csv_line(),
            format!("{},\"Say \"\"hi\"\" Ltd\",\"1 Road USA\"", Uuid::nil())
        );
    }
}
