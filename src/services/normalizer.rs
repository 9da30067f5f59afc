//! Turns raw job-source output into validated postings.
//!
//! Extraction (free text to a list of records) and field defaulting are
//! separate steps. Defaults for every text field live in [`FIELD_RULES`].

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value as JsonValue};

use super::job_source::RawJobResponse;
use crate::models::job_posting::NewJobPosting;

pub const MAX_POSTINGS: usize = 20;
pub const NOT_SPECIFIED: &str = "Not specified";
pub const POSTED_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingField {
    Title,
    Company,
    Location,
    Description,
    Url,
    ApplicationUrl,
    SalaryRange,
    JobType,
    ExperienceLevel,
}

pub struct FieldRule {
    pub field: PostingField,
    /// Record keys consulted in order; the first present value wins.
    pub sources: &'static [&'static str],
    pub default: &'static str,
}

pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule { field: PostingField::Title, sources: &["title"], default: "No title" },
    FieldRule { field: PostingField::Company, sources: &["company"], default: "Unknown company" },
    FieldRule { field: PostingField::Location, sources: &["location"], default: "Unknown location" },
    FieldRule { field: PostingField::Description, sources: &["description"], default: "No description" },
    FieldRule { field: PostingField::Url, sources: &["url", "application_url"], default: "#" },
    FieldRule { field: PostingField::ApplicationUrl, sources: &["application_url", "url"], default: "#" },
    FieldRule { field: PostingField::SalaryRange, sources: &["salary_range"], default: NOT_SPECIFIED },
    FieldRule { field: PostingField::JobType, sources: &["job_type"], default: NOT_SPECIFIED },
    FieldRule { field: PostingField::ExperienceLevel, sources: &["experience_level"], default: NOT_SPECIFIED },
];

pub fn default_posted_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("response JSON is not a list")]
    NotAList,
}

/// Result of normalizing one source response. An empty `Postings` means the
/// source genuinely returned nothing; `Unparseable` means its output could not
/// be read at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Postings(Vec<NewJobPosting>),
    Unparseable(ParseFailure),
}

impl Normalized {
    pub fn into_postings(self) -> Vec<NewJobPosting> {
        match self {
            Normalized::Postings(postings) => postings,
            Normalized::Unparseable(_) => Vec::new(),
        }
    }
}

fn fenced_json_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```json(.*?)```").expect("valid fenced block regex"))
}

/// Locates the first `[` and the `]` that closes it, skipping brackets inside
/// JSON string literals.
fn find_array_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Picks the span of free text that should hold the JSON list.
pub fn extract_json_span(text: &str) -> &str {
    if let Some(inner) = fenced_json_re().captures(text).and_then(|c| c.get(1)) {
        return inner.as_str().trim();
    }

    let trimmed = text.trim();
    if trimmed.starts_with('[') {
        return trimmed;
    }
    find_array_span(text).unwrap_or(trimmed)
}

/// Converts a raw response into a list of records.
pub fn extract_records(raw: RawJobResponse) -> Result<Vec<JsonValue>, ParseFailure> {
    match raw {
        RawJobResponse::StructuredList(records) => Ok(records),
        RawJobResponse::FreeText(text) => {
            let span = extract_json_span(&text);
            match serde_json::from_str::<JsonValue>(span) {
                Ok(JsonValue::Array(records)) => Ok(records),
                Ok(_) => Err(ParseFailure::NotAList),
                Err(e) => Err(ParseFailure::InvalidJson(e.to_string())),
            }
        }
    }
}

fn field_text(record: &Map<String, JsonValue>, key: &str) -> Option<String> {
    match record.get(key)? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn resolve(record: &Map<String, JsonValue>, rule: &FieldRule) -> String {
    rule.sources
        .iter()
        .find_map(|key| field_text(record, key))
        .unwrap_or_else(|| rule.default.to_string())
}

fn posted_date(record: &Map<String, JsonValue>, today: NaiveDate) -> NaiveDate {
    match field_text(record, "posted_date") {
        None => default_posted_date(),
        Some(raw) => NaiveDate::parse_from_str(&raw, POSTED_DATE_FORMAT).unwrap_or(today),
    }
}

/// Applies [`FIELD_RULES`] to one record. Returns `None` for non-object
/// records.
pub fn posting_from_record(record: &JsonValue, today: NaiveDate) -> Option<NewJobPosting> {
    let object = record.as_object()?;
    let mut posting = NewJobPosting {
        title: String::new(),
        company: String::new(),
        location: String::new(),
        description: String::new(),
        url: String::new(),
        application_url: String::new(),
        salary_range: String::new(),
        job_type: String::new(),
        experience_level: String::new(),
        posted_date: posted_date(object, today),
    };

    for rule in FIELD_RULES {
        let value = resolve(object, rule);
        let slot = match rule.field {
            PostingField::Title => &mut posting.title,
            PostingField::Company => &mut posting.company,
            PostingField::Location => &mut posting.location,
            PostingField::Description => &mut posting.description,
            PostingField::Url => &mut posting.url,
            PostingField::ApplicationUrl => &mut posting.application_url,
            PostingField::SalaryRange => &mut posting.salary_range,
            PostingField::JobType => &mut posting.job_type,
            PostingField::ExperienceLevel => &mut posting.experience_level,
        };
        *slot = value;
    }

    Some(posting)
}

/// Normalizes a raw response into at most [`MAX_POSTINGS`] postings, keeping
/// source order. `today` is used for dates that are present but unparseable.
pub fn normalize(raw: RawJobResponse, today: NaiveDate) -> Normalized {
    let records = match extract_records(raw) {
        Ok(records) => records,
        Err(failure) => {
            tracing::warn!(reason = %failure, "Could not parse job source response");
            return Normalized::Unparseable(failure);
        }
    };

    let total = records.len();
    let postings: Vec<NewJobPosting> = records
        .iter()
        .filter_map(|r| posting_from_record(r, today))
        .take(MAX_POSTINGS)
        .collect();

    tracing::debug!(records = total, kept = postings.len(), "Normalized job source response");
    Normalized::Postings(postings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn full_record(i: usize) -> JsonValue {
        json!({
            "title": format!("Job {i}"),
            "company": "Acme",
            "location": "Remote",
            "description": "Build things",
            "url": format!("https://acme.example/jobs/{i}"),
            "application_url": format!("https://acme.example/apply/{i}"),
            "salary_range": "$100k",
            "job_type": "Full-time",
            "experience_level": "Senior",
            "posted_date": "2024-05-06"
        })
    }

    #[test]
    fn parses_fenced_json_block() {
        let text = format!(
            "Here are the jobs:\n```json\n{}\n```\nGood luck!",
            JsonValue::Array(vec![full_record(1), full_record(2)])
        );
        let postings = normalize(RawJobResponse::FreeText(text), today()).into_postings();

        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].title, "Job 1");
        assert_eq!(postings[1].application_url, "https://acme.example/apply/2");
        assert_eq!(postings[0].posted_date, NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
    }

    #[test]
    fn finds_array_embedded_in_prose() {
        let text = r#"Sure! [{"title": "Analyst [remote]", "company": "X"}] Let me know if you need more."#;
        let postings = normalize(RawJobResponse::FreeText(text.into()), today()).into_postings();

        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "Analyst [remote]");
        assert_eq!(postings[0].company, "X");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let raw = RawJobResponse::StructuredList(vec![json!({})]);
        let postings = normalize(raw, today()).into_postings();
        let p = &postings[0];

        assert_eq!(p.title, "No title");
        assert_eq!(p.company, "Unknown company");
        assert_eq!(p.location, "Unknown location");
        assert_eq!(p.description, "No description");
        assert_eq!(p.url, "#");
        assert_eq!(p.application_url, "#");
        assert_eq!(p.salary_range, NOT_SPECIFIED);
        assert_eq!(p.job_type, NOT_SPECIFIED);
        assert_eq!(p.experience_level, NOT_SPECIFIED);
        assert_eq!(p.posted_date, default_posted_date());
    }

    #[test]
    fn urls_fall_back_to_each_other() {
        let raw = RawJobResponse::StructuredList(vec![
            json!({"url": "https://a.example/job"}),
            json!({"application_url": "https://b.example/apply"}),
        ]);
        let postings = normalize(raw, today()).into_postings();

        assert_eq!(postings[0].application_url, "https://a.example/job");
        assert_eq!(postings[0].url, "https://a.example/job");
        assert_eq!(postings[1].url, "https://b.example/apply");
        assert_eq!(postings[1].application_url, "https://b.example/apply");
    }

    #[test]
    fn null_and_blank_values_count_as_absent() {
        let raw = RawJobResponse::StructuredList(vec![json!({
            "title": null,
            "company": "   ",
            "salary_range": 120000
        })]);
        let p = normalize(raw, today()).into_postings().remove(0);

        assert_eq!(p.title, "No title");
        assert_eq!(p.company, "Unknown company");
        assert_eq!(p.salary_range, "120000");
    }

    #[test]
    fn unparseable_date_uses_ingestion_date() {
        let raw = RawJobResponse::StructuredList(vec![json!({"posted_date": "last Tuesday"})]);
        let p = normalize(raw, today()).into_postings().remove(0);
        assert_eq!(p.posted_date, today());
    }

    #[test]
    fn caps_at_twenty_preserving_order() {
        let records: Vec<JsonValue> = (0..25).map(full_record).collect();
        let postings = normalize(RawJobResponse::StructuredList(records), today()).into_postings();

        assert_eq!(postings.len(), MAX_POSTINGS);
        let titles: Vec<String> = postings.iter().map(|p| p.title.clone()).collect();
        let expected: Vec<String> = (0..20).map(|i| format!("Job {i}")).collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn non_object_elements_are_dropped() {
        let text = r#"[1, "two", {"title": "Kept"}, null, ["nested"]]"#;
        let postings = normalize(RawJobResponse::FreeText(text.into()), today()).into_postings();

        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "Kept");
    }

    #[test]
    fn plain_text_is_unparseable() {
        let result = normalize(RawJobResponse::FreeText("no jobs available".into()), today());
        assert!(matches!(result, Normalized::Unparseable(ParseFailure::InvalidJson(_))));
        assert!(result.into_postings().is_empty());
    }

    #[test]
    fn json_object_is_not_a_list() {
        let result = normalize(RawJobResponse::FreeText(r#"{"title": "Solo"}"#.into()), today());
        assert_eq!(result, Normalized::Unparseable(ParseFailure::NotAList));
    }

    #[test]
    fn empty_list_is_success_not_failure() {
        let result = normalize(RawJobResponse::FreeText("[]".into()), today());
        assert_eq!(result, Normalized::Postings(vec![]));
    }

    #[test]
    fn every_field_is_populated() {
        let records: Vec<JsonValue> = vec![
            json!({"title": "A"}),
            json!({"company": "B", "url": "https://b"}),
            full_record(3),
        ];
        for p in normalize(RawJobResponse::StructuredList(records), today()).into_postings() {
            for value in [
                &p.title, &p.company, &p.location, &p.description, &p.url,
                &p.application_url, &p.salary_range, &p.job_type, &p.experience_level,
            ] {
                assert!(!value.is_empty());
            }
        }
    }
}
