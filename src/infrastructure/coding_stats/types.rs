//! Wakapi and WakaTime stats payloads
//!
//! Both upstreams share the WakaTime `stats` response shape. Wakapi payloads
//! are checked field by field; WakaTime payloads only need a `data` object and
//! every language entry is coerced with fallbacks.

use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Field, FieldType, LanguageShare, Schema};

pub static WAKAPI_SCHEMA: Lazy<Schema<StatsResponse<WakapiLanguage>>> = Lazy::new(|| {
    let language = FieldType::Object(vec![
        Field::required("name", FieldType::String),
        Field::required("percent", FieldType::Number),
        Field::required("text", FieldType::String),
        Field::required("total_seconds", FieldType::Number),
        Field::required("digital", FieldType::String),
        Field::required("hours", FieldType::Number),
        Field::required("minutes", FieldType::Number),
        Field::required("seconds", FieldType::Number),
    ]);

    Schema::new(
        "wakapi.stats",
        vec![Field::required(
            "data",
            FieldType::Object(vec![
                Field::required("languages", FieldType::array_of(language)),
                Field::required("human_readable_total", FieldType::String),
                Field::optional(
                    "human_readable_total_including_other_language",
                    FieldType::String,
                ),
            ]),
        )],
    )
});

pub static WAKATIME_SCHEMA: Lazy<Schema<StatsResponse<Value>>> = Lazy::new(|| {
    Schema::new(
        "wakatime.stats",
        vec![Field::required("data", FieldType::Object(Vec::new()))],
    )
});

#[derive(Debug, Deserialize)]
pub struct StatsResponse<L> {
    pub data: StatsData<L>,
}

#[derive(Debug, Deserialize)]
pub struct StatsData<L> {
    #[serde(default = "Vec::new")]
    pub languages: Vec<L>,
    #[serde(default)]
    pub human_readable_total: Option<Value>,
    #[serde(default)]
    pub human_readable_total_including_other_language: Option<Value>,
}

impl<L> StatsData<L> {
    fn total(value: &Option<Value>) -> Option<String> {
        value
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn readable_total(&self) -> Option<String> {
        Self::total(&self.human_readable_total)
    }

    pub fn readable_total_including_other(&self) -> Option<String> {
        Self::total(&self.human_readable_total_including_other_language)
    }
}

#[derive(Debug, Deserialize)]
pub struct WakapiLanguage {
    pub name: String,
    pub percent: f64,
    pub text: String,
}

impl From<WakapiLanguage> for LanguageShare {
    fn from(language: WakapiLanguage) -> Self {
        Self {
            name: language.name,
            percent: language.percent,
            total_time_text: language.text,
        }
    }
}

fn loose_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerces one loosely typed language entry
pub fn lenient_language(value: &Value) -> LanguageShare {
    let percent = value
        .get("percent")
        .and_then(Value::as_f64)
        .filter(|p| p.is_finite())
        .unwrap_or(0.0);

    let name = loose_string(value.get("name")).unwrap_or_else(|| "Unknown".to_string());

    let total_time_text = loose_string(value.get("text"))
        .or_else(|| loose_string(value.get("digital")))
        .unwrap_or_else(|| format!("{}%", percent));

    LanguageShare {
        name,
        percent,
        total_time_text,
    }
}
