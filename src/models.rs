use serde::{Deserialize, Serialize};

/// Spreadsheet header row, in column order.
pub const COLUMNS: [&str; 9] = [
    "Вакансия",
    "Уровень",
    "Работодатель",
    "Город",
    "Минимальная зарплата",
    "Максимальная зарплата",
    "Удаленно",
    "Гибридно",
    "Ссылка",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualificationLevel {
    Junior,
    Middle,
    Senior,
    #[default]
    #[serde(rename = "Не указано")]
    NotSpecified,
}

impl QualificationLevel {
    pub const ALL: [Self; 4] = [Self::Junior, Self::Middle, Self::Senior, Self::NotSpecified];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::Middle => "Middle",
            Self::Senior => "Senior",
            Self::NotSpecified => "Не указано",
        }
    }
}

/// One vacancy scraped from its detail page.
///
/// Field order matches [`COLUMNS`]; the csv writer relies on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "Вакансия")]
    pub title: String,
    #[serde(rename = "Уровень")]
    pub qualification_level: QualificationLevel,
    #[serde(rename = "Работодатель")]
    pub employer: String,
    #[serde(rename = "Город")]
    pub city: Option<String>,
    #[serde(rename = "Минимальная зарплата")]
    pub wage_min: Option<u64>,
    #[serde(rename = "Максимальная зарплата")]
    pub wage_max: Option<u64>,
    #[serde(rename = "Удаленно")]
    pub remote_possible: bool,
    #[serde(rename = "Гибридно")]
    pub hybrid_possible: bool,
    #[serde(rename = "Ссылка")]
    pub url: String,
}

impl Listing {
    pub fn new(title: String, employer: String, url: String) -> Self {
        Self {
            title,
            employer,
            url,
            ..Default::default()
        }
    }
}
