use crate::models::QualificationLevel;

/// Checked from the most senior level down; the first hit wins.
const LEVEL_KEYWORDS: [(QualificationLevel, &[&str]); 3] = [
    (QualificationLevel::Senior, &["senior", "старший", "lead", "ведущий"]),
    (QualificationLevel::Middle, &["middle", "средний"]),
    (QualificationLevel::Junior, &["junior", "младший", "стажер", "стажёр"]),
];

/// Infers the qualification level from free listing text, usually the title.
///
/// Matching is a case-insensitive substring search. Text mentioning several
/// levels ("Middle/Senior") is labelled with the most senior one, text with
/// no keyword at all is [`QualificationLevel::NotSpecified`].
pub fn classify(text: &str) -> QualificationLevel {
    let text = text.trim().to_lowercase();

    LEVEL_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(level, _)| *level)
        .unwrap_or_default()
}
