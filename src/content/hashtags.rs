//! Keyword-based hashtag selection.

/// Hashtag count used when none is requested.
pub const DEFAULT_HASHTAG_COUNT: usize = 5;

const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "AI",
        &["artificialintelligence", "machinelearning", "deeplearning", "aitech", "futuretech"],
    ),
    (
        "technology",
        &["tech", "innovation", "digital", "geek", "programming", "coding", "developer"],
    ),
    (
        "social media",
        &["socialmedia", "digitalmarketing", "marketing", "contentcreation", "influencer"],
    ),
    (
        "business",
        &["entrepreneur", "startup", "success", "motivation", "business", "hustle"],
    ),
    (
        "lifestyle",
        &["lifestyle", "life", "instagood", "happy", "love", "beautiful", "photooftheday"],
    ),
    (
        "travel",
        &["travel", "wanderlust", "adventure", "explore", "vacation", "travelgram", "nature"],
    ),
    (
        "food",
        &["food", "foodie", "delicious", "yummy", "instafood", "foodporn", "healthyfood"],
    ),
    (
        "fitness",
        &["fitness", "workout", "gym", "fit", "health", "training", "motivation", "exercise"],
    ),
    (
        "fashion",
        &["fashion", "style", "outfit", "ootd", "streetstyle", "fashionista", "clothing"],
    ),
];

const FALLBACK_CATEGORY: &str = "lifestyle";

const GENERAL: &[&str] = &[
    "instagood",
    "photooftheday",
    "instagram",
    "follow",
    "instadaily",
    "picoftheday",
    "art",
    "photography",
];

/// Categories relevant to `topic`.
///
/// Whole category names contained in the topic win; otherwise any single
/// word of a category name counts; otherwise [`FALLBACK_CATEGORY`].
pub fn relevant_categories(topic: &str) -> Vec<&'static str> {
    let topic = topic.to_lowercase();

    let exact: Vec<&'static str> = CATEGORIES
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| topic.contains(&name.to_lowercase()))
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    let partial: Vec<&'static str> = CATEGORIES
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| {
            name.split_whitespace()
                .any(|word| topic.contains(&word.to_lowercase()))
        })
        .collect();
    if !partial.is_empty() {
        return partial;
    }

    vec![FALLBACK_CATEGORY]
}

/// Up to `count` hashtags (without `#`) for `topic`.
///
/// Returns fewer than `count` only when category, topic and general
/// hashtags together run out.
pub fn generate_hashtags(topic: &str, count: usize) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    for category in relevant_categories(topic) {
        if let Some((_, tags)) = CATEGORIES.iter().find(|(name, _)| *name == category) {
            candidates.extend(tags.iter().map(|tag| tag.to_string()));
        }
    }

    candidates.extend(
        topic
            .to_lowercase()
            .split_whitespace()
            .filter(|word| word.chars().count() > 3)
            .map(|word| word.trim_matches(|c| matches!(c, '.' | ',' | '!' | '?')).to_string())
            .filter(|word| !word.is_empty()),
    );

    let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
    for tag in candidates {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }

    for tag in GENERAL {
        if unique.len() >= count {
            break;
        }
        if !unique.iter().any(|existing| existing == tag) {
            unique.push(tag.to_string());
        }
    }

    unique.truncate(count);
    unique
}

/// `#tag` tokens joined by single spaces.
pub fn format_hashtags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ")
}
