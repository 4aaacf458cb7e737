//! Template-based caption generation.

use bon::Builder;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::hashtags::{format_hashtags, generate_hashtags, DEFAULT_HASHTAG_COUNT};

/// Voice of a generated caption.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tone {
    Professional,
    Casual,
    Funny,
    #[default]
    Engaging,
}

impl Tone {
    /// Parse a tone name, falling back to [`Tone::Engaging`] for anything
    /// unrecognized.
    pub fn parse_lenient(value: &str) -> Self {
        value.trim().parse().unwrap_or_default()
    }

    pub fn templates(self) -> &'static [&'static str] {
        match self {
            Self::Professional => &[
                "Elevating {topic} to new heights. {hashtags}",
                "Exploring the nuances of {topic} in today's landscape. {hashtags}",
                "Sharing insights on {topic} that might change your perspective. {hashtags}",
            ],
            Self::Casual => &[
                "Just vibing with some {topic} today! {hashtags}",
                "That {topic} feeling... you know what I'm talking about 😉 {hashtags}",
                "Taking a moment to appreciate {topic} in our daily lives. {hashtags}",
            ],
            Self::Funny => &[
                "When {topic} is life but also hilarious 😂 {hashtags}",
                "Tell me you're obsessed with {topic} without telling me... I'll go first! {hashtags}",
                "If {topic} was a person, it would definitely be the life of the party! {hashtags}",
            ],
            Self::Engaging => &[
                "What's your take on {topic}? Share in the comments! {hashtags}",
                "Double tap if {topic} makes your day better! {hashtags}",
                "Question for you: How has {topic} impacted your journey? {hashtags}",
            ],
        }
    }
}

/// Inputs for [`generate_caption`].
///
/// # Example
/// ```
/// use instacrew::content::caption::{generate_caption, CaptionRequest, Tone};
///
/// let request = CaptionRequest::builder()
///     .topic("street food")
///     .tone(Tone::Casual)
///     .hashtags_count(3)
///     .build();
/// let caption = generate_caption(&request);
/// assert!(caption.contains("street food"));
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct CaptionRequest {
    #[builder(into)]
    pub topic: String,
    #[builder(into)]
    pub image_description: Option<String>,
    #[builder(default)]
    pub tone: Tone,
    #[builder(default = DEFAULT_HASHTAG_COUNT)]
    pub hashtags_count: usize,
}

/// Generate a caption using the thread-local RNG to pick a template.
pub fn generate_caption(request: &CaptionRequest) -> String {
    generate_caption_with(request, &mut rand::thread_rng())
}

pub fn generate_caption_with<R: Rng + ?Sized>(request: &CaptionRequest, rng: &mut R) -> String {
    let templates = request.tone.templates();
    let template = templates.choose(rng).copied().unwrap_or(templates[0]);
    let hashtags = format_hashtags(&generate_hashtags(&request.topic, request.hashtags_count));

    let caption = template
        .replace("{topic}", &request.topic)
        .replace("{hashtags}", &hashtags);
    let caption = caption.trim_end();

    match request
        .image_description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        Some(description) => format!("{caption}\n\n📸 {description}"),
        None => caption.to_string(),
    }
}
