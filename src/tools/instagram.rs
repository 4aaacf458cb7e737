//! Instagram tools used by the crew.
//!
//! Each tool is built with [`FnTool::new`] and returned as `Arc<dyn Tool>`.
//! Expected failures (no token, missing image, rejected requests) are
//! reported as a [`ToolReport`] with a human-readable message rather than as
//! errors; `Err` is reserved for malformed arguments, most of which
//! [`Tool::call`] already rejects against the parameter schema.
//!
//! ```rust,no_run
//! use instacrew::config::CrewConfig;
//! use instacrew::tools::instagram::all_tools;
//!
//! let tools = all_tools(&CrewConfig::from_env());
//! assert_eq!(tools.len(), 5);
//! ```

use std::sync::Arc;

use crate::auth::{AuthError, AuthStep, ClientCredentials, InstagramAuth, RefreshOutcome};
use crate::config::CrewConfig;
use crate::content::caption::{generate_caption, CaptionRequest, Tone};
use crate::content::hashtags::DEFAULT_HASHTAG_COUNT;
use crate::content::{ContentError, PostScheduler, SubscriptionStore};
use crate::tools::tool::{FnTool, Tool};
use crate::tools::types::{ToolParameters, ToolReport};

pub const AUTH_TOOL: &str = "instagram_auth";
pub const REFRESH_TOKEN_TOOL: &str = "instagram_refresh_token";
pub const SUBSCRIPTION_TOOL: &str = "instagram_subscription";
pub const POST_TOOL: &str = "instagram_post";
pub const CAPTION_TOOL: &str = "instagram_caption";

const NOT_AUTHENTICATED: &str = "No authentication token found. Please authenticate first.";

/// Every Instagram tool, wired to the configured state directories and hosts.
pub fn all_tools(config: &CrewConfig) -> Vec<Arc<dyn Tool>> {
    let auth = Arc::new(config.instagram_auth());
    vec![
        auth_tool(auth.clone()),
        refresh_token_tool(auth.clone()),
        subscription_tool(auth.clone(), SubscriptionStore::new(config.subscriptions_path())),
        post_tool(auth, PostScheduler::new(config.scheduled_posts_path())),
        caption_tool(),
    ]
}

/// Create the `instagram_auth` tool: saves the app credentials, then either
/// returns the authorization URL or exchanges the code for a long-lived token.
pub fn auth_tool(auth: Arc<InstagramAuth>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        AUTH_TOOL,
        "Manages Instagram API authentication using OAuth: builds the authorization URL \
         or exchanges an authorization code for a long-lived access token",
        ToolParameters::object()
            .string("client_id", "Instagram app client ID", true)
            .string("client_secret", "Instagram app client secret", true)
            .string("redirect_uri", "OAuth redirect URI", true)
            .string("code", "Authorization code, if already obtained", false)
            .build(),
        move |args| {
            let auth = auth.clone();
            async move {
                let mut credentials = ClientCredentials::new(
                    args.get_str("client_id")?,
                    args.get_str("client_secret")?,
                    args.get_str("redirect_uri")?,
                );
                credentials.code = args.get_str_opt("code").map(str::to_string);

                let report = match auth.authenticate(&credentials).await {
                    Ok(AuthStep::AuthorizationRequired { url }) => ToolReport::action_required(
                        format!("Please authorize the application using this URL: {url}"),
                    ),
                    Ok(AuthStep::Authenticated { token }) => ToolReport::ok(format!(
                        "Authentication successful. Access token valid until {}",
                        token.valid_until()
                    )),
                    Err(e) => {
                        tracing::warn!(error = %e, "instagram authentication failed");
                        ToolReport::error(format!("Authentication failed: {e}"))
                    }
                };
                Ok(report.into_value())
            }
        },
    ))
}

/// Create the `instagram_refresh_token` tool: refreshes the stored token when
/// it expires within seven days.
pub fn refresh_token_tool(auth: Arc<InstagramAuth>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        REFRESH_TOKEN_TOOL,
        "Refreshes the stored Instagram access token before it expires",
        ToolParameters::empty(),
        move |_args| {
            let auth = auth.clone();
            async move {
                let report = match auth.refresh_if_needed().await {
                    Ok(RefreshOutcome::Refreshed { token }) => ToolReport::ok(format!(
                        "Access token refreshed successfully. Valid until {}",
                        token.valid_until()
                    )),
                    Ok(RefreshOutcome::StillValid { token }) => ToolReport::ok(format!(
                        "Token is still valid until {}. No refresh needed.",
                        token.valid_until()
                    )),
                    Err(AuthError::NotAuthenticated) => {
                        ToolReport::action_required("No token found. Please authenticate first.")
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "token refresh failed");
                        ToolReport::error(format!("Token refresh failed: {e}"))
                    }
                };
                Ok(report.into_value())
            }
        },
    ))
}

/// Create the `instagram_subscription` tool: records hashtags and accounts to
/// monitor.
pub fn subscription_tool(auth: Arc<InstagramAuth>, store: SubscriptionStore) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        SUBSCRIPTION_TOOL,
        "Subscribes to hashtags and accounts so their activity can be monitored",
        ToolParameters::object()
            .string_list("hashtags", "Hashtags to monitor", false)
            .string_list("users", "Usernames to monitor", false)
            .build(),
        move |args| {
            let auth = auth.clone();
            let store = store.clone();
            async move {
                if let Some(report) = authentication_problem(&auth) {
                    return Ok(report.into_value());
                }
                let hashtags = args.get_list("hashtags");
                let users = args.get_list("users");

                let report = match store.subscribe(&hashtags, &users) {
                    Ok(subscriptions) => ToolReport::ok(format!(
                        "Monitoring {} hashtags ({}) and {} accounts ({})",
                        subscriptions.hashtags.len(),
                        join_prefixed('#', &subscriptions.hashtags),
                        subscriptions.users.len(),
                        join_prefixed('@', &subscriptions.users),
                    )),
                    Err(ContentError::NothingToMonitor) => {
                        ToolReport::error("No hashtags or accounts provided to monitor.")
                    }
                    Err(e) => ToolReport::error(format!("Subscription failed: {e}")),
                };
                Ok(report.into_value())
            }
        },
    ))
}

/// Create the `instagram_post` tool: schedules a post at the given or next
/// optimal time.
pub fn post_tool(auth: Arc<InstagramAuth>, scheduler: PostScheduler) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        POST_TOOL,
        "Schedules Instagram posts at optimal times. If no time is specified, \
         the next optimal posting slot is used",
        ToolParameters::object()
            .string("caption", "Caption for the post", true)
            .string("image_path", "Path to the image file to post", true)
            .string(
                "scheduled_time",
                "Time to publish (ISO 8601, e.g. 2025-10-15T14:30:00)",
                false,
            )
            .build(),
        move |args| {
            let auth = auth.clone();
            let scheduler = scheduler.clone();
            async move {
                let caption = args.get_str("caption")?;
                let image_path = args.get_str("image_path")?;
                if let Some(report) = authentication_problem(&auth) {
                    return Ok(report.into_value());
                }

                let report = match scheduler.schedule(caption, image_path, args.get_str_opt("scheduled_time")) {
                    Ok(post) => ToolReport::ok(format!(
                        "Post successfully scheduled for {}",
                        post.scheduled_time.format("%Y-%m-%dT%H:%M:%S")
                    )),
                    Err(ContentError::ImageNotFound(path)) => ToolReport::error(format!(
                        "Error: Image file not found at {}",
                        path.display()
                    )),
                    Err(e) => ToolReport::error(format!("Post scheduling failed: {e}")),
                };
                Ok(report.into_value())
            }
        },
    ))
}

/// Create the `instagram_caption` tool: template caption with hashtags.
pub fn caption_tool() -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        CAPTION_TOOL,
        "Generates Instagram captions for a topic in a chosen tone, with relevant hashtags",
        ToolParameters::object()
            .string("topic", "Main topic or theme of the post", true)
            .string("image_description", "Description of the image being posted", false)
            .string_enum(
                "tone",
                "Desired tone of the caption",
                &["professional", "casual", "funny", "engaging"],
                false,
            )
            .integer("hashtags_count", "Number of hashtags to include", false)
            .build(),
        |args| async move {
            let request = CaptionRequest {
                topic: args.get_str("topic")?.trim().to_string(),
                image_description: args.get_str_opt("image_description").map(str::to_string),
                tone: args
                    .get_str_opt("tone")
                    .map(Tone::parse_lenient)
                    .unwrap_or_default(),
                hashtags_count: args
                    .get_usize_opt("hashtags_count")?
                    .unwrap_or(DEFAULT_HASHTAG_COUNT),
            };
            Ok(ToolReport::ok(generate_caption(&request)).into_value())
        },
    ))
}

/// A report for a missing or unreadable token, if there is one.
fn authentication_problem(auth: &InstagramAuth) -> Option<ToolReport> {
    match auth.require_token() {
        Ok(_) => None,
        Err(AuthError::NotAuthenticated) => Some(ToolReport::action_required(NOT_AUTHENTICATED)),
        Err(e) => Some(ToolReport::error(format!("Could not read access token: {e}"))),
    }
}

fn join_prefixed(prefix: char, items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("{prefix}{item}"))
        .collect::<Vec<_>>()
        .join(", ")
}
