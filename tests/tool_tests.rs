use std::fs;
use std::sync::Arc;

use chrono::{Duration, Utc};
use instacrew::auth::Token;
use instacrew::config::CrewConfig;
use instacrew::content::{PostScheduler, PostStatus, SubscriptionStore};
use instacrew::tools::instagram::{caption_tool, post_tool, subscription_tool};
use instacrew::tools::{Tool, ToolArguments, ToolReport, ToolStatus};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
    config: CrewConfig,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let config = CrewConfig::new().with_base_dir(dir.path());
        Self { dir, config }
    }

    fn authenticated() -> Self {
        let workspace = Self::new();
        workspace
            .config
            .auth_store()
            .save_token(&Token::new("token", None, Utc::now() + Duration::days(50)))
            .expect("save token");
        workspace
    }

    fn image(&self) -> String {
        let path = self.dir.path().join("post.jpg");
        fs::write(&path, b"jpeg").expect("write image");
        path.display().to_string()
    }

    fn post_tool(&self) -> Arc<dyn Tool> {
        post_tool(
            Arc::new(self.config.instagram_auth()),
            PostScheduler::new(self.config.scheduled_posts_path()),
        )
    }

    fn subscription_tool(&self) -> Arc<dyn Tool> {
        subscription_tool(
            Arc::new(self.config.instagram_auth()),
            SubscriptionStore::new(self.config.subscriptions_path()),
        )
    }
}

async fn run(tool: &Arc<dyn Tool>, args: serde_json::Value) -> ToolReport {
    let output = tool.call(&ToolArguments::new(args)).await.expect("tool call");
    ToolReport::from_value(&output)
}

#[tokio::test]
async fn post_requires_authentication() {
    let workspace = Workspace::new();
    let image = workspace.image();
    let report = run(
        &workspace.post_tool(),
        json!({"caption": "hello", "image_path": image}),
    )
    .await;
    assert_eq!(
        report,
        ToolReport::action_required("No authentication token found. Please authenticate first.")
    );
}

#[tokio::test]
async fn post_reports_missing_image() {
    let workspace = Workspace::authenticated();
    let missing = workspace.dir.path().join("missing.jpg");
    let report = run(
        &workspace.post_tool(),
        json!({"caption": "hello", "image_path": missing.display().to_string()}),
    )
    .await;
    assert_eq!(report.status, ToolStatus::Error);
    assert_eq!(
        report.message,
        format!("Error: Image file not found at {}", missing.display())
    );
    assert!(!workspace.config.scheduled_posts_path().exists());
}

#[tokio::test]
async fn post_appends_to_schedule() {
    let workspace = Workspace::authenticated();
    let image = workspace.image();
    let tool = workspace.post_tool();

    let first = run(
        &tool,
        json!({"caption": "first", "image_path": image, "scheduled_time": "2030-05-01T09:30:00"}),
    )
    .await;
    assert_eq!(
        first,
        ToolReport::ok("Post successfully scheduled for 2030-05-01T09:30:00")
    );

    let second = run(&tool, json!({"caption": "second", "image_path": image})).await;
    assert_eq!(second.status, ToolStatus::Ok);

    let posts = PostScheduler::new(workspace.config.scheduled_posts_path())
        .load()
        .expect("load schedule");
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].caption, "first");
    assert_eq!(posts[1].caption, "second");
    assert!(posts.iter().all(|p| p.status == PostStatus::Scheduled));
}

#[tokio::test]
async fn post_rejects_unparseable_time() {
    let workspace = Workspace::authenticated();
    let image = workspace.image();
    let report = run(
        &workspace.post_tool(),
        json!({"caption": "c", "image_path": image, "scheduled_time": "next tuesday"}),
    )
    .await;
    assert_eq!(report.status, ToolStatus::Error);
    assert!(report.message.starts_with("Post scheduling failed:"));
}

#[tokio::test]
async fn caption_respects_hashtag_count() {
    let tool = caption_tool();
    let report = run(
        &tool,
        json!({"topic": "fitness", "tone": "casual", "hashtags_count": 3, "image_description": "Morning run"}),
    )
    .await;
    assert_eq!(report.status, ToolStatus::Ok);

    let tags = report
        .message
        .split_whitespace()
        .filter(|word| word.starts_with('#'))
        .count();
    assert_eq!(tags, 3);
    assert!(report.message.ends_with("📸 Morning run"));
}

#[tokio::test]
async fn subscription_merges_and_normalizes() {
    let workspace = Workspace::authenticated();
    let tool = workspace.subscription_tool();

    let report = run(&tool, json!({"hashtags": "#AI, rustlang", "users": ["@openai"]})).await;
    assert_eq!(
        report,
        ToolReport::ok("Monitoring 2 hashtags (#ai, #rustlang) and 1 accounts (@openai)")
    );

    let report = run(&tool, json!({"hashtags": ["ai", "ml"]})).await;
    assert_eq!(
        report,
        ToolReport::ok("Monitoring 3 hashtags (#ai, #rustlang, #ml) and 1 accounts (@openai)")
    );
}

#[tokio::test]
async fn subscription_with_nothing_to_monitor() {
    let workspace = Workspace::authenticated();
    let report = run(&workspace.subscription_tool(), json!({})).await;
    assert_eq!(
        report,
        ToolReport::error("No hashtags or accounts provided to monitor.")
    );
}
