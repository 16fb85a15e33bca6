use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use site_client::toc::{LayoutMetrics, PathSegment, TableOfContents};
use site_common::api::NowPlayingResponse;
use site_content::posts::{format_date, Post, PostMeta};
use site_content::projects::{all_projects, all_tags, project_by_id, projects_by_tag, Project};
use site_content::reads::{group_reads_into_weeks, Read, WeekBucket};
use site_content::render::render_article;
use site_content::Heading;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_LATEST_READS: usize = 3;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/now-playing", get(now_playing))
        .route("/api/posts", get(list_posts))
        .route("/api/posts/{slug}", get(get_post))
        .route("/api/posts/{slug}/toc", get(post_toc))
        .route("/api/reads", get(list_reads))
        .route("/api/reads/latest", get(latest_reads))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/{id}", get(get_project))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn now_playing(State(state): State<AppState>) -> Result<Json<NowPlayingResponse>, AppError> {
    Ok(Json(state.now_playing.current().await?))
}

// --- Posts ---

async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostMeta>>, AppError> {
    let content = state.content.clone();
    let posts = tokio::task::spawn_blocking(move || content.posts.list()).await??;
    Ok(Json(posts))
}

async fn load_post(state: &AppState, slug: String) -> Result<Post, AppError> {
    let content = state.content.clone();
    tokio::task::spawn_blocking(move || content.posts.get(&slug))
        .await??
        .ok_or(AppError::PostNotFound)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostDetail {
    meta: PostMeta,
    formatted_date: String,
    headings: Vec<Heading>,
    html: String,
}

async fn get_post(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<PostDetail>, AppError> {
    let post = load_post(&state, slug).await?;
    let article = render_article(&post.content);
    debug!(slug = %post.meta.slug, headings = article.headings.len(), "rendering post");
    Ok(Json(PostDetail {
        formatted_date: format_date(&post.meta.date),
        html: article.html,
        headings: article.headings,
        meta: post.meta,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TocPathBody {
    d: String,
    width: f64,
    height: f64,
    segments: Vec<PathSegment>,
    total_length: f64,
}

#[derive(Debug, Serialize)]
struct TocBody {
    headings: Vec<Heading>,
    path: Option<TocPathBody>,
    svg: String,
}

/// Table of contents laid out with estimated entry heights, for first paint
/// before the browser measures the real ones.
async fn post_toc(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<TocBody>, AppError> {
    let post = load_post(&state, slug).await?;
    let headings = render_article(&post.content).headings;
    let toc = TableOfContents::new(headings, LayoutMetrics::default());
    let path = toc.path().map(|p| TocPathBody {
        d: p.d(),
        width: p.width,
        height: p.height,
        segments: p.segments.clone(),
        total_length: p.total_length,
    });
    Ok(Json(TocBody {
        headings: toc.headings().to_vec(),
        path,
        svg: toc.svg(),
    }))
}

// --- Reads ---

#[derive(Debug, Deserialize)]
struct ReadsQuery {
    category: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReadsBody {
    weeks: Vec<WeekBucket>,
    categories: Vec<String>,
    total: usize,
}

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

async fn list_reads(State(state): State<AppState>, Query(query): Query<ReadsQuery>) -> Json<ReadsBody> {
    let grouped = group_reads_into_weeks(&state.content.reads, today());
    let categories = grouped.categories();
    let visible = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => grouped.filter_category(category),
        _ => grouped,
    };
    Json(ReadsBody {
        total: visible.total_reads(),
        weeks: visible.weeks,
        categories,
    })
}

#[derive(Debug, Deserialize)]
struct LatestQuery {
    count: Option<usize>,
}

async fn latest_reads(State(state): State<AppState>, Query(query): Query<LatestQuery>) -> Json<Vec<Read>> {
    let grouped = group_reads_into_weeks(&state.content.reads, today());
    Json(grouped.latest(query.count.unwrap_or(DEFAULT_LATEST_READS)))
}

// --- Projects ---

#[derive(Debug, Deserialize)]
struct ProjectsQuery {
    tag: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProjectsBody {
    projects: Vec<Project>,
    tags: Vec<String>,
}

async fn list_projects(State(state): State<AppState>, Query(query): Query<ProjectsQuery>) -> Json<ProjectsBody> {
    let projects = &state.content.projects;
    let mut sorted = all_projects(projects);
    if let Some(tag) = query.tag.as_deref().filter(|t| !t.is_empty()) {
        sorted = projects_by_tag(&sorted, tag).into_iter().cloned().collect();
    }
    Json(ProjectsBody {
        projects: sorted,
        tags: all_tags(projects),
    })
}

async fn get_project(State(state): State<AppState>, Path(id): Path<u32>) -> Result<Json<Project>, AppError> {
    project_by_id(&state.content.projects, id)
        .cloned()
        .map(Json)
        .ok_or(AppError::ProjectNotFound)
}

#[cfg(test)]
mod tests {
    use std::path::Path as FsPath;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use site_common::now_playing::NowPlayingService;
    use site_common::redis::RedisCache;
    use site_content::SiteContent;
    use tower::ServiceExt;

    use super::*;

    const POST: &str = "---\ntitle: Scroll Sync\ndate: \"2026-01-05\"\nexcerpt: Marker math\ntags: [rust]\n---\n\
## Layout\n\nText.\n\n### Centers\n\nMore.\n\n## Layout\n\nAgain.\n";

    fn fixture(dir: &FsPath) -> AppState {
        std::fs::create_dir(dir.join("blog")).unwrap();
        std::fs::write(dir.join("blog/scroll-sync.mdx"), POST).unwrap();
        std::fs::write(
            dir.join("reads.json"),
            r#"[
                {"date": "2026-01-05", "url": "https://www.cpu.land/", "title": "CPU", "category": "Kernel"},
                {"date": "2026-01-09", "url": "https://a.dev/x", "title": "A", "category": "Rust"},
                {"date": "2026-01-02", "url": "https://b.dev/y", "title": "B", "category": "Rust"},
                {"date": "2999-01-01", "url": "https://future.dev", "title": "Later", "category": "Rust"}
            ]"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("projects.json"),
            r#"[
                {"id": 1, "title": "Old", "description": "d", "tags": ["Go"], "link": "https://a", "year": "2024"},
                {"id": 2, "title": "New", "description": "d", "tags": ["Rust"], "link": "https://b", "year": "2026", "status": "Live"}
            ]"#,
        )
        .unwrap();
        let content = SiteContent::load(dir).unwrap();
        AppState::new(content, NowPlayingService::new(None, RedisCache::disabled()))
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let resp = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, body) = get_json(fixture(tmp.path()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn post_detail_has_unique_heading_ids() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, body) = get_json(fixture(tmp.path()), "/api/posts/scroll-sync").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["title"], "Scroll Sync");
        assert_eq!(body["meta"]["readTime"], "1 min read");
        assert_eq!(body["formattedDate"], "January 5, 2026");
        let ids: Vec<&str> = body["headings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["layout", "centers", "layout-1"]);
        assert!(body["html"].as_str().unwrap().contains(r#"<h2 id="layout-1">"#));
    }

    #[tokio::test]
    async fn unknown_post_is_404() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, body) = get_json(fixture(tmp.path()), "/api/posts/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Post not found" }));
    }

    #[tokio::test]
    async fn post_list_has_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, body) = get_json(fixture(tmp.path()), "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["slug"], "scroll-sync");
        assert_eq!(body[0]["tags"], json!(["rust"]));
    }

    #[tokio::test]
    async fn toc_uses_estimated_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, body) = get_json(fixture(tmp.path()), "/api/posts/scroll-sync/toc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["headings"].as_array().unwrap().len(), 3);
        assert_eq!(body["path"]["width"], 30.0);
        assert_eq!(body["path"]["height"], 94.0);
        assert!(body["path"]["d"].as_str().unwrap().starts_with("M5 10 L5 22 Q5 26"));
        assert_eq!(body["path"]["segments"][1]["offset"], 18.0);
        assert!(body["svg"].as_str().unwrap().starts_with("<svg"));
    }

    #[tokio::test]
    async fn toc_entries_match_article_anchors_around_code_blocks() {
        let tmp = tempfile::tempdir().unwrap();
        let state = fixture(tmp.path());
        std::fs::write(
            tmp.path().join("blog/setup-notes.mdx"),
            "---\ntitle: Setup\ndate: \"2026-01-06\"\n---\n## Setup\n\n```sh\n## Setup\n```\n\n## Setup\n",
        )
        .unwrap();

        let (_, detail) = get_json(state.clone(), "/api/posts/setup-notes").await;
        let (status, toc) = get_json(state, "/api/posts/setup-notes/toc").await;
        assert_eq!(status, StatusCode::OK);

        let html = detail["html"].as_str().unwrap();
        let ids: Vec<&str> = toc["headings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["setup", "setup-1"]);
        assert_eq!(detail["headings"], toc["headings"]);
        for id in ids {
            assert!(html.contains(&format!(r#"<h2 id="{id}">"#)), "{html}");
        }
    }

    #[tokio::test]
    async fn reads_are_grouped_and_filtered() {
        let tmp = tempfile::tempdir().unwrap();
        let state = fixture(tmp.path());

        let (status, body) = get_json(state.clone(), "/api/reads").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["categories"], json!(["Kernel", "Rust"]));
        assert_eq!(body["weeks"][0]["week"], "Week 2, 2026");
        assert_eq!(body["weeks"][0]["dateRange"], "Jan 8 - Jan 14");
        assert_eq!(body["weeks"][1]["reads"][0]["source"], "cpu.land");

        let (_, body) = get_json(state.clone(), "/api/reads?category=Kernel").await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["weeks"].as_array().unwrap().len(), 1);

        let (_, body) = get_json(state, "/api/reads/latest?count=2").await;
        let ids: Vec<u64> = body.as_array().unwrap().iter().map(|r| r["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn projects_sorted_filtered_and_looked_up() {
        let tmp = tempfile::tempdir().unwrap();
        let state = fixture(tmp.path());

        let (_, body) = get_json(state.clone(), "/api/projects").await;
        assert_eq!(body["projects"][0]["id"], 2);
        assert_eq!(body["tags"], json!(["Go", "Rust"]));

        let (_, body) = get_json(state.clone(), "/api/projects?tag=Go").await;
        assert_eq!(body["projects"].as_array().unwrap().len(), 1);

        let (status, body) = get_json(state.clone(), "/api/projects/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Live");

        let (status, body) = get_json(state, "/api/projects/9").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Project not found" }));
    }

    #[tokio::test]
    async fn unconfigured_now_playing_is_500() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, body) = get_json(fixture(tmp.path()), "/api/now-playing").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch Spotify data" }));
    }
}
