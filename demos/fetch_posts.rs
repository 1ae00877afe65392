//! Fetching Posts
//!
//! This example demonstrates the async lifecycle convention.
//!
//! Key concepts:
//! - One external call becomes pending / fulfilled / rejected actions
//! - Failures are data: a status and a message in the snapshot
//! - Stale items survive a failed refetch
//! - Stillwater effects as operation bodies
//!
//! Run with: RUST_LOG=unistore=debug cargo run --example fetch_posts

use stillwater::prelude::*;
use tracing_subscriber::EnvFilter;
use unistore::app::{app_store, fetch_posts, AppState, Post, StaticSource, FETCH_POSTS};
use unistore::regions::Status;
use unistore::AsyncOperation;

const POSTS: &str = r#"[
    {"id": 1, "title": "Actions are values"},
    {"id": 2, "title": "Reducers are pure", "body": "No side effects."}
]"#;

#[derive(Clone)]
struct OfflineEnv {
    cached_titles: Vec<String>,
}

fn describe(state: &AppState) -> String {
    let posts = &state.posts;
    match posts.status() {
        Status::Idle => "nothing loaded yet".to_string(),
        Status::Loading => format!("loading ({} stale)", posts.items().len()),
        Status::Succeeded => format!("{} posts", posts.items().len()),
        Status::Failed => format!(
            "error: {} ({} stale posts kept)",
            posts.error_message().unwrap_or("unknown"),
            posts.items().len()
        ),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== Fetching Posts Example ===\n");

    let store = app_store()?;
    let view = store.clone();
    store.subscribe(move || println!("  [view] {}", describe(&view.get_state())));

    println!("Fetch from a reachable source:");
    fetch_posts(&store, &StaticSource::json(POSTS)).await?;
    for post in store.get_state().posts.items() {
        println!("    #{} {}", post.id, post.title);
    }

    println!("\nRefetch while the network is down:");
    fetch_posts(&store, &StaticSource::unavailable("network down")).await?;

    println!("\nFetch through a Stillwater effect:");
    let env = OfflineEnv {
        cached_titles: vec!["From cache".to_string()],
    };
    let from_cache = from_fn(|env: &OfflineEnv| -> Result<Vec<Post>, String> {
        Ok(env
            .cached_titles
            .iter()
            .enumerate()
            .map(|(i, title)| Post::new(i as u64 + 100, title.clone()))
            .collect())
    });
    AsyncOperation::new(FETCH_POSTS)
        .run_effect(&store, from_cache, &env)
        .await?;

    println!("\nDispatched:");
    for kind in store.history().kinds() {
        println!("  {}", kind);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
