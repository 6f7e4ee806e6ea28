//! Integration tests for project CRUD, proof entries, and the free-tier quota.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (proofy-cli migrate)
//! - The web server running (cargo run -p proofy-web)
//!
//! Run with: cargo test -p proofy-integration-tests -- --ignored

use reqwest::{Client, StatusCode};

use proofy_integration_tests::{base_url, signed_in_client};

/// Create a project via the dashboard form, returning the redirect location.
async fn create_project(client: &Client, title: &str) -> String {
    let base = base_url();
    let resp = client
        .post(format!("{base}/dashboard/projects"))
        .form(&[("title", title), ("client_name", "Acme Corp")])
        .send()
        .await
        .expect("Failed to create project");

    assert!(resp.status().is_redirection(), "{}", resp.status());
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect without Location header")
        .to_owned()
}

/// Fetch the dashboard HTML.
async fn dashboard_html(client: &Client) -> String {
    let base = base_url();
    let resp = client
        .get(format!("{base}/dashboard"))
        .send()
        .await
        .expect("Failed to request dashboard");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.expect("Failed to read dashboard body")
}

/// Extract the first project id from a delete-form action in the dashboard HTML.
fn first_project_id(html: &str) -> String {
    let marker = "/dashboard/projects/";
    let start = html.find(marker).expect("no project form in dashboard") + marker.len();
    let rest = &html[start..];
    let end = rest.find('/').expect("malformed project action");
    rest[..end].to_owned()
}

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_projects_listed_newest_first() {
    let (client, _) = signed_in_client("ordering").await;

    create_project(&client, "Oldest Engagement").await;
    create_project(&client, "Middle Engagement").await;
    create_project(&client, "Newest Engagement").await;

    let html = dashboard_html(&client).await;
    let newest = html.find("Newest Engagement").expect("newest missing");
    let middle = html.find("Middle Engagement").expect("middle missing");
    let oldest = html.find("Oldest Engagement").expect("oldest missing");

    assert!(
        newest < middle && middle < oldest,
        "dashboard must list projects newest-created-first"
    );
}

// ============================================================================
// Quota Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_free_tier_allows_three_projects_then_blocks() {
    let (client, _) = signed_in_client("quota").await;

    for i in 1..=3 {
        let location = create_project(&client, &format!("Project {i}")).await;
        assert!(location.contains("success=project_created"), "{location}");
    }

    let location = create_project(&client, "Project 4").await;
    assert!(location.contains("error=quota"), "{location}");

    // The fourth project must not have been stored.
    let html = dashboard_html(&client).await;
    assert!(html.contains("Project 3"));
    assert!(!html.contains("Project 4"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_deleting_a_project_frees_quota() {
    let (client, _) = signed_in_client("quota-free").await;
    let base = base_url();

    for i in 1..=3 {
        create_project(&client, &format!("Slot {i}")).await;
    }

    let html = dashboard_html(&client).await;
    let project_id = first_project_id(&html);

    let resp = client
        .post(format!("{base}/dashboard/projects/{project_id}/delete"))
        .send()
        .await
        .expect("Failed to delete project");
    assert!(resp.status().is_redirection());

    let location = create_project(&client, "Replacement").await;
    assert!(location.contains("success=project_created"), "{location}");
}

// ============================================================================
// Proof Entry Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_add_entry_appears_on_dashboard() {
    let (client, _) = signed_in_client("entries").await;
    let base = base_url();

    create_project(&client, "Entry Project").await;
    let html = dashboard_html(&client).await;
    let project_id = first_project_id(&html);

    let resp = client
        .post(format!("{base}/dashboard/projects/{project_id}/entries"))
        .form(&[
            ("note", "Delivered wireframes"),
            ("proof_link", "https://example.com/wireframes"),
        ])
        .send()
        .await
        .expect("Failed to add entry");
    assert!(resp.status().is_redirection());

    let html = dashboard_html(&client).await;
    assert!(html.contains("Delivered wireframes"));
    assert!(html.contains("https://example.com/wireframes"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_entries_vanish_with_their_project() {
    let (client, _) = signed_in_client("cascade").await;
    let base = base_url();

    create_project(&client, "Doomed Project").await;
    let html = dashboard_html(&client).await;
    let project_id = first_project_id(&html);

    let resp = client
        .post(format!("{base}/dashboard/projects/{project_id}/entries"))
        .form(&[("note", "Orphan candidate"), ("proof_link", "")])
        .send()
        .await
        .expect("Failed to add entry");
    assert!(resp.status().is_redirection());

    let resp = client
        .post(format!("{base}/dashboard/projects/{project_id}/delete"))
        .send()
        .await
        .expect("Failed to delete project");
    assert!(resp.status().is_redirection());

    let html = dashboard_html(&client).await;
    assert!(!html.contains("Doomed Project"));
    assert!(!html.contains("Orphan candidate"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_deleting_unknown_entry_reports_not_found() {
    let (client, _) = signed_in_client("missing-entry").await;
    let base = base_url();

    let resp = client
        .post(format!("{base}/dashboard/entries/999999999/delete"))
        .send()
        .await
        .expect("Failed to post delete");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect without Location header");
    assert!(location.contains("error=not_found"), "{location}");
}

// ============================================================================
// Ownership Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_users_cannot_touch_each_others_projects() {
    let (owner, _) = signed_in_client("owner").await;
    let (intruder, _) = signed_in_client("intruder").await;
    let base = base_url();

    create_project(&owner, "Private Work").await;
    let html = dashboard_html(&owner).await;
    let project_id = first_project_id(&html);

    // The intruder's dashboard never shows the project.
    let html = dashboard_html(&intruder).await;
    assert!(!html.contains("Private Work"));

    // And a forged delete is treated as not-found, not success.
    let resp = intruder
        .post(format!("{base}/dashboard/projects/{project_id}/delete"))
        .send()
        .await
        .expect("Failed to post delete");
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect without Location header");
    assert!(location.contains("error=not_found"), "{location}");

    // The owner still has it.
    let html = dashboard_html(&owner).await;
    assert!(html.contains("Private Work"));
}
