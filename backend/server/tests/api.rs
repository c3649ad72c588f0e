use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use server::{app, config::Config, state::State, store::MemoryStore};
use tower::ServiceExt;

fn router() -> Router {
    app(State::with_store(
        Config::default(),
        Arc::new(MemoryStore::default()),
    ))
}

async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };

    let resp = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        json!(null)
    } else {
        serde_json::from_slice(&bytes).unwrap_or(json!(null))
    };

    (status, json)
}

async fn create(router: &Router, title: &str) -> String {
    let (status, body) = call(
        router,
        "POST",
        "/api/recipes",
        Some("chef"),
        Some(json!({
            "title": title,
            "description": format!("{title} description"),
            "image": format!("https://example.com/{title}.png"),
            "recipe": format!("Brew {title}."),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    body["id"].as_str().unwrap().to_string()
}

async fn react(router: &Router, id: &str, user: &str, reaction: &str) -> (StatusCode, Value) {
    call(
        router,
        "POST",
        &format!("/api/recipes/{id}/react"),
        Some(user),
        Some(json!({ "reaction": reaction })),
    )
    .await
}

#[tokio::test]
async fn test_reaction_scenario() {
    let router = router();
    let id = create(&router, "latte").await;

    let (status, body) = react(&router, &id, "u1", "like").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "reactions": { "likes": 1, "dislikes": 0, "neutral": 0 } })
    );

    let (_, body) = react(&router, &id, "u1", "like").await;
    assert_eq!(body["reactions"], json!({ "likes": 0, "dislikes": 0, "neutral": 0 }));

    let (_, body) = react(&router, &id, "u1", "dislike").await;
    assert_eq!(body["reactions"], json!({ "likes": 0, "dislikes": 1, "neutral": 0 }));

    let (_, body) = react(&router, &id, "u2", "dislike").await;
    assert_eq!(body["reactions"], json!({ "likes": 0, "dislikes": 2, "neutral": 0 }));

    let (_, listing) = call(&router, "GET", "/api/recipes", None, None).await;
    assert_eq!(listing[0]["userReactions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_reaction_is_rejected_without_mutation() {
    let router = router();
    let id = create(&router, "mocha").await;
    react(&router, &id, "u1", "neutral").await;

    let (status, body) = react(&router, &id, "u1", "love").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Invalid reaction" }));

    let (_, listing) = call(&router, "GET", "/api/recipes", Some("u1"), None).await;
    assert_eq!(listing[0]["reactions"]["neutral"], 1);
    assert_eq!(listing[0]["userReaction"], "neutral");
}

#[tokio::test]
async fn test_invalid_reaction_is_checked_before_lookup() {
    let router = router();

    let (status, _) = react(&router, "does-not-exist", "u1", "love").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_recipe_is_not_found() {
    let router = router();

    let (status, body) = react(&router, "does-not-exist", "u1", "like").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Recipe not found" }));

    let (status, _) = react(
        &router,
        "6f1d6a2e-4a53-4c4e-9c59-0b7f3f0c8f11",
        "u1",
        "like",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let router = router();
    let id = create(&router, "cortado").await;

    let (status, body) = call(
        &router,
        "POST",
        &format!("/api/recipes/{id}/react"),
        Some("u1"),
        Some(json!("like")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Malformed payload" }));
}

#[tokio::test]
async fn test_missing_or_non_string_reaction_is_invalid() {
    let router = router();
    let id = create(&router, "ristretto").await;

    for body in [json!({}), json!({ "reaction": 5 }), json!({ "emoji": "like" })] {
        let (status, body) = call(
            &router,
            "POST",
            &format!("/api/recipes/{id}/react"),
            Some("u1"),
            Some(body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Invalid reaction" }));
    }

    let (_, listing) = call(&router, "GET", "/api/recipes", None, None).await;
    assert_eq!(listing[0]["userReactions"], json!([]));
}

#[tokio::test]
async fn test_trailing_slash_reaches_collection() {
    let router = router();
    let (status, created) = call(
        &router,
        "POST",
        "/api/recipes/",
        Some("chef"),
        Some(json!({ "title": "flat white", "description": "d", "image": "i", "recipe": "r" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listing) = call(&router, "GET", "/api/recipes/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing[0]["id"], created["id"]);
}

#[tokio::test]
async fn test_identity_is_required_for_writes() {
    let router = router();
    let id = create(&router, "espresso").await;

    let (status, body) = call(
        &router,
        "POST",
        &format!("/api/recipes/{id}/react"),
        None,
        Some(json!({ "reaction": "like" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Authentication required" }));

    let (status, _) = call(&router, "GET", "/api/recipes/user-reactions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
        &router,
        "POST",
        "/api/recipes",
        Some("   "),
        Some(json!({ "title": "t", "description": "d", "image": "i", "recipe": "r" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_validates_fields() {
    let router = router();

    let (status, body) = call(
        &router,
        "POST",
        "/api/recipes",
        Some("chef"),
        Some(json!({ "title": "", "description": "d", "image": "i", "recipe": "r" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Field `title` must not be empty");

    let (status, _) = call(
        &router,
        "POST",
        "/api/recipes",
        Some("chef"),
        Some(json!({ "title": "Missing the rest" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_annotation_depends_on_identity() {
    let router = router();
    let first = create(&router, "first").await;
    create(&router, "second").await;
    react(&router, &first, "u1", "like").await;

    let (status, anonymous) = call(&router, "GET", "/api/recipes", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(anonymous.as_array().unwrap().len(), 2);
    assert!(anonymous[0].get("userReaction").is_none());

    let (_, personal) = call(&router, "GET", "/api/recipes", Some("u1"), None).await;
    assert_eq!(personal[0]["title"], "first");
    assert_eq!(personal[0]["userReaction"], "like");
    assert_eq!(personal[1]["title"], "second");
    assert!(personal[1]["userReaction"].is_null());
}

#[tokio::test]
async fn test_recommendations_return_top_five_by_likes() {
    let router = router();
    let likes = [("ten", 10), ("seven-a", 7), ("seven-b", 7), ("three", 3), ("one", 1), ("zero", 0)];

    for (title, count) in likes {
        let id = create(&router, title).await;
        for n in 0..count {
            react(&router, &id, &format!("fan-{n}"), "like").await;
        }
    }

    let (status, body) = call(&router, "GET", "/api/recipes/recommendations", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|recipe| recipe["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["ten", "seven-a", "seven-b", "three", "one"]);
}

#[tokio::test]
async fn test_user_reactions_view() {
    let router = router();
    let latte = create(&router, "latte").await;
    let mocha = create(&router, "mocha").await;
    create(&router, "cortado").await;

    react(&router, &latte, "u1", "dislike").await;
    react(&router, &mocha, "u1", "neutral").await;
    react(&router, &mocha, "u2", "like").await;

    let (status, body) = call(&router, "GET", "/api/recipes/user-reactions", Some("u1"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "title": "latte", "reaction": "dislike" },
            { "title": "mocha", "reaction": "neutral" },
        ])
    );
}
