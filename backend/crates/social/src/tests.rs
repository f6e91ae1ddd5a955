//! Router-level tests for the social crate

#[cfg(test)]
mod support {
    use std::sync::Arc;

    use auth::testing;
    use auth::{AuthGate, MemoryAuthRepository, TokenIssuer};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::Utc;
    use kernel::id::UserId;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::domain::entity::UserProfile;
    use crate::infra::memory::MemorySocialRepository;

    pub struct Users {
        pub auth_repo: MemoryAuthRepository,
        pub tokens: Arc<TokenIssuer>,
        pub social: MemorySocialRepository,
    }

    impl Users {
        pub fn new(social: MemorySocialRepository) -> Self {
            Self {
                auth_repo: MemoryAuthRepository::new(),
                tokens: testing::token_issuer(),
                social,
            }
        }

        pub fn gate(&self) -> AuthGate<MemoryAuthRepository> {
            AuthGate::new(Arc::new(self.auth_repo.clone()), self.tokens.clone())
        }

        /// Known to both the credential store and the directory
        pub async fn seed(&self, user_name: &str) -> (UserId, String) {
            let (user_id, token) =
                testing::seed_user(&self.auth_repo, &self.tokens, user_name).await;
            let now = Utc::now();
            self.social.add_user(UserProfile {
                user_id,
                email: format!("{user_name}@example.com"),
                user_name: user_name.to_string(),
                full_name: format!("{user_name} tester"),
                phone: None,
                avatar_url: None,
                bio: Some(format!("{user_name} eats out a lot")),
                location_name: None,
                preferences: json!({}),
                is_active: true,
                email_verified: false,
                created_at: now,
                updated_at: now,
            });
            (user_id, token)
        }
    }

    pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub fn request(method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub fn names(list: &Value, key: &str) -> Vec<String> {
        list.as_array()
            .unwrap()
            .iter()
            .map(|item| item[key].as_str().unwrap().to_string())
            .collect()
    }
}

#[cfg(test)]
mod post_router_tests {
    use axum::Router;
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use kernel::id::{PostId, RestaurantId, UserId};
    use serde_json::json;

    use super::support::{Users, names, request, send};
    use crate::domain::entity::{Post, PostDraft, RestaurantSummary};
    use crate::domain::repository::PostRepository;
    use crate::infra::memory::MemorySocialRepository;
    use crate::presentation::router::post_router_generic;

    struct Harness {
        app: Router,
        social: MemorySocialRepository,
        users: Users,
    }

    fn harness() -> Harness {
        let social = MemorySocialRepository::new();
        let users = Users::new(social.clone());
        let app = post_router_generic(social.clone(), users.gate());
        Harness { app, social, users }
    }

    fn restaurant(h: &Harness) -> RestaurantId {
        let restaurant_id = RestaurantId::new();
        h.social.add_restaurant(RestaurantSummary {
            restaurant_id,
            name: "Andrés Carne de Res".into(),
            category: "other".into(),
            address: "Calle 3 #11A-56, Chía".into(),
            phone: "+57 1 863 7880".into(),
            rating_average: 4.6,
        });
        restaurant_id
    }

    async fn insert(
        h: &Harness,
        author: UserId,
        content: &str,
        is_public: bool,
        minutes_ago: i64,
    ) -> Post {
        let mut post = Post::create(
            author,
            None,
            PostDraft {
                content: content.into(),
                image_url: None,
                rating: Some(4),
                is_public,
            },
        );
        post.created_at = Utc::now() - Duration::minutes(minutes_ago);
        h.social.create_post(&post).await.unwrap();
        post
    }

    #[tokio::test]
    async fn test_create_requires_authentication() {
        let h = harness();
        let (status, body) = send(
            &h.app,
            request("POST", "/", Some(json!({ "content": "Hi" })), None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "missing token");
        assert!(h.social.posts().is_empty());
    }

    #[tokio::test]
    async fn test_create_post_with_restaurant() {
        let h = harness();
        let (author, token) = h.users.seed("ana").await;
        let restaurant_id = restaurant(&h);

        let (status, body) = send(
            &h.app,
            request(
                "POST",
                "/",
                Some(json!({
                    "content": "Chicharrón was huge",
                    "restaurantId": restaurant_id.to_string(),
                    "rating": 5,
                    "userId": UserId::new().to_string()
                })),
                Some(&token),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["message"], "Post created successfully");
        let post = &body["post"];
        assert_eq!(post["userId"], author.to_string());
        assert_eq!(post["user"]["username"], "ana");
        assert_eq!(post["restaurant"]["name"], "Andrés Carne de Res");
        assert_eq!(post["isPublic"], true);
        assert_eq!(post["isFeatured"], false);
        assert_eq!(post["_count"]["likes"], 0);
    }

    #[tokio::test]
    async fn test_create_post_validation() {
        let h = harness();
        let (_, token) = h.users.seed("ana").await;

        let (status, body) = send(
            &h.app,
            request(
                "POST",
                "/",
                Some(json!({ "content": "", "rating": 0 })),
                Some(&token),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "content");
        assert_eq!(body["errors"][0]["message"], "Post content cannot be empty");
        assert_eq!(body["errors"][1]["message"], "Rating must be between 1 and 5");
    }

    #[tokio::test]
    async fn test_create_post_for_unknown_restaurant() {
        let h = harness();
        let (_, token) = h.users.seed("ana").await;

        let (status, _) = send(
            &h.app,
            request(
                "POST",
                "/",
                Some(json!({
                    "content": "Where is this?",
                    "restaurantId": RestaurantId::new().to_string()
                })),
                Some(&token),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(h.social.posts().is_empty());
    }

    #[tokio::test]
    async fn test_list_public_featured_first_then_newest() {
        let h = harness();
        let (ana, _) = h.users.seed("ana").await;
        let (leo, _) = h.users.seed("leo").await;

        insert(&h, ana, "old", true, 30).await;
        insert(&h, leo, "new", true, 1).await;
        insert(&h, ana, "hidden", false, 0).await;
        let mut featured = Post::create(
            leo,
            None,
            PostDraft {
                content: "featured".into(),
                image_url: None,
                rating: Some(5),
                is_public: true,
            },
        );
        featured.is_featured = true;
        featured.created_at = Utc::now() - Duration::days(3);
        h.social.create_post(&featured).await.unwrap();

        let (status, body) = send(&h.app, request("GET", "/", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body["posts"], "content"), vec!["featured", "new", "old"]);
        assert_eq!(body["pagination"]["total"], 3);

        let (_, body) = send(&h.app, request("GET", &format!("/?userId={ana}"), None, None)).await;
        assert_eq!(names(&body["posts"], "content"), vec!["old"]);

        let (_, body) = send(&h.app, request("GET", "/?rating=5", None, None)).await;
        assert_eq!(names(&body["posts"], "content"), vec!["featured"]);

        let (_, body) = send(&h.app, request("GET", "/featured/list", None, None)).await;
        assert_eq!(names(&body["posts"], "content"), vec!["featured"]);
        assert_eq!(body["pagination"]["pages"], 1);

        let (_, body) = send(&h.app, request("GET", "/?page=2&limit=2", None, None)).await;
        assert_eq!(names(&body["posts"], "content"), vec!["old"]);
        assert_eq!(body["pagination"]["pages"], 2);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_limit() {
        let h = harness();
        let (status, body) = send(&h.app, request("GET", "/?limit=0", None, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "limit");
    }

    #[tokio::test]
    async fn test_list_far_past_last_page_is_empty() {
        let h = harness();
        let (ana, _) = h.users.seed("ana").await;
        insert(&h, ana, "only", true, 0).await;

        let uri = format!("/?page={}", i64::MAX);
        let (status, body) = send(&h.app, request("GET", &uri, None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["posts"].as_array().unwrap().is_empty());
        assert_eq!(body["pagination"]["page"], i64::MAX);
        assert_eq!(body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn test_get_post_visibility() {
        let h = harness();
        let (ana, ana_token) = h.users.seed("ana").await;
        let (_, leo_token) = h.users.seed("leo").await;
        let private = insert(&h, ana, "note to self", false, 0).await;
        let uri = format!("/{}", private.post_id);

        let (status, body) = send(&h.app, request("GET", &uri, None, None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "This post is not public");

        let (status, _) = send(&h.app, request("GET", &uri, None, Some(&leo_token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&h.app, request("GET", &uri, None, Some(&ana_token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["post"]["content"], "note to self");
        assert_eq!(body["post"]["user"]["bio"], "ana eats out a lot");

        let (status, body) = send(
            &h.app,
            request("GET", &format!("/{}", PostId::new()), None, None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "The specified post does not exist");
    }

    #[tokio::test]
    async fn test_get_post_ignores_bad_token() {
        let h = harness();
        let (ana, _) = h.users.seed("ana").await;
        let post = insert(&h, ana, "open to all", true, 0).await;

        let (status, _) = send(
            &h.app,
            request("GET", &format!("/{}", post.post_id), None, Some("garbage")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_author_cannot_update_or_delete() {
        let h = harness();
        let (ana, _) = h.users.seed("ana").await;
        let (_, leo_token) = h.users.seed("leo").await;
        let post = insert(&h, ana, "mine", true, 0).await;
        let uri = format!("/{}", post.post_id);

        for payload in [
            json!({ "content": "hijacked" }),
            json!({ "content": "hijacked", "isPublic": false, "rating": 1 }),
        ] {
            let (status, body) =
                send(&h.app, request("PUT", &uri, Some(payload), Some(&leo_token))).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body["message"], "You can only edit your own posts");
        }

        let (status, body) = send(&h.app, request("DELETE", &uri, None, Some(&leo_token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "You can only delete your own posts");

        assert_eq!(h.social.posts()[0].content, "mine");
    }

    #[tokio::test]
    async fn test_author_update_then_delete() {
        let h = harness();
        let (ana, token) = h.users.seed("ana").await;
        let post = insert(&h, ana, "first take", true, 0).await;
        let uri = format!("/{}", post.post_id);

        let (status, body) = send(
            &h.app,
            request(
                "PUT",
                &uri,
                Some(json!({ "content": "second take", "isPublic": false })),
                Some(&token),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["message"], "Post updated successfully");
        assert_eq!(body["post"]["content"], "second take");
        assert_eq!(body["post"]["isPublic"], false);
        assert_eq!(body["post"]["rating"], serde_json::Value::Null);

        let (status, body) = send(&h.app, request("DELETE", &uri, None, Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Post deleted successfully");
        assert!(h.social.posts().is_empty());

        let (status, _) = send(&h.app, request("DELETE", &uri, None, Some(&token))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_like_toggles() {
        let h = harness();
        let (ana, _) = h.users.seed("ana").await;
        let (_, leo_token) = h.users.seed("leo").await;
        let post = insert(&h, ana, "likeable", true, 0).await;
        let uri = format!("/{}/like", post.post_id);

        for (expected, message, count) in [
            (true, "Post liked successfully", 1),
            (false, "Post unliked successfully", 0),
            (true, "Post liked successfully", 1),
        ] {
            let (status, body) = send(&h.app, request("POST", &uri, None, Some(&leo_token))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["liked"], expected);
            assert_eq!(body["message"], message);
            assert_eq!(h.social.like_count(post.post_id), count);
        }

        let (_, body) = send(
            &h.app,
            request("GET", &format!("/{}", post.post_id), None, None),
        )
        .await;
        assert_eq!(body["post"]["_count"]["likes"], 1);
        assert_eq!(body["post"]["likes"][0]["user"]["username"], "leo");
    }

    #[tokio::test]
    async fn test_like_missing_post() {
        let h = harness();
        let (_, token) = h.users.seed("leo").await;

        let (status, body) = send(
            &h.app,
            request("POST", &format!("/{}/like", PostId::new()), None, Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "The specified post does not exist");
    }
}

#[cfg(test)]
mod user_router_tests {
    use axum::Router;
    use axum::http::StatusCode;
    use kernel::id::{PostId, UserId};
    use serde_json::json;

    use super::support::{Users, names, request, send};
    use crate::domain::entity::{Post, PostDraft};
    use crate::domain::repository::PostRepository;
    use crate::infra::memory::MemorySocialRepository;
    use crate::presentation::router::user_router_generic;

    struct Harness {
        app: Router,
        social: MemorySocialRepository,
        users: Users,
    }

    fn harness() -> Harness {
        let social = MemorySocialRepository::new();
        let users = Users::new(social.clone());
        let app = user_router_generic(social.clone(), users.gate());
        Harness { app, social, users }
    }

    #[tokio::test]
    async fn test_directory_requires_authentication() {
        let h = harness();
        let (status, _) = send(&h.app, request("GET", "/", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, token) = h.users.seed("ana").await;
        h.users.seed("leo").await;
        let (status, body) = send(&h.app, request("GET", "/", None, Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total"], 2);
        assert_eq!(body["users"][0]["_count"]["posts"], 0);
        assert!(body["users"][0].get("password").is_none());
    }

    #[tokio::test]
    async fn test_get_user() {
        let h = harness();
        let (ana, _) = h.users.seed("ana").await;

        let (status, body) = send(&h.app, request("GET", &format!("/{ana}"), None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "ana");
        assert_eq!(body["user"]["bio"], "ana eats out a lot");
        assert_eq!(body["user"]["_count"]["followers"], 0);

        let (status, body) = send(
            &h.app,
            request("GET", &format!("/{}", UserId::new()), None, None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "The specified user does not exist");
    }

    #[tokio::test]
    async fn test_update_profile() {
        let h = harness();
        let (ana, token) = h.users.seed("ana").await;

        let (status, body) = send(
            &h.app,
            request(
                "PUT",
                "/profile",
                Some(json!({
                    "fullName": "Ana María",
                    "bio": "",
                    "locationName": "Usaquén",
                    "preferences": { "cuisine": ["colombian"] }
                })),
                Some(&token),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["message"], "Profile updated successfully");
        assert_eq!(body["user"]["fullName"], "Ana María");
        assert_eq!(body["user"]["bio"], serde_json::Value::Null);
        assert_eq!(body["user"]["preferences"]["cuisine"][0], "colombian");

        let stored = h.social.profile(ana).unwrap();
        assert_eq!(stored.location_name.as_deref(), Some("Usaquén"));
        assert_eq!(stored.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_update_profile_validation() {
        let h = harness();
        let (_, token) = h.users.seed("ana").await;

        let (status, body) = send(
            &h.app,
            request(
                "PUT",
                "/profile",
                Some(json!({ "bio": "x".repeat(501) })),
                Some(&token),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "bio");
        assert_eq!(body["errors"][0]["message"], "Bio must not exceed 500 characters");
    }

    #[tokio::test]
    async fn test_follow_toggle_and_lists() {
        let h = harness();
        let (ana, ana_token) = h.users.seed("ana").await;
        let (leo, leo_token) = h.users.seed("leo").await;
        let (_, eva_token) = h.users.seed("eva").await;

        let follow = |token: &str| request("POST", &format!("/{ana}/follow"), None, Some(token));

        let (status, body) = send(&h.app, follow(&leo_token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["following"], true);
        assert_eq!(body["message"], "User followed successfully");
        send(&h.app, follow(&eva_token)).await;

        let (_, body) = send(&h.app, request("GET", &format!("/{ana}/followers"), None, None)).await;
        assert_eq!(body["pagination"]["total"], 2);
        let mut followers = names(&body["followers"], "username");
        followers.sort();
        assert_eq!(followers, vec!["eva", "leo"]);

        let (_, body) = send(&h.app, request("GET", &format!("/{leo}/following"), None, None)).await;
        assert_eq!(names(&body["following"], "username"), vec!["ana"]);

        let (_, body) = send(&h.app, follow(&leo_token)).await;
        assert_eq!(body["following"], false);
        assert_eq!(body["message"], "User unfollowed successfully");

        let (status, body) = send(&h.app, follow(&ana_token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You cannot follow yourself");

        let (status, _) = send(
            &h.app,
            request("POST", &format!("/{}/follow", UserId::new()), None, Some(&leo_token)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_user_posts_are_public_only() {
        let h = harness();
        let (ana, _) = h.users.seed("ana").await;

        for (content, is_public) in [("visible", true), ("secret", false)] {
            let post = Post::create(
                ana,
                None,
                PostDraft {
                    content: content.into(),
                    image_url: None,
                    rating: None,
                    is_public,
                },
            );
            h.social.create_post(&post).await.unwrap();
        }

        let (status, body) = send(&h.app, request("GET", &format!("/{ana}/posts"), None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body["posts"], "content"), vec!["visible"]);
        assert_eq!(body["pagination"]["total"], 1);
        assert!(body["posts"][0]["id"].as_str().unwrap().parse::<PostId>().is_ok());
    }
}
