//! Post handlers.
//!
//! Reads are public and only ever return live posts. Writes need an
//! [`Identity`]; who may change which post is decided by `PostService`.

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use quill_core::domain::{NewPost, Page, PageRequest, Post, PostChanges};
use quill_shared::dto::{CreatePostRequest, OwnerSummary, PostResponse, UpdatePostRequest};
use quill_shared::{DataResponse, MessageResponse, PaginatedResponse, PaginationMeta};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
}

/// GET /api/posts
pub async fn index(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::posts(query.page.unwrap_or(1));
    let page = state.posts.list(request).await?;

    let meta = PaginationMeta {
        current_page: page.page,
        from: page.from(),
        to: page.to(),
        last_page: page.last_page(),
        per_page: page.per_page,
        total: page.total,
        path: req.path().to_string(),
    };
    let data = present_page(&state, page).await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::new(data, meta)))
}

/// GET /api/posts/{id}
pub async fn show(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let principal = identity.principal();
    let post = state
        .posts
        .show(path.into_inner(), principal.as_ref())
        .await?;

    Ok(HttpResponse::Ok().json(DataResponse::new(present(&state, post).await?)))
}

/// POST /api/posts
pub async fn store(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let errors = req.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let input = NewPost {
        title: req.title.unwrap_or_default(),
        content: req.content.unwrap_or_default(),
        is_draft: req.is_draft,
        published_at: req.published_at,
    };
    let post = state.posts.create(Some(&identity.principal()), input).await?;

    Ok(HttpResponse::Created().json(DataResponse::new(present(&state, post).await?)))
}

/// PUT|PATCH /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let principal = identity.principal();

    // Ownership before validation: a non-owner learns nothing from the body.
    let owned = state.posts.authorize_mutation(Some(&principal), id).await?;

    let req = body.into_inner();
    let errors = req.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let changes = PostChanges {
        title: req.title,
        content: req.content,
        is_draft: req.is_draft,
        published_at: req.published_at,
    };
    let post = state.posts.update_owned(owned, changes).await?;

    Ok(HttpResponse::Ok().json(DataResponse::new(present(&state, post).await?)))
}

/// DELETE /api/posts/{id}
pub async fn destroy(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(Some(&identity.principal()), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

async fn present(state: &AppState, post: Post) -> AppResult<PostResponse> {
    let owners = load_owners(state, &[post.user_id]).await?;
    Ok(to_response(post, &owners))
}

async fn present_page(state: &AppState, page: Page<Post>) -> AppResult<Vec<PostResponse>> {
    let mut owner_ids: Vec<Uuid> = page.items.iter().map(|p| p.user_id).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();

    let owners = load_owners(state, &owner_ids).await?;
    Ok(page
        .items
        .into_iter()
        .map(|post| to_response(post, &owners))
        .collect())
}

async fn load_owners(state: &AppState, ids: &[Uuid]) -> AppResult<HashMap<Uuid, OwnerSummary>> {
    let users = state.users.find_by_ids(ids).await?;
    Ok(users
        .into_iter()
        .map(|u| {
            (
                u.id,
                OwnerSummary {
                    id: u.id,
                    name: u.name,
                },
            )
        })
        .collect())
}

fn to_response(post: Post, owners: &HashMap<Uuid, OwnerSummary>) -> PostResponse {
    PostResponse {
        user: owners.get(&post.user_id).cloned(),
        id: post.id,
        title: post.title,
        content: post.content,
        is_draft: post.is_draft,
        published_at: post.published_at,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test, web};
    use chrono::{DateTime, TimeDelta, Utc};
    use serde_json::{Value, json};
    use uuid::Uuid;

    use quill_core::domain::{NewPost, Post, Principal, User};
    use quill_core::ports::BaseRepository;
    use quill_infra::JwtConfig;

    use crate::handlers::configure_routes;
    use crate::state::AppState;

    struct Author {
        user: User,
        token: String,
    }

    impl Author {
        fn bearer(&self) -> (header::HeaderName, String) {
            (header::AUTHORIZATION, format!("Bearer {}", self.token))
        }

        fn principal(&self) -> Principal {
            Principal::new(self.user.id)
        }
    }

    async fn author(state: &AppState, name: &str) -> Author {
        let user = User::new(
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            "not-a-real-hash".to_string(),
        );
        let user = state.users.insert(user).await.unwrap();
        let token = state.tokens.generate_token(user.id, &user.email).unwrap();
        Author { user, token }
    }

    async fn seed(
        state: &AppState,
        owner: &Author,
        is_draft: bool,
        published_at: Option<DateTime<Utc>>,
    ) -> Post {
        state
            .posts
            .create(
                Some(&owner.principal()),
                NewPost {
                    title: "Original Title".to_string(),
                    content: "Original Body".to_string(),
                    is_draft,
                    published_at,
                },
            )
            .await
            .unwrap()
    }

    fn yesterday() -> Option<DateTime<Utc>> {
        Some(Utc::now() - TimeDelta::days(1))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn state() -> AppState {
        AppState::in_memory(JwtConfig::default())
    }

    #[actix_rt::test]
    async fn test_public_can_list_live_posts() {
        let state = state();
        let alice = author(&state, "Alice").await;
        let live = seed(&state, &alice, false, yesterday()).await;
        seed(&state, &alice, true, yesterday()).await;
        seed(&state, &alice, false, Some(Utc::now() + TimeDelta::days(1))).await;
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], live.id.to_string());
        assert_eq!(data[0]["is_draft"], false);
        assert_eq!(data[0]["user"]["name"], "Alice");
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["meta"]["per_page"], 20);
        assert_eq!(body["links"]["first"], "/api/posts?page=1");
        assert!(body["links"]["next"].is_null());
    }

    #[actix_rt::test]
    async fn test_listing_pages_hold_twenty_posts() {
        let state = state();
        let alice = author(&state, "Alice").await;
        for i in 0..21 {
            seed(&state, &alice, false, Some(Utc::now() - TimeDelta::minutes(i + 1))).await;
        }
        let app = app!(state);

        let first: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/posts").to_request(),
        )
        .await;
        let second: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/posts?page=2").to_request(),
        )
        .await;

        assert_eq!(first["data"].as_array().unwrap().len(), 20);
        assert_eq!(first["links"]["next"], "/api/posts?page=2");
        assert_eq!(second["data"].as_array().unwrap().len(), 1);
        assert_eq!(second["meta"]["last_page"], 2);
    }

    #[actix_rt::test]
    async fn test_huge_page_number_returns_empty_page() {
        let state = state();
        let alice = author(&state, "Alice").await;
        seed(&state, &alice, false, yesterday()).await;
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts?page={}", u64::MAX))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(body["meta"]["current_page"], u64::MAX);
        assert_eq!(body["meta"]["total"], 1);
        assert!(body["meta"]["from"].is_null());
        assert!(body["links"]["next"].is_null());
    }

    #[actix_rt::test]
    async fn test_public_can_view_single_live_post() {
        let state = state();
        let alice = author(&state, "Alice").await;
        let post = seed(&state, &alice, false, yesterday()).await;
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["id"], post.id.to_string());
        assert_eq!(body["data"]["title"], "Original Title");
        assert_eq!(body["data"]["user"]["id"], alice.user.id.to_string());
    }

    #[actix_rt::test]
    async fn test_draft_is_not_found_even_for_its_author() {
        let state = state();
        let alice = author(&state, "Alice").await;
        let draft = seed(&state, &alice, true, None).await;
        let app = app!(state);
        let uri = format!("/api/posts/{}", draft.id);

        let anonymous = test::TestRequest::get().uri(&uri).to_request();
        assert_eq!(
            test::call_service(&app, anonymous).await.status(),
            StatusCode::NOT_FOUND
        );

        let as_owner = test::TestRequest::get()
            .uri(&uri)
            .insert_header(alice.bearer())
            .to_request();
        assert_eq!(
            test::call_service(&app, as_owner).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_rt::test]
    async fn test_unknown_and_malformed_ids_are_not_found() {
        let state = state();
        let app = app!(state);

        for uri in [
            format!("/api/posts/{}", Uuid::new_v4()),
            "/api/posts/not-a-uuid".to_string(),
        ] {
            let req = test::TestRequest::get().uri(&uri).to_request();
            assert_eq!(
                test::call_service(&app, req).await.status(),
                StatusCode::NOT_FOUND
            );
        }
    }

    #[actix_rt::test]
    async fn test_guest_cannot_create_post() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"title": "Unauthorized Post", "content": "Body"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Unauthenticated.");

        let page = state
            .posts
            .list(quill_core::domain::PageRequest::posts(1))
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[actix_rt::test]
    async fn test_authenticated_user_can_create_post() {
        let state = state();
        let alice = author(&state, "Alice").await;
        let mallory = author(&state, "Mallory").await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(alice.bearer())
            .set_json(json!({
                "title": "New Post",
                "content": "Post content",
                "is_draft": true,
                "user_id": mallory.user.id,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["title"], "New Post");
        assert_eq!(body["data"]["content"], "Post content");
        assert_eq!(body["data"]["is_draft"], true);
        assert_eq!(body["data"]["user"]["id"], alice.user.id.to_string());

        let id: Uuid = body["data"]["id"].as_str().unwrap().parse().unwrap();
        let stored = state.posts.authorize_mutation(Some(&alice.principal()), id).await;
        assert_eq!(stored.unwrap().post().user_id, alice.user.id);
    }

    #[actix_rt::test]
    async fn test_create_validation_errors() {
        let state = state();
        let alice = author(&state, "Alice").await;
        let app = app!(state);

        let missing = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(alice.bearer())
            .set_json(json!({"title": "No content"}))
            .to_request();
        let resp = test::call_service(&app, missing).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0], "The content field is required.");

        let malformed = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(alice.bearer())
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();
        assert_eq!(
            test::call_service(&app, malformed).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[actix_rt::test]
    async fn test_owner_can_update_their_post() {
        let state = state();
        let alice = author(&state, "Alice").await;
        let post = seed(&state, &alice, false, yesterday()).await;
        let app = app!(state);

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(alice.bearer())
            .set_json(json!({"title": "Updated Title", "content": "Updated Body"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["id"], post.id.to_string());
        assert_eq!(body["data"]["title"], "Updated Title");
        assert_eq!(body["data"]["content"], "Updated Body");

        let read: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/posts/{}", post.id))
                .to_request(),
        )
        .await;
        assert_eq!(read["data"]["title"], "Updated Title");
    }

    #[actix_rt::test]
    async fn test_owner_can_publish_draft_with_patch() {
        let state = state();
        let alice = author(&state, "Alice").await;
        let draft = seed(&state, &alice, true, None).await;
        let app = app!(state);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/posts/{}", draft.id))
            .insert_header(alice.bearer())
            .set_json(json!({"is_draft": false, "published_at": Utc::now() - TimeDelta::minutes(5)}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", draft.id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_rt::test]
    async fn test_non_owner_cannot_update_post() {
        let state = state();
        let alice = author(&state, "Alice").await;
        let bob = author(&state, "Bob").await;
        let post = seed(&state, &alice, false, yesterday()).await;
        let app = app!(state);

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(bob.bearer())
            .set_json(json!({"title": "Hacked Title"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        // Still forbidden when the body would not validate.
        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(bob.bearer())
            .set_json(json!({"title": ""}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let stored = state.posts.show(post.id, None).await.unwrap();
        assert_eq!(stored.title, "Original Title");
    }

    #[actix_rt::test]
    async fn test_guest_cannot_update_or_delete() {
        let state = state();
        let alice = author(&state, "Alice").await;
        let post = seed(&state, &alice, false, yesterday()).await;
        let app = app!(state);
        let uri = format!("/api/posts/{}", post.id);

        let update = test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({"title": "Anonymous"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, update).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let delete = test::TestRequest::delete().uri(&uri).to_request();
        assert_eq!(
            test::call_service(&app, delete).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let stored = state.posts.show(post.id, None).await.unwrap();
        assert_eq!(stored.title, "Original Title");
    }

    #[actix_rt::test]
    async fn test_invalid_token_is_unauthenticated() {
        let state = state();
        let alice = author(&state, "Alice").await;
        let post = seed(&state, &alice, false, yesterday()).await;
        let app = app!(state);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header((header::AUTHORIZATION, "Bearer garbage"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_rt::test]
    async fn test_live_post_lifecycle() {
        let state = state();
        let alice = author(&state, "Alice").await;
        let bob = author(&state, "Bob").await;
        let post = seed(&state, &alice, false, yesterday()).await;
        let app = app!(state);
        let uri = format!("/api/posts/{}", post.id);

        let get = test::TestRequest::get().uri(&uri).to_request();
        assert_eq!(test::call_service(&app, get).await.status(), StatusCode::OK);

        let hijack = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bob.bearer())
            .to_request();
        assert_eq!(
            test::call_service(&app, hijack).await.status(),
            StatusCode::FORBIDDEN
        );

        let delete = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(alice.bearer())
            .to_request();
        let resp = test::call_service(&app, delete).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Post deleted successfully");

        let get = test::TestRequest::get().uri(&uri).to_request();
        assert_eq!(
            test::call_service(&app, get).await.status(),
            StatusCode::NOT_FOUND
        );

        let again = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(alice.bearer())
            .to_request();
        assert_eq!(
            test::call_service(&app, again).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}
