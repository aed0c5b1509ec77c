//! Handler tests - the full route table exercised over in-memory state.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use uuid::Uuid;

use gazette_core::domain::{Group, Post, User};
use gazette_core::ports::{BaseRepository, PostRepository, TokenService};
use gazette_infra::auth::{JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::state::AppState;

struct TestEnv {
    state: AppState,
    tokens: Arc<JwtTokenService>,
}

impl TestEnv {
    fn new() -> Self {
        let tokens = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "test".to_string(),
        }));
        Self {
            state: AppState::in_memory(),
            tokens,
        }
    }

    fn token_service(&self) -> Arc<dyn TokenService> {
        self.tokens.clone()
    }

    async fn user(&self, username: &str) -> User {
        self.state
            .users
            .save(User::new(username.to_string(), "external-hash".to_string()))
            .await
            .unwrap()
    }

    async fn group(&self, title: &str, slug: &str) -> Group {
        self.state
            .groups
            .save(Group::new(
                title.to_string(),
                slug.to_string(),
                format!("{title} community"),
            ))
            .await
            .unwrap()
    }

    async fn post(&self, author: &User, text: &str, group_id: Option<Uuid>) -> Post {
        self.state
            .posts
            .save(Post::new(author.id, text.to_string(), group_id))
            .await
            .unwrap()
    }

    fn token(&self, user: &User) -> String {
        self.tokens.generate_token(user.id, &user.username).unwrap()
    }
}

macro_rules! service {
    ($env:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($env.state.clone()))
                .app_data(web::Data::new($env.token_service()))
                .configure(configure_routes),
        )
        .await
    };
}

async fn body(res: ServiceResponse<impl MessageBody>) -> String {
    String::from_utf8(test::read_body(res).await.to_vec()).unwrap()
}

fn location(res: &ServiceResponse<impl MessageBody>) -> &str {
    res.headers()
        .get(header::LOCATION)
        .expect("redirect without Location header")
        .to_str()
        .unwrap()
}

#[actix_web::test]
async fn profile_page_lists_only_the_authors_posts() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    let vader = env.user("vader").await;
    env.post(&luke, "a new hope", None).await;
    env.post(&vader, "the dark side", None).await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/skywalker/").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let page = body(res).await;
    assert!(page.contains("a new hope"));
    assert!(!page.contains("the dark side"));
    assert!(page.contains("1 post"));
}

#[actix_web::test]
async fn unknown_author_profile_is_404_with_path() {
    let env = TestEnv::new();
    let app = service!(env);

    let res = test::call_service(&app, test::TestRequest::get().uri("/ghost/").to_request()).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(body(res).await.contains("/ghost/"));
}

#[actix_web::test]
async fn unauthenticated_new_post_redirects_to_login() {
    let env = TestEnv::new();
    let app = service!(env);

    let res = test::call_service(&app, test::TestRequest::get().uri("/new/").to_request()).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/?next=/new/");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new/")
            .set_form([("text", "anonymous"), ("group", "")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/?next=/new/");
}

#[actix_web::test]
async fn garbage_token_is_treated_as_unauthenticated() {
    let env = TestEnv::new();
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/new/")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/?next=/new/");
}

#[actix_web::test]
async fn session_cookie_authenticates() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/new/")
            .cookie(Cookie::new("session", env.token(&luke)))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(body(res).await.contains("<form"));
}

#[actix_web::test]
async fn create_post_without_group_lands_first_on_home() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    env.post(&luke, "older entry", None).await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new/")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", env.token(&luke))))
            .set_form([("text", "newest entry"), ("group", "")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");

    let feed = env.state.posts.recent(0, 10).await.unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].post.text, "newest entry");
    assert!(feed[0].post.group_id.is_none());

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let page = body(res).await;
    let newest = page.find("newest entry").unwrap();
    let older = page.find("older entry").unwrap();
    assert!(newest < older);
}

#[actix_web::test]
async fn post_author_comes_from_identity_not_the_form() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    env.user("vader").await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new/")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", env.token(&luke))))
            .set_form([("text", "mine"), ("group", ""), ("author", "vader")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let feed = env.state.posts.recent(0, 10).await.unwrap();
    assert_eq!(feed[0].post.author_id, luke.id);
    assert_eq!(feed[0].author.username, "skywalker");
}

#[actix_web::test]
async fn create_with_empty_text_rerenders_and_persists_nothing() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    env.group("Rustaceans", "rust").await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new/")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", env.token(&luke))))
            .set_form([("text", "   "), ("group", "rust")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let page = body(res).await;
    assert!(page.contains("Enter the post text."));
    // The submitted selection is preserved on re-render
    assert!(page.contains("<option value=\"rust\" selected>"));
    assert_eq!(env.state.posts.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn create_with_unknown_group_is_a_field_error() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new/")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", env.token(&luke))))
            .set_form([("text", "orphan text"), ("group", "ghost")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let page = body(res).await;
    assert!(page.contains("Select one of the available groups."));
    assert!(page.contains("orphan text"));
    assert_eq!(env.state.posts.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn group_page_lists_only_group_posts() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    let group = env.group("Rustaceans", "rust").await;
    env.post(&luke, "grouped entry", Some(group.id)).await;
    env.post(&luke, "loose entry", None).await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/group/rust/").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let page = body(res).await;
    assert!(page.contains("Rustaceans"));
    assert!(page.contains("grouped entry"));
    assert!(!page.contains("loose entry"));
}

#[actix_web::test]
async fn unknown_group_slug_is_404() {
    let env = TestEnv::new();
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/group/jazz/").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(body(res).await.contains("/group/jazz/"));
}

#[actix_web::test]
async fn feed_paginates_ten_per_page_newest_first() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    for i in 0..13 {
        env.post(&luke, &format!("entry number {i:02}"), None).await;
    }
    let app = service!(env);

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let first = body(res).await;
    assert_eq!(first.matches("<article").count(), 10);
    assert!(first.contains("entry number 12"));
    assert!(!first.contains("entry number 02"));

    let res = test::call_service(&app, test::TestRequest::get().uri("/?page=2").to_request()).await;
    let second = body(res).await;
    assert_eq!(second.matches("<article").count(), 3);
    assert!(second.contains("entry number 00"));

    // Out-of-range clamps to the last page; garbage falls back to the first
    let res =
        test::call_service(&app, test::TestRequest::get().uri("/?page=999").to_request()).await;
    assert!(body(res).await.contains("entry number 00"));

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/?page=abc").to_request()).await;
    assert!(body(res).await.contains("entry number 12"));
}

#[actix_web::test]
async fn post_page_shows_the_post() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    let post = env.post(&luke, "a post of note", None).await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/skywalker/{}/", post.id))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let page = body(res).await;
    assert!(page.contains("a post of note"));
    assert!(page.contains("skywalker"));
}

#[actix_web::test]
async fn post_page_404s_on_author_mismatch_or_bad_id() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    env.user("vader").await;
    let post = env.post(&luke, "a new hope", None).await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/vader/{}/", post.id))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/skywalker/not-a-uuid/")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unregistered_path_is_404_with_path() {
    let env = TestEnv::new();
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/no/such/page/").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(body(res).await.contains("/no/such/page/"));
}

#[actix_web::test]
async fn edit_form_is_prepopulated_for_the_author() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    let group = env.group("Rustaceans", "rust").await;
    let post = env.post(&luke, "current text", Some(group.id)).await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/skywalker/{}/edit/", post.id))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", env.token(&luke))))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let page = body(res).await;
    assert!(page.contains("current text"));
    assert!(page.contains("<option value=\"rust\" selected>"));
}

#[actix_web::test]
async fn author_edit_is_visible_everywhere() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    let post = env.post(&luke, "before edit text", None).await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/skywalker/{}/edit/", post.id))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", env.token(&luke))))
            .set_form([("text", "after edit text"), ("group", "")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/skywalker/{}/", post.id));

    let post_page = format!("/skywalker/{}/", post.id);
    for uri in ["/", "/skywalker/", post_page.as_str()] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let page = body(res).await;
        assert!(page.contains("after edit text"), "stale text on {uri}");
        assert!(!page.contains("before edit text"), "stale text on {uri}");
    }
}

#[actix_web::test]
async fn foreign_edit_is_a_silent_redirect() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    let vader = env.user("vader").await;
    let post = env.post(&luke, "original text", None).await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/skywalker/{}/edit/", post.id))
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", env.token(&vader)),
            ))
            .set_form([("text", "hijacked"), ("group", "")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/skywalker/{}/", post.id));

    let unchanged = env.state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(unchanged.text, "original text");
}

#[actix_web::test]
async fn edit_with_empty_text_rerenders_without_saving() {
    let env = TestEnv::new();
    let luke = env.user("skywalker").await;
    let post = env.post(&luke, "original text", None).await;
    let app = service!(env);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/skywalker/{}/edit/", post.id))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", env.token(&luke))))
            .set_form([("text", ""), ("group", "")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(body(res).await.contains("Enter the post text."));

    let unchanged = env.state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(unchanged.text, "original text");
}
