//! Flattening behaviour over the public API.

use regex::Regex;
use routestack::path::normalize;
use routestack::{App, Error, Method, Request, Response, Route, RouteDef, RouteIndex, Router, named};

async fn auth(_: Request) -> Response { Response::text("auth") }
async fn m1(_: Request) -> Response { Response::text("m1") }
async fn cors(_: Request) -> Response { Response::text("cors") }
async fn audit(_: Request) -> Response { Response::text("audit") }
async fn load_account(_: Request) -> Response { Response::text("account") }
async fn list_users(_: Request) -> Response { Response::text("users") }
async fn get_a(_: Request) -> Response { Response::text("get a") }
async fn post_a(_: Request) -> Response { Response::text("post a") }
async fn validate(_: Request) -> Response { Response::text("valid") }
async fn show(_: Request) -> Response { Response::text("show") }

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn names(route: &Route) -> Vec<&str> {
    route.handler_names().collect()
}

fn tuples(index: &RouteIndex) -> Vec<(Method, String, String, Vec<String>)> {
    index.iter()
        .map(|r| {
            (
                r.method(),
                r.path().to_owned(),
                r.id().to_owned(),
                r.handler_names().map(str::to_owned).collect(),
            )
        })
        .collect()
}

fn sample_app() -> App {
    let accounts = Router::new()
        .param("account", load_account)
        .middleware(audit)
        .route("/:account", RouteDef::new().get(show).put(validate).put(show));

    let api = Router::new()
        .middleware(cors)
        .on(Method::Get, "/users", list_users)
        .nest("/accounts", accounts);

    App::new()
        .middleware(auth)
        .nest("/api/v1", api)
        .on(Method::Get, "/health", show)
}

#[test]
fn global_middleware_and_mounted_router() {
    init_tracing();
    let app = App::new()
        .middleware(auth)
        .nest("/api", Router::new().on(Method::Get, "/users", list_users));

    let index = RouteIndex::build(&app).unwrap();

    assert_eq!(index.len(), 1);
    let route = &index.routes()[0];
    assert_eq!(route.method(), Method::Get);
    assert_eq!(route.path(), "/api/users");
    assert_eq!(route.id(), "getapiusers");
    assert_eq!(names(route), ["auth", "list_users"]);
}

#[test]
fn sibling_methods_share_middleware() {
    let router = Router::new()
        .middleware(m1)
        .on(Method::Get, "/a", get_a)
        .on(Method::Post, "/a", post_a);

    let index = RouteIndex::build(&router).unwrap();

    assert_eq!(index.summaries(), ["GET /a", "POST /a"]);
    assert_eq!(names(index.find("geta").unwrap()), ["m1", "get_a"]);
    assert_eq!(names(index.find("posta").unwrap()), ["m1", "post_a"]);

    let shared = &index.routes()[0].stack()[0];
    assert!(shared.ptr_eq(&index.routes()[1].stack()[0]));
}

#[test]
fn empty_roots_yield_empty_indexes() {
    let index = RouteIndex::build(&Router::new()).unwrap();
    assert!(index.is_empty());
    assert!(index.find("anything").is_none());
    assert!(index.find_all(&Regex::new("").unwrap()).is_empty());

    // Middleware alone produces no routes.
    let app = App::new().middleware(auth);
    assert!(RouteIndex::build(&app).unwrap().is_empty());
}

#[test]
fn app_without_router_is_invalid_input() {
    let err = RouteIndex::build(&App::new()).unwrap_err();
    assert_eq!(err, Error::InvalidInput);
    assert_eq!(err.to_string(), "input must be an app or router");
}

#[test]
fn unnested_paths_are_normalized_from_root() {
    let router = Router::new()
        .on(Method::Get, "users", show)
        .on(Method::Get, "/a//b/", show)
        .on(Method::Get, "/a/./c/../d", show);

    let index = RouteIndex::build(&router).unwrap();
    let paths: Vec<&str> = index.iter().map(Route::path).collect();
    assert_eq!(paths, ["/users", "/a/b/", "/a/d"]);
    for (route, suffix) in index.iter().zip(["users", "/a//b/", "/a/./c/../d"]) {
        assert_eq!(route.path(), normalize(&format!("/{suffix}")));
    }
}

#[test]
fn full_tree_in_execution_order() {
    let index = RouteIndex::build(&sample_app()).unwrap();

    assert_eq!(
        index.summaries(),
        [
            "GET /api/v1/users",
            "GET /api/v1/accounts/:account",
            "PUT /api/v1/accounts/:account",
            "GET /health",
        ]
    );

    assert_eq!(names(index.find("getapiv1users").unwrap()), ["auth", "cors", "list_users"]);
    assert_eq!(
        names(index.find("getapiv1accountsaccount").unwrap()),
        ["auth", "cors", "load_account", "audit", "show"]
    );
    assert_eq!(
        names(index.find("putapiv1accountsaccount").unwrap()),
        ["auth", "cors", "load_account", "audit", "validate", "show"]
    );
    assert_eq!(names(index.find("gethealth").unwrap()), ["auth", "show"]);
}

#[test]
fn ancestor_middleware_is_a_common_prefix() {
    let index = RouteIndex::build(&sample_app()).unwrap();
    let under_api = index.find_all(&Regex::new("^[a-z]+apiv1").unwrap());
    assert_eq!(under_api.len(), 3);

    let first = &under_api[0].stack()[..2];
    for route in &under_api {
        assert_eq!(route.handler_names().take(2).collect::<Vec<_>>(), ["auth", "cors"]);
        for (a, b) in route.stack()[..2].iter().zip(first) {
            assert!(a.ptr_eq(b));
        }
    }
}

#[test]
fn find_and_find_all() {
    let router = Router::new()
        .on(Method::Get, "/a-b", show)
        .on(Method::Get, "/ab", list_users)
        .on(Method::Post, "/ab", list_users);
    let index = RouteIndex::build(&router).unwrap();

    // `/a-b` and `/ab` collapse to the same id; the first one wins.
    assert_eq!(index.find("getab").unwrap().path(), "/a-b");
    let all = index.find_all("getab");
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|r| r.id() == "getab"));
    assert_eq!(index.find_all(&"getab".to_owned()).len(), 2);

    let posts = Regex::new("^post").unwrap();
    assert_eq!(index.find(&posts).unwrap().method(), Method::Post);
    assert_eq!(index.find_all(&posts).len(), 1);

    assert!(index.find("deleteab").is_none());
    assert!(index.find_all(&Regex::new("^put").unwrap()).is_empty());
    assert!(index.find_all(&Regex::new("").unwrap()).len() <= index.len());
}

#[test]
fn rebuilding_is_idempotent() {
    let app = sample_app();
    let a = RouteIndex::build(&app).unwrap();
    let b = RouteIndex::build(&app).unwrap();
    assert_eq!(tuples(&a), tuples(&b));
}

#[test]
fn shared_router_mounted_twice() {
    let shared = std::sync::Arc::new(Router::new().middleware(audit).on(Method::Get, "/x", show));
    let router = Router::new()
        .nest_shared("/one", std::sync::Arc::clone(&shared))
        .middleware(auth)
        .nest_shared("/two", shared);

    let index = RouteIndex::build(&router).unwrap();
    assert_eq!(names(index.find("getonex").unwrap()), ["audit", "show"]);
    assert_eq!(names(index.find("gettwox").unwrap()), ["auth", "audit", "show"]);

    let one = index.find("getonex").unwrap().handler("audit").unwrap();
    let two = index.find("gettwox").unwrap().handler("audit").unwrap();
    assert!(one.ptr_eq(two));
}

#[test]
fn path_scoped_middleware_joins_the_branch() {
    let router = Router::new()
        .middleware_at("/admin", named("admin_only", auth))
        .on(Method::Get, "/public", show);

    let index = RouteIndex::build(&router).unwrap();
    let route = index.find("getpublic").unwrap();
    assert_eq!(names(route), ["admin_only", "show"]);
    assert_eq!(route.stack()[0].pattern(), Some(r"^\/admin\/?(?=\/|$)"));
}

#[test]
fn parameterized_mount_paths_stay_strings() {
    let router = Router::new()
        .nest("/users/:id", Router::new().on(Method::Get, "/posts", show));

    let index = RouteIndex::build(&router).unwrap();
    assert_eq!(index.routes()[0].path(), "/users/(?:([/]+?))/posts");
}

#[test]
fn json_and_display_views() {
    let app = App::new()
        .middleware(auth)
        .nest("/api", Router::new().on(Method::Get, "/users", list_users));
    let index = RouteIndex::build(&app).unwrap();

    let expected = serde_json::json!([{
        "id": "getapiusers",
        "path": "/api/users",
        "method": "GET",
        "stack": ["auth", "list_users"],
    }]);
    assert_eq!(index.to_json(), expected);
    assert_eq!(serde_json::to_value(&index).unwrap(), expected);

    assert_eq!(index.to_string(), "RouteIndex[\n  GET /api/users\n]");
    assert_eq!(index.routes()[0].to_string(), "GET /api/users [auth, list_users]");
}
