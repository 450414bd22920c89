//! Print what runs for every route of a small app.
//!
//! Run with:
//!   RUST_LOG=trace cargo run --example inspect

use routestack::{App, Method, Request, Response, RouteDef, Router};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let users = Router::new()
        .param("id", load_user)
        .route("/", RouteDef::new().get(list_users).post(validate).post(create_user))
        .on(Method::Get, "/:id", get_user)
        .on(Method::Delete, "/:id", delete_user);

    let app = App::new()
        .middleware(request_id)
        .on(Method::Get, "/healthz", liveness)
        .middleware(authenticate)
        .nest("/api/users", users);

    let index = match routestack::index(&app, false) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("cannot inspect app: {e}");
            return;
        }
    };

    println!("{index}");
    for route in index.iter() {
        println!("{route}");
    }

    if let Some(route) = index.find("deleteapiusersid") {
        match serde_json::to_string_pretty(route) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("cannot serialize route: {e}"),
        }
    }
}

async fn request_id(_req: Request) -> Response { Response::text("") }
async fn authenticate(_req: Request) -> Response { Response::text("") }
async fn liveness(_req: Request) -> Response { Response::text("ok") }
async fn load_user(_req: Request) -> Response { Response::text("") }
async fn list_users(_req: Request) -> Response { Response::json(br#"[]"#.to_vec()) }
async fn validate(_req: Request) -> Response { Response::text("") }
async fn create_user(_req: Request) -> Response { Response::json(br#"{"id":"99"}"#.to_vec()) }
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
}
async fn delete_user(_req: Request) -> Response { Response::text("") }
