//! Nested routers, an auth step and health checks.
//!
//! Run with:
//!   cargo run --example basic -- --port 8080
//!
//! Try:
//!   curl http://localhost:8080/users
//!   curl 'http://localhost:8080/users/42?expand=addresses'
//!   curl -H 'authorization: demo' http://localhost:8080/companies/7
//!   curl http://localhost:8080/companies/7          # 401
//!   curl http://localhost:8080/nowhere              # 404
//!   curl http://localhost:8080/healthz

use http::StatusCode;
use strand::{chain, health, HttpStream, Next, Request, Router, Server, ServerConfig};

type Req = Request<HttpStream>;
type Nxt = Next<HttpStream>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let users = Router::new()
        .get("/", chain![list_users])
        .get("/{id}", chain![get_user]);

    let companies = Router::new()
        .get("/{id}", chain![get_company]);

    let app = Router::new()
        .mount("/users", chain![users])
        .mount("/companies", chain![auth, companies])
        .get("/healthz", chain![health::liveness::<HttpStream>])
        .get("/readyz", chain![health::readiness::<HttpStream>]);

    if let Err(e) = Server::from_config(&config).serve(app).await {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}

// Lets the request through when an `authorization` header is present.
fn auth(req: Req, next: Nxt) {
    if req.header("authorization").is_some() {
        next.next();
        return;
    }
    req.stream().respond(StatusCode::UNAUTHORIZED);
    next.error("Unauthorized");
}

// GET /users
fn list_users(req: Req, next: Nxt) {
    req.stream().write("inside users router");
    next.complete()
}

// GET /users/{id}
fn get_user(req: Req, next: Nxt) {
    let id = req.param("id").unwrap_or("unknown").to_owned();
    let expand = req.query_param("expand").unwrap_or("none").to_owned();
    req.stream().write(format!(r#"{{"id":"{id}","expand":"{expand}"}}"#));
    next.complete()
}

// GET /companies/{id}
//
// Finishes after a simulated lookup on another task.
fn get_company(req: Req, next: Nxt) {
    let id = req.param("id").unwrap_or("unknown").to_owned();
    let stream = req.stream().clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        stream.write(format!("inside company router: {id}"));
        next.complete();
    });
}
