//! End to end over a real TCP socket.

use bytes::Bytes;
use http::StatusCode;
use http::header::CONTENT_TYPE;
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use ringmaster::middleware::JsonBody;
use ringmaster::{App, BoxFuture, Context, Error, Server};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};

fn greet<'a>(ctx: &'a mut Context) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        let name = ctx.param("name").unwrap_or_default().to_owned();
        let loud = ctx.query("loud").is_some();
        ctx.json(&json!({ "hello": name, "loud": loud }))
    })
}

fn store<'a>(ctx: &'a mut Context) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        let body = ctx.body().clone();
        ctx.status(StatusCode::CREATED).json(&body)
    })
}

async fn start() -> std::net::SocketAddr {
    let mut app = App::new();
    app.use_middleware(JsonBody);
    app.get("/greet/:name", greet).unwrap().post("/store", store).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = Server::from_listener(listener);
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.serve(app));
    addr
}

async fn send(addr: std::net::SocketAddr, req: http::Request<Full<Bytes>>) -> (StatusCode, Bytes) {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await.unwrap();
    tokio::spawn(conn);

    let res = sender.send_request(req).await.unwrap();
    let status = res.status();
    (status, res.into_body().collect().await.unwrap().to_bytes())
}

#[tokio::test]
async fn serves_routes_over_tcp() {
    let addr = start().await;

    let req = http::Request::get("/greet/ada?loud=1")
        .header("host", addr.to_string())
        .body(Full::new(Bytes::new()))
        .unwrap();
    let (status, body) = send(addr, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({"hello": "ada", "loud": true}));

    let req = http::Request::post("/store")
        .header("host", addr.to_string())
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(br#"{"title":"Gala","performers":[1,2]}"#)))
        .unwrap();
    let (status, body) = send(addr, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({"title": "Gala", "performers": [1, 2]}));
}

#[tokio::test]
async fn errors_over_tcp() {
    let addr = start().await;

    let req = http::Request::get("/nowhere")
        .header("host", addr.to_string())
        .body(Full::new(Bytes::new()))
        .unwrap();
    assert_eq!(send(addr, req).await, (StatusCode::NOT_FOUND, Bytes::from_static(b"Not Found")));

    let req = http::Request::post("/store")
        .header("host", addr.to_string())
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(b"{\"a\":1,}")))
        .unwrap();
    assert_eq!(send(addr, req).await, (StatusCode::BAD_REQUEST, Bytes::from_static(b"Invalid JSON")));
}
