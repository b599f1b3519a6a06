use axum::{routing::any_service, Router};
use http_body_util::BodyExt; // for .collect
use hyper::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tower::ServiceExt; // for .oneshot

use products_mcp_gateway::infra::boot;
use products_mcp_gateway::infra::config::Config;
use products_mcp_gateway::infra::runtime::mcp_transport;

fn post(body: &Value, session_id: Option<&str>) -> Request<axum::body::Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(sid) = session_id {
        builder = builder.header("MCP-Session-Id", sid);
    }
    builder.body(axum::body::Body::from(body.to_string())).unwrap()
}

async fn sse_json(resp: hyper::Response<axum::body::Body>) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let s = String::from_utf8_lossy(&bytes);
    s.lines()
        .find_map(|line| line.strip_prefix("data: ").map(|d| d.to_string()))
        .and_then(|d| serde_json::from_str::<Value>(&d).ok())
        .expect("Did not find an rpcResponse in the SSE body")
}

#[tokio::test]
async fn initialize_list_and_call_get_products_over_streamable_http() {
    let upstream = httpmock::MockServer::start();
    upstream.mock(|when, then| {
        when.method(httpmock::Method::GET)
            .path("/products/search")
            .query_param("q", "phone");
        then.status(200).json_body(json!({
            "products": [{"id": 1, "title": "iPhone 9", "price": 549}],
            "total": 1, "skip": 0, "limit": 1
        }));
    });

    let mut cfg = Config::default();
    cfg.upstream.base_url = upstream.base_url();
    let factory = boot::make_factory(boot::build_executor(&cfg).unwrap());

    let session_mgr = Arc::new(mcp_transport::LocalSessionManager::default());
    let svc = mcp_transport::make_streamable_http_service(factory, session_mgr);
    let app = Router::new().route_service("/mcp", any_service(svc));

    // initialize
    let init = json!({
        "jsonrpc":"2.0","id":1,"method":"initialize",
        "params":{ "protocolVersion":"2025-03-26","capabilities":{},"clientInfo":{"name":"test","version":"0.1"} }
    });
    let init_res = app.clone().oneshot(post(&init, None)).await.unwrap();
    assert!(init_res.status().is_success());
    let session_id = init_res
        .headers()
        .get("MCP-Session-Id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();

    // notifications/initialized
    let initialized = json!({"jsonrpc":"2.0","method":"notifications/initialized","params":{}});
    let res = app.clone().oneshot(post(&initialized, Some(&session_id))).await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    // tools/list
    let list = json!({"jsonrpc":"2.0","id":2,"method":"tools/list","params":{}});
    let list_res = timeout(Duration::from_secs(20), app.clone().oneshot(post(&list, Some(&session_id))))
        .await
        .unwrap()
        .unwrap();
    assert!(list_res.status().is_success());
    let listed = sse_json(list_res).await;
    let tools = listed["result"]["tools"].as_array().unwrap();
    assert_eq!(tools[0]["name"], "get_products");
    assert_eq!(tools[0]["inputSchema"]["properties"]["limit"]["default"], 10.0);

    // tools/call
    let call = json!({
        "jsonrpc":"2.0","id":3,"method":"tools/call",
        "params": {"name":"get_products","arguments":{"q":"phone","category":"ignored"}}
    });
    let call_res = app.clone().oneshot(post(&call, Some(&session_id))).await.unwrap();
    assert!(call_res.status().is_success());
    let v = sse_json(call_res).await;
    let text = v["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Products Results:"));
    assert!(text.contains("iPhone 9"));
    assert_ne!(v["result"]["isError"], true);
}
