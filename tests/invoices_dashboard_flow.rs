use serde_json::json;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread;

/// Minimal canned-response HTTP backend. Each route is
/// ("METHOD /api/path", status, body); anything else answers 404.
fn spawn_stub_backend(routes: Vec<(String, u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub backend");
    let addr = listener.local_addr().expect("stub addr");
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            handle_connection(stream, &routes);
        }
    });
    format!("http://{}/api", addr)
}

fn handle_connection(mut stream: TcpStream, routes: &[(String, u16, String)]) {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");

    // Drain headers, honoring content-length so the body is consumed.
    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).is_err() || header.trim().is_empty() {
            break;
        }
        if let Some(value) = header.to_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    if content_length > 0 {
        let mut body = vec![0u8; content_length];
        let _ = reader.read_exact(&mut body);
    }

    let key = format!("{} {}", method, path);
    let (status, body) = routes
        .iter()
        .find(|(route, _, _)| *route == key)
        .map(|(_, status, body)| (*status, body.clone()))
        .unwrap_or((404, r#"{"message":"not found"}"#.to_string()));

    let reason = match status {
        200 => "OK",
        201 => "Created",
        404 => "Not Found",
        _ => "Error",
    };
    let _ = write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.flush();
}

fn spawn_sidecar(api_base: &str) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_lmsadmind");
    let mut child = Command::new(exe)
        .env("LMSADMIND_API_BASE", api_base)
        .env("LMSADMIND_TIMEOUT_SECS", "5")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn lmsadmind");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn eight_invoices() -> String {
    let items: Vec<serde_json::Value> = (0..8)
        .map(|i| {
            json!({
                "_id": format!("INV-{i}"),
                "learner": {
                    "firstName": format!("Learner{i}"),
                    "lastName": if i == 3 { "Mensah" } else { "Owusu" },
                    "email": format!("learner{i}@lms.test")
                },
                "amount": 100 + i,
                "status": if i % 2 == 0 { "pending" } else { "paid" },
                "createdAt": "2026-08-01"
            })
        })
        .collect();
    json!({ "success": true, "data": items }).to_string()
}

#[test]
fn load_paginate_search_and_clamp() {
    let base = spawn_stub_backend(vec![(
        "GET /api/invoices".to_string(),
        200,
        eight_invoices(),
    )]);
    let (_child, mut stdin, mut reader) = spawn_sidecar(&base);

    let loaded = request_ok(&mut stdin, &mut reader, "1", "invoices.load", json!({}));
    assert_eq!(loaded["count"], 8);
    assert_eq!(loaded["view"]["state"], "loaded");

    let page1 = request_ok(&mut stdin, &mut reader, "2", "invoices.list", json!({}));
    assert_eq!(page1["items"].as_array().expect("items").len(), 6);
    assert_eq!(page1["total"], 8);
    assert_eq!(page1["totalPages"], 2);
    assert_eq!(page1["page"], 1);
    assert_eq!(
        page1["items"][0]["item"]["learnerName"],
        "Learner0 Owusu"
    );

    // Past-the-end page numbers clamp to the last page.
    let page2 = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "invoices.setPage",
        json!({ "page": 99 }),
    );
    assert_eq!(page2["page"], 2);
    assert_eq!(page2["items"].as_array().expect("items").len(), 2);

    let page0 = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "invoices.setPage",
        json!({ "page": 0 }),
    );
    assert_eq!(page0["page"], 1);

    // Case-insensitive substring search over learner name.
    let filtered = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "invoices.search",
        json!({ "term": "MENSAH" }),
    );
    assert_eq!(filtered["filtered"], 1);
    assert_eq!(filtered["page"], 1);
    assert_eq!(
        filtered["items"][0]["item"]["learnerName"],
        "Learner3 Mensah"
    );

    // No matches is a defined empty view, not an error.
    let none = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "invoices.search",
        json!({ "term": "no-such-learner" }),
    );
    assert_eq!(none["filtered"], 0);
    assert_eq!(none["totalPages"], 1);
    assert_eq!(none["items"].as_array().expect("items").len(), 0);
}

#[test]
fn create_prepends_and_failed_delete_leaves_collection_alone() {
    let created = json!({
        "invoice": {
            "_id": "INV-NEW",
            "learnerName": "Fresh Learner",
            "learnerEmail": "fresh@lms.test",
            "amount": 250,
            "status": "pending"
        }
    })
    .to_string();
    let base = spawn_stub_backend(vec![
        ("GET /api/invoices".to_string(), 200, eight_invoices()),
        ("POST /api/invoices".to_string(), 201, created),
        (
            "DELETE /api/invoices/INV-MISSING".to_string(),
            404,
            json!({ "errors": [{ "message": "invoice not found" }] }).to_string(),
        ),
        (
            "DELETE /api/invoices/INV-0".to_string(),
            200,
            json!({ "success": true }).to_string(),
        ),
    ]);
    let (_child, mut stdin, mut reader) = spawn_sidecar(&base);

    let _ = request_ok(&mut stdin, &mut reader, "1", "invoices.load", json!({}));

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "invoices.create",
        json!({
            "learner": "L-9",
            "paystackCallbackUrl": "https://console.lms.test/pay",
            "amount": 250
        }),
    );
    assert_eq!(created["item"]["id"], "INV-NEW");
    assert_eq!(created["view"]["total"], 9);
    assert_eq!(created["view"]["items"][0]["item"]["id"], "INV-NEW");

    // Deleting an id the server no longer knows reports the server message
    // and changes nothing locally.
    let missing = request(
        &mut stdin,
        &mut reader,
        "3",
        "invoices.delete",
        json!({ "id": "INV-MISSING" }),
    );
    assert_eq!(missing["ok"], false);
    assert_eq!(missing["error"]["code"], "request_failed");
    assert_eq!(missing["error"]["details"]["status"], 404);
    assert_eq!(
        missing["error"]["message"],
        "request failed (404): invoice not found"
    );

    let after = request_ok(&mut stdin, &mut reader, "4", "invoices.list", json!({}));
    assert_eq!(after["total"], 9);

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "invoices.delete",
        json!({ "id": "INV-0" }),
    );
    assert_eq!(deleted["view"]["total"], 8);
}
