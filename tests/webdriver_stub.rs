// tests/webdriver_stub.rs
//
// WebDriverFetcher against a local HTTP endpoint that answers like
// chromedriver: `{"value": ...}` envelopes, W3C error codes.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};
use vahan_dash::collect::PageFetcher;
use vahan_dash::error::CollectError;
use vahan_dash::portal::{form, Category};
use vahan_dash::store::SnapshotKey;
use vahan_dash::webdriver::{DriverConfig, WebDriver, WebDriverFetcher};

const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Serve `handler(method, path, body) -> (status, value)` on a free port.
fn serve<H>(handler: H) -> String
where
    H: Fn(&str, &str, &Value) -> (u16, Value) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            reply(stream, &handler);
        }
    });
    url
}

fn reply<H>(mut stream: TcpStream, handler: &H)
where
    H: Fn(&str, &str, &Value) -> (u16, Value),
{
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut len = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap() == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            if k.eq_ignore_ascii_case("content-length") {
                len = v.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let (status, value) = handler(&method, &path, &body);
    let payload = json!({ "value": value }).to_string();
    write!(
        stream,
        "HTTP/1.1 {status} OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    )
    .unwrap();
}

fn error(code: &str, message: &str) -> (u16, Value) {
    (404, json!({ "error": code, "message": message }))
}

fn element(id: &str) -> (u16, Value) {
    (200, json!({ ELEMENT_KEY: id }))
}

fn config(driver_url: String) -> DriverConfig {
    DriverConfig {
        driver_url,
        portal_url: "http://portal.invalid/report".into(),
        headless: true,
        control_wait: Duration::from_millis(100),
        results_wait: Duration::from_millis(300),
        settle: Duration::ZERO,
    }
}

fn key() -> SnapshotKey {
    SnapshotKey::new(Category::Manufacturer, 2024)
}

/// The session plumbing every scenario shares; `element_for` decides what each
/// XPath lookup finds.
fn portal<F>(element_for: F, refreshed: Arc<AtomicBool>) -> String
where
    F: Fn(&str, bool) -> (u16, Value) + Send + 'static,
{
    serve(move |method, path, body| match (method, path) {
        ("POST", "/session") => (200, json!({ "sessionId": "s1", "capabilities": {} })),
        ("DELETE", "/session/s1") => (200, Value::Null),
        ("POST", "/session/s1/url") => (200, Value::Null),
        ("POST", "/session/s1/element") => {
            let xpath = body["value"].as_str().unwrap_or_default();
            element_for(xpath, refreshed.load(Ordering::SeqCst))
        }
        ("POST", "/session/s1/element/refresh/click") => {
            refreshed.store(true, Ordering::SeqCst);
            (200, Value::Null)
        }
        ("POST", p) if p.ends_with("/click") => (200, Value::Null),
        ("GET", "/session/s1/element/old-row/name") => {
            if refreshed.load(Ordering::SeqCst) {
                error("stale element reference", "element is not attached to the page document")
            } else {
                (200, json!("tr"))
            }
        }
        ("GET", "/session/s1/source") => (200, json!("<html><table>fresh</table></html>")),
        _ => error("unknown command", path),
    })
}

#[test]
fn command_error_is_decoded_into_connectivity() {
    let url = serve(|_, _, _| {
        (500, json!({ "error": "session not created", "message": "Chrome failed to start\nstacktrace..." }))
    });
    match WebDriver::connect(&url, true) {
        Err(CollectError::Connectivity(msg)) => {
            assert_eq!(msg, "session not created: Chrome failed to start");
        }
        Err(other) => panic!("unexpected {other:?}"),
        Ok(_) => panic!("connected to a failing driver"),
    }
}

#[test]
fn nothing_listening_is_connectivity() {
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let err = WebDriver::connect(&format!("http://127.0.0.1:{port}"), true).err().unwrap();
    assert!(matches!(&err, CollectError::Connectivity(m) if m.contains("no WebDriver at")), "{err:?}");
}

#[test]
fn missing_control_is_portal_layout() {
    let url = portal(|_, _| error("no such element", "not found"), Arc::default());
    let mut fetcher = WebDriverFetcher::new(config(url));

    match fetcher.fetch(&key()) {
        Err(CollectError::PortalLayout { what, xpath }) => {
            assert_eq!(what, "year menu");
            assert_eq!(xpath, form::YEAR_MENU);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn results_never_rendered_is_timeout() {
    let url = portal(
        |xpath, _| if xpath == form::RESULTS_TABLE { error("no such element", "") } else { element("ctl") },
        Arc::default(),
    );
    let mut fetcher = WebDriverFetcher::new(config(url));

    let err = fetcher.fetch(&key()).unwrap_err();
    assert!(matches!(err, CollectError::Timeout(_)), "{err:?}");
    assert!(err.is_retryable());
}

#[test]
fn waits_for_previous_results_to_go_stale() {
    let refreshed = Arc::new(AtomicBool::new(false));
    let url = portal(
        |xpath, refreshed| match xpath {
            form::REFRESH_BUTTON => element("refresh"),
            form::RESULTS_TABLE if refreshed => element("new-row"),
            form::RESULTS_TABLE => element("old-row"),
            _ => element("ctl"),
        },
        Arc::clone(&refreshed),
    );
    let mut fetcher = WebDriverFetcher::new(config(url));

    let markup = fetcher.fetch(&key()).unwrap();
    assert!(refreshed.load(Ordering::SeqCst));
    assert!(markup.contains("fresh"));
}

#[test]
fn previous_results_never_replaced_is_timeout() {
    // Refresh click is swallowed: the old rows stay attached.
    let url = portal(
        |xpath, _| match xpath {
            form::RESULTS_TABLE => element("old-row"),
            _ => element("ctl"),
        },
        Arc::default(),
    );
    let mut fetcher = WebDriverFetcher::new(config(url));

    match fetcher.fetch(&key()) {
        Err(CollectError::Timeout(msg)) => assert!(msg.contains("previous table"), "{msg}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn connectivity_failure_drops_the_session() {
    let sessions = Arc::new(AtomicUsize::new(0));
    let deletes = Arc::new(AtomicUsize::new(0));
    let (s, d) = (Arc::clone(&sessions), Arc::clone(&deletes));
    let url = serve(move |method, path, _| match (method, path) {
        ("POST", "/session") => {
            s.fetch_add(1, Ordering::SeqCst);
            (200, json!({ "sessionId": "s1", "capabilities": {} }))
        }
        ("DELETE", "/session/s1") => {
            d.fetch_add(1, Ordering::SeqCst);
            (200, Value::Null)
        }
        _ => (500, json!({ "error": "unknown error", "message": "chrome not reachable" })),
    });
    let mut fetcher = WebDriverFetcher::new(config(url));

    for _ in 0..2 {
        let err = fetcher.fetch(&key()).unwrap_err();
        assert!(matches!(&err, CollectError::Connectivity(m) if m.contains("chrome not reachable")), "{err:?}");
    }
    assert_eq!(sessions.load(Ordering::SeqCst), 2);
    assert_eq!(deletes.load(Ordering::SeqCst), 2);
}
