// src/webdriver.rs
//! Minimal W3C WebDriver client (the JSON-over-HTTP protocol chromedriver
//! speaks) and the page fetcher built on it.
//!
//! Only the handful of commands the report form needs: new session, navigate,
//! find element by XPath, click, page source, delete session.

use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::{json, Value};

use crate::collect::PageFetcher;
use crate::config::consts::{HTTP_TIMEOUT_SECS, POLL_INTERVAL_MS};
use crate::config::options::CollectOptions;
use crate::error::CollectError;
use crate::portal::form::{self, Step};
use crate::store::SnapshotKey;

/// Element reference key fixed by W3C WebDriver.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Command failures the driver reports; transport failures are plain strings.
#[derive(Debug)]
enum Wire {
    Transport(String),
    Command { error: String, message: String },
}

impl Wire {
    fn is(&self, code: &str) -> bool {
        matches!(self, Wire::Command { error, .. } if error == code)
    }

    /// Element exists but can't take the click yet (overlay, animation, re-render).
    fn is_transient_click(&self) -> bool {
        self.is("element not interactable")
            || self.is("element click intercepted")
            || self.is("stale element reference")
    }
}

impl From<Wire> for CollectError {
    fn from(w: Wire) -> Self {
        match w {
            Wire::Transport(msg) => CollectError::Connectivity(msg),
            Wire::Command { error, message } => {
                let first = message.lines().next().unwrap_or_default();
                CollectError::Connectivity(format!("{error}: {first}"))
            }
        }
    }
}

pub struct WebDriver {
    http: Client,
    base: String,
    session: String,
}

impl WebDriver {
    /// Open a Chrome session on a running chromedriver.
    pub fn connect(driver_url: &str, headless: bool) -> Result<Self, CollectError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| CollectError::Connectivity(e.to_string()))?;

        let base = driver_url.trim_end_matches('/').to_string();

        let mut args = vec!["--window-size=1920,1080", "--disable-gpu", "--no-sandbox"];
        if headless {
            args.push("--headless=new");
        }
        let caps = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        });

        let value = send(&http, Method::POST, &format!("{base}/session"), Some(caps))
            .map_err(|e| match e {
                Wire::Transport(msg) => CollectError::Connectivity(format!("no WebDriver at {base}: {msg}")),
                other => other.into(),
            })?;

        let session = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| CollectError::Connectivity("new session reply without sessionId".into()))?
            .to_string();

        logd!("WebDriver: session {} on {}", session, base);
        Ok(Self { http, base, session })
    }

    fn cmd(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, Wire> {
        let url = format!("{}/session/{}{}", self.base, self.session, path);
        send(&self.http, method, &url, body)
    }

    pub fn navigate(&self, url: &str) -> Result<(), CollectError> {
        self.cmd(Method::POST, "/url", Some(json!({ "url": url })))?;
        Ok(())
    }

    fn find(&self, xpath: &str) -> Result<Option<String>, Wire> {
        match self.cmd(Method::POST, "/element", Some(json!({ "using": "xpath", "value": xpath }))) {
            Ok(v) => Ok(v.get(ELEMENT_KEY).and_then(Value::as_str).map(str::to_string)),
            Err(e) if e.is("no such element") => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn click(&self, element: &str) -> Result<(), Wire> {
        self.cmd(Method::POST, &format!("/element/{element}/click"), Some(json!({})))?;
        Ok(())
    }

    pub fn source(&self) -> Result<String, CollectError> {
        let v = self.cmd(Method::GET, "/source", None)?;
        v.as_str()
            .map(str::to_string)
            .ok_or_else(|| CollectError::Connectivity("page source was not a string".into()))
    }

    /// Poll until the step's element is there and takes a click.
    pub fn wait_and_click(&self, step: &Step, timeout: Duration) -> Result<(), CollectError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(el) = self.find(&step.xpath)? {
                match self.click(&el) {
                    Ok(()) => return Ok(()),
                    Err(e) if e.is_transient_click() => {}
                    Err(e) => return Err(e.into()),
                }
            }
            if Instant::now() >= deadline {
                return Err(CollectError::PortalLayout { what: step.what.clone(), xpath: step.xpath.clone() });
            }
            thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
        }
    }

    /// First element matching `xpath` right now, if any.
    pub fn find_now(&self, xpath: &str) -> Result<Option<String>, CollectError> {
        Ok(self.find(xpath)?)
    }

    /// Poll until `element` is detached from the page (the AJAX update
    /// replaced it). `false` on timeout.
    pub fn wait_stale(&self, element: &str, timeout: Duration) -> Result<bool, CollectError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.cmd(Method::GET, &format!("/element/{element}/name"), None) {
                Ok(_) => {}
                Err(e) if e.is("stale element reference") || e.is("no such element") => return Ok(true),
                Err(e) => return Err(e.into()),
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
        }
    }

    /// Poll until `xpath` matches something. `false` on timeout.
    pub fn wait_present(&self, xpath: &str, timeout: Duration) -> Result<bool, CollectError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.find(xpath)?.is_some() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
        }
    }
}

impl Drop for WebDriver {
    fn drop(&mut self) {
        let url = format!("{}/session/{}", self.base, self.session);
        match self.http.delete(&url).send() {
            Ok(_) => logd!("WebDriver: closed session {}", self.session),
            Err(e) => logw!("WebDriver: closing session {}: {}", self.session, e),
        }
    }
}

/// One round trip; unwraps the `value` envelope.
fn send(http: &Client, method: Method, url: &str, body: Option<Value>) -> Result<Value, Wire> {
    let mut req = http.request(method, url);
    if let Some(b) = body {
        req = req.json(&b);
    }
    let resp = req.send().map_err(|e| Wire::Transport(e.to_string()))?;
    let status = resp.status();
    let json: Value = resp
        .json()
        .map_err(|e| Wire::Transport(format!("bad reply ({status}): {e}")))?;
    let value = json.get("value").cloned().unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(value);
    }
    let field = |k: &str| value.get(k).and_then(Value::as_str).unwrap_or_default().to_string();
    Err(Wire::Command { error: field("error"), message: field("message") })
}

/// Timings and endpoints for one browser-driven fetcher.
#[derive(Clone, Debug)]
pub struct DriverConfig {
    pub driver_url: String,
    pub portal_url: String,
    pub headless: bool,
    pub control_wait: Duration,
    pub results_wait: Duration,
    pub settle: Duration,
}

impl From<&CollectOptions> for DriverConfig {
    fn from(o: &CollectOptions) -> Self {
        Self {
            driver_url: o.driver_url.clone(),
            portal_url: o.portal_url.clone(),
            headless: o.headless,
            control_wait: Duration::from_millis(o.control_wait_ms),
            results_wait: Duration::from_millis(o.results_wait_ms),
            settle: Duration::from_millis(o.settle_ms),
        }
    }
}

/// `PageFetcher` that drives the report form in Chrome.
/// The session is opened on first use and dropped after a connectivity
/// failure, so a retry starts from a fresh browser.
///
/// After Refresh, a results row seen before the click must go stale before
/// the page is read; otherwise the old report could be saved under the new key.
pub struct WebDriverFetcher {
    cfg: DriverConfig,
    driver: Option<WebDriver>,
}

impl WebDriverFetcher {
    pub fn new(cfg: DriverConfig) -> Self {
        Self { cfg, driver: None }
    }

    fn session(&mut self) -> Result<&WebDriver, CollectError> {
        if self.driver.is_none() {
            self.driver = Some(WebDriver::connect(&self.cfg.driver_url, self.cfg.headless)?);
        }
        self.driver
            .as_ref()
            .ok_or_else(|| CollectError::Connectivity("no browser session".into()))
    }

    fn run_form(&mut self, key: &SnapshotKey) -> Result<String, CollectError> {
        let cfg = self.cfg.clone();
        let wd = self.session()?;

        wd.navigate(&cfg.portal_url)?;
        let steps = form::steps_for(key.category, key.group, key.year);
        let Some((submit, choices)) = steps.split_last() else {
            return Err(CollectError::PortalLayout { what: "report form".into(), xpath: String::new() });
        };
        for step in choices {
            logd!("Fetch {}: {}", key, step.what);
            wd.wait_and_click(step, cfg.control_wait)?;
        }

        // Rows already on the page belong to the previous (or default) report.
        let previous = wd.find_now(form::RESULTS_TABLE)?;
        logd!("Fetch {}: {}", key, submit.what);
        wd.wait_and_click(submit, cfg.control_wait)?;

        if let Some(old) = previous {
            if !wd.wait_stale(&old, cfg.results_wait)? {
                return Err(CollectError::Timeout(format!(
                    "results for {key} did not replace the previous table within {}s",
                    cfg.results_wait.as_secs()
                )));
            }
        }

        thread::sleep(cfg.settle);
        if !wd.wait_present(form::RESULTS_TABLE, cfg.results_wait)? {
            return Err(CollectError::Timeout(format!(
                "results table for {key} not rendered within {}s",
                cfg.results_wait.as_secs()
            )));
        }
        wd.source()
    }
}

impl PageFetcher for WebDriverFetcher {
    fn fetch(&mut self, key: &SnapshotKey) -> Result<String, CollectError> {
        let res = self.run_form(key);
        if let Err(CollectError::Connectivity(_)) = &res {
            self.driver = None;
        }
        res
    }
}
