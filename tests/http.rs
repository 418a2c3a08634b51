use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct TodayResponse {
    date: String,
    glasses: u32,
    goal: u32,
    max_goal: u32,
}

#[derive(Debug, Deserialize)]
struct LogResponse {
    outcome: String,
    today: TodayResponse,
}

#[derive(Debug, Deserialize)]
struct Buttons {
    next_enabled: bool,
}

#[derive(Debug, Deserialize)]
struct Frame {
    rows: Vec<serde_json::Value>,
    range_label: String,
    buttons: Option<Buttons>,
}

#[derive(Debug, Deserialize)]
struct ViewResponse {
    period: String,
    offset: i32,
    frame: Frame,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_dir() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("water_tracker_http_{}_{}", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/today")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_dir = unique_data_dir();
    let child = Command::new(env!("CARGO_BIN_EXE_water_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", data_dir)
        .env("NAV_COOLDOWN_MS", "0")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn get_json<T: serde::de::DeserializeOwned>(client: &Client, url: String) -> T {
    client.get(url).send().await.unwrap().json().await.unwrap()
}

#[tokio::test]
async fn http_log_updates_today() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: TodayResponse = get_json(&client, format!("{}/api/today", server.base_url)).await;

    let response = client
        .post(format!("{}/api/log", server.base_url))
        .json(&serde_json::json!({ "amount": 1 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let logged: LogResponse = response.json().await.unwrap();

    let today: TodayResponse = get_json(&client, format!("{}/api/today", server.base_url)).await;
    let expected = (before.glasses + 1).min(before.max_goal);
    assert_eq!(today.glasses, expected);
    assert_eq!(logged.today.glasses, expected);
    assert!(!logged.outcome.is_empty());
    assert!(today.goal >= 1);
    assert!(!today.date.is_empty());
}

#[tokio::test]
async fn http_log_rejects_zero_amount() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/log", server.base_url))
        .json(&serde_json::json!({ "amount": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn http_navigation_and_period_switch() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    client
        .post(format!("{}/api/period", server.base_url))
        .json(&serde_json::json!({ "period": "week" }))
        .send()
        .await
        .unwrap();

    let forward: ViewResponse = client
        .post(format!("{}/api/navigate", server.base_url))
        .json(&serde_json::json!({ "direction": 1 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(forward.offset, 0);

    let back: ViewResponse = client
        .post(format!("{}/api/navigate", server.base_url))
        .json(&serde_json::json!({ "direction": -1 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(back.offset, -1);
    assert_eq!(back.frame.rows.len(), 7);
    assert!(back.frame.buttons.expect("buttons").next_enabled);

    let month: ViewResponse = client
        .post(format!("{}/api/period", server.base_url))
        .json(&serde_json::json!({ "period": "month" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(month.period, "month");
    assert_eq!(month.offset, 0);
    assert_eq!(month.frame.rows.len(), 4);
    assert!(!month.frame.range_label.is_empty());
}

#[tokio::test]
async fn http_invalid_import_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: TodayResponse = get_json(&client, format!("{}/api/today", server.base_url)).await;
    let response = client
        .post(format!("{}/api/import", server.base_url))
        .body(r#"{"historicalData":{"2020-01-01":{"glasses":25}},"appVersion":"0.1.0"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert!(response.text().await.unwrap().contains("2020-01-01"));

    let after: TodayResponse = get_json(&client, format!("{}/api/today", server.base_url)).await;
    assert_eq!(after.glasses, before.glasses);
}

fn no_redirect_client() -> Client {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn http_quick_add_logs_and_redirects_home() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = no_redirect_client();

    let before: TodayResponse = get_json(&client, format!("{}/api/today", server.base_url)).await;
    let response = client
        .get(format!("{}/quick-add?amount=2", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get("location").and_then(|value| value.to_str().ok()),
        Some("/")
    );

    let today: TodayResponse = get_json(&client, format!("{}/api/today", server.base_url)).await;
    assert_eq!(today.glasses, (before.glasses + 2).min(before.max_goal));
}

#[tokio::test]
async fn http_quick_add_without_amount_logs_one_cup() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = no_redirect_client();

    client
        .post(format!("{}/api/reset-day", server.base_url))
        .send()
        .await
        .unwrap();

    let response = client
        .get(format!("{}/quick-add", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let today: TodayResponse = get_json(&client, format!("{}/api/today", server.base_url)).await;
    assert_eq!(today.glasses, 1);
}

#[tokio::test]
async fn http_quick_add_rejects_bad_amounts() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = no_redirect_client();

    let before: TodayResponse = get_json(&client, format!("{}/api/today", server.base_url)).await;
    for amount in ["abc", "0", "-1"] {
        let response = client
            .get(format!("{}/quick-add?amount={amount}", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "amount={amount}");
    }

    let after: TodayResponse = get_json(&client, format!("{}/api/today", server.base_url)).await;
    assert_eq!(after.glasses, before.glasses);
}
