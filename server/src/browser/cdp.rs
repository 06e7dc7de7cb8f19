use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    self, EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

const TEARDOWN_TIMEOUT: Duration = Duration::from_secs(5);
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Everything needed to start one Chromium instance. Resolved once from
/// [`crate::config::Config`] at startup.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub chrome_path: PathBuf,
    pub headless: bool,
    pub no_sandbox: bool,
    pub launch_timeout: Duration,
    pub request_timeout: Duration,
}

/// A running Chromium process plus the task pumping its CDP connection.
///
/// Owned by exactly one render. Call [`EngineSession::shutdown`] on every
/// path; if the session is dropped instead (request cancelled mid-render)
/// the child process is killed on drop and the handler task aborted.
pub struct EngineSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

/// Starts one fresh, isolated Chromium process.
pub async fn launch_browser(settings: &BrowserSettings) -> Result<EngineSession, CdpError> {
    tracing::info!("🚀 Chromium iniciando: {}", settings.chrome_path.display());

    let mut builder = BrowserConfig::builder()
        .chrome_executable(&settings.chrome_path)
        .launch_timeout(settings.launch_timeout)
        .request_timeout(settings.request_timeout)
        .args(vec![
            "--disable-dev-shm-usage",
            "--disable-gpu",
            "--font-render-hinting=none",
            "--hide-scrollbars",
            "--mute-audio",
        ]);

    if settings.no_sandbox {
        builder = builder.no_sandbox();
    }
    if !settings.headless {
        builder = builder.with_head();
    }

    let config = builder.build().map_err(|e| {
        CdpError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("BrowserConfig inválida: {}", e),
        ))
    })?;

    let (browser, mut handler) = Browser::launch(config).await?;

    // El handler debe correr en segundo plano o ningún comando CDP responde
    let handler = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::warn!("CDP event error: {:?}", e);
            }
        }
        tracing::debug!("CDP handler terminado");
    });

    tracing::info!("✅ Chromium iniciado");

    Ok(EngineSession { browser, handler })
}

impl EngineSession {
    pub async fn new_page(&self) -> Result<Page, CdpError> {
        self.browser.new_page("about:blank").await
    }

    /// Closes the browser and reaps the process. Falls back to a kill when
    /// the graceful close fails or stalls.
    pub async fn shutdown(mut self) {
        let closed = matches!(
            tokio::time::timeout(TEARDOWN_TIMEOUT, self.browser.close()).await,
            Ok(Ok(_))
        );

        if !closed {
            tracing::warn!("⚠️ Cierre de Chromium falló, forzando kill");
            if let Some(Err(e)) = self.browser.kill().await {
                tracing::warn!("Kill de Chromium falló: {}", e);
            }
        }

        match tokio::time::timeout(TEARDOWN_TIMEOUT, self.browser.wait()).await {
            Ok(Ok(status)) => tracing::debug!("Chromium finalizado: {:?}", status),
            Ok(Err(e)) => tracing::warn!("Espera de Chromium falló: {}", e),
            Err(_) => tracing::warn!("⚠️ Chromium no terminó a tiempo"),
        }
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// In-flight request bookkeeping fed by the page's network events.
#[derive(Debug)]
struct InFlightRequests {
    pending: HashSet<String>,
    last_activity: Instant,
}

impl InFlightRequests {
    fn new(now: Instant) -> Self {
        Self {
            pending: HashSet::new(),
            last_activity: now,
        }
    }

    // Redirects reuse the request id
    fn started(&mut self, request_id: &str, now: Instant) {
        self.pending.insert(request_id.to_string());
        self.last_activity = now;
    }

    fn settled(&mut self, request_id: &str, now: Instant) {
        self.pending.remove(request_id);
        self.last_activity = now;
    }

    fn snapshot(&self) -> NetworkActivity {
        NetworkActivity {
            in_flight: self.pending.len(),
            last_activity: self.last_activity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkActivity {
    pub in_flight: usize,
    pub last_activity: Instant,
}

impl NetworkActivity {
    /// No open request and nothing started or finished within `window`.
    pub fn is_idle(&self, now: Instant, window: Duration) -> bool {
        self.in_flight == 0 && now.saturating_duration_since(self.last_activity) >= window
    }
}

/// Tracks requests the page has sent but not yet finished.
///
/// Attach before injecting content, otherwise the first requests are missed.
pub struct NetworkMonitor {
    activity: watch::Receiver<NetworkActivity>,
    task: JoinHandle<()>,
}

impl NetworkMonitor {
    pub async fn attach(page: &Page) -> Result<Self, CdpError> {
        page.execute(network::EnableParams::default()).await?;

        let mut sent = page.event_listener::<EventRequestWillBeSent>().await?;
        let mut finished = page.event_listener::<EventLoadingFinished>().await?;
        let mut failed = page.event_listener::<EventLoadingFailed>().await?;

        let mut requests = InFlightRequests::new(Instant::now());
        let (tx, activity) = watch::channel(requests.snapshot());

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(event) = sent.next() => {
                        requests.started(event.request_id.inner(), Instant::now());
                    }
                    Some(event) = finished.next() => {
                        requests.settled(event.request_id.inner(), Instant::now());
                    }
                    Some(event) = failed.next() => {
                        requests.settled(event.request_id.inner(), Instant::now());
                    }
                    else => break,
                }
                tx.send_replace(requests.snapshot());
            }
        });

        Ok(Self { activity, task })
    }

    pub fn activity(&self) -> NetworkActivity {
        *self.activity.borrow()
    }
}

impl Drop for NetworkMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentSnapshot {
    ready_state: String,
    fonts_loaded: bool,
}

const DOCUMENT_STATE_SCRIPT: &str = r#"
    (() => ({
        readyState: document.readyState,
        fontsLoaded: !document.fonts || document.fonts.status === 'loaded',
    }))()
"#;

/// Returns once the document is complete, fonts are loaded and the monitor
/// has seen no open request for `idle_window` without interruption.
///
/// Unbounded on its own; callers wrap it in a deadline.
pub async fn wait_for_network_idle(
    page: &Page,
    monitor: &NetworkMonitor,
    idle_window: Duration,
) -> Result<(), CdpError> {
    tracing::debug!("⏳ Esperando inactividad de red...");

    let mut quiet_since: Option<Instant> = None;

    loop {
        let document_ready = page
            .evaluate(DOCUMENT_STATE_SCRIPT)
            .await?
            .into_value::<DocumentSnapshot>()
            .map(|s| s.ready_state == "complete" && s.fonts_loaded)
            .unwrap_or(false);

        let network = monitor.activity();
        let now = Instant::now();

        if document_ready && network.in_flight == 0 {
            let since = *quiet_since.get_or_insert(now);
            if now.duration_since(since) >= idle_window && network.is_idle(now, idle_window) {
                tracing::debug!("✅ Red inactiva");
                return Ok(());
            }
        } else {
            if network.in_flight > 0 {
                tracing::trace!("{} peticiones en curso", network.in_flight);
            }
            quiet_since = None;
        }

        tokio::time::sleep(IDLE_POLL_INTERVAL).await;
    }
}
