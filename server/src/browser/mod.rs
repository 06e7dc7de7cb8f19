pub mod cdp;

pub use cdp::{
    launch_browser, wait_for_network_idle, BrowserSettings, EngineSession, NetworkActivity,
    NetworkMonitor,
};
