use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub metrolinx_api_key: String,
    pub metrolinx_base_url: String,
    pub metrolinx_timeout_secs: u64,
    pub metrolinx_connect_timeout_secs: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("metrolinx_api_key", &"[redacted]")
            .field("metrolinx_base_url", &self.metrolinx_base_url)
            .field("metrolinx_timeout_secs", &self.metrolinx_timeout_secs)
            .field(
                "metrolinx_connect_timeout_secs",
                &self.metrolinx_connect_timeout_secs,
            )
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
