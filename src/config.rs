use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStorage {
    File,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub state_dir: PathBuf,
    pub session_storage: SessionStorage,
    pub simulated_latency: Duration,
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            state_dir: PathBuf::from("state"),
            session_storage: SessionStorage::File,
            simulated_latency: Duration::ZERO,
            seed_demo_data: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let state_dir = base_dir.join(
            std::env::var("STATE_DIR").unwrap_or_else(|_| "state".to_string())
        );

        let session_storage = match std::env::var("SESSION_STORAGE")
            .unwrap_or_else(|_| "file".to_string())
            .to_lowercase()
            .as_str()
        {
            "file" => SessionStorage::File,
            "memory" => SessionStorage::Memory,
            other => return Err(format!("SESSION_STORAGE must be 'file' or 'memory', got '{}'", other).into()),
        };

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5001".to_string())
            .parse()
            .unwrap_or(5001);

        let latency_ms: u64 = std::env::var("SIMULATED_LATENCY_MS")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .map_err(|_| "SIMULATED_LATENCY_MS must be a whole number of milliseconds")?;

        let seed_demo_data = std::env::var("SEED_DEMO_DATA")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Ok(Self {
            host,
            port,
            state_dir,
            session_storage,
            simulated_latency: Duration::from_millis(latency_ms),
            seed_demo_data,
        })
    }

    pub fn local_storage_path(&self) -> PathBuf {
        self.state_dir.join("local_storage.json")
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" off "));
    }

    #[test]
    fn defaults_persist_sessions_to_file() {
        let config = Config::default();
        assert_eq!(config.session_storage, SessionStorage::File);
        assert_eq!(config.port, 5001);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn local_storage_lives_in_state_dir() {
        let config = Config {
            state_dir: PathBuf::from("/tmp/confman"),
            ..Config::default()
        };
        assert_eq!(
            config.local_storage_path(),
            PathBuf::from("/tmp/confman/local_storage.json")
        );
    }
}
