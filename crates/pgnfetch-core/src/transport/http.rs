//! libcurl-backed transport (one `Easy` handle per request).

use std::io::Write;
use std::time::Duration;

use super::Transport;
use crate::config::{FetchConfig, DEFAULT_USER_AGENT};
use crate::retry::TransferError;

/// Streamed GET over libcurl with a fixed client identity and timeout.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    user_agent: String,
    timeout: Duration,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT, Duration::from_secs(30))
    }
}

impl CurlTransport {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &FetchConfig) -> Self {
        Self::new(cfg.user_agent.clone(), cfg.timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransferError> {
        let mut written = 0u64;
        let mut write_err: Option<std::io::Error> = None;

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.timeout)?;
        easy.timeout(self.timeout)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match sink.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(TransferError::Storage(e));
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransferError::Http(code));
        }
        sink.flush()?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{classify, ErrorKind};

    #[test]
    fn from_config_uses_agent_and_timeout() {
        let cfg = FetchConfig {
            timeout_secs: 7,
            user_agent: "agent/1.0".into(),
            ..FetchConfig::default()
        };
        let t = CurlTransport::from_config(&cfg);
        assert_eq!(t.timeout(), Duration::from_secs(7));
        assert_eq!(t.user_agent, "agent/1.0");
    }

    #[test]
    fn refused_connection_is_classified() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let t = CurlTransport::new("test", Duration::from_secs(2));
        let mut sink = Vec::new();
        let err = t
            .get(&format!("http://127.0.0.1:{}/twic0001.zip", port), &mut sink)
            .unwrap_err();
        assert_eq!(classify(&err), ErrorKind::Connection);
        assert!(sink.is_empty());
    }
}
