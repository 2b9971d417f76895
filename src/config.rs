use std::path::PathBuf;

const DEFAULT_API_HOST: &str = "api.github.com";

/// Runtime configuration, resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host the REST calls go to, `GITHUB_API_HOST` or api.github.com.
    pub api_host: String,
    /// OAuth token, if one could be found. Anonymous access works for
    /// public repositories but cannot open pull requests.
    pub token: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let api_host = std::env::var("GITHUB_API_HOST")
            .ok()
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string());

        let token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .or_else(|| hub_config_token(hub_config_path()));

        if token.is_none() {
            log::debug!("no GitHub token found, API calls are anonymous");
        }

        Config { api_host, token }
    }

    pub fn api_base_url(&self) -> String {
        format!("https://{}", self.api_host)
    }
}

/// Path of the hub configuration file, `HUB_CONFIG` or ~/.config/hub.
fn hub_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("HUB_CONFIG") {
        return Some(PathBuf::from(path));
    }
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("hub"))
}

/// Scan the hub config file for an `oauth_token:` entry.
///
/// The file is YAML but the layout is flat enough that a line scan is
/// all that is needed; the first token entry wins.
fn hub_config_token(path: Option<PathBuf>) -> Option<String> {
    let path = path?;
    let content = std::fs::read_to_string(&path).ok()?;
    for line in content.lines() {
        let line = line.trim().trim_start_matches("- ");
        if let Some(value) = line.strip_prefix("oauth_token:") {
            let token = value.trim().trim_matches('"');
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_oauth_token_from_hub_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "github.com:\n- user: alice\n  oauth_token: abc123\n  protocol: https"
        )
        .unwrap();

        let token = hub_config_token(Some(file.path().to_path_buf()));
        assert_eq!(token, Some("abc123".to_string()));
    }

    #[test]
    fn missing_hub_config_yields_no_token() {
        let token = hub_config_token(Some(PathBuf::from("/nonexistent/hub")));
        assert_eq!(token, None);
    }

    #[test]
    fn hub_config_without_token_yields_none() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "github.com:\n- user: alice").unwrap();

        let token = hub_config_token(Some(file.path().to_path_buf()));
        assert_eq!(token, None);
    }
}
