//! Runtime configuration, layered from an optional TOML file and `RECALL_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
  Ok(
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "recall.db")?,
  )
}

/// Read `path` (if it exists) with environment overrides on top.
pub fn load(path: &Path) -> anyhow::Result<ServerConfig> {
  let settings = builder()?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("RECALL"))
    .build()
    .context("failed to read config file")?;

  let mut cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  cfg.store_path = expand_tilde(&cfg.store_path);
  Ok(cfg)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn from_toml(toml: &str) -> ServerConfig {
    builder()
      .unwrap()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn defaults_apply_when_file_is_empty() {
    let cfg = from_toml("");
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.store_path, PathBuf::from("recall.db"));
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = from_toml("port = 9000\nstore_path = \"/var/lib/recall.db\"");
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/recall.db"));
  }

  #[test]
  fn relative_paths_are_left_alone() {
    assert_eq!(expand_tilde(Path::new("data/recall.db")), PathBuf::from("data/recall.db"));
  }
}
