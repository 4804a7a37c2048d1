//! `agentme key ...`: manage the Gemini API key.

use agentme_core::credential::{self, API_KEY_PREFIX, CredentialStore};
use anyhow::{Result, bail};
use colored::Colorize;

use crate::context::AppContext;

pub async fn set(ctx: &AppContext, key: &str) -> Result<()> {
    let key = key.trim();
    if !credential::validate_format(key) {
        bail!(
            "That does not look like a Gemini API key (expected '{API_KEY_PREFIX}...' longer than 20 characters)"
        );
    }

    ctx.credentials.save(key).await?;
    println!(
        "{}",
        format!("🔑 Saved API key {}", credential::mask(key)).green()
    );
    Ok(())
}

pub async fn show(ctx: &AppContext) -> Result<()> {
    match ctx.credentials.get().await {
        Some(key) => println!("{}", credential::mask(&key)),
        None => println!(
            "{}",
            "No API key set. Run `agentme key set <KEY>`.".bright_black()
        ),
    }
    Ok(())
}

pub async fn remove(ctx: &AppContext) -> Result<()> {
    ctx.credentials.remove().await?;
    println!("{}", "API key removed.".yellow());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> AppContext {
        let config = dir.path().join("config.toml");
        AppContext::load(Some(&dir.path().join("data")), Some(&config)).unwrap()
    }

    #[tokio::test]
    async fn test_set_rejects_malformed_key() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir);

        assert!(set(&ctx, "AIza123").await.is_err());
        assert!(set(&ctx, "sk-0123456789012345678901").await.is_err());
        assert!(!temp_dir.path().join("data").join("gemini_api_key").exists());
    }

    #[tokio::test]
    async fn test_set_then_remove() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir);

        set(&ctx, "  AIzaXXXXXXXXXXXXXXXXXXX  ").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("data").join("gemini_api_key")).unwrap(),
            "AIzaXXXXXXXXXXXXXXXXXXX"
        );

        remove(&ctx).await.unwrap();
        assert!(!temp_dir.path().join("data").join("gemini_api_key").exists());
    }
}
