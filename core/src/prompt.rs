//! Prompt rendering and emission.

use std::path::Path;
use std::path::PathBuf;

use crate::scrollback::ScrollbackBuffer;
use crate::scrollback::TextStyle;

/// Identity shown in the prompt, resolved once at session construction.
#[derive(Clone, Debug)]
pub struct PromptContext {
    user: String,
    host: String,
    home: PathBuf,
}

impl PromptContext {
    pub fn new(user: impl Into<String>, host: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
            home: home.into(),
        }
    }

    pub fn from_env() -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "user".to_string());
        let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "viridian".to_string());
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        Self { user, host, home }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }
}

/// Renders the two-line prompt. Pure: same inputs, same string.
pub fn render_prompt(ctx: &PromptContext, working_dir: &Path) -> String {
    let dir = short_path(&ctx.home, working_dir);
    let user = &ctx.user;
    let host = &ctx.host;
    format!("┌──({user}@{host})-[{dir}]\n└─$ ")
}

/// Abbreviates a leading home-directory prefix to `~`.
pub fn short_path(home: &Path, path: &Path) -> String {
    if path == home {
        return "~".to_string();
    }
    match path.strip_prefix(home) {
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}

/// Appends the rendered prompt and advances the edit-region mark past it.
pub fn emit(buffer: &mut ScrollbackBuffer, ctx: &PromptContext, working_dir: &Path) {
    buffer.append(&render_prompt(ctx, working_dir), TextStyle::Prompt);
    buffer.seal();
}
