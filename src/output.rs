use crate::invitation::BatchSummary;
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Rendered batch output, ready to be written somewhere.
#[derive(Debug, PartialEq)]
pub enum Rendered {
    Json(String),
    Urls(Vec<String>),
}

impl Rendered {
    pub fn new(summary: &BatchSummary, verbose: bool) -> Result<Self> {
        if verbose {
            Ok(Rendered::Json(serde_json::to_string_pretty(summary)?))
        } else {
            Ok(Rendered::Urls(
                summary.urls().into_iter().map(str::to_string).collect(),
            ))
        }
    }

    /// Text as written to a file. URL lists end with a newline when non-empty.
    pub fn to_file_contents(&self) -> String {
        match self {
            Rendered::Json(json) => json.clone(),
            Rendered::Urls(urls) if urls.is_empty() => String::new(),
            Rendered::Urls(urls) => format!("{}\n", urls.join("\n")),
        }
    }

    pub fn write(&self, output: Option<&Path>, quiet: bool) -> Result<()> {
        let Some(path) = output else {
            match self {
                Rendered::Json(json) => println!("{json}"),
                Rendered::Urls(urls) if urls.is_empty() => {}
                Rendered::Urls(urls) => println!("{}", urls.join("\n")),
            }
            return Ok(());
        };

        fs::write(path, self.to_file_contents())
            .with_context(|| format!("Failed to write results to {}", path.display()))?;

        if !quiet {
            match self {
                Rendered::Json(_) => eprintln!("\nResults saved to {}", path.display()),
                Rendered::Urls(urls) => eprintln!(
                    "\n{} invitation URL(s) saved to {}",
                    urls.len(),
                    path.display()
                ),
            }
        }

        Ok(())
    }
}
