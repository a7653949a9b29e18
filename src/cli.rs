use std::io::Read;

use anyhow::Context;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version)]
/// Find the thumbnail of a video from its embed code
pub(crate) struct Args {
    /// Use this provider instead of detecting it
    #[arg(short, long, value_name = "NAME")]
    pub(crate) provider: Option<String>,

    /// Only print the detected provider
    #[arg(long, conflicts_with = "provider")]
    pub(crate) detect: bool,

    /// Enable debug mode
    #[arg(short, long)]
    pub(crate) debug: bool,

    /// Embed code, read from stdin if omitted
    pub(crate) code: Option<String>,
}

impl Args {
    pub(crate) fn get_code(&self) -> Result<String, anyhow::Error> {
        match &self.code {
            Some(code) => Ok(code.clone()),
            None => {
                let mut code = String::new();
                std::io::stdin()
                    .read_to_string(&mut code)
                    .context("failed to read embed code from stdin")?;
                Ok(code)
            }
        }
    }
}
