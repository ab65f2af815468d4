use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

use rebound_core::simulate::{self, Script, Setup};
use rebound_core::RefreshConfig;

pub fn run(script_path: &Path, setup: Setup, config: RefreshConfig, json: bool) -> Result<()> {
    let text = if script_path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read script from stdin")?;
        text
    } else {
        std::fs::read_to_string(script_path)
            .with_context(|| format!("Failed to read script {}", script_path.display()))?
    };

    let script = Script::parse(&text)?;
    if script.is_empty() {
        println!("Script has no steps.");
        return Ok(());
    }
    tracing::debug!(steps = script.steps().len(), edge = %setup.edge, "running script");

    let reports = simulate::run(&script, setup, config)?;
    if json {
        print!("{}", simulate::to_json_lines(&reports)?);
    } else {
        println!(
            "{} {:?} component, container {} over content {}:\n",
            setup.edge, setup.kind, setup.height, setup.content_height
        );
        for report in &reports {
            println!("{report}");
        }
    }
    Ok(())
}
