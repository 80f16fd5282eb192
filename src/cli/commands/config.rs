//! Config Command
//!
//! Usage:
//!   reportdraft config show [-g] [-f json]
//!   reportdraft config path
//!   reportdraft config init [-g] [--force]

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged configuration, or the raw global file with `global`
pub fn show(global: bool, as_json: bool) -> Result<()> {
    if !global {
        let config = ConfigLoader::load()?;
        println!("{}", ConfigLoader::render(&config, as_json)?);
        return Ok(());
    }

    match ConfigLoader::global_config_path() {
        Some(path) if path.exists() => {
            println!("# Global Config: {}\n", path.display());
            println!("{}", std::fs::read_to_string(&path)?);
        }
        Some(_) => {
            println!("No global config found.");
            println!("Run 'reportdraft config init --global' to create one.");
        }
        None => println!("Cannot determine global config directory."),
    }
    Ok(())
}

pub fn path() -> Result<()> {
    let global = ConfigLoader::global_config_path();
    let project = ConfigLoader::project_config_path();
    let mark = |exists: bool| if exists { "" } else { " (missing)" };

    match global {
        Some(p) => println!("Global:  {}{}", p.display(), mark(p.exists())),
        None => println!("Global:  (unavailable)"),
    }
    println!("Project: {}{}", project.display(), mark(project.exists()));
    Ok(())
}

pub fn init(global: bool, force: bool) -> Result<()> {
    let path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };
    Output::new().success(&format!("Initialized configuration at {}", path.display()));
    Ok(())
}
