//! Locating and reading input documents.
//!
//! The data source is always explicit: a path from the command line, a path
//! from the config file, or stdin when the path is `-`.

use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::cli::InputArgs;
use crate::config::DriftscopeConfig;

/// Path that means "read from stdin"
pub const STDIN_PATH: &str = "-";

/// Resolved locations of both documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub declared: PathBuf,
    pub actual: PathBuf,
}

/// Raw text of both documents
#[derive(Debug, Clone)]
pub struct Documents {
    pub declared: String,
    pub actual: String,
}

/// Pick document paths from flags, falling back to the config file.
pub fn resolve_paths(args: &InputArgs, config: &DriftscopeConfig) -> Result<InputPaths> {
    let declared = args
        .declared
        .clone()
        .or_else(|| config.inputs.declared_path())
        .context("No declared state given. Pass --declared or set inputs.declared in the config file")?;
    let actual = args
        .actual
        .clone()
        .or_else(|| config.inputs.actual_path())
        .context("No actual state given. Pass --actual or set inputs.actual in the config file")?;

    if is_stdin(&declared) && is_stdin(&actual) {
        bail!("Only one of --declared and --actual can be read from stdin");
    }

    Ok(InputPaths { declared, actual })
}

/// Read both documents.
pub fn read_documents(paths: &InputPaths) -> Result<Documents> {
    Ok(Documents {
        declared: read_document(&paths.declared, "Terraform state")?,
        actual: read_document(&paths.actual, "actual state")?,
    })
}

/// Read one document from a file or stdin.
pub fn read_document(path: &Path, label: &str) -> Result<String> {
    if is_stdin(path) {
        log::debug!("Reading {label} from stdin");
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .with_context(|| format!("Could not read {label} from stdin"))?;
        return Ok(content);
    }

    log::debug!("Reading {label} from {}", path.display());
    fs::read_to_string(path).with_context(|| format!("Could not read {label} file: {}", path.display()))
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_PATH
}

/// Display name for a path, `<stdin>` for `-`
pub fn display_name(path: &Path) -> String {
    if is_stdin(path) {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}
