//! Writing generated sources to disk, or printing them in raw mode.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

use tempfile::NamedTempFile;

use crate::{errors::GenError, prompt::Prompt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Print to the output stream, never touch the filesystem.
    Raw,
    Normal { overwrite: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
    Skipped,
    Printed,
    Aborted,
}

#[derive(Debug, Clone)]
pub struct WriteRequest {
    pub path: PathBuf,
    pub content: String,
    /// What is being written, e.g. `Contract` or `Model`.
    pub label: String,
    /// Name the operator re-types to confirm an overwrite.
    pub name: String,
}

pub fn write_or_skip(
    request: &WriteRequest,
    mode: WriteMode,
    prompt: &mut dyn Prompt,
    out: &mut dyn Write,
) -> Result<WriteOutcome, GenError> {
    let overwrite = match mode {
        WriteMode::Raw => {
            writeln!(out, "{}", request.content)?;
            return Ok(WriteOutcome::Printed);
        }
        WriteMode::Normal { overwrite } => overwrite,
    };

    let path = &request.path;
    if path.exists() {
        let current = fs::read_to_string(path)?;
        if current == request.content {
            log::info!(
                "{} [{}] is up to date, skipped",
                request.label,
                path.display()
            );
            return Ok(WriteOutcome::Skipped);
        }

        if !overwrite {
            log::warn!(
                "{} [{}] already exists, skipped",
                request.label,
                path.display()
            );
            return Ok(WriteOutcome::Skipped);
        }

        let question = format!(
            "{} [{}] will be overwritten. Type `{}` to confirm:",
            request.label,
            path.display(),
            request.name
        );
        if !prompt.confirm_by_typing(&question, &request.name)? {
            print_diff(path, &request.content, out)?;
            return Err(GenError::ConfirmFailed {
                expected: request.name.clone(),
            });
        }

        fs::write(path, &request.content)?;
        log::info!("{} [{}] updated", request.label, path.display());
        return Ok(WriteOutcome::Updated);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            let question = format!("Directory [{}] does not exist! Create?", parent.display());
            if !prompt.confirm(&question, false)? {
                log::warn!("{} [{}] not written", request.label, path.display());
                return Ok(WriteOutcome::Aborted);
            }
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, &request.content)?;
    log::info!("{} [{}] created", request.label, path.display());
    Ok(WriteOutcome::Created)
}

/// Prints `diff -u` of the file on disk against `content`. Falls back to
/// printing `content` when `diff` cannot be run.
fn print_diff(path: &Path, content: &str, out: &mut dyn Write) -> Result<(), GenError> {
    let mut new_file = NamedTempFile::new()?;
    new_file.write_all(content.as_bytes())?;
    new_file.flush()?;

    match Command::new("diff")
        .arg("-u")
        .arg(path)
        .arg(new_file.path())
        .output()
    {
        Ok(output) => out.write_all(&output.stdout)?,
        Err(e) => {
            log::debug!("diff unavailable: {}", e);
            writeln!(out, "{}", content)?;
        }
    }

    Ok(())
}
