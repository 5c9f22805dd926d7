//! Running external programs.

use std::io;
use std::process::{Command, Output};

/// Why an external program run failed.
#[derive(Debug)]
pub(crate) enum ToolError {
    /// The program could not be found on disk or in `PATH`.
    NotFound(String),
    /// The program started but failed.
    Failed(String),
}

/// Run `cmd` to completion, treating a non-zero exit status as failure.
pub(crate) fn run(cmd: &mut Command) -> Result<Output, ToolError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    log::debug!("Running {:?}", cmd);

    let output = cmd.output().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ToolError::NotFound(program.clone()),
        _ => ToolError::Failed(format!("{}: {}", program, e)),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ToolError::Failed(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program() {
        let result = run(&mut Command::new("uploadkit-no-such-program"));
        assert!(matches!(result, Err(ToolError::NotFound(name)) if name == "uploadkit-no-such-program"));
    }
}
