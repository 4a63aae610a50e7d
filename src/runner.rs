use std::fmt;
use std::io;
use std::process::Command;

use crate::error::OsmprjError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec(Vec<String>);

impl CommandSpec {
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &CommandSpec, dry_run: bool, silent: bool)
    -> Result<(), OsmprjError>;
}

pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        command: &CommandSpec,
        dry_run: bool,
        silent: bool,
    ) -> Result<(), OsmprjError> {
        let green = "\x1b[32m";
        let yellow = "\x1b[33m";
        let reset = "\x1b[0m";

        if dry_run {
            println!("{yellow}Dry run:  {command}{reset}");
            return Ok(());
        }
        if !silent {
            println!("{green}Running Command:{reset} {command}");
        }

        let program = command
            .program()
            .ok_or_else(|| OsmprjError::MissingTool("None".to_string()))?;
        let status = Command::new(program)
            .args(&command.tokens()[1..])
            .status()
            .map_err(|err| {
                if err.kind() == io::ErrorKind::NotFound {
                    OsmprjError::MissingTool(program.to_string())
                } else {
                    OsmprjError::Filesystem(err.to_string())
                }
            })?;
        if !status.success() {
            return Err(OsmprjError::ToolFailure {
                tool: program.to_string(),
                code: status.code().unwrap_or(-1),
            });
        }
        tracing::debug!(command = %command, "command finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn display_joins_tokens_with_spaces() {
        let command = CommandSpec::new(["osmium", "merge", "a.osm.pbf", "--output", "out.osm.pbf"]);
        assert_eq!(
            command.to_string(),
            "osmium merge a.osm.pbf --output out.osm.pbf"
        );
    }

    #[test]
    fn dry_run_never_spawns() {
        let command = CommandSpec::new(["definitely-not-a-real-tool", "--flag"]);
        SystemRunner.run(&command, true, true).unwrap();
    }

    #[test]
    fn missing_executable_is_named() {
        let command = CommandSpec::new(["definitely-not-a-real-tool"]);
        let err = SystemRunner.run(&command, false, true).unwrap_err();
        assert_matches!(err, OsmprjError::MissingTool(tool) if tool == "definitely-not-a-real-tool");
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_a_failure() {
        let command = CommandSpec::new(["false"]);
        let err = SystemRunner.run(&command, false, true).unwrap_err();
        assert_matches!(err, OsmprjError::ToolFailure { code: 1, .. });
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_passes() {
        let command = CommandSpec::new(["true"]);
        SystemRunner.run(&command, false, true).unwrap();
    }
}
