use std::collections::HashMap;
use std::time::Duration;

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};

use crate::application::usecases::{Attempt, AttemptUseCase};
use crate::application::{Cooldown, PlatformCooldown};
use crate::domain::{DurationText, Subject, SubjectKey};
use crate::infrastructure::memory_directory::InMemoryDirectory;
use crate::infrastructure::name_resolver::NameResolver;

pub const USAGE: &str = "\
commands:
  join <name>                      bring a subject online
  leave <name>                     take a subject offline
  use <cooldown> <name>            try the action; starts the cooldown if allowed
  put <cooldown> <name> [secs]     put a subject on cooldown
  release <cooldown> <name>        take a subject off a cooldown
  left <cooldown> <name>           time left for a subject
  clear <cooldown>                 remove every subject from a cooldown
  list                             cooldowns and online subjects
  help                             this text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join(String),
    Leave(String),
    Use { cooldown: String, name: String },
    Put { cooldown: String, name: String, secs: Option<u64> },
    Release { cooldown: String, name: String },
    Left { cooldown: String, name: String },
    Clear { cooldown: String },
    List,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid seconds: {0}")]
    InvalidSeconds(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let owned = |i: usize| words[i].to_string();

        match words.as_slice() {
            ["join", _] => Ok(Command::Join(owned(1))),
            ["leave", _] => Ok(Command::Leave(owned(1))),
            ["use", _, _] => Ok(Command::Use {
                cooldown: owned(1),
                name: owned(2),
            }),
            ["put", _, _] => Ok(Command::Put {
                cooldown: owned(1),
                name: owned(2),
                secs: None,
            }),
            ["put", _, _, secs] => {
                let secs = secs
                    .parse()
                    .map_err(|_| CommandError::InvalidSeconds(secs.to_string()))?;
                Ok(Command::Put {
                    cooldown: owned(1),
                    name: owned(2),
                    secs: Some(secs),
                })
            }
            ["release", _, _] => Ok(Command::Release {
                cooldown: owned(1),
                name: owned(2),
            }),
            ["left", _, _] => Ok(Command::Left {
                cooldown: owned(1),
                name: owned(2),
            }),
            ["clear", _] => Ok(Command::Clear { cooldown: owned(1) }),
            ["list"] => Ok(Command::List),
            ["help"] => Ok(Command::Help),
            ["join", ..] => Err(CommandError::Usage("join <name>")),
            ["leave", ..] => Err(CommandError::Usage("leave <name>")),
            ["use", ..] => Err(CommandError::Usage("use <cooldown> <name>")),
            ["put", ..] => Err(CommandError::Usage("put <cooldown> <name> [secs]")),
            ["release", ..] => Err(CommandError::Usage("release <cooldown> <name>")),
            ["left", ..] => Err(CommandError::Usage("left <cooldown> <name>")),
            ["clear", ..] => Err(CommandError::Usage("clear <cooldown>")),
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }
}

/// Line-oriented console over stdin/stdout driving named cooldowns.
pub struct Console {
    cooldowns: HashMap<String, PlatformCooldown<str, NameResolver>>,
    directory: InMemoryDirectory,
}

impl Console {
    pub fn new(cooldowns: HashMap<String, Cooldown>, directory: InMemoryDirectory) -> Self {
        let cooldowns = cooldowns
            .into_iter()
            .map(|(name, cooldown)| (name, PlatformCooldown::new(cooldown, NameResolver)))
            .collect();
        Self {
            cooldowns,
            directory,
        }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut reader = io::BufReader::new(stdin).lines();
        let mut out = io::BufWriter::new(stdout);

        while let Some(line) = reader.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let reply = match Command::parse(&line) {
                Ok(command) => match self.execute(command).await {
                    Ok(reply) => reply,
                    Err(e) => format!("error: {e}"),
                },
                Err(e) => format!("error: {e}"),
            };
            out.write_all(reply.as_bytes()).await?;
            out.write_all(b"\n").await?;
            out.flush().await?;
        }
        Ok(())
    }

    pub async fn execute(&self, command: Command) -> anyhow::Result<String> {
        match command {
            Command::Join(name) => {
                if self.directory.join(Subject::named(&name)) {
                    Ok(format!("{name} joined"))
                } else {
                    Ok(format!("{name} is already online"))
                }
            }
            Command::Leave(name) => match self.directory.leave(&SubjectKey::from_name(&name)) {
                Some(_) => Ok(format!("{name} left")),
                None => Ok(format!("{name} was not online")),
            },
            Command::Use { cooldown, name } => {
                let cd = self.cooldown(&cooldown)?;
                let key = cd.key_of(&name)?;
                let attempt = AttemptUseCase {
                    cooldown: cd.cooldown(),
                }
                .execute(key)
                .await?;
                match attempt {
                    Attempt::Allowed => Ok(format!("{name} used {cooldown}")),
                    Attempt::Rejected { time_left } => Ok(format!(
                        "{name} is on {cooldown} for {}",
                        DurationText(time_left.unwrap_or_default())
                    )),
                }
            }
            Command::Put {
                cooldown,
                name,
                secs,
            } => {
                let cd = self.cooldown(&cooldown)?;
                match secs {
                    Some(secs) => cd.put(&name, Duration::from_secs(secs))?,
                    None => cd.put_default(&name)?,
                }
                Ok(format!("{name} put on {cooldown}"))
            }
            Command::Release { cooldown, name } => {
                self.cooldown(&cooldown)?.release(&name)?;
                Ok(format!("{name} released from {cooldown}"))
            }
            Command::Left { cooldown, name } => {
                match self.cooldown(&cooldown)?.time_left(&name)? {
                    Some(left) => Ok(format!("{name}: {} left", DurationText(left))),
                    None => Ok(format!("{name} is not on {cooldown}")),
                }
            }
            Command::Clear { cooldown } => {
                self.cooldown(&cooldown)?.cooldown().clear();
                Ok(format!("{cooldown} cleared"))
            }
            Command::List => Ok(self.list()),
            Command::Help => Ok(USAGE.to_string()),
        }
    }

    fn cooldown(&self, name: &str) -> anyhow::Result<&PlatformCooldown<str, NameResolver>> {
        self.cooldowns
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("unknown cooldown: {name}"))
    }

    fn list(&self) -> String {
        let mut names: Vec<&String> = self.cooldowns.keys().collect();
        names.sort();

        let mut lines = vec![];
        for name in names {
            let cd = self.cooldowns[name].cooldown();
            lines.push(format!("cooldown {name}: {} active", cd.len()));
        }
        let online: Vec<String> = self.directory.list().into_iter().map(|s| s.name).collect();
        if online.is_empty() {
            lines.push("online: (none)".to_string());
        } else {
            lines.push(format!("online: {}", online.join(", ")));
        }
        lines.join("\n")
    }
}
