//! jamboree - track skill rolls against a stream of chat messages.
//!
//! Rolls are given on the command line, chat messages arrive on stdin as one
//! JSON object per line (`{"content": "...", "speaker": {"actor": "..."}}`),
//! and every resolved roll is printed to stdout as a JSON line.
//!
//! With `--actors`, rolls go through the ruleset's provider first and the
//! check request the host should act on is printed as well.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use clap::Parser;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use jamboree_core::app::{SkillCheckService, TrackerBuilder, TrackerRuntime};
use jamboree_core::config::TrackerConfig;
use jamboree_core::domain::{Actor, ChatEvent, RollTopic, TrackerError};
use jamboree_core::impls::{JsonFileFlagStore, TracingNotifier};
use jamboree_core::ports::{CheckHandle, RollHost};
use jamboree_core::systems::SystemRegistry;

#[derive(Debug, Parser)]
#[command(name = "jamboree", version, about = "Track skill rolls against chat messages on stdin")]
struct Cli {
    /// Roll to track, as SUBJECT:SKILL[:TOPIC]. Repeatable.
    #[arg(long = "roll", value_name = "SUBJECT:SKILL[:TOPIC]", required = true)]
    rolls: Vec<RollArg>,

    /// Resolve failed rolls immediately even when the message offers a push.
    #[arg(long)]
    no_retry: bool,

    /// JSON file with tracker settings. Without it, JAMBOREE_* env vars apply.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "SECS")]
    roll_timeout_secs: Option<u64>,

    /// Only exact actor id equality correlates a message with a roll.
    #[arg(long)]
    strict: bool,

    /// Persist roll metadata to this JSON file instead of memory.
    #[arg(long, value_name = "FILE")]
    flags_file: Option<PathBuf>,

    /// JSON array of actors; SUBJECT is then an actor id looked up here.
    #[arg(long, value_name = "FILE")]
    actors: Option<PathBuf>,

    /// Host system id used to pick the skill provider.
    #[arg(long, default_value = "dragonbane")]
    system: String,
}

#[derive(Debug, Clone)]
struct RollArg {
    subject: String,
    skill: String,
    topic: RollTopic,
}

impl FromStr for RollArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let subject = parts.next().unwrap_or_default();
        let skill = parts.next().unwrap_or_default();
        if subject.is_empty() || skill.is_empty() {
            return Err(format!("expected SUBJECT:SKILL[:TOPIC], got {s:?}"));
        }
        let topic = match parts.next() {
            Some(raw) => raw.parse::<RollTopic>().map_err(|e| format!("{e}"))?,
            None => RollTopic::PrimaryCheck,
        };
        Ok(Self {
            subject: subject.to_string(),
            skill: skill.to_string(),
            topic,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
enum Output<'a> {
    OpenCheck {
        actor: &'a str,
        check: &'a CheckHandle,
    },
    Resolved {
        subject: &'a str,
        skill: &'a str,
        topic: RollTopic,
        success: bool,
    },
}

fn emit(output: &Output<'_>) {
    match serde_json::to_string(output) {
        Ok(line) => println!("{line}"),
        Err(err) => warn!(error = %err, "could not encode output line"),
    }
}

/// Host stand-in: a check request becomes a JSON line on stdout.
struct StdoutRollHost;

#[async_trait]
impl RollHost for StdoutRollHost {
    async fn open_skill_check(&self, actor: &Actor, check: CheckHandle) -> Result<(), TrackerError> {
        emit(&Output::OpenCheck {
            actor: &actor.id,
            check: &check,
        });
        Ok(())
    }
}

fn load_config(cli: &Cli) -> Result<TrackerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => TrackerConfig::from_env().context("invalid JAMBOREE_* environment")?,
    };
    if let Some(secs) = cli.roll_timeout_secs {
        config.roll_timeout_secs = secs;
    }
    if cli.strict {
        config.strict_subject_match = true;
    }
    config.validate().context("invalid tracker config")?;
    Ok(config)
}

fn load_actors(path: &Path) -> Result<HashMap<String, Actor>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read actors {}", path.display()))?;
    let actors: Vec<Actor> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse actors {}", path.display()))?;
    Ok(actors.into_iter().map(|a| (a.id.clone(), a)).collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let mut builder = TrackerBuilder::new(config.clone());
    if let Some(path) = &cli.flags_file {
        builder = builder.flags(Arc::new(JsonFileFlagStore::new(path.clone())));
    }
    let tracker = builder.build().context("failed to build tracker")?;
    let runtime = TrackerRuntime::start(tracker.clone());

    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(RollArg, bool)>();
    let retry_eligible = !cli.no_retry;

    match &cli.actors {
        Some(path) => {
            let actors = load_actors(path)?;
            let registry = SystemRegistry::with_defaults(config.movement);
            let service = Arc::new(SkillCheckService::new(
                tracker.clone(),
                registry.provider_for(&cli.system),
                Arc::new(StdoutRollHost),
                Arc::new(TracingNotifier),
            ));
            for roll in &cli.rolls {
                let Some(actor) = actors.get(&roll.subject).cloned() else {
                    bail!("actor {} not found in {}", roll.subject, path.display());
                };
                // queued before stdin is read so early chat lines can match
                let tracked = service
                    .begin(&actor, &roll.skill, roll.topic, retry_eligible)
                    .await;
                let done = done_tx.clone();
                let roll = roll.clone();
                tokio::spawn(async move {
                    let success = tracked.outcome().await;
                    let _ = done.send((roll, success));
                });
            }
        }
        None => {
            for roll in &cli.rolls {
                let done = done_tx.clone();
                let queued = roll.clone();
                tracker
                    .queue_roll(
                        roll.subject.clone(),
                        roll.skill.clone(),
                        roll.topic,
                        Box::new(move |success| {
                            let _ = done.send((queued, success));
                        }),
                        retry_eligible,
                    )
                    .await;
            }
        }
    }
    drop(done_tx);

    let expected = cli.rolls.len();
    let mut resolved = 0;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    while resolved < expected {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line.context("failed to read stdin")? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match serde_json::from_str::<ChatEvent>(&line) {
                        Ok(event) => tracker.handle_event(&event).await,
                        Err(err) => warn!(error = %err, "skipping malformed chat line"),
                    },
                    None => {
                        debug!("stdin closed, waiting for remaining rolls");
                        stdin_open = false;
                    }
                }
            }
            done = done_rx.recv() => {
                let Some((roll, success)) = done else {
                    // every sender is gone; nothing more can resolve
                    break;
                };
                emit(&Output::Resolved {
                    subject: &roll.subject,
                    skill: &roll.skill,
                    topic: roll.topic,
                    success,
                });
                resolved += 1;
            }
        }
    }

    info!(resolved, expected, "done");
    runtime.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_arg_defaults_topic() {
        let arg: RollArg = "actor123:Bushcraft".parse().unwrap();
        assert_eq!(arg.subject, "actor123");
        assert_eq!(arg.skill, "Bushcraft");
        assert_eq!(arg.topic, RollTopic::PrimaryCheck);
    }

    #[test]
    fn roll_arg_reads_topic() {
        let arg: RollArg = "Scene.s1.Token.t1.Actor.a1:Hunting:followup-check"
            .parse()
            .unwrap();
        assert_eq!(arg.subject, "Scene.s1.Token.t1.Actor.a1");
        assert_eq!(arg.topic, RollTopic::FollowupCheck);
    }

    #[test]
    fn roll_arg_rejects_bad_input() {
        assert!("actor123".parse::<RollArg>().is_err());
        assert!(":Bushcraft".parse::<RollArg>().is_err());
        assert!("a:b:hunt".parse::<RollArg>().is_err());
    }

    #[test]
    fn cli_parses_repeated_rolls() {
        let cli = Cli::try_parse_from([
            "jamboree",
            "--roll",
            "a1:Bushcraft:gather",
            "--roll",
            "a2:Hunting",
            "--no-retry",
            "--roll-timeout-secs",
            "45",
        ])
        .unwrap();
        assert_eq!(cli.rolls.len(), 2);
        assert!(cli.no_retry);
        assert_eq!(cli.roll_timeout_secs, Some(45));
        assert_eq!(cli.system, "dragonbane");
    }

    #[test]
    fn resolved_output_is_tagged() {
        let line = serde_json::to_value(Output::Resolved {
            subject: "a1",
            skill: "Bushcraft",
            topic: RollTopic::Gather,
            success: true,
        })
        .unwrap();
        assert_eq!(line["event"], "resolved");
        assert_eq!(line["topic"], "gather");
        assert_eq!(line["success"], true);
    }
}
