//! The prompt loop: tokenizes input, runs foreground commands (with
//! optional piping), and dispatches `submit`/`history`/`exit`.
//!
//! Grounded on `original_source/scheduler.c`'s `shell_loop`/`parse_input`/
//! `run_command`/`run_piped_commands`, reimplemented without fixed-size C
//! arrays and with `Result`-based error propagation. This is the "external
//! collaborator" side of the system (spec.md §1) — kept small and narrated,
//! not the object of scrutiny.

use std::process::Stdio;

use anyhow::{Context, Result};
use scheduler_core::context::SchedulerContext;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::history::History;

const PROMPT: &str = "batch-shell> ";

pub enum Outcome {
    Continue,
    Exit,
}

/// Runs the interactive loop until `exit`, EOF, or Ctrl-C. Always prints the
/// final accounting report before returning, whichever path got there.
pub async fn run(ctx: &SchedulerContext, history: &mut History) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(raw) = line? else {
                    break; // EOF on stdin
                };
                if raw.trim().is_empty() {
                    continue;
                }
                history.record(&raw);
                match dispatch(ctx, history, &raw).await {
                    Ok(Outcome::Exit) => break,
                    Ok(Outcome::Continue) => {}
                    Err(err) => println!("ERROR: {err}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    print_report(ctx);
    scheduler_core::scheduler::teardown(ctx).await;
    Ok(())
}

async fn dispatch(ctx: &SchedulerContext, history: &History, raw: &str) -> Result<Outcome> {
    if raw.contains('|') {
        run_pipeline(raw)?;
        return Ok(Outcome::Continue);
    }

    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let Some(&command) = tokens.first() else {
        return Ok(Outcome::Continue);
    };

    match command {
        "exit" => Ok(Outcome::Exit),
        "history" => {
            for line in history.iter() {
                println!("{line}");
            }
            Ok(Outcome::Continue)
        }
        "submit" => {
            let Some(&program_path) = tokens.get(1) else {
                println!("ERROR: submit requires a program path");
                return Ok(Outcome::Continue);
            };
            let args: Vec<String> = tokens[2..].iter().map(|s| s.to_string()).collect();
            match scheduler_core::submit(ctx, program_path, &args) {
                Ok(id) => println!("submitted job {id}: {program_path}"),
                Err(err) => println!("ERROR: {err}"),
            }
            Ok(Outcome::Continue)
        }
        _ => {
            run_foreground(&tokens)?;
            Ok(Outcome::Continue)
        }
    }
}

fn run_foreground(tokens: &[&str]) -> Result<()> {
    let (command, args) = tokens.split_first().expect("non-empty by caller");
    let status = std::process::Command::new(command)
        .args(args)
        .status()
        .with_context(|| format!("failed to execute command: {command}"))?;
    if !status.success() {
        println!("ERROR: command exited with status {status}");
    }
    Ok(())
}

/// Runs an N-stage `cmd1 | cmd2 | ...` foreground pipeline, matching the
/// original source's `run_piped_commands` (one pipe per adjacent stage,
/// waiting on every stage before returning).
fn run_pipeline(raw: &str) -> Result<()> {
    let stages: Vec<Vec<&str>> = raw
        .split('|')
        .map(|stage| stage.split_whitespace().collect())
        .collect();
    if stages.iter().any(|stage| stage.is_empty()) {
        anyhow::bail!("empty stage in pipeline");
    }

    let mut children = Vec::with_capacity(stages.len());
    let mut previous_stdout = None;

    for (i, stage) in stages.iter().enumerate() {
        let (command, args) = stage.split_first().expect("checked non-empty above");
        let mut cmd = std::process::Command::new(command);
        cmd.args(args);
        cmd.stdin(previous_stdout.take().unwrap_or(Stdio::inherit()));
        cmd.stdout(if i + 1 < stages.len() {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to execute command: {command}"))?;
        previous_stdout = child.stdout.take().map(Stdio::from);
        children.push(child);
    }

    for mut child in children {
        child.wait().context("failed to wait for pipeline stage")?;
    }
    Ok(())
}

fn print_report(ctx: &SchedulerContext) {
    for line in scheduler_core::report(ctx) {
        println!("{line}");
    }
}
