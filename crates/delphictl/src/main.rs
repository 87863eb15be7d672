//! Delphi Control - command-line front end for the answer pipeline.
//!
//! Reads questions, hands them to the pipeline, prints answers. A failed
//! question never stops a batch run or the interactive loop.

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing::warn;

use delphi::{Config, Pipeline, CONFIG_PATH};

const EXAMPLE_QUESTIONS: &[&str] = &[
    "When was Michael Jackson born?",
    "Who is the mother of Elvis Presley?",
    "Who are the members of the Beatles?",
    "Who composed the St Matthew Passion?",
    "Where did David Bowie die?",
    "What is the last album of Queen?",
];

#[derive(Parser)]
#[command(name = "delphictl")]
#[command(about = "Answer factual questions against a public knowledge graph", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question and exit
    Ask {
        /// The question, quoted or as loose words
        #[arg(required = true)]
        question: Vec<String>,
    },

    /// Read questions from stdin until EOF (default)
    Repl,

    /// Score a TSV file of question, source URL, and gold answers
    Batch {
        /// TSV file with one question per line
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path),
        None => Config::load(Path::new(CONFIG_PATH)),
    };
    let pipeline = Pipeline::new(config)?;

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Ask { question } => ask(&pipeline, &question.join(" ")),
        Commands::Repl => repl(&pipeline),
        Commands::Batch { file } => batch(&pipeline, &file),
    }
}

fn ask(pipeline: &Pipeline, question: &str) -> Result<()> {
    match pipeline.answer(question) {
        Ok(answers) => {
            for answer in answers {
                println!("{}", answer);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            std::process::exit(1);
        }
    }
}

fn repl(pipeline: &Pipeline) -> Result<()> {
    println!("Ready to answer questions.\n");
    println!("Example questions:");
    for question in EXAMPLE_QUESTIONS {
        println!("  {}", question);
    }
    println!("\nAsk your question below:\n");

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match pipeline.answer(&line) {
            Ok(answers) => {
                for answer in answers {
                    println!("{}", answer);
                }
                println!();
            }
            // One bad question never ends the session.
            Err(err) => eprintln!("{}\n", err.to_string().red()),
        }
    }
    Ok(())
}

fn batch(pipeline: &Pipeline, file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)?;
    let mut correct = 0usize;
    let mut wrong = 0usize;

    for line in content.lines() {
        let Some((question, golds)) = parse_batch_line(line) else {
            continue;
        };
        match pipeline.answer(question) {
            Ok(answers) => {
                if is_correct(&answers, &golds) {
                    correct += 1;
                } else {
                    wrong += 1;
                    warn!(question, "answers did not match the gold set");
                }
            }
            // A question-level failure is scored and logged; a transport
            // failure would sink every remaining question, so it aborts.
            Err(err) if err.is_question_failure() => {
                wrong += 1;
                warn!(question, %err, "question failed");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let total = correct + wrong;
    if total == 0 {
        println!("No scorable questions in {}", file.display());
    } else {
        println!(
            "Accuracy: {:.3} ({}/{})",
            correct as f64 / total as f64,
            correct,
            total
        );
    }
    Ok(())
}

/// One TSV line: question, source URL, then any number of gold answers.
fn parse_batch_line(line: &str) -> Option<(&str, Vec<&str>)> {
    let mut fields = line.split('\t');
    let question = fields.next()?.trim();
    if question.is_empty() {
        return None;
    }
    let _url = fields.next();
    let golds: Vec<&str> = fields.map(|g| g.trim()).filter(|g| !g.is_empty()).collect();
    Some((question, golds))
}

/// A question counts as correct when every gold answer was produced.
fn is_correct(answers: &[String], golds: &[&str]) -> bool {
    !golds.is_empty() && golds.iter().all(|gold| answers.iter().any(|a| a == gold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_lines_split_into_question_and_golds() {
        let (question, golds) =
            parse_batch_line("Who wrote Dracula?\thttps://example.org/q1\tBram Stoker").unwrap();
        assert_eq!(question, "Who wrote Dracula?");
        assert_eq!(golds, vec!["Bram Stoker"]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert!(parse_batch_line("").is_none());
        assert!(parse_batch_line("\t\t").is_none());
    }

    #[test]
    fn correctness_requires_every_gold_answer() {
        let answers = vec!["Bram Stoker".to_string(), "1897".to_string()];
        assert!(is_correct(&answers, &["Bram Stoker"]));
        assert!(is_correct(&answers, &["Bram Stoker", "1897"]));
        assert!(!is_correct(&answers, &["Bram Stoker", "1850"]));
        assert!(!is_correct(&answers, &[]));
    }
}
