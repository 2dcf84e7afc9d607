use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use colored::Colorize;
use serde::Serialize;
use vcl_ledger::{Election, ElectionSummary, Ledger, Tally};

use crate::cli::*;
use crate::config::StationConfig;
use crate::{report, store};

/// Everything a command needs: configuration plus resolved paths.
struct Station {
    config: StationConfig,
    ledger_path: PathBuf,
    format: OutputFormat,
}

impl Station {
    fn open_election(&self) -> anyhow::Result<Election> {
        let ledger = store::load_ledger(&self.ledger_path)?;
        Ok(Election::with_ledger(self.config.election.clone(), ledger)?)
    }

    fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = StationConfig::load(cli.config.as_deref())?;
    let ledger_path = cli.ledger.unwrap_or_else(|| config.ledger.path.clone());
    let station = Station {
        config,
        ledger_path,
        format: cli.format,
    };

    match cli.command {
        Command::Init(args) => cmd_init(&station, args),
        Command::Vote(args) => cmd_vote(&station, args),
        Command::Chain => cmd_chain(&station),
        Command::Tally => cmd_tally(&station),
        Command::Verify => cmd_verify(&station),
        Command::Close => cmd_close(&station),
        Command::Config => cmd_config(&station),
    }
}

fn cmd_init(station: &Station, args: InitArgs) -> anyhow::Result<()> {
    if station.ledger_path.exists() && !args.force {
        bail!(
            "ledger {} already exists; pass --force to replace it",
            station.ledger_path.display()
        );
    }
    // Validate before creating anything on disk.
    let election = Election::with_ledger(
        station.config.election.clone(),
        Ledger::with_scheme(station.config.ledger.hash_scheme),
    )?;
    store::save_ledger(&station.ledger_path, election.ledger())?;

    if station.json() {
        return emit_json(&election.ledger().snapshot());
    }
    println!(
        "{} Initialized election ledger at {}",
        "✓".green().bold(),
        station.ledger_path.display().to_string().bold()
    );
    println!("  Genesis: {}", election.ledger().head().hash().yellow());
    println!("  Candidates: {}", election.config().candidates.join(", ").cyan());
    Ok(())
}

fn cmd_vote(station: &Station, args: VoteArgs) -> anyhow::Result<()> {
    let mut election = station.open_election()?;
    let voter_id = args.voter_id.trim();

    election
        .cast_vote(voter_id, &args.candidate)
        .with_context(|| format!("vote from {voter_id} rejected"))?;
    store::save_ledger(&station.ledger_path, election.ledger())?;

    let tally = election.tally();
    if station.json() {
        #[derive(Serialize)]
        struct VoteReceipt<'a> {
            hash: &'a str,
            tally: &'a Tally,
        }
        return emit_json(&VoteReceipt {
            hash: election.ledger().head().hash(),
            tally: &tally,
        });
    }
    println!("{} Vote cast successfully!", "✓".green().bold());
    println!("  Entry: {}", election.ledger().head().hash().yellow());
    println!();
    print_tally(&tally);
    Ok(())
}

fn cmd_chain(station: &Station) -> anyhow::Result<()> {
    let ledger = store::load_ledger(&station.ledger_path)?;
    if station.json() {
        return emit_json(&ledger.entries());
    }
    for entry in ledger.entries() {
        println!("Voter ID: {}", entry.voter_id());
        println!("Vote: {}", entry.choice());
        println!("Previous Hash: {}", entry.previous_hash().dimmed());
        println!("Hash: {}", entry.hash().yellow());
        println!("---------------------------");
    }
    Ok(())
}

fn cmd_tally(station: &Station) -> anyhow::Result<()> {
    let election = station.open_election()?;
    let tally = election.tally();
    if station.json() {
        return emit_json(&tally);
    }
    print_tally(&tally);
    if election.ledger().is_closed() {
        println!("\n{}", "Election has ended.".red());
    }
    Ok(())
}

fn cmd_verify(station: &Station) -> anyhow::Result<()> {
    let snapshot = store::read_snapshot(&station.ledger_path)?;
    let entries = snapshot.entries.len();

    match Ledger::restore(snapshot) {
        Ok(ledger) => {
            if station.json() {
                return emit_json(&serde_json::json!({ "valid": true, "entries": entries }));
            }
            println!("{} Chain integrity verified", "✓".green().bold());
            println!("  Entries: {}", ledger.entry_count().to_string().bold());
            println!("  Head: {}", ledger.head().hash().yellow());
            if let Some(seal) = ledger.seal() {
                println!("  Sealed: {}", seal.yellow());
            }
            Ok(())
        }
        Err(err) => {
            if station.json() {
                emit_json(&serde_json::json!({
                    "valid": false,
                    "entries": entries,
                    "error": err.to_string(),
                }))?;
            } else {
                println!("{} Chain integrity check failed", "✗".red().bold());
                println!("  {}", err.to_string().red());
            }
            Err(err)
                .with_context(|| format!("ledger {} is not intact", station.ledger_path.display()))
        }
    }
}

fn cmd_close(station: &Station) -> anyhow::Result<()> {
    let mut election = station.open_election()?;
    let summary = election.close().context("cannot end election")?;

    let now = chrono::Local::now().naive_local();
    let report_path = record_close(
        &station.config.report.results_dir,
        &station.ledger_path,
        election.ledger(),
        &summary,
        now,
    )?;

    if station.json() {
        return emit_json(&summary);
    }
    println!("{} Election has ended!", "✓".green().bold());
    println!("  Results saved to: {}", report_path.display().to_string().bold());
    if let Some(winner) = &summary.winner {
        println!(
            "  Winner: {} with {} votes",
            winner.candidate.green().bold(),
            winner.votes
        );
    }
    Ok(())
}

/// Write the results report, then save the closed ledger.
///
/// The closed state is only saved once the report is on disk, and the
/// report is removed again if the save fails.
fn record_close(
    results_dir: &Path,
    ledger_path: &Path,
    ledger: &Ledger,
    summary: &ElectionSummary,
    at: NaiveDateTime,
) -> anyhow::Result<PathBuf> {
    let report_path = report::write(results_dir, summary, at)?;
    if let Err(err) = store::save_ledger(ledger_path, ledger) {
        if let Err(cleanup) = fs::remove_file(&report_path) {
            tracing::warn!(path = %report_path.display(), error = %cleanup, "could not remove report");
        }
        return Err(err);
    }
    Ok(report_path)
}

fn cmd_config(station: &Station) -> anyhow::Result<()> {
    if station.json() {
        return emit_json(&station.config);
    }
    print!("{}", toml::to_string_pretty(&station.config)?);
    println!("\n# effective ledger file: {}", station.ledger_path.display());
    Ok(())
}

fn print_tally(tally: &Tally) {
    println!("{}", "Live Vote Count:".bold());
    println!();
    for (candidate, votes) in tally.iter() {
        println!("{}: {} votes", candidate.cyan(), votes);
    }
}

fn emit_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
