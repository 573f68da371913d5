use colored::Colorize;

use crate::{
    orchestrator::{EntryReport, Outcome, Summary},
    registry::RegistryEntry,
};

const RULE_WIDTH: usize = 60;

/// Receives progress of a run as it happens, in registry order.
pub trait Reporter {
    fn started(&mut self, network: &str, total: usize);
    fn attempting(&mut self, entry: &RegistryEntry);
    fn finished(&mut self, report: &EntryReport);
    fn completed(&mut self, summary: &Summary);
}

/// Human readable report on stdout, failures on stderr.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn started(&mut self, network: &str, total: usize) {
        println!("\n🔍 Starting BscScan verification on {network}...");
        println!("{}", "═".repeat(RULE_WIDTH));
        if total == 0 {
            println!("No contracts registered for {network}, nothing to verify.");
        }
    }

    fn attempting(&mut self, entry: &RegistryEntry) {
        println!("\n📋 Verifying {} at {}...", entry.name, entry.address);
    }

    fn finished(&mut self, report: &EntryReport) {
        match report.outcome {
            Outcome::Failed(_) => eprintln!("{}", entry_line(report)),
            _ => println!("{}", entry_line(report)),
        }
    }

    fn completed(&mut self, summary: &Summary) {
        println!("\n{}", "═".repeat(RULE_WIDTH));
        println!("{}", summary_line(summary));
        log::info!(
            "{} newly verified, {} already verified, {} failed",
            summary.newly_verified(),
            summary.already_verified(),
            summary.failed()
        );
        if summary.failed() > 0 {
            eprintln!(
                "{} contract(s) failed, re-run the task after fixing the errors above",
                summary.failed()
            );
        }

        let explorer = summary.explorer.explorer;
        println!(
            "\n📊 View verified contracts on BscScan:\n  {}",
            explorer.browser_url()
        );
        for entry in summary.entries.iter().filter(|e| e.outcome.is_verified()) {
            println!("  {}: {}", entry.name, explorer.address_url(entry.address.as_ref()));
        }
        if summary.explorer.fallback {
            println!(
                "  (no explorer is known for {}, showing the {} explorer)",
                summary.network, explorer
            );
        }
    }
}

#[must_use]
pub fn entry_line(report: &EntryReport) -> String {
    match &report.outcome {
        Outcome::Succeeded => format!(
            "✅ {} {}",
            report.name,
            "verified successfully!".green()
        ),
        Outcome::AlreadyVerified => format!(
            "⚠️  {} {}",
            report.name,
            "is already verified on BscScan".yellow()
        ),
        Outcome::Failed(reason) => format!(
            "❌ {} {} {reason}",
            report.name,
            "verification failed:".red()
        ),
    }
}

#[must_use]
pub fn summary_line(summary: &Summary) -> String {
    format!(
        "✨ Verification complete! ({}/{} contracts)",
        summary.verified(),
        summary.attempted()
    )
}
