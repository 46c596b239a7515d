use clap::Parser;
use lead_pipeline::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Lead Pipeline - Daily Sales Lead Automation");
    println!("===========================================");
    println!();
    println!("Clean a daily lead sheet, register each lead in a simulated CRM,");
    println!("send a simulated welcome email and write a summary report.");
    println!();
    println!("USAGE:");
    println!("    lead-pipeline <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Process a lead sheet end to end (main command)");
    println!("    sample      Write a sample lead sheet to try the pipeline on");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Create sample data and run the pipeline on it:");
    println!("    lead-pipeline sample");
    println!("    lead-pipeline process");
    println!();
    println!("    # Custom files, 20% random CRM failures, reproducible:");
    println!("    lead-pipeline process --input daily.parquet --cleaned-output out/cleaned.parquet \\");
    println!("                          --report out/report.json --failure-rate 0.2 --seed 7");
    println!();
    println!("For detailed help on any command, use:");
    println!("    lead-pipeline <COMMAND> --help");
}
