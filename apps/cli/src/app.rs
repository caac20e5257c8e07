//! # One Operation, End to End
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         run_operation()                                 │
//! │                                                                         │
//! │  1. Client identity ────── flags or prompts                            │
//! │  2. Market inputs ──────── flags or prompts                            │
//! │  3. compute() ──────────── DivisionByZero aborts here                  │
//! │  4. archive.prepare() ──── output dir created, file name free          │
//! │  5. issue_next() ───────── counter file advanced                       │
//! │  6. Record assembled + saved                                           │
//! │  7. Client message, ticket line, summary, saved path printed           │
//! │                                                                         │
//! │  Steps 1-4 fail without consuming a ticket code.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use cambista_core::message::{client_message, executive_summary, ticket_line, ClientQuote};
use cambista_core::{compute, ClientIdentity, MarketInputs, OperationRecord, TicketCode};
use cambista_store::{FileCounterStore, OperationArchive, TicketSequencer};
use chrono::NaiveDateTime;
use tracing::info;

use crate::cli::OperationArgs;
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::prompt::Prompter;

const BANNER_WIDTH: usize = 50;

/// What a successful operation produced.
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    pub ticket: TicketCode,
    pub record_path: PathBuf,
}

/// Runs one purchase operation.
///
/// `now` is captured once by the caller and used for the record timestamp,
/// the file name and the ticket line date.
pub fn run_operation<R: BufRead, W: Write>(
    config: &AppConfig,
    args: &OperationArgs,
    prompter: &mut Prompter<R, W>,
    now: NaiveDateTime,
) -> CliResult<OperationOutcome> {
    heading(prompter.output(), '=', "SISTEMA DE GESTIÓN DE COMPRA BRL/ARS")?;

    let code = given_or_ask(prompter, args.client_code, "Ingrese el código del cliente: ")?;
    let last_name = text_or_ask(prompter, &args.last_name, "Ingrese el apellido del cliente: ")?;
    let first_name = text_or_ask(prompter, &args.first_name, "Ingrese el nombre del cliente: ")?;
    let client = ClientIdentity::new(code, &last_name, &first_name)?;

    heading(prompter.output(), '-', "DATOS DE LA OPERACIÓN")?;

    let inputs = MarketInputs::new(
        given_or_ask(prompter, args.brl_usd_rate, "Ingrese la cotización de BRL a USD: ")?,
        given_or_ask(prompter, args.usd_ars_rate, "Ingrese la cotización de USD a ARS: ")?,
        given_or_ask(prompter, args.brl_amount, "Ingrese el importe en BRL que desea comprar: ")?,
        given_or_ask(
            prompter,
            args.profit_brl,
            "Ingrese la ganancia en BRL por cada USD vendido: ",
        )?,
        given_or_ask(
            prompter,
            args.profit_ars,
            "Ingrese la ganancia en ARS por cada USD vendido: ",
        )?,
    );

    let quote = compute(&inputs)?;

    let archive = OperationArchive::new(&config.storage.output_dir);
    archive.prepare(&OperationRecord::file_name_for(&client, &inputs, now))?;

    let mut sequencer = TicketSequencer::new(
        FileCounterStore::new(&config.storage.counter_file),
        config.ticket.prefix.as_str(),
    );
    let ticket = sequencer.issue_next()?;

    let record = OperationRecord::assemble(&client, &inputs, &quote, &ticket, now);
    let record_path = archive.save(&record)?;

    let out = prompter.output();

    heading(out, '=', "PRESUPUESTO PARA EL CLIENTE")?;
    writeln!(out, "{}", client_message(&ClientQuote::new(&client, &inputs, &quote)))?;

    heading(out, '=', "TICKET DE OPERACIÓN")?;
    writeln!(out, "{}", ticket_line(&ticket, now, &client, inputs.brl_amount))?;

    heading(out, '=', "RESUMEN EJECUTIVO")?;
    writeln!(out, "{}", executive_summary(&client, &inputs, &quote))?;
    writeln!(out, "\nDatos guardados en: {}\n", record_path.display())?;

    info!(ticket = %ticket, path = %record_path.display(), "Operation complete");

    Ok(OperationOutcome {
        ticket,
        record_path,
    })
}

/// Prints the last issued ticket, or that none was issued yet.
pub fn show_counter<W: Write>(config: &AppConfig, out: &mut W) -> CliResult<()> {
    let sequencer = TicketSequencer::new(
        FileCounterStore::new(&config.storage.counter_file),
        config.ticket.prefix.as_str(),
    );

    match sequencer.peek()? {
        Some(counter) => writeln!(
            out,
            "Último ticket emitido: {}",
            TicketCode::new(sequencer.prefix(), counter)
        )?,
        None => writeln!(out, "Todavía no se emitió ningún ticket.")?,
    }
    Ok(())
}

fn heading<W: Write>(out: &mut W, rule: char, title: &str) -> std::io::Result<()> {
    let line: String = std::iter::repeat(rule).take(BANNER_WIDTH).collect();
    writeln!(out, "\n{}", line)?;
    writeln!(out, "{:^width$}", title, width = BANNER_WIDTH)?;
    writeln!(out, "{}", line)
}

fn given_or_ask<R, W, T>(
    prompter: &mut Prompter<R, W>,
    given: Option<T>,
    label: &str,
) -> CliResult<T>
where
    R: BufRead,
    W: Write,
    T: FromStr,
{
    match given {
        Some(value) => Ok(value),
        None => prompter.ask_parsed(label),
    }
}

fn text_or_ask<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    given: &Option<String>,
    label: &str,
) -> CliResult<String> {
    match given {
        Some(value) => Ok(value.clone()),
        None => prompter.ask_text(label),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
