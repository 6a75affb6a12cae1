use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use ledger_core::{
    build_display_rows, build_income_book_with_report, document_year, AggregateOptions,
    AmountColumn, ColumnMapping, EntryEdit, IncomeEntry, LedgerDocument, LedgerRow, Locale,
    RowFilter,
};
use ledger_export::format::row_cells;
use ledger_export::{export_csv_file, export_html_file, export_xlsx_file, ExportOptions};
use ledger_ingest::read_statement;
use log::info;
use std::path::{Path, PathBuf};

mod config;
mod state;

use config::Config;
use state::DocumentStore;

#[derive(Parser, Debug)]
#[command(
    name = "income-ledger",
    version,
    about = "Income ledger for single-tax entrepreneurs, built from bank statements"
)]
struct Cli {
    /// Debug logging (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the ledger from a statement export and remember it
    Build {
        /// Statement file: .xlsx/.xls/.ods workbook or CSV/TSV text export
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        date_col: Option<String>,

        #[arg(long)]
        amount_col: Option<String>,

        #[arg(long)]
        description_col: Option<String>,

        /// Keep one row per statement line instead of one per day
        #[arg(long)]
        no_group: bool,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Show statement columns and the detected mapping
    Columns {
        #[arg(long)]
        input: PathBuf,
    },

    /// Rebuild the last saved ledger
    Last {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Set one amount on a saved ledger row (omit --value to clear it)
    Edit {
        /// Row id as shown by `--ids`, e.g. 2024-01-15 or manual-3
        #[arg(long)]
        id: String,

        /// cash, non-cash, refund, transit or own
        #[arg(long)]
        column: AmountColumn,

        #[arg(long)]
        value: Option<f64>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Append a blank row to the saved ledger
    AddRow {
        #[arg(long, value_parser = parse_cli_date)]
        date: NaiveDate,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Forget the saved ledger
    Reset,

    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Hide period subtotals
    #[arg(long)]
    no_summaries: bool,

    /// Only rows dated on or after (YYYY-MM-DD or DD.MM.YYYY)
    #[arg(long, value_parser = parse_cli_date)]
    from: Option<NaiveDate>,

    /// Only rows dated on or before
    #[arg(long, value_parser = parse_cli_date)]
    to: Option<NaiveDate>,

    /// Case-insensitive match on the date column text
    #[arg(long)]
    search: Option<String>,

    /// Label language (uk, en); defaults to config
    #[arg(long)]
    locale: Option<Locale>,

    /// Print row ids (needed for `edit`)
    #[arg(long)]
    ids: bool,

    /// Write an Excel workbook
    #[arg(long)]
    xlsx: Option<PathBuf>,

    /// Write the ledger as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a printable HTML document
    #[arg(long)]
    html: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Build {
            input,
            date_col,
            amount_col,
            description_col,
            no_group,
            view,
        } => {
            let cfg = config::load_config()?;
            let statement = read_statement(&input)?;
            if statement.is_empty() {
                bail!("{} has a header but no rows", input.display());
            }

            let mapping = ColumnMapping::auto_detect(&statement.columns, &ColumnMapping::default())
                .overridden(date_col, amount_col, description_col);
            if !mapping.is_complete() {
                bail!(
                    "could not detect date/amount columns in {} (pass --date-col and --amount-col; see `income-ledger columns --input ...`)",
                    input.display()
                );
            }
            for column in [Some(&mapping.date), Some(&mapping.amount), mapping.description.as_ref()]
                .into_iter()
                .flatten()
            {
                if !statement.columns.contains(column) {
                    bail!("column {column:?} is not in {}", input.display());
                }
            }

            let mut doc = LedgerDocument::new(statement, mapping);
            doc.group_by_day = cfg.ledger.group_by_day && !no_group;
            doc.show_summaries = cfg.ledger.show_summaries;

            let (entries, report) = build_income_book_with_report(
                &doc.raw_rows,
                &doc.raw_columns,
                &doc.mapping,
                AggregateOptions {
                    group_by_day: doc.group_by_day,
                },
            );
            println!(
                "Read {} rows from {}: {} income entries ({} debit, {} not income, {} undated skipped)\n",
                report.rows_seen,
                input.display(),
                report.entries,
                report.debit_rows,
                report.not_income,
                report.undated
            );

            render(&doc, &entries, &cfg, &view)?;
            DocumentStore::open_default()?.save(&doc);
        }

        Command::Columns { input } => {
            let statement = read_statement(&input)?;
            let mapping = ColumnMapping::auto_detect(&statement.columns, &ColumnMapping::default());

            println!("{} columns, {} rows\n", statement.columns.len(), statement.rows.len());
            for (idx, column) in statement.columns.iter().enumerate() {
                let role = if *column == mapping.date {
                    "  <- date"
                } else if *column == mapping.amount {
                    "  <- amount"
                } else if mapping.description.as_ref() == Some(column) {
                    "  <- description"
                } else {
                    ""
                };
                println!("{:>3}. {}{}", idx + 1, column, role);
            }
            if !mapping.is_complete() {
                println!("\nMapping incomplete; pass --date-col / --amount-col to `build`.");
            }
        }

        Command::Last { view } => {
            let cfg = config::load_config()?;
            let (_, doc) = load_saved()?;
            render(&doc, &doc.entries(), &cfg, &view)?;
        }

        Command::Edit {
            id,
            column,
            value,
            view,
        } => {
            let edit = EntryEdit::SetAmount { id, column, value };
            apply_edit(edit, &view)?;
        }

        Command::AddRow { date, view } => {
            apply_edit(EntryEdit::AddRow { date }, &view)?;
        }

        Command::Reset => {
            let store = DocumentStore::open_default()?;
            store.clear()?;
            println!("Cleared {}", store.path().display());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let p = config::config_path()?;
                let cfg = config::load_config()?;
                println!("# {}", p.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn parse_cli_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d.%m.%Y"))
        .map_err(|_| format!("expected YYYY-MM-DD or DD.MM.YYYY, got {s:?}"))
}

fn load_saved() -> Result<(DocumentStore, LedgerDocument)> {
    let store = DocumentStore::open_default()?;
    let Some(doc) = store.load() else {
        bail!(
            "No saved ledger at {}. Run: income-ledger build --input <statement>",
            store.path().display()
        );
    };
    Ok((store, doc))
}

fn apply_edit(edit: EntryEdit, view: &ViewArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let (store, mut doc) = load_saved()?;
    doc.record_edit(edit)?;
    store.save(&doc);
    render(&doc, &doc.entries(), &cfg, view)
}

/// Display rows for `entries` after the summary switch and filter.
fn visible_rows(
    entries: &[IncomeEntry],
    show_summaries: bool,
    locale: Locale,
    filter: &RowFilter,
) -> Vec<LedgerRow> {
    let rows = build_display_rows(entries, show_summaries, locale);
    let visible: Vec<LedgerRow> = filter.apply(&rows).into_iter().cloned().collect();
    info!("{} of {} ledger rows visible", visible.len(), rows.len());
    visible
}

fn render(doc: &LedgerDocument, entries: &[IncomeEntry], cfg: &Config, view: &ViewArgs) -> Result<()> {
    let locale = view.locale.unwrap_or(cfg.ledger.locale);
    let filter = RowFilter {
        search: view.search.clone(),
        from: view.from,
        to: view.to,
    };
    let visible = visible_rows(
        entries,
        doc.show_summaries && !view.no_summaries,
        locale,
        &filter,
    );

    print_table(&visible, locale, view.ids);

    let mut opts = ExportOptions::new(locale, document_year(entries, Local::now().year()));
    opts.title = cfg.export.title();
    opts.delimiter = cfg.export.delimiter_byte()?;

    if let Some(path) = &view.xlsx {
        export_xlsx_file(path, &visible, &opts)?;
        report_written(path);
    }
    if let Some(path) = &view.csv {
        export_csv_file(path, &visible, &opts)?;
        report_written(path);
    }
    if let Some(path) = &view.html {
        export_html_file(path, &visible, &opts)?;
        report_written(path);
    }
    Ok(())
}

fn report_written(path: &Path) {
    println!("Wrote {}", path.display());
}

fn print_table(rows: &[LedgerRow], locale: Locale, with_ids: bool) {
    if rows.is_empty() {
        println!("(no income rows)");
        return;
    }

    let headers = locale.headers();
    let cells: Vec<[String; 7]> = rows.iter().map(|r| row_cells(r, locale)).collect();

    let mut widths: [usize; 7] = headers.map(|h| h.chars().count());
    for line in &cells {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let pad = |text: &str, width: usize, left: bool| {
        let fill = " ".repeat(width.saturating_sub(text.chars().count()));
        if left { format!("{text}{fill}") } else { format!("{fill}{text}") }
    };

    let header_line: Vec<String> = headers
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(idx, (h, w))| pad(h, w, idx == 0))
        .collect();
    println!(" {}", header_line.join(" | "));
    println!(" {}", widths.map(|w| "-".repeat(w)).join("-+-"));

    for (row, line) in rows.iter().zip(&cells) {
        let rendered: Vec<String> = line
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (c, w))| pad(c, w, idx == 0))
            .collect();
        let marker = if row.is_summary() { "*" } else { " " };
        if with_ids {
            println!("{marker}{}  [{}]", rendered.join(" | "), row.id());
        } else {
            println!("{marker}{}", rendered.join(" | "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
        assert_eq!(Cli::command().get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_parse_edit() {
        let cli = Cli::try_parse_from([
            "income-ledger",
            "edit",
            "--id",
            "2024-01-15",
            "--column",
            "refund",
            "--value",
            "12.5",
            "--xlsx",
            "out.xlsx",
        ])
        .unwrap();
        match cli.command {
            Command::Edit {
                id,
                column,
                value,
                view,
            } => {
                assert_eq!(id, "2024-01-15");
                assert_eq!(column, AmountColumn::Refund);
                assert_eq!(value, Some(12.5));
                assert_eq!(view.xlsx, Some(PathBuf::from("out.xlsx")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_dates_both_forms() {
        assert_eq!(parse_cli_date("2024-03-01"), Ok(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert_eq!(parse_cli_date("01.03.2024"), Ok(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(parse_cli_date("March 1").is_err());
        assert!(Cli::try_parse_from(["income-ledger", "add-row", "--date", "nope"]).is_err());
    }

    #[test]
    fn test_visible_rows_reuse_given_entries() {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        let entries = vec![
            IncomeEntry::non_cash("2024-01-10", d(1, 10), 10.0),
            IncomeEntry::non_cash("2024-02-10", d(2, 10), 20.0),
        ];
        let filter = RowFilter {
            from: Some(d(2, 1)),
            ..RowFilter::default()
        };
        let rows = visible_rows(&entries, true, Locale::Uk, &filter);
        assert_eq!(rows[0].id(), "2024-02-10");
        assert!(rows[1..].iter().all(LedgerRow::is_summary));

        let bare = visible_rows(&entries, false, Locale::Uk, &RowFilter::default());
        assert_eq!(bare.len(), 2);
    }
}
