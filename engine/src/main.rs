// Engine main entry point: imports CSV line items into the working invoice
// and prints the resulting totals.
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use engine::config::settings::EngineSettings;
use engine::data::persistence::JsonFileStore;
use engine::services::{InvoiceService, NoticeKind};
use shared::i18n::Language;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: engine [--tax-rate PERCENT] [--lang cs|en] <file.csv>...";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    tax_rate: Option<f64>,
    language: Option<Language>,
    files: Vec<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tax-rate" => {
                let value = args.next().ok_or_else(|| anyhow!("--tax-rate needs a value\n{}", USAGE))?;
                let rate = value
                    .parse::<f64>()
                    .with_context(|| format!("Invalid tax rate '{}'", value))?;
                parsed.tax_rate = Some(rate);
            }
            "--lang" => {
                let value = args.next().ok_or_else(|| anyhow!("--lang needs a value\n{}", USAGE))?;
                parsed.language = Some(match value.as_str() {
                    "cs" => Language::Cs,
                    "en" => Language::En,
                    other => return Err(anyhow!("Unsupported language '{}'\n{}", other, USAGE)),
                });
            }
            flag if flag.starts_with("--") => return Err(anyhow!("Unknown option '{}'\n{}", flag, USAGE)),
            file => parsed.files.push(PathBuf::from(file)),
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("engine=info")))
        .init();

    info!("Starting invoice engine...");

    let args = parse_args(std::env::args().skip(1))?;
    let settings = EngineSettings::load()?;
    info!(storage = %settings.storage_path.display(), "Settings loaded");

    let store = Arc::new(JsonFileStore::new(settings.storage_path.clone()));
    let service = InvoiceService::open(store, settings, Local::now().date_naive())?;
    if let Some(language) = args.language {
        service.set_language(language);
    }
    if let Some(rate) = args.tax_rate {
        service.set_tax_rate(rate).await;
    }

    for path in &args.files {
        let result = service.import_csv_file(path).await;
        if let Some(notice) = service.import_notice(&result) {
            match notice.kind {
                NoticeKind::Success => info!(path = %path.display(), "{}", notice.message),
                NoticeKind::Error => warn!(path = %path.display(), "{}", notice.message),
            }
        }
    }

    let invoice = service.snapshot().await;
    let totals = service.totals().await;
    println!("{} ({})", invoice.invoice_number, invoice.currency);
    for item in &invoice.items {
        println!(
            "  {:<40} {:>6} x {:>12.2} = {:>12.2}",
            item.description,
            item.quantity,
            item.price,
            item.line_total()
        );
    }
    println!("  subtotal {:.2}", totals.subtotal);
    println!("  tax ({}%) {:.2}", invoice.tax_rate, totals.tax_amount);
    println!("  total {:.2}", totals.total);

    Ok(())
}
