extern crate elpris;

use clap::Parser;
use elpris::core::grid::{
    NetworkTariffSource, StaticTariffTable, DEFAULT_NETWORK_TARIFF_KR_PER_KWH,
};
use elpris::output::FileOutput;
use elpris::run_comparison;
use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct ElprisArgs {
    input_file: String,
    #[arg(
        long,
        short,
        help = "Path to a network tariff table in .csv format, consulted ahead of the bundled one"
    )]
    tariff_file: Option<String>,
    #[arg(long, short, help = "Directory to write result files to")]
    output_dir: Option<String>,
    #[clap(long, default_value_t = false, help = "Whether to log out spans")]
    log_spans: bool,
}

fn main() -> anyhow::Result<()> {
    let args = ElprisArgs::parse();

    // set up basic tracing
    let tracing_subscriber = {
        let mut builder = tracing_subscriber::fmt::fmt().with_max_level(tracing::Level::TRACE);

        if args.log_spans {
            builder = builder.with_span_events(FmtSpan::CLOSE);
        }

        builder.finish()
    };
    tracing::subscriber::set_global_default(tracing_subscriber)
        .expect("setting tracing subscriber failed");

    let input_file = args.input_file.as_str();
    let input_file_ext = Path::new(input_file).extension().and_then(OsStr::to_str);
    let input_file_stem = match input_file_ext {
        Some(ext) => &input_file[..(input_file.len() - ext.len() - 1)],
        None => input_file,
    };
    let input_file_stem = PathBuf::from(input_file_stem);

    let output_path = match args.output_dir {
        Some(ref dir) => PathBuf::from(dir),
        None => PathBuf::from(format!("{}__results", input_file_stem.to_str().unwrap())),
    };
    fs::create_dir_all(&output_path)?;
    let input_file_name = input_file_stem.file_name().unwrap().to_str().unwrap();
    let file_output = FileOutput::new(output_path, format!("{input_file_name}__{{}}.{{}}"));

    let tariff_table = match args.tariff_file {
        Some(ref file) => Some(StaticTariffTable::from_csv(
            BufReader::new(File::open(file)?),
            DEFAULT_NETWORK_TARIFF_KR_PER_KWH.into(),
        )?),
        None => None,
    };

    let results = run_comparison(
        BufReader::new(File::open(Path::new(input_file))?),
        &file_output,
        tariff_table
            .as_ref()
            .map(|table| table as &dyn NetworkTariffSource),
    )?;

    for (position, offer) in results.offers.iter().enumerate() {
        info!(
            "{}. {}{} at {:.2} kr/kWh incl. VAT, estimated {:.2} kr/month",
            position + 1,
            offer.provider,
            if offer.pinned { " (pinned)" } else { "" },
            offer.price_incl_vat.value(),
            offer.monthly_cost,
        );
    }

    debug!("JSON results: {}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
