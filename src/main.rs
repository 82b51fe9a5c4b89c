use std::path::{Path, PathBuf};
use std::process;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use itinerary_pdf::generate::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GeneratorConfig, OpenAiGenerator,
};
use itinerary_pdf::images::{
    Catalog, DEFAULT_IMAGE_COUNT, DestinationImageResolver, HttpImageFetcher, ImageFetcher,
    OfflineFetcher, collect_destination_images,
};
use itinerary_pdf::session::TravelSession;
use itinerary_pdf::trip::{DEFAULT_SOURCE_CITY, TripRequest};
use itinerary_pdf::{Error, ExportedDocument, ItineraryDocument, export_itinerary, save_export};

#[derive(Parser)]
#[command(name = "itinerary-pdf", version, about = "AI travel planner with PDF export")]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an itinerary and export it as a PDF
    Generate(GenerateArgs),
    /// Export a previously saved itinerary as a PDF
    Export(ExportArgs),
    /// Show which catalog image each destination resolves to
    Resolve {
        #[arg(required = true, value_name = "DESTINATION")]
        destinations: Vec<String>,
    },
}

#[derive(Args)]
struct TripArgs {
    /// City you are traveling from
    #[arg(long = "from", default_value = DEFAULT_SOURCE_CITY)]
    source_city: String,

    /// Destination city or country
    #[arg(long = "to")]
    destination: String,

    /// First travel day (YYYY-MM-DD)
    #[arg(long = "start")]
    start_date: NaiveDate,

    /// Last travel day (YYYY-MM-DD)
    #[arg(long = "end")]
    end_date: NaiveDate,

    #[arg(long, default_value = "")]
    interests: String,

    #[arg(long, default_value = "")]
    guardrails: String,
}

impl TripArgs {
    fn request(&self) -> TripRequest {
        TripRequest {
            source_city: self.source_city.clone(),
            destination: self.destination.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            interests: self.interests.clone(),
            guardrails: self.guardrails.clone(),
        }
    }
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    trip: TripArgs,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Also write the generated markdown to this file
    #[arg(long)]
    save_plan: Option<PathBuf>,

    /// Print the itinerary without building a PDF
    #[arg(long)]
    no_pdf: bool,

    /// Use local background files only
    #[arg(long)]
    offline_images: bool,
}

#[derive(Args)]
struct ExportArgs {
    /// Markdown itinerary to export
    #[arg(long)]
    plan: PathBuf,

    #[command(flatten)]
    trip: TripArgs,

    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Resolve watermark images from background files in this directory
    #[arg(long)]
    backgrounds: Option<PathBuf>,

    #[arg(long)]
    offline_images: bool,
}

fn fetcher(offline: bool) -> Result<Box<dyn ImageFetcher>, Error> {
    if offline {
        Ok(Box::new(OfflineFetcher))
    } else {
        Ok(Box::new(HttpImageFetcher::new()?))
    }
}

fn write_export(exported: &ExportedDocument, out_dir: &Path) -> Result<(), Error> {
    let path = save_export(exported, out_dir)?;
    println!(
        "PDF ready: {} ({} pages, {} bytes)",
        path.display(),
        exported.page_count,
        exported.bytes.len()
    );
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<(), Error> {
    let mut config = GeneratorConfig::new(args.api_key)?;
    config.base_url = args.base_url;
    config.model = args.model;
    config.temperature = args.temperature;

    let mut session = TravelSession::new(OpenAiGenerator::new(config)?);
    let doc = session.submit(&args.trip.request())?;
    if let Some(path) = &args.save_plan {
        std::fs::write(path, &doc.raw_text)?;
        log::info!("Saved itinerary text to {}", path.display());
    }
    if args.no_pdf {
        println!("{}", doc.raw_text);
        return Ok(());
    }

    let fetcher = fetcher(args.offline_images)?;
    let exported = session.export(fetcher.as_ref())?;
    write_export(&exported, &args.out_dir)
}

fn run_export(args: ExportArgs) -> Result<(), Error> {
    let meta = args.trip.request().validate()?;
    let raw_text = std::fs::read_to_string(&args.plan)?;
    let doc = ItineraryDocument::new(raw_text, meta);

    let mut resolver = match &args.backgrounds {
        Some(dir) => DestinationImageResolver::new(Catalog::local_backgrounds(dir)),
        None => DestinationImageResolver::default(),
    };
    let fetcher = fetcher(args.offline_images)?;
    let images = collect_destination_images(
        &mut resolver,
        fetcher.as_ref(),
        &doc.trip_meta.destination,
        DEFAULT_IMAGE_COUNT,
    );
    let exported = export_itinerary(&doc, images)?;
    write_export(&exported, &args.out_dir)
}

fn run_resolve(destinations: &[String]) {
    let mut resolver = DestinationImageResolver::default();
    for destination in destinations {
        let image = resolver.resolve(destination);
        println!(
            "{destination:?}\t{:?}\t{}\t{}",
            image.tier, image.key, image.reference
        );
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let _ = env_logger::builder()
        .filter_module("itinerary_pdf", level)
        .parse_default_env()
        .try_init();

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Export(args) => run_export(args),
        Command::Resolve { destinations } => {
            run_resolve(&destinations);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
