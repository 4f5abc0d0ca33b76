use clap::{Args, Parser, Subcommand};
use lift_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftmap")]
#[command(about = "Turn free-text workouts into structured strength plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific exercise catalog file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Log how each line is classified and matched (stderr)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse workout text and show how each line was understood
    Parse {
        #[command(flatten)]
        input: WorkoutInput,

        /// Print parsed workout and payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the remote-service workout payload as JSON
    Export {
        #[command(flatten)]
        input: WorkoutInput,
    },

    /// Search the exercise catalog
    Search {
        /// Exercise name to look for
        query: String,

        /// Maximum number of results
        #[arg(long, short, default_value_t = 5)]
        limit: usize,
    },

    /// Add or replace a catalog mapping
    Add {
        /// Exercise name as it appears in workouts
        name: String,

        /// Canonical exercise name
        #[arg(long)]
        canonical: String,

        /// Exercise category
        #[arg(long)]
        category: String,

        /// Muscle worked (repeatable)
        #[arg(long = "muscle")]
        muscles: Vec<String>,
    },

    /// List every catalog mapping
    List,
}

#[derive(Args)]
struct WorkoutInput {
    /// Workout as plain text
    #[arg(long, short, conflicts_with = "file")]
    text: Option<String>,

    /// Read workout text from a file
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Workout name
    #[arg(long, short, default_value = "Workout")]
    name: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        lift_core::logging::init_with_level("debug");
    } else {
        lift_core::logging::init();
    }

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
        config.catalog.path = None;
    }
    if let Some(catalog) = cli.catalog {
        config.catalog.path = Some(catalog);
    }

    match cli.command {
        Commands::Parse { input, json } => cmd_parse(&config, &input, json),
        Commands::Export { input } => cmd_export(&config, &input),
        Commands::Search { query, limit } => cmd_search(&config, &query, limit),
        Commands::Add {
            name,
            canonical,
            category,
            muscles,
        } => cmd_add(&config, &name, canonical, category, muscles),
        Commands::List => cmd_list(&config),
    }
}

fn open_catalog(config: &Config) -> Catalog {
    let path = config.catalog_path();
    tracing::debug!("Using exercise catalog at {:?}", path);
    Catalog::open(path)
}

fn parse_input(config: &Config, catalog: &Catalog, input: &WorkoutInput) -> Result<ParsedWorkout> {
    let text = match (&input.text, &input.file) {
        (Some(text), _) => text.clone(),
        (None, Some(file)) => std::fs::read_to_string(file)?,
        (None, None) => return Err(Error::Input("Provide --text or --file".into())),
    };

    let parser = LineParser::new()?.with_defaults(config.parser_defaults());
    let assembler = WorkoutAssembler::with_parser(catalog, parser);
    Ok(assembler.parse_workout(&text, &input.name))
}

fn cmd_parse(config: &Config, input: &WorkoutInput, json: bool) -> Result<()> {
    let catalog = open_catalog(config);
    let workout = parse_input(config, &catalog, input)?;

    if json {
        let output = serde_json::json!({
            "parsed": workout,
            "payload": WorkoutPayload::from_workout(&workout),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    display_workout(&workout);
    Ok(())
}

fn cmd_export(config: &Config, input: &WorkoutInput) -> Result<()> {
    let catalog = open_catalog(config);
    let workout = parse_input(config, &catalog, input)?;

    for warning in &workout.warnings {
        eprintln!("⚠ {}", warning);
    }

    let payload = WorkoutPayload::from_workout(&workout);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn cmd_search(config: &Config, query: &str, limit: usize) -> Result<()> {
    let catalog = open_catalog(config);
    let matcher = Matcher::new(&catalog);
    let hits = matcher.search(query, limit);

    if hits.is_empty() {
        println!("No matches for '{}'", query);
        return Ok(());
    }

    println!("Matches for '{}':", query);
    for hit in hits {
        match catalog.lookup(&hit.key) {
            Some(entry) => println!(
                "  {:>3}%  {} -> {} ({})",
                hit.score, hit.key, entry.canonical_name, entry.category
            ),
            None => println!("  {:>3}%  {}", hit.score, hit.key),
        }
    }
    Ok(())
}

fn cmd_add(
    config: &Config,
    name: &str,
    canonical: String,
    category: String,
    muscles: Vec<String>,
) -> Result<()> {
    let mut catalog = open_catalog(config);
    let key = catalog.add(name, canonical.clone(), category.clone(), muscles)?;

    println!("✓ Added '{}' -> {} ({})", key, canonical, category);
    if let Some(path) = catalog.path() {
        println!("  Catalog: {}", path.display());
    }
    Ok(())
}

fn cmd_list(config: &Config) -> Result<()> {
    let catalog = open_catalog(config);

    if catalog.is_empty() {
        println!("Exercise catalog is empty.");
        return Ok(());
    }

    println!("{} exercises:", catalog.len());
    for (key, entry) in catalog.entries() {
        if entry.muscles.is_empty() {
            println!("  {} -> {} ({})", key, entry.canonical_name, entry.category);
        } else {
            println!(
                "  {} -> {} ({}) [{}]",
                key,
                entry.canonical_name,
                entry.category,
                entry.muscles.join(", ")
            );
        }
    }
    Ok(())
}

fn display_workout(workout: &ParsedWorkout) {
    println!(
        "Parsed '{}' - {} exercises:",
        workout.name,
        workout.exercise_count()
    );

    let mut section: Option<&str> = None;
    for line in &workout.lines {
        if line.section.as_deref() != section {
            section = line.section.as_deref();
            if let Some(title) = section {
                println!("\n  [{}]", title);
            }
        }

        let confidence = line.confidence();
        let indicator = if confidence >= CONFIDENCE_THRESHOLD {
            "✓"
        } else if confidence >= 50 {
            "?"
        } else {
            "✗"
        };

        println!();
        println!("  {} {}", indicator, line.raw_name);
        println!(
            "      -> {} ({}) [{}% confidence]",
            line.matched.entry.canonical_name,
            line.prescription(),
            confidence
        );
    }

    if !workout.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &workout.warnings {
            println!("  ⚠ {}", warning);
        }
    }
}
