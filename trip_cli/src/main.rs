use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use trip_core::*;

#[derive(Parser)]
#[command(name = "trip")]
#[command(about = "Travel itinerary planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override export directory
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    /// Show more log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage itineraries
    #[command(subcommand)]
    Itinerary(ItineraryCommand),

    /// Manage packing lists
    #[command(subcommand)]
    Pack(PackCommand),

    /// Track expenses
    #[command(subcommand)]
    Expense(ExpenseCommand),

    /// Export an itinerary's data to Markdown or CSV
    Export {
        /// What to export (itinerary, packing, expenses)
        kind: ExportKind,

        /// Itinerary ID
        itinerary_id: String,

        /// Output format (md or csv)
        #[arg(long, default_value = "md")]
        format: ExportFormat,
    },
}

#[derive(Subcommand)]
enum ItineraryCommand {
    /// Create an itinerary
    Add(AddItinerary),
    /// List itineraries
    List {
        /// Only itineraries with this tag
        #[arg(long)]
        tag: Option<String>,

        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },
    /// Show one itinerary
    Show { id: String },
    /// Edit an itinerary
    Edit(EditItinerary),
    /// Delete an itinerary
    Delete { id: String },
    /// Add a tag
    Tag { id: String, tag: String },
    /// Remove a tag
    Untag { id: String, tag: String },
    /// Mark as favorite
    Favorite { id: String },
    /// Clear the favorite mark
    Unfavorite { id: String },
    /// List favorite itineraries
    Favorites,
    /// Search by name, or by name and description with --keyword
    Search {
        query: String,

        #[arg(long)]
        keyword: bool,
    },
}

#[derive(Args)]
struct AddItinerary {
    #[arg(long)]
    name: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start: String,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Tag to attach (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Args)]
struct EditItinerary {
    id: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    start: Option<String>,

    #[arg(long)]
    end: Option<String>,

    #[arg(long)]
    description: Option<String>,
}

#[derive(Subcommand)]
enum PackCommand {
    /// Add an item to an itinerary's packing list
    Add {
        itinerary_id: String,
        name: String,

        #[arg(long, short, default_value_t = 1)]
        quantity: u32,
    },
    /// List an itinerary's packing items
    List { itinerary_id: String },
    /// Toggle an item between packed and unpacked
    Toggle { item_id: String },
    /// Remove an item
    Remove { item_id: String },
}

#[derive(Subcommand)]
enum ExpenseCommand {
    /// Record an expense
    Add {
        itinerary_id: String,

        #[arg(allow_negative_numbers = true)]
        amount: f64,

        category: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value = "")]
        description: String,
    },
    /// List an itinerary's expenses
    List { itinerary_id: String },
    /// Totals per category
    Summary { itinerary_id: String },
    /// Remove an expense
    Remove { expense_id: String },
}

/// Stores opened on the resolved data directory
struct App {
    itineraries: ItineraryStore,
    packing: PackingStore,
    expenses: ExpenseStore,
    export_dir: PathBuf,
}

impl App {
    fn open(data_dir: PathBuf, export_dir: PathBuf) -> Self {
        let paths = DataPaths::new(data_dir);
        tracing::debug!("Using data directory {:?}", paths.root());
        Self {
            itineraries: ItineraryStore::open(paths.itineraries()),
            packing: PackingStore::open(paths.packing_items()),
            expenses: ExpenseStore::open(paths.expenses()),
            export_dir,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.verbose {
        0 => trip_core::logging::init(),
        1 => trip_core::logging::init_with_level("info"),
        _ => trip_core::logging::init_with_level("debug"),
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    let export_dir = match cli.export_dir {
        Some(dir) => dir,
        None if config.export.export_dir.is_none() => data_dir.join("exports"),
        None => config.export_dir(),
    };
    let app = App::open(data_dir, export_dir);

    match cli.command {
        Commands::Itinerary(cmd) => cmd_itinerary(&app, cmd),
        Commands::Pack(cmd) => cmd_pack(&app, cmd),
        Commands::Expense(cmd) => cmd_expense(&app, cmd),
        Commands::Export {
            kind,
            itinerary_id,
            format,
        } => cmd_export(&app, kind, &itinerary_id, format),
    }
}

fn cmd_itinerary(app: &App, cmd: ItineraryCommand) -> Result<()> {
    let store = &app.itineraries;

    match cmd {
        ItineraryCommand::Add(args) => {
            let itinerary = store.add(NewItinerary {
                name: args.name,
                start_date: args.start,
                end_date: args.end,
                description: args.description,
                tags: args.tags,
            })?;
            println!("✓ Itinerary created with ID: {}", itinerary.id);
        }
        ItineraryCommand::List { tag, favorites } => {
            let itineraries = match (tag, favorites) {
                (Some(tag), true) => store
                    .list_by_tag(&tag)?
                    .into_iter()
                    .filter(|i| i.is_favorite)
                    .collect(),
                (Some(tag), false) => store.list_by_tag(&tag)?,
                (None, true) => store.list_favorites()?,
                (None, false) => store.list()?,
            };
            print_itineraries(&itineraries);
        }
        ItineraryCommand::Show { id } => {
            let itinerary = store.find(&id)?;
            print!("{}", trip_core::markdown::itinerary_markdown(&itinerary));
        }
        ItineraryCommand::Edit(args) => {
            let itinerary = store.update(
                &args.id,
                ItineraryUpdate {
                    name: args.name,
                    start_date: args.start,
                    end_date: args.end,
                    description: args.description,
                },
            )?;
            println!("✓ Itinerary {} updated", itinerary.id);
        }
        ItineraryCommand::Delete { id } => {
            let removed = store.delete(&id)?;
            println!("✓ Itinerary '{}' deleted", removed.name);
        }
        ItineraryCommand::Tag { id, tag } => {
            let outcome = store.add_tag(&id, &tag)?;
            println!("{}", outcome.describe(tag.trim()));
        }
        ItineraryCommand::Untag { id, tag } => {
            let outcome = store.remove_tag(&id, &tag)?;
            println!("{}", outcome.describe(tag.trim()));
        }
        ItineraryCommand::Favorite { id } => {
            let itinerary = store.set_favorite(&id, true)?;
            println!("★ '{}' marked as favorite", itinerary.name);
        }
        ItineraryCommand::Unfavorite { id } => {
            let itinerary = store.set_favorite(&id, false)?;
            println!("'{}' removed from favorites", itinerary.name);
        }
        ItineraryCommand::Favorites => {
            print_itineraries(&store.list_favorites()?);
        }
        ItineraryCommand::Search { query, keyword } => {
            let found = if keyword {
                store.search_by_keyword(&query)?
            } else {
                store.search_by_name(&query)?
            };
            print_itineraries(&found);
        }
    }

    Ok(())
}

fn cmd_pack(app: &App, cmd: PackCommand) -> Result<()> {
    let store = &app.packing;

    match cmd {
        PackCommand::Add {
            itinerary_id,
            name,
            quantity,
        } => {
            let item = store.add_item(&itinerary_id, &name, quantity)?;
            println!("✓ Packing item added with ID: {}", item.id);
        }
        PackCommand::List { itinerary_id } => {
            let items = store.list_items(&itinerary_id)?;
            if items.is_empty() {
                println!("No packing items found for itinerary {}.", itinerary_id);
            }
            for item in items {
                let mark = if item.packed { "x" } else { " " };
                println!("[{}] {}x {} ({})", mark, item.quantity, item.name, item.id);
            }
        }
        PackCommand::Toggle { item_id } => {
            let packed = store.mark_packed(&item_id)?;
            let state = if packed { "packed" } else { "unpacked" };
            println!("✓ Item {} marked as {}", item_id, state);
        }
        PackCommand::Remove { item_id } => {
            let removed = store.remove_item(&item_id)?;
            println!("✓ Removed '{}'", removed.name);
        }
    }

    Ok(())
}

fn cmd_expense(app: &App, cmd: ExpenseCommand) -> Result<()> {
    let store = &app.expenses;

    match cmd {
        ExpenseCommand::Add {
            itinerary_id,
            amount,
            category,
            date,
            description,
        } => {
            let expense = store.add_expense(NewExpense {
                itinerary_id,
                amount,
                category,
                date,
                description,
            })?;
            println!("✓ Expense added with ID: {}", expense.id);
        }
        ExpenseCommand::List { itinerary_id } => {
            let expenses = store.list_expenses(&itinerary_id)?;
            if expenses.is_empty() {
                println!("No expenses recorded for itinerary {}.", itinerary_id);
            }
            for e in expenses {
                println!(
                    "{}  {}  {:>10.2}  {}  {}",
                    e.id, e.date, e.amount, e.category, e.description
                );
            }
        }
        ExpenseCommand::Summary { itinerary_id } => {
            let summary = store.summary(&itinerary_id)?;
            let mut total = 0.0;
            for (category, amount) in &summary {
                println!("{}: {:.2}", category, amount);
                total += amount;
            }
            println!("Total: {:.2}", total);
        }
        ExpenseCommand::Remove { expense_id } => {
            store.remove_expense(&expense_id)?;
            println!("✓ Expense {} removed", expense_id);
        }
    }

    Ok(())
}

fn cmd_export(app: &App, kind: ExportKind, itinerary_id: &str, format: ExportFormat) -> Result<()> {
    let engine = ExportEngine::new(&app.itineraries, &app.packing, &app.expenses, &app.export_dir);
    let path = engine.export(kind, format, itinerary_id)?;

    println!("✓ Exported {} to {}", kind, path.display());
    Ok(())
}

fn print_itineraries(itineraries: &[Itinerary]) {
    if itineraries.is_empty() {
        println!("No itineraries found.");
        return;
    }

    for itinerary in itineraries {
        let star = if itinerary.is_favorite { "★ " } else { "" };
        let tags = if itinerary.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", itinerary.tags.join(", "))
        };
        println!(
            "{}{}  {}  {} → {}{}",
            star, itinerary.id, itinerary.name, itinerary.start_date, itinerary.end_date, tags
        );
    }
}
