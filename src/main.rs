use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use planokit::designer::scene::{room_extent, to_scene};
use planokit::designer::validity::check_placement;
use planokit::{
    import_planogram, init_logging, Config, FileStore, FloorPlan, FloorPlanRepository, Product,
    ProductCatalog, BUILD_DATE, VERSION,
};
use planokit_core::units::format_footprint;

#[derive(Parser, Debug)]
#[command(name = "planokit")]
#[command(about = "Inspect store floor plans, planograms and saved data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Summarise a floor plan and its scene projection
    Inspect {
        /// Floor plan JSON file
        plan: PathBuf,
    },

    /// Check a planogram envelope against a product catalog
    Planogram {
        /// Planogram envelope JSON file
        envelope: PathBuf,

        /// Product catalog JSON file
        products: Option<PathBuf>,
    },

    /// List stored floor plans
    Plans {
        /// Data directory (defaults to the configured one)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config {
        /// Config file (defaults to the platform config directory)
        path: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect { plan } => inspect(&plan),
        Commands::Planogram { envelope, products } => planogram(&envelope, products.as_deref()),
        Commands::Plans { data_dir } => plans(data_dir),
        Commands::Config { path } => config(path.as_deref()),
        Commands::Version => {
            println!("planokit {} (built {})", VERSION, BUILD_DATE);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };
    Config::load_or_default(&path).with_context(|| format!("Failed to load config {}", path.display()))
}

fn inspect(path: &Path) -> anyhow::Result<()> {
    let config = load_config(None)?;
    let plan = FloorPlan::load_from_file(path)?;
    let unit = config.editor.unit_system;

    println!("{} ({})", plan.name, plan.id);
    println!("  created {}  updated {}", plan.created_at, plan.updated_at);

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for element in &plan.elements {
        *by_type.entry(element.element_type.as_str()).or_default() += 1;
    }
    println!("  {} elements", plan.elements.len());
    for (element_type, count) in &by_type {
        println!("    {:<12} {}", element_type, count);
    }
    if let Some(bounds) = plan.bounds() {
        println!("  footprint {}", format_footprint(bounds.width(), bounds.height(), unit));
    }

    let (plan_width, plan_depth) = room_extent(&plan.elements, 0.0);
    let room_width = plan_width.max(config.scene.room_width);
    let room_depth = plan_depth.max(config.scene.room_depth);
    println!("  scene room {:.2}m x {:.2}m", room_width, room_depth);
    for element in &plan.elements {
        let placement = check_placement(element, &plan.elements, config.editor.wall_tolerance);
        let scene = to_scene(element, room_width, room_depth);
        let status = match placement.reason {
            Some(reason) => reason.message(element.element_type),
            None => "ok",
        };
        println!(
            "    {:<24} {:<10} at ({:.2}, {:.2}, {:.2})  {}",
            element.id,
            element.element_type.as_str(),
            scene.x,
            scene.y,
            scene.z,
            status
        );
    }
    Ok(())
}

fn planogram(envelope: &Path, products: Option<&Path>) -> anyhow::Result<()> {
    let catalog = match products {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read product catalog {}", path.display()))?;
            let products: Vec<Product> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse product catalog {}", path.display()))?;
            ProductCatalog::from_products(products)
        }
        None => ProductCatalog::new(),
    };

    let content = std::fs::read_to_string(envelope)
        .with_context(|| format!("Failed to read planogram {}", envelope.display()))?;
    let import = import_planogram(&content, &catalog)?;

    println!("Planogram {}", import.envelope.planogram_info.nom_planogram);
    for check in &import.furniture {
        match check.resolved {
            Some(kind) => println!("  furniture {:<10} {} -> {}", check.furniture_id, check.type_name, kind.as_str()),
            None => println!("  furniture {:<10} {} (incompatible)", check.furniture_id, check.type_name),
        }
    }
    let missing: Vec<&str> = import
        .products
        .iter()
        .filter(|p| !p.found)
        .map(|p| p.product_id.as_str())
        .collect();
    println!(
        "  {} product positions, {} not found in catalog",
        import.products.len(),
        missing.len()
    );
    for product_id in missing {
        println!("    missing {}", product_id);
    }
    Ok(())
}

fn plans(data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let data_dir = match data_dir {
        Some(dir) => dir,
        None => load_config(None)?.storage.data_dir,
    };
    let repo = FloorPlanRepository::new(
        FileStore::open(&data_dir).with_context(|| format!("Failed to open {}", data_dir.display()))?,
    );
    let active = repo.active_id()?;
    let plans = repo.list()?;
    if plans.is_empty() {
        println!("No floor plans in {}", data_dir.display());
    }
    for plan in plans {
        let marker = if active.as_deref() == Some(plan.id.as_str()) { "*" } else { " " };
        println!(
            "{} {:<40} {:<24} {} elements",
            marker,
            plan.id,
            plan.name,
            plan.elements.len()
        );
    }
    Ok(())
}

fn config(path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(path)?;
    print!(
        "{}",
        toml::to_string_pretty(&config).context("Failed to serialize config")?
    );
    Ok(())
}
