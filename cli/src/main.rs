use clap::{Parser, Subcommand};
use image::Rgba;
use rand::Rng;

use asobiba::checkout::{create_checkout_session, HttpTransport, LineItem, CHECKOUT_BASE_URL_DEFAULT};
use asobiba_core::blocks::{BlocksAction, BlocksRules, BlocksState};
use asobiba_core::catalog::{game_by_slug, GAME_CATALOG};
use asobiba_paint::flood_fill;

#[derive(Parser)]
#[command(name = "asobiba-cli", version, about = "Utility tools for the asobiba games")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Games {
        #[command(subcommand)]
        command: GamesCommand,
    },
    Blocks {
        #[command(subcommand)]
        command: BlocksCommand,
    },
    Paint {
        #[command(subcommand)]
        command: PaintCommand,
    },
    Checkout {
        #[command(subcommand)]
        command: CheckoutCommand,
    },
}

#[derive(Subcommand)]
enum GamesCommand {
    List,
    Show {
        slug: String,
    },
}

#[derive(Subcommand)]
enum BlocksCommand {
    Sim {
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, default_value_t = 64)]
        drops: u32,
    },
}

#[derive(Subcommand)]
enum PaintCommand {
    Fill {
        #[arg(long)]
        input: String,
        #[arg(long)]
        output: String,
        #[arg(long)]
        x: u32,
        #[arg(long)]
        y: u32,
        #[arg(long)]
        color: String,
        #[arg(long, default_value_t = 0.0)]
        tolerance: f32,
    },
}

#[derive(Subcommand)]
enum CheckoutCommand {
    Create {
        #[arg(long, env = "CHECKOUT_BASE_URL", default_value = CHECKOUT_BASE_URL_DEFAULT)]
        base_url: String,
        #[arg(long = "item", required = true)]
        items: Vec<String>,
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Games { command } => match command {
            GamesCommand::List => {
                for entry in GAME_CATALOG {
                    println!("{}: {} ({})", entry.slug, entry.label, entry.tagline);
                }
            }
            GamesCommand::Show { slug } => match game_by_slug(&slug) {
                Some(entry) => {
                    println!("label: {}", entry.label);
                    println!("slug: {}", entry.slug);
                    println!("tagline: {}", entry.tagline);
                }
                None => {
                    eprintln!("unknown game: {slug}");
                    eprintln!("available games:");
                    for entry in GAME_CATALOG {
                        eprintln!("  {} ({})", entry.slug, entry.label);
                    }
                }
            },
        },
        Commands::Blocks { command } => match command {
            BlocksCommand::Sim { seed, drops } => {
                let seed = match seed.as_deref() {
                    Some(raw) => parse_seed_arg(raw)?,
                    None => rand::rng().random(),
                };
                run_blocks_sim(seed, drops);
            }
        },
        Commands::Paint { command } => match command {
            PaintCommand::Fill {
                input,
                output,
                x,
                y,
                color,
                tolerance,
            } => {
                let fill = parse_color_arg(&color)?;
                let mut canvas = image::open(&input)?.to_rgba8();
                let recolored = flood_fill(&mut canvas, x, y, fill, tolerance)?;
                canvas.save(&output)?;
                println!("recolored {recolored} pixels into {output}");
            }
        },
        Commands::Checkout { command } => match command {
            CheckoutCommand::Create {
                base_url,
                items,
                dry_run,
            } => {
                let line_items = items
                    .iter()
                    .map(|raw| parse_line_item(raw))
                    .collect::<Result<Vec<_>, _>>()?;
                for item in &line_items {
                    println!("item: {} x{}", item.title, item.quantity);
                }
                if dry_run {
                    println!("endpoint: {base_url}");
                    return Ok(());
                }
                let redirect = create_checkout_session(&HttpTransport, &base_url, &line_items)?;
                println!("checkout_url: {redirect}");
            }
        },
    }

    Ok(())
}

fn run_blocks_sim(seed: u32, drops: u32) {
    let mut state = BlocksState::new(BlocksRules::default(), seed);
    let mut performed = 0;
    for _ in 0..drops {
        if state.game_over {
            break;
        }
        state.apply(BlocksAction::Drop);
        performed += 1;
    }
    println!("seed: {seed:#010x}");
    println!("drops: {performed}");
    println!("score: {}", state.score);
    println!("cleared: {}", state.cleared);
    println!("level: {}", state.level());
    println!("game_over: {}", state.game_over);
}

fn parse_seed_arg(raw: &str) -> Result<u32, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    let value = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)?
    } else {
        trimmed.parse::<u32>()?
    };
    Ok(value)
}

fn parse_color_arg(raw: &str) -> Result<Rgba<u8>, String> {
    let hex = raw.trim().trim_start_matches('#');
    let channels = match hex.len() {
        6 => 3,
        8 => 4,
        _ => return Err(format!("expected #rrggbb or #rrggbbaa, got {raw}")),
    };
    let mut out = [0u8, 0, 0, 255];
    for channel in 0..channels {
        let slice = &hex[channel * 2..channel * 2 + 2];
        out[channel] =
            u8::from_str_radix(slice, 16).map_err(|_| format!("bad hex digit in {raw}"))?;
    }
    Ok(Rgba(out))
}

// "Title:qty" with an optional quantity; titles may themselves contain colons.
fn parse_line_item(raw: &str) -> Result<LineItem, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty line item".to_string());
    }
    if let Some((title, qty)) = trimmed.rsplit_once(':') {
        if let Ok(quantity) = qty.trim().parse::<u32>() {
            let title = title.trim();
            if title.is_empty() {
                return Err(format!("missing title in {raw}"));
            }
            return Ok(LineItem {
                title: title.to_string(),
                quantity,
            });
        }
    }
    Ok(LineItem {
        title: trimmed.to_string(),
        quantity: 1,
    })
}
