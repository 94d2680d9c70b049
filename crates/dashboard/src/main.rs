mod cli;

use agri_dashboard::{Command, ControllerOptions};
use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::prelude::*;

use crate::cli::mutate::{UploadArgs, handle_command, parse_account};
use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Validated when a controller is built; the demo and role hints need no chain
    let config = cli::setup::load_config(&cli)?;

    match cli.command {
        Commands::SelectRole { role } => {
            cli::setup::role_hints(&config).stash(role)?;
            println!("The {} view will open first next time", role);
            Ok(())
        }
        Commands::Roles => {
            let controller = cli::setup::build_controller(&config, ControllerOptions::from_config(&config))?;
            cli::query::handle_roles(controller).await
        }
        Commands::Crops {
            view,
            sort,
            crop_type,
            json,
        } => {
            let controller = cli::setup::build_controller(&config, ControllerOptions::from_config(&config))?;
            cli::query::handle_crops(controller, view, sort, crop_type, json).await
        }
        Commands::Upload {
            name,
            crop_type,
            quantity,
            price,
            harvest_date,
            fertilizer,
            pesticide,
            grade,
            image_hash,
            geo_location,
        } => {
            let details = UploadArgs {
                name,
                crop_type,
                quantity,
                price_eth: price,
                harvest_date,
                fertilizer,
                pesticide,
                grade,
                image_hash,
                geo_location,
            }
            .into_details()?;
            let controller = cli::setup::build_controller(&config, ControllerOptions::from_config(&config))?;
            handle_command(controller, Command::UploadCrop(details)).await
        }
        Commands::Approve { id } => {
            let controller = cli::setup::build_controller(&config, ControllerOptions::from_config(&config))?;
            handle_command(controller, Command::ApproveCrop(id)).await
        }
        Commands::Buy { id } => {
            let controller = cli::setup::build_controller(&config, ControllerOptions::from_config(&config))?;
            handle_command(controller, Command::BuyCrop(id)).await
        }
        Commands::AddInspector { address } => {
            let inspector = parse_account(&address)?;
            let controller = cli::setup::build_controller(&config, ControllerOptions::from_config(&config))?;
            handle_command(controller, Command::AddInspector(inspector)).await
        }
        Commands::Shell => {
            let initial_tab = cli::setup::role_hints(&config).take()?;
            let options = ControllerOptions::from_config(&config).with_initial_tab(initial_tab);
            let controller = cli::setup::build_controller(&config, options)?;
            cli::shell::run_shell(controller, None).await
        }
        Commands::Demo => {
            let initial_tab = cli::setup::role_hints(&config).take()?;
            cli::demo::handle_demo(initial_tab).await
        }
    }
}
