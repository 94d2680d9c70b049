use agri_dashboard::{ConsumerSort, ViewKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agri-dashboard")]
#[command(about = "Agri supply-chain dashboard", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, env = "AGRI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ethereum JSON-RPC endpoint
    #[arg(long, global = true, env = "AGRI_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Deployed AgriSupplyChain contract address
    #[arg(long, global = true, env = "AGRI_CONTRACT_ADDRESS")]
    pub contract_address: Option<String>,

    /// Sign transactions locally with this key instead of node-managed accounts
    #[arg(long, global = true, env = "AGRI_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the active account and its roles
    Roles,

    /// List the crops visible in a role view
    Crops {
        /// farmer, inspector, consumer or owner
        #[arg(long, default_value = "consumer")]
        view: ViewKind,

        /// Marketplace order: name, price, quantity or grade
        #[arg(long, default_value = "name")]
        sort: ConsumerSort,

        /// Only show this crop type in the marketplace ("all" for every type)
        #[arg(long)]
        crop_type: Option<String>,

        /// Print the view as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Upload a new crop as the active account
    Upload {
        #[arg(long)]
        name: String,

        #[arg(long)]
        crop_type: String,

        /// Quantity in kg
        #[arg(long)]
        quantity: u128,

        /// Price per kg in ETH (e.g. 0.002)
        #[arg(long)]
        price: String,

        /// Harvest date, e.g. 2025-05-20
        #[arg(long)]
        harvest_date: String,

        #[arg(long, default_value = "")]
        fertilizer: String,

        #[arg(long, default_value = "")]
        pesticide: String,

        /// Quality grade, e.g. A
        #[arg(long)]
        grade: String,

        /// IPFS hash of the crop image
        #[arg(long, default_value = "")]
        image_hash: String,

        /// Where the crop was grown, e.g. "Lat:28.61, Long:77.20"
        #[arg(long, default_value = "")]
        geo_location: String,
    },

    /// Approve an uploaded crop (inspectors only)
    Approve {
        /// Crop id
        id: u64,
    },

    /// Buy an approved crop at its total price
    Buy {
        /// Crop id
        id: u64,
    },

    /// Register an inspector (owner only)
    AddInspector {
        /// Inspector address
        address: String,
    },

    /// Remember which role view to open first next time
    SelectRole {
        /// farmer, inspector, consumer or owner
        role: ViewKind,
    },

    /// Interactive dashboard that follows wallet account changes
    Shell,

    /// Interactive dashboard against an in-memory contract with sample data
    Demo,
}
