use agri_dashboard::{Command, DashboardController, render, units};
use agri_gateway_trait::{Account, CropDetails, CropGateway, Wallet};
use anyhow::{Result, anyhow};

/// Upload form as entered on the command line
pub struct UploadArgs {
    pub name: String,
    pub crop_type: String,
    pub quantity: u128,
    pub price_eth: String,
    pub harvest_date: String,
    pub fertilizer: String,
    pub pesticide: String,
    pub grade: String,
    pub image_hash: String,
    pub geo_location: String,
}

impl UploadArgs {
    pub fn into_details(self) -> Result<CropDetails> {
        Ok(CropDetails {
            name: self.name,
            crop_type: self.crop_type,
            quantity: self.quantity,
            unit_price: units::parse_eth(&self.price_eth)?,
            harvest_date: self.harvest_date,
            fertilizer_used: self.fertilizer,
            pesticide_used: self.pesticide,
            quality_grade: self.grade,
            image_hash: self.image_hash,
            geo_location: self.geo_location,
        })
    }
}

pub fn parse_account(address: &str) -> Result<Account> {
    Account::parse(address).map_err(|e| anyhow!("Invalid address '{}': {}", address, e))
}

/// Connect, run one command and wait for it to be confirmed
pub async fn handle_command<G, W>(controller: DashboardController<G, W>, command: Command) -> Result<()>
where
    G: CropGateway + 'static,
    W: Wallet + 'static,
{
    let account = controller
        .connect()
        .await?
        .ok_or_else(|| anyhow!("The wallet exposes no accounts"))?;

    println!("Submitting {} as {}...", command, account);
    let outcome = controller.execute(command).await?;
    println!("{}", render::outcome(&outcome));
    Ok(())
}
