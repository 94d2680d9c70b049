use agri_dashboard::{ConsumerQuery, ConsumerSort, DashboardController, ViewKind, render};
use agri_gateway_trait::{CropGateway, Wallet};
use anyhow::{Result, anyhow};

async fn connect<G, W>(controller: &DashboardController<G, W>) -> Result<()>
where
    G: CropGateway + 'static,
    W: Wallet + 'static,
{
    controller
        .connect()
        .await?
        .ok_or_else(|| anyhow!("The wallet exposes no accounts"))?;
    Ok(())
}

pub async fn handle_roles<G, W>(controller: DashboardController<G, W>) -> Result<()>
where
    G: CropGateway + 'static,
    W: Wallet + 'static,
{
    connect(&controller).await?;
    let state = controller.state();
    let roles = state.roles;

    println!("Account:   {}", state.account.map(|a| a.to_string()).unwrap_or_default());
    println!("Owner:     {}", roles.is_owner);
    println!("Inspector: {}", roles.is_inspector);
    let tabs: Vec<String> = ViewKind::available_tabs(roles).iter().map(ToString::to_string).collect();
    println!("Views:     {}", tabs.join(", "));
    Ok(())
}

pub async fn handle_crops<G, W>(
    controller: DashboardController<G, W>,
    view: ViewKind,
    sort: ConsumerSort,
    crop_type: Option<String>,
    json: bool,
) -> Result<()>
where
    G: CropGateway + 'static,
    W: Wallet + 'static,
{
    connect(&controller).await?;
    controller.set_consumer_query(ConsumerQuery::default().with_sort(sort).with_crop_type(crop_type.as_deref()));

    let view = controller.view(view);
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::view(&view));
    }
    Ok(())
}
