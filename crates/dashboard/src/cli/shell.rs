use agri_dashboard::{
    AuthState, Command, ConsumerQuery, DashboardController, DashboardError, ViewKind, render, units,
};
use agri_gateway_trait::{CropDetails, CropGateway, CropId, Wallet};
use anyhow::{Result, anyhow};
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::cli::demo::DemoHooks;
use crate::cli::mutate::parse_account;

const HELP: &str = "\
Commands:
  view                      show the active tab
  tab <name>                switch to farmer, inspector, consumer or owner
  tabs                      list the tabs on offer
  reload                    re-fetch every crop
  connect                   ask the wallet for accounts again
  sort <name|price|quantity|grade>
  type <crop type|all>      filter the marketplace
  upload <name> <type> <kg> <price eth/kg> <harvest date> <grade>
  approve <id>              approve an uploaded crop
  disapprove <id>           hide a crop from your pending list (local only)
  buy <id>                  buy a listed crop
  add-inspector <address>   register an inspector
  signin | signout          change sign-in state
  quit";

const DEMO_HELP: &str = "\
Demo:
  switch <owner|farmer|inspector|consumer>   change the wallet account
  disconnect                                 empty the wallet";

enum Flow {
    Continue,
    Quit,
}

fn print_screen<G, W>(controller: &DashboardController<G, W>)
where
    G: CropGateway + 'static,
    W: Wallet + 'static,
{
    let state = controller.state();
    println!(
        "\n{}",
        render::header(
            state.account.as_ref(),
            state.roles,
            &ViewKind::available_tabs(state.roles),
            state.active_tab,
        )
    );
    print!("{}", render::view(&controller.current_view()));
}

/// Interactive loop; wallet account changes are applied as they arrive
pub async fn run_shell<G, W>(controller: DashboardController<G, W>, demo: Option<DemoHooks>) -> Result<()>
where
    G: CropGateway + 'static,
    W: Wallet + 'static,
{
    if let Err(e) = controller.connect().await {
        println!("Wallet not connected: {}; use 'connect' to retry", e);
    }
    let mut changes = controller.follow_account_changes().await;

    println!("{}", HELP);
    if demo.is_some() {
        println!("{}", DEMO_HELP);
    }
    print_screen(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_line(&controller, demo.as_ref(), line.trim()).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => println!("Error: {}", e),
                }
            }
            Some(accounts) = changes.next() => {
                debug!("Wallet accounts changed: {:?}", accounts);
                match controller.handle_accounts_changed(accounts).await {
                    Some(account) => println!("Switched to {}", account),
                    None => println!("Wallet disconnected"),
                }
                print_screen(&controller);
            }
        }
    }
    Ok(())
}

async fn handle_line<G, W>(controller: &DashboardController<G, W>, demo: Option<&DemoHooks>, line: &str) -> Result<Flow>
where
    G: CropGateway + 'static,
    W: Wallet + 'static,
{
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, args)) = words.split_first() else {
        return Ok(Flow::Continue);
    };

    match verb {
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" => {
            println!("{}", HELP);
            if demo.is_some() {
                println!("{}", DEMO_HELP);
            }
        }
        "view" | "ls" => print_screen(controller),
        "tabs" => {
            let tabs: Vec<String> = controller.available_tabs().iter().map(ToString::to_string).collect();
            println!("{}", tabs.join(", "));
        }
        "tab" => {
            let tab: ViewKind = arg(args, 0, "tab name")?.parse()?;
            controller.select_tab(tab);
            print_screen(controller);
        }
        "reload" => println!("{}", render::load(&controller.reload().await)),
        "connect" => match controller.connect().await? {
            Some(account) => {
                println!("Connected as {}", account);
                print_screen(controller);
            }
            None => println!("The wallet exposes no accounts"),
        },
        "sort" => {
            let query = controller.state().consumer_query.with_sort(arg(args, 0, "sort order")?.parse()?);
            controller.set_consumer_query(query);
            print_screen(controller);
        }
        "type" => {
            let crop_type = args.join(" ");
            let query: ConsumerQuery = controller
                .state()
                .consumer_query
                .with_crop_type(Some(crop_type.as_str()));
            controller.set_consumer_query(query);
            print_screen(controller);
        }
        "upload" => submit(controller, Command::UploadCrop(upload_details(args)?)),
        "approve" => submit(controller, Command::ApproveCrop(crop_id(args)?)),
        "buy" => submit(controller, Command::BuyCrop(crop_id(args)?)),
        "add-inspector" => submit(
            controller,
            Command::AddInspector(parse_account(arg(args, 0, "address")?)?),
        ),
        "disapprove" => {
            let outcome = controller.execute(Command::Disapprove(crop_id(args)?)).await?;
            println!("{}", render::outcome(&outcome));
        }
        "signin" => {
            controller.set_auth_state(AuthState::SignedIn);
            print_screen(controller);
        }
        "signout" => {
            controller.set_auth_state(AuthState::SignedOut);
            print_screen(controller);
        }
        "switch" | "disconnect" => match demo {
            Some(hooks) if verb == "switch" => hooks.switch(arg(args, 0, "account name")?)?,
            Some(hooks) => hooks.disconnect(),
            None => println!("'{}' is only available in demo mode", verb),
        },
        other => println!("Unknown command '{}', try 'help'", other),
    }
    Ok(Flow::Continue)
}

/// Run a mutation in the background so the prompt stays usable while it confirms
fn submit<G, W>(controller: &DashboardController<G, W>, command: Command)
where
    G: CropGateway + 'static,
    W: Wallet + 'static,
{
    let controller = controller.clone();
    println!("Submitting {}...", command);
    tokio::spawn(async move {
        let label = command.to_string();
        match controller.execute(command).await {
            Ok(outcome) => println!("{}: {}", label, render::outcome(&outcome)),
            Err(e @ DashboardError::MutationInFlight { .. }) => println!("{}: {}", label, e),
            Err(e) => {
                warn!("{} failed: {}", label, e);
                println!("{} failed: {}", label, e);
            }
        }
    });
}

fn arg<'a>(args: &[&'a str], index: usize, what: &str) -> Result<&'a str> {
    args.get(index).copied().ok_or_else(|| anyhow!("missing {}", what))
}

fn crop_id(args: &[&str]) -> Result<CropId> {
    let raw = arg(args, 0, "crop id")?;
    raw.trim_start_matches('#')
        .parse()
        .map_err(|_| anyhow!("'{}' is not a crop id", raw))
}

fn upload_details(args: &[&str]) -> Result<CropDetails> {
    if args.len() < 6 {
        return Err(anyhow!(
            "usage: upload <name> <type> <kg> <price eth/kg> <harvest date> <grade>"
        ));
    }
    Ok(CropDetails {
        name: args[0].to_string(),
        crop_type: args[1].to_string(),
        quantity: args[2]
            .parse()
            .map_err(|_| anyhow!("'{}' is not a quantity", args[2]))?,
        unit_price: units::parse_eth(args[3])?,
        harvest_date: args[4].to_string(),
        fertilizer_used: String::new(),
        pesticide_used: String::new(),
        quality_grade: args[5].to_string(),
        image_hash: String::new(),
        geo_location: String::new(),
    })
}
