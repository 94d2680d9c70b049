//! Plain-text rendering of views for the terminal

use agri_gateway_trait::{Account, Crop};
use std::fmt::Write;

use crate::command::CommandOutcome;
use crate::session::Roles;
use crate::snapshot::LoadOutcome;
use crate::units::format_eth;
use crate::views::{ConsumerView, FarmerView, InspectorView, OwnerView, View, ViewKind};

/// Header line: account, badges, and the tabs on offer
pub fn header(account: Option<&Account>, roles: Roles, tabs: &[ViewKind], active: ViewKind) -> String {
    let mut out = String::new();
    match account {
        Some(account) => {
            let _ = write!(out, "Account {}", account.short());
            for badge in roles.badges() {
                let _ = write!(out, " [{}]", badge);
            }
        }
        None => out.push_str("No wallet connected"),
    }
    out.push_str("  |");
    for tab in tabs {
        if *tab == active {
            let _ = write!(out, " <{}>", tab);
        } else {
            let _ = write!(out, " {}", tab);
        }
    }
    out
}

pub fn view(view: &View) -> String {
    match view {
        View::Farmer(v) => farmer(v),
        View::Inspector(v) => inspector(v),
        View::Consumer(v) => consumer(v),
        View::Owner(v) => owner(v),
        View::AccessDenied { requested } => format!("Access denied: the active account cannot open the {} view.\n", requested),
        View::Disconnected => "Connect a wallet to see crops.\n".to_string(),
        View::SignedOut => "Sign in to use the dashboard.\n".to_string(),
    }
}

fn total(crop: &Crop) -> String {
    crop.total_price()
        .map(format_eth)
        .unwrap_or_else(|| "overflow".to_string())
}

fn crop_line(crop: &Crop) -> String {
    format!(
        "#{:<4} {:<18} {:<12} {:>8} kg @ {} ETH = {} ETH  grade {}",
        crop.id,
        crop.details.name,
        crop.details.crop_type,
        crop.details.quantity,
        format_eth(crop.details.unit_price),
        total(crop),
        crop.details.quality_grade,
    )
}

fn farmer(view: &FarmerView) -> String {
    let mut out = format!("My crops ({})\n", view.crops.len());
    if view.crops.is_empty() {
        out.push_str("  nothing uploaded yet\n");
    }
    for crop in &view.crops {
        let _ = write!(out, "  {}  [{}]", crop_line(crop), crop.status);
        if let Some(buyer) = &crop.buyer {
            let _ = write!(out, " bought by {}", buyer.short());
        }
        out.push('\n');
    }
    out
}

fn inspector(view: &InspectorView) -> String {
    let mut out = format!("Awaiting inspection ({})\n", view.pending.len());
    if view.pending.is_empty() {
        out.push_str("  nothing to inspect\n");
    }
    for crop in &view.pending {
        let _ = writeln!(
            out,
            "  {}  farmer {}  harvested {}  fertilizer '{}' pesticide '{}'",
            crop_line(crop),
            crop.farmer.short(),
            crop.details.harvest_date,
            crop.details.fertilizer_used,
            crop.details.pesticide_used,
        );
    }
    if view.hidden > 0 {
        let _ = writeln!(out, "  ({} hidden locally as disapproved)", view.hidden);
    }
    out
}

fn consumer(view: &ConsumerView) -> String {
    let filter = view.query.crop_type.as_deref().unwrap_or("all");
    let mut out = format!(
        "Marketplace ({} listed, sort: {}, type: {})\n",
        view.listings.len(),
        view.query.sort,
        filter
    );
    if !view.crop_types.is_empty() {
        let _ = writeln!(out, "  types: {}", view.crop_types.join(", "));
    }
    if view.listings.is_empty() {
        out.push_str("  nothing for sale\n");
    }
    for crop in &view.listings {
        let _ = writeln!(out, "  {}  from {}", crop_line(crop), crop.details.geo_location);
    }
    out
}

fn owner(view: &OwnerView) -> String {
    format!(
        "Owner panel for {}\n  add-inspector <address> registers a new inspector\n",
        view.owner
    )
}

pub fn outcome(outcome: &CommandOutcome) -> String {
    match outcome {
        CommandOutcome::Confirmed { receipt, reload } => {
            let block = receipt
                .block_number
                .map(|b| format!(" in block {}", b))
                .unwrap_or_default();
            format!("Confirmed {}{}; {}", receipt.tx_hash, block, after_mutation(reload))
        }
        CommandOutcome::Unconfirmed { tx_hash, reload } => format!(
            "Sent {} but confirmation was not observed, it may still go through; {}",
            tx_hash,
            after_mutation(reload)
        ),
        CommandOutcome::Disapproved { id, newly_hidden: true } => {
            format!("Crop #{} hidden from your pending list (local only)", id)
        }
        CommandOutcome::Disapproved { id, newly_hidden: false } => format!("Crop #{} was already hidden", id),
    }
}

fn after_mutation(reload: &Option<LoadOutcome>) -> String {
    match reload {
        Some(outcome) => load(outcome),
        None => "session changed, crops not refreshed".to_string(),
    }
}

pub fn load(outcome: &LoadOutcome) -> String {
    match outcome {
        LoadOutcome::Loaded { crops, .. } => format!("{} crops loaded", crops),
        LoadOutcome::Superseded { .. } => "a newer load is in progress".to_string(),
        LoadOutcome::Failed { .. } => "crop list could not be refreshed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_marks_active_tab() {
        let account = Account::parse("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        let roles = Roles {
            is_owner: true,
            is_inspector: false,
        };
        let line = header(
            Some(&account),
            roles,
            &ViewKind::available_tabs(roles),
            ViewKind::Consumer,
        );
        assert!(line.contains("[Owner]"));
        assert!(line.contains("<consumer>"));
        assert!(line.contains(" owner"));
    }

    #[test]
    fn test_access_denied_text() {
        let text = view(&View::AccessDenied {
            requested: ViewKind::Inspector,
        });
        assert!(text.contains("inspector"));
    }

    #[test]
    fn test_outcome_after_session_change() {
        let text = outcome(&CommandOutcome::Unconfirmed {
            tx_hash: "0xfeed".to_string(),
            reload: None,
        });
        assert!(text.contains("0xfeed"));
        assert!(text.contains("may still go through"));
        assert!(text.contains("session changed"));
    }
}
