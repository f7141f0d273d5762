//! Terminal rendering of farm views and notifications.
//!
//! Everything here works from a [`FarmView`], which is read-only; drawing
//! the farm can never change it.

use homestead_core::notify::NotificationSink;
use homestead_core::view::{FarmView, PlotView};
use homestead_types::{Notification, PlotStatus, Severity};

/// Width of a progress bar in cells.
const BAR_CELLS: u8 = 10;

/// Prints notifications to stdout, one line each.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&mut self, notification: Notification) {
        tracing::debug!(
            command_id = %notification.command_id,
            severity = ?notification.severity,
            "Notification delivered"
        );
        println!("{}", format_notification(&notification));
    }
}

/// One-line form of a notification.
pub fn format_notification(notification: &Notification) -> String {
    let tag = match notification.severity {
        Severity::Success => "ok",
        Severity::Info => "info",
        Severity::Error => "error",
    };
    format!("[{tag}] {}", notification.message)
}

/// Multi-line farm summary.
pub fn render_farm(view: &FarmView) -> String {
    let ledger = &view.ledger;
    let mut lines = Vec::with_capacity(view.plots.len().saturating_add(3));

    lines.push(format!(
        "Gold {} | Energy {}/{} | Level {} ({}/{} xp)",
        ledger.currency,
        ledger.energy,
        ledger.max_energy,
        ledger.level,
        ledger.experience,
        ledger.experience_to_next_level,
    ));

    let house = ledger.house_label.as_deref().unwrap_or("Farmhouse");
    lines.push(match ledger.next_upgrade_cost {
        Some(cost) => format!("{house} (level {}), next upgrade {cost} gold", ledger.house_level),
        None => format!("{house} (level {}), fully upgraded", ledger.house_level),
    });

    lines.extend(view.plots.iter().map(render_plot));

    if !ledger.owned_decorations.is_empty() {
        let names: Vec<&str> = ledger
            .owned_decorations
            .iter()
            .map(homestead_types::DecorationId::as_str)
            .collect();
        lines.push(format!("Decorations: {}", names.join(", ")));
    }

    lines.join("\n")
}

/// One plot row.
pub fn render_plot(plot: &PlotView) -> String {
    if plot.status == PlotStatus::Empty {
        return format!("  {:<4} (empty)", plot.id.to_string());
    }

    let name = plot
        .crop_name
        .clone()
        .or_else(|| plot.crop_id.as_ref().map(ToString::to_string))
        .unwrap_or_default();
    let state = if plot.ready {
        "READY".to_owned()
    } else {
        format!("{:>3}% {:>4}s", plot.percent, plot.remaining_secs)
    };
    let mut row = format!(
        "  {:<4} {:<14} {} {}",
        plot.id.to_string(),
        name,
        progress_bar(plot.percent),
        state
    );
    for malady in &plot.maladies {
        row.push(' ');
        row.push_str(malady.as_str());
    }
    row
}

/// `[#####-----]` style bar for a whole percent.
pub fn progress_bar(percent: u8) -> String {
    bar(percent, BAR_CELLS)
}

/// Bar of `cells` cells with `percent * cells / 100` filled, rounded down.
fn bar(percent: u8, cells: u8) -> String {
    let filled = u16::from(percent.min(100))
        .checked_mul(u16::from(cells))
        .and_then(|scaled| scaled.checked_div(100))
        .and_then(|filled| u8::try_from(filled).ok())
        .unwrap_or(0);
    let empty = cells.saturating_sub(filled);
    format!(
        "[{}{}]",
        "#".repeat(usize::from(filled)),
        "-".repeat(usize::from(empty))
    )
}

/// Short line for the advisory refresh: only mentions ready crops.
pub fn render_ready_hint(view: &FarmView) -> Option<String> {
    let ready: Vec<String> = view
        .plots
        .iter()
        .filter(|p| p.ready)
        .map(|p| p.id.to_string())
        .collect();
    if ready.is_empty() {
        None
    } else {
        Some(format!("Ready to harvest: {}", ready.join(" ")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homestead_core::rules::GameRules;
    use homestead_core::state::GameState;
    use homestead_types::{CommandId, CropId, PlotId};
    use homestead_world::Catalog;

    use super::*;

    #[test]
    fn progress_bar_fills_by_tenths() {
        assert_eq!(progress_bar(0), "[----------]");
        assert_eq!(progress_bar(48), "[####------]");
        assert_eq!(progress_bar(100), "[##########]");
        assert_eq!(progress_bar(250), "[##########]");
    }

    #[test]
    fn bar_scales_to_its_width() {
        assert_eq!(bar(50, 20), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(bar(99, 4), "[###-]");
        assert_eq!(bar(100, 4), "[####]");
        assert_eq!(bar(24, 4), "[----]");
        assert_eq!(bar(25, 4), "[#---]");
    }

    #[test]
    fn notification_tags() {
        let note = Notification {
            command_id: CommandId::new(),
            message: "Planted Cabbage!".to_owned(),
            severity: Severity::Success,
        };
        assert_eq!(format_notification(&note), "[ok] Planted Cabbage!");
    }

    #[test]
    fn farm_rendering_shows_growing_and_ready() {
        let catalog = Catalog::standard();
        let mut state = GameState::new_game(&GameRules::default());
        state
            .plot_mut(PlotId(0))
            .unwrap()
            .plant(&CropId::from("radish"), &catalog, 0)
            .unwrap();
        state
            .plot_mut(PlotId(1))
            .unwrap()
            .plant(&CropId::from("corn"), &catalog, 0)
            .unwrap();

        let view = FarmView::build(&state, &catalog, 30_000);
        let text = render_farm(&view);
        assert!(text.starts_with("Gold 100 | Energy 100/100 | Level 1"));
        assert!(text.contains("Thatched Cottage (level 1), next upgrade 500 gold"));
        assert!(text.contains("White Radish"));
        assert!(text.contains("READY"));
        assert!(text.contains(" 25%   90s"));
        assert!(text.contains("(empty)"));
        assert_eq!(render_ready_hint(&view).unwrap(), "Ready to harvest: #0");
    }

    #[test]
    fn no_hint_when_nothing_ready() {
        let view = FarmView::build(
            &GameState::new_game(&GameRules::default()),
            &Catalog::standard(),
            0,
        );
        assert!(render_ready_hint(&view).is_none());
    }
}
