use scrape_core::{AppViewModel, ProgressItemView, RunState, StatusClass};

/// Renders the whole dashboard as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let run_label = match view.run {
        RunState::Idle | RunState::Succeeded => None,
        RunState::Running => Some("Refreshing accounts..."),
        RunState::Failed => Some("Last refresh run failed"),
    };

    let mut lines = Vec::with_capacity(1 + view.accounts.len() * 2);
    lines.push(match run_label {
        Some(run) => format!("{} | {}", view.refresh_label, run),
        None => view.refresh_label.clone(),
    });

    for item in &view.accounts {
        render_item(item, &mut lines);
    }
    lines
}

fn render_item(item: &ProgressItemView, lines: &mut Vec<String>) {
    let disclosure = match (item.expandable, item.expanded) {
        (false, _) => ' ',
        (true, false) => '+',
        (true, true) => '-',
    };
    lines.push(format!(
        "{} {} {} ****{}  {}  (updated {})",
        disclosure,
        icon(item.icon),
        item.account_name,
        item.account_suffix,
        item.badge,
        item.last_updated
    ));

    if let Some(message) = &item.error_message {
        lines.push(format!("      ! {message}"));
    }
    for row in &item.history {
        match &row.message {
            Some(message) => lines.push(format!("      - {} ({}): {}", row.label, row.age, message)),
            None => lines.push(format!("      - {} ({})", row.label, row.age)),
        }
    }
}

fn icon(class: StatusClass) -> &'static str {
    match class {
        StatusClass::Loading => "[..]",
        StatusClass::Success => "[ok]",
        StatusClass::Error => "[x]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrape_core::HistoryRowView;

    fn item() -> ProgressItemView {
        ProgressItemView {
            account_name: "Everyday Checking".to_string(),
            account_number: "9876543210".to_string(),
            account_suffix: "3210".to_string(),
            badge: "Login failed".to_string(),
            icon: StatusClass::Error,
            last_updated: "2 minutes ago".to_string(),
            expandable: true,
            expanded: false,
            error_message: Some("Invalid credentials".to_string()),
            history: Vec::new(),
        }
    }

    #[test]
    fn header_includes_run_state() {
        let view = AppViewModel {
            refresh_label: "Last refresh: 5 minutes".to_string(),
            run: RunState::Running,
            ..AppViewModel::default()
        };
        assert_eq!(
            render(&view),
            vec!["Last refresh: 5 minutes | Refreshing accounts...".to_string()]
        );
    }

    #[test]
    fn collapsed_error_item_shows_banner() {
        let view = AppViewModel {
            refresh_label: "Refresh Accounts".to_string(),
            accounts: vec![item()],
            ..AppViewModel::default()
        };
        assert_eq!(
            render(&view),
            vec![
                "Refresh Accounts".to_string(),
                "+ [x] Everyday Checking ****3210  Login failed  (updated 2 minutes ago)"
                    .to_string(),
                "      ! Invalid credentials".to_string(),
            ]
        );
    }

    #[test]
    fn expanded_item_lists_history_rows() {
        let mut expanded = item();
        expanded.expanded = true;
        expanded.error_message = None;
        expanded.history = vec![
            HistoryRowView {
                label: "Login failed".to_string(),
                age: "2 minutes ago".to_string(),
                message: Some("Invalid credentials".to_string()),
            },
            HistoryRowView {
                label: "Logging in".to_string(),
                age: "3 minutes ago".to_string(),
                message: None,
            },
        ];
        let mut lines = Vec::new();
        render_item(&expanded, &mut lines);

        assert_eq!(
            lines,
            vec![
                "- [x] Everyday Checking ****3210  Login failed  (updated 2 minutes ago)"
                    .to_string(),
                "      - Login failed (2 minutes ago): Invalid credentials".to_string(),
                "      - Logging in (3 minutes ago)".to_string(),
            ]
        );
    }
}
