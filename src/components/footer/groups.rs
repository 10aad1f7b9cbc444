use super::types::{FooterGroup, FooterItem};
use crate::app::state::{AppMode, AppState};
use crate::domain::models::Route;

pub fn get_groups(state: &AppState) -> Vec<FooterGroup> {
    if state.search.is_open() {
        return vec![
            FooterGroup {
                name: "SEARCH",
                items: vec![
                    FooterItem::new("↑/↓", "move"),
                    FooterItem::new("Enter", "open"),
                    FooterItem::new("^U", "clear"),
                ],
            },
            FooterGroup {
                name: "PALETTE",
                items: vec![FooterItem {
                    key: "Esc/^K",
                    desc: "close",
                    highlighted: true,
                }],
            },
        ];
    }

    match state.mode {
        AppMode::Help => vec![FooterGroup {
            name: "HELP",
            items: vec![FooterItem::new("Esc/?", "close")],
        }],
        AppMode::Normal => {
            let mut nav = vec![FooterItem::new("^K", "search"), FooterItem::new("/", "find")];
            if state.route != Route::Home {
                nav.push(FooterItem::new("h", "home"));
            }
            vec![
                FooterGroup {
                    name: "NAV",
                    items: nav,
                },
                FooterGroup {
                    name: "APP",
                    items: vec![FooterItem::new("?", "help"), FooterItem::new("q", "quit")],
                },
            ]
        }
    }
}
