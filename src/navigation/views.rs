//! Built-in placeholder views.
//!
//! The real experiment views (canvas games and Bevy apps compiled to WASM)
//! live outside this crate. These describe what gets mounted for each route
//! so the navigator and the dev server have something concrete to show.

use crate::navigation::view::{escape_html, MountContext, Mounted, View};
use crate::routing::Params;

/// Landing page listing the known experiments.
#[derive(Debug, Clone, Default)]
pub struct HomeView {
    experiments: Vec<String>,
}

impl HomeView {
    pub const ID: &'static str = "home";

    pub fn new(experiments: Vec<String>) -> Self {
        Self { experiments }
    }
}

impl View for HomeView {
    fn id(&self) -> &str {
        Self::ID
    }

    fn mount(&self, ctx: &MountContext<'_>) -> Mounted {
        let mut body = String::from("<ul class=\"experiments\">");
        for experiment in &self.experiments {
            let params = Params::new().with("experiment", experiment.as_str());
            body.push_str("<li>");
            body.push_str(&escape_html(experiment));
            // Links follow whichever routes the views are bound to.
            for (view, label) in [(GameView::ID, "canvas"), (BevyView::ID, "bevy")] {
                for entry in ctx.table.bound_to(view) {
                    if let Ok(href) = ctx.table.href(entry.name(), &params) {
                        body.push_str(&format!(
                            " <a href=\"{}\">{}</a>",
                            escape_html(&href),
                            label
                        ));
                    }
                }
            }
            body.push_str("</li>");
        }
        body.push_str("</ul>");

        Mounted {
            view: Self::ID.to_string(),
            title: "Experiments".to_string(),
            target: "#app".to_string(),
            body,
        }
    }
}

/// Hosts a canvas-based experiment.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameView;

impl GameView {
    pub const ID: &'static str = "game";
}

impl View for GameView {
    fn id(&self) -> &str {
        Self::ID
    }

    fn mount(&self, ctx: &MountContext<'_>) -> Mounted {
        let experiment = ctx.params.get("experiment").unwrap_or_default();
        Mounted {
            view: Self::ID.to_string(),
            title: format!("Experiment: {experiment}"),
            target: "#app".to_string(),
            body: format!(
                "<canvas id=\"game\" data-experiment=\"{}\"></canvas>",
                escape_html(experiment)
            ),
        }
    }
}

/// Hosts a Bevy app, which renders into the `#bevy` canvas.
#[derive(Debug, Clone, Copy, Default)]
pub struct BevyView;

impl BevyView {
    pub const ID: &'static str = "bevy";
}

impl View for BevyView {
    fn id(&self) -> &str {
        Self::ID
    }

    fn mount(&self, ctx: &MountContext<'_>) -> Mounted {
        let experiment = ctx.params.get("experiment").unwrap_or_default();
        Mounted {
            view: Self::ID.to_string(),
            title: format!("Bevy: {experiment}"),
            target: "#bevy".to_string(),
            body: format!(
                "<canvas id=\"bevy\" data-experiment=\"{}\"></canvas>",
                escape_html(experiment)
            ),
        }
    }
}

/// Error view mounted for unmatched paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundView;

impl NotFoundView {
    pub const ID: &'static str = "not_found";
}

impl View for NotFoundView {
    fn id(&self) -> &str {
        Self::ID
    }

    fn mount(&self, ctx: &MountContext<'_>) -> Mounted {
        let mut body = format!(
            "<p>Nothing lives at <code>{}</code>.</p>",
            escape_html(ctx.path)
        );
        let home = ctx
            .table
            .bound_to(HomeView::ID)
            .find_map(|entry| ctx.table.href(entry.name(), &Params::new()).ok());
        if let Some(href) = home {
            body.push_str(&format!("<a href=\"{}\">Back to experiments</a>", escape_html(&href)));
        }

        Mounted {
            view: Self::ID.to_string(),
            title: "Not found".to_string(),
            target: "#app".to_string(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RouteConfig, RouterConfig};
    use crate::navigation::ViewRegistry;
    use crate::routing::RouteTable;

    fn table() -> RouteTable {
        let config = RouterConfig::default();
        let views = ViewRegistry::builtin(config.experiments.clone());
        RouteTable::from_config(&config, &views).unwrap()
    }

    #[test]
    fn test_home_links_every_experiment() {
        let table = table();
        let view = HomeView::new(vec!["elastic-box".into(), "resize".into()]);
        let params = Params::new();
        let mounted = view.mount(&MountContext {
            route: Some("home"),
            path: "/",
            params: &params,
            table: &table,
        });

        assert!(mounted.body.contains("href=\"/#/experiment/elastic-box\""));
        assert!(mounted.body.contains("href=\"/#/bevy/resize\""));
    }

    #[test]
    fn test_links_follow_renamed_routes() {
        let mut config = RouterConfig::default();
        config.routes = vec![
            RouteConfig::new("landing", "/", "home"),
            RouteConfig::new("play", "/play/:experiment", "game"),
            RouteConfig::new("engine", "/engine/:experiment", "bevy"),
        ];
        let views = ViewRegistry::builtin(config.experiments.clone());
        let table = RouteTable::from_config(&config, &views).unwrap();
        let params = Params::new();

        let home = HomeView::new(vec!["resize".into()]).mount(&MountContext {
            route: Some("landing"),
            path: "/",
            params: &params,
            table: &table,
        });
        assert!(home.body.contains("href=\"/#/play/resize\""));
        assert!(home.body.contains("href=\"/#/engine/resize\""));

        let missing = NotFoundView.mount(&MountContext {
            route: None,
            path: "/nope",
            params: &params,
            table: &table,
        });
        assert!(missing.body.contains("href=\"/#/\""));
    }

    #[test]
    fn test_bevy_targets_bevy_canvas() {
        let table = table();
        let params = Params::new().with("experiment", "resize");
        let mounted = BevyView.mount(&MountContext {
            route: Some("bevy"),
            path: "/bevy/resize",
            params: &params,
            table: &table,
        });

        assert_eq!(mounted.target, "#bevy");
        assert_eq!(mounted.title, "Bevy: resize");
    }

    #[test]
    fn test_not_found_escapes_path() {
        let table = table();
        let params = Params::new();
        let mounted = NotFoundView.mount(&MountContext {
            route: None,
            path: "/<script>",
            params: &params,
            table: &table,
        });

        assert!(mounted.body.contains("/&lt;script&gt;"));
        assert!(mounted.body.contains("href=\"/#/\""));
    }
}
