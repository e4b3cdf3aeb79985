use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::application::output::{TreeView, render_paths, stdout_supports_color};
use crate::cli::Command;
use crate::config::{PathList, PathListError, TreeConfig, TreeConfigCreationError};
use crate::reconcile::{StateSource, TreeState};
use crate::session::{Session, SessionStoreError, fingerprint_paths};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let output = Self::execute(&app_config, stdout_supports_color()).await?;
        print!("{output}");
        Ok(())
    }

    /// Runs one command against the saved session and returns what it prints.
    pub async fn execute(
        app_config: &RuntimeConfig,
        supports_color: bool,
    ) -> Result<String, ApplicationError> {
        let config = TreeConfig::read(&app_config.root)
            .await
            .context(TreeConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let path_list = PathList::read(&app_config.path_list)
            .await
            .context(PathListSnafu)?;
        let fingerprint = fingerprint_paths(path_list.paths());
        let session = Session::read(&app_config.root).await;

        let mut state = Self::restore_state(&config, app_config, &path_list, session.as_ref());
        let session_is_stale = session
            .as_ref()
            .is_none_or(|session| !session.matches(fingerprint));
        if session.is_some() && session_is_stale {
            info!("Path list changed since the last run, re-applying saved state");
        }

        let output = match &app_config.command {
            Command::Show => {
                let items = state.visible_items();
                let is_selected = |path: &str| state.is_selected(path);
                TreeView::new(&items, &is_selected).render(supports_color)
            }
            Command::Expanded => render_paths("Expanded", &state.expanded_items(), supports_color),
            Command::Selected => render_paths("Selected", &state.selected_items(), supports_color),
            Command::Expand { paths } => {
                paths.iter().for_each(|path| state.expand_item(path));
                Self::render_state(&state, supports_color)
            }
            Command::Collapse { paths } => {
                paths.iter().for_each(|path| state.collapse_item(path));
                Self::render_state(&state, supports_color)
            }
            Command::Select { paths } => {
                paths.iter().for_each(|path| state.toggle_selected(path));
                Self::render_state(&state, supports_color)
            }
            Command::SetExpanded { paths } => {
                state.set_expanded_items(paths.as_slice());
                Self::render_state(&state, supports_color)
            }
        };

        if app_config.command.is_mutation() || session_is_stale {
            Session::new(
                fingerprint,
                state.logical_expanded_paths(),
                state.selected_items(),
            )
            .write(&app_config.root)
            .await
            .context(SessionStoreSnafu)?;
        }

        Ok(output)
    }

    fn restore_state(
        config: &TreeConfig,
        app_config: &RuntimeConfig,
        path_list: &PathList,
        session: Option<&Session>,
    ) -> TreeState {
        let options = config.tree_options(app_config.flatten);
        let log_expanded = |paths: &[String]| info!("Expanded items: {:?}", paths);
        let log_selected = |paths: &[String]| info!("Selected items: {:?}", paths);

        match session {
            Some(session) => {
                let mut state = TreeState::new(
                    path_list.paths(),
                    options,
                    StateSource::controlled(Vec::<String>::new(), log_expanded),
                    StateSource::controlled(session.selected.clone(), log_selected),
                );
                state.restore_logical_expanded(&session.expanded);
                state
            }
            None => TreeState::new(
                path_list.paths(),
                options,
                StateSource::controlled(config.expanded.clone(), log_expanded),
                StateSource::controlled(config.selected.clone(), log_selected),
            ),
        }
    }

    fn render_state(state: &TreeState, supports_color: bool) -> String {
        let mut out = render_paths("Expanded", &state.expanded_items(), supports_color);
        out.push_str(&render_paths("Selected", &state.selected_items(), supports_color));
        out
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    TreeConfigError { source: TreeConfigCreationError },
    #[snafu(display("Failed to load the path list"))]
    PathListError { source: PathListError },
    #[snafu(display("Failed to save the session"))]
    SessionStoreError { source: SessionStoreError },
}
