//! Render instructions derived from session state.
//!
//! `screen` decides *what* to show; `views::html` decides how it looks.

use crate::{
    models::expense::ExpenseRecord,
    services::{
        expense_form::ExpenseForm,
        report_service::{self, Summary},
        session_service::{Notice, Route, SessionState},
    },
};

/// What the host should draw for the current state.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Login {
        notice: Option<Notice>,
    },
    EntryForm {
        username: String,
        form: ExpenseForm,
        notice: Option<Notice>,
    },
    Dashboard {
        username: String,
        dashboard: Dashboard,
    },
}

/// Dashboard content.
#[derive(Debug, Clone, PartialEq)]
pub enum Dashboard {
    /// No records yet; only the informational notice is shown
    Empty,
    Ready {
        records: Vec<ExpenseRecord>,
        summary: Summary,
    },
}

/// Build the screen for `state`.
///
/// `records` is only read for the dashboard route; callers may pass an
/// empty vector otherwise.
pub fn screen(state: &SessionState, records: Vec<ExpenseRecord>) -> Screen {
    let Some(username) = state.username() else {
        return Screen::Login {
            notice: state.notice.clone(),
        };
    };
    let username = username.to_string();

    match state.route {
        Route::EntryForm => Screen::EntryForm {
            username,
            form: state.form.clone(),
            notice: state.notice.clone(),
        },
        Route::Dashboard => {
            let dashboard = match report_service::summarize(&records) {
                Some(summary) => Dashboard::Ready { records, summary },
                None => Dashboard::Empty,
            };
            Screen::Dashboard { username, dashboard }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{credential::CredentialStore, expense::Category},
        services::session_service::{Action, update},
    };
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn authenticated(route: Route) -> SessionState {
        let credentials = CredentialStore::with_default_users();
        let state = update(
            SessionState::new(today()),
            Action::Login {
                username: "user".to_string(),
                password: "senha".to_string(),
            },
            &credentials,
        )
        .state;
        update(state, Action::Navigate(route), &credentials).state
    }

    #[test]
    fn unauthenticated_renders_login() {
        let state = SessionState::new(today());
        assert_eq!(screen(&state, vec![]), Screen::Login { notice: None });
    }

    #[test]
    fn empty_dashboard() {
        let state = authenticated(Route::Dashboard);
        assert!(matches!(
            screen(&state, vec![]),
            Screen::Dashboard { dashboard: Dashboard::Empty, .. }
        ));
    }

    #[test]
    fn dashboard_with_records_is_summarized() {
        let state = authenticated(Route::Dashboard);
        let record = state.form.to_record();
        let Screen::Dashboard {
            dashboard: Dashboard::Ready { records, summary },
            ..
        } = screen(&state, vec![record])
        else {
            panic!("expected populated dashboard");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(summary.by_category[0].0, Category::RawMaterial);
    }

    #[test]
    fn entry_form_route() {
        let state = authenticated(Route::EntryForm);
        assert!(matches!(
            screen(&state, vec![]),
            Screen::EntryForm { ref username, .. } if username == "user"
        ));
    }
}
