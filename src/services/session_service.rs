//! Session state machine and navigation.
//!
//! Every user interaction becomes an `Action`. `update` consumes the current
//! state and returns the next one, plus at most one `Effect` for the caller
//! to carry out against the record store or the session registry. `update`
//! itself performs no I/O.

use chrono::NaiveDate;

use crate::{
    models::{credential::CredentialStore, expense::ExpenseRecord},
    services::expense_form::{ExpenseForm, FormInput},
};

/// Authentication state. A session starts `Unauthenticated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated { username: String },
}

/// View selected from the menu while authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    EntryForm,
    Dashboard,
}

/// One-shot message shown on the next render.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    LoginFailed,
    ExpenseSaved,
    Invalid(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::LoginFailed => "Usuário ou senha incorretos.",
            Notice::ExpenseSaved => "Gasto registrado com sucesso!",
            Notice::Invalid(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::ExpenseSaved)
    }
}

/// Everything one browser session remembers between requests.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub auth: AuthState,
    pub route: Route,
    pub form: ExpenseForm,
    pub notice: Option<Notice>,
}

impl SessionState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            auth: AuthState::Unauthenticated,
            route: Route::EntryForm,
            form: ExpenseForm::new(today),
            notice: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth, AuthState::Authenticated { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match &self.auth {
            AuthState::Authenticated { username } => Some(username),
            AuthState::Unauthenticated => None,
        }
    }

    /// Whether rendering the current view needs the record set.
    pub fn shows_dashboard(&self) -> bool {
        self.is_authenticated() && self.route == Route::Dashboard
    }
}

/// User interactions.
#[derive(Debug, Clone)]
pub enum Action {
    Login { username: String, password: String },
    Navigate(Route),
    /// Re-read the form fields and recompute the total without saving
    EditForm(FormInput),
    Submit(FormInput),
    Logout,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append this record to the session's store
    Append(ExpenseRecord),
    /// Discard the session entirely
    EndSession,
}

/// Result of `update`.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn stay(state: SessionState) -> Self {
        Self { state, effect: None }
    }
}

/// Apply one action.
///
/// While unauthenticated only `Login` has an effect; every other action
/// leaves the state as it is. The previous notice is always cleared.
pub fn update(mut state: SessionState, action: Action, credentials: &CredentialStore) -> Transition {
    state.notice = None;

    if !state.is_authenticated() {
        return match action {
            Action::Login { username, password } => login(state, username, &password, credentials),
            _ => Transition::stay(state),
        };
    }

    match action {
        // Already logged in
        Action::Login { .. } => Transition::stay(state),
        Action::Navigate(route) => {
            state.route = route;
            Transition::stay(state)
        }
        Action::EditForm(input) => {
            state.route = Route::EntryForm;
            if let Err(err) = state.form.apply(&input) {
                state.notice = Some(Notice::Invalid(err.to_string()));
            }
            Transition::stay(state)
        }
        Action::Submit(input) => {
            state.route = Route::EntryForm;
            match state.form.submit(&input) {
                Ok(record) => {
                    state.notice = Some(Notice::ExpenseSaved);
                    Transition {
                        state,
                        effect: Some(Effect::Append(record)),
                    }
                }
                Err(err) => {
                    state.notice = Some(Notice::Invalid(err.to_string()));
                    Transition::stay(state)
                }
            }
        }
        Action::Logout => {
            if let Some(username) = state.username() {
                tracing::info!(%username, "logout");
            }
            state.auth = AuthState::Unauthenticated;
            state.route = Route::EntryForm;
            Transition {
                state,
                effect: Some(Effect::EndSession),
            }
        }
    }
}

fn login(
    mut state: SessionState,
    username: String,
    password: &str,
    credentials: &CredentialStore,
) -> Transition {
    if credentials.verify(&username, password) {
        tracing::info!(%username, "login succeeded");
        state.auth = AuthState::Authenticated { username };
        state.route = Route::EntryForm;
    } else {
        tracing::warn!(%username, "login failed");
        state.notice = Some(Notice::LoginFailed);
    }

    Transition::stay(state)
}
