//! ログイン・新規登録フォーム

use leptos::prelude::*;
use leptos::task::spawn_local;
use ledgerlift_common::{Route, SignUpDetails};

use crate::components::loaders::Spinner;
use crate::state::{use_auth, use_toasts};
use crate::web::router::{use_router, Link};

/// GoTrueの既定の最小長
const MIN_PASSWORD_LEN: usize = 6;

fn validate_credentials(email: &str, password: &str) -> Result<(), String> {
    if email.trim().is_empty() || password.is_empty() {
        return Err("Please fill in all fields".to_string());
    }
    if !email.contains('@') {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(())
}

fn validate_sign_up(details: &SignUpDetails, email: &str, password: &str) -> Result<(), String> {
    if details.full_name.trim().is_empty() || details.firm_name.trim().is_empty() {
        return Err("Please fill in all fields".to_string());
    }
    validate_credentials(email, password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
    }
    Ok(())
}

#[component]
fn FormError(error: ReadSignal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|message| {
            view! {
                <div role="alert" class="alert alert-error">
                    <span>{message}</span>
                </div>
            }
        })
    }
}

#[component]
fn SubmitButton(submitting: ReadSignal<bool>, label: &'static str, busy_label: &'static str) -> impl IntoView {
    view! {
        <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
            {move || {
                if submitting.get() {
                    view! { <Spinner /> {busy_label} }.into_any()
                } else {
                    label.into_any()
                }
            }}
        </button>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toasts = use_toasts();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (submitting, set_submitting) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let email = email.get_untracked();
        let password = password.get_untracked();
        if let Err(message) = validate_credentials(&email, &password) {
            set_error.set(Some(message));
            return;
        }

        set_submitting.set(true);
        set_error.set(None);
        spawn_local(async move {
            match auth.sign_in(email, password).await {
                Ok(true) => {
                    toasts.success("Welcome back!");
                    router.go(Route::auth_success_redirect());
                }
                Ok(false) => {
                    set_error.try_set(Some(
                        "We couldn't load your account profile. Please try again.".to_string(),
                    ));
                }
                Err(e) => {
                    set_error.try_set(Some(e.to_string()));
                }
            }
            set_submitting.try_set(false);
        });
    };

    view! {
        <section class="auth-page">
            <div class="card auth-card">
                <h1>"Sign in"</h1>
                <p class="text-muted">"Access your LedgerLift dashboard"</p>
                <form on:submit=on_submit>
                    <FormError error=error />
                    <div class="form-group">
                        <label for="email">"Email"</label>
                        <input
                            id="email"
                            type="email"
                            autocomplete="email"
                            prop:value=email
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="password">"Password"</label>
                        <input
                            id="password"
                            type="password"
                            autocomplete="current-password"
                            prop:value=password
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                    </div>
                    <SubmitButton submitting=submitting label="Sign in" busy_label="Signing in..." />
                </form>
                <p class="text-muted">
                    "New to LedgerLift? "
                    <Link to=Route::Signup.to_path()>"Create an account"</Link>
                </p>
            </div>
        </section>
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toasts = use_toasts();

    let (full_name, set_full_name) = signal(String::new());
    let (firm_name, set_firm_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (submitting, set_submitting) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let details = SignUpDetails {
            full_name: full_name.get_untracked().trim().to_string(),
            firm_name: firm_name.get_untracked().trim().to_string(),
        };
        let email = email.get_untracked();
        let password = password.get_untracked();
        if let Err(message) = validate_sign_up(&details, &email, &password) {
            set_error.set(Some(message));
            return;
        }

        set_submitting.set(true);
        set_error.set(None);
        spawn_local(async move {
            match auth.sign_up(email, password, details).await {
                Ok(true) => {
                    toasts.success("Your account is ready");
                    router.go(Route::auth_success_redirect());
                }
                Ok(false) => {
                    toasts.info("Check your email to confirm your account, then sign in");
                    router.go(Route::Login);
                }
                Err(e) => {
                    set_error.try_set(Some(e.to_string()));
                }
            }
            set_submitting.try_set(false);
        });
    };

    view! {
        <section class="auth-page">
            <div class="card auth-card">
                <h1>"Create your account"</h1>
                <p class="text-muted">"14-day free trial, no card required"</p>
                <form on:submit=on_submit>
                    <FormError error=error />
                    <div class="form-group">
                        <label for="full-name">"Full name"</label>
                        <input
                            id="full-name"
                            type="text"
                            autocomplete="name"
                            prop:value=full_name
                            on:input=move |ev| set_full_name.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="firm-name">"Firm name"</label>
                        <input
                            id="firm-name"
                            type="text"
                            autocomplete="organization"
                            prop:value=firm_name
                            on:input=move |ev| set_firm_name.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="email">"Work email"</label>
                        <input
                            id="email"
                            type="email"
                            autocomplete="email"
                            prop:value=email
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="password">"Password"</label>
                        <input
                            id="password"
                            type="password"
                            autocomplete="new-password"
                            prop:value=password
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                    </div>
                    <SubmitButton submitting=submitting label="Create account" busy_label="Creating account..." />
                </form>
                <p class="text-muted">
                    "Already have an account? "
                    <Link to=Route::Login.to_path()>"Sign in"</Link>
                </p>
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("ada@example.com", "secret").is_ok());
        assert_eq!(
            validate_credentials("", "secret"),
            Err("Please fill in all fields".to_string())
        );
        assert!(validate_credentials("ada", "secret").is_err());
    }

    #[test]
    fn test_validate_sign_up_password_length() {
        let details = SignUpDetails {
            full_name: "Ada Lovelace".to_string(),
            firm_name: "Lovelace & Co".to_string(),
        };
        assert_eq!(
            validate_sign_up(&details, "ada@example.com", "abc"),
            Err("Password must be at least 6 characters".to_string())
        );
        assert!(validate_sign_up(&details, "ada@example.com", "abcdef").is_ok());
        assert!(validate_sign_up(&SignUpDetails::default(), "ada@example.com", "abcdef").is_err());
    }
}
