//! `ledgerlift login / logout / whoami`
//!
//! セッションは `~/.config/ledgerlift/session.json` に保存し、次回起動時に復元する。

use dialoguer::{Input, Password};
use ledgerlift_common::{AuthService, AuthState, AuthStore, SupabaseAuth};

use crate::client::ReqwestClient;
use crate::config::Config;
use crate::demo::CliApi;
use crate::error::{LedgerLiftError, Result};
use crate::session_store::FileStore;

pub type CliAuthStore = AuthStore<SupabaseAuth<ReqwestClient, FileStore>, CliApi>;

/// 保存済みセッションを復元したストア
pub async fn open_store(config: &Config, api: CliApi, store: FileStore) -> Result<CliAuthStore> {
    let provider = SupabaseAuth::new(ReqwestClient::new(), config.auth_url(), config.get_api_key()?, store);
    let auth = AuthStore::new(AuthService::new(provider, api));
    auth.init().await;
    Ok(auth)
}

/// whoami の表示内容
///
/// プロファイルの無いセッションは未ログイン扱い。
pub fn describe(state: &AuthState) -> Result<String> {
    let (Some(session), Some(user)) = (&state.session, &state.user) else {
        return Err(LedgerLiftError::NotSignedIn);
    };

    let name = if user.full_name.is_empty() { &user.email } else { &user.full_name };
    let mut lines = vec![format!("ユーザー: {}", name), format!("メール: {}", user.email)];
    if !user.firm_name.is_empty() {
        lines.push(format!("事務所: {}", user.firm_name));
    }
    if !user.role.is_empty() {
        lines.push(format!("権限: {}", user.role));
    }
    let expires = chrono::DateTime::from_timestamp(session.expires_at, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| session.expires_at.to_string());
    lines.push(format!("有効期限: {}", expires));
    Ok(lines.join("\n"))
}

pub async fn login(auth: &CliAuthStore, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("メールアドレス")
            .interact_text()
            .map_err(|e| LedgerLiftError::Config(format!("入力エラー: {}", e)))?,
    };
    let password = Password::new()
        .with_prompt("パスワード")
        .interact()
        .map_err(|e| LedgerLiftError::Config(format!("入力エラー: {}", e)))?;

    auth.sign_in(email.trim(), &password).await?;
    if !auth.state().is_authenticated() {
        return Err(LedgerLiftError::ProfileUnavailable);
    }
    println!("✔ サインインしました");
    println!("{}", describe(&auth.state())?);
    Ok(())
}

pub async fn logout(auth: &CliAuthStore) -> Result<()> {
    if auth.session().is_none() {
        println!("サインインしていません");
        return Ok(());
    }
    auth.sign_out().await;
    println!("✔ サインアウトしました");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlift_common::{Session, SessionUser};

    fn session() -> Session {
        Session {
            access_token: "at".into(),
            refresh_token: "rt".into(),
            expires_at: 1_700_000_000,
            user_id: "u1".into(),
            email: "ada@example.com".into(),
        }
    }

    #[test]
    fn test_describe_signed_out() {
        let err = describe(&AuthState::default()).unwrap_err();
        assert!(matches!(err, LedgerLiftError::NotSignedIn));
    }

    #[test]
    fn test_describe_with_profile() {
        let state = AuthState {
            user: Some(SessionUser {
                id: "u1".into(),
                email: "ada@example.com".into(),
                full_name: "Ada Lovelace".into(),
                firm_id: "f1".into(),
                firm_name: "Lovelace & Co".into(),
                role: "owner".into(),
            }),
            session: Some(session()),
            loading: false,
        };
        let text = describe(&state).unwrap();
        assert!(text.starts_with("ユーザー: Ada Lovelace"));
        assert!(text.contains("事務所: Lovelace & Co"));
        assert!(text.contains("有効期限: 2023-11-14 22:13 UTC"));
    }

    #[test]
    fn test_describe_session_without_profile() {
        let state = AuthState {
            user: None,
            session: Some(session()),
            loading: false,
        };
        let err = describe(&state).unwrap_err();
        assert!(matches!(err, LedgerLiftError::NotSignedIn));
    }
}
