//! Integration tests for the authorization guard.

use escola_auth::token::{TokenClaims, TokenService, TokenType};
use escola_auth::{AuthConfig, AuthError, AuthErrorKind, AuthGuard};
use escola_core::{Account, AccountRepository, CreateAccount, InMemoryAccountRepository, Role};

fn tokens() -> TokenService {
    TokenService::new(AuthConfig::new("guard-test-signing-secret-0123456789").with_bcrypt_cost(4))
        .unwrap()
}

async fn seed(repo: &InMemoryAccountRepository, email: &str, role: Role) -> Account {
    repo.create(CreateAccount {
        email: email.into(),
        national_id: None,
        full_name: email.into(),
        password_hash: "unused".into(),
        role,
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn authenticate_returns_live_account() {
    let repo = InMemoryAccountRepository::new();
    let carla = seed(&repo, "carla@escola.com", Role::Staff).await;
    let tokens = tokens();
    let guard = AuthGuard::new(repo, tokens.clone());

    let token = tokens.issue_access(carla.id, &carla.email, carla.role).unwrap();
    let account = guard.authenticate(&token).await.unwrap();

    assert_eq!(account.id, carla.id);
    assert_eq!(account.role, Role::Staff);
}

#[tokio::test]
async fn refresh_token_is_wrong_type() {
    let repo = InMemoryAccountRepository::new();
    let carla = seed(&repo, "carla@escola.com", Role::Staff).await;
    let tokens = tokens();
    let guard = AuthGuard::new(repo, tokens.clone());

    let refresh = tokens.issue_refresh(carla.id).unwrap();
    let err = guard.authenticate(&refresh).await.unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::InvalidTokenType);
}

#[tokio::test]
async fn inactive_account_is_rejected() {
    let repo = InMemoryAccountRepository::new();
    let carla = seed(&repo, "carla@escola.com", Role::Staff).await;
    let tokens = tokens();
    let guard = AuthGuard::new(repo.clone(), tokens.clone());

    let token = tokens.issue_access(carla.id, &carla.email, carla.role).unwrap();
    repo.set_active(carla.id, false).await.unwrap();

    assert!(matches!(
        guard.authenticate(&token).await.unwrap_err(),
        AuthError::AccountInactive
    ));
}

#[tokio::test]
async fn unknown_account_is_not_found() {
    let repo = InMemoryAccountRepository::new();
    let tokens = tokens();
    let guard = AuthGuard::new(repo, tokens.clone());

    let token = tokens.issue_access(404, "ghost@escola.com", Role::Admin).unwrap();

    assert!(matches!(
        guard.authenticate(&token).await.unwrap_err(),
        AuthError::AccountNotFound
    ));
}

#[tokio::test]
async fn subjectless_token_is_unauthorized() {
    let repo = InMemoryAccountRepository::new();
    let tokens = tokens();
    let guard = AuthGuard::new(repo, tokens.clone());

    let now = chrono::Utc::now().timestamp();
    let token = tokens
        .sign(&TokenClaims {
            sub: String::new(),
            iat: now,
            exp: now + 600,
            token_type: TokenType::Access,
            email: None,
            role: None,
        })
        .unwrap();

    assert!(matches!(
        guard.authenticate(&token).await.unwrap_err(),
        AuthError::Unauthorized
    ));
}

#[tokio::test]
async fn guard_trusts_stored_role_over_claim() {
    let repo = InMemoryAccountRepository::new();
    let dan = seed(&repo, "dan@escola.com", Role::Admin).await;
    let tokens = tokens();
    let guard = AuthGuard::new(repo.clone(), tokens.clone());

    // Token still says ADMIN, but the account was demoted.
    let token = tokens.issue_access(dan.id, &dan.email, Role::Admin).unwrap();
    repo.set_role(dan.id, Role::Student).await.unwrap();

    assert!(matches!(
        guard.require_admin(&token).await.unwrap_err(),
        AuthError::Forbidden
    ));
    assert!(guard.require(&token, &[Role::Student]).await.is_ok());
}

#[tokio::test]
async fn expired_and_tampered_tokens_are_classified() {
    let repo = InMemoryAccountRepository::new();
    let eve = seed(&repo, "eve@escola.com", Role::Teacher).await;
    let guard = AuthGuard::new(repo, tokens());

    let now = chrono::Utc::now().timestamp();
    let expired = tokens()
        .sign(&TokenClaims {
            sub: eve.id.to_string(),
            iat: now - 60,
            exp: now,
            token_type: TokenType::Access,
            email: Some(eve.email.clone()),
            role: Some(eve.role),
        })
        .unwrap();
    assert!(matches!(
        guard.authenticate(&expired).await.unwrap_err(),
        AuthError::TokenExpired
    ));

    let valid = tokens().issue_access(eve.id, &eve.email, eve.role).unwrap();
    let tampered = format!("{valid}x");
    assert!(matches!(
        guard.authenticate(&tampered).await.unwrap_err(),
        AuthError::TokenInvalid(_)
    ));
}

#[tokio::test]
async fn missing_bearer_header_is_unauthorized() {
    let guard = AuthGuard::new(InMemoryAccountRepository::new(), tokens());

    for header in ["", "Basic abc", "Bearer"] {
        assert!(matches!(
            guard.authenticate_header(header).await.unwrap_err(),
            AuthError::Unauthorized
        ));
    }
}

#[tokio::test]
async fn token_info_reports_live_fields() {
    let repo = InMemoryAccountRepository::new();
    let fay = seed(&repo, "fay@escola.com", Role::Teacher).await;
    let tokens = tokens();
    let guard = AuthGuard::new(repo, tokens.clone());

    let token = tokens.issue_access(fay.id, &fay.email, fay.role).unwrap();
    let info = guard.token_info(&token).await.unwrap();

    assert_eq!(info.account_id, fay.id);
    assert_eq!(info.email, "fay@escola.com");
    assert_eq!(info.role, Role::Teacher);
    assert!(info.issued_at.is_some());
}
