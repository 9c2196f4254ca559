use domain::{Identity, Role, Scope};
use hostel_auth::{AuthError, JwtManager, TokenClaims};

#[test]
fn jwt_issue_and_decode() {
    let jwt = JwtManager::new("secret".to_string(), None);
    let identity = Identity::new("fw-1", "fw@hostel.test", "Anita", Role::FloorWarden)
        .with_scope(Scope::floors(["H1-F1"]));

    let token = jwt
        .issue_token(&TokenClaims::for_identity(&identity, 3600))
        .expect("token");
    let claims = jwt.decode(&token).expect("claims");

    assert_eq!(claims.sub, "fw-1");
    assert_eq!(claims.role.as_deref(), Some("floor_warden"));
    assert_eq!(claims.floor_ids, Some(vec!["H1-F1".to_string()]));
    assert!(claims.hostel_id.is_none());
}

#[test]
fn wrong_secret_is_unauthenticated() {
    let issuer = JwtManager::new("secret".to_string(), None);
    let verifier = JwtManager::new("other".to_string(), None);
    let identity = Identity::new("u", "", "", Role::Student);
    let token = issuer
        .issue_token(&TokenClaims::for_identity(&identity, 3600))
        .expect("token");
    assert!(matches!(verifier.decode(&token), Err(AuthError::Unauthenticated)));
    assert!(matches!(verifier.decode("not-a-jwt"), Err(AuthError::Unauthenticated)));
}

#[test]
fn expired_token_is_reported() {
    let jwt = JwtManager::new("secret".to_string(), None);
    let claims = TokenClaims {
        sub: "u".to_string(),
        role: Some("student".to_string()),
        exp: 1_000,
        ..TokenClaims::default()
    };
    let token = jwt.issue_token(&claims).expect("token");
    assert!(matches!(jwt.decode(&token), Err(AuthError::TokenExpired)));
}

#[test]
fn issuer_is_enforced_when_configured() {
    let strict = JwtManager::new("secret".to_string(), Some("hostel-idp".to_string()));
    let loose = JwtManager::new("secret".to_string(), None);
    let identity = Identity::new("u", "", "", Role::Student);
    let claims = TokenClaims::for_identity(&identity, 3600);

    let foreign = loose.issue_token(&claims).expect("token");
    assert!(matches!(strict.decode(&foreign), Err(AuthError::Unauthenticated)));

    let own = strict.issue_token(&claims).expect("token");
    assert_eq!(strict.decode(&own).expect("claims").iss.as_deref(), Some("hostel-idp"));
}
