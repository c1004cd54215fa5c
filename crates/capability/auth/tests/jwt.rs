use domain::UserContext;
use hms_auth::JwtManager;

#[test]
fn jwt_issue_and_decode() {
    let jwt = JwtManager::new("secret".to_string(), 3600, 7200);
    let ctx = UserContext::new("user-1", "alice");

    let tokens = jwt.issue_tokens(&ctx).expect("tokens");
    let access_ctx = jwt.decode_access(&tokens.access_token).expect("access");
    let refresh_ctx = jwt.decode_refresh(&tokens.refresh_token).expect("refresh");

    assert_eq!(access_ctx.user_id, "user-1");
    assert_eq!(access_ctx.username, "alice");
    assert_eq!(refresh_ctx.user_id, "user-1");
}

#[test]
fn token_types_are_not_interchangeable() {
    let jwt = JwtManager::new("secret".to_string(), 3600, 7200);
    let ctx = UserContext::new("user-1", "alice");
    let tokens = jwt.issue_tokens(&ctx).expect("tokens");

    assert!(jwt.decode_access(&tokens.refresh_token).is_err());
    assert!(jwt.decode_refresh(&tokens.access_token).is_err());
}
