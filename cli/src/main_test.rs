use super::*;
use crate::transport::reqwest_method;
use linkback::supabase::http::Method;

fn args(url: Option<&str>, key: Option<&str>) -> ConfigArgs {
    ConfigArgs {
        supabase_url: url.map(str::to_owned),
        anon_key: key.map(str::to_owned),
        ..ConfigArgs::default()
    }
}

#[test]
fn config_args_apply_defaults() {
    let config = args(Some("https://abcd.supabase.co/"), Some("anon")).resolve().unwrap();
    assert_eq!(config.supabase_url, "https://abcd.supabase.co");
    assert_eq!(config.landing_route, "/profile");
    assert_eq!(config.placeholder_name, "New User");
    assert!(config.native_url_session);
    assert_eq!(config.request_timeout_secs, 15);
}

#[test]
fn config_args_require_url_and_key() {
    assert_eq!(
        args(None, Some("anon")).resolve().unwrap_err(),
        ConfigError::Missing { var: "LINKBACK_SUPABASE_URL" }
    );
    assert_eq!(
        args(Some("https://abcd.supabase.co"), None).resolve().unwrap_err(),
        ConfigError::Missing { var: "LINKBACK_SUPABASE_ANON_KEY" }
    );
}

#[test]
fn config_args_override_optional_values() {
    let mut config_args = args(Some("https://abcd.supabase.co"), Some("anon"));
    config_args.landing_route = Some("/welcome".to_owned());
    config_args.native_url_session = Some("false".to_owned());
    config_args.request_timeout_secs = Some("3".to_owned());
    let config = config_args.resolve().unwrap();
    assert_eq!(config.landing_route, "/welcome");
    assert!(!config.native_url_session);
    assert_eq!(config.request_timeout_secs, 3);
}

#[test]
fn cli_parses_subcommands() {
    let cli = Cli::try_parse_from([
        "linkback-cli",
        "--supabase-url",
        "https://abcd.supabase.co",
        "complete",
        "https://app.test/auth/callback#access_token=at&refresh_token=rt",
    ])
    .unwrap();
    assert!(matches!(cli.command, Command::Complete { .. }));
    assert_eq!(cli.config.supabase_url.as_deref(), Some("https://abcd.supabase.co"));
}

#[test]
fn outcome_report_for_success_names_route() {
    let redirect = Redirect { route: "/profile".to_owned(), replace: true };
    let report = outcome_report(&OutcomeState::Succeeded, Some(&redirect));
    assert_eq!(report, serde_json::json!({ "state": "succeeded", "redirect": "/profile", "replace": true }));
}

#[test]
fn outcome_report_for_failure_uses_default_message() {
    let report = outcome_report(&OutcomeState::Failed { message: None }, None);
    assert_eq!(
        report,
        serde_json::json!({ "state": "failed", "message": "Failed to process authentication callback." })
    );
}

#[test]
fn reqwest_method_maps_verbs() {
    assert_eq!(reqwest_method(Method::Get), reqwest::Method::GET);
    assert_eq!(reqwest_method(Method::Post), reqwest::Method::POST);
}

#[test]
fn config_args_reject_zero_timeout() {
    let mut config_args = args(Some("https://abcd.supabase.co"), Some("anon"));
    config_args.request_timeout_secs = Some("0".to_owned());
    assert!(matches!(
        config_args.resolve().unwrap_err(),
        ConfigError::Invalid { var: "LINKBACK_REQUEST_TIMEOUT_SECS", .. }
    ));
}
